//! Machine-lane timeline view: bar geometry, rendering policy, hit regions.

use plantafel_protocol::{Margins, Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::lanes::{LaneBand, LaneLayout};
use crate::model::{Operation, DAY_MS};
use crate::viewport::ViewportDomain;

/// Bars never render narrower than this, so zero-duration or far-zoomed-out
/// operations stay visible and clickable.
pub const MIN_BAR_WIDTH_PX: f64 = 3.0;
/// Pictograms only appear in the detailed ("weeks") zoom range.
pub const PICTOGRAM_MAX_SPAN_DAYS: f64 = 21.0;
/// ...and only on bars wider than this.
pub const PICTOGRAM_MIN_BAR_WIDTH_PX: f64 = 50.0;
pub const PICTOGRAM_MAX_WIDTH_PX: f64 = 24.0;
/// Order-number labels need this much bar to be legible.
pub const ORDER_LABEL_MIN_WIDTH_PX: f64 = 40.0;

const BAR_CORNER_RADIUS: f64 = 6.0;
const BAR_FONT_SIZE: f64 = 11.0;

/// View-space footprint of one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub rect: Rect,
}

/// Interpolate an operation's interval into the plot area of `viewport`.
/// Returns `None` when the scale is degenerate.
pub fn layout_bar(
    op: &Operation,
    domain: ViewportDomain,
    lane: LaneBand,
    viewport: &Viewport,
    margins: &Margins,
) -> Option<BarGeometry> {
    if domain.span() <= 0.0 {
        return None;
    }
    let inner_width = margins.inner_width(viewport);
    let px_per_ms = inner_width / domain.span();
    let x1 = margins.left + (op.start - domain.start) * px_per_ms;
    let x2 = margins.left + (op.end - domain.start) * px_per_ms;
    Some(BarGeometry {
        rect: Rect::new(x1, lane.top, (x2 - x1).max(MIN_BAR_WIDTH_PX), lane.height),
    })
}

/// A clickable bar region; clicking emits the selection triple.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub rect: Rect,
    pub op_id: i64,
    pub order_no: String,
    pub machine_id: String,
}

/// Plot-area scene for the machine view: commands plus hit regions.
#[derive(Debug, Default)]
pub struct GanttScene {
    pub commands: Vec<RenderCommand>,
    pub hits: Vec<HitRegion>,
}

/// Render bars and lane gridlines. Operations whose machine is not in the
/// lane layout (filtered out upstream) are skipped, never an error.
pub fn render_gantt(
    operations: &[Operation],
    layout: &LaneLayout,
    domain: ViewportDomain,
    viewport: &Viewport,
    margins: &Margins,
    selected_order: Option<&str>,
) -> GanttScene {
    let mut scene = GanttScene::default();
    if domain.span() <= 0.0 || layout.is_empty() {
        return scene;
    }
    let inner_width = margins.inner_width(viewport);
    let span_days = domain.span() / DAY_MS;
    let pictogram_zoom = span_days <= PICTOGRAM_MAX_SPAN_DAYS;

    scene.commands.push(RenderCommand::BeginGroup {
        id: "gantt".into(),
        label: None,
    });

    // Horizontal gridline along each lane slot.
    for id in layout.lane_ids() {
        let Some(band) = layout.band(id) else { continue };
        scene.commands.push(RenderCommand::DrawLine {
            from: Point::new(margins.left, band.top),
            to: Point::new(margins.left + inner_width, band.top),
            color: ThemeToken::GridLine,
            width: 1.0,
        });
    }

    for op in operations {
        let Some(band) = layout.band(&op.machine_id) else {
            continue;
        };
        let Some(bar) = layout_bar(op, domain, band, viewport, margins) else {
            continue;
        };
        let rect = bar.rect;

        // Cull bars entirely outside the plot area.
        if rect.x + rect.w < margins.left || rect.x > margins.left + inner_width {
            continue;
        }

        let selected = selected_order.is_some_and(|o| o == op.order_no);
        let (fill, border) = if selected {
            (ThemeToken::BarSelected, ThemeToken::BarLateBorder)
        } else if op.is_late() {
            (ThemeToken::BarLate, ThemeToken::BarLateBorder)
        } else {
            (ThemeToken::BarOnTime, ThemeToken::BarOnTimeBorder)
        };

        scene.commands.push(RenderCommand::DrawRect {
            rect,
            color: fill,
            border_color: Some(border),
            corner_radius: BAR_CORNER_RADIUS,
            op_id: Some(op.id),
        });
        scene.hits.push(HitRegion {
            rect,
            op_id: op.id,
            order_no: op.order_no.clone(),
            machine_id: op.machine_id.clone(),
        });

        let icon_width = PICTOGRAM_MAX_WIDTH_PX.min(rect.w - 4.0);
        let pictogram_visible =
            pictogram_zoom && rect.w > PICTOGRAM_MIN_BAR_WIDTH_PX && icon_width > 0.0;
        let show_order_label = !op.order_no.is_empty() && rect.w > ORDER_LABEL_MIN_WIDTH_PX;

        if pictogram_visible {
            scene.commands.push(RenderCommand::DrawPictogram {
                rect: Rect::new(rect.x, rect.y, icon_width, rect.h),
                corner_radius: BAR_CORNER_RADIUS,
            });
        }
        if show_order_label {
            // Without the icon the label anchors to the bar's left edge.
            let label_x = if pictogram_visible {
                rect.x + icon_width + 4.0
            } else {
                rect.x + 4.0
            };
            scene.commands.push(RenderCommand::DrawText {
                position: Point::new(label_x, rect.y + rect.h / 2.0 + 4.0),
                text: op.order_no.clone(),
                color: ThemeToken::BarLabelText,
                font_size: BAR_FONT_SIZE,
                align: TextAlign::Left,
            });
        }
    }

    scene.commands.push(RenderCommand::EndGroup);
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::operation::test_op as op;
    use crate::model::HOUR_MS;

    fn setup(ops: &[Operation]) -> (LaneLayout, ViewportDomain, Viewport, Margins) {
        let layout = LaneLayout::from_operations(ops, 40.0, 400.0);
        let domain = ViewportDomain {
            start: 0.0,
            end: 8.0 * HOUR_MS,
        };
        (layout, domain, Viewport::new(1160.0, 480.0), Margins::default())
    }

    #[test]
    fn zero_duration_keeps_minimum_width() {
        let ops = vec![op(1, "M1", 4.0 * HOUR_MS, 4.0 * HOUR_MS)];
        let (layout, domain, vp, m) = setup(&ops);
        let band = layout.band("M1").unwrap();
        let bar = layout_bar(&ops[0], domain, band, &vp, &m).unwrap();
        assert_eq!(bar.rect.w, MIN_BAR_WIDTH_PX);
        // Anchored at the interval's position: halfway through 8 h over
        // 1000 inner px.
        assert!((bar.rect.x - (140.0 + 500.0)).abs() < 1e-9);
    }

    #[test]
    fn unknown_lane_is_skipped_silently() {
        let known = vec![op(1, "M1", 0.0, HOUR_MS)];
        let (layout, domain, vp, m) = setup(&known);
        let mut ops = known;
        ops.push(op(2, "GHOST", 0.0, HOUR_MS));
        let scene = render_gantt(&ops, &layout, domain, &vp, &m, None);
        assert_eq!(scene.hits.len(), 1);
        assert_eq!(scene.hits[0].op_id, 1);
    }

    #[test]
    fn late_and_on_time_colors() {
        let mut ops = vec![op(1, "M1", 2.0 * HOUR_MS, 3.0 * HOUR_MS)];
        ops[0].latest_start_date = Some(HOUR_MS);
        ops.push(op(2, "M1", 4.0 * HOUR_MS, 5.0 * HOUR_MS));
        let (layout, domain, vp, m) = setup(&ops);
        let scene = render_gantt(&ops, &layout, domain, &vp, &m, None);
        let fills: Vec<ThemeToken> = scene
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect { color, op_id: Some(_), .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![ThemeToken::BarLate, ThemeToken::BarOnTime]);
    }

    #[test]
    fn selected_order_overrides_fill() {
        let ops = vec![op(1, "M1", 0.0, HOUR_MS)];
        let (layout, domain, vp, m) = setup(&ops);
        let scene = render_gantt(&ops, &layout, domain, &vp, &m, Some("A1"));
        assert!(scene.commands.iter().any(|c| matches!(
            c,
            RenderCommand::DrawRect {
                color: ThemeToken::BarSelected,
                ..
            }
        )));
    }

    #[test]
    fn pictogram_needs_detailed_zoom_and_width() {
        // 8 h span: detailed zoom; 4 h bar over 1000 px → ~500 px wide.
        let ops = vec![op(1, "M1", 0.0, 4.0 * HOUR_MS)];
        let (layout, domain, vp, m) = setup(&ops);
        let scene = render_gantt(&ops, &layout, domain, &vp, &m, None);
        assert!(scene
            .commands
            .iter()
            .any(|c| matches!(c, RenderCommand::DrawPictogram { .. })));

        // Same data viewed over 30 days: coarse zoom suppresses the icon
        // even though the label may survive.
        let coarse = ViewportDomain {
            start: 0.0,
            end: 30.0 * DAY_MS,
        };
        let scene = render_gantt(&ops, &layout, coarse, &vp, &m, None);
        assert!(!scene
            .commands
            .iter()
            .any(|c| matches!(c, RenderCommand::DrawPictogram { .. })));
    }

    #[test]
    fn label_anchors_to_bar_edge_without_icon() {
        // Wide enough for a label (>40 px) but not for the icon (<50 px):
        // 25 min over 8 h → ~52 px... use 22 min ≈ 45.8 px.
        let ops = vec![op(1, "M1", 0.0, 22.0 * 60.0 * 1000.0)];
        let (layout, domain, vp, m) = setup(&ops);
        let scene = render_gantt(&ops, &layout, domain, &vp, &m, None);
        let bar_x = scene.hits[0].rect.x;
        let label_x = scene
            .commands
            .iter()
            .find_map(|c| match c {
                RenderCommand::DrawText { position, .. } => Some(position.x),
                _ => None,
            })
            .unwrap();
        assert_eq!(label_x, bar_x + 4.0);
    }
}
