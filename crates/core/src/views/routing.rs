//! Single-order routing view: sequence ordering, lane rows, elbow
//! connectors between consecutive operations on different machines.
//!
//! Unlike the machine view this is not a draggable time viewport — the
//! domain always spans the order's own min/max, scaled by a bounded user
//! zoom factor over a fixed base width.

use chrono::{DateTime, Utc};
use plantafel_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};
use serde::{Deserialize, Serialize};

use crate::model::Operation;
use crate::views::gantt::{HitRegion, MIN_BAR_WIDTH_PX};

pub const PADDING_LEFT: f64 = 140.0;
pub const PADDING_TOP: f64 = 60.0;
pub const ROW_HEIGHT: f64 = 50.0;
pub const BAR_HEIGHT: f64 = 22.0;
pub const BASE_WIDTH: f64 = 1500.0;
pub const ZOOM_MIN: f64 = 0.2;
pub const ZOOM_MAX: f64 = 10.0;
/// Button zoom step; the wheel uses a finer one.
pub const ZOOM_STEP: f64 = 1.2;
pub const WHEEL_ZOOM_STEP: f64 = 1.12;
/// Horizontal midpoint offset cap: connectors never grow longer than this
/// toward the gap's middle, however large the timing gap.
pub const CONNECTOR_CAP_PX: f64 = 150.0;
pub const TICK_COUNT: usize = 12;

const LABEL_MIN_WIDTH_PX: f64 = 40.0;
const BAR_CORNER_RADIUS: f64 = 4.0;

/// Primary sort key direction for the routing sequence.
///
/// The observed behavior orders by `order_pos` *descending*; whether that
/// is the true forward routing direction is an open domain question, so
/// the direction stays configurable rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortPolicy {
    #[default]
    OrderPosDescending,
    OrderPosAscending,
}

/// Bounded routing-view zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingZoom(f64);

impl Default for RoutingZoom {
    fn default() -> Self {
        Self(1.0)
    }
}

impl RoutingZoom {
    pub fn factor(&self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn zoom_in(self) -> Self {
        Self((self.0 * ZOOM_STEP).min(ZOOM_MAX))
    }

    #[must_use]
    pub fn zoom_out(self) -> Self {
        Self((self.0 / ZOOM_STEP).max(ZOOM_MIN))
    }

    /// Wheel up zooms in, wheel down zooms out, one step per event.
    #[must_use]
    pub fn wheel(self, delta_y: f64) -> Self {
        let factor = if delta_y < 0.0 {
            WHEEL_ZOOM_STEP
        } else {
            1.0 / WHEEL_ZOOM_STEP
        };
        Self((self.0 * factor).clamp(ZOOM_MIN, ZOOM_MAX))
    }

    pub fn reset(self) -> Self {
        Self::default()
    }
}

/// Operations in routing-sequence order: `order_pos` per policy, start
/// time ascending as the tie-break.
pub fn sort_routing(operations: &[Operation], policy: SortPolicy) -> Vec<Operation> {
    let mut sorted = operations.to_vec();
    sorted.sort_by(|a, b| {
        let pa = a.order_pos.unwrap_or(0);
        let pb = b.order_pos.unwrap_or(0);
        let primary = match policy {
            SortPolicy::OrderPosDescending => pb.cmp(&pa),
            SortPolicy::OrderPosAscending => pa.cmp(&pb),
        };
        primary.then_with(|| a.start.partial_cmp(&b.start).unwrap_or(std::cmp::Ordering::Equal))
    });
    sorted
}

/// 3-segment elbow between the end of one bar and the start of the next,
/// on different lanes: horizontal to a midpoint x, vertical across lanes,
/// horizontal to the next bar. The midpoint offset is half the gap, capped.
pub fn elbow(end_x: f64, from_mid_y: f64, next_x: f64, to_mid_y: f64) -> Vec<Point> {
    let mid = end_x + ((next_x - end_x) / 2.0).min(CONNECTOR_CAP_PX);
    vec![
        Point::new(end_x, from_mid_y),
        Point::new(mid, from_mid_y),
        Point::new(mid, to_mid_y),
        Point::new(next_x, to_mid_y),
    ]
}

fn priority_color(group: i32) -> ThemeToken {
    match group {
        0 => ThemeToken::Priority0,
        1 => ThemeToken::Priority1,
        2 => ThemeToken::Priority2,
        _ => ThemeToken::PriorityDefault,
    }
}

fn format_tick_date(t: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis(t as i64)
        .map(|dt| dt.format("%d %b").to_string())
        .unwrap_or_default()
}

/// Scene for one order's routing.
#[derive(Debug, Default)]
pub struct RoutingScene {
    pub commands: Vec<RenderCommand>,
    pub hits: Vec<HitRegion>,
    /// Total pixel size of the drawn scene (the view scrolls, not zooms,
    /// beyond its container).
    pub width: f64,
    pub height: f64,
}

/// Lay out and render a single order's operation sequence.
pub fn render_routing(
    operations: &[Operation],
    zoom: RoutingZoom,
    policy: SortPolicy,
) -> RoutingScene {
    let mut scene = RoutingScene::default();
    if operations.is_empty() {
        return scene;
    }
    let sorted = sort_routing(operations, policy);

    // Lanes: distinct machines, top-to-bottom in first-seen order after
    // sorting.
    let mut machines: Vec<&str> = Vec::new();
    for op in &sorted {
        if !machines.contains(&op.machine_id.as_str()) {
            machines.push(&op.machine_id);
        }
    }
    let lane_y = |machine: &str| -> Option<f64> {
        machines
            .iter()
            .position(|m| *m == machine)
            .map(|i| PADDING_TOP + i as f64 * ROW_HEIGHT)
    };

    let min_start = sorted.iter().map(|o| o.start).fold(f64::INFINITY, f64::min);
    let max_end = sorted.iter().map(|o| o.end).fold(f64::NEG_INFINITY, f64::max);
    let total_ms = (max_end - min_start).max(1.0);
    let px_per_ms = BASE_WIDTH / total_ms * zoom.factor();
    let x_of = |t: f64| PADDING_LEFT + (t - min_start) * px_per_ms;

    scene.width = PADDING_LEFT + BASE_WIDTH * zoom.factor() + 200.0;
    scene.height = machines.len() as f64 * ROW_HEIGHT + 200.0;

    scene.commands.push(RenderCommand::BeginGroup {
        id: "routing".into(),
        label: None,
    });

    // Axis ticks: evenly spaced over the order's own span.
    let grid_bottom = machines.len() as f64 * ROW_HEIGHT + PADDING_TOP;
    for i in 0..=TICK_COUNT {
        let pct = i as f64 / TICK_COUNT as f64;
        let t = min_start + pct * total_ms;
        let x = PADDING_LEFT + pct * BASE_WIDTH * zoom.factor();
        scene.commands.push(RenderCommand::DrawLine {
            from: Point::new(x, PADDING_TOP - 5.0),
            to: Point::new(x, grid_bottom),
            color: ThemeToken::GridLine,
            width: 1.0,
        });
        scene.commands.push(RenderCommand::DrawText {
            position: Point::new(x, PADDING_TOP - 20.0),
            text: format_tick_date(t),
            color: ThemeToken::AxisText,
            font_size: 12.0,
            align: TextAlign::Center,
        });
    }

    // Machine labels down the left edge.
    for (i, machine) in machines.iter().enumerate() {
        scene.commands.push(RenderCommand::DrawText {
            position: Point::new(20.0, PADDING_TOP + i as f64 * ROW_HEIGHT + 15.0),
            text: (*machine).to_string(),
            color: ThemeToken::LaneLabelText,
            font_size: 14.0,
            align: TextAlign::Left,
        });
    }

    // Bars, labels, connectors.
    for (idx, op) in sorted.iter().enumerate() {
        let Some(y) = lane_y(&op.machine_id) else { continue };
        let x1 = x_of(op.start);
        let x2 = x_of(op.end);
        let rect = Rect::new(x1, y, (x2 - x1).max(MIN_BAR_WIDTH_PX), BAR_HEIGHT);

        scene.commands.push(RenderCommand::DrawRect {
            rect,
            color: priority_color(op.priority_group),
            border_color: None,
            corner_radius: BAR_CORNER_RADIUS,
            op_id: Some(op.id),
        });
        scene.hits.push(HitRegion {
            rect,
            op_id: op.id,
            order_no: op.order_no.clone(),
            machine_id: op.machine_id.clone(),
        });

        if rect.w > LABEL_MIN_WIDTH_PX && !op.order_no.is_empty() {
            scene.commands.push(RenderCommand::DrawText {
                position: Point::new(x1 + 5.0, y + 15.0),
                text: op.order_no.clone(),
                color: ThemeToken::BarLabelText,
                font_size: 12.0,
                align: TextAlign::Left,
            });
        }

        // Connector to the successor, only across lanes — bars sharing a
        // lane are already visually adjacent.
        if let Some(next) = sorted.get(idx + 1) {
            if next.machine_id != op.machine_id {
                if let Some(next_y) = lane_y(&next.machine_id) {
                    scene.commands.push(RenderCommand::DrawPath {
                        points: elbow(
                            x2.max(x1 + MIN_BAR_WIDTH_PX),
                            y + BAR_HEIGHT / 2.0,
                            x_of(next.start),
                            next_y + BAR_HEIGHT / 2.0,
                        ),
                        color: ThemeToken::ConnectorLine,
                        width: 2.0,
                    });
                }
            }
        }
    }

    scene.commands.push(RenderCommand::EndGroup);
    scene
}
