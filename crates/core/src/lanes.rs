//! Lane layout: machines map to uniform vertical bands, labels declutter
//! greedily when the machine list gets dense.

use std::collections::HashMap;

use plantafel_protocol::{Margins, Point, RenderCommand, TextAlign, ThemeToken};

use crate::model::Operation;

/// Inter-lane padding as a fraction of the band step.
pub const PADDING_FRACTION: f64 = 0.15;
/// Minimum vertical distance between two drawn lane labels.
pub const LABEL_MIN_GAP_PX: f64 = 24.0;
/// Below this many lanes all labels are always drawn.
pub const SHOW_ALL_THRESHOLD: usize = 20;

const LABEL_FONT_SIZE: f64 = 13.0;

/// Vertical pixel band of one lane. Independent of the time viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneBand {
    pub top: f64,
    pub height: f64,
}

impl LaneBand {
    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Banded layout over the distinct machines of the current operation set,
/// in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct LaneLayout {
    order: Vec<String>,
    bands: HashMap<String, LaneBand>,
}

impl LaneLayout {
    /// Lay out the distinct `machine_id`s of `operations` between
    /// `range_top` and `range_top + range_height`: equal-height slots with
    /// a fixed padding fraction, first-seen order preserved.
    pub fn from_operations(operations: &[Operation], range_top: f64, range_height: f64) -> Self {
        let mut order: Vec<String> = Vec::new();
        for op in operations {
            if !order.iter().any(|m| m == &op.machine_id) {
                order.push(op.machine_id.clone());
            }
        }
        Self::from_lane_ids(order, range_top, range_height)
    }

    pub fn from_lane_ids(order: Vec<String>, range_top: f64, range_height: f64) -> Self {
        let n = order.len();
        let mut bands = HashMap::with_capacity(n);
        if n > 0 {
            let step = range_height / n as f64;
            let band_height = step * (1.0 - PADDING_FRACTION);
            let inset = step * PADDING_FRACTION / 2.0;
            for (i, id) in order.iter().enumerate() {
                bands.insert(
                    id.clone(),
                    LaneBand {
                        top: range_top + i as f64 * step + inset,
                        height: band_height,
                    },
                );
            }
        }
        Self { order, bands }
    }

    pub fn band(&self, machine_id: &str) -> Option<LaneBand> {
        self.bands.get(machine_id).copied()
    }

    /// Lane ids in vertical order.
    pub fn lane_ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Which lane labels are drawn. All of them when `show_all` is set or
    /// the lane count is small; otherwise a greedy single pass keeps a
    /// label only when it clears the previously kept one by
    /// `LABEL_MIN_GAP_PX`. The first lane always survives.
    pub fn visible_labels(&self, show_all: bool) -> Vec<&str> {
        if show_all || self.order.len() <= SHOW_ALL_THRESHOLD {
            return self.order.iter().map(String::as_str).collect();
        }
        let tops: Vec<f64> = self
            .order
            .iter()
            .filter_map(|id| self.bands.get(id).map(|b| b.top))
            .collect();
        keep_spaced(&tops, LABEL_MIN_GAP_PX)
            .into_iter()
            .map(|i| self.order[i].as_str())
            .collect()
    }
}

/// Greedy declutter over vertically ordered positions: keep an index when
/// its position is at least `min_gap` past the last kept position.
pub(crate) fn keep_spaced(tops: &[f64], min_gap: f64) -> Vec<usize> {
    let mut kept = Vec::new();
    let mut last = f64::NEG_INFINITY;
    for (i, &top) in tops.iter().enumerate() {
        if top.is_finite() && top - last >= min_gap {
            kept.push(i);
            last = top;
        }
    }
    kept
}

/// Emit the left-hand machine labels, decluttered.
pub fn render_lane_labels(
    layout: &LaneLayout,
    margins: &Margins,
    show_all: bool,
) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(layout.len() + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "lane-labels".into(),
        label: None,
    });
    for id in layout.visible_labels(show_all) {
        let Some(band) = layout.band(id) else { continue };
        commands.push(RenderCommand::DrawText {
            position: Point::new(margins.left - 8.0, band.center() + 4.0),
            text: id.to_string(),
            color: ThemeToken::LaneLabelText,
            font_size: LABEL_FONT_SIZE,
            align: TextAlign::Right,
        });
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::operation::test_op as op;

    #[test]
    fn bands_preserve_first_seen_order() {
        let ops = vec![
            op(1, "512", 0.0, 10.0),
            op(2, "FRAES-2", 5.0, 15.0),
            op(3, "512", 20.0, 30.0),
        ];
        let layout = LaneLayout::from_operations(&ops, 40.0, 200.0);
        assert_eq!(layout.lane_ids(), ["512".to_string(), "FRAES-2".to_string()]);
        let a = layout.band("512").unwrap();
        let b = layout.band("FRAES-2").unwrap();
        assert!(a.top < b.top);
        assert!((a.height - b.height).abs() < 1e-9);
        // 2 lanes over 200 px: 100 px step, 85 px band.
        assert!((a.height - 85.0).abs() < 1e-9);
        assert!((a.top - 47.5).abs() < 1e-9);
    }

    #[test]
    fn unknown_lane_has_no_band() {
        let layout = LaneLayout::from_operations(&[op(1, "512", 0.0, 1.0)], 0.0, 100.0);
        assert!(layout.band("999").is_none());
    }

    #[test]
    fn greedy_declutter_keeps_spaced_labels() {
        // The documented example: second and third positions fall within
        // the 24 px gap of the first kept label.
        let kept = keep_spaced(&[0.0, 10.0, 12.0, 40.0], 24.0);
        assert_eq!(kept, vec![0, 3]);
    }

    #[test]
    fn small_layouts_show_everything() {
        let ids: Vec<String> = (0..10).map(|i| format!("M{i}")).collect();
        let layout = LaneLayout::from_lane_ids(ids, 0.0, 50.0);
        assert_eq!(layout.visible_labels(false).len(), 10);
    }

    #[test]
    fn dense_layouts_declutter_unless_forced() {
        let ids: Vec<String> = (0..40).map(|i| format!("M{i}")).collect();
        // 40 lanes in 400 px → 10 px apart, gap 24 keeps roughly every third.
        let layout = LaneLayout::from_lane_ids(ids, 0.0, 400.0);
        let visible = layout.visible_labels(false);
        assert!(visible.len() < 40);
        assert_eq!(visible[0], "M0");
        assert_eq!(layout.visible_labels(true).len(), 40);
    }
}
