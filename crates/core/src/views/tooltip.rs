//! Tooltip content and anchoring, shared by the machine and routing views.

use chrono::{DateTime, Utc};
use plantafel_protocol::Rect;

use crate::model::{Operation, TimeMs};

/// Vertical offset of the tooltip above a bar in the machine view.
pub const GANTT_TOOLTIP_OFFSET: f64 = 10.0;
/// Vertical offset in the routing view, whose bars are shorter.
pub const ROUTING_TOOLTIP_OFFSET: f64 = 30.0;
/// A tooltip whose anchor would land above this y flips below the bar.
pub const FLIP_MIN_TOP: f64 = 50.0;

/// Where the host should place the tooltip box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipAnchor {
    pub x: f64,
    pub y: f64,
    /// The anchor was flipped below the bar to stay inside the surface.
    pub below: bool,
}

/// Anchor at the bar's horizontal center, `offset` above its top edge.
pub fn anchor_above(bar: Rect, offset: f64) -> TooltipAnchor {
    TooltipAnchor {
        x: bar.x + bar.w / 2.0,
        y: bar.y - offset,
        below: false,
    }
}

/// Same, but flipped below the bar when the natural position would sit
/// above the visible drawing area. Single-axis reposition only.
pub fn anchor_with_flip(bar: Rect, offset: f64) -> TooltipAnchor {
    let natural = anchor_above(bar, offset);
    if natural.y < FLIP_MIN_TOP {
        TooltipAnchor {
            x: natural.x,
            y: bar.y + bar.h + offset,
            below: true,
        }
    } else {
        natural
    }
}

fn format_datetime(t: TimeMs) -> String {
    DateTime::<Utc>::from_timestamp_millis(t as i64)
        .map(|dt| dt.format("%d.%m.%Y, %H:%M").to_string())
        .unwrap_or_default()
}

/// The operation's identifying fields as display lines, in the order the
/// board has always shown them.
pub fn tooltip_lines(op: &Operation) -> Vec<String> {
    let mut lines = vec![
        format!("Job-ID: {}", op.id),
        format!("Auftrag: {} / {}", op.order_no, op.op_no),
        format!("Arbeitsplatz: {}", op.machine_id),
        format!("Start: {}", format_datetime(op.start)),
        format!("Ende: {}", format_datetime(op.end)),
    ];
    if let Some(lsd) = op.latest_start_date {
        lines.push(format!("Spätester Start: {}", format_datetime(lsd)));
    }
    lines.push(format!("Dauer: {} Min", op.duration_minutes()));
    if let Some(buffer) = op.buffer_minutes {
        lines.push(format!("Puffer: {buffer} Min"));
    }
    lines.push(format!("Prioritätsgruppe: {}", op.priority_group));
    if let Some(reason) = &op.reason {
        lines.push(format!("Grund: {reason}"));
    }
    if op.is_outsourcing {
        lines.push("Fremdvergabe: Ja".into());
    }
    lines
}
