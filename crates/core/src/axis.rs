//! Adaptive time-axis formatting.
//!
//! Pure data-in/data-out: the caller passes the visible span and gets a
//! calendar granularity back. Zooming walks the ladder from months down to
//! minutes without the caller ever branching on zoom state.

use chrono::{DateTime, Utc};
use plantafel_protocol::{Margins, Point, RenderCommand, TextAlign, ThemeToken, Viewport};
use serde::{Deserialize, Serialize};

use crate::model::{TimeMs, DAY_MS};
use crate::viewport::ViewportDomain;

const TICK_TARGET_PX: f64 = 90.0;
const MIN_TICKS: usize = 4;
const MAX_TICKS: usize = 24;
const AXIS_FONT_SIZE: f64 = 11.0;

/// Calendar unit used for axis labels, chosen from the visible span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    MonthYear,
    DayMonth,
    DayMonthHour,
    HourMinute,
}

/// Threshold ladder over the visible span in days.
///
/// The source distinguished >180 d ("years/half-years") from >60 d
/// ("quarters/months") but rendered both as month+year; the two arms are
/// collapsed here.
pub fn choose_granularity(span_days: f64) -> Granularity {
    if span_days > 60.0 {
        Granularity::MonthYear
    } else if span_days > 7.0 {
        Granularity::DayMonth
    } else if span_days > 1.0 {
        Granularity::DayMonthHour
    } else {
        Granularity::HourMinute
    }
}

/// Target one tick per ~90 px, bounded to `[4, 24]`.
pub fn tick_count(inner_width_px: f64) -> usize {
    ((inner_width_px / TICK_TARGET_PX).floor() as usize).clamp(MIN_TICKS, MAX_TICKS)
}

/// `count + 1` evenly spaced instants covering the domain inclusively.
pub fn tick_instants(domain: ViewportDomain, count: usize) -> Vec<TimeMs> {
    let count = count.max(1);
    (0..=count)
        .map(|i| domain.start + domain.span() * (i as f64 / count as f64))
        .collect()
}

/// Render one instant at the given granularity.
pub fn format_tick(t: TimeMs, granularity: Granularity) -> String {
    let Some(dt) = DateTime::<Utc>::from_timestamp_millis(t as i64) else {
        return String::new();
    };
    let pattern = match granularity {
        Granularity::MonthYear => "%b %y",
        Granularity::DayMonth => "%d. %b",
        Granularity::DayMonthHour => "%d. %b %H:%M",
        Granularity::HourMinute => "%H:%M",
    };
    dt.format(pattern).to_string()
}

/// Emit the bottom time axis: vertical gridlines through the plot area and
/// a label per tick, formatted at the span-appropriate granularity.
pub fn render_time_axis(
    domain: ViewportDomain,
    viewport: &Viewport,
    margins: &Margins,
) -> Vec<RenderCommand> {
    if domain.span() <= 0.0 {
        return Vec::new();
    }
    let inner_width = margins.inner_width(viewport);
    let inner_height = margins.inner_height(viewport);
    let granularity = choose_granularity(domain.span() / DAY_MS);
    let count = tick_count(inner_width);
    let px_per_ms = inner_width / domain.span();

    let mut commands = Vec::with_capacity(2 * count + 4);
    commands.push(RenderCommand::BeginGroup {
        id: "time-axis".into(),
        label: None,
    });

    for t in tick_instants(domain, count) {
        let x = margins.left + (t - domain.start) * px_per_ms;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, margins.top),
            to: Point::new(x, margins.top + inner_height),
            color: ThemeToken::GridLine,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, margins.top + inner_height + 16.0),
            text: format_tick(t, granularity),
            color: ThemeToken::AxisText,
            font_size: AXIS_FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_ladder() {
        assert_eq!(choose_granularity(200.0), Granularity::MonthYear);
        assert_eq!(choose_granularity(180.1), Granularity::MonthYear);
        assert_eq!(choose_granularity(61.0), Granularity::MonthYear);
        assert_eq!(choose_granularity(60.0), Granularity::DayMonth);
        assert_eq!(choose_granularity(10.0), Granularity::DayMonth);
        assert_eq!(choose_granularity(7.0), Granularity::DayMonthHour);
        assert_eq!(choose_granularity(2.5), Granularity::DayMonthHour);
        assert_eq!(choose_granularity(1.0), Granularity::HourMinute);
        assert_eq!(choose_granularity(0.3), Granularity::HourMinute);
    }

    #[test]
    fn tick_count_bounds() {
        assert_eq!(tick_count(100.0), 4);
        assert_eq!(tick_count(900.0), 10);
        assert_eq!(tick_count(90_000.0), 24);
    }

    #[test]
    fn tick_instants_cover_the_domain() {
        let d = ViewportDomain {
            start: 0.0,
            end: 1000.0,
        };
        let ticks = tick_instants(d, 4);
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(*ticks.last().unwrap(), 1000.0);
        assert_eq!(ticks[2], 500.0);
    }

    #[test]
    fn formats_per_granularity() {
        // 2024-03-05 14:30 UTC
        let t = 1_709_649_000_000.0;
        assert_eq!(format_tick(t, Granularity::HourMinute), "14:30");
        assert_eq!(format_tick(t, Granularity::DayMonth), "05. Mar");
        assert_eq!(format_tick(t, Granularity::MonthYear), "Mar 24");
        assert_eq!(format_tick(t, Granularity::DayMonthHour), "05. Mar 14:30");
    }

    #[test]
    fn axis_emits_gridlines_and_labels() {
        let d = ViewportDomain {
            start: 0.0,
            end: 2.0 * DAY_MS,
        };
        let vp = Viewport::new(1000.0, 500.0);
        let m = Margins::default();
        let cmds = render_time_axis(d, &vp, &m);
        let lines = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawLine { .. }))
            .count();
        let texts = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawText { .. }))
            .count();
        assert_eq!(lines, texts);
        assert!(lines >= MIN_TICKS + 1);
    }
}
