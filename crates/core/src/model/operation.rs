use serde::{Deserialize, Serialize};

/// Epoch milliseconds. All viewport and layout math happens in this unit;
/// `chrono` appears only at the parse and label-format edges.
pub type TimeMs = f64;

pub const MINUTE_MS: f64 = 60.0 * 1000.0;
pub const HOUR_MS: f64 = 60.0 * MINUTE_MS;
pub const DAY_MS: f64 = 24.0 * HOUR_MS;

/// One scheduled operation, immutable per render.
///
/// Invariant: `start <= end` (enforced at parse time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    pub order_no: String,
    pub op_no: String,
    /// Lane key — the work place / machine number, kept as a string
    /// because upstream mixes numeric and alphanumeric identifiers.
    pub machine_id: String,
    pub start: TimeMs,
    pub end: TimeMs,
    pub priority_group: i32,
    pub latest_start_date: Option<TimeMs>,
    /// Upstream override: when explicitly `false`, the operation is late
    /// regardless of the `latest_start_date` comparison.
    pub starts_before_lsd: Option<bool>,
    pub buffer_minutes: Option<i64>,
    pub reason: Option<String>,
    pub is_outsourcing: bool,
    /// Position in the order's routing; drives the routing-view sequence.
    pub order_pos: Option<i64>,
}

impl Operation {
    pub fn duration_ms(&self) -> f64 {
        self.end - self.start
    }

    /// Duration rounded to whole minutes, as shown in tooltips.
    pub fn duration_minutes(&self) -> i64 {
        (self.duration_ms() / MINUTE_MS).round() as i64
    }

    /// Lateness policy: an explicit upstream `starts_before_lsd == false`
    /// wins; otherwise the operation is late when it starts after its
    /// latest start date. Evaluated purely from data, independent of any
    /// viewport.
    pub fn is_late(&self) -> bool {
        if self.starts_before_lsd == Some(false) {
            return true;
        }
        match self.latest_start_date {
            Some(lsd) => self.start > lsd,
            None => false,
        }
    }
}

/// Minimal operation for tests across the crate.
#[cfg(test)]
pub(crate) fn test_op(id: i64, machine: &str, start: TimeMs, end: TimeMs) -> Operation {
    Operation {
        id,
        order_no: format!("A{id}"),
        op_no: "10".into(),
        machine_id: machine.into(),
        start,
        end,
        priority_group: 1,
        latest_start_date: None,
        starts_before_lsd: None,
        buffer_minutes: None,
        reason: None,
        is_outsourcing: false,
        order_pos: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(id: i64, machine: &str, start: TimeMs, end: TimeMs) -> Operation {
        test_op(id, machine, start, end)
    }

    #[test]
    fn duration_in_minutes_rounds() {
        let mut o = op(1, "M1", 0.0, 90.0 * 1000.0);
        assert_eq!(o.duration_minutes(), 2);
        o.end = 89.0 * 1000.0;
        assert_eq!(o.duration_minutes(), 1);
    }

    #[test]
    fn late_when_start_after_latest_start() {
        let mut o = op(1, "M1", 100.0, 200.0);
        assert!(!o.is_late());
        o.latest_start_date = Some(50.0);
        assert!(o.is_late());
        o.latest_start_date = Some(100.0);
        assert!(!o.is_late());
    }

    #[test]
    fn upstream_flag_overrides() {
        let mut o = op(1, "M1", 100.0, 200.0);
        o.starts_before_lsd = Some(false);
        assert!(o.is_late());
        // Explicit `true` defers to the date comparison.
        o.starts_before_lsd = Some(true);
        o.latest_start_date = Some(50.0);
        assert!(o.is_late());
    }
}
