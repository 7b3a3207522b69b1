use serde::{Deserialize, Serialize};

use super::operation::{Operation, TimeMs};

/// Full time extent of a data set: min of all starts, max of all ends.
///
/// There is no `TimeBounds` for an empty set — the viewport must not be
/// computed without data, so construction returns `None` instead of a
/// sentinel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min: TimeMs,
    pub max: TimeMs,
}

impl TimeBounds {
    pub fn from_operations(operations: &[Operation]) -> Option<Self> {
        if operations.is_empty() {
            return None;
        }
        let min = operations.iter().map(|o| o.start).fold(f64::INFINITY, f64::min);
        let max = operations.iter().map(|o| o.end).fold(f64::NEG_INFINITY, f64::max);
        if min.is_finite() && max.is_finite() && min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}
