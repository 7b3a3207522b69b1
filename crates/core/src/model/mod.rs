pub mod bounds;
pub mod operation;

pub use bounds::TimeBounds;
pub use operation::{Operation, TimeMs, DAY_MS, HOUR_MS, MINUTE_MS};
