pub mod gantt;
pub mod routing;
pub mod tooltip;
