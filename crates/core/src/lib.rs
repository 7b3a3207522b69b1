pub mod axis;
pub mod board;
pub mod gesture;
pub mod lanes;
pub mod model;
pub mod parse;
pub mod selection;
pub mod svg;
pub mod viewport;
pub mod views;

pub use board::{BoardScene, PlanBoard, RoutingBoard};
pub use model::{Operation, TimeBounds, TimeMs};
pub use parse::{parse_operations, ParseError, ParsedPlan};
pub use selection::{KeyValueStore, MemoryStore, Selection, SelectionStore};
pub use viewport::ViewportDomain;
