pub mod category;
pub mod extract;
pub mod models;
pub mod service;

pub use category::determine_category;
pub use models::*;
pub use service::{CycleReport, MatchTracker};
