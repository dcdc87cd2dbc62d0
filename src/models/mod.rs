//! Core data models.

mod date_range;
mod history;
mod match_record;
mod ratings;
mod stats;

pub use date_range::*;
pub use history::*;
pub use match_record::*;
pub use ratings::*;
pub use stats::*;
