pub mod engine;
pub mod hat;
pub mod registry;

pub use crate::domain::model::{Assignment, DrawOutcome, History, HistoryEntry, HistoryRecord, Participant};
pub use crate::domain::ports::{DrawSettings, Storage};
pub use crate::utils::error::Result;
