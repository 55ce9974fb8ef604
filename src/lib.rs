pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use adapters::LocalStorage;
pub use app::report::{OutputPlan, ResultReporter};
pub use app::run::{run_drawing, RunReport};
pub use config::TomlConfig;
pub use crate::core::{engine::DrawingEngine, hat::CandidatePool, registry::Registry};
pub use utils::error::{DrawError, Result};
