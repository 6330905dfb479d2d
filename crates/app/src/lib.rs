pub mod app;
pub mod config;
pub mod error;
pub mod prompts;
pub mod services;
pub mod startup;

pub use app::AppState;
pub use config::LlmshConfig;
pub use error::{AppError, Result};
pub use services::{
    AppServices, CleanReport, CleanTarget, CommandInput, CommandOutcome, UsageReport,
};
pub use startup::{AppPaths, ensure_data_dir, write_default_config};
