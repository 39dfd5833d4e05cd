//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, logging setup and the
//! command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod logging;
pub mod presenter;

// Re-export commonly used types
pub use app::{
    run_autotype, run_backends, run_parse, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR,
};
pub use args::{AutoTypeOptions, Cli, Commands, ConfigAction, TypeArgs};
pub use logging::setup_logging;
pub use presenter::Presenter;
