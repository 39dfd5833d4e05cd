//! Domain layer - Core auto-type model
//!
//! Contains the sequence tokens, the sequence parser, configuration
//! value objects and domain errors. This layer performs no I/O.

pub mod config;
pub mod error;
pub mod sequence;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use sequence::{parse, SpecialKey, Token, DEFAULT_SEQUENCE};
