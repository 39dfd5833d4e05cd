//! Application layer - Use cases and port interfaces
//!
//! Contains placeholder resolution, the auto-type workflow and the
//! trait definitions for external system interactions.

pub mod autotype;
pub mod ports;
pub mod resolve;

// Re-export use cases
pub use autotype::{
    AutoTypeCallbacks, AutoTypeError, AutoTypeInput, AutoTypeOutput, AutoTypeUseCase,
};
pub use resolve::{expand_placeholders, resolve_sequence};
