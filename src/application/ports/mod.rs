//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod entry;
pub mod keyboard;

// Re-export common types
pub use config::ConfigStore;
pub use entry::{EntryAccessor, ResolveError};
pub use keyboard::{KeyboardError, KeyboardProvider, VirtualKeyboard};
