//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with ydotoold, wtype, the filesystem and the shell.

pub mod config;
pub mod entry;
pub mod keyboard;

// Re-export adapters
pub use config::XdgConfigStore;
pub use entry::{CommandLineEntry, TotpSource};
pub use keyboard::{
    create_keyboard, KeyboardBackend, KeyboardPreference, SystemKeyboardProvider, WtypeKeyboard,
    YdotoolKeyboard,
};
