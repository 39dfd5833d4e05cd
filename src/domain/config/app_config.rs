//! Application configuration value object

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::sequence::DEFAULT_SEQUENCE;

/// Default pause between key events, in milliseconds
pub const DEFAULT_KEY_DELAY_MS: u64 = 10;

/// Default pause before the first keystroke, in milliseconds.
///
/// Gives the window manager time to hand focus back to the target window.
pub const DEFAULT_START_DELAY_MS: u64 = 1000;

/// Default virtual keyboard selection
pub const DEFAULT_KEYBOARD: &str = "auto";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub key_delay: Option<u64>,
    pub start_delay: Option<u64>,
    pub keyboard: Option<String>,
    pub ydotool_socket: Option<String>,
    pub default_sequence: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            key_delay: Some(DEFAULT_KEY_DELAY_MS),
            start_delay: Some(DEFAULT_START_DELAY_MS),
            keyboard: Some(DEFAULT_KEYBOARD.to_string()),
            ydotool_socket: None,
            default_sequence: Some(DEFAULT_SEQUENCE.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            key_delay: other.key_delay.or(self.key_delay),
            start_delay: other.start_delay.or(self.start_delay),
            keyboard: other.keyboard.or(self.keyboard),
            ydotool_socket: other.ydotool_socket.or(self.ydotool_socket),
            default_sequence: other.default_sequence.or(self.default_sequence),
        }
    }

    /// Inter-key delay, or the default if not set
    pub fn key_delay_or_default(&self) -> Duration {
        Duration::from_millis(self.key_delay.unwrap_or(DEFAULT_KEY_DELAY_MS))
    }

    /// Focus settle delay before typing, or the default if not set
    pub fn start_delay_or_default(&self) -> Duration {
        Duration::from_millis(self.start_delay.unwrap_or(DEFAULT_START_DELAY_MS))
    }

    /// Keyboard preference, or "auto" if not set
    pub fn keyboard_or_default(&self) -> &str {
        self.keyboard.as_deref().unwrap_or(DEFAULT_KEYBOARD)
    }

    /// Fallback sequence for entries without one; blank values count as unset
    pub fn default_sequence_or_default(&self) -> &str {
        self.default_sequence
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SEQUENCE)
    }
}
