//! Virtual keyboard port interface

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::sequence::Token;

/// Virtual keyboard errors
#[derive(Debug, Error)]
pub enum KeyboardError {
    #[error("No virtual keyboard found: neither `{relay}` (ydotool socket relay) nor `{line_tool}` is installed. Please install ydotool or wtype.")]
    NoBackendAvailable {
        relay: &'static str,
        line_tool: &'static str,
    },

    #[error("{0} not found. Please install {0}.")]
    ToolNotFound(String),

    #[error("Failed to start ydotool socket relay: {0}")]
    RelaySpawn(#[source] io::Error),

    #[error("Failed to send key events to ydotoold: {0}")]
    Transport(#[source] io::Error),

    #[error("Virtual keyboard connection is already closed")]
    Closed,

    #[error("Failed to run {tool}: {source}")]
    ToolSpawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with status: {}", code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    ToolFailed {
        tool: &'static str,
        code: Option<i32>,
    },
}

/// Port for typing a resolved token stream into the focused window
#[async_trait]
pub trait VirtualKeyboard: Send + Sync {
    /// Type the tokens in order.
    ///
    /// # Arguments
    /// * `tokens` - Resolved tokens; placeholder and unknown tokens are skipped
    /// * `key_delay` - Initial pause between key events, adjustable by
    ///   [`Token::SetDelay`] for the rest of this call
    ///
    /// Calls must not overlap: issue at most one `type_tokens` per keyboard
    /// at a time.
    async fn type_tokens(&self, tokens: &[Token], key_delay: Duration)
        -> Result<(), KeyboardError>;

    /// Release any resources held by the keyboard.
    ///
    /// No further typing is possible afterwards.
    async fn close(&self) -> Result<(), KeyboardError> {
        Ok(())
    }
}

/// Port for obtaining a virtual keyboard.
///
/// Implementations may probe the system on every call; callers should ask
/// once per auto-type request.
#[async_trait]
pub trait KeyboardProvider: Send + Sync {
    /// Create a ready-to-use keyboard
    async fn keyboard(&self) -> Result<Box<dyn VirtualKeyboard>, KeyboardError>;
}
