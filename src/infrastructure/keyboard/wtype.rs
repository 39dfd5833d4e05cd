//! Wtype keyboard for Wayland support

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{KeyboardError, VirtualKeyboard};
use crate::domain::sequence::Token;

/// Executable name
pub const WTYPE_TOOL: &str = "wtype";

/// Wtype keyboard using the `zwp_virtual_keyboard_v1` protocol
///
/// Fast and needs no daemon or extra permissions, but only works on
/// compositors implementing the protocol. Only text is supported: newlines
/// become `KP_Enter`, tabs are not typed, and everything else is sent
/// lower-cased. Empty text next to a directive is never emitted, so a
/// sequence gets one `-s 500` pause per text token only (four for the
/// default sequence rather than one per split segment).
pub struct WtypeKeyboard {
    program: OsString,
}

impl WtypeKeyboard {
    /// Create a new wtype keyboard
    pub fn new() -> Self {
        Self::with_program(WTYPE_TOOL)
    }

    /// Run `program` in place of `wtype`
    pub(crate) fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the full wtype argument list for one invocation
    fn build_args(tokens: &[Token]) -> Vec<String> {
        let mut args: Vec<String> = ["-d", "50", "-s", "5000"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        for token in tokens {
            let Token::Text(value) = token else {
                continue;
            };

            match value.as_str() {
                "\n" => {
                    args.push("-k".to_string());
                    args.push("KP_Enter".to_string());
                }
                // Tabs are not typed
                "\t" | "" => {}
                text => args.push(text.to_lowercase()),
            }

            args.push("-s".to_string());
            args.push("500".to_string());
        }

        args
    }
}

impl Default for WtypeKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VirtualKeyboard for WtypeKeyboard {
    async fn type_tokens(
        &self,
        tokens: &[Token],
        _key_delay: Duration,
    ) -> Result<(), KeyboardError> {
        let args = Self::build_args(tokens);
        debug!(args = args.len(), "running wtype");

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    KeyboardError::ToolNotFound(WTYPE_TOOL.to_string())
                } else {
                    KeyboardError::ToolSpawn {
                        tool: WTYPE_TOOL,
                        source: e,
                    }
                }
            })?;

        if !status.success() {
            return Err(KeyboardError::ToolFailed {
                tool: WTYPE_TOOL,
                code: status.code(),
            });
        }

        Ok(())
    }
}
