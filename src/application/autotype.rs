//! Auto-type use case

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::ports::{EntryAccessor, KeyboardError, KeyboardProvider, ResolveError};
use super::resolve::resolve_sequence;

/// Errors from the auto-type use case
#[derive(Debug, Error)]
pub enum AutoTypeError {
    #[error("Failed to resolve auto-type sequence: {0}")]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Keyboard(#[from] KeyboardError),
}

/// Input parameters for the auto-type use case
#[derive(Debug, Clone)]
pub struct AutoTypeInput {
    /// Pause between key events
    pub key_delay: Duration,
    /// Pause before the first keystroke so focus can settle
    pub start_delay: Duration,
    /// Sequence used when the entry has none
    pub fallback_sequence: Option<String>,
}

impl Default for AutoTypeInput {
    fn default() -> Self {
        Self {
            key_delay: Duration::from_millis(crate::domain::config::DEFAULT_KEY_DELAY_MS),
            start_delay: Duration::from_millis(crate::domain::config::DEFAULT_START_DELAY_MS),
            fallback_sequence: None,
        }
    }
}

/// Output from the auto-type use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoTypeOutput {
    /// Number of tokens handed to the keyboard
    pub tokens: usize,
}

/// Callbacks for status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct AutoTypeCallbacks {
    /// Called once the sequence is resolved, with the token count
    pub on_resolved: Option<Box<dyn Fn(usize) + Send + Sync>>,
    /// Called before waiting for focus to settle
    pub on_waiting: Option<Box<dyn Fn(Duration) + Send + Sync>>,
    /// Called right before the first keystroke
    pub on_typing_start: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Types an entry's auto-type sequence into the focused window
pub struct AutoTypeUseCase<P>
where
    P: KeyboardProvider,
{
    provider: P,
}

impl<P> AutoTypeUseCase<P>
where
    P: KeyboardProvider,
{
    /// Create a new use case instance
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Execute the auto-type workflow.
    ///
    /// The sequence is fully resolved before a keyboard is created, so a
    /// failing TOTP lookup never leaves a half-typed credential behind. Once
    /// typing starts it cannot be cancelled.
    pub async fn execute<E>(
        &self,
        entry: &E,
        input: AutoTypeInput,
        callbacks: AutoTypeCallbacks,
    ) -> Result<AutoTypeOutput, AutoTypeError>
    where
        E: EntryAccessor + ?Sized,
    {
        let tokens = resolve_sequence(entry, input.fallback_sequence.as_deref()).await?;

        if let Some(ref cb) = callbacks.on_resolved {
            cb(tokens.len());
        }

        if !input.start_delay.is_zero() {
            if let Some(ref cb) = callbacks.on_waiting {
                cb(input.start_delay);
            }
            tokio::time::sleep(input.start_delay).await;
        }

        let keyboard = self.provider.keyboard().await?;

        if let Some(ref cb) = callbacks.on_typing_start {
            cb();
        }

        debug!(tokens = tokens.len(), key_delay_ms = input.key_delay.as_millis() as u64, "typing");
        let typed = keyboard.type_tokens(&tokens, input.key_delay).await;

        // Close even after a failed write so the relay does not linger
        let closed = keyboard.close().await;
        if let (Err(_), Err(e)) = (&typed, &closed) {
            warn!("failed to close virtual keyboard: {}", e);
        }

        typed?;
        closed?;

        Ok(AutoTypeOutput {
            tokens: tokens.len(),
        })
    }
}
