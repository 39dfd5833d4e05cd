//! Credential entry port interface

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while resolving entry placeholders
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("Failed to get TOTP code: {0}")]
    Totp(String),
}

/// Read access to the credential entry being auto-typed.
///
/// Values are plaintext; the surrounding application is responsible for
/// unlocking the database before handing an entry over.
#[async_trait]
pub trait EntryAccessor: Send + Sync {
    /// Username, if the entry has one
    fn username(&self) -> Option<&str>;

    /// Password (may be empty)
    fn password(&self) -> &str;

    /// Value of a custom string attribute
    fn custom_attribute(&self, key: &str) -> Option<&str>;

    /// Current TOTP code. May run an external process.
    async fn current_totp_code(&self) -> Result<String, ResolveError>;

    /// Auto-type sequence stored on the entry, if any
    fn configured_sequence(&self) -> Option<&str>;
}
