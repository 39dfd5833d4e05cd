//! Entry assembled from command-line values

use std::collections::HashMap;
use std::process::Stdio;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{EntryAccessor, ResolveError};

/// Where `{TOTP}` gets its code from
#[derive(Debug, Default)]
pub enum TotpSource {
    /// No TOTP configured; `{TOTP}` fails
    #[default]
    None,
    /// A code supplied up front
    Fixed(SecretString),
    /// Shell command printing the current code, e.g.
    /// `keepassxc-cli show --totp db.kdbx entry`
    Command(String),
}

/// Entry whose values are passed in by the caller
#[derive(Debug)]
pub struct CommandLineEntry {
    username: Option<String>,
    password: SecretString,
    attributes: HashMap<String, String>,
    totp: TotpSource,
    sequence: Option<String>,
}

impl CommandLineEntry {
    /// Create an entry with just a password
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            username: None,
            password: SecretString::from(password.into()),
            attributes: HashMap::new(),
            totp: TotpSource::None,
            sequence: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_totp(mut self, totp: TotpSource) -> Self {
        self.totp = totp;
        self
    }

    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }

    /// Run the TOTP command through `sh -c` and return its trimmed stdout
    async fn run_totp_command(command: &str) -> Result<String, ResolveError> {
        debug!("running TOTP command");

        let output = Command::new("sh")
            .args(["-c", command])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ResolveError::Totp(format!("failed to run TOTP command: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolveError::Totp(format!(
                "TOTP command exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let code = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if code.is_empty() {
            return Err(ResolveError::Totp(
                "TOTP command printed no code".to_string(),
            ));
        }

        Ok(code)
    }
}

#[async_trait]
impl EntryAccessor for CommandLineEntry {
    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn password(&self) -> &str {
        self.password.expose_secret()
    }

    fn custom_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    async fn current_totp_code(&self) -> Result<String, ResolveError> {
        match &self.totp {
            TotpSource::None => Err(ResolveError::Totp(
                "entry has no TOTP configured".to_string(),
            )),
            TotpSource::Fixed(code) => Ok(code.expose_secret().to_string()),
            TotpSource::Command(command) => Self::run_totp_command(command).await,
        }
    }

    fn configured_sequence(&self) -> Option<&str> {
        self.sequence.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_values() {
        let entry = CommandLineEntry::new("hunter2")
            .with_username("alice")
            .with_attribute("pin", "0000")
            .with_sequence("{PASSWORD}");

        assert_eq!(entry.username(), Some("alice"));
        assert_eq!(entry.password(), "hunter2");
        assert_eq!(entry.custom_attribute("pin"), Some("0000"));
        assert_eq!(entry.custom_attribute("other"), None);
        assert_eq!(entry.configured_sequence(), Some("{PASSWORD}"));
    }

    #[test]
    fn debug_output_hides_password() {
        let entry = CommandLineEntry::new("hunter2");
        assert!(!format!("{:?}", entry).contains("hunter2"));
    }

    #[tokio::test]
    async fn missing_totp_is_an_error() {
        let entry = CommandLineEntry::new("pw");
        assert!(entry.current_totp_code().await.is_err());
    }

    #[tokio::test]
    async fn fixed_totp() {
        let entry = CommandLineEntry::new("pw")
            .with_totp(TotpSource::Fixed(SecretString::from("123456".to_string())));
        assert_eq!(entry.current_totp_code().await.unwrap(), "123456");
    }

    #[tokio::test]
    async fn totp_command_output_is_trimmed() {
        let entry = CommandLineEntry::new("pw")
            .with_totp(TotpSource::Command("echo ' 987654 '".to_string()));
        assert_eq!(entry.current_totp_code().await.unwrap(), "987654");
    }

    #[tokio::test]
    async fn failing_totp_command_is_an_error() {
        let entry = CommandLineEntry::new("pw")
            .with_totp(TotpSource::Command("echo oops >&2; exit 3".to_string()));
        let err = entry.current_totp_code().await.unwrap_err();
        assert!(err.to_string().contains("oops"));
    }

    #[tokio::test]
    async fn silent_totp_command_is_an_error() {
        let entry = CommandLineEntry::new("pw").with_totp(TotpSource::Command("true".to_string()));
        assert!(entry.current_totp_code().await.is_err());
    }
}
