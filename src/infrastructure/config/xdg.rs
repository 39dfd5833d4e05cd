//! XDG config store adapter

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Directory name under the XDG config home
const APP_DIR: &str = "autotyper";

const CONFIG_FILE: &str = "config.toml";

/// XDG-compliant config store (`~/.config/autotyper/config.toml`)
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// Create a new XDG config store with default path
    pub fn new() -> Self {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_default();

        Self::with_path(base.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::empty()),
            Err(e) => return Err(ConfigError::ReadError(e.to_string())),
        };

        debug!(path = %self.path.display(), "loaded config");
        Self::parse_toml(&content)
    }

    /// Written to a sibling temp file, then renamed into place
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let write_err = |e: io::Error| ConfigError::WriteError(e.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let staged = self.path.with_extension("toml.tmp");
        fs::write(&staged, Self::to_toml(config)?)
            .await
            .map_err(write_err)?;
        fs::rename(&staged, &self.path).await.map_err(write_err)
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.display().to_string(),
            ));
        }

        self.save(&AppConfig::defaults()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_xdg() {
        let store = XdgConfigStore::new();
        let path = store.path();
        assert!(path.to_string_lossy().contains("autotyper"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn custom_path() {
        let store = XdgConfigStore::with_path("/custom/path/config.toml");
        assert_eq!(store.path(), PathBuf::from("/custom/path/config.toml"));
    }

    #[test]
    fn parse_toml_flat_format() {
        let content = r#"
key_delay = 25
start_delay = 500
keyboard = "wtype"
default_sequence = "{USERNAME}{ENTER}"
"#;

        let config = XdgConfigStore::parse_toml(content).unwrap();
        assert_eq!(config.key_delay, Some(25));
        assert_eq!(config.start_delay, Some(500));
        assert_eq!(config.keyboard, Some("wtype".to_string()));
        assert_eq!(config.default_sequence, Some("{USERNAME}{ENTER}".to_string()));
        assert!(config.ydotool_socket.is_none());
    }

    #[test]
    fn parse_toml_rejects_wrong_types() {
        let err = XdgConfigStore::parse_toml("key_delay = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        assert_eq!(store.load().await.unwrap(), AppConfig::empty());
    }

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("nested").join("config.toml"));

        store.init().await.unwrap();
        assert_eq!(store.load().await.unwrap(), AppConfig::defaults());

        let err = store.init().await.unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn save_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));

        store.save(&AppConfig::defaults()).await.unwrap();
        let updated = AppConfig {
            keyboard: Some("wtype".to_string()),
            ..AppConfig::empty()
        };
        store.save(&updated).await.unwrap();

        assert_eq!(store.load().await.unwrap(), updated);
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn directory_in_place_of_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path());

        assert!(!store.exists());
        assert!(matches!(
            store.load().await,
            Err(ConfigError::ReadError(_))
        ));
    }

    #[tokio::test]
    async fn broken_file_loads_empty_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "key_delay = [").unwrap();

        let store = XdgConfigStore::with_path(path);
        assert!(store.load().await.is_err());
        assert_eq!(store.load_or_empty().await, AppConfig::empty());
    }
}
