//! Virtual keyboard factory with automatic detection

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::ports::{KeyboardError, KeyboardProvider, VirtualKeyboard};

use super::wtype::{WtypeKeyboard, WTYPE_TOOL};
use super::ydotool::{YdotoolKeyboard, RELAY_TOOL};

/// Environment variable overriding the ydotoold socket path
pub const SOCKET_ENV: &str = "YDOTOOL_SOCKET";

/// Socket file name inside the runtime directory
const SOCKET_NAME: &str = ".ydotool_socket";

/// Available keyboard backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardBackend {
    /// ydotoold socket via an `nc` relay
    Ydotool,
    /// wtype (Wayland virtual keyboard protocol)
    Wtype,
}

impl KeyboardBackend {
    /// Executable that must be on PATH for this backend
    pub fn required_tool(&self) -> &'static str {
        match self {
            KeyboardBackend::Ydotool => RELAY_TOOL,
            KeyboardBackend::Wtype => WTYPE_TOOL,
        }
    }
}

impl fmt::Display for KeyboardBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyboardBackend::Ydotool => write!(f, "ydotool"),
            KeyboardBackend::Wtype => write!(f, "wtype"),
        }
    }
}

/// User preference for keyboard selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardPreference {
    /// Prefer ydotool, fall back to wtype
    #[default]
    Auto,
    Ydotool,
    Wtype,
}

/// Accepted preference names
pub const VALID_KEYBOARDS: &[&str] = &["auto", "ydotool", "wtype"];

impl fmt::Display for KeyboardPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyboardPreference::Auto => write!(f, "auto"),
            KeyboardPreference::Ydotool => write!(f, "ydotool"),
            KeyboardPreference::Wtype => write!(f, "wtype"),
        }
    }
}

/// Error type for parsing keyboard preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyboardPreferenceError {
    pub value: String,
}

impl fmt::Display for ParseKeyboardPreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid keyboard '{}'. Valid options: {}",
            self.value,
            VALID_KEYBOARDS.join(", ")
        )
    }
}

impl std::error::Error for ParseKeyboardPreferenceError {}

impl FromStr for KeyboardPreference {
    type Err = ParseKeyboardPreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(KeyboardPreference::Auto),
            "ydotool" => Ok(KeyboardPreference::Ydotool),
            "wtype" => Ok(KeyboardPreference::Wtype),
            _ => Err(ParseKeyboardPreferenceError {
                value: s.to_string(),
            }),
        }
    }
}

/// Looks up executables on PATH
#[derive(Debug, Clone, Default)]
pub struct ToolProbe {
    path: Option<OsString>,
}

impl ToolProbe {
    /// Probe against the process PATH
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe against a custom PATH
    pub fn with_path(path: impl Into<OsString>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Check if a tool binary is available
    pub fn is_available(&self, tool: &str) -> bool {
        let found = match self.path {
            Some(ref path) => {
                let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
                which::which_in(tool, Some(path), cwd)
            }
            None => which::which(tool),
        };

        match found {
            Ok(location) => {
                debug!(tool, path = %location.display(), "found tool");
                true
            }
            Err(_) => false,
        }
    }

    /// Detect the best available backend
    ///
    /// Priority is ydotool → wtype.
    pub fn detect(&self) -> Option<KeyboardBackend> {
        [KeyboardBackend::Ydotool, KeyboardBackend::Wtype]
            .into_iter()
            .find(|backend| self.is_available(backend.required_tool()))
    }
}

/// Resolve the ydotoold socket path.
///
/// `YDOTOOL_SOCKET` wins, then the configured path, then ydotool's own
/// default of `$XDG_RUNTIME_DIR/.ydotool_socket` (or `/tmp`).
pub fn socket_path(configured: Option<&str>) -> PathBuf {
    socket_path_from(
        env::var(SOCKET_ENV).ok(),
        configured,
        env::var("XDG_RUNTIME_DIR").ok(),
    )
}

fn socket_path_from(
    env_socket: Option<String>,
    configured: Option<&str>,
    runtime_dir: Option<String>,
) -> PathBuf {
    if let Some(path) = env_socket.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    if let Some(path) = configured.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    let dir = runtime_dir
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "/tmp".to_string());
    Path::new(&dir).join(SOCKET_NAME)
}

/// Pick the backend for a preference without starting it.
///
/// `Auto` takes the first available backend; explicit choices fail if their
/// tool is missing.
pub fn select_backend(
    preference: KeyboardPreference,
    probe: &ToolProbe,
) -> Result<KeyboardBackend, KeyboardError> {
    match preference {
        KeyboardPreference::Auto => probe.detect().ok_or(KeyboardError::NoBackendAvailable {
            relay: RELAY_TOOL,
            line_tool: WTYPE_TOOL,
        }),
        KeyboardPreference::Ydotool => require(KeyboardBackend::Ydotool, probe),
        KeyboardPreference::Wtype => require(KeyboardBackend::Wtype, probe),
    }
}

/// Create a keyboard using the specified preference.
///
/// Returns the keyboard and the backend it uses, or an error if the required
/// tool is missing.
pub fn create_keyboard(
    preference: KeyboardPreference,
    socket: &Path,
    probe: &ToolProbe,
) -> Result<(Box<dyn VirtualKeyboard>, KeyboardBackend), KeyboardError> {
    let backend = select_backend(preference, probe)?;

    debug!(%backend, %preference, "selected virtual keyboard");
    create_specific_keyboard(backend, socket).map(|keyboard| (keyboard, backend))
}

fn require(backend: KeyboardBackend, probe: &ToolProbe) -> Result<KeyboardBackend, KeyboardError> {
    if probe.is_available(backend.required_tool()) {
        Ok(backend)
    } else {
        Err(KeyboardError::ToolNotFound(
            backend.required_tool().to_string(),
        ))
    }
}

/// Create a specific keyboard adapter
fn create_specific_keyboard(
    backend: KeyboardBackend,
    socket: &Path,
) -> Result<Box<dyn VirtualKeyboard>, KeyboardError> {
    match backend {
        KeyboardBackend::Ydotool => {
            if !socket.exists() {
                warn!(
                    "ydotoold socket {} does not exist; is ydotoold running?",
                    socket.display()
                );
            }
            Ok(Box::new(YdotoolKeyboard::connect(socket)?) as Box<dyn VirtualKeyboard>)
        }
        KeyboardBackend::Wtype => Ok(Box::new(WtypeKeyboard::new()) as Box<dyn VirtualKeyboard>),
    }
}

/// Keyboard provider probing the system on every request
#[derive(Debug, Clone)]
pub struct SystemKeyboardProvider {
    preference: KeyboardPreference,
    socket: PathBuf,
    probe: ToolProbe,
}

impl SystemKeyboardProvider {
    /// Create a provider for the given preference and ydotoold socket
    pub fn new(preference: KeyboardPreference, socket: impl Into<PathBuf>) -> Self {
        Self {
            preference,
            socket: socket.into(),
            probe: ToolProbe::new(),
        }
    }

    /// Replace the executable probe
    pub fn with_probe(mut self, probe: ToolProbe) -> Self {
        self.probe = probe;
        self
    }
}

#[async_trait]
impl KeyboardProvider for SystemKeyboardProvider {
    async fn keyboard(&self) -> Result<Box<dyn VirtualKeyboard>, KeyboardError> {
        create_keyboard(self.preference, &self.socket, &self.probe).map(|(keyboard, _)| keyboard)
    }
}
