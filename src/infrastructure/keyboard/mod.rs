//! Virtual keyboard infrastructure module
//!
//! Provides the ydotoold socket keyboard (primary) and the wtype
//! keyboard (fallback), plus runtime detection between them.

mod event;
mod factory;
mod keycodes;
mod wtype;
mod ydotool;

pub use event::{InputEvent, EVENT_SIZE};
pub use factory::{
    create_keyboard, select_backend, socket_path, KeyboardBackend, KeyboardPreference,
    ParseKeyboardPreferenceError, SystemKeyboardProvider, ToolProbe, SOCKET_ENV, VALID_KEYBOARDS,
};
pub use wtype::{WtypeKeyboard, WTYPE_TOOL};
pub use ydotool::{YdotoolKeyboard, RELAY_TOOL};
