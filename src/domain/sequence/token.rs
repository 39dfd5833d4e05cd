//! Auto-type token value objects

use std::fmt;

/// Dedicated keys that can appear in an auto-type sequence.
///
/// Whitespace keys (`{TAB}`, `{ENTER}`, `{SPACE}`) are deliberately absent:
/// they are parsed as literal text and typed like any other character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    CapsLock,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

impl SpecialKey {
    /// Directive name as written inside braces
    pub fn directive(&self) -> &'static str {
        match self {
            SpecialKey::Insert => "INSERT",
            SpecialKey::Delete => "DELETE",
            SpecialKey::Home => "HOME",
            SpecialKey::End => "END",
            SpecialKey::PageUp => "PGUP",
            SpecialKey::PageDown => "PGDN",
            SpecialKey::Backspace => "BACKSPACE",
            SpecialKey::CapsLock => "CAPSLOCK",
            SpecialKey::Escape => "ESC",
            SpecialKey::Up => "UP",
            SpecialKey::Down => "DOWN",
            SpecialKey::Left => "LEFT",
            SpecialKey::Right => "RIGHT",
        }
    }
}

/// Whether a modifier token presses or releases its keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierAction {
    Press,
    Release,
}

/// Modifier keys a [`Token::Modifier`] can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModifierKey {
    Shift,
    Control,
    Alt,
    Super,
}

/// A single instruction in an auto-type stream.
///
/// Placeholder variants (`Title`, `Username`, `Password`, `Totp`, `Attribute`)
/// only exist before resolution; after it, entry-bound placeholders have been
/// replaced with [`Token::Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal characters to type
    Text(String),
    Special(SpecialKey),
    /// Function key `F1`..=`F24`
    Function(u8),

    Title,
    Username,
    Password,
    Totp,
    /// Custom entry attribute (`{S:<name>}`)
    Attribute(String),

    /// One-shot pause in milliseconds
    Delay(u64),
    /// Replace the inter-key delay for the rest of the stream
    SetDelay(u64),
    Modifier {
        action: ModifierAction,
        keys: Vec<ModifierKey>,
    },
    /// Unrecognized `{...}` directive, kept verbatim
    Unknown(String),
}

impl Token {
    /// Create a text token
    pub fn text(value: impl Into<String>) -> Self {
        Token::Text(value.into())
    }

    /// True for tokens that must be resolved against an entry
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            Token::Title | Token::Username | Token::Password | Token::Totp | Token::Attribute(_)
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(value) => write!(f, "text {:?}", value),
            Token::Special(key) => write!(f, "key {}", key.directive()),
            Token::Function(n) => write!(f, "key F{}", n),
            Token::Title => write!(f, "placeholder TITLE"),
            Token::Username => write!(f, "placeholder USERNAME"),
            Token::Password => write!(f, "placeholder PASSWORD"),
            Token::Totp => write!(f, "placeholder TOTP"),
            Token::Attribute(key) => write!(f, "placeholder S:{}", key),
            Token::Delay(ms) => write!(f, "delay {}ms", ms),
            Token::SetDelay(ms) => write!(f, "set-delay {}ms", ms),
            Token::Modifier { action, keys } => write!(f, "modifier {:?} {:?}", action, keys),
            Token::Unknown(raw) => write!(f, "unknown {}", raw),
        }
    }
}
