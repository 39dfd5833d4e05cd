//! Auto-type sequence tokenizer
//!
//! Follows the KeePass/KeePassXC placeholder syntax closely, but only the
//! subset listed below is understood:
//! <https://keepass.info/help/base/placeholders.html>
//! <https://keepassxc.org/docs/KeePassXC_UserGuide#_auto_type_actions>
//!
//! Parsing never fails. Anything between braces that is not recognized
//! becomes [`Token::Unknown`], and text outside braces is kept verbatim.

use std::sync::LazyLock;

use regex::{Matches, Regex};

use super::token::{SpecialKey, Token};

/// Sequence used when an entry does not configure its own
pub const DEFAULT_SEQUENCE: &str = "{USERNAME}{TAB}{PASSWORD}{ENTER}";

/// Highest function key number accepted in `{F<n>}`
pub const MAX_FUNCTION_KEY: u8 = 24;

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("directive pattern is valid"));

/// Parse a sequence into a lazy stream of tokens.
///
/// Text between directives is emitted as [`Token::Text`]. Empty segments next
/// to a directive are skipped, so `parse("{TAB}")` yields a single token, while
/// a sequence without any directive always yields exactly one text token (even
/// when empty).
pub fn parse(sequence: &str) -> Tokens<'_> {
    Tokens {
        input: sequence,
        matches: DIRECTIVE.find_iter(sequence),
        cursor: 0,
        pending: None,
        saw_directive: false,
        done: false,
    }
}

/// Iterator returned by [`parse`]
#[derive(Debug)]
pub struct Tokens<'a> {
    input: &'a str,
    matches: Matches<'static, 'a>,
    cursor: usize,
    pending: Option<Token>,
    saw_directive: bool,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        if self.done {
            return None;
        }

        match self.matches.next() {
            Some(m) => {
                self.saw_directive = true;
                let before = &self.input[self.cursor..m.start()];
                self.cursor = m.end();

                let directive = parse_directive(m.as_str());
                if before.is_empty() {
                    Some(directive)
                } else {
                    self.pending = Some(directive);
                    Some(Token::text(before))
                }
            }
            None => {
                self.done = true;
                let rest = &self.input[self.cursor..];
                if rest.is_empty() && self.saw_directive {
                    None
                } else {
                    Some(Token::text(rest))
                }
            }
        }
    }
}

/// Map a full `{...}` span to its token
fn parse_directive(raw: &str) -> Token {
    let name = &raw[1..raw.len() - 1];

    match name {
        "TAB" => Token::text("\t"),
        "ENTER" => Token::text("\n"),
        "SPACE" => Token::text(" "),
        "LEFTBRACE" => Token::text("{"),
        "RIGHTBRACE" => Token::text("}"),

        "INSERT" => Token::Special(SpecialKey::Insert),
        "DELETE" => Token::Special(SpecialKey::Delete),
        "HOME" => Token::Special(SpecialKey::Home),
        "END" => Token::Special(SpecialKey::End),
        "PGUP" => Token::Special(SpecialKey::PageUp),
        "PGDN" => Token::Special(SpecialKey::PageDown),
        "BACKSPACE" => Token::Special(SpecialKey::Backspace),
        "CAPSLOCK" => Token::Special(SpecialKey::CapsLock),
        "ESC" => Token::Special(SpecialKey::Escape),
        "UP" => Token::Special(SpecialKey::Up),
        "DOWN" => Token::Special(SpecialKey::Down),
        "LEFT" => Token::Special(SpecialKey::Left),
        "RIGHT" => Token::Special(SpecialKey::Right),

        "TITLE" => Token::Title,
        "USERNAME" => Token::Username,
        "PASSWORD" => Token::Password,
        "TOTP" => Token::Totp,

        _ => parse_parameterized(name).unwrap_or_else(|| Token::Unknown(raw.to_string())),
    }
}

/// Directives that carry an argument: `S:<name>`, `DELAY <ms>`, `DELAY=<ms>`, `F<n>`
fn parse_parameterized(name: &str) -> Option<Token> {
    if let Some(key) = name.strip_prefix("S:") {
        return Some(Token::Attribute(key.to_string()));
    }
    if let Some(ms) = name.strip_prefix("DELAY=") {
        return parse_millis(ms).map(Token::SetDelay);
    }
    if let Some(ms) = name.strip_prefix("DELAY ") {
        return parse_millis(ms).map(Token::Delay);
    }
    if let Some(number) = name.strip_prefix('F') {
        return parse_function_key(number).map(Token::Function);
    }
    None
}

fn parse_millis(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn parse_function_key(value: &str) -> Option<u8> {
    if value.starts_with('0') || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value
        .parse::<u8>()
        .ok()
        .filter(|n| (1..=MAX_FUNCTION_KEY).contains(n))
}
