//! Linux input event key codes
//!
//! Values from `/usr/include/linux/input-event-codes.h`, assuming a US
//! keyboard layout on the receiving side.

use crate::domain::sequence::SpecialKey;

/// `KEY_LEFTSHIFT`
pub const KEY_LEFTSHIFT: u16 = 42;

/// Key code for a character that can be typed without modifiers
pub fn char_code(c: char) -> Option<u16> {
    let code = match c {
        '1' => 2,
        '2' => 3,
        '3' => 4,
        '4' => 5,
        '5' => 6,
        '6' => 7,
        '7' => 8,
        '8' => 9,
        '9' => 10,
        '0' => 11,
        '-' => 12,
        '=' => 13,
        '\t' => 15,
        'q' => 16,
        'w' => 17,
        'e' => 18,
        'r' => 19,
        't' => 20,
        'y' => 21,
        'u' => 22,
        'i' => 23,
        'o' => 24,
        'p' => 25,
        '[' => 26,
        ']' => 27,
        '\n' => 28,
        'a' => 30,
        's' => 31,
        'd' => 32,
        'f' => 33,
        'g' => 34,
        'h' => 35,
        'j' => 36,
        'k' => 37,
        'l' => 38,
        ';' => 39,
        '\'' => 40,
        '`' => 41,
        '\\' => 43,
        'z' => 44,
        'x' => 45,
        'c' => 46,
        'v' => 47,
        'b' => 48,
        'n' => 49,
        'm' => 50,
        ',' => 51,
        '.' => 52,
        '/' => 53,
        ' ' => 57,
        _ => return None,
    };
    Some(code)
}

/// Unshifted character sharing a key with a shifted one (`'A'` → `'a'`)
pub fn shifted_base(c: char) -> Option<char> {
    if c.is_ascii_uppercase() {
        return Some(c.to_ascii_lowercase());
    }

    let base = match c {
        '~' => '`',
        '!' => '1',
        '@' => '2',
        '#' => '3',
        '$' => '4',
        '%' => '5',
        '^' => '6',
        '&' => '7',
        '*' => '8',
        '(' => '9',
        ')' => '0',
        '_' => '-',
        '+' => '=',
        '{' => '[',
        '}' => ']',
        ':' => ';',
        '"' => '\'',
        '|' => '\\',
        '<' => ',',
        '>' => '.',
        '?' => '/',
        _ => return None,
    };
    Some(base)
}

/// Key code for a dedicated key
pub fn special_key_code(key: SpecialKey) -> u16 {
    match key {
        SpecialKey::Insert => 110,
        SpecialKey::Delete => 111,
        SpecialKey::Home => 102,
        SpecialKey::End => 107,
        SpecialKey::PageUp => 104,
        SpecialKey::PageDown => 109,
        SpecialKey::Backspace => 14,
        SpecialKey::CapsLock => 58,
        SpecialKey::Escape => 1,
        SpecialKey::Up => 103,
        SpecialKey::Down => 108,
        SpecialKey::Left => 105,
        SpecialKey::Right => 106,
    }
}

/// Key code for `F<n>`; the F-keys live in three separate ranges
pub fn function_key_code(n: u8) -> Option<u16> {
    let n = u16::from(n);
    match n {
        1..=10 => Some(59 + n - 1),
        11..=12 => Some(87 + n - 11),
        13..=24 => Some(183 + n - 13),
        _ => None,
    }
}
