//! Auto-type sequences: token model and parser

pub mod parser;
pub mod token;

pub use parser::{parse, Tokens, DEFAULT_SEQUENCE};
pub use token::{ModifierAction, ModifierKey, SpecialKey, Token};
