//! Autotyper - KeePass-style auto-type for Linux desktops
//!
//! This crate parses auto-type sequences such as
//! `{USERNAME}{TAB}{PASSWORD}{ENTER}`, resolves their placeholders against an
//! entry, and types the result into the focused window through a virtual
//! keyboard (the ydotoold socket or `wtype`).
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Sequence tokens, the parser, configuration and errors
//! - **Application**: Placeholder resolution, the auto-type use case and port traits
//! - **Infrastructure**: Virtual keyboard drivers, entry and config adapters
//! - **CLI**: Command-line interface, argument parsing and logging setup

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
