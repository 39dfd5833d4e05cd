//! Entry adapters

mod command_line;

pub use command_line::{CommandLineEntry, TotpSource};
