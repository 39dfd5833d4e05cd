//! CLI argument definitions using Clap

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::infrastructure::keyboard::KeyboardPreference;

/// Autotyper - KeePass-style auto-type for Linux desktops
#[derive(Parser, Debug)]
#[command(name = "autotyper")]
#[command(version)]
#[command(about = "Type credentials into the focused window using KeePass auto-type sequences")]
#[command(long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Type an entry into the focused window
    Type(TypeArgs),
    /// Show how a sequence is tokenized
    Parse {
        /// Auto-type sequence, e.g. "{USERNAME}{TAB}{PASSWORD}{ENTER}"
        sequence: String,
    },
    /// Show which virtual keyboard would be used
    Backends {
        /// Keyboard to check (auto, ydotool, wtype)
        #[arg(short = 'k', long, value_name = "KEYBOARD", env = "AUTOTYPER_KEYBOARD")]
        keyboard: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `autotyper type`
#[derive(Args, Debug, Default)]
pub struct TypeArgs {
    /// Auto-type sequence for this entry
    #[arg(short = 's', long, value_name = "SEQUENCE")]
    pub sequence: Option<String>,

    /// Username typed for {USERNAME}
    #[arg(short = 'u', long, value_name = "NAME")]
    pub username: Option<String>,

    /// Read the password from this environment variable
    #[arg(long, value_name = "VAR", conflicts_with = "password_stdin")]
    pub password_env: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,

    /// Custom attribute typed for {S:<KEY>} (repeatable)
    #[arg(short = 'a', long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,

    /// TOTP code typed for {TOTP}
    #[arg(long, value_name = "CODE", conflicts_with = "totp_command")]
    pub totp: Option<String>,

    /// Shell command printing the current TOTP code
    #[arg(long, value_name = "CMD")]
    pub totp_command: Option<String>,

    /// Delay between key events in milliseconds
    #[arg(short = 'd', long, value_name = "MS", env = "AUTOTYPER_KEY_DELAY")]
    pub key_delay: Option<u64>,

    /// Wait before the first keystroke in milliseconds
    #[arg(long, value_name = "MS")]
    pub start_delay: Option<u64>,

    /// Virtual keyboard to use (auto, ydotool, wtype)
    #[arg(short = 'k', long, value_name = "KEYBOARD", env = "AUTOTYPER_KEYBOARD")]
    pub keyboard: Option<String>,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed auto-type options after merging config, env and CLI
#[derive(Debug, Clone)]
pub struct AutoTypeOptions {
    pub key_delay: Duration,
    pub start_delay: Duration,
    pub keyboard: KeyboardPreference,
    pub socket: PathBuf,
    pub default_sequence: String,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "key_delay",
    "start_delay",
    "keyboard",
    "ydotool_socket",
    "default_sequence",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

/// Parse `KEY=VALUE`; the value may itself contain `=`
fn parse_attribute(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn type_args(args: &[&str]) -> TypeArgs {
        let cli = Cli::parse_from(args);
        match cli.command {
            Commands::Type(args) => args,
            other => panic!("Expected Type command, got {:?}", other),
        }
    }

    #[test]
    fn type_parses_defaults() {
        let args = type_args(&["autotyper", "type"]);
        assert!(args.sequence.is_none());
        assert!(args.username.is_none());
        assert!(!args.password_stdin);
        assert!(args.attributes.is_empty());
        assert!(args.totp.is_none());
    }

    #[test]
    fn type_parses_entry_values() {
        let args = type_args(&[
            "autotyper",
            "type",
            "-s",
            "{USERNAME}{ENTER}",
            "-u",
            "alice",
            "--password-env",
            "MY_PASSWORD",
            "-a",
            "pin=12=34",
            "--attr",
            "url=https://example.com",
            "--totp",
            "123456",
        ]);

        assert_eq!(args.sequence.as_deref(), Some("{USERNAME}{ENTER}"));
        assert_eq!(args.username.as_deref(), Some("alice"));
        assert_eq!(args.password_env.as_deref(), Some("MY_PASSWORD"));
        assert_eq!(
            args.attributes,
            vec![
                ("pin".to_string(), "12=34".to_string()),
                ("url".to_string(), "https://example.com".to_string()),
            ]
        );
        assert_eq!(args.totp.as_deref(), Some("123456"));
    }

    #[test]
    fn type_parses_timing_and_keyboard() {
        let args = type_args(&[
            "autotyper",
            "type",
            "-d",
            "25",
            "--start-delay",
            "0",
            "-k",
            "wtype",
        ]);
        assert_eq!(args.key_delay, Some(25));
        assert_eq!(args.start_delay, Some(0));
        assert_eq!(args.keyboard.as_deref(), Some("wtype"));
    }

    #[test]
    fn password_sources_conflict() {
        let result = Cli::try_parse_from([
            "autotyper",
            "type",
            "--password-env",
            "X",
            "--password-stdin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn totp_sources_conflict() {
        let result = Cli::try_parse_from([
            "autotyper",
            "type",
            "--totp",
            "1",
            "--totp-command",
            "echo 1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn attribute_requires_equals() {
        assert!(parse_attribute("novalue").is_err());
        assert!(parse_attribute("=value").is_err());
        assert_eq!(
            parse_attribute("key=").unwrap(),
            ("key".to_string(), String::new())
        );
    }

    #[test]
    fn parses_parse_command() {
        let cli = Cli::parse_from(["autotyper", "parse", "{TAB}"]);
        assert!(matches!(cli.command, Commands::Parse { ref sequence } if sequence == "{TAB}"));
    }

    #[test]
    fn parses_verbosity_after_subcommand() {
        let cli = Cli::parse_from(["autotyper", "parse", "x", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["autotyper", "config", "set", "keyboard", "wtype"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "keyboard");
            assert_eq!(value, "wtype");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("key_delay"));
        assert!(is_valid_config_key("ydotool_socket"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
