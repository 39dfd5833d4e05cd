//! Command runners for auto-type, parse and backend inspection

use std::env;
use std::process::ExitCode;

use secrecy::SecretString;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::application::{AutoTypeCallbacks, AutoTypeInput, AutoTypeUseCase};
use crate::domain::config::AppConfig;
use crate::domain::sequence::{parse, Token};
use crate::infrastructure::keyboard::{
    select_backend, socket_path, KeyboardBackend, KeyboardPreference, SystemKeyboardProvider,
    ToolProbe,
};
use crate::infrastructure::{CommandLineEntry, TotpSource, XdgConfigStore};

use super::args::{AutoTypeOptions, TypeArgs};
use super::presenter::{format_delay, Presenter};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run `autotyper type`
pub async fn run_autotype(args: TypeArgs) -> ExitCode {
    let mut presenter = Presenter::new();

    let config = load_merged_config(cli_config(&args)).await;
    let options = match resolve_options(&config) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let entry = match build_entry(&args).await {
        Ok(entry) => entry,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    debug!(
        keyboard = %options.keyboard,
        socket = %options.socket.display(),
        "starting auto-type"
    );

    let provider = SystemKeyboardProvider::new(options.keyboard, options.socket.clone());
    let use_case = AutoTypeUseCase::new(provider);

    let input = AutoTypeInput {
        key_delay: options.key_delay,
        start_delay: options.start_delay,
        fallback_sequence: Some(options.default_sequence.clone()),
    };

    let spinner = presenter.start_spinner("Resolving sequence...");
    let waiting = spinner.clone();
    let typing = spinner.clone();
    let callbacks = AutoTypeCallbacks {
        on_resolved: Some(Box::new(move |count| {
            spinner.set_message(format!("Resolved {} tokens", count));
        })),
        on_waiting: Some(Box::new(move |delay| {
            waiting.set_message(format!(
                "Focus the target window, typing in {}...",
                format_delay(delay)
            ));
        })),
        on_typing_start: Some(Box::new(move || {
            typing.set_message("Typing...");
        })),
    };

    let result = use_case.execute(&entry, input, callbacks).await;
    presenter.stop_spinner();

    match result {
        Ok(output) => {
            presenter.success(&format!("Typed {} tokens", output.tokens));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run `autotyper parse`: print one token per line
pub fn run_parse(sequence: &str) -> ExitCode {
    let presenter = Presenter::new();

    let mut unknown = 0;
    let mut placeholders = 0;
    for token in parse(sequence) {
        if matches!(token, Token::Unknown(_)) {
            unknown += 1;
        } else if token.is_placeholder() {
            placeholders += 1;
        }
        presenter.token(&token);
    }

    if placeholders > 0 {
        presenter.info(&format!(
            "{} placeholder(s) are filled from the entry",
            placeholders
        ));
    }
    if unknown > 0 {
        presenter.warn(&format!(
            "{} unrecognized directive(s) will not be typed",
            unknown
        ));
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Run `autotyper backends`: report tool availability and the selection
pub async fn run_backends(keyboard: Option<String>) -> ExitCode {
    let presenter = Presenter::new();

    let config = load_merged_config(AppConfig {
        keyboard,
        ..Default::default()
    })
    .await;
    let options = match resolve_options(&config) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let probe = ToolProbe::new();
    for backend in [KeyboardBackend::Ydotool, KeyboardBackend::Wtype] {
        let tool = backend.required_tool();
        let status = if probe.is_available(tool) {
            "found"
        } else {
            "missing"
        };
        presenter.key_value(&format!("{} ({})", backend, tool), status);
    }

    let socket_status = if options.socket.exists() {
        "present"
    } else {
        "missing"
    };
    presenter.key_value(
        "ydotoold socket",
        &format!("{} ({})", options.socket.display(), socket_status),
    );
    presenter.key_value("preference", &options.keyboard.to_string());

    match select_backend(options.keyboard, &probe) {
        Ok(backend) => {
            presenter.key_value("selected", &backend.to_string());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Config values given on the command line (or via their env vars)
fn cli_config(args: &TypeArgs) -> AppConfig {
    AppConfig {
        key_delay: args.key_delay,
        start_delay: args.start_delay,
        keyboard: args.keyboard.clone(),
        ..Default::default()
    }
}

/// Turn a merged config into validated options
fn resolve_options(config: &AppConfig) -> Result<AutoTypeOptions, String> {
    let keyboard = config
        .keyboard_or_default()
        .parse::<KeyboardPreference>()
        .map_err(|e| e.to_string())?;

    Ok(AutoTypeOptions {
        key_delay: config.key_delay_or_default(),
        start_delay: config.start_delay_or_default(),
        keyboard,
        socket: socket_path(config.ydotool_socket.as_deref()),
        default_sequence: config.default_sequence_or_default().to_string(),
    })
}

/// Assemble the entry to type from the command line
async fn build_entry(args: &TypeArgs) -> Result<CommandLineEntry, String> {
    let password = if let Some(ref var) = args.password_env {
        env::var(var).map_err(|_| format!("Environment variable {} is not set", var))?
    } else if args.password_stdin {
        read_password_line().await?
    } else {
        String::new()
    };

    let mut entry = CommandLineEntry::new(password);

    if let Some(ref username) = args.username {
        entry = entry.with_username(username);
    }
    for (key, value) in &args.attributes {
        entry = entry.with_attribute(key, value);
    }
    if let Some(ref sequence) = args.sequence {
        entry = entry.with_sequence(sequence);
    }

    let totp = match (&args.totp, &args.totp_command) {
        (Some(code), _) => TotpSource::Fixed(SecretString::from(code.clone())),
        (None, Some(command)) => TotpSource::Command(command.clone()),
        (None, None) => TotpSource::None,
    };

    Ok(entry.with_totp(totp))
}

/// Read the first line of stdin, without its line ending
async fn read_password_line() -> Result<String, String> {
    let mut line = String::new();
    BufReader::new(io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|e| format!("Failed to read password from stdin: {}", e))?;

    Ok(strip_line_ending(line))
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Load and merge configuration from file and CLI
///
/// Environment overrides reach this through clap (`AUTOTYPER_*`) and
/// `YDOTOOL_SOCKET` through [`socket_path`].
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::EntryAccessor;
    use std::time::Duration;

    #[test]
    fn strip_line_ending_variants() {
        assert_eq!(strip_line_ending("secret\n".to_string()), "secret");
        assert_eq!(strip_line_ending("secret\r\n".to_string()), "secret");
        assert_eq!(strip_line_ending("secret".to_string()), "secret");
        assert_eq!(strip_line_ending(" spaced \n".to_string()), " spaced ");
    }

    #[test]
    fn resolve_options_defaults() {
        let options = resolve_options(&AppConfig::defaults()).unwrap();
        assert_eq!(options.key_delay, Duration::from_millis(10));
        assert_eq!(options.start_delay, Duration::from_millis(1000));
        assert_eq!(options.keyboard, KeyboardPreference::Auto);
        assert_eq!(options.default_sequence, "{USERNAME}{TAB}{PASSWORD}{ENTER}");
    }

    #[test]
    fn resolve_options_rejects_unknown_keyboard() {
        let config = AppConfig {
            keyboard: Some("xdotool".to_string()),
            ..AppConfig::defaults()
        };
        let err = resolve_options(&config).unwrap_err();
        assert!(err.contains("xdotool"));
    }

    #[test]
    fn cli_values_override_file() {
        let args = TypeArgs {
            key_delay: Some(40),
            keyboard: Some("wtype".to_string()),
            ..Default::default()
        };
        let file = AppConfig {
            key_delay: Some(5),
            start_delay: Some(0),
            ..Default::default()
        };

        let merged = AppConfig::defaults().merge(file).merge(cli_config(&args));
        assert_eq!(merged.key_delay, Some(40));
        assert_eq!(merged.start_delay, Some(0));
        assert_eq!(merged.keyboard.as_deref(), Some("wtype"));
    }

    #[tokio::test]
    async fn build_entry_from_args() {
        let args = TypeArgs {
            username: Some("alice".to_string()),
            attributes: vec![("pin".to_string(), "1234".to_string())],
            sequence: Some("{S:pin}".to_string()),
            totp: Some("654321".to_string()),
            ..Default::default()
        };

        let entry = build_entry(&args).await.unwrap();
        assert_eq!(entry.username(), Some("alice"));
        assert_eq!(entry.password(), "");
        assert_eq!(entry.custom_attribute("pin"), Some("1234"));
        assert_eq!(entry.configured_sequence(), Some("{S:pin}"));
        assert_eq!(entry.current_totp_code().await.unwrap(), "654321");
    }

    #[tokio::test]
    async fn build_entry_missing_password_env() {
        let args = TypeArgs {
            password_env: Some("AUTOTYPER_TEST_SURELY_UNSET_VARIABLE".to_string()),
            ..Default::default()
        };
        let err = build_entry(&args).await.unwrap_err();
        assert!(err.contains("AUTOTYPER_TEST_SURELY_UNSET_VARIABLE"));
    }
}
