//! Autotyper CLI entry point

use std::process::ExitCode;

use clap::Parser;

use autotyper::cli::{
    app::{run_autotype, run_backends, run_parse, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    setup_logging,
};
use autotyper::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Type(args) => run_autotype(args).await,
        Commands::Parse { sequence } => run_parse(&sequence),
        Commands::Backends { keyboard } => run_backends(keyboard).await,
        Commands::Config { action } => {
            let presenter = Presenter::new();
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
    }
}
