//! # Platter CLI Library
//!
//! Argument parsing, logging setup and the run loop for the `platter`
//! binary.
//!
//! ## Module Organization
//! ```text
//! platter_cli/
//! ├── lib.rs          ◄─── You are here (Cli, run, logging)
//! ├── console.rs      ◄─── Notices to stderr
//! ├── error.rs        ◄─── CliError with codes and exit statuses
//! └── commands/
//!     ├── mod.rs      ◄─── Report, dispatch
//!     ├── auth.rs     ◄─── Account commands
//!     ├── cart.rs     ◄─── Cart commands
//!     ├── order.rs    ◄─── Orders and checkout
//!     └── config.rs   ◄─── Config file commands
//! ```

pub mod commands;
pub mod console;
pub mod error;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use platter_client::{AppContext, ClientConfig, Notifier};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::config::ConfigCommand;
use commands::{Command, Report};
use console::ConsoleNotifier;
use error::{CliError, CliResult};

/// Command-line client for the Platter food-ordering service.
#[derive(Debug, Parser)]
#[command(name = "platter", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "PLATTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress notices on stderr
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: TopLevel,
}

#[derive(Debug, Subcommand)]
pub enum TopLevel {
    #[command(flatten)]
    Store(Command),

    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Parses arguments, runs one command and prints its result.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  1. Initialize Logging                                                  │
/// │     • tracing-subscriber with env filter on stderr                      │
/// │     • Default: warn, override with RUST_LOG                             │
/// │                                                                         │
/// │  2. Load Config                                                         │
/// │     • --config / PLATTER_CONFIG, else platform config dir               │
/// │     • PLATTER_* environment overrides                                   │
/// │                                                                         │
/// │  3. Build AppContext                                                    │
/// │     • HTTP transport with cookie jar                                    │
/// │     • Storage backend, persisted user + cart restored                   │
/// │                                                                         │
/// │  4. Execute Command                                                     │
/// │     • Notices to stderr while it runs                                   │
/// │     • Report to stdout, exit status from the error code                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    debug!(json = cli.json, quiet = cli.quiet, "Parsed arguments");

    let notifier = Arc::new(ConsoleNotifier::new(cli.quiet));
    let outcome = dispatch(cli.command, cli.config, notifier.clone()).await;

    match outcome.and_then(|report| report.render(cli.json)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err, cli.json, notifier.errors_shown() > 0);
            err.exit_code()
        }
    }
}

async fn dispatch(
    command: TopLevel,
    config_path: Option<PathBuf>,
    notifier: Arc<ConsoleNotifier>,
) -> CliResult<Report> {
    match command {
        TopLevel::Config(command) => commands::config::execute(command, config_path),
        TopLevel::Store(command) => {
            let config = ClientConfig::load(config_path)?;
            let notifier: Arc<dyn Notifier> = notifier;
            let ctx = AppContext::from_config(config, notifier).await?;
            info!("Context ready");
            commands::execute(&ctx, command).await
        }
    }
}

/// Prints a failure unless a notice already said it.
fn report_error(err: &CliError, as_json: bool, already_shown: bool) {
    if as_json {
        match serde_json::to_string_pretty(err) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("✗ {err}"),
        }
    } else if !already_shown {
        eprintln!("✗ {err}");
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=platter_client=trace` - Trace store actions and requests
/// - Default: WARN
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,sqlx=error"));

    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use commands::cart::CartCommand;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from([
            "platter", "--json", "cart", "add", "--id", "m1", "--name", "Dosa", "--price", "80",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            TopLevel::Store(Command::Cart(CartCommand::Add { id, price, .. })) => {
                assert_eq!(id, "m1");
                assert_eq!(price, 80);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_reset_password() {
        let cli = Cli::try_parse_from([
            "platter",
            "reset-password",
            "tok123",
            "--password",
            "newsecret",
        ])
        .unwrap();

        match cli.command {
            TopLevel::Store(Command::ResetPassword(args)) => {
                assert_eq!(args.token, "tok123");
                assert_eq!(args.password, "newsecret");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["platter", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            TopLevel::Config(ConfigCommand::Init { force: true })
        ));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["platter", "teleport"]).is_err());
    }
}
