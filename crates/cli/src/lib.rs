pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use tripquote_core::config::{AppConfig, LoadOptions, LogFormat};
use tripquote_core::ApplicationError;
use uuid::Uuid;

use crate::commands::{config, quote, statuses, trail, transition, CommandResult, EXIT_CONFIG};

#[derive(Debug, Parser)]
#[command(
    name = "tripquote",
    about = "Tripquote travel quote and lead lifecycle CLI",
    long_about = "Price travel packages, validate lead status changes, and replay lead audit trails.",
    after_help = "Examples:\n  tripquote quote --base-price 89999.00 --event-date 2025-06-14 --travel-date 2025-03-01 --travelers 5\n  tripquote transition --from New --to Contacted\n  tripquote statuses --from Interested\n  tripquote config"
)]
pub struct Cli {
    #[arg(long = "config", global = true, help = "Path to a tripquote.toml config file")]
    config_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price a package and auto-advance the lead when a status is given")]
    Quote(quote::QuoteArgs),
    #[command(about = "Validate and record a lead status change")]
    Transition(transition::TransitionArgs),
    #[command(about = "List lead statuses and the transitions each allows")]
    Statuses(statuses::StatusesArgs),
    #[command(about = "Replay a sequence of status changes and print the audit trail")]
    Trail(trail::TrailArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Quote(_) => "quote",
            Self::Transition(_) => "transition",
            Self::Statuses(_) => "statuses",
            Self::Trail(_) => "trail",
            Self::Config => "config",
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config_path.clone(),
        require_file: cli.config_path.is_some(),
        ..LoadOptions::default()
    };
    let app_config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            let interface =
                ApplicationError::from(error).into_interface(Uuid::new_v4().to_string());
            let result = CommandResult::failure_with(
                cli.command.name(),
                "config_validation",
                interface.to_string(),
                EXIT_CONFIG,
                Some(json!({
                    "correlation_id": interface.correlation_id(),
                    "user_message": interface.user_message(),
                })),
            );
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };

    if let Err(error) = init_logging(&app_config) {
        eprintln!("{error}");
    }

    let result = match &cli.command {
        Command::Quote(args) => quote::run(&app_config, args),
        Command::Transition(args) => transition::run(&app_config, args),
        Command::Statuses(args) => statuses::run(args),
        Command::Trail(args) => trail::run(args),
        Command::Config => config::run(&app_config, cli.config_path.as_deref()),
    };

    tracing::debug!(
        event_name = "cli.command.completed",
        command = cli.command.name(),
        exit_code = result.exit_code,
        "command completed"
    );

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays a single JSON document.
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.trim()))
        .map_err(|error| anyhow!("invalid log filter: {error}"))?;

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter);

    let installed = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|error| anyhow!("failed to initialize logging: {error}"))
}
