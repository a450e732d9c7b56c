use clap::Parser;
use colored::*;
use scoleco::cli::{commands, Cli, Commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // SCOLECO_LOG sets the default level; RUST_LOG still wins when present
    let default_level = if cli.verbose > 0 { "debug" } else { "info" };
    let log_level = std::env::var("SCOLECO_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<scoleco::ScolecoError>() {
            Some(scoleco::ScolecoError::Config(_)) => 2,
            Some(scoleco::ScolecoError::Io(_)) => 3,
            Some(scoleco::ScolecoError::Parse(_)) | Some(scoleco::ScolecoError::Csv(_)) => 4,
            Some(scoleco::ScolecoError::EmptyReconciledSet { .. })
            | Some(scoleco::ScolecoError::LabelCollision(_)) => 5,
            Some(scoleco::ScolecoError::Tool(_)) => 6,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = commands::resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Reconcile(args) => commands::reconcile::run(args, &config),
        Commands::Diet(args) => commands::diet::run(args, &config),
        Commands::Align(args) => commands::align::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
