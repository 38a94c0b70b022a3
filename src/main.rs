mod cli_logger;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stackdiff::{Config, DiffArgs, PrintArgs, diff_command, print_command};
use tracing_subscriber::EnvFilter;

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::cli_logger::CliLogger;

const LOG_ENV: &str = "STACKDIFF_LOG";

#[derive(Debug, Parser)]
#[command(name = "stackdiff", version, about = "Compare call-stack profiles side by side")]
struct Cli {
    /// Emit a JSON report instead of a table.
    #[arg(long, global = true)]
    json: bool,

    /// Disable ANSI colours everywhere.
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (defaults to ./stackdiff.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare a baseline profile against one or more later profiles.
    Diff(DiffArgs),
    /// Render a single profile.
    Print(PrintArgs),
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let logger = CliLogger::new(cli.json, cli.no_color || !std::io::stderr().is_terminal());
    if let Err(err) = run(&cli, &logger) {
        logger.print_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: &Cli, logger: &CliLogger) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_optional(&Config::default_path()),
    };
    tracing::debug!("config: {config:?}");

    let output = match &cli.command {
        Command::Diff(args) => diff_command(&config, args, cli.json, cli.no_color)?,
        Command::Print(args) => print_command(&config, args, cli.json, cli.no_color)?,
    };
    logger.print_output(&output)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
