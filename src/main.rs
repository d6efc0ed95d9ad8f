use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use lenex_dian_sync::sync;
use lenex_dian_sync::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose)?;
    match cli.command {
        Command::Sync(args) => execute_sync(args),
    }
}

fn execute_sync(args: SyncArgs) -> Result<()> {
    let report = sync::lenex_to_dian(&args.lenex, &args.dian, &args.output)?;
    if let Some(path) = &args.report {
        sync::write_report(&report, path)?;
    }
    println!(
        "{} of {} events matched, written to {}",
        report.matched(),
        report.events.len(),
        args.output.display()
    );
    Ok(())
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|err| ToolError::Logging(err.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Distribute Lenex heats and lanes into a Dian meet file."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy heat and lane assignments from a Lenex file into a Dian file.
    Sync(SyncArgs),
}

#[derive(clap::Args)]
struct SyncArgs {
    /// Dian meet file (.swimming).
    #[arg(long)]
    dian: PathBuf,

    /// Lenex entry list (.lef or .lxf).
    #[arg(long)]
    lenex: PathBuf,

    /// Where to write the updated Dian meet file.
    #[arg(long)]
    output: PathBuf,

    /// Optional path for a JSON summary of matched and unmatched events.
    #[arg(long)]
    report: Option<PathBuf>,
}
