//! Ballista command-line interface.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ballista")]
#[command(author, version, about = "Render audio files through ballista dynamics and colour effects", long_about = None)]
struct Cli {
    /// Log more (-v for debug, -vv for trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an audio file through one effect
    Process(commands::process::ProcessArgs),

    /// List available effects and their parameters
    Effects(commands::effects::EffectsArgs),

    /// List factory presets
    Presets(commands::presets::PresetsArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Effects(args) => commands::effects::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
