mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "startrail", about = "All-sky star trail compositor")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a star trail image from a night of frames
    Generate(commands::generate::GenerateArgs),
    /// Show sun and moon positions and the gate verdict for a time
    Sky(commands::sky::SkyArgs),
    /// Print or save the default run configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Sky(args) => commands::sky::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
