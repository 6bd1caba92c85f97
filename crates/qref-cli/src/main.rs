//! qref Command-Line Interface
//!
//! Builds the reference circuits and prints their drawings, operators,
//! statevectors and probabilities, with qubit 0 as the least significant bit
//! throughout.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{order, state, version, walkthrough};
use config::DisplayConfig;

/// qref - qubit ordering, registers, operators and statevectors
#[derive(Parser)]
#[command(name = "qref")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML display configuration
    #[arg(short, long, global = true, env = "QREF_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the reference circuits and print every step
    Walkthrough,

    /// Print a statevector and its probabilities
    State {
        /// Basis label, e.g. 011 or +1- (leftmost character is the highest qubit)
        #[arg(short, long, conflicts_with = "int")]
        label: Option<String>,

        /// Basis index
        #[arg(short, long, requires = "dims")]
        int: Option<usize>,

        /// Space dimension for --int (power of two)
        #[arg(short, long)]
        dims: Option<usize>,

        /// Also sample this many shots
        #[arg(short, long)]
        shots: Option<usize>,
    },

    /// Print the index to basis-label table
    Order {
        /// Number of qubits
        #[arg(short, long, default_value = "3")]
        qubits: usize,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = DisplayConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Walkthrough => walkthrough::execute(&config, cli.format),
        Commands::State {
            label,
            int,
            dims,
            shots,
        } => state::execute(&config, cli.format, label.as_deref(), int, dims, shots),
        Commands::Order { qubits } => order::execute(qubits, cli.format),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
