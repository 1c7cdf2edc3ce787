mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, convert, init, outline, stats, validate, ApplyArgs, ConvertArgs, InitArgs, OutlineArgs,
    StatsArgs, ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// Mind-map CLI - inspect, convert and edit mind-map documents
#[derive(Parser, Debug)]
#[command(name = "mindmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter config and document
    Init(InitArgs),

    /// Check documents for structural problems
    Validate(ValidateArgs),

    /// Rewrite a document in the canonical format
    Convert(ConvertArgs),

    /// Print document statistics
    Stats(StatsArgs),

    /// Print a document as an indented outline
    Outline(OutlineArgs),

    /// Replay a JSON list of actions against a document
    Apply(ApplyArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Validate(args) => validate(args, &cwd),
        Command::Convert(args) => convert(args, &cwd),
        Command::Stats(args) => stats(args, &cwd),
        Command::Outline(args) => outline(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
