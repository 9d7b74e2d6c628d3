//! Cards CLI - card template editor.
//!
//! Provides commands for:
//! - `render`: Render a template and export the preview image
//! - `decode`: Print the structured document extracted from a template
//! - `encode`: Print template markup for a structured document
//! - `title`: Look up a page title and optionally export a card bound to it

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DecodeArgs, EncodeArgs, RenderArgs, TitleArgs};
use output::Output;

/// Cards - card template editor.
#[derive(Parser)]
#[command(name = "cards", version, about)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template and export the preview image.
    Render(RenderArgs),
    /// Print the structured document of a template as JSON.
    Decode(DecodeArgs),
    /// Print template markup for a structured document JSON file.
    Encode(EncodeArgs),
    /// Look up the title of a page.
    Title(TitleArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Decode(args) => args.execute(),
        Commands::Encode(args) => args.execute(),
        Commands::Title(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
