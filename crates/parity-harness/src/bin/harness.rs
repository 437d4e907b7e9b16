//! Fixture-generation CLI.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use prompt_parity_exec::DefaultBaseline;
use prompt_parity_harness::{baseline, generate_fixtures};

#[derive(Parser)]
#[command(name = "harness", about = "Prompt parity fixture tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate the golden fixture directory from the baseline engine.
    Generate {
        /// Fixture output directory; wiped and recreated.
        #[arg(long, default_value = "tests/fixtures/prompt_parity")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate { output } => {
            let baseline_root = baseline::resolve_root()?;
            eprintln!("baseline engine: {}", baseline_root.display());
            let summary = generate_fixtures::<DefaultBaseline>(&output)?;
            eprintln!(
                "generated {} fixtures into {}",
                summary.written,
                output.display()
            );
        }
    }
    Ok(())
}
