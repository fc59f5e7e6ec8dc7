use lentil::run_optimize::*;
use lentil::run_significance::*;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fit a core-periphery partition by label switching
    Optimize(OptimizeArgs),

    /// Fit a partition and test it against degree-preserving
    /// randomizations of the graph
    Significance(SignificanceArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.commands {
        Commands::Optimize(args) => {
            run_optimize(args.clone())?;
        }
        Commands::Significance(args) => {
            run_significance(args.clone())?;
        }
    }

    Ok(())
}
