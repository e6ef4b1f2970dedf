use clap::{Parser, Subcommand};

/// CLI arguments for the mini-bendu binary.
#[derive(Parser, Debug)]
#[command(name = "mini-bendu", version, about = "A demonstration driver for the mini-bendu type checker")]
pub struct CliArgs {
    /// Raise the default log filter to `debug` (set `RUST_LOG` for finer control).
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Type-check the built-in battery of sample programs and print the
    /// result of each one.
    Check {
        /// Only run samples whose name contains this substring.
        #[arg(long)]
        filter: Option<String>,
    },
}
