mod args;
mod samples;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use mini_bendu_checker::{type_check, CheckerOptions, TypeCheckSuccess};
use mini_bendu_types::{display_type, AliasRegistry, Namer, TypeEnvironment, TypeInterner, TypeVarGenerator};
use tracing::info;

use args::{CliArgs, Command};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Check { filter } => run_check(filter.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "mini_bendu=debug" } else { "mini_bendu=info" };
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()))
        .init();
}

fn run_check(filter: Option<&str>) -> Result<()> {
    let all = samples::all();
    let selected: Vec<_> = all
        .iter()
        .filter(|sample| match filter {
            Some(f) => sample.name.contains(f),
            None => true,
        })
        .collect();

    info!(count = selected.len(), "type-checking sample battery");

    let mut failures = 0usize;
    for sample in selected {
        let interner = TypeInterner::new();
        let aliases = AliasRegistry::new();
        let gen = TypeVarGenerator::new();
        let options = CheckerOptions::default();
        let env = TypeEnvironment::empty();

        println!("{}", sample.name.bold());
        println!("  {}", sample.source.dimmed());
        match type_check(&interner, &aliases, &gen, &options, &env, &sample.expr) {
            Ok(TypeCheckSuccess { ty }) => {
                let namer = Namer::new();
                println!("  {} {}", "ok:".green(), display_type(&interner, &namer, ty));
            }
            Err(failure) => {
                failures += 1;
                println!("  {} {}", "error:".red(), failure.render(&interner));
            }
        }
    }

    if failures > 0 {
        println!("\n{} sample(s) reported a type error.", failures);
    }
    Ok(())
}
