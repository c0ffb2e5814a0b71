//! Card Grade CLI - consensus grading and defect overlays for trading cards.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::grade::GradeArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = match cli.command {
        Some(Commands::Grade(args)) => grade(args),
        Some(Commands::Localize(ref args)) => report(commands::localize::run(args)),
        Some(Commands::Classify(ref args)) => report(commands::classify::run(args).map(|_| ())),
        None => {
            // Default behavior: grade with flattened args
            if cli.grade.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            grade(cli.grade)
        }
    };

    exit_code.into()
}

fn grade(args: GradeArgs) -> ExitCode {
    let args = GradeArgs::with_config(args, &AppConfig::load());
    match commands::grade::run(&args) {
        Ok(result) => {
            info!(
                "Graded {} event(s), {} skipped, {} with low consistency",
                result.processed, result.skipped, result.low_consistency
            );
            result.exit_code
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}

fn report(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
