//! CLI command definitions and handlers.

pub mod classify;
pub mod grade;
pub mod localize;

use clap::{Parser, Subcommand};

/// Card Grade - consensus grading, defect overlays, and condition tiers
#[derive(Parser)]
#[command(name = "card-grade")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Shared grade arguments (paths, consensus settings, output flags).
    #[command(flatten)]
    pub grade: grade::GradeArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Grade event files: aggregate passes, localize defects, classify condition
    Grade(grade::GradeArgs),
    /// Build the overlay marker list for one side's defect payload
    Localize(localize::LocalizeArgs),
    /// Map a grade and defect tally to a condition tier
    Classify(classify::ClassifyArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every event graded with high or moderate consistency.
    Success = 0,
    /// At least one event had low consistency or was skipped.
    Flagged = 1,
    /// Fatal error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
