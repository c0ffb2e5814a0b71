//! Localize command - overlay markers for one side's defect payload.

use std::path::PathBuf;

use anyhow::{Context, Result};
use card_grade_core::engine::localize_side_str;
use card_grade_core::Side;
use clap::{Args, ValueEnum};
use tracing::info;

use crate::output::JsonOutput;

/// Card side, as accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    #[default]
    Front,
    Back,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Front => Self::Front,
            SideArg::Back => Self::Back,
        }
    }
}

#[derive(Args, Clone)]
pub struct LocalizeArgs {
    /// JSON file holding one side's `{corners, edges, surface}` payload
    pub file: PathBuf,

    /// Side the payload belongs to
    #[arg(short, long, value_enum, default_value_t = SideArg::Front)]
    pub side: SideArg,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Run the localize command.
///
/// Content that is not a usable payload produces an empty list.
pub fn run(args: &LocalizeArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let markers = localize_side_str(&raw, args.side.into());
    info!(
        "{} marker(s) for {} side of {}",
        markers.len(),
        Side::from(args.side),
        args.file.display()
    );

    JsonOutput::stdout().write_document(&markers, args.pretty)
}
