//! Classify command - map a grade and tally to a condition tier.

use std::path::PathBuf;

use anyhow::Result;
use card_grade_adapters::read_json_file;
use card_grade_core::engine::classify_json;
use card_grade_core::ConditionTier;
use clap::Args;
use serde_json::Value;

#[derive(Args, Clone)]
pub struct ClassifyArgs {
    /// Numeric grade on the 1-10 scale; omit for an altered or unauthenticated card
    #[arg(long)]
    pub grade: Option<f64>,

    /// JSON file holding the defect tally; omit for a defect-free card
    #[arg(long, value_name = "FILE")]
    pub tally: Option<PathBuf>,
}

/// Run the classify command, printing the tier label.
pub fn run(args: &ClassifyArgs) -> Result<ConditionTier> {
    let grade = args.grade.map_or(Value::Null, Value::from);
    let tally = match &args.tally {
        Some(path) => read_json_file(path)?,
        None => Value::Null,
    };

    let tier = classify_json(&grade, &tally)?;
    println!("{tier}");
    Ok(tier)
}
