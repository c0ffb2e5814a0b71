//! Grade command - run the full pipeline over grading-event files.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use card_grade_adapters::FsGradingSource;
use card_grade_core::{
    grade_event, AggregatorConfig, Consistency, ConsistencyThresholds, GradingConfig,
    GradingReport, GradingSource, ProgressEvent, ProgressSink, RangePolicy, ReportOutput,
};
use clap::{Args, ValueEnum};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Hardcoded default values for consensus settings.
mod defaults {
    pub use card_grade_core::engine::{
        HIGH_CONSISTENCY_MAX_VARIANCE as HIGH_MAX_VARIANCE,
        MODERATE_CONSISTENCY_MAX_VARIANCE as MODERATE_MAX_VARIANCE,
    };
}

/// Parse and validate a variance cut point (finite, non-negative).
fn parse_variance(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a non-negative number"))
    }
}

fn parse_range_policy(s: &str) -> Result<RangePolicy, String> {
    s.parse()
}

/// Shared arguments for grading.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GradeArgs {
    /// Event files or directories to grade
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Largest final-score variance reported as high consistency
    #[arg(long, value_name = "VARIANCE", value_parser = parse_variance)]
    pub high_variance: Option<f64>,

    /// Largest final-score variance reported as moderate consistency
    #[arg(long, value_name = "VARIANCE", value_parser = parse_variance)]
    pub moderate_variance: Option<f64>,

    /// Out-of-range score handling: reject or warn
    #[arg(long, value_name = "POLICY", value_parser = parse_range_policy)]
    pub range_policy: Option<RangePolicy>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl GradeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        args.high_variance = args.high_variance.or(config.consensus.high_max_variance);
        args.moderate_variance = args
            .moderate_variance
            .or(config.consensus.moderate_max_variance);

        // Invalid policies were already reported by config validation.
        if args.range_policy.is_none() {
            args.range_policy = config
                .consensus
                .range_policy
                .as_deref()
                .and_then(|s| s.parse().ok());
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args
    }

    /// Get the engine configuration with fallbacks to hardcoded defaults.
    fn grading_config(&self) -> GradingConfig {
        GradingConfig {
            aggregator: AggregatorConfig {
                thresholds: ConsistencyThresholds {
                    high_max_variance: self.high_variance.unwrap_or(defaults::HIGH_MAX_VARIANCE),
                    moderate_max_variance: self
                        .moderate_variance
                        .unwrap_or(defaults::MODERATE_MAX_VARIANCE),
                },
                range_policy: self.range_policy.unwrap_or_default(),
            },
        }
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Result of running the grade command.
#[derive(Debug)]
pub struct GradeResult {
    /// Number of events graded.
    pub processed: usize,
    /// Number of events skipped.
    pub skipped: usize,
    /// Number of graded events with low consistency.
    pub low_consistency: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the grade command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &GradeArgs) -> Result<GradeResult> {
    info!("Running grade command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let config = args.grading_config();
    let thresholds = config.aggregator.thresholds;
    if thresholds.high_max_variance > thresholds.moderate_max_variance {
        anyhow::bail!(
            "high variance cut point ({}) exceeds moderate cut point ({})",
            thresholds.high_max_variance,
            thresholds.moderate_max_variance
        );
    }
    debug!("Grading config: {config:?}");

    let source = FsGradingSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout();

    let (result, collected) =
        process_events(&source, &output, &progress_bar, &config, args.format())?;

    // For JSON format, output all reports as one array
    if args.format() == OutputFormat::Json {
        output.write_array(&collected, args.pretty)?;
        output.flush()?;
    }

    Ok(result)
}

/// Grade every event from `source`.
///
/// JSONL reports are streamed to `output` as they complete; JSON reports are
/// collected and returned for the caller to write as one array.
fn process_events(
    source: &dyn GradingSource,
    output: &dyn ReportOutput,
    progress: &dyn ProgressSink,
    config: &GradingConfig,
    format: OutputFormat,
) -> Result<(GradeResult, Vec<GradingReport>)> {
    let total = source.count_hint();
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut low_consistency = 0usize;
    let mut collected: Vec<GradingReport> = Vec::new();

    for (index, event_result) in source.events().enumerate() {
        let event = match event_result {
            Ok(event) => event,
            Err(e) => {
                // Note: error message contains the path via anyhow context
                progress.on_event(ProgressEvent::Skipped {
                    source: format!("event {index}"),
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        progress.on_event(ProgressEvent::Started {
            source: event.source.clone(),
            index,
            total,
        });

        let mut report = match grade_event(&event, config) {
            Ok(report) => report,
            Err(e) => {
                warn!("Failed to grade {}: {e}", event.source);
                progress.on_event(ProgressEvent::Skipped {
                    source: event.source.clone(),
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
        };
        report.graded_at = Some(iso_timestamp());

        if report.aggregate.consistency == Consistency::Low {
            low_consistency += 1;
        }

        progress.on_event(ProgressEvent::Completed {
            report: Box::new(report.clone()),
        });

        match format {
            OutputFormat::Jsonl => output.write(&report)?,
            OutputFormat::Json => collected.push(report),
        }

        processed += 1;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished { processed, skipped });

    let exit_code = if low_consistency > 0 || skipped > 0 {
        ExitCode::Flagged
    } else {
        ExitCode::Success
    };

    Ok((
        GradeResult {
            processed,
            skipped,
            low_consistency,
            exit_code,
        },
        collected,
    ))
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use card_grade_test_support::{
        uniform_pass_json, GradingEventBuilder, MockGradingSource, MockProgressSink,
        MockReportOutput,
    };

    fn args(paths: &[&str]) -> GradeArgs {
        GradeArgs {
            paths: paths.iter().map(PathBuf::from).collect(),
            recursive: false,
            high_variance: None,
            moderate_variance: None,
            range_policy: None,
            progress: false,
            quiet: true,
            format: None,
            pretty: false,
        }
    }

    #[test]
    fn test_parse_variance() {
        assert_eq!(parse_variance("0.75").unwrap(), 0.75);
        assert_eq!(parse_variance("0").unwrap(), 0.0);
        assert!(parse_variance("-1").is_err());
        assert!(parse_variance("inf").is_err());
        assert!(parse_variance("wide").is_err());
    }

    #[test]
    fn test_defaults_without_config() {
        let config = args(&["a"]).grading_config();
        assert_eq!(config, GradingConfig::default());
    }

    #[test]
    fn test_with_config_fills_unset_values() {
        let app: AppConfig = toml::from_str(
            r"
[general]
recursive = true

[consensus]
high_max_variance = 0.2
range_policy = 'warn'

[output]
format = 'json'
pretty = true
",
        )
        .unwrap();

        let merged = GradeArgs::with_config(args(&["a"]), &app);

        assert!(merged.recursive);
        assert!(merged.pretty);
        assert_eq!(merged.format(), OutputFormat::Json);
        let config = merged.grading_config();
        assert_eq!(config.aggregator.thresholds.high_max_variance, 0.2);
        assert_eq!(
            config.aggregator.thresholds.moderate_max_variance,
            defaults::MODERATE_MAX_VARIANCE
        );
        assert_eq!(config.aggregator.range_policy, RangePolicy::Warn);
    }

    #[test]
    fn test_cli_values_beat_config() {
        let app: AppConfig = toml::from_str(
            r"
[consensus]
high_max_variance = 0.2
range_policy = 'warn'

[output]
format = 'json'
",
        )
        .unwrap();

        let mut cli = args(&["a"]);
        cli.high_variance = Some(0.9);
        cli.range_policy = Some(RangePolicy::Reject);
        cli.format = Some(OutputFormat::Jsonl);

        let merged = GradeArgs::with_config(cli, &app);
        let config = merged.grading_config();
        assert_eq!(config.aggregator.thresholds.high_max_variance, 0.9);
        assert_eq!(config.aggregator.range_policy, RangePolicy::Reject);
        assert_eq!(merged.format(), OutputFormat::Jsonl);
    }

    #[test]
    fn test_process_events_streams_jsonl() {
        let events = vec![
            GradingEventBuilder::new(9.0).build("one").unwrap(),
            GradingEventBuilder::with_finals([9.0, 9.5, 9.0]).build("two").unwrap(),
        ];
        let source = MockGradingSource::new(events);
        let output = MockReportOutput::new();
        let progress = MockProgressSink::new();

        let (result, collected) = process_events(
            &source,
            &output,
            &progress,
            &GradingConfig::default(),
            OutputFormat::Jsonl,
        )
        .unwrap();

        assert_eq!(result.processed, 2);
        assert_eq!(result.exit_code, ExitCode::Success);
        assert!(collected.is_empty());
        assert_eq!(output.reports().len(), 2);
        assert!(output.reports()[0].graded_at.is_some());
        assert_eq!(output.flush_count(), 1);
        assert_eq!(progress.completed_count(), 2);
        assert_eq!(progress.finished_counts(), Some((2, 0)));
    }

    #[test]
    fn test_low_consistency_flags_run() {
        let source = MockGradingSource::new(vec![GradingEventBuilder::with_finals([4.0, 7.0, 10.0])
            .build("spread")
            .unwrap()]);
        let output = MockReportOutput::new();
        let progress = MockProgressSink::new();

        let (result, collected) = process_events(
            &source,
            &output,
            &progress,
            &GradingConfig::default(),
            OutputFormat::Json,
        )
        .unwrap();

        assert_eq!(result.low_consistency, 1);
        assert_eq!(result.exit_code, ExitCode::Flagged);
        assert_eq!(collected.len(), 1);
        assert!(output.reports().is_empty());
    }

    #[test]
    fn test_ungradeable_event_is_skipped() {
        let bad = GradingEventBuilder::new(9.0)
            .passes(vec![uniform_pass_json(9.0), uniform_pass_json(12.0), uniform_pass_json(9.0)])
            .build("bad")
            .unwrap();
        let good = GradingEventBuilder::new(9.0).build("good").unwrap();
        let source = MockGradingSource::new(vec![bad, good]);
        let output = MockReportOutput::new();
        let progress = MockProgressSink::new();

        let (result, _) = process_events(
            &source,
            &output,
            &progress,
            &GradingConfig::default(),
            OutputFormat::Jsonl,
        )
        .unwrap();

        assert_eq!(result.processed, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.exit_code, ExitCode::Flagged);
        assert_eq!(progress.skipped_count(), 1);
        assert_eq!(output.reports()[0].source, "good");
    }

    #[test]
    fn test_warn_policy_grades_out_of_range() {
        let event = GradingEventBuilder::new(9.0)
            .passes(vec![uniform_pass_json(9.0), uniform_pass_json(10.5), uniform_pass_json(9.0)])
            .build("warned")
            .unwrap();
        let source = MockGradingSource::new(vec![event]);
        let output = MockReportOutput::new();
        let progress = MockProgressSink::new();
        let config = GradingConfig {
            aggregator: AggregatorConfig {
                range_policy: RangePolicy::Warn,
                ..AggregatorConfig::default()
            },
        };

        let (result, _) =
            process_events(&source, &output, &progress, &config, OutputFormat::Jsonl).unwrap();

        assert_eq!(result.processed, 1);
        assert!(!output.reports()[0].aggregate.range_warnings.is_empty());
    }

    #[test]
    fn test_run_rejects_inverted_cut_points() {
        let mut cli = args(&["a"]);
        cli.high_variance = Some(2.0);
        cli.moderate_variance = Some(1.0);
        assert!(run(&cli).is_err());
    }

    #[test]
    fn test_run_requires_paths() {
        assert!(run(&args(&[])).is_err());
    }

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.len() >= 20);
    }
}
