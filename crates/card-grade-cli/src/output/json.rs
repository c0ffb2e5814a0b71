//! JSON output adapter.

use anyhow::Result;
use card_grade_core::{GradingReport, ReportOutput};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Mutex;

/// JSON Lines output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes any serializable value as a single JSON document.
    ///
    /// Used for report arrays, overlay lists, and other one-shot outputs.
    pub fn write_document<T: Serialize + ?Sized>(&self, value: &T, pretty: bool) -> Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        self.write_line(&json)
    }

    /// Writes a batch of reports as a JSON array.
    pub fn write_array(&self, reports: &[GradingReport], pretty: bool) -> Result<()> {
        self.write_document(reports, pretty)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

impl ReportOutput for JsonOutput {
    fn write(&self, report: &GradingReport) -> Result<()> {
        let json = serde_json::to_string(report)?;
        self.write_line(&json)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
