//! JSON-lines export of status reports.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::report::StatusReport;

/// Appends one JSON object per report to a file.
pub struct JsonLinesExporter {
    writer: BufWriter<File>,
}

impl JsonLinesExporter {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Write a report and flush it so a crash loses at most the current line.
    pub fn write(&mut self, report: &StatusReport) -> Result<()> {
        serde_json::to_writer(&mut self.writer, report)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegkeeper_model::{assess, PegParameters, SupplySnapshot};
    use rust_decimal_macros::dec;

    #[test]
    fn test_appends_one_line_per_report() {
        let path = std::env::temp_dir().join(format!("pegkeeper-export-{}.jsonl", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let snapshot = SupplySnapshot::new(dec!(10), dec!(121), 42).unwrap();
        let health = assess(&snapshot, &PegParameters::default()).unwrap();
        let report = StatusReport {
            tick: 1,
            snapshot,
            health,
            pool: None,
        };

        let mut exporter = JsonLinesExporter::open(&path).unwrap();
        exporter.write(&report).unwrap();
        exporter.write(&StatusReport { tick: 2, ..report.clone() }).unwrap();
        drop(exporter);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: StatusReport = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.tick, 2);
        assert_eq!(parsed.health.status, report.health.status);
        assert!(lines[0].contains("\"status\":\"healthy\""));

        std::fs::remove_file(&path).unwrap();
    }
}
