//! Structured run report for downstream tool consumption.
//!
//! Writes a JSON file alongside the output describing the inputs, the
//! export and the conversion statistics.

use serde::Serialize;
use std::path::Path;

use crate::conversion::ConversionSummary;
use crate::export::ExportFormat;

/// Complete report of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Tool version
    pub version: String,
    /// Timestamp of run (RFC 3339)
    pub timestamp: String,

    pub input: InputInfo,
    pub output: OutputInfo,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    pub ped: String,
    pub map: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputInfo {
    pub name: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub individuals_read: usize,
    pub markers_read: usize,
    pub individuals_exported: usize,
    pub markers_exported: usize,
    pub missing_individuals: Vec<String>,
    pub missing_markers: Vec<String>,
}

impl From<&ConversionSummary> for Statistics {
    fn from(s: &ConversionSummary) -> Self {
        Statistics {
            individuals_read: s.individuals_read,
            markers_read: s.markers_read,
            individuals_exported: s.individuals_exported,
            markers_exported: s.markers_exported,
            missing_individuals: s.missing_individuals.clone(),
            missing_markers: s.missing_markers.clone(),
        }
    }
}

impl RunReport {
    /// Write the report as JSON next to the output.
    /// For output name `out`, writes `out_report.json`.
    pub fn write(&self, output_name: &Path) -> std::io::Result<()> {
        let mut report_path = output_name.as_os_str().to_owned();
        report_path.push("_report.json");
        let report_path = Path::new(&report_path);

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        std::fs::write(report_path, json)?;
        tracing::info!("Wrote run report to {}", report_path.display());

        Ok(())
    }
}

/// Builder for constructing a RunReport after conversion.
#[derive(Debug, Default)]
pub struct RunReportBuilder {
    pub ped_path: String,
    pub map_path: String,
    pub output_name: String,
    pub format: Option<ExportFormat>,
    pub title: Option<String>,
}

impl RunReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self, summary: &ConversionSummary) -> RunReport {
        let now = time::OffsetDateTime::now_utc();
        let timestamp = now
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        RunReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp,
            input: InputInfo {
                ped: self.ped_path,
                map: self.map_path,
            },
            output: OutputInfo {
                name: self.output_name,
                format: self
                    .format
                    .map_or_else(|| "unknown".to_string(), |f| f.name().to_string()),
                title: self.title,
                files: summary
                    .files_written
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
            },
            statistics: Statistics::from(summary),
        }
    }
}
