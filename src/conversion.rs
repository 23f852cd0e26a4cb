use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::{
    dataset::Dataset,
    export::{self, ExportFormat, ExportOptions},
    filter::{self, Target},
    report::RunReportBuilder,
};

/// Configuration required to drive a conversion.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    pub ped: PathBuf,
    pub map: PathBuf,
    /// Output name without extension; each format appends its own.
    pub output: PathBuf,
    pub format: ExportFormat,
    pub title: Option<String>,
    pub individuals: Option<Target>,
    pub markers: Option<Target>,
    pub write_report: bool,
}

/// Counts and diagnostics gathered during a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub individuals_read: usize,
    pub markers_read: usize,
    pub individuals_exported: usize,
    pub markers_exported: usize,
    pub missing_individuals: Vec<String>,
    pub missing_markers: Vec<String>,
    pub files_written: Vec<PathBuf>,
}

/// Read, filter and export a PED/MAP pair.
pub fn convert_dataset(config: ConversionConfig) -> Result<ConversionSummary> {
    tracing::info!(
        ped = %config.ped.display(),
        map = %config.map.display(),
        output = %config.output.display(),
        format = %config.format,
        "starting conversion",
    );

    let dataset = Dataset::new(&config.ped, &config.map);
    let label = dataset.to_string();
    let mut records = dataset
        .into_records()
        .with_context(|| format!("failed to read {label}"))?;

    let mut summary = ConversionSummary {
        individuals_read: records.len(),
        markers_read: records.first().map_or(0, |r| r.loci.len()),
        ..ConversionSummary::default()
    };

    if let Some(target) = &config.individuals {
        let selection = filter::select_individuals(target, &records);
        records = selection.records;
        summary.missing_individuals = selection.missing;
    }
    if let Some(target) = &config.markers {
        let selection = filter::select_markers(target, &records);
        records = selection.records;
        summary.missing_markers = selection.missing;
    }
    summary.individuals_exported = records.len();
    summary.markers_exported = records.first().map_or(0, |r| r.loci.len());

    let options = ExportOptions {
        title: config.title.clone(),
    };
    summary.files_written = export::export(&records, config.format, &config.output, &options)
        .with_context(|| format!("failed to export {}", config.output.display()))?;

    if config.write_report {
        let report = RunReportBuilder {
            ped_path: config.ped.display().to_string(),
            map_path: config.map.display().to_string(),
            output_name: config.output.display().to_string(),
            format: Some(config.format),
            title: config.title.clone(),
        }
        .build(&summary);
        report
            .write(&config.output)
            .with_context(|| "failed to write run report")?;
    }

    tracing::info!(
        individuals = summary.individuals_exported,
        markers = summary.markers_exported,
        files = summary.files_written.len(),
        "conversion finished",
    );

    Ok(summary)
}
