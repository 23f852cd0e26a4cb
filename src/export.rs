//! Writers for the four supported output formats.

use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::ValueEnum;
use thiserror::Error;

use crate::{
    dataset::{self, FusedRecord},
    genotype::{AlleleCoding, GenotypeError},
    table::{self, LongRow, WideTable},
};

/// Supported output formats.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    /// PLINK text pair (.ped + .map).
    #[value(name = "ped_map", alias = "ped-map")]
    PedMap,
    /// Semicolon-delimited individual x marker table (.csv).
    Csv,
    /// Genepop input file (.txt).
    Genepop,
    /// STRUCTURE input file (.str).
    Structure,
}

impl ExportFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::PedMap => "ped_map",
            Self::Csv => "csv",
            Self::Genepop => "genepop",
            Self::Structure => "structure",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ped_map" | "ped-map" => Ok(Self::PedMap),
            "csv" => Ok(Self::Csv),
            "genepop" => Ok(Self::Genepop),
            "structure" => Ok(Self::Structure),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Per-export settings that are not part of the data.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Title line for Genepop output.
    pub title: Option<String>,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Called an unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("File name should be a string: {0:?}")]
    InvalidName(PathBuf),
    #[error("a title line is required for genepop output")]
    MissingTitle,
    #[error("cannot translate genotype of individual {individual} at marker {marker}")]
    Genotype {
        individual: String,
        marker: String,
        #[source]
        source: GenotypeError,
    },
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write delimited table to {path}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Export `records` as `format`, deriving file names from `name`.
///
/// Returns the paths written.
pub fn export(
    records: &[FusedRecord],
    format: ExportFormat,
    name: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    let stem = output_stem(name)?;
    tracing::info!(format = %format, name = stem, records = records.len(), "exporting");

    match format {
        ExportFormat::PedMap => export_ped_map(records, stem),
        ExportFormat::Csv => export_csv(records, stem).map(|path| vec![path]),
        ExportFormat::Genepop => {
            let title = options.title.as_deref().ok_or(ExportError::MissingTitle)?;
            export_genepop(records, stem, title).map(|path| vec![path])
        }
        ExportFormat::Structure => export_structure(records, stem).map(|path| vec![path]),
    }
}

fn output_stem(name: &Path) -> Result<&str, ExportError> {
    match name.to_str() {
        Some(stem) if !stem.is_empty() => Ok(stem),
        _ => Err(ExportError::InvalidName(name.to_path_buf())),
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn table_error(path: &Path) -> impl FnOnce(csv::Error) -> ExportError + '_ {
    move |source| ExportError::Table {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `<stem>.map` and `<stem>.ped`.
pub fn export_ped_map(records: &[FusedRecord], stem: &str) -> Result<Vec<PathBuf>, ExportError> {
    let (markers, individuals) = dataset::unfuse(records);

    let map_path = PathBuf::from(format!("{stem}.map"));
    let mut map = create(&map_path)?;
    for marker in &markers {
        writeln!(map, "{marker}").map_err(io_error(&map_path))?;
    }
    map.flush().map_err(io_error(&map_path))?;

    let ped_path = PathBuf::from(format!("{stem}.ped"));
    let mut ped = create(&ped_path)?;
    for individual in &individuals {
        writeln!(ped, "{individual}").map_err(io_error(&ped_path))?;
    }
    ped.flush().map_err(io_error(&ped_path))?;

    Ok(vec![map_path, ped_path])
}

/// Write `<stem>.csv`: individuals x markers, `;`-delimited.
pub fn export_csv(records: &[FusedRecord], stem: &str) -> Result<PathBuf, ExportError> {
    let path = PathBuf::from(format!("{stem}.csv"));
    let wide = WideTable::pivot_joined(table::long_rows(records));
    wide.write_delimited(create(&path)?, b';')
        .map_err(table_error(&path))?;
    Ok(path)
}

/// Translate every genotype with `coding`, keeping individual/marker context for errors.
fn translated_rows(
    records: &[FusedRecord],
    coding: AlleleCoding,
) -> Result<Vec<LongRow<[String; 2]>>, ExportError> {
    table::long_rows(records)
        .into_iter()
        .map(|row| match coding.translate(&row.value) {
            Ok([first, second]) => Ok(LongRow {
                value: [first.to_string(), second.to_string()],
                individual: row.individual,
                marker: row.marker,
            }),
            Err(source) => Err(ExportError::Genotype {
                individual: row.individual,
                marker: row.marker,
                source,
            }),
        })
        .collect()
}

/// Build the Genepop body: one concatenated code per individual and marker.
pub fn genepop_table(records: &[FusedRecord]) -> Result<WideTable<String>, ExportError> {
    let rows = translated_rows(records, AlleleCoding::Genepop)?
        .into_iter()
        .map(|row| LongRow {
            individual: row.individual,
            marker: row.marker,
            value: row.value.concat(),
        });
    Ok(WideTable::pivot_joined(rows))
}

/// Write `<stem>.txt` in Genepop layout.
pub fn export_genepop(
    records: &[FusedRecord],
    stem: &str,
    title: &str,
) -> Result<PathBuf, ExportError> {
    let wide = genepop_table(records)?;
    let path = PathBuf::from(format!("{stem}.txt"));
    let mut out = create(&path)?;

    writeln!(out, "Title line: \"{title}\"").map_err(io_error(&path))?;
    for marker in wide.columns() {
        writeln!(out, "{marker}").map_err(io_error(&path))?;
    }
    writeln!(out, "Pop").map_err(io_error(&path))?;

    let mut body = csv::WriterBuilder::new()
        .delimiter(b' ')
        .from_writer(out);
    for (label, cells) in wide.rows() {
        let fields = [label, ","]
            .into_iter()
            .chain(cells.iter().map(|c| c.as_deref().unwrap_or("")));
        body.write_record(fields).map_err(table_error(&path))?;
    }
    body.flush().map_err(io_error(&path))?;
    Ok(path)
}

/// Build the STRUCTURE body: two single-allele codes per individual and marker.
pub fn structure_table(records: &[FusedRecord]) -> Result<WideTable<[String; 2]>, ExportError> {
    let rows = translated_rows(records, AlleleCoding::Structure)?;
    Ok(WideTable::pivot(rows, |existing, [first, second]| {
        existing[0].push(' ');
        existing[0].push_str(&first);
        existing[1].push(' ');
        existing[1].push_str(&second);
    }))
}

/// Write `<stem>.str` in STRUCTURE layout.
pub fn export_structure(records: &[FusedRecord], stem: &str) -> Result<PathBuf, ExportError> {
    let wide = structure_table(records)?;
    let path = PathBuf::from(format!("{stem}.str"));
    let mut out = create(&path)?;

    writeln!(out, "{}", wide.columns().join(" ")).map_err(io_error(&path))?;

    let mut body = csv::WriterBuilder::new()
        .delimiter(b' ')
        .from_writer(out);
    for (label, cells) in wide.rows() {
        let fields = std::iter::once(label).chain(cells.iter().flat_map(|cell| match cell {
            Some([first, second]) => [first.as_str(), second.as_str()],
            None => ["", ""],
        }));
        body.write_record(fields).map_err(table_error(&path))?;
    }
    body.flush().map_err(io_error(&path))?;
    Ok(path)
}
