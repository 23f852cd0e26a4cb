#![doc = include_str!("../README.md")]

pub mod cli;
pub mod conversion;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod genotype;
mod lines;
pub mod map;
pub mod ped;
pub mod report;
pub mod table;

pub use conversion::{ConversionConfig, ConversionSummary, convert_dataset};
pub use dataset::{Dataset, FusedRecord, Locus};
pub use export::{ExportFormat, ExportOptions, export};
pub use filter::{Selection, Target, select_individuals, select_markers};
