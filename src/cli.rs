use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{
    ConversionConfig, ConversionSummary, Dataset, ExportFormat, convert_dataset, filter::Target,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Convert PLINK PED/MAP files to CSV, Genepop or STRUCTURE",
    long_about = None
)]
struct Cli {
    /// Pedigree/genotype file (.ped)
    #[arg(value_name = "PED")]
    ped: PathBuf,

    /// Marker information file (.map)
    #[arg(value_name = "MAP")]
    map: PathBuf,

    /// Output name; the format's extension is appended
    #[arg(
        value_name = "OUTPUT",
        required_unless_present_any = ["list_individuals", "list_markers"]
    )]
    output: Option<PathBuf>,

    /// Output file format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Title line written at the top of Genepop output
    #[arg(long)]
    title: Option<String>,

    /// JSON list of individual IDs to keep, e.g. '["ind1","ind2"]'
    #[arg(long, value_name = "JSON")]
    individuals: Option<String>,

    /// JSON list of variant IDs to keep, e.g. '["rs1","rs2"]'
    #[arg(long, value_name = "JSON")]
    markers: Option<String>,

    /// Write <OUTPUT>_report.json describing the run
    #[arg(long)]
    report: bool,

    /// Print the individual IDs of the .ped file and exit
    #[arg(long)]
    list_individuals: bool,

    /// Print the variant IDs of the .map file and exit
    #[arg(long)]
    list_markers: bool,

    /// Logging verbosity (e.g. error, warn, info, debug)
    #[arg(long, default_value = "info")]
    log_level: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    if cli.list_individuals || cli.list_markers {
        let dataset = Dataset::new(&cli.ped, &cli.map);
        if cli.list_individuals {
            let ids = dataset
                .individuals()
                .with_context(|| format!("failed to list individuals of {dataset}"))?;
            print_ids(&ids, "individuals");
        }
        if cli.list_markers {
            let ids = dataset
                .markers()
                .with_context(|| format!("failed to list markers of {dataset}"))?;
            print_ids(&ids, "markers");
        }
        return Ok(());
    }

    let Some(output) = cli.output.clone() else {
        anyhow::bail!("an OUTPUT name is required for conversion");
    };
    if cli.format == ExportFormat::Genepop && cli.title.is_none() {
        anyhow::bail!("--title is required for genepop output");
    }

    let config = ConversionConfig {
        ped: cli.ped.clone(),
        map: cli.map.clone(),
        output,
        format: cli.format,
        title: cli.title.clone(),
        individuals: parse_target(cli.individuals.as_deref(), "--individuals")?,
        markers: parse_target(cli.markers.as_deref(), "--markers")?,
        write_report: cli.report,
    };

    let summary = convert_dataset(config)?;
    print_summary(&summary);

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
    Ok(())
}

fn parse_target(raw: Option<&str>, flag: &str) -> Result<Option<Target>> {
    raw.map(|raw| Target::parse_json(raw).with_context(|| format!("invalid {flag} value")))
        .transpose()
}

fn print_ids(ids: &[String], kind: &str) {
    for id in ids {
        println!("{id}");
    }
    println!("There are {} {kind}", ids.len());
}

fn print_summary(summary: &ConversionSummary) {
    println!(
        "Read {individuals} individuals and {markers} markers; exported {out_ind} individuals and {out_mark} markers.",
        individuals = summary.individuals_read,
        markers = summary.markers_read,
        out_ind = summary.individuals_exported,
        out_mark = summary.markers_exported,
    );

    if !summary.missing_individuals.is_empty() {
        println!(
            "The individual(s) {:?} from target could not be found in available data",
            summary.missing_individuals
        );
    }

    if !summary.missing_markers.is_empty() {
        println!(
            "The marker(s) {:?} from target could not be found in available data",
            summary.missing_markers
        );
    }

    for path in &summary.files_written {
        println!("Wrote {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TargetError;

    #[test]
    fn parses_positional_files_and_format() {
        let cli = Cli::parse_from([
            "pedmap_convert",
            "data.ped",
            "data.map",
            "out",
            "--format",
            "genepop",
            "--title",
            "My populations",
        ]);
        assert_eq!(cli.ped, PathBuf::from("data.ped"));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.format, ExportFormat::Genepop);
        assert_eq!(cli.title.as_deref(), Some("My populations"));
    }

    #[test]
    fn ped_map_format_tag_is_accepted() {
        let cli = Cli::parse_from([
            "pedmap_convert",
            "a.ped",
            "a.map",
            "out",
            "--format",
            "ped_map",
        ]);
        assert_eq!(cli.format, ExportFormat::PedMap);
    }

    #[test]
    fn listing_does_not_need_output() {
        let cli =
            Cli::try_parse_from(["pedmap_convert", "a.ped", "a.map", "--list-markers"]).unwrap();
        assert!(cli.list_markers);
        assert!(cli.output.is_none());
    }

    #[test]
    fn conversion_needs_output() {
        assert!(Cli::try_parse_from(["pedmap_convert", "a.ped", "a.map"]).is_err());
    }

    #[test]
    fn target_flags_are_validated() {
        assert!(parse_target(Some(r#""ind1""#), "--individuals").is_err());
        let target = parse_target(Some(r#"["ind1"]"#), "--individuals").unwrap();
        assert_eq!(target.unwrap().ids(), ["ind1"]);
        assert!(parse_target(None, "--markers").unwrap().is_none());
    }

    #[test]
    fn unquoted_individual_is_reported_as_bare_string() {
        let cli = Cli::parse_from([
            "pedmap_convert",
            "a.ped",
            "a.map",
            "out",
            "--individuals",
            "ind1",
        ]);
        let err = parse_target(cli.individuals.as_deref(), "--individuals").unwrap_err();
        assert_eq!(
            err.downcast_ref::<TargetError>(),
            Some(&TargetError::BareString)
        );
        assert!(format!("{err:#}").contains("instead of a list of strings"));
    }
}
