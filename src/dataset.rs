//! Fused per-individual, per-marker view of a PED/MAP pair.
//!
//! A [`FusedRecord`] owns a full copy of the marker information for every
//! locus it carries, so records can be filtered and reshaped independently.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    map::{self, MarkerRecord},
    ped::{self, IndividualRecord},
};

/// A marker paired with the genotype one individual carries at it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Locus {
    pub marker: MarkerRecord,
    pub genotype: String,
}

/// Pedigree columns of one individual plus its fused loci.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FusedRecord {
    pub family: String,
    pub individual_id: String,
    pub parent_a: String,
    pub parent_b: String,
    pub sex: String,
    pub phenotype: String,
    pub loci: Vec<Locus>,
}

impl FusedRecord {
    pub fn variant_ids(&self) -> impl Iterator<Item = &str> {
        self.loci.iter().map(|locus| locus.marker.variant_id.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Pedigree(#[from] ped::ParseError),
    #[error(transparent)]
    Map(#[from] map::ParseError),
    #[error("the .ped file contains no individuals")]
    NoIndividuals,
    #[error(
        "Something wrong with number of markers, {loci} loci in .ped file and \
         {markers} variants in .map file. Files might not be from same data."
    )]
    MarkerCountMismatch { loci: usize, markers: usize },
}

/// Check that the first individual carries one genotype per marker.
///
/// Only the first individual is inspected; the rest are assumed to have the
/// same number of genotype columns.
pub fn check_consistency(
    individuals: &[IndividualRecord],
    markers: &[MarkerRecord],
) -> Result<(), DatasetError> {
    let first = individuals.first().ok_or(DatasetError::NoIndividuals)?;
    let loci = first.genotypes.len();
    if loci != markers.len() {
        return Err(DatasetError::MarkerCountMismatch {
            loci,
            markers: markers.len(),
        });
    }
    Ok(())
}

/// Pair each individual's genotypes with the markers, in marker-file order.
pub fn fuse(individuals: Vec<IndividualRecord>, markers: &[MarkerRecord]) -> Vec<FusedRecord> {
    individuals
        .into_iter()
        .map(|individual| {
            let loci = individual
                .genotypes
                .into_iter()
                .zip(markers)
                .map(|(genotype, marker)| Locus {
                    marker: marker.clone(),
                    genotype,
                })
                .collect();
            FusedRecord {
                family: individual.family,
                individual_id: individual.individual_id,
                parent_a: individual.parent_a,
                parent_b: individual.parent_b,
                sex: individual.sex,
                phenotype: individual.phenotype,
                loci,
            }
        })
        .collect()
}

/// Split fused records back into marker and pedigree records.
///
/// Markers come from the first record's loci.
pub fn unfuse(records: &[FusedRecord]) -> (Vec<MarkerRecord>, Vec<IndividualRecord>) {
    let markers = records
        .first()
        .map(|first| first.loci.iter().map(|locus| locus.marker.clone()).collect())
        .unwrap_or_default();

    let individuals = records
        .iter()
        .map(|record| IndividualRecord {
            family: record.family.clone(),
            individual_id: record.individual_id.clone(),
            parent_a: record.parent_a.clone(),
            parent_b: record.parent_b.clone(),
            sex: record.sex.clone(),
            phenotype: record.phenotype.clone(),
            genotypes: record.loci.iter().map(|l| l.genotype.clone()).collect(),
        })
        .collect();

    (markers, individuals)
}

fn load(ped: &Path, map: &Path) -> Result<Vec<FusedRecord>, DatasetError> {
    let individuals = ped::read_path(ped)?;
    let markers = map::read_path(map)?;
    check_consistency(&individuals, &markers)?;
    tracing::debug!(
        individuals = individuals.len(),
        markers = markers.len(),
        "fusing pedigree and marker records"
    );
    Ok(fuse(individuals, &markers))
}

/// A `.ped`/`.map` pair on disk, parsed lazily.
#[derive(Debug, Clone)]
pub struct Dataset {
    ped: PathBuf,
    map: PathBuf,
    fused: Option<Vec<FusedRecord>>,
}

impl Dataset {
    pub fn new<P, M>(ped: P, map: M) -> Self
    where
        P: Into<PathBuf>,
        M: Into<PathBuf>,
    {
        Self {
            ped: ped.into(),
            map: map.into(),
            fused: None,
        }
    }

    /// Parse both files, check they agree and cache the fused records.
    pub fn read(&mut self) -> Result<&[FusedRecord], DatasetError> {
        let fused = self.fused.insert(load(&self.ped, &self.map)?);
        Ok(fused.as_slice())
    }

    /// Fused records from the last successful [`Dataset::read`].
    pub fn records(&self) -> Option<&[FusedRecord]> {
        self.fused.as_deref()
    }

    /// Take ownership of the fused records, reading the files first if needed.
    pub fn into_records(self) -> Result<Vec<FusedRecord>, DatasetError> {
        match self.fused {
            Some(fused) => Ok(fused),
            None => load(&self.ped, &self.map),
        }
    }

    /// Individual IDs in pedigree-file order.
    pub fn individuals(&self) -> Result<Vec<String>, DatasetError> {
        Ok(ped::read_path(&self.ped)?
            .into_iter()
            .map(|record| record.individual_id)
            .collect())
    }

    /// Variant IDs in marker-file order.
    pub fn markers(&self) -> Result<Vec<String>, DatasetError> {
        Ok(map::read_path(&self.map)?
            .into_iter()
            .map(|record| record.variant_id)
            .collect())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ".ped file {} - .map file {}",
            self.ped.display(),
            self.map.display()
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn marker(id: &str) -> MarkerRecord {
        MarkerRecord {
            chromosome: String::from("1"),
            variant_id: id.to_string(),
            position: String::from("0"),
            coordinate: String::from("100"),
        }
    }

    pub(crate) fn individual(id: &str, genotypes: &[&str]) -> IndividualRecord {
        IndividualRecord {
            family: String::from("FAM"),
            individual_id: id.to_string(),
            parent_a: String::from("0"),
            parent_b: String::from("0"),
            sex: String::from("1"),
            phenotype: String::from("-9"),
            genotypes: genotypes.iter().map(|g| g.to_string()).collect(),
        }
    }

    pub(crate) fn sample_records() -> Vec<FusedRecord> {
        let markers = vec![marker("rs1"), marker("rs2"), marker("rs3")];
        fuse(
            vec![
                individual("ind1", &["A A", "A B", "0 0"]),
                individual("ind2", &["B B", "A A", "A B"]),
                individual("ind3", &["A B", "0 0", "B B"]),
            ],
            &markers,
        )
    }

    #[test]
    fn mismatch_reports_both_counts() {
        let markers = vec![marker("rs1"), marker("rs2"), marker("rs3")];
        let individuals = vec![individual("ind1", &["A A", "A B", "0 0", "B B"])];
        let err = check_consistency(&individuals, &markers).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MarkerCountMismatch {
                loci: 4,
                markers: 3
            }
        ));
        let message = err.to_string();
        assert!(message.contains("4 loci"));
        assert!(message.contains("3 variants"));
    }

    #[test]
    fn only_first_individual_is_checked() {
        let markers = vec![marker("rs1")];
        let individuals = vec![individual("ind1", &["A A"]), individual("ind2", &[])];
        assert!(check_consistency(&individuals, &markers).is_ok());
    }

    #[test]
    fn empty_pedigree_is_rejected() {
        let err = check_consistency(&[], &[marker("rs1")]).unwrap_err();
        assert!(matches!(err, DatasetError::NoIndividuals));
    }

    #[test]
    fn fuse_pairs_genotypes_with_markers_in_order() {
        let records = sample_records();
        assert_eq!(records.len(), 3);
        let second = &records[1];
        assert_eq!(second.individual_id, "ind2");
        assert_eq!(
            second.variant_ids().collect::<Vec<_>>(),
            vec!["rs1", "rs2", "rs3"]
        );
        assert_eq!(second.loci[2].genotype, "A B");
    }

    #[test]
    fn fuse_truncates_to_shorter_sequence() {
        let records = fuse(vec![individual("ind1", &["A A", "A B"])], &[marker("rs1")]);
        assert_eq!(records[0].loci.len(), 1);
    }

    #[test]
    fn records_do_not_share_marker_data() {
        let mut records = sample_records();
        records[0].loci[0].marker.variant_id = String::from("changed");
        assert_eq!(records[1].loci[0].marker.variant_id, "rs1");
    }

    #[test]
    fn unfuse_restores_markers_and_genotypes() {
        let records = sample_records();
        let (markers, individuals) = unfuse(&records);
        assert_eq!(markers, vec![marker("rs1"), marker("rs2"), marker("rs3")]);
        assert_eq!(individuals[2], individual("ind3", &["A B", "0 0", "B B"]));
    }

    #[test]
    fn unfuse_of_nothing_is_empty() {
        let (markers, individuals) = unfuse(&[]);
        assert!(markers.is_empty());
        assert!(individuals.is_empty());
    }

    fn write_pair(dir: &Path) -> (PathBuf, PathBuf) {
        let ped = dir.join("pair.ped");
        let map = dir.join("pair.map");
        std::fs::write(&ped, "F\ti1\t0\t0\t1\t0\tA B\n").unwrap();
        std::fs::write(&map, "1\trs1\t0\t100\n").unwrap();
        (ped, map)
    }

    #[test]
    fn into_records_reads_when_nothing_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let (ped, map) = write_pair(dir.path());
        let records = Dataset::new(ped, map).into_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].loci[0].genotype, "A B");
    }

    #[test]
    fn into_records_hands_over_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (ped, map) = write_pair(dir.path());
        let mut dataset = Dataset::new(&ped, &map);
        let cached = dataset.read().unwrap().to_vec();
        std::fs::remove_file(&ped).unwrap();
        assert_eq!(dataset.into_records().unwrap(), cached);
    }

    #[test]
    fn display_names_both_files() {
        let dataset = Dataset::new("data.ped", "data.map");
        assert_eq!(dataset.to_string(), ".ped file data.ped - .map file data.map");
        assert!(dataset.records().is_none());
    }
}
