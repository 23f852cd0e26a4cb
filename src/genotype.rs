//! Translation of PED allele symbols into numeric Genepop / STRUCTURE codes.

use std::str::FromStr;

use thiserror::Error;

/// A single allele call as written in a `.ped` genotype field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Allele {
    A,
    B,
    Missing,
}

impl FromStr for Allele {
    type Err = GenotypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "0" => Ok(Self::Missing),
            other => Err(GenotypeError::UnknownAllele(other.to_string())),
        }
    }
}

/// Numeric allele coding used by an output format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlleleCoding {
    /// Three-digit codes: `001`, `002`, missing `000`.
    Genepop,
    /// Single-digit codes: `1`, `2`, missing `9`.
    Structure,
}

impl AlleleCoding {
    pub fn code(self, allele: Allele) -> &'static str {
        match (self, allele) {
            (Self::Genepop, Allele::A) => "001",
            (Self::Genepop, Allele::B) => "002",
            (Self::Genepop, Allele::Missing) => "000",
            (Self::Structure, Allele::A) => "1",
            (Self::Structure, Allele::B) => "2",
            (Self::Structure, Allele::Missing) => "9",
        }
    }

    /// Translate both alleles of a genotype string such as `"A B"`.
    pub fn translate(self, genotype: &str) -> Result<[&'static str; 2], GenotypeError> {
        let (first, second) = parse_genotype(genotype)?;
        Ok([self.code(first), self.code(second)])
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenotypeError {
    #[error("unknown allele symbol '{0}' (expected A, B or 0)")]
    UnknownAllele(String),
    #[error("genotype '{0}' is not two space-separated alleles")]
    Malformed(String),
}

/// Split a genotype string into its two alleles.
pub fn parse_genotype(genotype: &str) -> Result<(Allele, Allele), GenotypeError> {
    let mut parts = genotype.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Ok((first.parse()?, second.parse()?)),
        _ => Err(GenotypeError::Malformed(genotype.to_string())),
    }
}
