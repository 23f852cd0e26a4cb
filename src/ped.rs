use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use thiserror::Error;

use crate::lines::Lines;

/// Number of leading pedigree columns before the genotype fields start.
pub const PEDIGREE_FIELDS: usize = 6;

/// One line of a `.ped` file: pedigree columns plus per-marker genotypes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndividualRecord {
    pub family: String,
    pub individual_id: String,
    pub parent_a: String,
    pub parent_b: String,
    pub sex: String,
    pub phenotype: String,
    pub genotypes: Vec<String>,
}

impl fmt::Display for IndividualRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.family,
            self.individual_id,
            self.parent_a,
            self.parent_b,
            self.sex,
            self.phenotype
        )?;
        for genotype in &self.genotypes {
            write!(f, "\t{genotype}")?;
        }
        Ok(())
    }
}

/// Iterator over individuals in a pedigree file.
pub struct Reader<R> {
    lines: Lines<R>,
}

impl<R> Reader<R>
where
    R: BufRead,
{
    pub fn new(inner: R) -> Self {
        Self {
            lines: Lines::new(inner),
        }
    }
}

impl<R> Iterator for Reader<R>
where
    R: BufRead,
{
    type Item = Result<IndividualRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, read) = self.lines.next_line()?;
        Some(match read {
            Ok(raw) => parse_record(raw).map_err(|kind| ParseError {
                line,
                raw: raw.to_string(),
                kind,
            }),
            Err(e) => Err(ParseError {
                line,
                raw: String::new(),
                kind: ParseErrorKind::Io(e),
            }),
        })
    }
}

/// Errors raised while parsing a pedigree line.
#[derive(Debug, Error)]
#[error(".ped line {line}: {kind}")]
pub struct ParseError {
    pub line: u64,
    pub raw: String,
    #[source]
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("I/O error")]
    Io(#[from] io::Error),
    #[error(
        "expected at least 6 tab-delimited fields, found {0}; \
         check whether the .ped and .map files have been inverted"
    )]
    FieldCount(usize),
}

/// Read every individual from a `.ped` file, stopping at the first bad line.
pub fn read_path<P>(path: P) -> Result<Vec<IndividualRecord>, ParseError>
where
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).map_err(|e| ParseError {
        line: 0,
        raw: path.as_ref().display().to_string(),
        kind: ParseErrorKind::Io(e),
    })?;
    Reader::new(BufReader::new(file)).collect()
}

fn parse_record(line: &str) -> Result<IndividualRecord, ParseErrorKind> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < PEDIGREE_FIELDS {
        return Err(ParseErrorKind::FieldCount(fields.len()));
    }

    Ok(IndividualRecord {
        family: fields[0].to_string(),
        individual_id: fields[1].to_string(),
        parent_a: fields[2].to_string(),
        parent_b: fields[3].to_string(),
        sex: fields[4].to_string(),
        phenotype: fields[5].to_string(),
        genotypes: fields[PEDIGREE_FIELDS..]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}
