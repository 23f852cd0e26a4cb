use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use thiserror::Error;

use crate::lines::Lines;

/// One variant line of a `.map` file.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MarkerRecord {
    pub chromosome: String,
    pub variant_id: String,
    pub position: String,
    pub coordinate: String,
}

/// Writes the standard PLINK column order: chromosome, ID, position, coordinate.
impl fmt::Display for MarkerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.chromosome, self.variant_id, self.position, self.coordinate
        )
    }
}

/// Iterator over markers in a `.map` file.
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
    type Item = Result<MarkerRecord, ParseError>;

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

#[derive(Debug, Error)]
#[error(".map line {line}: {kind}")]
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
        "expected exactly 4 tab-delimited fields, found {0}; \
         check whether the .ped and .map files have been inverted"
    )]
    FieldCount(usize),
}

pub fn read_path<P>(path: P) -> Result<Vec<MarkerRecord>, ParseError>
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

fn parse_record(line: &str) -> Result<MarkerRecord, ParseErrorKind> {
    let fields: Vec<&str> = line.split('\t').collect();
    let &[chromosome, variant_id, position, coordinate] = fields.as_slice() else {
        return Err(ParseErrorKind::FieldCount(fields.len()));
    };

    Ok(MarkerRecord {
        chromosome: chromosome.to_string(),
        variant_id: variant_id.to_string(),
        position: position.to_string(),
        coordinate: coordinate.to_string(),
    })
}
