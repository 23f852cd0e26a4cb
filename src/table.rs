//! Long-to-wide reshaping of (individual, marker, value) rows.

use std::{collections::HashMap, io};

use crate::dataset::FusedRecord;

/// Name of the row-label column in wide output.
pub const INDEX_NAME: &str = "ind";

/// One (individual, marker) observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LongRow<T> {
    pub individual: String,
    pub marker: String,
    pub value: T,
}

/// Flatten fused records into one row per (individual, marker) pair.
pub fn long_rows(records: &[FusedRecord]) -> Vec<LongRow<String>> {
    records
        .iter()
        .flat_map(|record| {
            record.loci.iter().map(|locus| LongRow {
                individual: record.individual_id.clone(),
                marker: locus.marker.variant_id.clone(),
                value: locus.genotype.clone(),
            })
        })
        .collect()
}

/// Individuals as rows, markers as columns.
///
/// Rows and columns keep the order in which they first appear in the long
/// table. A cell no row filled is `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WideTable<T> {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<Option<T>>>,
}

impl<T> WideTable<T> {
    /// Pivot long rows; `merge` folds a second value for an occupied cell into it.
    pub fn pivot<I, F>(long: I, mut merge: F) -> Self
    where
        I: IntoIterator<Item = LongRow<T>>,
        F: FnMut(&mut T, T),
    {
        let mut rows = Vec::new();
        let mut columns = Vec::new();
        let mut row_index: HashMap<String, usize> = HashMap::new();
        let mut column_index: HashMap<String, usize> = HashMap::new();
        let mut cells: Vec<Vec<Option<T>>> = Vec::new();

        for row in long {
            let r = *row_index.entry(row.individual).or_insert_with_key(|key| {
                rows.push(key.clone());
                cells.push(Vec::new());
                rows.len() - 1
            });
            let c = *column_index.entry(row.marker).or_insert_with_key(|key| {
                columns.push(key.clone());
                columns.len() - 1
            });

            let line = &mut cells[r];
            if line.len() <= c {
                line.resize_with(c + 1, || None);
            }
            line[c] = match line[c].take() {
                Some(mut existing) => {
                    merge(&mut existing, row.value);
                    Some(existing)
                }
                None => Some(row.value),
            };
        }

        for line in &mut cells {
            line.resize_with(columns.len(), || None);
        }

        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row labels paired with their cells, in row order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<T>])> {
        self.rows
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }
}

impl WideTable<String> {
    /// Pivot joining colliding values with a single space.
    pub fn pivot_joined<I>(long: I) -> Self
    where
        I: IntoIterator<Item = LongRow<String>>,
    {
        Self::pivot(long, |existing, value| {
            existing.push(' ');
            existing.push_str(&value);
        })
    }

    /// Write the table with a header row led by [`INDEX_NAME`].
    pub fn write_delimited<W>(&self, writer: W, delimiter: u8) -> csv::Result<()>
    where
        W: io::Write,
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        let header = std::iter::once(INDEX_NAME).chain(self.columns.iter().map(String::as_str));
        writer.write_record(header)?;
        for (label, cells) in self.rows() {
            let fields = cells.iter().map(|c| c.as_deref().unwrap_or(""));
            writer.write_record(std::iter::once(label).chain(fields))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_records;

    fn row(individual: &str, marker: &str, value: &str) -> LongRow<String> {
        LongRow {
            individual: individual.to_string(),
            marker: marker.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn long_rows_cover_every_pair() {
        let rows = long_rows(&sample_records());
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[4], row("ind2", "rs2", "A A"));
    }

    #[test]
    fn pivot_keeps_first_appearance_order() {
        let table = WideTable::pivot_joined(vec![
            row("z", "rs9", "A A"),
            row("z", "rs1", "A B"),
            row("a", "rs9", "B B"),
        ]);
        assert_eq!(table.columns(), ["rs9", "rs1"]);
        let labels: Vec<_> = table.rows().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["z", "a"]);
        let (_, cells) = table.rows().nth(1).unwrap();
        assert_eq!(cells, [Some(String::from("B B")), None]);
    }

    #[test]
    fn colliding_cells_are_joined_with_space() {
        let table = WideTable::pivot_joined(vec![row("i", "rs1", "A A"), row("i", "rs1", "B B")]);
        let (_, cells) = table.rows().next().unwrap();
        assert_eq!(cells, [Some(String::from("A A B B"))]);
    }

    #[test]
    fn write_delimited_uses_index_header() {
        let table =
            WideTable::pivot_joined(vec![row("i1", "rs1", "A A"), row("i2", "rs2", "0 0")]);
        let mut out = Vec::new();
        table.write_delimited(&mut out, b';').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ind;rs1;rs2\ni1;A A;\ni2;;0 0\n"
        );
    }
}
