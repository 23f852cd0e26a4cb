//! Projection of a fused record set onto chosen individuals or markers.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use crate::dataset::FusedRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("You provided a string as target instead of a list of strings")]
    BareString,
    #[error("There are duplicates in your query: {}", .0.join(", "))]
    Duplicates(Vec<String>),
    #[error("Target should be a list of strings")]
    NotAList,
}

/// An ordered, duplicate-free list of IDs to select.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    ids: Vec<String>,
}

impl Target {
    pub fn new<I, S>(ids: I) -> Result<Self, TargetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();

        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for id in &ids {
            if !seen.insert(id.as_str()) && !duplicates.contains(id) {
                duplicates.push(id.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(TargetError::Duplicates(duplicates));
        }

        Ok(Self { ids })
    }

    /// Build a target from a JSON value, which must be an array of strings.
    pub fn from_json(value: &Value) -> Result<Self, TargetError> {
        match value {
            Value::String(_) => Err(TargetError::BareString),
            Value::Array(items) => {
                let ids = items
                    .iter()
                    .map(|item| item.as_str().ok_or(TargetError::NotAList))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::new(ids)
            }
            _ => Err(TargetError::NotAList),
        }
    }

    /// Parse a JSON document such as `["ind1", "ind2"]`.
    ///
    /// Input that is not JSON and does not open an array or object is taken
    /// to be a single unquoted identifier.
    pub fn parse_json(raw: &str) -> Result<Self, TargetError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| {
            match raw.trim_start().chars().next() {
                Some('[' | '{') => TargetError::NotAList,
                _ => TargetError::BareString,
            }
        })?;
        Self::from_json(&value)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    fn missing_from(&self, found: &HashSet<&str>) -> Vec<String> {
        self.ids
            .iter()
            .filter(|id| !found.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

/// Result of a filter: the kept records plus requested IDs that matched nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub records: Vec<FusedRecord>,
    pub missing: Vec<String>,
}

/// Keep every record whose individual ID is in `target`, in target order.
pub fn select_individuals(target: &Target, records: &[FusedRecord]) -> Selection {
    let mut selected = Vec::new();
    let mut found = HashSet::new();
    for id in target.ids() {
        for record in records.iter().filter(|r| &r.individual_id == id) {
            selected.push(record.clone());
            found.insert(id.as_str());
        }
    }

    let missing = target.missing_from(&found);
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing,
            "individual(s) from target could not be found in available data"
        );
    }

    Selection {
        records: selected,
        missing,
    }
}

/// Keep only the loci whose variant ID is in `target`, for every record.
pub fn select_markers(target: &Target, records: &[FusedRecord]) -> Selection {
    let wanted: HashSet<&str> = target.ids().iter().map(String::as_str).collect();
    let mut found = HashSet::new();

    let selected = records
        .iter()
        .map(|record| {
            let mut kept = record.clone();
            kept.loci.retain(|locus| wanted.contains(locus.marker.variant_id.as_str()));
            found.extend(record.variant_ids().filter(|id| wanted.contains(id)));
            kept
        })
        .collect();

    let missing = target.missing_from(&found);
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing,
            "marker(s) from target could not be found in available data"
        );
    }

    Selection {
        records: selected,
        missing,
    }
}
