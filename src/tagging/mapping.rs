//! CSV-driven country mapping tables.
//!
//! Two table shapes are supported, one per CSV layout the store maintains:
//! category membership (`to_customer`/`to_dragon` columns of country codes)
//! and display names (`alpha-2`/`name` columns). Loading is fatal on a
//! missing or malformed file; tagging without a mapping is meaningless,
//! so there is no fallback.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use csv::StringRecord;
use thiserror::Error;

/// Errors while loading a mapping file.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The file could not be read or parsed as CSV.
    #[error("failed to read mapping file: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the header row.
    #[error("mapping file is missing the '{column}' column")]
    MissingColumn {
        /// The column that was expected.
        column: &'static str,
    },
}

fn column_index(headers: &StringRecord, column: &'static str) -> Result<usize, MappingError> {
    headers
        .iter()
        .position(|header| header.trim() == column)
        .ok_or(MappingError::MissingColumn { column })
}

fn cell(record: &StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Country-code membership for the two tag categories.
///
/// The two columns are read independently: a row with a blank cell in one
/// column still contributes to the other. Codes are kept verbatim; the
/// table expects ISO alpha-2 values but does not enforce the format.
///
/// The sets are intended to be disjoint but that is not enforced; a code
/// present in both resolves to `to_customer` because classification checks
/// that set first. An overlap is logged at load time so the source data
/// can be fixed.
#[derive(Clone, Debug, Default)]
pub struct CountryMapping {
    to_customer: HashSet<String>,
    to_dragon: HashSet<String>,
}

impl CountryMapping {
    /// Loads the mapping from a CSV file with `to_customer` and
    /// `to_dragon` columns.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if the file cannot be read or lacks either
    /// column.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let customer_column = column_index(&headers, "to_customer")?;
        let dragon_column = column_index(&headers, "to_dragon")?;

        let mut mapping = Self::default();
        for record in reader.records() {
            let record = record?;
            if let Some(code) = cell(&record, customer_column) {
                mapping.to_customer.insert(code);
            }
            if let Some(code) = cell(&record, dragon_column) {
                mapping.to_dragon.insert(code);
            }
        }

        for code in mapping.to_customer.intersection(&mapping.to_dragon) {
            tracing::warn!(%code, "country code appears in both columns, to_customer wins");
        }

        Ok(mapping)
    }

    /// Builds a mapping from in-memory sets.
    #[must_use]
    pub fn from_sets(to_customer: HashSet<String>, to_dragon: HashSet<String>) -> Self {
        Self {
            to_customer,
            to_dragon,
        }
    }

    /// Returns `true` if `code` belongs to the `to_customer` category.
    #[must_use]
    pub fn is_to_customer(&self, code: &str) -> bool {
        self.to_customer.contains(code)
    }

    /// Returns `true` if `code` belongs to the `to_dragon` category.
    #[must_use]
    pub fn is_to_dragon(&self, code: &str) -> bool {
        self.to_dragon.contains(code)
    }

    /// Number of codes across both categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_customer.len() + self.to_dragon.len()
    }

    /// Returns `true` if neither category has any codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_customer.is_empty() && self.to_dragon.is_empty()
    }
}

/// Country-code to display-name table for the country-name tag variant.
#[derive(Clone, Debug, Default)]
pub struct CountryNames(HashMap<String, String>);

impl CountryNames {
    /// Loads the table from a CSV file with `alpha-2` and `name` columns.
    ///
    /// Rows missing either cell are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if the file cannot be read or lacks either
    /// column.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let code_column = column_index(&headers, "alpha-2")?;
        let name_column = column_index(&headers, "name")?;

        let mut names = HashMap::new();
        for record in reader.records() {
            let record = record?;
            if let (Some(code), Some(name)) = (cell(&record, code_column), cell(&record, name_column))
            {
                names.insert(code, name);
            }
        }
        Ok(Self(names))
    }

    /// Builds a table from in-memory pairs.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    /// Returns the display name for `code`, if the table has one.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    /// Number of known codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
