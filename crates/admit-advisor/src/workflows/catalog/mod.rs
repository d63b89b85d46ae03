//! CSV import of current-year inventory and historical admission outcomes.

mod normalizer;
mod parser;
mod store;

use std::io::Read;
use std::path::Path;

pub use store::{InMemoryHistory, InMemoryInventory};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog file: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::InvalidField { line, field, value } => write!(
                f,
                "line {}: column '{}' has invalid value '{}'",
                line, field, value
            ),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::InvalidField { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads the two catalog files into in-memory stores.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn inventory_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<InMemoryInventory, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::inventory_from_reader(file)
    }

    pub fn inventory_from_reader<R: Read>(
        reader: R,
    ) -> Result<InMemoryInventory, CatalogImportError> {
        Ok(InMemoryInventory::new(parser::parse_inventory(reader)?))
    }

    pub fn history_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<InMemoryHistory, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::history_from_reader(file)
    }

    pub fn history_from_reader<R: Read>(reader: R) -> Result<InMemoryHistory, CatalogImportError> {
        Ok(InMemoryHistory::new(parser::parse_history(reader)?))
    }
}
