use crate::workflows::admission::{
    HistoricalRecord, HistoryQuery, HistoryStore, InventoryRow, InventoryScope, InventorySource,
    RepositoryError,
};

/// Inventory held in memory, answering scope lookups by linear scan.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    rows: Vec<InventoryRow>,
}

impl InMemoryInventory {
    pub fn new(rows: Vec<InventoryRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[InventoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl InventorySource for InMemoryInventory {
    fn fetch_inventory(
        &self,
        scope: &InventoryScope,
    ) -> Result<Vec<InventoryRow>, RepositoryError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| {
                row.year == scope.year
                    && row.source_province == scope.province
                    && row.subject_category == scope.subject_category
            })
            .cloned()
            .collect())
    }
}

/// Historical outcomes held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    records: Vec<HistoricalRecord>,
}

impl InMemoryHistory {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HistoryStore for InMemoryHistory {
    fn fetch_history(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<HistoricalRecord>, RepositoryError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect())
    }
}
