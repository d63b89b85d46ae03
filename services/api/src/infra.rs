use admit_advisor::config::{AdvisorConfig, ConfigError};
use admit_advisor::error::AppError;
use admit_advisor::workflows::catalog::{CatalogImporter, InMemoryHistory, InMemoryInventory};
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

const DEMO_INVENTORY_CSV: &str = include_str!("../../../data/sample_inventory.csv");
const DEMO_HISTORY_CSV: &str = include_str!("../../../data/sample_history.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Where the in-memory stores were hydrated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CatalogSource {
    Files,
    BuiltInSample,
}

impl CatalogSource {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            CatalogSource::Files => "csv files",
            CatalogSource::BuiltInSample => "built-in sample",
        }
    }
}

pub(crate) struct Catalog {
    pub(crate) inventory: InMemoryInventory,
    pub(crate) history: InMemoryHistory,
    pub(crate) source: CatalogSource,
}

/// Loads both catalog files, or the built-in sample when neither is configured.
pub(crate) fn load_catalog(
    inventory_csv: Option<&Path>,
    history_csv: Option<&Path>,
) -> Result<Catalog, AppError> {
    match (inventory_csv, history_csv) {
        (Some(inventory_path), Some(history_path)) => {
            let inventory = CatalogImporter::inventory_from_path(inventory_path)?;
            let history = CatalogImporter::history_from_path(history_path)?;
            info!(
                inventory_rows = inventory.len(),
                history_records = history.len(),
                "catalog loaded from files"
            );
            Ok(Catalog {
                inventory,
                history,
                source: CatalogSource::Files,
            })
        }
        (None, None) => demo_catalog(),
        (Some(_), None) => Err(missing_pair("ADVISOR_HISTORY_CSV")),
        (None, Some(_)) => Err(missing_pair("ADVISOR_INVENTORY_CSV")),
    }
}

pub(crate) fn load_configured_catalog(config: &AdvisorConfig) -> Result<Catalog, AppError> {
    load_catalog(config.inventory_csv.as_deref(), config.history_csv.as_deref())
}

pub(crate) fn demo_catalog() -> Result<Catalog, AppError> {
    let inventory = CatalogImporter::inventory_from_reader(Cursor::new(DEMO_INVENTORY_CSV))?;
    let history = CatalogImporter::history_from_reader(Cursor::new(DEMO_HISTORY_CSV))?;
    Ok(Catalog {
        inventory,
        history,
        source: CatalogSource::BuiltInSample,
    })
}

fn missing_pair(name: &'static str) -> AppError {
    AppError::Config(ConfigError::InvalidAdvisorSetting {
        name,
        value: "unset while its counterpart is set".to_string(),
    })
}
