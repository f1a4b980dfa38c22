//! Startup inputs for the catalog
//!
//! A source delivers the raw item, embedding and cluster tables; the store
//! validates and indexes them. Sources are only consulted once, at startup.

use std::path::PathBuf;

use tracing::instrument;

use crate::{
    catalog::{CatalogStore, CatalogTables},
    error::AppResult,
};

/// Trait for catalog table providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw, index-aligned catalog tables
    async fn load_tables(&self) -> AppResult<CatalogTables>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Reads a JSON bundle holding every catalog table
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogSource for JsonFileSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_tables(&self) -> AppResult<CatalogTables> {
        let bytes = tokio::fs::read(&self.path).await?;
        let tables: CatalogTables = serde_json::from_slice(&bytes)?;
        tracing::debug!(rows = tables.items.len(), "Catalog tables read");
        Ok(tables)
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}

/// Loads and validates the catalog from the given source
pub async fn load_catalog(source: &dyn CatalogSource) -> AppResult<CatalogStore> {
    tracing::info!(source = source.name(), "Loading catalog");
    let tables = source.load_tables().await?;
    CatalogStore::from_tables(tables)
}
