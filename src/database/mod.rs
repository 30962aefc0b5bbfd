pub mod memory;
pub mod rest;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::config::StoreCredentials;
use crate::error::Result;

pub const MEMORY_URL: &str = "memory://";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Candidates,
    Vacancies,
    Placements,
    Settings,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Candidates => "candidates",
            Table::Vacancies => "vacancies",
            Table::Placements => "placements",
            Table::Settings => "settings",
        }
    }

    /// Column used for the bulk read, newest first.
    pub fn order_column(&self) -> Option<&'static str> {
        match self {
            Table::Candidates | Table::Vacancies => Some("created_at"),
            Table::Placements => Some("joining_date"),
            Table::Settings => None,
        }
    }
}

/// The remote record store. Records use the store's snake_case column names.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn select_all(&self, table: Table) -> Result<Vec<JsonValue>>;

    /// At most one row; used for the settings singleton.
    async fn select_one(&self, table: Table) -> Result<Option<JsonValue>>;

    /// Inserts and returns the stored row.
    async fn insert(&self, table: Table, record: JsonValue) -> Result<JsonValue>;

    /// Updates the row with `id` and returns it.
    async fn update(&self, table: Table, id: &str, patch: JsonValue) -> Result<JsonValue>;
}

/// Builds a store client, refusing privileged keys before anything else.
pub fn connect(credentials: &StoreCredentials) -> Result<Arc<dyn RecordStore>> {
    crate::config::check_public_key(&credentials.key)?;
    if credentials.url == MEMORY_URL {
        tracing::info!("Using in-memory record store");
        return Ok(Arc::new(memory::MemoryStore::new()));
    }
    let url = credentials.validate()?;
    tracing::info!("Connecting to record store at {}", url);
    Ok(Arc::new(rest::RestStore::new(url, credentials.key.clone())?))
}
