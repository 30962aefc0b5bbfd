use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{RecordStore, Table};
use crate::error::{Error, Result};

#[derive(Default)]
struct Tables {
    rows: HashMap<Table, Vec<JsonValue>>,
    rejected_writes: HashSet<Table>,
    rejected_reads: HashSet<Table>,
}

/// In-process store with the same contract as the remote one.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a row as-is, bypassing id and timestamp assignment.
    pub async fn seed(&self, table: Table, record: JsonValue) {
        self.inner
            .lock()
            .await
            .rows
            .entry(table)
            .or_default()
            .push(record);
    }

    pub async fn rows(&self, table: Table) -> Vec<JsonValue> {
        self.inner
            .lock()
            .await
            .rows
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Makes every insert and update on `table` fail.
    pub async fn reject_writes(&self, table: Table) {
        self.inner.lock().await.rejected_writes.insert(table);
    }

    pub async fn reject_reads(&self, table: Table) {
        self.inner.lock().await.rejected_reads.insert(table);
    }

    fn unavailable(table: Table) -> Error {
        Error::Store {
            status: 500,
            message: format!("relation \"{}\" is unavailable", table.name()),
        }
    }

    fn rejected(table: Table) -> Error {
        Error::Store {
            status: 400,
            message: format!("writes to {} are rejected", table.name()),
        }
    }
}

fn sort_key(row: &JsonValue, column: &str) -> String {
    row.get(column)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select_all(&self, table: Table) -> Result<Vec<JsonValue>> {
        let tables = self.inner.lock().await;
        if tables.rejected_reads.contains(&table) {
            return Err(Self::unavailable(table));
        }
        let mut rows = tables.rows.get(&table).cloned().unwrap_or_default();
        if let Some(column) = table.order_column() {
            // Stable sort keeps insertion order for equal keys.
            rows.sort_by(|a, b| sort_key(b, column).cmp(&sort_key(a, column)));
        }
        Ok(rows)
    }

    async fn select_one(&self, table: Table) -> Result<Option<JsonValue>> {
        let tables = self.inner.lock().await;
        if tables.rejected_reads.contains(&table) {
            return Err(Self::unavailable(table));
        }
        Ok(tables.rows.get(&table).and_then(|rows| rows.first().cloned()))
    }

    async fn insert(&self, table: Table, record: JsonValue) -> Result<JsonValue> {
        let mut tables = self.inner.lock().await;
        if tables.rejected_writes.contains(&table) {
            return Err(Self::rejected(table));
        }
        let JsonValue::Object(mut fields) = record else {
            return Err(Error::BadRequest("record must be a JSON object".to_string()));
        };
        fields
            .entry("id")
            .or_insert_with(|| JsonValue::String(uuid::Uuid::new_v4().to_string()));
        fields
            .entry("created_at")
            .or_insert_with(|| JsonValue::String(crate::utils::time::now().to_rfc3339()));
        let row = JsonValue::Object(fields);
        tables.rows.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: Table, id: &str, patch: JsonValue) -> Result<JsonValue> {
        let mut tables = self.inner.lock().await;
        if tables.rejected_writes.contains(&table) {
            return Err(Self::rejected(table));
        }
        let row = tables
            .rows
            .get_mut(&table)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|r| crate::transform::text(r, &["id"]) == id)
            })
            .ok_or_else(|| Error::NotFound(format!("No {} row with id {}", table.name(), id)))?;
        if let (JsonValue::Object(target), JsonValue::Object(changes)) = (&mut *row, patch) {
            target.extend(changes);
        }
        Ok(row.clone())
    }
}
