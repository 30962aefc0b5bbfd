use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value as JsonValue;
use std::time::Duration;

use super::{RecordStore, Table};
use crate::error::{Error, Result};

/// PostgREST-style HTTP API (`/rest/v1/<table>`).
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: url::Url,
    api_key: String,
}

impl RestStore {
    pub fn new(mut base_url: url::Url, api_key: String) -> Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn table_url(&self, table: Table) -> Result<url::Url> {
        self.base_url
            .join(&format!("rest/v1/{}", table.name()))
            .map_err(|e| Error::Config(format!("Invalid store URL: {}", e)))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn rows(&self, table: Table, res: Response) -> Result<Vec<JsonValue>> {
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<JsonValue>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(|m| m.to_string()))
                .unwrap_or(text);
            tracing::error!("Store request on {} failed with {}: {}", table.name(), status, message);
            return Err(Error::Store {
                status: status.as_u16(),
                message,
            });
        }
        let body: JsonValue = res.json().await?;
        match body {
            JsonValue::Array(rows) => Ok(rows),
            JsonValue::Null => Ok(vec![]),
            row => Ok(vec![row]),
        }
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn select_all(&self, table: Table) -> Result<Vec<JsonValue>> {
        let mut url = self.table_url(table)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some(column) = table.order_column() {
                query.append_pair("order", &format!("{}.desc", column));
            }
        }
        let res = self.authorized(self.client.get(url)).send().await?;
        self.rows(table, res).await
    }

    async fn select_one(&self, table: Table) -> Result<Option<JsonValue>> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("limit", "1");
        let res = self.authorized(self.client.get(url)).send().await?;
        Ok(self.rows(table, res).await?.into_iter().next())
    }

    async fn insert(&self, table: Table, record: JsonValue) -> Result<JsonValue> {
        let url = self.table_url(table)?;
        let res = self
            .authorized(self.client.post(url))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        self.rows(table, res)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Internal(format!("Insert into {} returned no row", table.name())))
    }

    async fn update(&self, table: Table, id: &str, patch: JsonValue) -> Result<JsonValue> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        let res = self
            .authorized(self.client.patch(url))
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        self.rows(table, res)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("No {} row with id {}", table.name(), id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_urls_are_joined_under_rest_v1() {
        let store = RestStore::new(url::Url::parse("https://abc.example.co/").unwrap(), "anon".into()).unwrap();
        assert_eq!(
            store.table_url(Table::Placements).unwrap().as_str(),
            "https://abc.example.co/rest/v1/placements"
        );
    }

    #[test]
    fn base_path_without_trailing_slash_is_kept() {
        let store = RestStore::new(url::Url::parse("https://host.example.co/proxy").unwrap(), "anon".into()).unwrap();
        assert_eq!(
            store.table_url(Table::Candidates).unwrap().as_str(),
            "https://host.example.co/proxy/rest/v1/candidates"
        );
    }
}
