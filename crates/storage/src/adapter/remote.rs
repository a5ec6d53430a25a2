use super::{BackendAdapter, BackendConfig, SelectQuery};
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Client for a PostgREST-style table service. The core depends only on
/// the filter/order/limit/insert/update/delete/upsert shape; any service
/// exposing equivalent endpoints is substitutable.
pub struct RemoteAdapter {
    base_url: String,
    key: String,
    client: reqwest::Client,
}

impl RemoteAdapter {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            key: config.key,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Content-Type", "application/json")
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Backend(format!("HTTP {}: {}", status, body)))
    }
}

/// PostgREST encodes an equality predicate as `column=eq.value`.
fn eq_param(value: &Value) -> String {
    match value {
        Value::String(s) => format!("eq.{}", s),
        other => format!("eq.{}", other),
    }
}

#[async_trait]
impl BackendAdapter for RemoteAdapter {
    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>> {
        let mut params: Vec<(String, String)> = vec![("select".to_string(), "*".to_string())];
        if let Some((column, value)) = &query.filter {
            params.push((column.clone(), eq_param(value)));
        }
        if let Some(order) = &query.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        debug!(table, ?params, "select");
        let response = self
            .authed(self.client.get(self.table_url(table)).query(&params))
            .send()
            .await?;
        let rows = Self::check(response).await?.json::<Vec<Value>>().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>> {
        debug!(table, count = rows.len(), "insert");
        let response = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await?;
        let stored = Self::check(response).await?.json::<Vec<Value>>().await?;
        Ok(stored)
    }

    async fn update(&self, table: &str, column: &str, value: Value, fields: Value) -> Result<()> {
        debug!(table, column, "update");
        let response = self
            .authed(
                self.client
                    .patch(self.table_url(table))
                    .query(&[(column, eq_param(&value))]),
            )
            .json(&fields)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, column: &str, value: Value) -> Result<()> {
        debug!(table, column, "delete");
        let response = self
            .authed(
                self.client
                    .delete(self.table_url(table))
                    .query(&[(column, eq_param(&value))]),
            )
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn upsert(&self, table: &str, rows: Vec<Value>) -> Result<()> {
        debug!(table, count = rows.len(), "upsert");
        let response = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&rows)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_param_encoding() {
        assert_eq!(eq_param(&json!("abc")), "eq.abc");
        assert_eq!(eq_param(&json!(7)), "eq.7");
        assert_eq!(eq_param(&json!(true)), "eq.true");
    }

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let adapter = RemoteAdapter::new(BackendConfig {
            url: "https://example.test/".to_string(),
            key: "k".to_string(),
        });
        assert_eq!(adapter.table_url("athletes"), "https://example.test/rest/v1/athletes");
    }
}
