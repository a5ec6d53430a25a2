mod memory;
mod remote;

pub use memory::InMemoryAdapter;
pub use remote::RemoteAdapter;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const ATHLETES_TABLE: &str = "athletes";
pub const WORKOUT_LOGS_TABLE: &str = "workout_logs";
pub const ATHLETE_PROGRESS_TABLE: &str = "athlete_progress";

/// Equality-filtered, ordered, limited read. `limit` applies after `order`.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    pub filter: Option<(String, Value)>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl SelectQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((column.into(), value.into()));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Uniform table-filter-mutate capability over the persistence backend.
/// Rows cross this boundary as JSON objects; the typed record layer sits
/// above it and rejects unknown fields on the way in.
///
/// Failure is always the `Err` arm of the crate `Result`; implementations
/// never panic on backend trouble.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// No filter returns the full table. Selecting from an unknown table
    /// returns an empty result, not an error.
    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>>;

    /// Assigns identity to rows that lack one and returns the stored rows,
    /// including the assigned id and any server-assigned timestamp.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>>;

    /// Shallow-merges `fields` onto every row matching `column = value`.
    /// Zero matched rows is an idempotent no-op, never an error.
    async fn update(&self, table: &str, column: &str, value: Value, fields: Value) -> Result<()>;

    /// Removes the first row matching `column = value`; acknowledges
    /// whether or not a match existed.
    async fn delete(&self, table: &str, column: &str, value: Value) -> Result<()>;

    /// Insert-or-replace matched by `id`.
    async fn upsert(&self, table: &str, rows: Vec<Value>) -> Result<()>;
}

/// Remote backend coordinates, read once at startup.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub key: String,
}

impl BackendConfig {
    /// `None` when the environment does not name a usable backend, which
    /// routes the process into the in-memory fallback.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("ROSTER_BACKEND_URL").ok()?;
        let key = std::env::var("ROSTER_BACKEND_KEY").ok()?;
        if !url.starts_with("http") || key.is_empty() {
            return None;
        }
        Some(Self { url, key })
    }
}

/// Select the adapter variant once at startup: the remote client when the
/// environment is configured, otherwise the self-contained demo store.
pub fn adapter_from_env() -> Arc<dyn BackendAdapter> {
    match BackendConfig::from_env() {
        Some(config) => {
            tracing::info!(url = %config.url, "using remote backend");
            Arc::new(RemoteAdapter::new(config))
        }
        None => {
            tracing::warn!("backend not configured; falling back to in-memory demo store");
            Arc::new(InMemoryAdapter::with_demo_data())
        }
    }
}
