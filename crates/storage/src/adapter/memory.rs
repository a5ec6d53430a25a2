use super::{ATHLETES_TABLE, BackendAdapter, SelectQuery};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

/// Self-contained fallback store used when no backend is configured.
///
/// Tables live in process memory, seeded with demo rows, and are mutated
/// synchronously; results still come back through the async trait so
/// callers keep the exact calling convention of the remote client. Every
/// call warns so an operator watching logs knows writes are local-only.
pub struct InMemoryAdapter {
    tables: Mutex<HashMap<String, Vec<Value>>>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_demo_data() -> Self {
        let adapter = Self::new();
        adapter
            .lock()
            .insert(ATHLETES_TABLE.to_string(), demo_athletes());
        adapter
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Value>>> {
        // Lock poisoning cannot outlive a single-threaded event loop; a
        // poisoned table set is unrecoverable demo state either way.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for InMemoryAdapter {
    fn default() -> Self {
        Self::with_demo_data()
    }
}

#[async_trait]
impl BackendAdapter for InMemoryAdapter {
    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>> {
        warn!(table, "backend not configured; serving demo data");

        let tables = self.lock();
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| match &query.filter {
                        Some((column, value)) => column_value(row, column) == *value,
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = json_cmp(&column_value(a, &order.column), &column_value(b, &order.column));
                if order.ascending { ord } else { ord.reverse() }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>> {
        warn!(table, count = rows.len(), "backend not configured; insert is local-only");

        let mut stored = Vec::with_capacity(rows.len());
        let mut tables = self.lock();
        let entries = tables.entry(table.to_string()).or_default();

        for mut row in rows {
            if let Some(object) = row.as_object_mut() {
                let missing_id = !matches!(object.get("id"), Some(Value::String(s)) if !s.is_empty());
                if missing_id {
                    object.insert("id".to_string(), json!(Uuid::new_v4()));
                }
                object
                    .entry("created_at".to_string())
                    .or_insert_with(|| json!(chrono::Utc::now().to_rfc3339()));
            }
            entries.push(row.clone());
            stored.push(row);
        }

        Ok(stored)
    }

    async fn update(&self, table: &str, column: &str, value: Value, fields: Value) -> Result<()> {
        warn!(table, column, "backend not configured; update is local-only");

        let mut tables = self.lock();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut() {
                if column_value(row, column) != value {
                    continue;
                }
                if let (Some(target), Some(patch)) = (row.as_object_mut(), fields.as_object()) {
                    for (key, field_value) in patch {
                        target.insert(key.clone(), field_value.clone());
                    }
                }
            }
        }

        // Zero matched rows is an acknowledged no-op.
        Ok(())
    }

    async fn delete(&self, table: &str, column: &str, value: Value) -> Result<()> {
        warn!(table, column, "backend not configured; delete is local-only");

        let mut tables = self.lock();
        if let Some(rows) = tables.get_mut(table)
            && let Some(index) = rows.iter().position(|row| column_value(row, column) == value)
        {
            rows.remove(index);
        }

        Ok(())
    }

    async fn upsert(&self, table: &str, rows: Vec<Value>) -> Result<()> {
        warn!(table, count = rows.len(), "backend not configured; upsert is local-only");

        let mut tables = self.lock();
        let entries = tables.entry(table.to_string()).or_default();

        for mut row in rows {
            if let Some(object) = row.as_object_mut() {
                let missing_id = !matches!(object.get("id"), Some(Value::String(s)) if !s.is_empty());
                if missing_id {
                    object.insert("id".to_string(), json!(Uuid::new_v4()));
                }
            }
            let id = column_value(&row, "id");
            match entries.iter().position(|existing| column_value(existing, "id") == id) {
                Some(index) => entries[index] = row,
                None => entries.push(row),
            }
        }

        Ok(())
    }
}

/// A column absent from a row is treated as JSON null, which filters as a
/// non-match and sorts lowest.
fn column_value(row: &Value, column: &str) -> Value {
    row.get(column).cloned().unwrap_or(Value::Null)
}

fn json_cmp(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn demo_athletes() -> Vec<Value> {
    vec![
        json!({
            "id": "8c1a2f8e-0d63-4a5b-9a0e-5a4d1c2b3a01",
            "name": "DEMO John Doe",
            "avatar_url": null,
            "payment_status": "pending",
            "cut_day": "05",
            "snatch_rm": "95",
            "clean_rm": "115",
            "access_code": "JD01"
        }),
        json!({
            "id": "8c1a2f8e-0d63-4a5b-9a0e-5a4d1c2b3a02",
            "name": "DEMO Sarah Connor",
            "avatar_url": "https://api.dicebear.com/7.x/initials/svg?seed=Sarah",
            "payment_status": "active",
            "cut_day": "15",
            "snatch_rm": "65",
            "clean_rm": "85",
            "access_code": "SC02"
        }),
        json!({
            "id": "8c1a2f8e-0d63-4a5b-9a0e-5a4d1c2b3a03",
            "name": "DEMO Mike Tyson",
            "avatar_url": "https://api.dicebear.com/7.x/initials/svg?seed=Mike",
            "payment_status": "pending",
            "cut_day": "01",
            "snatch_rm": "105",
            "clean_rm": "135",
            "access_code": "MT03"
        }),
    ]
}
