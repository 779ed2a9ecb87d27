//! In-process store binding.
//!
//! Same observable semantics as the hosted store: store-assigned keys,
//! server-side `createdAt` stamping, single-field ordering. Used by tests and
//! local development.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, DocumentStore, Order, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Field comparison mirroring the hosted store's single-field order:
/// missing fields first, then numbers, then strings.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(
        &self,
        collection: &str,
        order_by: &str,
        order: Order,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs = collections.get(collection).cloned().unwrap_or_default();
        docs.sort_by(|a, b| {
            let cmp = compare_field(a.fields.get(order_by), b.fields.get(order_by));
            match order {
                Order::Ascending => cmp,
                Order::Descending => cmp.reverse(),
            }
        });
        Ok(docs)
    }

    async fn get(&self, collection: &str, key: &str) -> StoreResult<Document> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.key == key))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        let key = Uuid::new_v4().to_string();
        let mut fields = fields;
        fields.insert(
            "createdAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                key: key.clone(),
                fields,
            });
        Ok(key)
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.key == key))
            .ok_or(StoreError::NotFound)?;
        for (name, value) in fields {
            doc.fields.insert(name, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|d| d.key != key);
        }
        Ok(())
    }
}
