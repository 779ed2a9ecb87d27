//! Hosted document store binding.
//!
//! Speaks the hosted database's JSON document protocol over HTTPS:
//! `GET/POST /collections/{name}/documents` plus `GET/PATCH/DELETE
//! /collections/{name}/documents/{key}`. Keys and `createdAt` stamps are
//! assigned server-side.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::StoreConfig;

use super::{Document, DocumentStore, Order, StoreError, StoreResult};

pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct WireDocument {
    key: String,
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct CreateResponse {
    key: String,
}

impl From<WireDocument> for Document {
    fn from(wire: WireDocument) -> Self {
        Document {
            key: wire.key,
            fields: wire.fields,
        }
    }
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/documents", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, key: &str) -> String {
        format!("{}/{}", self.collection_url(collection), key)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Map a non-success status to a store error, treating 404 as NotFound.
    fn check(response: reqwest::Response) -> StoreResult<reqwest::Response> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !response.status().is_success() {
            return Err(StoreError::Response(format!(
                "status {} from {}",
                response.status(),
                response.url()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn list(
        &self,
        collection: &str,
        order_by: &str,
        order: Order,
    ) -> StoreResult<Vec<Document>> {
        let direction = match order {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        };
        tracing::debug!(collection, order_by, direction, "listing documents");

        let response = self
            .authorize(self.client.get(self.collection_url(collection)))
            .query(&[("orderBy", order_by), ("order", direction)])
            .send()
            .await?;
        let documents: Vec<WireDocument> = Self::check(response)?.json().await?;
        Ok(documents.into_iter().map(Document::from).collect())
    }

    async fn get(&self, collection: &str, key: &str) -> StoreResult<Document> {
        let response = self
            .authorize(self.client.get(self.document_url(collection, key)))
            .send()
            .await?;
        let document: WireDocument = Self::check(response)?.json().await?;
        Ok(document.into())
    }

    async fn create(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        let response = self
            .authorize(self.client.post(self.collection_url(collection)))
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await?;
        let created: CreateResponse = Self::check(response)?.json().await?;
        tracing::debug!(collection, key = %created.key, "created document");
        Ok(created.key)
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        let response = self
            .authorize(self.client.patch(self.document_url(collection, key)))
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await?;
        Self::check(response)?;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        let response = self
            .authorize(self.client.delete(self.document_url(collection, key)))
            .send()
            .await?;
        // Deleting an absent document is treated as success by the store.
        match Self::check(response) {
            Ok(_) | Err(StoreError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
