//! Requests against the advisor backend and classification of their outcomes.

pub mod error;
pub mod http;

pub use error::FetchError;

use crate::config::Settings;
use crate::domain::analysis::RawPayload;
use crate::domain::catalog::{ClientRecord, Product};
use crate::history::HistoryIndex;
use crate::normalize::{normalize_clients, normalize_products, truthy, Object};
use crate::validate::ClientId;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_HISTORY_PATH: &str = "/client_analysis/history/all";

/// Characters left alone by a browser's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP collaborator. `Err` means no status was obtained at all.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> anyhow::Result<HttpReply>;

    async fn delete(&self, path: &str) -> anyhow::Result<HttpReply>;
}

#[derive(Clone)]
pub struct AdvisorClient {
    transport: Arc<dyn Transport>,
    history_path: String,
}

impl AdvisorClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            history_path: DEFAULT_HISTORY_PATH.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings, transport: Arc<dyn Transport>) -> Self {
        let client = Self::new(transport);
        match settings.history_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => client.with_history_path(path),
            _ => client,
        }
    }

    pub fn with_history_path(mut self, path: impl Into<String>) -> Self {
        self.history_path = path.into();
        self
    }

    /// `GET /client_analysis/{id}`. Fails with `Analysis` when the backend flags an error or
    /// returns no analysis body; otherwise the object is passed through untouched.
    pub async fn fetch_analysis(&self, id: &ClientId) -> Result<RawPayload, FetchError> {
        let path = format!("/client_analysis/{}", encode_segment(id));
        let body = self.get_object(&path).await?;

        let flagged = body.get("status").and_then(Value::as_str) == Some("error");
        let analysis = body.get("ai_analysis");
        if flagged || !analysis.is_some_and(truthy) {
            let message = analysis
                .and_then(|a| a.get("error"))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(error::ANALYSIS_UNAVAILABLE)
                .to_string();
            tracing::warn!(client_id = %id, %message, "backend reported no usable analysis");
            return Err(FetchError::Analysis { message });
        }

        Ok(RawPayload::from(body))
    }

    /// `GET` the history index. A missing `analyses` key is an empty index.
    pub async fn fetch_history(&self) -> Result<HistoryIndex, FetchError> {
        let mut body = self.get_object(&self.history_path).await?;
        HistoryIndex::from_analyses(body.remove("analyses")).ok_or(FetchError::Format)
    }

    /// `DELETE /client_analysis/{client_id}/history/{timestamp}` with both segments encoded.
    pub async fn delete_record(&self, client_id: &str, timestamp: &str) -> Result<(), FetchError> {
        let path = format!(
            "/client_analysis/{}/history/{}",
            encode_segment(client_id),
            encode_segment(timestamp)
        );
        let reply = self
            .transport
            .delete(&path)
            .await
            .map_err(FetchError::transport)?;
        if !reply.is_success() {
            tracing::warn!(client_id, timestamp, status = reply.status, "delete rejected");
            return Err(FetchError::Delete {
                status: reply.status,
            });
        }
        tracing::info!(client_id, timestamp, "analysis record deleted");
        Ok(())
    }

    pub async fn fetch_clients(&self) -> Result<Vec<ClientRecord>, FetchError> {
        let body = self.get_json("/clients").await?;
        normalize_clients(&body).ok_or(FetchError::Format)
    }

    pub async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        let body = self.get_object("/products").await?;
        normalize_products(body.get("products")).ok_or(FetchError::Format)
    }

    async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let reply = self
            .transport
            .get(path)
            .await
            .map_err(FetchError::transport)?;
        if !reply.is_success() {
            tracing::warn!(path, status = reply.status, "non-success response");
            return Err(FetchError::Http {
                status: reply.status,
            });
        }
        serde_json::from_str::<Value>(&reply.body).map_err(|err| {
            tracing::warn!(path, error = %err, "response body is not JSON");
            FetchError::Format
        })
    }

    async fn get_object(&self, path: &str) -> Result<Object, FetchError> {
        match self.get_json(path).await? {
            Value::Object(body) => Ok(body),
            _ => Err(FetchError::Format),
        }
    }
}
