use crate::client::{HttpReply, Transport};
use crate::config::Settings;
use anyhow::Context;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// [`Transport`] over `reqwest`. One attempt per call; callers re-trigger on failure.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings
            .api_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = settings
            .http_timeout_secs
            .as_deref()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build advisor http client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn reply(res: reqwest::Response) -> anyhow::Result<HttpReply> {
        let status = res.status().as_u16();
        let body = res.text().await.context("failed to read response body")?;
        Ok(HttpReply { status, body })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> anyhow::Result<HttpReply> {
        let res = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;
        Self::reply(res).await
    }

    async fn delete(&self, path: &str) -> anyhow::Result<HttpReply> {
        let res = self
            .http
            .delete(self.url(path))
            .send()
            .await
            .with_context(|| format!("DELETE {path} failed"))?;
        Self::reply(res).await
    }
}
