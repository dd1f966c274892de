use async_trait::async_trait;

use crate::common::error::{FeedError, Result};

/// Outbound HTTP GET seam; the reqwest adapter lives in `infra::http_client`
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, request: &HttpGetRequest) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpGetRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Seconds a cached response may be treated as fresh
    pub revalidate_secs: Option<u64>,
}

impl HttpGetRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            revalidate_secs: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn revalidate(mut self, secs: u64) -> Self {
        self.revalidate_secs = Some(secs);
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Body of a 2xx response, otherwise the status classified as a `FeedError`
    pub fn into_success(self) -> Result<Vec<u8>> {
        if self.is_success() {
            Ok(self.bytes)
        } else {
            Err(FeedError::from_status(self.status, &self.bytes))
        }
    }
}
