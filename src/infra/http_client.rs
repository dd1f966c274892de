use crate::app::ports::{HttpClientPort, HttpGetRequest, HttpGetResult};
use crate::common::error::{FeedError, Result};
use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use std::time::Instant;

/// reqwest-backed HTTP client. Every request is bounded by the configured
/// total and connect timeouts, so a hung upstream surfaces as an error.
#[derive(Clone)]
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// reqwest errors print the full request URL, query string included; the
/// weather query carries the API key
fn redact(e: reqwest::Error) -> FeedError {
    FeedError::Http(e.without_url())
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, request: &HttpGetRequest) -> Result<HttpGetResult> {
        // The query may carry credentials, so only the base URL is logged
        tracing::debug!("HTTP GET request to: {}", request.url);
        let mut builder = self.client.get(&request.url).query(&request.query);
        if let Some(secs) = request.revalidate_secs {
            builder = builder.header(CACHE_CONTROL, format!("max-age={}", secs));
        }

        let t0 = Instant::now();
        let resp = builder.send().await.map_err(redact)?;
        let status = resp.status().as_u16();
        let host = resp.url().host_str().unwrap_or("unknown").to_string();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = resp.bytes().await.map_err(redact)?.to_vec();

        crate::observability::metrics::upstream::request_duration(
            &host,
            t0.elapsed().as_secs_f64(),
        );
        tracing::debug!(
            "HTTP response: status={}, size={} bytes, host={}",
            status,
            bytes.len(),
            host
        );
        Ok(HttpGetResult {
            status,
            bytes,
            content_type,
        })
    }
}
