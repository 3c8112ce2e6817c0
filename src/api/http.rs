//! reqwest-backed [`Backend`] with a hard per-request timeout.

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::time::Instant;
use tokio::time::timeout;

use super::{extract_error_message, ApiError, Backend};
use crate::config::ApiConfig;
use crate::logutil::escape_log;
use crate::metrics;

/// JSON-over-HTTP client for the adventure backend.
pub struct HttpBackend {
    config: ApiConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<Value, ApiError> {
        if !self.config.enabled {
            debug!("Backend disabled; skipping {}", url);
            return Err(ApiError::Disabled);
        }

        metrics::inc_requests_sent();
        let started = Instant::now();
        let result = self.exchange(request).await;
        metrics::observe_latency(started);

        if let Err(ref e) = result {
            metrics::inc_requests_failed();
            if matches!(e, ApiError::Timeout(_)) {
                metrics::inc_request_timeouts();
            }
            warn!("Request to {} failed: {}", url, e);
        }
        result
    }

    async fn exchange(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let secs = self.config.timeout_seconds;

        // One deadline covers connect, headers and body.
        let (status, text) = timeout(self.config.timeout(), async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        })
        .await
        .map_err(|_| ApiError::Timeout(secs))?
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        // Error pages are not always JSON; keep the raw text around for the message.
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(extract_error_message)
                .unwrap_or_else(|| escape_log(&text));
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        body.ok_or_else(|| ApiError::Decode(format!("non-JSON body: {}", escape_log(&text))))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.config.endpoint_url(path);
        debug!("GET {}", url);
        self.send(self.client.get(&url), &url).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.config.endpoint_url(path);
        debug!("POST {} {}", url, escape_log(&body.to_string()));
        self.send(self.client.post(&url).json(body), &url).await
    }
}
