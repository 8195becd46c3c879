//! HTTP fetcher with retry-until-200 semantics.
//!
//! # Responsibilities
//! - Issue GET requests against a document URL
//! - Re-issue on any status other than 200, as the retry policy allows
//! - Parse the successful body as JSON

use std::time::Instant;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::fetch::error::{FetchError, FetchResult};
use crate::fetch::target::target_url;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;

/// Fetches JSON documents relative to a base URL.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
}

impl Fetcher {
    /// Build a fetcher from configuration.
    pub fn new(config: &ClientConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.timeouts.connect())
            .timeout(config.timeouts.request())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            policy: RetryPolicy::from(&config.retries),
        })
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch the document at `suffix` under the configured base URL.
    pub async fn fetch_path(&self, suffix: &str) -> FetchResult<Value> {
        self.fetch_json(&target_url(&self.base_url, suffix)).await
    }

    /// Fetch and deserialize the document at `url` into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(&self, url: &str) -> FetchResult<T> {
        let value = self.fetch_json(url).await?;
        serde_json::from_value(value).map_err(|source| FetchError::UnexpectedShape {
            target: url.to_string(),
            source,
        })
    }

    /// Fetch the JSON document at `url`.
    ///
    /// Non-200 responses are retried per the policy. A request that fails
    /// without a response ends the fetch immediately.
    pub async fn fetch_json(&self, url: &str) -> FetchResult<Value> {
        let fetch_id = Uuid::new_v4();
        let span = tracing::debug_span!("fetch", %fetch_id, url);

        let started = Instant::now();
        let result = self.fetch_until_ok(url).instrument(span).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_fetch(outcome, started.elapsed());

        result
    }

    async fn fetch_until_ok(&self, url: &str) -> FetchResult<Value> {
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);

            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    metrics::record_attempt(None);
                    tracing::warn!(attempt, error = %e, "Request failed without a response");
                    return Err(FetchError::Transport {
                        url: url.to_string(),
                        source: e,
                    });
                }
            };

            let status = response.status();
            metrics::record_attempt(Some(status.as_u16()));

            if status == StatusCode::OK {
                let body = response.bytes().await.map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    source,
                })?;
                let value = serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                    url: url.to_string(),
                    source,
                })?;

                tracing::debug!(attempt, bytes = body.len(), "Document fetched");
                return Ok(value);
            }

            // Release the connection before waiting.
            drop(response);

            match self.policy.next_delay(attempt) {
                Some(delay) => {
                    tracing::debug!(
                        attempt,
                        status = %status,
                        delay_ms = delay.as_millis() as u64,
                        "Non-200 response, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                None => {
                    tracing::warn!(attempt, status = %status, "Retry budget spent");
                    return Err(FetchError::Exhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        last_status: status.as_u16(),
                    });
                }
            }
        }
    }
}
