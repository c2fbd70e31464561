use async_trait::async_trait;
use reqwest::Client;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::args::HttpMethod;
use crate::config::RunConfig;
use crate::error::HttpError;
use crate::metrics::RequestResult;

/// Executes exactly one request. The dispatcher drives implementations of
/// this trait so dispatch semantics are testable with scripted latencies.
#[async_trait]
pub(crate) trait RequestExecutor {
    async fn execute(&self, seq: u64) -> RequestResult;
}

pub(crate) struct HttpRequestExecutor {
    client: Client,
    target_url: String,
    method: HttpMethod,
    payload_urls: Vec<String>,
}

impl HttpRequestExecutor {
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub(crate) fn from_config(config: &RunConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;
        Ok(Self {
            client,
            target_url: config.target_url.clone(),
            method: config.method,
            payload_urls: config.payload_urls.clone(),
        })
    }
}

#[async_trait]
impl RequestExecutor for HttpRequestExecutor {
    async fn execute(&self, seq: u64) -> RequestResult {
        let request = match self.method {
            HttpMethod::Get => self.client.get(&self.target_url),
            HttpMethod::Post => self
                .client
                .post(&self.target_url)
                .json(&serde_json::json!({ "urls": self.payload_urls })),
        };

        let start = Instant::now();
        let result = match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // Drain the body so the latency covers the full exchange and
                // the connection can be reused.
                match response.bytes().await {
                    Ok(_body) => RequestResult::completed(start.elapsed(), status),
                    Err(err) => {
                        let latency = start.elapsed();
                        warn!(
                            "Request {} to {} ({}) failed reading body: {}",
                            seq,
                            self.target_url,
                            self.method.as_str(),
                            err
                        );
                        RequestResult::transport_failed(latency)
                    }
                }
            }
            Err(err) => {
                let latency = start.elapsed();
                // Some transport errors still carry a status from the server.
                err.status().map_or_else(
                    || {
                        warn!(
                            "Request {} to {} ({}) failed after {}ms: {}",
                            seq,
                            self.target_url,
                            self.method.as_str(),
                            latency.as_millis(),
                            err
                        );
                        RequestResult::transport_failed(latency)
                    },
                    |status| RequestResult::completed(latency, status.as_u16()),
                )
            }
        };

        match result.status {
            Some(status) => info!(
                "Request {} to {} ({}) - status: {}, latency: {}ms, success: {}",
                seq,
                self.target_url,
                self.method.as_str(),
                status,
                result.latency.as_millis(),
                result.success
            ),
            None => debug!(
                "Request {} to {} ({}) - no response, latency: {}ms",
                seq,
                self.target_url,
                self.method.as_str(),
                result.latency.as_millis()
            ),
        }

        result
    }
}
