use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::payload::TelemetryPayload;
use crate::config::TelemetryConfig;
use crate::error::TelemetryError;

pub(crate) const API_KEY_HEADER: &str = "x-api-key";

const DELIVERY_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sleep seam so the backoff schedule is testable without wall-clock delay.
#[async_trait]
pub(crate) trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

pub(crate) struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Final outcome of one delivery call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeliveryStatus {
    Delivered,
    /// No collector configured; nothing was sent.
    Disabled,
    /// Every attempt failed.
    Exhausted,
}

/// Progress of the retry loop. `Delivered` and `Exhausted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeliveryState {
    Attempting(u32),
    Delivered,
    Exhausted,
}

pub(crate) struct TelemetryClient<TSleeper = TokioSleeper> {
    config: TelemetryConfig,
    client: Client,
    sleeper: TSleeper,
}

impl TelemetryClient<TokioSleeper> {
    /// # Errors
    ///
    /// Returns an error when the delivery HTTP client cannot be built.
    pub(crate) fn new(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        Self::with_sleeper(config, TokioSleeper)
    }
}

impl<TSleeper> TelemetryClient<TSleeper>
where
    TSleeper: Sleeper + Sync,
{
    /// # Errors
    ///
    /// Returns an error when the delivery HTTP client cannot be built.
    pub(crate) fn with_sleeper(
        config: TelemetryConfig,
        sleeper: TSleeper,
    ) -> Result<Self, TelemetryError> {
        let client = Client::builder()
            .timeout(DELIVERY_REQUEST_TIMEOUT)
            .build()
            .map_err(|err| TelemetryError::BuildClientFailed { source: err })?;
        Ok(Self {
            config,
            client,
            sleeper,
        })
    }

    /// Deliver one payload with bounded retries and exponential backoff.
    ///
    /// Failure is a status value, never an error: the run this reports on
    /// has already completed.
    pub(crate) async fn send(&self, payload: &TelemetryPayload) -> DeliveryStatus {
        let Some(collector_url) = self.config.collector_url.as_deref() else {
            warn!("Telemetry delivery skipped: no collector URL configured.");
            return DeliveryStatus::Disabled;
        };
        if self.config.api_key.is_none() {
            warn!("Sending telemetry unauthenticated: no API key configured.");
        }

        let mut state = if self.config.max_retries == 0 {
            DeliveryState::Exhausted
        } else {
            DeliveryState::Attempting(0)
        };
        loop {
            match state {
                DeliveryState::Attempting(attempt) => {
                    state = self.attempt(collector_url, payload, attempt).await;
                }
                DeliveryState::Delivered => return DeliveryStatus::Delivered,
                DeliveryState::Exhausted => {
                    warn!(
                        "Max retries ({}) reached. Telemetry data not sent.",
                        self.config.max_retries
                    );
                    return DeliveryStatus::Exhausted;
                }
            }
        }
    }

    async fn attempt(
        &self,
        collector_url: &str,
        payload: &TelemetryPayload,
        attempt: u32,
    ) -> DeliveryState {
        let mut request = self.client.post(collector_url).json(payload);
        if let Some(api_key) = self.config.api_key.as_deref() {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let failure = match request.send().await {
            Ok(response) if response.status().is_success() => {
                info!(
                    "Tracking data sent to {} - Status: {}",
                    collector_url,
                    response.status().as_u16()
                );
                log_collector_reply(response).await;
                return DeliveryState::Delivered;
            }
            Ok(response) => format!(
                "collector responded with status {}",
                response.status().as_u16()
            ),
            Err(err) => err.to_string(),
        };

        let next = attempt.saturating_add(1);
        warn!(
            "Attempt {}/{}: failed to send tracking data to {}: {}",
            next, self.config.max_retries, collector_url, failure
        );
        if next >= self.config.max_retries {
            return DeliveryState::Exhausted;
        }
        // No wait after the final attempt; the backoff only spaces retries.
        self.sleeper.sleep(self.backoff_delay(attempt)).await;
        DeliveryState::Attempting(next)
    }

    const fn backoff_delay(&self, attempt: u32) -> Duration {
        let multiplier = match 2u32.checked_pow(attempt) {
            Some(value) => value,
            None => u32::MAX,
        };
        self.config.backoff_base.saturating_mul(multiplier)
    }
}

/// Best-effort parse of the collector reply, purely for diagnostics.
async fn log_collector_reply(response: reqwest::Response) {
    match response.text().await {
        Ok(body) => match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => info!("Collector response: {}", json),
            Err(parse_err) => {
                if body.is_empty() {
                    debug!("Collector reply had an empty body: {}", parse_err);
                } else {
                    info!("Collector responded with non-JSON body: {}", body);
                }
            }
        },
        Err(err) => debug!("Failed to read collector response body: {}", err),
    }
}
