//! Invocation-scoped configuration.
//!
//! `RunConfig` is the validated, immutable parameter set for one load run.
//! `TelemetryConfig` is a one-shot snapshot of the collector environment,
//! taken at startup and passed by reference afterwards so no component
//! reads ambient state directly.


use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::args::{DispatchMode, HammerArgs, HttpMethod, PositiveUsize};
use crate::error::ConfigError;

/// Payload pair used when a POST run is started without payload URLs.
const SAMPLE_PAYLOAD_URLS: [&str; 2] = ["https://example.com", "https://google.com"];

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

const COLLECTOR_URL_VAR: &str = "TRACKING_SERVICE_URL";
const API_KEY_VAR: &str = "LOCAL_TRACKER_API_KEY";
const API_KEY_FALLBACK_VAR: &str = "API_KEY";
const USER_ID_VAR: &str = "LOCAL_TRACKER_USER_ID";
const USER_ID_FALLBACK_VAR: &str = "INFLUENCER_USER";

const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target_url: String,
    pub request_count: u64,
    pub method: HttpMethod,
    pub concurrency: PositiveUsize,
    pub dispatch: DispatchMode,
    pub payload_urls: Vec<String>,
    pub request_delay: Duration,
    pub request_timeout: Duration,
}

impl RunConfig {
    /// Validate the invocation surface into an immutable run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the target URL does not parse or uses a
    /// non-HTTP scheme.
    pub fn from_args(args: &HammerArgs) -> Result<Self, ConfigError> {
        let parsed = Url::parse(&args.url).map_err(|err| ConfigError::InvalidTargetUrl {
            url: args.url.clone(),
            source: err,
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::UnsupportedTargetScheme {
                url: args.url.clone(),
            });
        }

        let mut payload_urls: Vec<String> = args
            .payload_urls
            .iter()
            .map(|entry| entry.trim().to_owned())
            .filter(|entry| !entry.is_empty())
            .collect();
        if payload_urls.is_empty() && args.method == HttpMethod::Post {
            warn!("POST method selected but no payload URLs provided. Using sample URLs.");
            payload_urls = SAMPLE_PAYLOAD_URLS
                .iter()
                .map(|url| (*url).to_owned())
                .collect();
        }

        Ok(Self {
            target_url: args.url.clone(),
            request_count: args.request_count,
            method: args.method,
            concurrency: args.concurrency,
            dispatch: args.dispatch,
            payload_urls,
            request_delay: args.request_delay,
            request_timeout: args.request_timeout,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub collector_url: Option<String>,
    pub api_key: Option<String>,
    pub user_id: String,
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl TelemetryConfig {
    /// Snapshot the collector environment. Call once at startup.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the snapshot from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup<TLookup>(lookup: TLookup) -> Self
    where
        TLookup: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let collector_url = read(COLLECTOR_URL_VAR);
        if collector_url.is_none() {
            warn!(
                "{} is not set. Telemetry delivery is disabled.",
                COLLECTOR_URL_VAR
            );
        }

        let api_key = read(API_KEY_VAR).or_else(|| read(API_KEY_FALLBACK_VAR));
        if api_key.is_none() {
            warn!(
                "{} / {} is not set. Telemetry will be sent unauthenticated.",
                API_KEY_VAR, API_KEY_FALLBACK_VAR
            );
        }

        let user_id = read(USER_ID_VAR)
            .or_else(|| read(USER_ID_FALLBACK_VAR))
            .unwrap_or_else(|| {
                warn!(
                    "{} / {} is not set. Defaulting user id to '{}'.",
                    USER_ID_VAR, USER_ID_FALLBACK_VAR, ANONYMOUS_USER
                );
                ANONYMOUS_USER.to_owned()
            });

        Self {
            collector_url,
            api_key,
            user_id,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}
