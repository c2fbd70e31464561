use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::RunConfig;
use crate::metrics::RunSummary;

pub(crate) const SCHEMA_VERSION: &str = "1.0";

/// Naming context for one report: who ran it and what it should be filed
/// under on the collector side.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReportSpec<'run> {
    pub(crate) user_id: &'run str,
    pub(crate) challenge_type: &'run str,
    pub(crate) metric_name: &'run str,
    pub(crate) labels: &'run [(String, String)],
    pub(crate) session_id: &'run str,
    pub(crate) commit_hash: Option<&'run str>,
}

/// Wire envelope for one delivery. The timestamp is fixed at construction
/// and reused across retry attempts.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TelemetryPayload {
    pub(crate) schema_version: String,
    #[serde(rename = "userId")]
    pub(crate) user_id: String,
    #[serde(rename = "challengeType")]
    pub(crate) challenge_type: String,
    #[serde(rename = "metricName")]
    pub(crate) metric_name: String,
    pub(crate) value: u64,
    pub(crate) timestamp: String,
    pub(crate) labels: BTreeMap<String, String>,
    #[serde(rename = "runDetails")]
    pub(crate) run_details: RunDetails,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RunDetails {
    pub(crate) target_url: String,
    pub(crate) request_count: u64,
    pub(crate) method: String,
    pub(crate) concurrency: usize,
    pub(crate) dispatch: String,
    pub(crate) payload_urls: Vec<String>,
    pub(crate) total_requests: u64,
    pub(crate) successful_requests: u64,
    pub(crate) error_requests: u64,
    pub(crate) avg_latency_ms: f64,
    pub(crate) error_rate: f64,
    pub(crate) rps: f64,
    pub(crate) duration_s: f64,
    pub(crate) session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) commit_hash: Option<String>,
}

impl TelemetryPayload {
    #[must_use]
    pub(crate) fn build(spec: &ReportSpec<'_>, config: &RunConfig, summary: &RunSummary) -> Self {
        let mut labels: BTreeMap<String, String> = spec
            .labels
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if labels.is_empty() {
            labels.insert("source".to_owned(), "hammer".to_owned());
        }

        Self {
            schema_version: SCHEMA_VERSION.to_owned(),
            user_id: spec.user_id.to_owned(),
            challenge_type: spec.challenge_type.to_owned(),
            metric_name: spec.metric_name.to_owned(),
            // The headline value stays fixed; the detailed metrics live in
            // the nested details object.
            value: 1,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            labels,
            run_details: RunDetails {
                target_url: config.target_url.clone(),
                request_count: config.request_count,
                method: config.method.as_str().to_owned(),
                concurrency: config.concurrency.get(),
                dispatch: config.dispatch.as_str().to_owned(),
                payload_urls: config.payload_urls.clone(),
                total_requests: summary.total_requests,
                successful_requests: summary.successful_requests,
                error_requests: summary.error_requests,
                avg_latency_ms: unscale_x100(summary.avg_latency_ms_x100),
                error_rate: unscale_x100(summary.error_rate_x100),
                rps: unscale_x100(summary.rps_x100),
                duration_s: summary.duration.as_secs_f64(),
                session_id: spec.session_id.to_owned(),
                commit_hash: spec.commit_hash.map(str::to_owned),
            },
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "Wire format carries fractional values; the crate is integer-scaled everywhere else"
)]
const fn unscale_x100(value: u64) -> f64 {
    (value as f64) / 100.0
}
