mod summary;

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::args::HammerArgs;
use crate::config::{RunConfig, TelemetryConfig};
use crate::error::AppResult;
use crate::http::{HttpRequestExecutor, dispatch_requests};
use crate::metrics::{RunAggregator, RunSummary};
use crate::session::SessionStore;
use crate::telemetry::{DeliveryStatus, ReportSpec, TelemetryClient, TelemetryPayload};

/// Drive one load run end to end: dispatch, aggregate, print, report.
pub(crate) async fn run(args: &HammerArgs, telemetry: TelemetryConfig) -> AppResult<()> {
    let config = RunConfig::from_args(args)?;
    info!(
        "Starting load run: {} requests to {} ({}, {} dispatch, concurrency {})",
        config.request_count,
        config.target_url,
        config.method.as_str(),
        config.dispatch.as_str(),
        config.concurrency.get()
    );

    let executor = Arc::new(HttpRequestExecutor::from_config(&config)?);
    let started = Instant::now();
    let results = dispatch_requests(&config, &executor).await;
    let duration = started.elapsed();

    let mut aggregator = RunAggregator::new();
    for result in &results {
        aggregator.record(result);
    }
    let run_summary = aggregator.finalize(duration);

    summary::print_summary(&config, &run_summary);

    report_run(args, &config, &run_summary, telemetry).await;
    Ok(())
}

/// Deliver the run summary to the collector. Every failure mode here is
/// logged and swallowed; the load run itself already completed.
async fn report_run(
    args: &HammerArgs,
    config: &RunConfig,
    run_summary: &RunSummary,
    telemetry: TelemetryConfig,
) {
    let store = SessionStore::new(args.session_file.as_str());
    if args.new_session {
        if let Err(err) = store.clear() {
            warn!("Failed to clear session marker: {}", err);
        }
    }
    let session_id = match store.load_or_create() {
        Ok(session_id) => session_id,
        Err(err) => {
            warn!("Telemetry delivery skipped: {}", err);
            return;
        }
    };

    let user_id = telemetry.user_id.clone();
    let client = match TelemetryClient::new(telemetry) {
        Ok(client) => client,
        Err(err) => {
            warn!("Telemetry delivery skipped: {}", err);
            return;
        }
    };

    let spec = ReportSpec {
        user_id: &user_id,
        challenge_type: &args.challenge_type,
        metric_name: &args.metric_name,
        labels: &args.labels,
        session_id: &session_id,
        commit_hash: args.commit_hash.as_deref(),
    };
    let payload = TelemetryPayload::build(&spec, config, run_summary);

    match client.send(&payload).await {
        DeliveryStatus::Delivered => info!("Run summary delivered to the collector."),
        DeliveryStatus::Disabled => info!("Run summary kept local: telemetry is disabled."),
        DeliveryStatus::Exhausted => warn!("Run summary could not be delivered."),
    }
}
