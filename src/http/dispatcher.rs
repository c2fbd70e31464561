use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::sleep;
use tracing::{debug, error};

use super::executor::RequestExecutor;
use crate::args::DispatchMode;
use crate::config::RunConfig;
use crate::metrics::RequestResult;

/// Upper bound for pre-allocating the results collection.
const RESULTS_PREALLOC_MAX: usize = 65_536;

/// Issue `request_count` requests and return exactly that many results,
/// whatever the individual outcomes were.
pub(crate) async fn dispatch_requests<TExecutor>(
    config: &RunConfig,
    executor: &Arc<TExecutor>,
) -> Vec<RequestResult>
where
    TExecutor: RequestExecutor + Send + Sync + 'static,
{
    match config.dispatch {
        DispatchMode::Batched => run_batched(config, executor).await,
        DispatchMode::Burst => run_burst(config, executor).await,
    }
}

/// Batched dispatch: start up to `concurrency` requests, join the whole
/// batch, then start the next one. The barrier means one straggler delays
/// the following batch; that tradeoff keeps batch boundaries deterministic.
async fn run_batched<TExecutor>(config: &RunConfig, executor: &Arc<TExecutor>) -> Vec<RequestResult>
where
    TExecutor: RequestExecutor + Send + Sync + 'static,
{
    let total = config.request_count;
    let batch_size = config.concurrency.get();
    let mut results = Vec::with_capacity(prealloc_capacity(total));
    let mut next_seq: u64 = 0;

    while next_seq < total {
        let mut handles = Vec::with_capacity(batch_size);
        while next_seq < total && handles.len() < batch_size {
            // Pacing applies between consecutive request starts, never at
            // the batch boundary itself.
            if !handles.is_empty() && !config.request_delay.is_zero() {
                sleep(config.request_delay).await;
            }
            let executor = Arc::clone(executor);
            let seq = next_seq;
            handles.push(tokio::spawn(async move { executor.execute(seq).await }));
            next_seq = next_seq.saturating_add(1);
        }

        // Barrier: every request of this batch completes before the next
        // batch starts.
        for handle in handles {
            results.push(join_result(handle.await));
        }
        debug!("Batch complete ({}/{} requests)", results.len(), total);
    }

    results
}

/// Burst dispatch: one task per request for the full count, ungrouped and
/// unpaced. Exists for maximum-burst testing.
async fn run_burst<TExecutor>(config: &RunConfig, executor: &Arc<TExecutor>) -> Vec<RequestResult>
where
    TExecutor: RequestExecutor + Send + Sync + 'static,
{
    let total = config.request_count;
    let mut handles = Vec::with_capacity(prealloc_capacity(total));
    for seq in 0..total {
        let executor = Arc::clone(executor);
        handles.push(tokio::spawn(async move { executor.execute(seq).await }));
    }

    join_all(handles)
        .await
        .into_iter()
        .map(join_result)
        .collect()
}

fn join_result(
    joined: Result<RequestResult, tokio::task::JoinError>,
) -> RequestResult {
    match joined {
        Ok(result) => result,
        Err(err) => {
            error!("Request task failed: {}", err);
            RequestResult::transport_failed(Duration::ZERO)
        }
    }
}

fn prealloc_capacity(total: u64) -> usize {
    usize::try_from(total)
        .unwrap_or(RESULTS_PREALLOC_MAX)
        .min(RESULTS_PREALLOC_MAX)
}
