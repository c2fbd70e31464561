use std::time::Duration;

use super::types::{RequestResult, RunSummary};

/// Incremental fold of request outcomes into one `RunSummary`.
///
/// Recording is commutative, so the order in which concurrent results
/// arrive does not affect the summary.
#[derive(Debug, Default)]
pub struct RunAggregator {
    total_requests: u64,
    successful_requests: u64,
    latency_sum_ms: u128,
}

impl RunAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &RequestResult) {
        self.total_requests = self.total_requests.saturating_add(1);
        if result.success {
            self.successful_requests = self.successful_requests.saturating_add(1);
        }
        self.latency_sum_ms = self.latency_sum_ms.saturating_add(result.latency.as_millis());
    }

    /// Close the fold with the run's wall-clock duration.
    ///
    /// The degenerate cases (no results, zero duration) take explicit zero
    /// branches rather than relying on division behavior.
    #[must_use]
    pub fn finalize(&self, duration: Duration) -> RunSummary {
        let total = self.total_requests;
        let success = self.successful_requests;
        let errors = total.saturating_sub(success);

        let avg_latency_ms_x100 = if total > 0 {
            let scaled = self
                .latency_sum_ms
                .saturating_mul(100)
                .saturating_add(u128::from(total) / 2)
                .checked_div(u128::from(total))
                .unwrap_or(0);
            u64::try_from(scaled).map_or(u64::MAX, |value| value)
        } else {
            0
        };

        let error_rate_x100 = if total > 0 {
            let scaled = u128::from(errors)
                .saturating_mul(10_000)
                .checked_div(u128::from(total))
                .unwrap_or(0);
            u64::try_from(scaled).map_or(u64::MAX, |value| value)
        } else {
            0
        };

        let duration_ms = duration.as_millis();
        let rps_x100 = if duration_ms == 0 {
            0
        } else {
            let scaled = u128::from(success)
                .saturating_mul(100_000)
                .checked_div(duration_ms)
                .unwrap_or(0);
            u64::try_from(scaled).map_or(u64::MAX, |value| value)
        };

        RunSummary {
            total_requests: total,
            successful_requests: success,
            error_requests: errors,
            avg_latency_ms_x100,
            error_rate_x100,
            rps_x100,
            duration,
        }
    }
}
