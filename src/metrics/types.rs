use std::time::Duration;

/// Outcome of a single dispatched request.
///
/// The latency is measured from dispatch to final receipt or error, so a
/// request that never produced a response still carries the time it took
/// to fail. The status is absent for network-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestResult {
    pub latency: Duration,
    pub status: Option<u16>,
    pub success: bool,
}

impl RequestResult {
    /// A request that received a response; 2xx/3xx counts as success.
    #[must_use]
    pub const fn completed(latency: Duration, status: u16) -> Self {
        Self {
            latency,
            status: Some(status),
            success: status >= 200 && status < 400,
        }
    }

    /// A request that failed before any response arrived.
    #[must_use]
    pub const fn transport_failed(latency: Duration) -> Self {
        Self {
            latency,
            status: None,
            success: false,
        }
    }
}

/// Aggregate statistics for one run.
///
/// Rates carry two implied decimal places (`_x100` scaling) so the summary
/// stays integer-only and repeated aggregation over the same results is
/// bit-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub error_requests: u64,
    /// Arithmetic mean latency in milliseconds, x100, rounded.
    pub avg_latency_ms_x100: u64,
    /// Failed share of all requests in percent, x100.
    pub error_rate_x100: u64,
    /// Successful requests per second of wall-clock duration, x100.
    pub rps_x100: u64,
    pub duration: Duration,
}
