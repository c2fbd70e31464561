use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_label, parse_positive_usize};
use super::types::{DispatchMode, HttpMethod, PositiveUsize};

pub(crate) const DEFAULT_TARGET_URL: &str = "http://url-anvil:8080";

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent HTTP load generator with batched dispatch, run summaries, and retrying telemetry delivery to a metrics collector."
)]
pub struct HammerArgs {
    /// Total number of requests to send
    pub request_count: u64,

    /// Target URL for the load run
    #[arg(default_value = DEFAULT_TARGET_URL)]
    pub url: String,

    /// HTTP method to use
    #[arg(
        long,
        short = 'X',
        default_value = "get",
        ignore_case = true,
        env = "REQUEST_METHOD"
    )]
    pub method: HttpMethod,

    /// Comma-separated URLs sent as the POST request payload
    #[arg(long = "payload-urls", env = "PAYLOAD_URLS", value_delimiter = ',')]
    pub payload_urls: Vec<String>,

    /// Number of requests issued concurrently per batch
    #[arg(
        long,
        short = 'c',
        default_value = "10",
        value_parser = parse_positive_usize
    )]
    pub concurrency: PositiveUsize,

    /// Dispatch strategy
    #[arg(long, default_value = "batched", ignore_case = true)]
    pub dispatch: DispatchMode,

    /// Delay between consecutive request starts in batched mode (supports ms/s/m/h)
    #[arg(long = "delay", default_value = "100ms", value_parser = parse_duration_arg)]
    pub request_delay: Duration,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Challenge name reported with the run summary
    #[arg(long = "challenge-type", default_value = "load-test")]
    pub challenge_type: String,

    /// Metric name reported with the run summary
    #[arg(long = "metric-name", default_value = "load_test_run")]
    pub metric_name: String,

    /// Commit hash echoed into the reporting payload
    #[arg(long = "commit-hash")]
    pub commit_hash: Option<String>,

    /// Extra reporting label in 'key=value' form (repeatable)
    #[arg(long = "label", value_parser = parse_label)]
    pub labels: Vec<(String, String)>,

    /// Path of the persisted session marker file
    #[arg(long = "session-file", default_value = ".hammer-session")]
    pub session_file: String,

    /// Clear the persisted session marker before the run
    #[arg(long = "new-session")]
    pub new_session: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}
