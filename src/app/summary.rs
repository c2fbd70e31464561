use crate::config::RunConfig;
use crate::metrics::RunSummary;

/// Print the end-of-run summary. This always happens before any telemetry
/// attempt so run results survive a collector outage.
pub(crate) fn print_summary(config: &RunConfig, summary: &RunSummary) {
    let duration_ms = summary.duration.as_millis();
    let duration_s = duration_ms / 1000;
    let duration_centis = duration_ms % 1000 / 10;

    println!("Load run finished.");
    println!(
        "Target: {} ({}, {} dispatch)",
        config.target_url,
        config.method.as_str(),
        config.dispatch.as_str()
    );
    println!("Duration: {}.{:02}s", duration_s, duration_centis);
    println!("Total Requests: {}", summary.total_requests);
    println!("Successful: {}", summary.successful_requests);
    println!("Failed: {}", summary.error_requests);
    println!(
        "Avg Latency: {}.{:02}ms",
        summary.avg_latency_ms_x100 / 100,
        summary.avg_latency_ms_x100 % 100
    );
    println!(
        "Error Rate: {}.{:02}%",
        summary.error_rate_x100 / 100,
        summary.error_rate_x100 % 100
    );
    println!(
        "Throughput: {}.{:02} req/s",
        summary.rps_x100 / 100,
        summary.rps_x100 % 100
    );
}
