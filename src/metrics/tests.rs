use std::time::Duration;

use super::*;

fn fixture_results() -> Vec<RequestResult> {
    vec![
        RequestResult::completed(Duration::from_millis(100), 200),
        RequestResult::completed(Duration::from_millis(200), 500),
        RequestResult::completed(Duration::from_millis(50), 200),
    ]
}

fn aggregate(results: &[RequestResult], duration: Duration) -> RunSummary {
    let mut aggregator = RunAggregator::new();
    for result in results {
        aggregator.record(result);
    }
    aggregator.finalize(duration)
}

#[test]
fn empty_run_yields_all_zero_summary() -> Result<(), String> {
    let summary = aggregate(&[], Duration::from_secs(0));
    if summary.total_requests != 0
        || summary.successful_requests != 0
        || summary.error_requests != 0
    {
        return Err(format!("Expected zero counts: {:?}", summary));
    }
    if summary.avg_latency_ms_x100 != 0 || summary.error_rate_x100 != 0 || summary.rps_x100 != 0 {
        return Err(format!("Expected zero rates: {:?}", summary));
    }
    Ok(())
}

#[test]
fn zero_duration_yields_zero_throughput() -> Result<(), String> {
    let summary = aggregate(&fixture_results(), Duration::ZERO);
    if summary.rps_x100 != 0 {
        return Err(format!("Expected zero throughput: {}", summary.rps_x100));
    }
    if summary.total_requests != 3 {
        return Err(format!("Expected counts intact: {:?}", summary));
    }
    Ok(())
}

#[test]
fn fixture_aggregates_to_expected_summary() -> Result<(), String> {
    let summary = aggregate(&fixture_results(), Duration::from_secs(2));
    if summary.total_requests != 3 {
        return Err(format!("total: {}", summary.total_requests));
    }
    if summary.successful_requests != 2 {
        return Err(format!("success: {}", summary.successful_requests));
    }
    if summary.error_requests != 1 {
        return Err(format!("errors: {}", summary.error_requests));
    }
    // (100 + 200 + 50) / 3 = 116.67ms rounded
    if summary.avg_latency_ms_x100 != 11_667 {
        return Err(format!("avg latency: {}", summary.avg_latency_ms_x100));
    }
    // 1 / 3 = 33.33%
    if summary.error_rate_x100 != 3_333 {
        return Err(format!("error rate: {}", summary.error_rate_x100));
    }
    // 2 successes over 2 seconds
    if summary.rps_x100 != 100 {
        return Err(format!("rps: {}", summary.rps_x100));
    }
    Ok(())
}

#[test]
fn aggregation_is_order_independent() -> Result<(), String> {
    let mut reversed = fixture_results();
    reversed.reverse();
    let forward = aggregate(&fixture_results(), Duration::from_secs(2));
    let backward = aggregate(&reversed, Duration::from_secs(2));
    if forward != backward {
        return Err(format!("{:?} != {:?}", forward, backward));
    }
    Ok(())
}

#[test]
fn repeated_aggregation_is_bit_identical() -> Result<(), String> {
    let first = aggregate(&fixture_results(), Duration::from_millis(1500));
    let second = aggregate(&fixture_results(), Duration::from_millis(1500));
    if first != second {
        return Err(format!("{:?} != {:?}", first, second));
    }
    Ok(())
}

#[test]
fn transport_failures_count_with_latency() -> Result<(), String> {
    let results = vec![
        RequestResult::transport_failed(Duration::from_millis(30)),
        RequestResult::completed(Duration::from_millis(10), 204),
    ];
    let summary = aggregate(&results, Duration::from_secs(1));
    if summary.total_requests != 2 || summary.successful_requests != 1 {
        return Err(format!("Unexpected counts: {:?}", summary));
    }
    // (30 + 10) / 2 = 20ms
    if summary.avg_latency_ms_x100 != 2_000 {
        return Err(format!("avg latency: {}", summary.avg_latency_ms_x100));
    }
    if summary.error_rate_x100 != 5_000 {
        return Err(format!("error rate: {}", summary.error_rate_x100));
    }
    Ok(())
}

#[test]
fn redirects_count_as_success() -> Result<(), String> {
    let redirect = RequestResult::completed(Duration::from_millis(5), 302);
    if !redirect.success {
        return Err("Expected 302 to count as success".to_owned());
    }
    let not_found = RequestResult::completed(Duration::from_millis(5), 404);
    if not_found.success {
        return Err("Expected 404 to count as failure".to_owned());
    }
    Ok(())
}
