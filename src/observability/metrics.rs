//! Fetch and binding metrics.
//!
//! # Metrics
//! - `nixdb_fetch_attempts_total` (counter): every request issued, by status
//! - `nixdb_fetch_results_total` (counter): finished fetches, by outcome
//! - `nixdb_fetch_duration_seconds` (histogram): wall time including retries
//! - `nixdb_binding_updates_total` (counter): resolved binds, by outcome

use std::time::Duration;

/// Record a single request. `status` is `None` when the transport failed.
pub fn record_attempt(status: Option<u16>) {
    let status = status.map_or_else(|| "transport_error".to_string(), |s| s.to_string());
    metrics::counter!("nixdb_fetch_attempts_total", "status" => status).increment(1);
}

/// Record the end of a fetch (all attempts included).
pub fn record_fetch(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("nixdb_fetch_results_total", "outcome" => outcome).increment(1);
    metrics::histogram!("nixdb_fetch_duration_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}

/// Record what a binding did with a resolved fetch.
pub fn record_binding_update(outcome: &'static str) {
    metrics::counter!("nixdb_binding_updates_total", "outcome" => outcome).increment(1);
}
