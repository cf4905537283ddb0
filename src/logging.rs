// ==========================================
// Logging initialization
// ==========================================
// Backed by tracing and tracing-subscriber
// Level filter comes from RUST_LOG
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber.
///
/// # Environment
/// - RUST_LOG: level filter (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=wood_qc_report=trace
///
/// # Example
/// ```no_run
/// use wood_qc_report::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the JSON output of `inspect`, so logs go to stderr
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Same filter as [`init`], one JSON object per event.
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Test subscriber: debug level, captured by the test harness.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
