use pid_io::metrics::serve_metrics;
use pid_io::MetricsRecorder;
use std::thread;
use tracing::info;

/// Start the metrics endpoint if an address was given and return the
/// recorder that feeds it.
pub fn start(addr: &Option<String>) -> Option<(MetricsRecorder, thread::JoinHandle<()>)> {
    addr.as_ref().map(|addr| {
        info!(addr = %addr, "Starting metrics server");
        (MetricsRecorder::new(), serve_metrics(addr.clone()))
    })
}
