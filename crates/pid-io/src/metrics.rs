//! Prometheus metrics for a running simulation.
//!
//! Gauges mirror the latest cycle record so a scraper can follow a paced run
//! live; the HTTP endpoint is optional and read-only.

use crate::tags;
use pid_core::{CycleRecord, RecordError, Recorder};
use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::LazyLock;
use std::thread;
use tiny_http::{Response, Server};

/// Global metrics registry
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

fn register_gauge(tag: tags::Tag) -> Gauge {
    let gauge = Gauge::new(tag.metric, tag.help).unwrap();
    REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
}

/// Index of the most recent cycle
pub static CYCLE: LazyLock<Gauge> = LazyLock::new(|| register_gauge(tags::CYCLE));

pub static TARGET_SPEED: LazyLock<Gauge> = LazyLock::new(|| register_gauge(tags::TARGET_SPEED));

pub static ACTUAL_SPEED: LazyLock<Gauge> = LazyLock::new(|| register_gauge(tags::ACTUAL_SPEED));

pub static ERROR: LazyLock<Gauge> = LazyLock::new(|| register_gauge(tags::ERROR));

pub static CONTROL_SIGNAL: LazyLock<Gauge> = LazyLock::new(|| register_gauge(tags::CONTROL_SIGNAL));

/// Total cycles recorded
pub static CYCLES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(tags::CYCLES_TOTAL.metric, tags::CYCLES_TOTAL.help).unwrap();
    REGISTRY.register(Box::new(counter.clone())).unwrap();
    counter
});

/// Distribution of absolute tracking error
pub static ABS_ERROR: LazyLock<Histogram> = LazyLock::new(|| {
    let histogram = Histogram::with_opts(
        HistogramOpts::new(tags::ABS_ERROR.metric, tags::ABS_ERROR.help)
            .buckets(vec![0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
    )
    .unwrap();
    REGISTRY.register(Box::new(histogram.clone())).unwrap();
    histogram
});

/// Initialize all metrics (forces lazy initialization)
pub fn init_metrics() {
    let _ = CYCLE.get();
    let _ = TARGET_SPEED.get();
    let _ = ACTUAL_SPEED.get();
    let _ = ERROR.get();
    let _ = CONTROL_SIGNAL.get();
    let _ = CYCLES_TOTAL.get();
    let _ = ABS_ERROR.get_sample_count();
}

/// Publishes each cycle record to the global registry.
#[derive(Debug, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn new() -> Self {
        init_metrics();
        Self
    }
}

impl Recorder for MetricsRecorder {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError> {
        CYCLE.set(f64::from(record.cycle));
        TARGET_SPEED.set(record.target_speed);
        ACTUAL_SPEED.set(record.actual_speed);
        ERROR.set(record.error);
        CONTROL_SIGNAL.set(record.control_signal);
        ABS_ERROR.observe(record.error.abs());
        CYCLES_TOTAL.inc();
        Ok(())
    }
}

/// Render the registry in the Prometheus text format.
pub fn render() -> Result<Vec<u8>, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(buffer)
}

/// Status and body for one request path. `/ready` turns 200 once at least
/// one cycle has been recorded.
pub fn respond(url: &str, cycles_recorded: u64) -> (u16, String) {
    match url {
        "/metrics" => match render().map(String::from_utf8) {
            Ok(Ok(text)) => (200, text),
            Ok(Err(e)) => {
                tracing::warn!("Metrics output is not UTF-8: {}", e);
                (500, "Internal Server Error".to_string())
            }
            Err(e) => {
                tracing::warn!("Failed to encode metrics: {}", e);
                (500, "Internal Server Error".to_string())
            }
        },
        "/health" => (200, "OK".to_string()),
        "/ready" if cycles_recorded > 0 => (200, "Ready".to_string()),
        "/ready" => (503, "Not Ready".to_string()),
        _ => (404, "Not Found".to_string()),
    }
}

/// Start the metrics HTTP server on the given address.
/// Returns a join handle for the server thread.
pub fn serve_metrics(bind_addr: String) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let server = match Server::http(&bind_addr) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Failed to start metrics server on {}: {}", bind_addr, e);
                return;
            }
        };

        tracing::info!("Metrics server listening on http://{}/metrics", bind_addr);

        for request in server.incoming_requests() {
            let (status, body) = respond(request.url(), CYCLES_TOTAL.get());
            let mut response = Response::from_string(body).with_status_code(status);
            if request.url() == "/metrics" && status == 200 {
                if let Ok(header) = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"text/plain; version=0.0.4"[..],
                ) {
                    response = response.with_header(header);
                }
            }
            let _ = request.respond(response);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_updates_gauges_and_renders() {
        let mut recorder = MetricsRecorder::new();
        let before = CYCLES_TOTAL.get();
        recorder
            .record(&CycleRecord {
                cycle: 3,
                target_speed: 100.0,
                actual_speed: 80.0,
                error: 20.0,
                control_signal: 12.5,
            })
            .unwrap();

        assert!(CYCLES_TOTAL.get() > before);

        let text = String::from_utf8(render().unwrap()).unwrap();
        assert!(text.contains(tags::ACTUAL_SPEED.metric));
        assert!(text.contains(tags::CYCLES_TOTAL.metric));
        assert!(text.contains(tags::ABS_ERROR.metric));
    }

    #[test]
    fn endpoints_answer_by_path() {
        assert_eq!(respond("/health", 0), (200, "OK".to_string()));
        assert_eq!(respond("/nope", 0).0, 404);
        assert_eq!(respond("/", 5).0, 404);
    }

    #[test]
    fn ready_waits_for_first_cycle() {
        assert_eq!(respond("/ready", 0), (503, "Not Ready".to_string()));

        let mut recorder = MetricsRecorder::new();
        recorder
            .record(&CycleRecord {
                cycle: 0,
                target_speed: 100.0,
                actual_speed: 45.0,
                error: 55.0,
                control_signal: 90.5,
            })
            .unwrap();
        assert_eq!(respond("/ready", CYCLES_TOTAL.get()), (200, "Ready".to_string()));

        let (status, body) = respond("/metrics", CYCLES_TOTAL.get());
        assert_eq!(status, 200);
        assert!(body.contains(tags::CYCLES_TOTAL.metric));
    }
}
