pub mod console;
pub mod csv;
pub mod error;
pub mod fanout;
pub mod jsonl;
pub mod metrics;
pub mod tags;

pub use console::ConsoleRecorder;
pub use csv::{open_csv_or_skip, CsvRecorder, CSV_HEADER};
pub use error::SinkError;
pub use fanout::RecorderSet;
pub use jsonl::{JsonlEntry, JsonlRecorder};
pub use metrics::{init_metrics, serve_metrics, MetricsRecorder};
