//! JSON Lines persistence of cycle records.
//!
//! Each line is a self-contained object, which makes the output easy to
//! stream into log aggregation or dataframe tooling.

use crate::error::SinkError;
use pid_core::{CycleRecord, RecordError, Recorder};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// A single JSONL entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonlEntry {
    /// Simulated time at the end of the cycle, in seconds
    pub sim_time_s: f64,
    #[serde(flatten)]
    pub record: CycleRecord,
}

/// Writes one JSON object per cycle.
pub struct JsonlRecorder {
    writer: BufWriter<File>,
    dt: f64,
}

impl JsonlRecorder {
    /// Create a new recorder writing to the specified path.
    /// Parent directories are created and an existing file is truncated.
    pub fn create(path: &Path, dt: f64) -> Result<Self, SinkError> {
        let open_err = |source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(open_err)?;

        Ok(Self {
            writer: BufWriter::with_capacity(8192, file),
            dt,
        })
    }
}

impl Recorder for JsonlRecorder {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError> {
        let entry = JsonlEntry {
            sim_time_s: (f64::from(record.cycle) + 1.0) * self.dt,
            record: *record,
        };
        serde_json::to_writer(&mut self.writer, &entry)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        self.writer.flush()?;
        Ok(())
    }
}
