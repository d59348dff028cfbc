//! CSV persistence of cycle records.
//!
//! The layout is fixed so existing spreadsheets and plotting scripts keep
//! working: one header line, then one row per cycle with the index as an
//! integer and every real formatted to four decimals.

use crate::error::SinkError;
use pid_core::{CycleRecord, RecordError, Recorder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CSV_HEADER: &str = "cycle,target_speed,actual_speed,error,control_signal";

/// Format one record as a CSV row, without the trailing newline.
pub fn format_row(record: &CycleRecord) -> String {
    format!(
        "{},{:.4},{:.4},{:.4},{:.4}",
        record.cycle,
        record.target_speed,
        record.actual_speed,
        record.error,
        record.control_signal
    )
}

/// Writes cycle records to any `Write` destination.
pub struct CsvRecorder<W: Write> {
    writer: W,
    rows: u64,
}

impl CsvRecorder<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path).map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufWriter::with_capacity(8192, file)).map_err(|source| SinkError::Header {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl<W: Write> CsvRecorder<W> {
    pub fn new(mut writer: W) -> std::io::Result<Self> {
        writeln!(writer, "{}", CSV_HEADER)?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    pub fn into_inner(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Recorder for CsvRecorder<W> {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError> {
        writeln!(self.writer, "{}", format_row(record))?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Open a CSV sink, logging instead of failing when the destination is unusable.
pub fn open_csv_or_skip(path: &Path) -> Option<CsvRecorder<BufWriter<File>>> {
    match CsvRecorder::create(path) {
        Ok(recorder) => {
            tracing::info!(path = %path.display(), "CSV logging enabled");
            Some(recorder)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Continuing without CSV logging");
            None
        }
    }
}
