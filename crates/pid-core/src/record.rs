use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State emitted once per simulation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: u32,
    pub target_speed: f64,
    pub actual_speed: f64,
    pub error: f64,
    pub control_signal: f64,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record sink I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("record sink is closed")]
    Closed,
}

/// Consumer of cycle records. Failures are reported but never stop a run.
pub trait Recorder {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError>;

    /// Flush and release the sink. Called once when the loop finishes.
    fn finish(&mut self) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn record(&mut self, _record: &CycleRecord) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Keeps every record in memory.
impl Recorder for Vec<CycleRecord> {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError> {
        self.push(*record);
        Ok(())
    }
}

/// An absent sink skips persistence.
impl<R: Recorder> Recorder for Option<R> {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError> {
        match self {
            Some(inner) => inner.record(record),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        match self {
            Some(inner) => inner.finish(),
            None => Ok(()),
        }
    }
}

impl<R: Recorder + ?Sized> Recorder for &mut R {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError> {
        (**self).record(record)
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        (**self).finish()
    }
}

impl<R: Recorder + ?Sized> Recorder for Box<R> {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError> {
        (**self).record(record)
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        (**self).finish()
    }
}
