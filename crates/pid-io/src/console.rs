use pid_core::{CycleRecord, RecordError, Recorder};
use std::io::{self, Stdout, Write};

/// Human-readable status line for one cycle.
pub fn format_status(record: &CycleRecord) -> String {
    format!(
        "[Cycle {:03}] Target: {:.2} | Speed: {:.2} | Error: {:.2} | Output: {:.2}",
        record.cycle,
        record.target_speed,
        record.actual_speed,
        record.error,
        record.control_signal
    )
}

/// Prints a status line per cycle for live monitoring.
pub struct ConsoleRecorder<W: Write = Stdout> {
    out: W,
}

impl ConsoleRecorder<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleRecorder<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Recorder for ConsoleRecorder<W> {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError> {
        writeln!(self.out, "{}", format_status(record))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        self.out.flush()?;
        Ok(())
    }
}
