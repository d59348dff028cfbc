use pid_core::{CycleRecord, RecordError, Recorder};

/// Forwards every record to each registered sink in order.
///
/// A failing sink does not prevent the remaining sinks from seeing the record;
/// the first failure is reported back to the loop.
#[derive(Default)]
pub struct RecorderSet {
    sinks: Vec<(&'static str, Box<dyn Recorder>)>,
}

impl RecorderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, sink: impl Recorder + 'static) {
        self.sinks.push((name, Box::new(sink)));
    }

    pub fn with(mut self, name: &'static str, sink: impl Recorder + 'static) -> Self {
        self.push(name, sink);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|(name, _)| *name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn for_each(
        &mut self,
        mut f: impl FnMut(&mut dyn Recorder) -> Result<(), RecordError>,
    ) -> Result<(), RecordError> {
        let mut first_err = None;
        for (name, sink) in self.sinks.iter_mut() {
            if let Err(e) = f(sink.as_mut()) {
                tracing::debug!(sink = *name, error = %e, "Record sink failed");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Recorder for RecorderSet {
    fn record(&mut self, record: &CycleRecord) -> Result<(), RecordError> {
        self.for_each(|sink| sink.record(record))
    }

    fn finish(&mut self) -> Result<(), RecordError> {
        self.for_each(|sink| sink.finish())
    }
}
