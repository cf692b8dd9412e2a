use std::{fs::OpenOptions, io::Write, path::Path, sync::Mutex};

use tracing::warn;

use crate::trace::trace::TraceEvent;

/// Appends workflow `TraceEvent`s to a file, one JSON object per line.
///
/// An unusable trace file never fails the workflow: opening problems leave
/// the logger disabled, write problems are reported and skipped.
pub struct TraceLogger {
    sink: Option<Mutex<Box<dyn Write + Send>>>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self::from_writer(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open trace file");
                Self::disabled()
            }
        }
    }

    /// Trace into any writer, e.g. stderr or an in-memory buffer.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Some(Mutex::new(Box::new(writer))),
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(event = %event.event, error = %e, "could not serialize trace event");
                return;
            }
        };

        let Ok(mut writer) = sink.lock() else {
            warn!("trace sink poisoned; dropping event");
            return;
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!(event = %event.event, error = %e, "could not write trace event");
        }
    }
}
