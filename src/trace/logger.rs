use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::trace::trace::TraceEvent;

/// Appends step events to a JSONL file, one object per line.
///
/// Shared by every scenario worker; writes are serialized through a mutex so
/// lines never interleave. A logger that could not open its file is a no-op.
pub struct TraceLogger {
    sink: Option<(PathBuf, Mutex<File>)>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Some((path.to_path_buf(), Mutex::new(file))),
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not open trace file, tracing disabled");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Record one event. Failures are logged and otherwise ignored.
    pub fn log(&self, event: &TraceEvent) {
        let Some((path, file)) = &self.sink else {
            return;
        };
        if let Err(e) = append(file, event) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write trace event");
        }
    }
}

fn append(file: &Mutex<File>, event: &TraceEvent) -> io::Result<()> {
    let mut line = serde_json::to_vec(event).map_err(io::Error::other)?;
    line.push(b'\n');

    let mut file = file
        .lock()
        .map_err(|_| io::Error::other("trace file lock poisoned"))?;
    file.write_all(&line)
}
