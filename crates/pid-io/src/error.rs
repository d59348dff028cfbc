use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while setting up a record sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write header to {path}: {source}")]
    Header {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
