use std::path::PathBuf;

use thiserror::Error;

/// Fatal pipeline errors. Any of these aborts the run before a document is written.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read input {path}: {reason}")]
    Ingest { path: PathBuf, reason: String },

    #[error("Missing required columns: {}", missing.join(", "))]
    SchemaViolation { missing: Vec<String> },

    #[error("Failed to render report: {0}")]
    Render(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ReportError {
    pub(crate) fn ingest(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ReportError::Ingest {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<minijinja::Error> for ReportError {
    fn from(err: minijinja::Error) -> Self {
        // minijinja's Display omits the chained detail; include it
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            msg.push_str(": ");
            msg.push_str(&inner.to_string());
            source = inner.source();
        }
        ReportError::Render(msg)
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
