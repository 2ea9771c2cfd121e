use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubfixError {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid range: {message} (nearest valid boundary: {hint})")]
    Range { message: String, hint: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Track is empty")]
    EmptyTrack,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SubfixError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        SubfixError::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SubfixError::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SubfixError>;
