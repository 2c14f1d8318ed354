use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum StoreError {
    /// Filesystem error reading or writing a document.
    Io { path: PathBuf, message: String },
    /// Document exists but is not valid JSON (or not the expected record type).
    Json { path: PathBuf, message: String },
    /// A required document is absent from storage.
    Missing(PathBuf),
    /// Raw dump is valid JSON but not of the expected shape.
    Shape(String),
}

impl StoreError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub(crate) fn json(path: &Path, err: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Json { path, message } => write!(f, "{}: invalid JSON: {message}", path.display()),
            Self::Missing(path) => write!(f, "{}: not found", path.display()),
            Self::Shape(msg) => write!(f, "unexpected document shape: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
