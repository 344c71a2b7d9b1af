use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnumerationError {
    #[error("invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("failed to scan directory at {path}: {source}")]
    DirectoryScan {
        path: PathBuf,
        source: walkdir::Error,
    },
}
