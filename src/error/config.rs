use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {message}")]
    ReadError { path: PathBuf, message: String },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("unsupported config format: {format} (expected json or yaml)")]
    UnsupportedFormat { format: String },

    #[error("invalid namespace mapping '{value}' (expected DIR=NAMESPACE)")]
    InvalidMapping { value: String },
}

impl ConfigError {
    pub fn read_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ReadError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn invalid_mapping(value: impl Into<String>) -> Self {
        Self::InvalidMapping {
            value: value.into(),
        }
    }
}
