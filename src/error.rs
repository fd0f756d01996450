use std::path::PathBuf;
use thiserror::Error;

/// Core library errors
#[derive(Error, Debug)]
pub enum SweeperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Console I/O error: {0}")]
    Console(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SweeperError {
    /// Map an I/O error on `path` to the matching variant.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => SweeperError::PathNotFound(path),
            std::io::ErrorKind::PermissionDenied => SweeperError::PermissionDenied(path),
            _ => SweeperError::Io { path, source },
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failures of the external OS utilities we shell out to
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("'{program}' not found (macOS only?)")]
    NotFound { program: String },

    #[error("'{program}' exited with status {}: {stderr}", describe_status(.status))]
    Failed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{operation} requires root privileges, try running with sudo")]
    RequiresRoot { operation: String },

    #[error("Failed to run '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    status.map_or_else(|| "unknown".to_string(), |code| code.to_string())
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SweeperError>;
