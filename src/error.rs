//! Error types for shellbox

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellboxError {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    ConfigValidation(String),

    #[error("{0} already exists in the current directory")]
    AlreadyInitialized(String),

    #[error("container provider '{0}' is not available. Please install {0} first")]
    ProviderUnavailable(String),

    #[error("failed to build image: {0}")]
    BuildFailed(String),

    #[error("container engine error: {0}")]
    EngineFailed(String),

    #[error("failed to parse engine output: {0}")]
    EngineOutput(#[from] serde_json::Error),

    /// The command executed inside the container exited non-zero. Not a
    /// tool error: the caller propagates the code verbatim, with no message.
    #[error("command exited with status {0}")]
    CommandExited(i32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ShellboxError>;
