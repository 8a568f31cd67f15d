use std::path::PathBuf;
use thiserror::Error;
use tokio::task::JoinError;

use crate::merge::FileMergeError;

/// Type alias for Result with MergerError as the error type
pub type MergerResult<T> = Result<T, MergerError>;

/// Custom error types for the text merger
#[derive(Error, Debug)]
pub enum MergerError {
    /// Standard IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failures carrying extra context, such as an unopenable log file
    #[error("Internal error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Configuration file errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Empty request list, `Auto` used where a concrete encoding is required,
    /// or any other unusable setting
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A token of the directory extension filter could not be used
    #[error("Invalid extension token: {token} (examples: .txt,.md or txt;csv)")]
    InvalidExtensionToken { token: String },

    /// Every input of a merge failed to read; nothing was written
    #[error("All {} input files failed to read", .errors.len())]
    AllInputsFailed { errors: Vec<FileMergeError> },

    /// The merged output could not be written
    #[error("Failed to write output {}: {source}", .path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Task or prompt failures in the command layer
    #[error("Processing error: {0}")]
    Processing(String),
}

/// Specific errors related to configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No input paths were given")]
    MissingInputs,

    #[error("Output path must be specified")]
    MissingOutput,

    #[error("Output directory is not writable: {0}")]
    OutputDirectoryNotWritable(PathBuf),

    #[error("Output path is also an input: {0}")]
    OutputIsInput(PathBuf),

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<dialoguer::Error> for MergerError {
    fn from(err: dialoguer::Error) -> Self {
        MergerError::Processing(err.to_string())
    }
}

impl From<JoinError> for MergerError {
    fn from(err: JoinError) -> Self {
        MergerError::Processing(format!("Task join error: {}", err))
    }
}

impl From<serde_json::Error> for MergerError {
    fn from(err: serde_json::Error) -> Self {
        MergerError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_inputs_failed_message_counts_errors() {
        let err = MergerError::AllInputsFailed {
            errors: vec![
                FileMergeError::new("a.txt", "file not found"),
                FileMergeError::new("b.txt", "access denied"),
            ],
        };
        assert_eq!(err.to_string(), "All 2 input files failed to read");
    }

    #[test]
    fn test_extension_token_message_names_token() {
        let err = MergerError::InvalidExtensionToken {
            token: "a/b".to_string(),
        };
        assert!(err.to_string().contains("a/b"));
    }
}
