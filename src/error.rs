//! Error types for the inline tuner.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every error here is fatal to the session. A missing measurement would
/// bias the aggregate objective, so nothing is retried or skipped.
#[derive(Error, Debug)]
pub enum TuneError {
    #[error("Build failed: `{command}` exited with {status}")]
    BuildFailure {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Execution failed: `{command}` exited with {status}")]
    ExecutionFailure { command: String, status: String },

    #[error("Profile output {expected:?} missing after profiling run of '{benchmark}': {source}")]
    ProfileArtifactMissing {
        benchmark: String,
        expected: PathBuf,
        source: io::Error,
    },

    #[error("Failed to launch `{command}`: {source}")]
    Spawn { command: String, source: io::Error },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, TuneError>;
