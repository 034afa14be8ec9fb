//! Pipeline errors.

use std::fmt;
use std::io;

use thiserror::Error;

use platboot_targets::TargetError;

/// The pipeline stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Patch,
    Run,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Build => "build",
            Stage::Patch => "patch",
            Stage::Run => "run",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while resolving or running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The run configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] TargetError),

    /// A stage's process ran and exited unsuccessfully.
    #[error("{stage} stage failed with {}", status_text(status))]
    StageFailed {
        /// The failing stage.
        stage: Stage,
        /// Exit code, if the process exited normally.
        status: Option<i32>,
    },

    /// A stage failed around its process: spawning it, or copying or
    /// removing the reference image.
    #[error("{stage} stage failed: {context}: {source}")]
    StageIo {
        /// The failing stage.
        stage: Stage,
        /// What was being done when the I/O failed.
        context: String,
        source: io::Error,
    },
}

impl PipelineError {
    /// Process exit code this error maps to.
    ///
    /// A stage failure propagates the child's own exit code; everything
    /// else (configuration errors, I/O failures, signal-terminated
    /// children) exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::StageFailed {
                status: Some(code), ..
            } => *code,
            _ => 1,
        }
    }
}

fn status_text(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
