// ============================================================================
// freezefix-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Detection Core
//
// Every failure a detector can surface to its caller is a `CoreError`.
// Malformed tool output is never an error; it is skipped by the parsers.
//
// KEY COMPONENTS:
// - CoreError: launch failures, unproductive process exits, ffprobe failures
// - CoreResult: result alias used across the crate
// - Constructor helpers for process-related errors

use std::io;
use thiserror::Error;

/// Errors produced by the detection core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, io::Error),

    #[error("Failed waiting for {0}: {1}")]
    CommandWait(String, io::Error),

    #[error("{tool} exited with {status}: {message}")]
    CommandFailed {
        tool: String,
        code: Option<i32>,
        status: String,
        message: String,
    },

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("ffprobe error: {0}")]
    FfprobeParse(String),

    #[error("{0}")]
    OperationFailed(String),
}

impl CoreError {
    /// Exit code of the failed process, when the error came from one that
    /// exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CoreError::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}

/// Result type for detection core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds the error for a process that could not be launched.
pub fn command_start_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(tool.into(), err)
}

/// Builds the error for a failure while waiting on a running process.
pub fn command_wait_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(tool.into(), err)
}

/// Builds the error for a process that exited unsuccessfully from its
/// exit code. `None` means the process was terminated by a signal.
pub fn command_failed_error(
    tool: impl Into<String>,
    code: Option<i32>,
    message: impl Into<String>,
) -> CoreError {
    let status = match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    };
    CoreError::CommandFailed {
        tool: tool.into(),
        code,
        status,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_error_carries_exit_code() {
        let err = command_failed_error("ffmpeg", Some(183), "no usable output");
        assert_eq!(err.exit_code(), Some(183));
        assert_eq!(
            err.to_string(),
            "ffmpeg exited with exit code 183: no usable output"
        );
    }

    #[test]
    fn test_signal_termination_has_no_exit_code() {
        let err = command_failed_error("ffmpeg", None, "killed");
        assert_eq!(err.exit_code(), None);
        assert!(err.to_string().contains("termination by signal"));
    }

    #[test]
    fn test_other_errors_have_no_exit_code() {
        let err = CoreError::DependencyNotFound("ffmpeg".to_string());
        assert_eq!(err.exit_code(), None);
    }
}
