// ============================================================================
// freezefix-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// This module provides error handling utilities for the CLI that integrate
// with the freezefix-core error types while adding CLI-specific context.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: lazy context prefix for failed Results

// ---- Internal crate imports ----
use freezefix_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::fmt;

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// ERROR CONTEXT
// ============================================================================

/// Prefixes a failed result with a lazily built description of what the CLI
/// was doing, producing `CoreError::OperationFailed`.
pub trait CliErrorContext<T> {
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", f(), core_error))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_gets_context() {
        let result: Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result
            .cli_with_context(|| format!("Invalid input path '{}'", "a.mkv"))
            .unwrap_err();
        assert!(matches!(err, CoreError::OperationFailed(_)));
        assert!(err.to_string().starts_with("Invalid input path 'a.mkv': "));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_core_error_keeps_its_message() {
        let result: CliResult<u32> = Err(CoreError::FfprobeParse("no video stream".to_string()));
        let err = result
            .cli_with_context(|| "Failed to read frame rate")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to read frame rate: ffprobe error: no video stream"
        );
    }

    #[test]
    fn test_success_skips_context() {
        let ok: Result<u32, io::Error> = Ok(3);
        let value = ok
            .cli_with_context(|| -> String { panic!("context built for a success") })
            .unwrap();
        assert_eq!(value, 3);
    }
}
