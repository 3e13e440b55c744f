// ============================================================================
// freezefix-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates every interaction with an external process. The
// detectors only ever see a spawner that yields a process exposing one
// watched output stream as raw byte chunks, plus its exit status.
//
// KEY COMPONENTS:
// - Traits for process interactions (ToolSpawner, ToolProcess)
// - Concrete implementation using ffmpeg-sidecar (SidecarSpawner)
// - Incremental line splitting over byte chunks (lines)
// - Dependency checking and ffprobe frame-rate lookup
//
// DESIGN PHILOSOPHY:
// Dependency injection through the spawner trait keeps the protocol parsers
// testable without an ffmpeg binary; see `mocks` for the scripted spawner.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult, command_start_error};

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;

// ---- Standard library imports ----
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Builder for analysis-only ffmpeg command lines
pub mod ffmpeg_builder;

/// Process spawning backed by ffmpeg-sidecar
pub mod ffmpeg_executor;

/// Frame-rate lookup through ffprobe
pub mod ffprobe_executor;

/// Line splitting over chunked process output
pub mod lines;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_builder::{FfmpegCommandBuilder, freezedetect_filter};
pub use ffmpeg_executor::{SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor};
pub use lines::{LineBuffer, ProcessLines};

// ============================================================================
// PROCESS ABSTRACTION
// ============================================================================

/// Which output stream of the spawned process carries the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchedStream {
    Stdout,
    Stderr,
}

/// Exit status of a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    code: Option<i32>,
}

impl ProcessExit {
    /// Builds an exit from a numeric code; `None` stands for a process
    /// terminated by a signal.
    pub fn from_code(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ProcessExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Trait representing a running analysis process.
///
/// Dropping a process that was never waited must terminate and reap it.
pub trait ToolProcess {
    /// Reads the next chunk of the watched stream into `buf`, returning the
    /// number of bytes read. `Ok(0)` signals end of stream.
    fn read_chunk(&mut self, buf: &mut [u8]) -> CoreResult<usize>;

    /// Waits for the process to exit and returns its status.
    fn wait(&mut self) -> CoreResult<ProcessExit>;
}

/// Trait representing something that can spawn a ToolProcess.
pub trait ToolSpawner {
    type Process: ToolProcess;

    /// Spawns the command, consuming it, with `watch` as the stream to read.
    fn spawn(&self, cmd: FfmpegCommand, watch: WatchedStream) -> CoreResult<Self::Process>;
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that the binary at `binary` can be started.
///
/// Runs `<binary> -version`, discarding its output. A missing binary maps to
/// `CoreError::DependencyNotFound`; any other launch error to
/// `CoreError::CommandStart`.
pub fn check_dependency(binary: &Path) -> CoreResult<()> {
    let name = binary.display().to_string();

    let result = Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) => {
            log::debug!("Found dependency {} ({})", name, status);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", name);
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", name, e);
            Err(command_start_error(name, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_exit_success() {
        assert!(ProcessExit::from_code(Some(0)).success());
        assert!(!ProcessExit::from_code(Some(1)).success());
        assert!(!ProcessExit::from_code(None).success());
        assert_eq!(ProcessExit::from_code(Some(69)).code(), Some(69));
    }

    #[test]
    fn test_missing_dependency_is_reported() {
        let result = check_dependency(Path::new("/nonexistent/freezefix/ffmpeg"));
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }
}
