//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Dependency check for ffmpeg and ffprobe.
pub mod check;

/// Detection of repair ranges in one video.
pub mod detect;
