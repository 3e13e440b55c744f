//! FFmpeg command builder utilities
//!
//! Both detectors run ffmpeg as a pure analysis pass: no banner, no stats
//! line, no interactive stdin, decoded output discarded or written as text to
//! stdout. This builder produces that common prefix for a given binary.

use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::{Path, PathBuf};

/// Builder for creating analysis-only `FFmpeg` commands
pub struct FfmpegCommandBuilder {
    binary: PathBuf,
}

impl FfmpegCommandBuilder {
    /// Creates a builder for the ffmpeg binary at `binary`
    #[must_use]
    pub fn new(binary: impl AsRef<Path>) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
        }
    }

    /// Builds the `FFmpeg` command with the analysis prefix
    #[must_use]
    pub fn build(self) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new_with_path(&self.binary);
        // stdin is piped by the sidecar; keep ffmpeg from treating it as a console
        cmd.args(["-hide_banner", "-nostdin", "-nostats"]);
        cmd
    }
}

/// Builds the freezedetect filter expression.
///
/// `min_duration_secs` is printed with six decimals, the precision ffmpeg
/// reports timestamps with.
#[must_use]
pub fn freezedetect_filter(noise: f64, min_duration_secs: f64) -> String {
    format!("freezedetect=n={}:d={:.6}", noise, min_duration_secs)
}
