// freezefix-cli/src/commands/check.rs
//
// Verifies that the external tools can be started.

use crate::cli::CheckArgs;
use crate::error::CliResult;
use freezefix_core::{DetectionConfig, check_dependency};
use log::warn;
use owo_colors::OwoColorize;
use std::path::Path;

/// Runs the `check` command.
///
/// A missing ffmpeg is an error. A missing ffprobe only warns, since it is
/// needed just for perceptual runs without `--fps`.
pub fn run_check(args: CheckArgs) -> CliResult<()> {
    let ffmpeg = args
        .ffmpeg
        .unwrap_or_else(|| DetectionConfig::default().ffmpeg_binary);

    check_dependency(&ffmpeg)?;
    println!("{} {}", "[OK]".green(), ffmpeg.display());

    match check_dependency(Path::new("ffprobe")) {
        Ok(()) => println!("{} ffprobe", "[OK]".green()),
        Err(e) => warn!("{}; pass --fps for perceptual detection", e),
    }
    Ok(())
}
