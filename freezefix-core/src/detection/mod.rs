//! Repair-range detection.
//!
//! Two independent detectors locate runs of repeated frames:
//!
//! - [`freeze`]: perceptual, from the freezedetect filter's stderr log,
//!   converting freeze timestamps to frame indices at a constant frame rate.
//! - [`duplicate`]: exact, from framemd5 per-frame hashes on stdout.
//!
//! Each call launches exactly one ffmpeg process, reads its protocol stream
//! line by line as it arrives and returns a merged, ascending list of
//! inclusive repair ranges. No state survives between calls.

pub mod duplicate;
pub mod freeze;

pub use duplicate::detect_duplicate_ranges;
pub use freeze::detect_freeze_ranges;

use crate::config::{DetectionConfig, DetectionMode};
use crate::error::CoreResult;
use crate::external::{ProcessExit, ProcessLines, ToolProcess, ToolSpawner, WatchedStream};
use crate::ranges::FrameRange;
use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::Path;

/// Optional per-line observer receiving every raw protocol line, in order.
pub type LineObserver<'a> = Option<&'a mut dyn FnMut(&str)>;

/// Runs the detector selected by `config.mode` on `video`.
///
/// `fps` is only consulted in perceptual mode; a missing or unusable rate
/// yields an empty result there without launching ffmpeg.
pub fn detect_repair_ranges<S: ToolSpawner>(
    spawner: &S,
    video: &Path,
    config: &DetectionConfig,
    fps: Option<f64>,
    observer: LineObserver<'_>,
) -> CoreResult<Vec<FrameRange>> {
    log::debug!(
        "Detecting {} repair ranges in {}",
        config.mode.as_str(),
        video.display()
    );
    match config.mode {
        DetectionMode::Exact => detect_duplicate_ranges(
            spawner,
            &config.ffmpeg_binary,
            video,
            &config.duplicate,
            observer,
        ),
        DetectionMode::Perceptual => detect_freeze_ranges(
            spawner,
            &config.ffmpeg_binary,
            video,
            &config.freeze,
            fps.unwrap_or(f64::NAN),
            observer,
        ),
    }
}

/// Spawns `cmd`, feeds every complete line of the watched stream to the
/// observer and then to `on_line`, and returns the exit status.
///
/// A read error aborts the run; the process is terminated when it drops.
pub(crate) fn run_line_protocol<S, F>(
    spawner: &S,
    cmd: FfmpegCommand,
    watch: WatchedStream,
    mut observer: LineObserver<'_>,
    mut on_line: F,
) -> CoreResult<ProcessExit>
where
    S: ToolSpawner,
    F: FnMut(&str),
{
    log::debug!(
        "Running ffmpeg: {}",
        cmd.get_args()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let mut process = spawner.spawn(cmd, watch)?;
    let mut line_count: u64 = 0;
    for line in ProcessLines::new(&mut process) {
        let line = line?;
        line_count += 1;
        log::trace!("ffmpeg {:?}: {}", watch, line);
        if let Some(observe) = observer.as_deref_mut() {
            observe(&line);
        }
        on_line(&line);
    }

    let exit = process.wait()?;
    log::debug!(
        "ffmpeg finished with {:?} after {} lines",
        exit.code(),
        line_count
    );
    Ok(exit)
}
