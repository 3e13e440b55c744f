//! FFprobe integration for frame-rate lookup
//!
//! The perceptual detector needs a constant frame rate to convert freeze
//! timestamps to frame indices. When the caller has no rate string of its
//! own, it can read one from the container here.
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::frame_rate::{is_usable_frame_rate, parse_frame_rate};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Trait for reading stream properties through ffprobe.
pub trait FfprobeExecutor {
    /// Frame rate of the first video stream, or `None` when the container
    /// does not report a usable one.
    fn get_frame_rate(&self, input_path: &Path) -> CoreResult<Option<f64>>;
}

/// `FfprobeExecutor` backed by the `ffprobe` crate (uses `ffprobe` from PATH).
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn get_frame_rate(&self, input_path: &Path) -> CoreResult<Option<f64>> {
        log::debug!(
            "Running ffprobe (via crate) for frame rate on: {}",
            input_path.display()
        );
        let metadata = ffprobe(input_path).map_err(|err| {
            log::error!("ffprobe failed for {}: {:?}", input_path.display(), err);
            map_ffprobe_error(err)
        })?;

        let video_stream = metadata
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| {
                CoreError::FfprobeParse(format!(
                    "No video stream found in {}",
                    input_path.display()
                ))
            })?;

        let rate = select_frame_rate(&video_stream.avg_frame_rate, &video_stream.r_frame_rate);
        log::debug!(
            "Frame rate for {}: avg={} r={} -> {:?}",
            input_path.display(),
            video_stream.avg_frame_rate,
            video_stream.r_frame_rate,
            rate
        );
        Ok(rate)
    }
}

/// Picks the average frame rate, falling back to the real base rate when the
/// average is unknown (`"0/0"`) or unusable.
pub fn select_frame_rate(avg_frame_rate: &str, r_frame_rate: &str) -> Option<f64> {
    [avg_frame_rate, r_frame_rate]
        .into_iter()
        .filter_map(|raw| parse_frame_rate(Some(raw)))
        .find(|&fps| is_usable_frame_rate(fps))
}

fn map_ffprobe_error(err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe (frame rate)", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error("ffprobe (frame rate)", output.status.code(), stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::FfprobeParse(format!("ffprobe output deserialization: {err}"))
        }
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rate_preferred() {
        let fps = select_frame_rate("24000/1001", "24/1").unwrap();
        assert!((fps - 23.976_023_976).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_average_falls_back_to_base_rate() {
        assert_eq!(select_frame_rate("0/0", "25/1"), Some(25.0));
        assert_eq!(select_frame_rate("", "30/1"), Some(30.0));
    }

    #[test]
    fn test_no_usable_rate() {
        assert_eq!(select_frame_rate("0/0", "0/0"), None);
        assert_eq!(select_frame_rate("-25/1", "abc"), None);
    }
}
