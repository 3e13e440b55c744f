//! Perceptual freeze detection through ffmpeg's `freezedetect` filter.
//!
//! freezedetect logs the boundaries of near-static segments on stderr:
//!
//! ```text
//! [freezedetect @ 0x5581] lavfi.freezedetect.freeze_start: 4.004
//! [freezedetect @ 0x5581] lavfi.freezedetect.freeze_duration: 1.501
//! [freezedetect @ 0x5581] lavfi.freezedetect.freeze_end: 5.505
//! ```
//!
//! Start/end pairs become time spans, and spans become frame ranges at the
//! caller's frame rate. The conversion assumes a constant frame rate; under
//! VFR the one-frame trim on each side may land on the wrong frame.

use super::{LineObserver, run_line_protocol};
use crate::config::{FrameBounds, FreezeOptions};
use crate::error::{CoreResult, command_failed_error};
use crate::external::{FfmpegCommandBuilder, ToolSpawner, WatchedStream, freezedetect_filter};
use crate::frame_rate::is_usable_frame_rate;
use crate::ranges::{FrameRange, merge_ranges};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

const TOOL_NAME: &str = "ffmpeg (freezedetect)";

const NUMBER: &str = r"([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)";

static FREEZE_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"freeze_start:\s*{NUMBER}")).expect("valid freeze_start regex")
});

static FREEZE_END_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"freeze_end:\s*{NUMBER}")).expect("valid freeze_end regex")
});

/// A freeze interval in seconds as reported by the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    /// Converts the span to the frames that need repair.
    ///
    /// The frames at the rounded start and end are the last and first good
    /// frames around the freeze, so one frame is trimmed from each side and
    /// frame 0 is never selected. Returns `None` when nothing is left or the
    /// remaining run falls outside `bounds`.
    pub fn to_repair_range(&self, fps: f64, bounds: FrameBounds) -> Option<FrameRange> {
        let start_frame = to_frame_index(self.start, fps);
        let end_exclusive = to_frame_index(self.end, fps);

        let first = start_frame.max(1);
        let last = end_exclusive.checked_sub(1)?;
        let range = FrameRange::new(first, last)?;

        bounds.accepts(range.len()).then_some(range)
    }
}

fn to_frame_index(seconds: f64, fps: f64) -> u64 {
    // `as` saturates: negatives and NaN land on 0
    (seconds * fps).round() as u64
}

/// Stateful parser for the freezedetect log.
#[derive(Debug, Default)]
pub struct FreezeLogParser {
    pending_start: Option<f64>,
    spans: Vec<TimeSpan>,
}

impl FreezeLogParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one log line. Lines without a marker are ignored.
    pub fn feed(&mut self, line: &str) {
        if let Some(start) = capture_seconds(&FREEZE_START_RE, line) {
            if let Some(previous) = self.pending_start.replace(start) {
                log::trace!("freeze_start {} replaced by {} before an end", previous, start);
            }
            return;
        }

        if let Some(end) = capture_seconds(&FREEZE_END_RE, line) {
            match self.pending_start {
                Some(start) if end >= start => {
                    self.spans.push(TimeSpan { start, end });
                    self.pending_start = None;
                }
                Some(start) => {
                    log::trace!("Ignoring freeze_end {} before pending start {}", end, start);
                }
                None => log::trace!("Ignoring freeze_end {} without a start", end),
            }
        }
    }

    /// Spans parsed so far, in log order.
    pub fn spans(&self) -> &[TimeSpan] {
        &self.spans
    }

    pub fn into_spans(self) -> Vec<TimeSpan> {
        self.spans
    }
}

fn capture_seconds(re: &Regex, line: &str) -> Option<f64> {
    re.captures(line)?
        .get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Converts parsed spans into the final list of repair ranges: per-span
/// conversion and length filter, merge, then the optional segment cap.
pub fn spans_to_repair_ranges(
    spans: &[TimeSpan],
    fps: f64,
    options: &FreezeOptions,
) -> Vec<FrameRange> {
    let bounds = options.bounds();
    let candidates = spans
        .iter()
        .filter_map(|span| span.to_repair_range(fps, bounds))
        .collect();

    let mut ranges = merge_ranges(candidates);
    if let Some(cap) = options.segment_cap() {
        if ranges.len() > cap {
            log::debug!("Capping {} freeze ranges to {}", ranges.len(), cap);
            ranges.truncate(cap);
        }
    }
    ranges
}

/// Detects perceptually frozen frame runs in `video`.
///
/// Runs `binary` with the freezedetect filter (`n` = noise tolerance,
/// `d` = `min_frames / fps` seconds), audio disabled and decoded output
/// discarded. Every stderr line is passed to `observer` before parsing.
///
/// A non-positive or non-finite `fps` returns an empty list without
/// launching anything. A non-zero exit is only an error when no freeze
/// interval was parsed; otherwise the parsed intervals are used.
pub fn detect_freeze_ranges<S: ToolSpawner>(
    spawner: &S,
    binary: &Path,
    video: &Path,
    options: &FreezeOptions,
    fps: f64,
    observer: LineObserver<'_>,
) -> CoreResult<Vec<FrameRange>> {
    if !is_usable_frame_rate(fps) {
        log::debug!(
            "Skipping freeze detection for {}: unusable frame rate {}",
            video.display(),
            fps
        );
        return Ok(Vec::new());
    }

    let bounds = options.bounds();
    let min_duration_secs = bounds.min as f64 / fps;
    let filter = freezedetect_filter(options.effective_noise(), min_duration_secs);

    let mut cmd = FfmpegCommandBuilder::new(binary).build();
    cmd.input(video);
    cmd.args(["-an", "-vf", filter.as_str(), "-f", "null"]);
    cmd.output("-");

    let mut parser = FreezeLogParser::new();
    let exit = run_line_protocol(spawner, cmd, WatchedStream::Stderr, observer, |line| {
        parser.feed(line)
    })?;

    if !exit.success() {
        if parser.spans().is_empty() {
            log::error!(
                "freezedetect failed on {} without reporting any freeze",
                video.display()
            );
            return Err(command_failed_error(
                TOOL_NAME,
                exit.code(),
                "no freeze intervals were reported",
            ));
        }
        log::warn!(
            "freezedetect exited with {:?} on {}; using {} intervals parsed before the failure",
            exit.code(),
            video.display(),
            parser.spans().len()
        );
    }

    let spans = parser.into_spans();
    let ranges = spans_to_repair_ranges(&spans, fps, options);
    log::debug!(
        "freezedetect: {} intervals -> {} repair ranges for {}",
        spans.len(),
        ranges.len(),
        video.display()
    );
    Ok(ranges)
}
