//! Exact duplicate detection through per-frame content hashes.
//!
//! ffmpeg's `framemd5` muxer prints one line per decoded frame on stdout:
//!
//! ```text
//! #format: frame checksums
//! #stream#, dts,        pts, duration,     size, hash
//! 0,          0,          0,        1,  3110400, 5f1c7c7c4d1e0b6f1c9a1d3a2e8f4b21
//! ```
//!
//! Consecutive frames with the same hash form a run. The first frame of a
//! run is genuine and kept as the reference; the following duplicates are
//! the repair candidates.

use super::{LineObserver, run_line_protocol};
use crate::config::{DuplicateOptions, FrameBounds};
use crate::error::{CoreResult, command_failed_error};
use crate::external::{FfmpegCommandBuilder, ToolSpawner, WatchedStream};
use crate::ranges::{FrameRange, merge_ranges};
use std::path::Path;

const TOOL_NAME: &str = "ffmpeg (framemd5)";

/// Extracts the normalized hash from one framemd5/framehash line.
///
/// Comment lines, lines with fewer than two comma-separated fields and lines
/// with an empty hash yield `None`. A `key=value` last field (as printed by
/// `framehash` with a named algorithm) contributes only its value.
pub fn parse_hash_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split(',');
    let _first = fields.next()?;
    let last = fields.last()?.trim();
    let value = last.split_once('=').map_or(last, |(_, value)| value);

    let hash = value.trim().to_lowercase();
    (!hash.is_empty()).then_some(hash)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    NoRun,
    /// Frames `start..start + len` share one hash; `len >= 2`.
    OpenRun { start: u64, len: u64 },
}

/// Result of one pass over a hash stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateScan {
    /// Number of frames that produced a hash.
    pub total_frames: u64,
    /// Qualifying repair ranges, in stream order, before tail exclusion.
    pub ranges: Vec<FrameRange>,
}

/// Tracks runs of identical consecutive hashes.
#[derive(Debug)]
pub struct DuplicateRunTracker {
    bounds: FrameBounds,
    previous_hash: Option<String>,
    frame_index: u64,
    state: RunState,
    ranges: Vec<FrameRange>,
}

impl DuplicateRunTracker {
    pub fn new(bounds: FrameBounds) -> Self {
        Self {
            bounds,
            previous_hash: None,
            frame_index: 0,
            state: RunState::NoRun,
            ranges: Vec::new(),
        }
    }

    /// Records the hash of the next frame.
    pub fn push_hash(&mut self, hash: String) {
        let index = self.frame_index;
        if self.previous_hash.as_deref() == Some(hash.as_str()) {
            self.state = match self.state {
                // a previous hash exists, so index >= 1
                RunState::NoRun => RunState::OpenRun {
                    start: index - 1,
                    len: 2,
                },
                RunState::OpenRun { start, len } => RunState::OpenRun {
                    start,
                    len: len + 1,
                },
            };
        } else {
            self.close_run();
            self.previous_hash = Some(hash);
        }
        self.frame_index += 1;
    }

    /// Feeds one raw output line; lines without a hash are skipped.
    pub fn push_line(&mut self, line: &str) {
        if let Some(hash) = parse_hash_line(line) {
            self.push_hash(hash);
        }
    }

    pub fn frames_seen(&self) -> u64 {
        self.frame_index
    }

    fn close_run(&mut self) {
        if let RunState::OpenRun { start, len } =
            std::mem::replace(&mut self.state, RunState::NoRun)
        {
            let duplicates = len - 1;
            if !self.bounds.accepts(duplicates) {
                log::trace!(
                    "Skipping duplicate run at frame {} ({} repeats) outside bounds",
                    start,
                    duplicates
                );
                return;
            }
            if let Some(range) = FrameRange::new(start + 1, start + len - 1) {
                self.ranges.push(range);
            }
        }
    }

    /// Closes any trailing run and returns the scan result.
    pub fn finish(mut self) -> DuplicateScan {
        self.close_run();
        DuplicateScan {
            total_frames: self.frame_index,
            ranges: self.ranges,
        }
    }
}

impl DuplicateScan {
    /// Drops ranges touching the last frame (nothing to interpolate toward)
    /// and merges the rest.
    pub fn into_repair_ranges(self) -> Vec<FrameRange> {
        let last_frame = self.total_frames.saturating_sub(1);
        let interior = self
            .ranges
            .into_iter()
            .filter(|range| {
                let keep = range.end() < last_frame;
                if !keep {
                    log::trace!("Dropping duplicate range {} at end of stream", range);
                }
                keep
            })
            .collect();
        merge_ranges(interior)
    }
}

/// Detects runs of byte-identical frames in `video`.
///
/// Runs `binary` with the framemd5 muxer on stdout, first video stream only
/// and audio disabled. Every stdout line is passed to `observer` before
/// parsing.
///
/// A non-zero exit is only an error when no frame hash was read; otherwise
/// the frames seen so far are used.
pub fn detect_duplicate_ranges<S: ToolSpawner>(
    spawner: &S,
    binary: &Path,
    video: &Path,
    options: &DuplicateOptions,
    observer: LineObserver<'_>,
) -> CoreResult<Vec<FrameRange>> {
    let mut cmd = FfmpegCommandBuilder::new(binary).build();
    cmd.input(video);
    cmd.args(["-map", "0:v:0", "-an", "-f", "framemd5"]);
    cmd.output("-");

    let mut tracker = DuplicateRunTracker::new(options.bounds());
    let exit = run_line_protocol(spawner, cmd, WatchedStream::Stdout, observer, |line| {
        tracker.push_line(line)
    })?;

    if !exit.success() {
        if tracker.frames_seen() == 0 {
            log::error!(
                "framemd5 failed on {} without hashing any frame",
                video.display()
            );
            return Err(command_failed_error(
                TOOL_NAME,
                exit.code(),
                "no frame hashes were produced",
            ));
        }
        log::warn!(
            "framemd5 exited with {:?} on {}; using {} frames hashed before the failure",
            exit.code(),
            video.display(),
            tracker.frames_seen()
        );
    }

    let scan = tracker.finish();
    let total_frames = scan.total_frames;
    let ranges = scan.into_repair_ranges();
    log::debug!(
        "framemd5: {} frames -> {} repair ranges for {}",
        total_frames,
        ranges.len(),
        video.display()
    );
    Ok(ranges)
}
