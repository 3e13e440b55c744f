//! Configuration structures and constants for the freezefix-core library.
//!
//! Callers hand detectors plain numeric options as a UI or task file would
//! supply them. Sentinel values ("0 disables the upper bound") are resolved
//! here into explicit optional values before any comparison is made.

mod utils;

use std::path::PathBuf;

pub use utils::{get_env_f64, get_env_i64, get_env_opt_i64, get_env_path};

// Default constants

/// Default ffmpeg binary, resolved through `PATH`.
pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

/// Default freezedetect noise tolerance (ffmpeg's own default, about -60dB).
pub const DEFAULT_NOISE_TOLERANCE: f64 = 0.001;

/// Default minimum run length, in frames, for a range to qualify for repair.
pub const DEFAULT_MIN_FRAMES: i64 = 1;

/// Default maximum run length. Zero disables the upper bound.
pub const DEFAULT_MAX_FRAMES: i64 = 0;

// Environment variable names

pub const ENV_FFMPEG_BINARY: &str = "FREEZEFIX_FFMPEG";
pub const ENV_NOISE_TOLERANCE: &str = "FREEZEFIX_NOISE";
pub const ENV_MIN_FRAMES: &str = "FREEZEFIX_MIN_FRAMES";
pub const ENV_MAX_FRAMES: &str = "FREEZEFIX_MAX_FRAMES";
pub const ENV_MAX_SEGMENTS: &str = "FREEZEFIX_MAX_SEGMENTS";

/// Which detector to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    /// Byte-identical frames found through per-frame content hashes.
    #[default]
    Exact,
    /// Near-static segments found through ffmpeg's freezedetect filter.
    Perceptual,
}

impl DetectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::Exact => "exact",
            DetectionMode::Perceptual => "perceptual",
        }
    }
}

/// Options for the perceptual freeze detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreezeOptions {
    /// freezedetect noise tolerance, passed to the filter as `n=`.
    pub noise: f64,
    /// Minimum repairable run length in frames. Values below 1 mean 1.
    pub min_frames: i64,
    /// Maximum repairable run length in frames. Zero or negative disables it.
    pub max_frames: i64,
    /// Cap on the number of returned ranges. `None` or non-positive disables it.
    pub max_segments: Option<i64>,
}

impl Default for FreezeOptions {
    fn default() -> Self {
        Self {
            noise: DEFAULT_NOISE_TOLERANCE,
            min_frames: DEFAULT_MIN_FRAMES,
            max_frames: DEFAULT_MAX_FRAMES,
            max_segments: None,
        }
    }
}

impl FreezeOptions {
    /// Noise tolerance to hand to the filter; non-finite input falls back to
    /// the default.
    pub fn effective_noise(&self) -> f64 {
        if self.noise.is_finite() {
            self.noise
        } else {
            DEFAULT_NOISE_TOLERANCE
        }
    }

    pub fn bounds(&self) -> FrameBounds {
        FrameBounds::new(self.min_frames, self.max_frames)
    }

    /// Resolved segment cap, `None` when disabled.
    pub fn segment_cap(&self) -> Option<usize> {
        self.max_segments
            .filter(|&cap| cap > 0)
            .map(|cap| usize::try_from(cap).unwrap_or(usize::MAX))
    }
}

/// Options for the exact-duplicate detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateOptions {
    /// Minimum repairable run length in frames. Values below 1 mean 1.
    pub min_frames: i64,
    /// Maximum repairable run length in frames. Zero or negative disables it.
    pub max_frames: i64,
}

impl Default for DuplicateOptions {
    fn default() -> Self {
        Self {
            min_frames: DEFAULT_MIN_FRAMES,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl DuplicateOptions {
    pub fn bounds(&self) -> FrameBounds {
        FrameBounds::new(self.min_frames, self.max_frames)
    }
}

/// Normalized run-length filter shared by both detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBounds {
    /// Always at least 1.
    pub min: u64,
    /// Always at least `min` when present.
    pub max: Option<u64>,
}

impl FrameBounds {
    pub fn new(min_frames: i64, max_frames: i64) -> Self {
        let min = u64::try_from(min_frames.max(1)).unwrap_or(1);
        let max = if max_frames <= 0 {
            None
        } else {
            Some(u64::try_from(max_frames).unwrap_or(u64::MAX).max(min))
        };
        Self { min, max }
    }

    /// Whether a run of `len` repairable frames qualifies.
    pub fn accepts(&self, len: u64) -> bool {
        len >= self.min && self.max.is_none_or(|max| len <= max)
    }
}

/// Complete configuration for one detection request.
///
/// `Default` starts from the library constants and applies any
/// `FREEZEFIX_*` environment overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    pub mode: DetectionMode,
    /// Path to the ffmpeg binary.
    pub ffmpeg_binary: PathBuf,
    pub freeze: FreezeOptions,
    pub duplicate: DuplicateOptions,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let min_frames = get_env_i64(ENV_MIN_FRAMES, DEFAULT_MIN_FRAMES);
        let max_frames = get_env_i64(ENV_MAX_FRAMES, DEFAULT_MAX_FRAMES);
        Self {
            mode: DetectionMode::default(),
            ffmpeg_binary: get_env_path(ENV_FFMPEG_BINARY, PathBuf::from(DEFAULT_FFMPEG_BINARY)),
            freeze: FreezeOptions {
                noise: get_env_f64(ENV_NOISE_TOLERANCE, DEFAULT_NOISE_TOLERANCE),
                min_frames,
                max_frames,
                max_segments: get_env_opt_i64(ENV_MAX_SEGMENTS),
            },
            duplicate: DuplicateOptions {
                min_frames,
                max_frames,
            },
        }
    }
}
