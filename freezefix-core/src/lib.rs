//! Core library locating runs of duplicated or frozen frames in a video so a
//! downstream interpolation stage can replace them.
//!
//! Two detectors drive ffmpeg and parse its output as it streams:
//!
//! - exact duplicates from per-frame content hashes (`framemd5`)
//! - perceptual freezes from the `freezedetect` filter log
//!
//! Both return a merged, ascending list of inclusive `[start, end]` frame
//! ranges that never include frame 0 and never touch the end of the stream.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use freezefix_core::{DetectionConfig, DetectionMode, SidecarSpawner};
//! use freezefix_core::{detect_repair_ranges, parse_frame_rate};
//! use std::path::Path;
//!
//! let mut config = DetectionConfig::default();
//! config.mode = DetectionMode::Perceptual;
//! config.freeze.min_frames = 2;
//!
//! let fps = parse_frame_rate(Some("30000/1001"));
//! let mut log_line = |line: &str| eprintln!("{line}");
//! let ranges = detect_repair_ranges(
//!     &SidecarSpawner::new(),
//!     Path::new("/path/to/video.mkv"),
//!     &config,
//!     fps,
//!     Some(&mut log_line),
//! )
//! .unwrap();
//!
//! for range in ranges {
//!     println!("repair frames {}..={}", range.start(), range.end());
//! }
//! ```

pub mod config;
pub mod detection;
pub mod error;
pub mod external;
pub mod frame_rate;
pub mod ranges;

// Re-exports for public API
pub use config::{
    DetectionConfig, DetectionMode, DuplicateOptions, FrameBounds, FreezeOptions,
};
pub use detection::{
    LineObserver, detect_duplicate_ranges, detect_freeze_ranges, detect_repair_ranges,
};
pub use error::{CoreError, CoreResult};
pub use external::{
    CrateFfprobeExecutor, FfprobeExecutor, SidecarSpawner, ToolProcess, ToolSpawner,
    check_dependency,
};
pub use frame_rate::{is_usable_frame_rate, parse_frame_rate};
pub use ranges::{FrameRange, merge_ranges};
