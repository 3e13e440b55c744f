// ============================================================================
// freezefix-cli/src/output.rs
// ============================================================================
//
// RESULT OUTPUT: table and JSON rendering of detected repair ranges
//
// The JSON document is the hand-off format for the interpolation stage:
//
//   { "mode": "exact", "video": "clip.mkv", "fps": null, "ranges": [[2, 3]] }

use crate::error::CliResult;
use freezefix_core::{CoreError, DetectionMode, FrameRange};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

/// Report for one detection run.
#[derive(Debug, Serialize)]
pub struct DetectionReport<'a> {
    pub mode: &'static str,
    pub video: String,
    pub fps: Option<f64>,
    pub ranges: &'a [FrameRange],
}

impl<'a> DetectionReport<'a> {
    pub fn new(
        mode: DetectionMode,
        video: &Path,
        fps: Option<f64>,
        ranges: &'a [FrameRange],
    ) -> Self {
        Self {
            mode: mode.as_str(),
            video: video.display().to_string(),
            fps,
            ranges,
        }
    }

    /// Total number of frames selected for repair.
    pub fn total_frames(&self) -> u64 {
        self.ranges.iter().map(FrameRange::len).sum()
    }
}

/// Serializes the report as pretty-printed JSON.
pub fn render_json(report: &DetectionReport<'_>) -> CliResult<String> {
    serde_json::to_string_pretty(report).map_err(|e| {
        CoreError::OperationFailed(format!("Failed to serialize detection report: {}", e))
    })
}

/// Renders the ranges as aligned table rows, without colors.
pub fn render_table_rows(ranges: &[FrameRange]) -> Vec<String> {
    let width = ranges
        .iter()
        .map(|range| range.to_string().len())
        .max()
        .unwrap_or(0);

    ranges
        .iter()
        .map(|range| {
            let frames = range.len();
            let unit = if frames == 1 { "frame" } else { "frames" };
            format!("  {:<width$}  {:>6} {}", range.to_string(), frames, unit)
        })
        .collect()
}

/// Prints the report as a human-readable table on stdout.
pub fn print_table(report: &DetectionReport<'_>) {
    let line = "=".repeat(50);
    println!("{}", line.bright_blue());
    println!(" {} ({} mode)", report.video.bold(), report.mode);
    if let Some(fps) = report.fps {
        println!(" {}: {:.3}", "Frame rate".bright_cyan(), fps);
    }
    println!("{}", line.bright_blue());

    if report.ranges.is_empty() {
        println!("{}", "No frames need repair.".green());
        return;
    }

    for row in render_table_rows(report.ranges) {
        println!("{}", row);
    }
    println!(
        "{} {} ranges, {} frames",
        "Total:".bold(),
        report.ranges.len(),
        report.total_frames()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: u64, end: u64) -> FrameRange {
        FrameRange::new(start, end).unwrap()
    }

    #[test]
    fn test_json_report_shape() {
        let ranges = vec![r(2, 3), r(40, 52)];
        let report = DetectionReport::new(
            DetectionMode::Perceptual,
            Path::new("clip.mkv"),
            Some(25.0),
            &ranges,
        );

        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "perceptual");
        assert_eq!(value["video"], "clip.mkv");
        assert_eq!(value["fps"], 25.0);
        assert_eq!(value["ranges"], serde_json::json!([[2, 3], [40, 52]]));
    }

    #[test]
    fn test_json_report_without_fps() {
        let ranges = Vec::new();
        let report = DetectionReport::new(DetectionMode::Exact, Path::new("a.mp4"), None, &ranges);

        let value: serde_json::Value =
            serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert!(value["fps"].is_null());
        assert_eq!(value["ranges"], serde_json::json!([]));
    }

    #[test]
    fn test_table_rows_and_totals() {
        let ranges = vec![r(2, 2), r(100, 139)];
        let report = DetectionReport::new(DetectionMode::Exact, Path::new("a.mp4"), None, &ranges);

        let rows = render_table_rows(&ranges);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("  [2, 2]"));
        assert!(rows[0].ends_with("1 frame"));
        assert!(rows[1].ends_with("40 frames"));
        assert_eq!(report.total_frames(), 41);
    }
}
