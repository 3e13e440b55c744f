// freezefix-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use freezefix_core::DetectionMode;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Freezefix: duplicated and frozen frame detection",
    long_about = "Locates runs of duplicated or frozen frames in a video using ffmpeg, \
                  and reports them as inclusive frame ranges for an interpolation stage."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Only log warnings and errors, and hide the progress spinner
    #[arg(short, long, global = true, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detects frame ranges that need repair in a video file
    Detect(DetectArgs),
    /// Checks that ffmpeg can be started
    Check(CheckArgs),
}

/// Detector selection on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeArg {
    /// Byte-identical frames (framemd5)
    #[default]
    Exact,
    /// Near-static frames (freezedetect)
    Perceptual,
}

impl From<ModeArg> for DetectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Exact => DetectionMode::Exact,
            ModeArg::Perceptual => DetectionMode::Perceptual,
        }
    }
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Input video file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// Detection mode
    #[arg(short, long, value_enum, default_value_t = ModeArg::Exact)]
    pub mode: ModeArg,

    /// Frame rate as a rational ("30000/1001") or decimal ("25");
    /// probed with ffprobe when omitted in perceptual mode
    #[arg(long, value_name = "RATE")]
    pub fps: Option<String>,

    // --- Detection Thresholds ---
    /// Noise tolerance for freezedetect (perceptual mode)
    #[arg(long, value_name = "NOISE", env = "FREEZEFIX_NOISE")]
    pub noise: Option<f64>,

    /// Shortest run, in frames, to report (values below 1 count as 1)
    #[arg(long, value_name = "FRAMES", env = "FREEZEFIX_MIN_FRAMES", allow_negative_numbers = true)]
    pub min_frames: Option<i64>,

    /// Longest run, in frames, to report (0 disables the limit)
    #[arg(long, value_name = "FRAMES", env = "FREEZEFIX_MAX_FRAMES", allow_negative_numbers = true)]
    pub max_frames: Option<i64>,

    /// Keep only the first N ranges (perceptual mode; 0 disables the cap)
    #[arg(
        long,
        value_name = "COUNT",
        env = "FREEZEFIX_MAX_SEGMENTS",
        allow_negative_numbers = true
    )]
    pub max_segments: Option<i64>,

    /// Path to the ffmpeg binary
    #[arg(long, value_name = "PATH", env = "FREEZEFIX_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    // --- Output ---
    /// Print a JSON report instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the ffmpeg binary
    #[arg(long, value_name = "PATH", env = "FREEZEFIX_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detect_basic_args() {
        let cli = Cli::parse_from(["freezefix", "detect", "--input", "clip.mkv"]);

        assert!(!cli.verbose);
        assert!(!cli.quiet);
        match cli.command {
            Commands::Detect(args) => {
                assert_eq!(args.input_path, PathBuf::from("clip.mkv"));
                assert_eq!(args.mode, ModeArg::Exact);
                assert!(args.fps.is_none());
                assert!(!args.json);
            }
            other => panic!("Expected Detect command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_detect_perceptual_args() {
        let cli = Cli::parse_from([
            "freezefix",
            "-v",
            "detect",
            "-i",
            "clip.mkv",
            "--mode",
            "perceptual",
            "--fps",
            "30000/1001",
            "--noise",
            "0.003",
            "--min-frames",
            "2",
            "--max-frames",
            "-1",
            "--max-segments",
            "10",
            "--json",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Detect(args) => {
                assert_eq!(args.mode, ModeArg::Perceptual);
                assert_eq!(args.fps.as_deref(), Some("30000/1001"));
                assert_eq!(args.noise, Some(0.003));
                assert_eq!(args.min_frames, Some(2));
                assert_eq!(args.max_frames, Some(-1));
                assert_eq!(args.max_segments, Some(10));
                assert!(args.json);
            }
            other => panic!("Expected Detect command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from(["freezefix", "check", "--ffmpeg", "/opt/ffmpeg/bin/ffmpeg"]);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.ffmpeg, Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
            }
            other => panic!("Expected Check command, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_mode_and_missing_input() {
        assert!(
            Cli::try_parse_from(["freezefix", "detect", "-i", "a.mkv", "--mode", "fuzzy"]).is_err()
        );
        assert!(Cli::try_parse_from(["freezefix", "detect"]).is_err());
        assert!(Cli::try_parse_from(["freezefix", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn test_mode_conversion() {
        assert_eq!(DetectionMode::from(ModeArg::Exact), DetectionMode::Exact);
        assert_eq!(DetectionMode::from(ModeArg::Perceptual), DetectionMode::Perceptual);
    }
}
