// ============================================================================
// freezefix-cli/src/commands/detect.rs
// ============================================================================
//
// DETECT COMMAND: run one detector on one video and report repair ranges
//
// Flags override the environment-aware defaults of DetectionConfig. In
// perceptual mode the frame rate comes from --fps, or from ffprobe when the
// flag is absent.

use crate::cli::DetectArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output::{DetectionReport, print_table, render_json};
use crate::progress::DetectionProgress;
use freezefix_core::{
    CoreError, CrateFfprobeExecutor, DetectionConfig, DetectionMode, FfprobeExecutor,
    SidecarSpawner, detect_repair_ranges, is_usable_frame_rate, parse_frame_rate,
};
use log::{info, warn};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Builds the detection configuration from defaults and command-line flags.
pub fn build_config(args: &DetectArgs) -> DetectionConfig {
    let mut config = DetectionConfig {
        mode: args.mode.into(),
        ..DetectionConfig::default()
    };

    if let Some(binary) = &args.ffmpeg {
        config.ffmpeg_binary = binary.clone();
    }
    if let Some(noise) = args.noise {
        config.freeze.noise = noise;
    }
    if let Some(min_frames) = args.min_frames {
        config.freeze.min_frames = min_frames;
        config.duplicate.min_frames = min_frames;
    }
    if let Some(max_frames) = args.max_frames {
        config.freeze.max_frames = max_frames;
        config.duplicate.max_frames = max_frames;
    }
    if let Some(max_segments) = args.max_segments {
        config.freeze.max_segments = Some(max_segments);
    }
    config
}

/// Determines the frame rate used for the run.
///
/// An explicit `--fps` always wins. Without one, perceptual mode asks
/// `ffprobe`; exact mode does not need a rate and returns `None`.
pub fn resolve_frame_rate<P: FfprobeExecutor>(
    args: &DetectArgs,
    mode: DetectionMode,
    ffprobe: &P,
) -> CliResult<Option<f64>> {
    if let Some(rate) = args.fps.as_deref() {
        let fps = parse_frame_rate(Some(rate));
        if fps.is_none() {
            warn!("Could not parse frame rate '{}'", rate);
        }
        return Ok(fps);
    }

    match mode {
        DetectionMode::Exact => Ok(None),
        DetectionMode::Perceptual => ffprobe
            .get_frame_rate(&args.input_path)
            .cli_with_context(|| {
                format!("Failed to read frame rate of '{}'", args.input_path.display())
            }),
    }
}

fn validate_input(path: &Path) -> CliResult<()> {
    let metadata = fs::metadata(path)
        .cli_with_context(|| format!("Invalid input path '{}'", path.display()))?;
    if !metadata.is_file() {
        return Err(CoreError::OperationFailed(format!(
            "Invalid input path '{}': not a file",
            path.display()
        )));
    }
    Ok(())
}

/// Runs the `detect` command.
pub fn run_detect(args: DetectArgs, quiet: bool) -> CliResult<()> {
    validate_input(&args.input_path)?;

    let config = build_config(&args);
    let fps = resolve_frame_rate(&args, config.mode, &CrateFfprobeExecutor::new())?;

    info!(
        "Detecting {} repair ranges in {}",
        config.mode.as_str(),
        args.input_path.display()
    );
    if config.mode == DetectionMode::Perceptual {
        match fps {
            Some(rate) if is_usable_frame_rate(rate) => info!("Frame rate: {:.3} fps", rate),
            _ => warn!("No usable frame rate; perceptual detection will report nothing"),
        }
    }

    let start = Instant::now();
    let progress = DetectionProgress::new(!quiet && !args.json, "Analyzing frames");
    let mut observe = |line: &str| progress.on_line(line);
    let result = detect_repair_ranges(
        &SidecarSpawner::new(),
        &args.input_path,
        &config,
        fps,
        Some(&mut observe),
    );
    let lines_seen = progress.lines_seen();
    progress.finish();
    let ranges = result?;

    info!(
        "Found {} repair ranges in {:.1}s ({} output lines)",
        ranges.len(),
        start.elapsed().as_secs_f64(),
        lines_seen
    );

    let report = DetectionReport::new(config.mode, &args.input_path, fps, &ranges);
    if args.json {
        println!("{}", render_json(&report)?);
    } else {
        print_table(&report);
    }
    Ok(())
}
