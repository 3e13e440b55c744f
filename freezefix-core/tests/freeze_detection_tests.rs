// freezefix-core/tests/freeze_detection_tests.rs

use freezefix_core::external::WatchedStream;
use freezefix_core::external::mocks::{MockToolProcess, MockToolSpawner};
use freezefix_core::{CoreError, FrameRange, FreezeOptions, detect_freeze_ranges};
use std::io;
use std::path::Path;

const FREEZE_LOG: &str = "\
Input #0, matroska,webm, from 'input.mkv':
  Duration: 00:00:20.00, start: 0.000000, bitrate: 1000 kb/s
[freezedetect @ 0x55d0c] lavfi.freezedetect.freeze_start: 1
[freezedetect @ 0x55d0c] lavfi.freezedetect.freeze_duration: 1
[freezedetect @ 0x55d0c] lavfi.freezedetect.freeze_end: 2
[freezedetect @ 0x55d0c] lavfi.freezedetect.freeze_start: 5
[freezedetect @ 0x55d0c] lavfi.freezedetect.freeze_duration: 0.2
[freezedetect @ 0x55d0c] lavfi.freezedetect.freeze_end: 5.2
[freezedetect @ 0x55d0c] lavfi.freezedetect.freeze_start: 10
[freezedetect @ 0x55d0c] lavfi.freezedetect.freeze_duration: 4
[freezedetect @ 0x55d0c] lavfi.freezedetect.freeze_end: 14
[out#0/null @ 0x55d0d] video:0KiB audio:0KiB subtitle:0KiB
";

fn r(start: u64, end: u64) -> FrameRange {
    FrameRange::new(start, end).unwrap()
}

fn run(
    spawner: &MockToolSpawner,
    options: &FreezeOptions,
    fps: f64,
) -> Result<Vec<FrameRange>, CoreError> {
    detect_freeze_ranges(
        spawner,
        Path::new("ffmpeg"),
        Path::new("input.mkv"),
        options,
        fps,
        None,
    )
}

#[test]
fn test_freeze_ranges_from_streamed_log() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockToolSpawner::new();
    spawner.add_output(FREEZE_LOG, 7, 0);

    let ranges = run(&spawner, &FreezeOptions::default(), 10.0)?;

    // 10fps: frames 10..20, 50..52 and 100..140 frozen between good frames
    assert_eq!(ranges, vec![r(10, 19), r(50, 51), r(100, 139)]);
    Ok(())
}

#[test]
fn test_freezedetect_arguments() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockToolSpawner::new();
    spawner.add_output("", 16, 0);

    let options = FreezeOptions {
        noise: 0.003,
        min_frames: 3,
        ..FreezeOptions::default()
    };
    run(&spawner, &options, 24.0)?;

    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 1, "Expected one call to the spawner");
    let call = &calls[0];
    assert_eq!(call.watch, WatchedStream::Stderr);
    assert_eq!(call.arg_after("-i"), Some("input.mkv"));
    assert_eq!(call.arg_after("-vf"), Some("freezedetect=n=0.003:d=0.125000"));
    assert_eq!(call.arg_after("-f"), Some("null"));
    assert!(call.has_arg("-an"));
    assert_eq!(call.args.last().map(String::as_str), Some("-"));
    Ok(())
}

#[test]
fn test_length_bounds_filter_ranges() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockToolSpawner::new();
    spawner.add_output(FREEZE_LOG, 64, 0);

    let options = FreezeOptions {
        min_frames: 3,
        max_frames: 20,
        ..FreezeOptions::default()
    };
    let ranges = run(&spawner, &options, 10.0)?;

    // the 2-frame and 40-frame runs fall outside [3, 20]
    assert_eq!(ranges, vec![r(10, 19)]);
    Ok(())
}

#[test]
fn test_segment_cap_keeps_earliest_ranges() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockToolSpawner::new();
    spawner.add_output(FREEZE_LOG, 64, 0);

    let options = FreezeOptions {
        max_segments: Some(2),
        ..FreezeOptions::default()
    };
    let ranges = run(&spawner, &options, 10.0)?;

    assert_eq!(ranges, vec![r(10, 19), r(50, 51)]);
    Ok(())
}

#[test]
fn test_unusable_frame_rate_skips_launch() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockToolSpawner::new();

    for fps in [0.0, -25.0, f64::NAN, f64::INFINITY] {
        let ranges = run(&spawner, &FreezeOptions::default(), fps)?;
        assert!(ranges.is_empty());
    }
    assert!(spawner.get_received_calls().is_empty());
    Ok(())
}

#[test]
fn test_partial_failure_returns_parsed_ranges() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockToolSpawner::new();
    spawner.add_output(
        "lavfi.freezedetect.freeze_start: 1\n\
         lavfi.freezedetect.freeze_end: 2\n\
         Error while decoding stream #0:0: Invalid data found when processing input\n",
        5,
        1,
    );

    let ranges = run(&spawner, &FreezeOptions::default(), 10.0)?;
    assert_eq!(ranges, vec![r(10, 19)]);
    Ok(())
}

#[test]
fn test_failure_without_intervals_reports_exit_code() {
    let spawner = MockToolSpawner::new();
    spawner.add_output("input.mkv: No such file or directory\n", 8, 254);

    let err = run(&spawner, &FreezeOptions::default(), 25.0).unwrap_err();
    assert!(matches!(err, CoreError::CommandFailed { .. }));
    assert_eq!(err.exit_code(), Some(254));
}

#[test]
fn test_unmatched_start_does_not_count_as_output() {
    let spawner = MockToolSpawner::new();
    spawner.add_output("lavfi.freezedetect.freeze_start: 3\n", 8, 1);

    let err = run(&spawner, &FreezeOptions::default(), 25.0).unwrap_err();
    assert_eq!(err.exit_code(), Some(1));
}

#[test]
fn test_killed_process_without_output_fails() {
    let spawner = MockToolSpawner::new();
    spawner.add_process(MockToolProcess::from_text("", 8, 0).killed());

    let err = run(&spawner, &FreezeOptions::default(), 25.0).unwrap_err();
    assert!(matches!(err, CoreError::CommandFailed { code: None, .. }));
}

#[test]
fn test_launch_failure_is_surfaced() {
    let spawner = MockToolSpawner::new();
    spawner.add_spawn_error(io::ErrorKind::NotFound);

    let err = run(&spawner, &FreezeOptions::default(), 25.0).unwrap_err();
    assert!(matches!(err, CoreError::CommandStart(_, _)));
}

#[test]
fn test_observer_sees_every_line_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockToolSpawner::new();
    spawner.add_output("first line\nfreeze_start: 1\nfreeze_end: 2\nunterminated", 3, 0);

    let mut seen: Vec<String> = Vec::new();
    let mut observe = |line: &str| seen.push(line.to_string());
    let ranges = detect_freeze_ranges(
        &spawner,
        Path::new("ffmpeg"),
        Path::new("input.mkv"),
        &FreezeOptions::default(),
        10.0,
        Some(&mut observe),
    )?;

    assert_eq!(ranges, vec![r(10, 19)]);
    assert_eq!(seen, vec!["first line", "freeze_start: 1", "freeze_end: 2"]);
    Ok(())
}

#[test]
fn test_marker_without_final_newline_is_not_parsed() -> Result<(), Box<dyn std::error::Error>> {
    let spawner = MockToolSpawner::new();
    spawner.add_output("freeze_start: 1\nfreeze_end: 2", 4, 0);

    let mut seen: Vec<String> = Vec::new();
    let mut observe = |line: &str| seen.push(line.to_string());
    let ranges = detect_freeze_ranges(
        &spawner,
        Path::new("ffmpeg"),
        Path::new("input.mkv"),
        &FreezeOptions::default(),
        10.0,
        Some(&mut observe),
    )?;

    assert!(ranges.is_empty());
    assert_eq!(seen, vec!["freeze_start: 1"]);
    Ok(())
}

#[test]
fn test_read_error_aborts_without_waiting() {
    let spawner = MockToolSpawner::new();
    let process =
        MockToolProcess::from_text("freeze_start: 1\nfreeze_end: 2\n", 64, 0).with_read_error();
    let waited = process.waited_flag();
    spawner.add_process(process);

    let err = run(&spawner, &FreezeOptions::default(), 10.0).unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));
    assert!(!waited.get());
}
