//! ABOUTME: Integration tests for the polling motion sensor with scripted frames
//! ABOUTME: Covers cold start, steady scenes, rate limiting, resizing, and failures

use md_vision::{
    utils::{frame_with_patch, uniform_frame},
    ColdStartPolicy, DetectionParameters, MotionDetector, MotionSensor, PollOutcome,
    RegionConfig,
};
use test_support::{ManualClock, RecordingSink, ScriptedFrameSource, BLACK, GREEN, RED, WHITE};

fn detector(region: RegionConfig, threshold: u32, stride: u32, rate: f64) -> MotionDetector {
    MotionDetector::new(
        region,
        DetectionParameters::new(threshold, stride, rate).unwrap(),
    )
    .unwrap()
}

fn published(outcome: PollOutcome) -> md_vision::CycleReport {
    match outcome {
        PollOutcome::Published(report) => report,
        other => panic!("expected a published cycle, got {:?}", other),
    }
}

/// 100x100 full-frame region, stride 2, threshold 10
#[test]
fn test_three_cycle_scenario() {
    let clock = ManualClock::new(0);
    let source = ScriptedFrameSource::from_frames([
        uniform_frame(100, 100, WHITE).unwrap(),
        uniform_frame(100, 100, WHITE).unwrap(),
        uniform_frame(100, 100, GREEN).unwrap(),
    ]);
    let mut sensor = MotionSensor::new(
        detector(RegionConfig::full_frame(), 10, 2, 5.0),
        &clock,
        source,
        RecordingSink::new(),
    );

    // Cold start against a zero baseline: every sample differs by 49
    let first = published(sensor.poll());
    assert_eq!(first.sample_count, 2500);
    assert_eq!(first.diff_count, 2500);
    assert!(first.cold_start);
    assert!(first.motion);

    clock.advance(200);
    let second = published(sensor.poll());
    assert_eq!(second.diff_count, 0);
    assert!(!second.motion);

    // 49 -> 36 moves every sample by 13 > 10
    clock.advance(200);
    let third = published(sensor.poll());
    assert_eq!(third.diff_count, 2500);
    assert!(third.motion);

    assert_eq!(sensor.sink().published, vec![true, false, true]);
    assert_eq!(sensor.source().acquired(), 3);
    assert_eq!(sensor.source().released(), 3);
}

#[test]
fn test_rate_limit_bounds_acquisitions() {
    let clock = ManualClock::new(1_000);
    let frames = (0..10).map(|_| uniform_frame(20, 20, WHITE).unwrap());
    let mut sensor = MotionSensor::new(
        detector(RegionConfig::full_frame(), 10, 2, 4.0), // 250ms
        &clock,
        ScriptedFrameSource::from_frames(frames),
        RecordingSink::new(),
    );

    let mut outcomes = Vec::new();
    for _ in 0..10 {
        outcomes.push(sensor.poll());
        clock.advance(60);
    }

    // Polls at 1000, 1060, ..., 1540: cycles run at 1000, 1300 (first >= 1250)
    let ran = outcomes
        .iter()
        .filter(|o| matches!(o, PollOutcome::Published(_)))
        .count();
    assert_eq!(ran, 2);
    assert_eq!(sensor.source().acquired(), 2);
    assert_eq!(sensor.sink().published.len(), 2);
}

#[test]
fn test_acquisition_failure_is_retried_next_cycle() {
    let clock = ManualClock::new(0);
    let source = ScriptedFrameSource::new([None, Some(uniform_frame(10, 10, WHITE).unwrap())]);
    let mut sensor = MotionSensor::new(
        detector(RegionConfig::full_frame(), 10, 1, 10.0),
        &clock,
        source,
        RecordingSink::new(),
    );

    assert_eq!(sensor.poll(), PollOutcome::AcquisitionFailed);
    assert!(sensor.sink().published.is_empty());
    assert_eq!(sensor.source().released(), 0);
    assert!(!sensor.detector().sample_buffer().is_warm());

    clock.advance(100);
    let report = published(sensor.poll());
    assert!(report.cold_start);
    assert_eq!(sensor.sink().published, vec![true]);
    assert_eq!(sensor.source().outstanding(), 0);
}

#[test]
fn test_degenerate_region_still_publishes_and_releases() {
    let clock = ManualClock::new(0);
    let region = RegionConfig::new(0.0, 0.0, 0.0, 1.0).unwrap();
    let mut sensor = MotionSensor::new(
        detector(region, 10, 1, 10.0),
        &clock,
        ScriptedFrameSource::from_frames([uniform_frame(50, 50, WHITE).unwrap()]),
        RecordingSink::new(),
    );

    let report = published(sensor.poll());
    assert_eq!(report.sample_count, 0);
    assert!(!report.motion);
    assert_eq!(sensor.sink().published, vec![false]);
    assert_eq!(sensor.source().released(), 1);
}

#[test]
fn test_stride_larger_than_region() {
    let clock = ManualClock::new(0);
    let frames = (0..3).map(|i| uniform_frame(100, 100, if i % 2 == 0 { WHITE } else { BLACK }).unwrap());
    let mut sensor = MotionSensor::new(
        detector(RegionConfig::full_frame(), 0, 200, 10.0),
        &clock,
        ScriptedFrameSource::from_frames(frames),
        RecordingSink::new(),
    );

    for _ in 0..3 {
        let report = published(sensor.poll());
        assert_eq!(report.sample_count, 0);
        assert!(!report.motion);
        clock.advance(100);
    }
}

#[test]
fn test_frame_resize_forces_cold_start() {
    let clock = ManualClock::new(0);
    let source = ScriptedFrameSource::from_frames([
        uniform_frame(40, 40, WHITE).unwrap(),
        uniform_frame(40, 40, WHITE).unwrap(),
        uniform_frame(80, 40, WHITE).unwrap(),
        uniform_frame(80, 40, WHITE).unwrap(),
    ]);
    let mut sensor = MotionSensor::new(
        detector(RegionConfig::new(0.0, 0.0, 0.5, 0.5).unwrap(), 10, 2, 10.0),
        &clock,
        source,
        RecordingSink::new(),
    );

    let counts: Vec<_> = (0..4)
        .map(|_| {
            let report = published(sensor.poll());
            clock.advance(100);
            (report.sample_count, report.cold_start, report.motion)
        })
        .collect();

    assert_eq!(
        counts,
        vec![
            (100, true, true),
            (100, false, false),
            (200, true, true),
            (200, false, false),
        ]
    );
}

#[test]
fn test_motion_confined_to_region() {
    let clock = ManualClock::new(0);
    // Right half of the frame changes, region watches only the left half
    let source = ScriptedFrameSource::from_frames([
        uniform_frame(64, 64, BLACK).unwrap(),
        frame_with_patch(64, 64, BLACK, 32, 0, 32, 64, WHITE).unwrap(),
        frame_with_patch(64, 64, BLACK, 0, 0, 8, 8, WHITE).unwrap(),
    ]);
    let mut sensor = MotionSensor::new(
        detector(RegionConfig::new(0.0, 0.0, 0.5, 1.0).unwrap(), 10, 2, 10.0),
        &clock,
        source,
        RecordingSink::new(),
    );

    published(sensor.poll());
    clock.advance(100);
    let outside = published(sensor.poll());
    assert_eq!(outside.diff_count, 0);
    assert!(!outside.motion);

    clock.advance(100);
    let inside = published(sensor.poll());
    // 8x8 patch at stride 2 covers 16 of 512 samples
    assert_eq!(inside.sample_count, 512);
    assert_eq!(inside.diff_count, 16);
    assert!(inside.motion);
}

#[test]
fn test_small_change_below_one_percent() {
    let clock = ManualClock::new(0);
    let source = ScriptedFrameSource::from_frames([
        uniform_frame(100, 100, BLACK).unwrap(),
        frame_with_patch(100, 100, BLACK, 0, 0, 10, 10, WHITE).unwrap(),
    ]);
    let mut sensor = MotionSensor::new(
        detector(RegionConfig::full_frame(), 10, 1, 10.0),
        &clock,
        source,
        RecordingSink::new(),
    );

    published(sensor.poll());
    clock.advance(100);
    // 100 of 10000 samples is exactly 1%, not more
    let report = published(sensor.poll());
    assert_eq!(report.diff_count, 100);
    assert!(!report.motion);
}

#[test]
fn test_change_within_threshold_is_ignored() {
    let clock = ManualClock::new(0);
    let source = ScriptedFrameSource::from_frames([
        uniform_frame(10, 10, BLACK).unwrap(),
        uniform_frame(10, 10, RED).unwrap(),
    ]);
    let mut sensor = MotionSensor::new(
        detector(RegionConfig::full_frame(), 9, 1, 10.0),
        &clock,
        source,
        RecordingSink::new(),
    );

    published(sensor.poll());
    clock.advance(100);
    // 0 -> 9 is not strictly greater than 9
    let report = published(sensor.poll());
    assert_eq!(report.diff_count, 0);
}

#[test]
fn test_suppressed_cold_start_then_reset() {
    let clock = ManualClock::new(0);
    let params = DetectionParameters::new(10, 2, 10.0)
        .unwrap()
        .with_cold_start(ColdStartPolicy::Suppress);
    let detector = MotionDetector::new(RegionConfig::full_frame(), params).unwrap();
    let frames = (0..3).map(|_| uniform_frame(20, 20, WHITE).unwrap());
    let mut sensor = MotionSensor::new(
        detector,
        &clock,
        ScriptedFrameSource::from_frames(frames),
        RecordingSink::new(),
    );

    assert!(!published(sensor.poll()).motion);

    // reset lets the very next poll run without waiting for the interval
    sensor.reset();
    let report = published(sensor.poll());
    assert!(report.cold_start);
    assert!(!report.motion);

    clock.advance(100);
    assert!(!published(sensor.poll()).motion);
    assert_eq!(sensor.sink().published, vec![false, false, false]);
}
