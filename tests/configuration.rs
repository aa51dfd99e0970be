//! Configuration builder tests.

use std::sync::Arc;
use std::time::Duration;

use scenecut::{
    CancellationToken, CutDetectorOptions, DiffScorer, ProgressHandle, SegmentOptions,
    SegmentationMode, ThumbnailOptions,
    configuration::{DEFAULT_SAMPLING_INTERVAL, STANDARD_SEGMENT_LENGTHS},
    detect::{DEFAULT_MARGIN, DEFAULT_MIN_SCENE_LENGTH, DEFAULT_MULTIPLIER},
};

// ── SegmentOptions ─────────────────────────────────────────────────

#[test]
fn defaults() {
    let options = SegmentOptions::default();
    assert_eq!(options.sampling_interval(), Duration::from_millis(500));
    assert_eq!(options.sampling_interval(), DEFAULT_SAMPLING_INTERVAL);
    assert_eq!(options.cut_detector().multiplier, DEFAULT_MULTIPLIER);
    assert_eq!(options.cut_detector().margin, DEFAULT_MARGIN);
    assert_eq!(
        options.cut_detector().min_scene_length,
        DEFAULT_MIN_SCENE_LENGTH
    );
    assert_eq!(options.decode_max_dimension(), None);
}

#[test]
fn builder_chain() {
    let options = SegmentOptions::new()
        .with_sampling_interval(Duration::from_millis(250))
        .with_cut_detector(CutDetectorOptions::new().margin(12.0))
        .with_scorer(DiffScorer::new(32, 18))
        .with_thumbnail(ThumbnailOptions::new().with_max_dimension(480))
        .with_thumbnails(false)
        .with_fixed_mode_diffs(false)
        .with_min_tail(Duration::ZERO)
        .with_decode_max_dimension(Some(640))
        .with_progress(Arc::new(ProgressHandle::new()))
        .with_cancellation(CancellationToken::new())
        .with_batch_size(10);

    assert_eq!(options.sampling_interval(), Duration::from_millis(250));
    assert_eq!(options.cut_detector().margin, 12.0);
    assert_eq!(options.decode_max_dimension(), Some(640));
}

#[test]
fn decode_max_dimension_is_clamped() {
    let options = SegmentOptions::new().with_decode_max_dimension(Some(0));
    assert_eq!(options.decode_max_dimension(), Some(1));
}

#[test]
fn debug_output_hides_callbacks() {
    let options = SegmentOptions::new().with_cancellation(CancellationToken::new());
    let debug = format!("{options:?}");
    assert!(debug.contains("SegmentOptions"));
    assert!(debug.contains("has_cancellation: true"));
}

// ── SegmentationMode ───────────────────────────────────────────────

#[test]
fn mode_defaults_to_adaptive() {
    assert_eq!(SegmentationMode::default(), SegmentationMode::Adaptive);
    assert!(SegmentationMode::Adaptive.is_adaptive());
    assert!(!SegmentationMode::fixed_secs(5).is_adaptive());
}

#[test]
fn mode_display() {
    assert_eq!(SegmentationMode::Adaptive.to_string(), "adaptive");
    assert_eq!(SegmentationMode::fixed_secs(8).to_string(), "fixed:8s");
    assert_eq!(
        SegmentationMode::Fixed {
            segment_length: Duration::from_millis(2500)
        }
        .to_string(),
        "fixed:2.5s"
    );
}

#[test]
fn standard_lengths() {
    assert_eq!(STANDARD_SEGMENT_LENGTHS, [5, 8, 10]);
    for seconds in STANDARD_SEGMENT_LENGTHS {
        assert_eq!(
            SegmentationMode::fixed_secs(seconds),
            SegmentationMode::Fixed {
                segment_length: Duration::from_secs(seconds)
            }
        );
    }
}
