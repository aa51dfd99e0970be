//! Adaptive cut detection tests.

use std::time::Duration;

use scenecut::{CutDetector, CutDetectorOptions, FrameDiff, SceneWindow, SegmentError};

fn timeline(scores: &[f64]) -> Vec<FrameDiff> {
    scores
        .iter()
        .enumerate()
        .map(|(index, &score)| FrameDiff {
            frame_index: (index as u64 + 1) * 15,
            timestamp: Duration::from_millis((index as u64 + 1) * 500),
            diff_score: score,
        })
        .collect()
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

// ── Baseline and threshold ─────────────────────────────────────────

#[test]
fn baseline_is_the_median() {
    let detector = CutDetector::default();
    let diffs = timeline(&[5.0, 1.0, 90.0, 2.0, 3.0]);
    assert_eq!(detector.baseline(&diffs), 3.0);
}

#[test]
fn baseline_of_empty_timeline_is_zero() {
    assert_eq!(CutDetector::default().baseline(&[]), 0.0);
}

#[test]
fn baseline_percentile_is_configurable() {
    let diffs = timeline(&[5.0, 1.0, 90.0, 2.0, 3.0]);
    let low = CutDetector::new(CutDetectorOptions::new().baseline_percentile(0.0));
    let high = CutDetector::new(CutDetectorOptions::new().baseline_percentile(1.0));
    assert_eq!(low.baseline(&diffs), 1.0);
    assert_eq!(high.baseline(&diffs), 90.0);
}

#[test]
fn threshold_scales_the_baseline_and_adds_the_margin() {
    let detector = CutDetector::default();
    let diffs = timeline(&[2.0, 2.0, 2.0]);
    assert_eq!(detector.threshold(&diffs), 2.0 * 3.0 + 8.0);

    let custom = CutDetector::new(CutDetectorOptions::new().multiplier(2.0).margin(1.0));
    assert_eq!(custom.threshold(&diffs), 5.0);
}

#[test]
fn builder_clamps_out_of_range_values() {
    let options = CutDetectorOptions::new()
        .multiplier(-1.0)
        .baseline_percentile(4.0);
    assert_eq!(options.multiplier, 0.0);
    assert_eq!(options.baseline_percentile, 1.0);
}

#[test]
fn percentile_past_one_from_a_struct_literal_uses_the_maximum() {
    let detector = CutDetector::new(CutDetectorOptions {
        baseline_percentile: 1.5,
        ..Default::default()
    });
    let diffs = timeline(&[5.0, 1.0, 90.0, 2.0]);
    assert_eq!(detector.baseline(&diffs), 90.0);

    let windows = detector.detect(&diffs, ms(3000));
    assert_eq!(windows.len(), 1);
}

#[test]
fn non_finite_percentile_falls_back_to_the_median() {
    let diffs = timeline(&[5.0, 1.0, 90.0, 2.0, 3.0]);
    for percentile in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let detector = CutDetector::new(CutDetectorOptions {
            baseline_percentile: percentile,
            ..Default::default()
        });
        assert_eq!(detector.baseline(&diffs), 3.0);
    }
}

#[test]
fn validate_rejects_out_of_range_tuning() {
    assert!(CutDetectorOptions::default().validate().is_ok());

    let invalid = [
        CutDetectorOptions {
            baseline_percentile: 1.5,
            ..Default::default()
        },
        CutDetectorOptions {
            baseline_percentile: f64::NAN,
            ..Default::default()
        },
        CutDetectorOptions {
            multiplier: -2.0,
            ..Default::default()
        },
        CutDetectorOptions {
            multiplier: f64::INFINITY,
            ..Default::default()
        },
        CutDetectorOptions {
            margin: f64::NAN,
            ..Default::default()
        },
    ];
    for options in invalid {
        assert!(
            matches!(options.validate(), Err(SegmentError::InvalidConfiguration(_))),
            "{options:?} should be rejected"
        );
    }
}

// ── Candidates ─────────────────────────────────────────────────────

#[test]
fn candidates_exceed_the_threshold_strictly() {
    let detector = CutDetector::default();
    // Median 0, threshold exactly 8.
    let diffs = timeline(&[0.0, 8.0, 0.0, 8.5, 0.0]);
    assert_eq!(detector.candidates(&diffs), vec![ms(2000)]);
}

#[test]
fn high_motion_raises_the_threshold() {
    let detector = CutDetector::default();
    // Constant motion around 10 would pass a fixed threshold of 8.
    let diffs = timeline(&[10.0, 11.0, 9.0, 10.0, 60.0, 10.0, 12.0]);
    assert_eq!(detector.candidates(&diffs), vec![ms(2500)]);
}

// ── Merging ────────────────────────────────────────────────────────

#[test]
fn merge_drops_candidates_near_the_start() {
    let detector = CutDetector::default();
    let kept = detector.merge(&[ms(500), ms(4000)], ms(10_000));
    assert_eq!(kept, vec![ms(4000)]);
}

#[test]
fn merge_keeps_the_earlier_of_close_candidates() {
    let detector = CutDetector::default();
    let kept = detector.merge(&[ms(3000), ms(3500), ms(3900), ms(6000)], ms(10_000));
    assert_eq!(kept, vec![ms(3000), ms(6000)]);
}

#[test]
fn merge_drops_candidates_near_the_end() {
    let detector = CutDetector::default();
    let kept = detector.merge(&[ms(5000), ms(9500)], ms(10_000));
    assert_eq!(kept, vec![ms(5000)]);
}

#[test]
fn merge_accepts_exactly_the_minimum_length() {
    let detector = CutDetector::default();
    let kept = detector.merge(&[ms(1000), ms(2000), ms(9000)], ms(10_000));
    assert_eq!(kept, vec![ms(1000), ms(2000), ms(9000)]);
}

#[test]
fn zero_minimum_length_keeps_every_candidate() {
    let detector = CutDetector::new(CutDetectorOptions::new().min_scene_length(Duration::ZERO));
    let kept = detector.merge(&[ms(500), ms(1000), ms(1500)], ms(2000));
    assert_eq!(kept, vec![ms(500), ms(1000), ms(1500)]);
}

// ── Windows ────────────────────────────────────────────────────────

#[test]
fn flat_timeline_is_one_window() {
    let detector = CutDetector::default();
    let windows = detector.detect(&timeline(&[0.0; 19]), ms(10_000));
    assert_eq!(
        windows,
        vec![SceneWindow {
            start: Duration::ZERO,
            end: ms(10_000)
        }]
    );
}

#[test]
fn empty_timeline_is_one_window() {
    let windows = CutDetector::default().detect(&[], ms(400));
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].end, ms(400));
}

#[test]
fn windows_are_contiguous() {
    let mut scores = vec![0.5; 39];
    scores[5] = 70.0; // 3.0 s
    scores[19] = 70.0; // 10.0 s
    scores[29] = 70.0; // 15.0 s
    let windows = CutDetector::default().detect(&timeline(&scores), ms(20_000));

    assert_eq!(windows.len(), 4);
    assert_eq!(windows[0].start, Duration::ZERO);
    assert_eq!(windows[3].end, ms(20_000));
    for pair in windows.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert_eq!(
        windows.iter().map(|window| window.start).collect::<Vec<_>>(),
        vec![Duration::ZERO, ms(3000), ms(10_000), ms(15_000)]
    );
}
