//! Progress and cancellation tests.

mod common;

use std::sync::Arc;
use std::thread;

use common::{RecordingProgress, SyntheticSource, secs};
use scenecut::{
    CancellationToken, ProgressCallback, ProgressHandle, ProgressInfo, SceneSegmenter,
    SegmentOptions, SegmentationMode, SegmentationPhase,
};

// ── CancellationToken ──────────────────────────────────────────────

#[test]
fn cancellation_token_default_not_cancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
}

#[test]
fn cancellation_token_cancel() {
    let token = CancellationToken::new();
    token.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn cancellation_token_clone_shares_state() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());

    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn cancellation_token_default_trait() {
    let token = CancellationToken::default();
    assert!(!token.is_cancelled());
}

#[test]
fn cancellation_token_across_threads() {
    let token = CancellationToken::new();
    let remote = token.clone();
    thread::spawn(move || remote.cancel()).join().unwrap();
    assert!(token.is_cancelled());
}

// ── ProgressHandle ─────────────────────────────────────────────────

#[test]
fn progress_handle_starts_at_zero() {
    let handle = ProgressHandle::new();
    assert_eq!(handle.percentage(), 0.0);
    assert!(!handle.is_complete());
}

#[test]
fn progress_handle_clones_observe_updates() {
    let handle = ProgressHandle::new();
    let observer = handle.clone();

    let info = ProgressInfo {
        phase: SegmentationPhase::Scanning,
        current: 3,
        total: 10,
        percentage: 27.0,
        elapsed: secs(1.0),
        estimated_remaining: None,
        current_timestamp: Some(secs(1.5)),
    };
    handle.on_progress(&info);

    assert_eq!(observer.percentage(), 27.0);
}

#[test]
fn progress_handle_polled_from_another_thread() {
    let handle = ProgressHandle::new();
    let options = SegmentOptions::new().with_progress(Arc::new(handle.clone()));

    let worker = thread::spawn(move || {
        let mut source = SyntheticSource::new(secs(20.0)).with_cuts(&[10.0]);
        SceneSegmenter::new(options).segment(&mut source, SegmentationMode::Adaptive)
    });

    let result = worker.join().unwrap().unwrap();
    assert_eq!(result.scenes.len(), 2);
    assert!(handle.is_complete());
}

// ── ProgressInfo ───────────────────────────────────────────────────

#[test]
fn progress_info_carries_counts_and_timestamps() {
    let progress = RecordingProgress::new();
    let options = SegmentOptions::new()
        .with_progress(progress.clone())
        .with_thumbnails(false);
    let mut source = SyntheticSource::new(secs(2.0));
    SceneSegmenter::new(options)
        .segment(&mut source, SegmentationMode::Adaptive)
        .unwrap();

    let infos = progress.infos.lock().unwrap();
    let scanning: Vec<&ProgressInfo> = infos
        .iter()
        .filter(|info| info.phase == SegmentationPhase::Scanning)
        .collect();

    assert_eq!(scanning.len(), 4);
    for (position, info) in scanning.iter().enumerate() {
        assert_eq!(info.current, position as u64 + 1);
        assert_eq!(info.total, 4);
        assert_eq!(
            info.current_timestamp,
            Some(secs(0.5) * position as u32)
        );
    }
    assert!(scanning[3].estimated_remaining.is_some());
}

#[test]
fn no_callback_is_fine() {
    let mut source = SyntheticSource::new(secs(3.0));
    let result = SceneSegmenter::new(SegmentOptions::new())
        .segment(&mut source, SegmentationMode::fixed_secs(1))
        .unwrap();
    assert_eq!(result.scenes.len(), 3);
}
