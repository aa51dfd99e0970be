//! Error handling tests.

use std::path::PathBuf;
use std::time::Duration;

use scenecut::{MediaSource, SceneSegmenter, SegmentError, SegmentOptions, SegmentationMode};

// ── Classification ─────────────────────────────────────────────────

#[test]
fn fatal_and_non_fatal_variants() {
    assert!(SegmentError::NoVideoStream.is_fatal());
    assert!(
        SegmentError::Seek {
            timestamp: Duration::from_secs(12),
            duration: Duration::from_secs(10),
        }
        .is_fatal()
    );
    assert!(
        !SegmentError::Thumbnail {
            timestamp: Duration::from_secs(1),
            reason: "bad frame".to_string(),
        }
        .is_fatal()
    );
    assert!(!SegmentError::Cancelled.is_fatal());
}

// ── Display ────────────────────────────────────────────────────────

#[test]
fn decode_error_mentions_the_position() {
    let error = SegmentError::Decode {
        timestamp: Some(Duration::from_secs(4)),
        frame_index: Some(105),
        reason: "corrupt packet".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Failed to decode video at 4s (after frame 105): corrupt packet"
    );

    let bare = SegmentError::Decode {
        timestamp: None,
        frame_index: None,
        reason: "unsupported codec".to_string(),
    };
    assert_eq!(bare.to_string(), "Failed to decode video: unsupported codec");
}

#[test]
fn file_open_error_names_the_path() {
    let error = SegmentError::FileOpen {
        path: PathBuf::from("missing.mp4"),
        reason: "No such file or directory".to_string(),
    };
    assert!(error.to_string().contains("missing.mp4"));
}

#[test]
fn seek_error_shows_both_times() {
    let error = SegmentError::Seek {
        timestamp: Duration::from_secs(12),
        duration: Duration::from_secs(10),
    };
    let message = error.to_string();
    assert!(message.contains("12s"));
    assert!(message.contains("10s"));
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: SegmentError = io.into();
    assert!(matches!(error, SegmentError::IoError(_)));
    assert!(error.is_fatal());
}

// ── Opening sources ────────────────────────────────────────────────

#[test]
fn open_nonexistent_file() {
    let result = MediaSource::open("definitely_not_here.mp4");
    match result {
        Err(SegmentError::FileOpen { path, .. }) => {
            assert_eq!(path, PathBuf::from("definitely_not_here.mp4"));
        }
        other => panic!("Expected FileOpen, got: {other:?}"),
    }
}

#[test]
fn open_garbage_bytes() {
    let result = MediaSource::from_bytes(b"this is not a video container at all");
    assert!(result.is_err());
    assert!(result.unwrap_err().is_fatal());
}

#[test]
fn segment_file_on_a_text_file_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, b"plain text").unwrap();

    let result = SceneSegmenter::new(SegmentOptions::new())
        .segment_file(file.path(), SegmentationMode::Adaptive);
    assert!(result.is_err());
}
