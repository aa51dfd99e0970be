//! Error types for the `scenecut` crate.
//!
//! This module defines [`SegmentError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry the timestamp and frame
//! index they relate to, where one exists, so a failed run can be diagnosed
//! without re-running it.

use std::{io::Error as IoError, path::PathBuf, time::Duration};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `scenecut` operations.
///
/// Errors fall into two classes. Fatal errors ([`Decode`](SegmentError::Decode),
/// [`Seek`](SegmentError::Seek), and everything raised while opening a
/// source) abort a segmentation run and no partial result is returned.
/// [`Thumbnail`](SegmentError::Thumbnail) errors are scoped to one scene: the
/// segmenter logs them and emits that scene without a thumbnail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SegmentError {
    /// The video could not be opened.
    #[error("Failed to open video at {path}: {reason}")]
    FileOpen {
        /// Path (or URL) that was passed to the source constructor.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The container has no video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The container is unreadable or a frame could not be decoded.
    #[error("Failed to decode video{}: {reason}", describe_position(.timestamp, .frame_index))]
    Decode {
        /// Requested timestamp, when the failure happened during sampling.
        timestamp: Option<Duration>,
        /// Last frame index reached before the failure, if any.
        frame_index: Option<u64>,
        /// Underlying reason.
        reason: String,
    },

    /// A timestamp past the end of the video was requested.
    #[error("Cannot seek to {timestamp:?}: video is only {duration:?} long")]
    Seek {
        /// The requested timestamp.
        timestamp: Duration,
        /// The duration of the video.
        duration: Duration,
    },

    /// A scene thumbnail could not be produced.
    #[error("Failed to create thumbnail at {timestamp:?}: {reason}")]
    Thumbnail {
        /// Timestamp the thumbnail was taken from.
        timestamp: Duration,
        /// Underlying reason.
        reason: String,
    },

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,

    /// An option value is out of range (e.g. a zero segment length).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate during conversion or encoding.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl SegmentError {
    /// Shorthand for a [`Decode`](SegmentError::Decode) error without
    /// position context.
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        SegmentError::Decode {
            timestamp: None,
            frame_index: None,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error aborts a whole segmentation run.
    ///
    /// Only [`Thumbnail`](SegmentError::Thumbnail) and
    /// [`Cancelled`](SegmentError::Cancelled) are not fatal; cancellation is
    /// a caller decision rather than a failure.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SegmentError::Thumbnail { .. } | SegmentError::Cancelled)
    }

    /// Attach a sampling position to a decode error that has none yet.
    ///
    /// Other variants are returned unchanged.
    pub(crate) fn at_position(self, at: Duration, index: Option<u64>) -> Self {
        match self {
            SegmentError::Decode {
                timestamp,
                frame_index,
                reason,
            } => SegmentError::Decode {
                timestamp: timestamp.or(Some(at)),
                frame_index: frame_index.or(index),
                reason,
            },
            SegmentError::FfmpegError(reason) => SegmentError::Decode {
                timestamp: Some(at),
                frame_index: index,
                reason,
            },
            other => other,
        }
    }
}

fn describe_position(timestamp: &Option<Duration>, frame_index: &Option<u64>) -> String {
    match (timestamp, frame_index) {
        (Some(timestamp), Some(index)) => format!(" at {timestamp:?} (after frame {index})"),
        (Some(timestamp), None) => format!(" at {timestamp:?}"),
        (None, Some(index)) => format!(" after frame {index}"),
        (None, None) => String::new(),
    }
}

impl From<FfmpegError> for SegmentError {
    fn from(error: FfmpegError) -> Self {
        SegmentError::FfmpegError(error.to_string())
    }
}
