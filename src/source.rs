//! The frame-source abstraction.
//!
//! [`FrameSource`] is the narrow interface the segmenter decodes through:
//! a duration and "decode the frame at this timestamp". The FFmpeg-backed
//! [`MediaSource`](crate::MediaSource) is the production implementation;
//! hardware decoders or synthetic test sources only need these two methods.

use std::time::Duration;

use image::RgbImage;

use crate::error::SegmentError;

/// A decoded frame taken at a sampling point.
///
/// Samples are transient: the scan loop drops each one after scoring it.
#[derive(Debug, Clone)]
pub struct FrameSample {
    /// Index of the decoded frame in the stream (0-based).
    pub frame_index: u64,
    /// Presentation timestamp of the decoded frame.
    pub timestamp: Duration,
    /// Decoded RGB pixels.
    pub pixels: RgbImage,
}

/// A seekable source of decoded video frames.
///
/// Seeking is assumed to be expensive. Callers should request timestamps in
/// non-decreasing order; implementations may serve such requests by decoding
/// forward instead of seeking. Only one request can be in flight at a time
/// because [`frame_at`](FrameSource::frame_at) takes `&mut self`.
pub trait FrameSource {
    /// Total duration of the video.
    fn duration(&self) -> Duration;

    /// Decode the first frame whose timestamp is at or after `timestamp`.
    ///
    /// When `timestamp` lies after the last frame but still within the
    /// duration, the last frame is returned.
    ///
    /// # Errors
    ///
    /// - [`SegmentError::Seek`] if `timestamp` exceeds the duration.
    /// - [`SegmentError::Decode`] if the frame cannot be decoded.
    fn frame_at(&mut self, timestamp: Duration) -> Result<FrameSample, SegmentError>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn duration(&self) -> Duration {
        (**self).duration()
    }

    fn frame_at(&mut self, timestamp: Duration) -> Result<FrameSample, SegmentError> {
        (**self).frame_at(timestamp)
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn duration(&self) -> Duration {
        (**self).duration()
    }

    fn frame_at(&mut self, timestamp: Duration) -> Result<FrameSample, SegmentError> {
        (**self).frame_at(timestamp)
    }
}
