//! Fixed-duration slicing.
//!
//! [`FixedSlicer`] cuts a video into windows of a constant length without
//! looking at frame content. The last window runs to the end of the video and
//! may be shorter; if it would be shorter than
//! [`min_tail`](FixedSlicer::with_min_tail) it is folded into the window
//! before it instead.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use scenecut::FixedSlicer;
//!
//! let slicer = FixedSlicer::new(Duration::from_secs(5))?;
//! let windows = slicer.slice(Duration::from_secs(12));
//! assert_eq!(windows.len(), 3);
//! assert_eq!(windows[2].start, Duration::from_secs(10));
//! assert_eq!(windows[2].end, Duration::from_secs(12));
//! # Ok::<(), scenecut::SegmentError>(())
//! ```

use std::time::Duration;

use crate::error::SegmentError;
use crate::scene::{SceneWindow, windows_from_boundaries};

/// Default shortest tail kept as its own window.
pub const DEFAULT_MIN_TAIL: Duration = Duration::from_millis(500);

/// Uniform scene-boundary generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSlicer {
    segment_length: Duration,
    min_tail: Duration,
}

impl FixedSlicer {
    /// Create a slicer producing windows of `segment_length`.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidConfiguration`] if `segment_length` is
    /// zero.
    pub fn new(segment_length: Duration) -> Result<Self, SegmentError> {
        if segment_length.is_zero() {
            return Err(SegmentError::InvalidConfiguration(
                "segment length must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            segment_length,
            min_tail: DEFAULT_MIN_TAIL,
        })
    }

    /// Set the shortest tail emitted as a separate window.
    #[must_use]
    pub fn with_min_tail(mut self, min_tail: Duration) -> Self {
        self.min_tail = min_tail;
        self
    }

    /// The configured window length.
    pub fn segment_length(&self) -> Duration {
        self.segment_length
    }

    /// Interior boundaries `D, 2D, ...` strictly inside the video.
    ///
    /// The last boundary is dropped when the tail after it is shorter than
    /// `min_tail`.
    pub fn boundaries(&self, duration: Duration) -> Vec<Duration> {
        let mut boundaries = Vec::new();
        let mut boundary = self.segment_length;

        while boundary < duration {
            boundaries.push(boundary);
            boundary += self.segment_length;
        }

        if boundaries
            .last()
            .is_some_and(|&last| duration - last < self.min_tail)
        {
            boundaries.pop();
        }

        boundaries
    }

    /// Contiguous windows covering `[0, duration)`.
    pub fn slice(&self, duration: Duration) -> Vec<SceneWindow> {
        windows_from_boundaries(&self.boundaries(duration), duration)
    }
}
