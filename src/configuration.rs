//! Segmentation configuration.
//!
//! [`SegmentOptions`] is a builder that threads the sampling cadence,
//! detector tuning, thumbnail settings, progress callbacks, and cancellation
//! tokens through a run without polluting every function signature.
//! [`SegmentationMode`] selects how scene boundaries are decided.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use scenecut::{
//!     CancellationToken, CutDetectorOptions, ProgressHandle, SegmentOptions,
//! };
//!
//! let token = CancellationToken::new();
//! let progress = ProgressHandle::new();
//! let options = SegmentOptions::new()
//!     .with_sampling_interval(Duration::from_millis(250))
//!     .with_cut_detector(CutDetectorOptions::new().margin(12.0))
//!     .with_progress(Arc::new(progress.clone()))
//!     .with_cancellation(token.clone());
//! ```

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use crate::detect::CutDetectorOptions;
use crate::diff::DiffScorer;
use crate::error::SegmentError;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};
use crate::slicer::DEFAULT_MIN_TAIL;
use crate::thumbnail::ThumbnailOptions;

/// Default time between two sampled frames.
pub const DEFAULT_SAMPLING_INTERVAL: Duration = Duration::from_millis(500);

/// Fixed segment lengths offered by the CLI.
pub const STANDARD_SEGMENT_LENGTHS: [u64; 3] = [5, 8, 10];

/// How scene boundaries are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentationMode {
    /// Boundaries where the diff timeline shows a cut.
    #[default]
    Adaptive,
    /// Boundaries every `segment_length`, regardless of content.
    Fixed {
        /// Length of each scene (the last one may be shorter).
        segment_length: Duration,
    },
}

impl SegmentationMode {
    /// Fixed-length mode with a whole number of seconds.
    pub fn fixed_secs(seconds: u64) -> Self {
        SegmentationMode::Fixed {
            segment_length: Duration::from_secs(seconds),
        }
    }

    /// Returns `true` for [`SegmentationMode::Adaptive`].
    pub fn is_adaptive(&self) -> bool {
        matches!(self, SegmentationMode::Adaptive)
    }

    pub(crate) fn validate(&self) -> Result<(), SegmentError> {
        match self {
            SegmentationMode::Fixed { segment_length } if segment_length.is_zero() => Err(
                SegmentError::InvalidConfiguration("segment length must be greater than zero".into()),
            ),
            _ => Ok(()),
        }
    }
}

impl Display for SegmentationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SegmentationMode::Adaptive => write!(f, "adaptive"),
            SegmentationMode::Fixed { segment_length } => {
                write!(f, "fixed:{}s", segment_length.as_secs_f64())
            }
        }
    }
}

/// Configuration for a segmentation run.
///
/// All fields have defaults; a default-constructed value samples every
/// 500 ms, uses the default detector tuning, and produces 320 px JPEG
/// thumbnails.
#[derive(Clone)]
pub struct SegmentOptions {
    pub(crate) sampling_interval: Duration,
    pub(crate) cut_detector: CutDetectorOptions,
    pub(crate) scorer: DiffScorer,
    pub(crate) thumbnail: ThumbnailOptions,
    pub(crate) thumbnails_enabled: bool,
    pub(crate) fixed_mode_diffs: bool,
    pub(crate) min_tail: Duration,
    pub(crate) decode_max_dimension: Option<u32>,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N items).
    pub(crate) batch_size: u64,
}

impl Debug for SegmentOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SegmentOptions")
            .field("sampling_interval", &self.sampling_interval)
            .field("cut_detector", &self.cut_detector)
            .field("scorer", &self.scorer)
            .field("thumbnail", &self.thumbnail)
            .field("thumbnails_enabled", &self.thumbnails_enabled)
            .field("fixed_mode_diffs", &self.fixed_mode_diffs)
            .field("min_tail", &self.min_tail)
            .field("decode_max_dimension", &self.decode_max_dimension)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentOptions {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            sampling_interval: DEFAULT_SAMPLING_INTERVAL,
            cut_detector: CutDetectorOptions::default(),
            scorer: DiffScorer::default(),
            thumbnail: ThumbnailOptions::default(),
            thumbnails_enabled: true,
            fixed_mode_diffs: true,
            min_tail: DEFAULT_MIN_TAIL,
            decode_max_dimension: None,
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }

    /// Set the time between two sampled frames.
    ///
    /// A zero interval is rejected when the run starts.
    #[must_use]
    pub fn with_sampling_interval(mut self, interval: Duration) -> Self {
        self.sampling_interval = interval;
        self
    }

    /// Set the adaptive detector tuning.
    #[must_use]
    pub fn with_cut_detector(mut self, options: CutDetectorOptions) -> Self {
        self.cut_detector = options;
        self
    }

    /// Set the diff scorer (grid size).
    #[must_use]
    pub fn with_scorer(mut self, scorer: DiffScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Set the thumbnail size and quality.
    #[must_use]
    pub fn with_thumbnail(mut self, options: ThumbnailOptions) -> Self {
        self.thumbnail = options;
        self
    }

    /// Enable or disable thumbnail extraction. Defaults to `true`.
    ///
    /// When disabled every scene is emitted with `thumbnail: None`.
    #[must_use]
    pub fn with_thumbnails(mut self, enabled: bool) -> Self {
        self.thumbnails_enabled = enabled;
        self
    }

    /// Whether fixed-length mode still computes the diff timeline.
    /// Defaults to `true`.
    ///
    /// Fixed boundaries never depend on the diffs, so turning this off skips
    /// the scan entirely and returns an empty timeline.
    #[must_use]
    pub fn with_fixed_mode_diffs(mut self, enabled: bool) -> Self {
        self.fixed_mode_diffs = enabled;
        self
    }

    /// Shortest final slice kept separate in fixed-length mode.
    #[must_use]
    pub fn with_min_tail(mut self, min_tail: Duration) -> Self {
        self.min_tail = min_tail;
        self
    }

    /// Limit the longest edge of frames decoded by
    /// [`segment_file`](crate::SceneSegmenter::segment_file).
    ///
    /// Scoring works on a coarse grid anyway, so a small value speeds up the
    /// scan. Thumbnails are never larger than this.
    #[must_use]
    pub fn with_decode_max_dimension(mut self, max_dimension: Option<u32>) -> Self {
        self.decode_max_dimension = max_dimension.map(|value| value.max(1));
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// When the token is cancelled the run stops before the next sample and
    /// returns [`SegmentError::Cancelled`].
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires.
    ///
    /// A value of 1 means every item; 10 means every 10th item. The end of
    /// each phase and completion are always reported. Clamped to a minimum
    /// of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// The configured sampling interval.
    pub fn sampling_interval(&self) -> Duration {
        self.sampling_interval
    }

    /// The configured detector tuning.
    pub fn cut_detector(&self) -> &CutDetectorOptions {
        &self.cut_detector
    }

    /// The configured decode size limit.
    pub fn decode_max_dimension(&self) -> Option<u32> {
        self.decode_max_dimension
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    pub(crate) fn validate(&self) -> Result<(), SegmentError> {
        if self.sampling_interval.is_zero() {
            return Err(SegmentError::InvalidConfiguration(
                "sampling interval must be greater than zero".to_string(),
            ));
        }
        self.cut_detector.validate()
    }
}
