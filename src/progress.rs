//! Progress reporting and cancellation support.
//!
//! This module provides [`ProgressCallback`] for monitoring a segmentation
//! run, [`ProgressHandle`] for polling the latest percentage from another
//! thread, and [`CancellationToken`] for cooperative cancellation.
//!
//! A run reports one percentage per sampled frame and one per scene
//! thumbnail. Percentages are strictly increasing, stay inside `[0, 100]`,
//! and reach `100.0` only when the run completes successfully.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use scenecut::{
//!     ProgressCallback, ProgressInfo, SceneSegmenter, SegmentError, SegmentOptions,
//!     SegmentationMode,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("[{:?}] {:.1}% complete", info.phase, info.percentage);
//!     }
//! }
//!
//! let options = SegmentOptions::new().with_progress(Arc::new(PrintProgress));
//! let result = SceneSegmenter::new(options)
//!     .segment_file("input.mp4", SegmentationMode::Adaptive)?;
//! # Ok::<(), SegmentError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU32, Ordering},
};
use std::time::{Duration, Instant};

/// Share of the percentage range covered by the scan phase.
///
/// The scan ends at exactly this value; thumbnails fill the space up to, but
/// not including, `100.0`.
pub(crate) const SCAN_SHARE: f32 = 90.0;

/// The phase a segmentation run is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SegmentationPhase {
    /// Sampling frames and computing the diff timeline.
    Scanning,
    /// Extracting one thumbnail per scene.
    Thumbnails,
    /// The result has been assembled.
    Complete,
}

/// A snapshot of segmentation progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What the run is currently doing.
    pub phase: SegmentationPhase,
    /// Items (samples or thumbnails) processed so far in this phase.
    pub current: u64,
    /// Items expected in this phase.
    pub total: u64,
    /// Overall completion percentage (0.0 – 100.0).
    pub percentage: f32,
    /// Wall-clock time elapsed since the run started.
    pub elapsed: Duration,
    /// Estimated time remaining, extrapolated from the overall percentage.
    pub estimated_remaining: Option<Duration>,
    /// Video timestamp of the item just processed.
    pub current_timestamp: Option<Duration>,
}

/// Trait for receiving progress updates during segmentation.
///
/// Callbacks run on the thread driving the scan, between two samples, so
/// implementations should return quickly. Implementations must be [`Send`]
/// and [`Sync`] because the async and parallel paths invoke them from
/// worker threads.
///
/// Progress callbacks observe but cannot halt the operation. Use
/// [`CancellationToken`] for cooperative cancellation.
pub trait ProgressCallback: Send + Sync {
    /// Called after each processed sample or thumbnail.
    fn on_progress(&self, info: &ProgressInfo);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// A polled progress handle.
///
/// Install it with [`SegmentOptions::with_progress`](crate::SegmentOptions::with_progress)
/// and read [`percentage`](ProgressHandle::percentage) from any thread. The
/// segmenter only performs an atomic store per update, so a slow reader can
/// never hold up the scan.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use scenecut::{ProgressHandle, SegmentOptions};
///
/// let handle = ProgressHandle::new();
/// let options = SegmentOptions::new().with_progress(Arc::new(handle.clone()));
/// assert_eq!(handle.percentage(), 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    percentage_bits: Arc<AtomicU32>,
}

impl ProgressHandle {
    /// Create a handle reading `0.0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently reported percentage.
    pub fn percentage(&self) -> f32 {
        f32::from_bits(self.percentage_bits.load(Ordering::Acquire))
    }

    /// Returns `true` once a run has reported `100.0`.
    pub fn is_complete(&self) -> bool {
        self.percentage() >= 100.0
    }
}

impl ProgressCallback for ProgressHandle {
    fn on_progress(&self, info: &ProgressInfo) {
        self.percentage_bits
            .store(info.percentage.to_bits(), Ordering::Release);
    }
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clone this token and share it between threads; call
/// [`cancel`](CancellationToken::cancel) from any thread to stop the
/// associated run. The segmenter checks the token once before every sampled
/// frame and once before every thumbnail, never in the middle of a decode.
///
/// # Example
///
/// ```
/// use scenecut::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation.
    ///
    /// All clones of this token will observe the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal helper that maps phase-local counts to an overall percentage
/// and emits callbacks.
///
/// The scan phase spans `[0, SCAN_SHARE]`, the thumbnail phase spans
/// `(SCAN_SHARE, 100)`, and [`finish`](ProgressTracker::finish) reports
/// exactly `100.0`. A report is only emitted when the percentage strictly
/// increases.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    phase: SegmentationPhase,
    total: u64,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    items_since_last_report: u64,
    last_percentage: Option<f32>,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, batch_size: u64) -> Self {
        Self {
            callback,
            phase: SegmentationPhase::Scanning,
            total: 0,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            items_since_last_report: 0,
            last_percentage: None,
        }
    }

    /// Enter a new phase expecting `total` items.
    pub(crate) fn begin(&mut self, phase: SegmentationPhase, total: u64) {
        self.phase = phase;
        self.total = total;
        self.current = 0;
        self.items_since_last_report = 0;
    }

    /// Record one completed item and fire the callback if the batch
    /// threshold is reached or the phase is done.
    pub(crate) fn advance(&mut self, timestamp: Option<Duration>) {
        self.current += 1;
        self.items_since_last_report += 1;

        if self.items_since_last_report >= self.batch_size || self.current >= self.total {
            self.items_since_last_report = 0;
            self.report(self.phase_percentage(), timestamp);
        }
    }

    /// Report completion at exactly 100%.
    pub(crate) fn finish(&mut self) {
        self.phase = SegmentationPhase::Complete;
        self.current = self.total;
        self.report(100.0, None);
    }

    fn phase_percentage(&self) -> f32 {
        let total = self.total.max(1) as f32;
        let done = self.current.min(self.total.max(1)) as f32;
        match self.phase {
            SegmentationPhase::Scanning => SCAN_SHARE * done / total,
            // One extra slot keeps the final thumbnail strictly below 100.
            SegmentationPhase::Thumbnails => {
                SCAN_SHARE + (100.0 - SCAN_SHARE) * done / (total + 1.0)
            }
            SegmentationPhase::Complete => 100.0,
        }
    }

    fn report(&mut self, percentage: f32, timestamp: Option<Duration>) {
        let percentage = percentage.clamp(0.0, 100.0);
        if self.last_percentage.is_some_and(|last| percentage <= last) {
            return;
        }
        self.last_percentage = Some(percentage);

        let elapsed = self.start_time.elapsed();
        let estimated_remaining = (percentage > 0.0).then(|| {
            let remaining = elapsed.as_secs_f64() * f64::from(100.0 - percentage)
                / f64::from(percentage);
            Duration::from_secs_f64(remaining.max(0.0))
        });

        let info = ProgressInfo {
            phase: self.phase,
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_timestamp: timestamp,
        };

        self.callback.on_progress(&info);
    }
}
