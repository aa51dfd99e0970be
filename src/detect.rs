//! Adaptive cut detection.
//!
//! [`CutDetector`] turns a diff timeline into scene boundaries. Instead of a
//! fixed score threshold it measures the video's own noise floor (a
//! percentile of all diff scores) so that footage with constant motion does
//! not register every sample as a cut:
//!
//! 1. `baseline` = the configured percentile of all diff scores.
//! 2. A sample is a candidate when `diff_score > baseline * multiplier + margin`.
//! 3. Candidates closer than `min_scene_length` to the previously kept
//!    boundary (the video start counts as one) are merged into it, as is a
//!    candidate closer than `min_scene_length` to the end of the video.
//! 4. With no surviving boundary the whole video is a single scene.
//!
//! All steps are linear in the number of samples.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use scenecut::{CutDetector, FrameDiff};
//!
//! let diffs: Vec<FrameDiff> = (1..20)
//!     .map(|index| FrameDiff {
//!         frame_index: index * 15,
//!         timestamp: Duration::from_millis(index * 500),
//!         diff_score: if index == 10 { 70.0 } else { 1.0 },
//!     })
//!     .collect();
//!
//! let windows = CutDetector::default().detect(&diffs, Duration::from_secs(10));
//! assert_eq!(windows.len(), 2);
//! assert_eq!(windows[1].start, Duration::from_secs(5));
//! ```

use std::cmp::Ordering;
use std::time::Duration;

use crate::error::SegmentError;
use crate::scene::{FrameDiff, SceneWindow, windows_from_boundaries};

/// Default noise-floor multiplier.
pub const DEFAULT_MULTIPLIER: f64 = 3.0;
/// Default margin added on top of the scaled noise floor (score units).
pub const DEFAULT_MARGIN: f64 = 8.0;
/// Default minimum scene length.
pub const DEFAULT_MIN_SCENE_LENGTH: Duration = Duration::from_secs(1);
/// Default percentile used as the noise floor (the median).
pub const DEFAULT_BASELINE_PERCENTILE: f64 = 0.5;

/// Cut detection settings.
///
/// The defaults leave ordinary camera motion (scores of a few units) below
/// the threshold while hard cuts, which typically score 20 or more, pass it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct CutDetectorOptions {
    /// Factor applied to the noise floor.
    pub multiplier: f64,
    /// Constant added to the scaled noise floor.
    pub margin: f64,
    /// Boundaries closer than this are merged.
    pub min_scene_length: Duration,
    /// Percentile (0.0 – 1.0) of diff scores taken as the noise floor.
    pub baseline_percentile: f64,
}

impl Default for CutDetectorOptions {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
            margin: DEFAULT_MARGIN,
            min_scene_length: DEFAULT_MIN_SCENE_LENGTH,
            baseline_percentile: DEFAULT_BASELINE_PERCENTILE,
        }
    }
}

impl CutDetectorOptions {
    /// Create options with the default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check values that may have bypassed the builder methods.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::InvalidConfiguration`] for a non-finite or
    /// negative multiplier, a non-finite margin, or a percentile outside
    /// `0.0 – 1.0`.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(SegmentError::InvalidConfiguration(format!(
                "cut multiplier must be a finite, non-negative number (got {})",
                self.multiplier
            )));
        }
        if !self.margin.is_finite() {
            return Err(SegmentError::InvalidConfiguration(format!(
                "cut margin must be finite (got {})",
                self.margin
            )));
        }
        if !(0.0..=1.0).contains(&self.baseline_percentile) {
            return Err(SegmentError::InvalidConfiguration(format!(
                "baseline percentile must lie in 0.0 – 1.0 (got {})",
                self.baseline_percentile
            )));
        }
        Ok(())
    }

    /// Set the noise-floor multiplier. Negative values are clamped to 0.
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier.max(0.0);
        self
    }

    /// Set the margin added to the scaled noise floor.
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the minimum scene length.
    pub fn min_scene_length(mut self, length: Duration) -> Self {
        self.min_scene_length = length;
        self
    }

    /// Set the noise-floor percentile, clamped to `0.0 – 1.0`.
    pub fn baseline_percentile(mut self, percentile: f64) -> Self {
        self.baseline_percentile = percentile.clamp(0.0, 1.0);
        self
    }
}

/// Adaptive scene-boundary detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct CutDetector {
    options: CutDetectorOptions,
}

impl CutDetector {
    /// Create a detector with the given tuning.
    pub fn new(options: CutDetectorOptions) -> Self {
        Self { options }
    }

    /// The detector's tuning.
    pub fn options(&self) -> &CutDetectorOptions {
        &self.options
    }

    /// Noise floor of a diff timeline.
    ///
    /// Uses `select_nth_unstable_by`, which is linear on average. Returns
    /// `0.0` for an empty timeline. An out-of-range percentile is clamped
    /// and a non-finite one falls back to the median.
    pub fn baseline(&self, diffs: &[FrameDiff]) -> f64 {
        if diffs.is_empty() {
            return 0.0;
        }

        let percentile = if self.options.baseline_percentile.is_finite() {
            self.options.baseline_percentile.clamp(0.0, 1.0)
        } else {
            DEFAULT_BASELINE_PERCENTILE
        };

        let mut scores: Vec<f64> = diffs.iter().map(|diff| diff.diff_score).collect();
        let last = scores.len() - 1;
        let rank = ((last as f64 * percentile).round() as usize).min(last);
        let (_, value, _) = scores.select_nth_unstable_by(rank, |a, b| {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        });
        *value
    }

    /// Score a sample must exceed to become a candidate boundary.
    pub fn threshold(&self, diffs: &[FrameDiff]) -> f64 {
        self.baseline(diffs) * self.options.multiplier + self.options.margin
    }

    /// Timestamps of the samples whose score exceeds the threshold, in
    /// timeline order.
    pub fn candidates(&self, diffs: &[FrameDiff]) -> Vec<Duration> {
        let threshold = self.threshold(diffs);
        log::debug!(
            "Cut threshold {:.2} over {} samples",
            threshold,
            diffs.len()
        );

        diffs
            .iter()
            .filter(|diff| diff.diff_score > threshold)
            .map(|diff| diff.timestamp)
            .collect()
    }

    /// Merge candidates closer than the minimum scene length.
    ///
    /// Each candidate is kept only if it lies at least `min_scene_length`
    /// after the previously kept boundary and at least `min_scene_length`
    /// before `duration`. Dropped candidates are absorbed by the earlier
    /// boundary.
    pub fn merge(&self, candidates: &[Duration], duration: Duration) -> Vec<Duration> {
        let min_length = self.options.min_scene_length;
        let mut kept: Vec<Duration> = Vec::new();
        let mut last = Duration::ZERO;

        for &candidate in candidates {
            if candidate <= last {
                continue;
            }
            if candidate - last < min_length {
                continue;
            }
            if duration.saturating_sub(candidate) < min_length || candidate >= duration {
                break;
            }
            kept.push(candidate);
            last = candidate;
        }

        kept
    }

    /// Interior scene boundaries for a timeline.
    pub fn boundaries(&self, diffs: &[FrameDiff], duration: Duration) -> Vec<Duration> {
        self.merge(&self.candidates(diffs), duration)
    }

    /// Contiguous scene windows for a timeline.
    ///
    /// Never empty for a non-zero `duration`: when no boundary survives, the
    /// single window `[0, duration)` is returned.
    pub fn detect(&self, diffs: &[FrameDiff], duration: Duration) -> Vec<SceneWindow> {
        let boundaries = self.boundaries(diffs, duration);
        if boundaries.is_empty() {
            log::debug!("No cuts detected, using a single scene");
        }
        windows_from_boundaries(&boundaries, duration)
    }
}
