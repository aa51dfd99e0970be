//! Segmentation output types.
//!
//! A run produces a [`SegmentationResult`]: the ordered [`Scene`] list and the
//! [`FrameDiff`] timeline it was derived from. Both are plain owned data; the
//! segmenter keeps no reference to them after returning.

use std::time::Duration;

use serde_json::{Value, json};

use crate::configuration::SegmentationMode;
use crate::thumbnail::Thumbnail;

/// Visual difference between one sampled frame and the sample before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDiff {
    /// Index of the decoded frame that was sampled.
    pub frame_index: u64,
    /// Sampling timestamp. Strictly increasing along a timeline.
    pub timestamp: Duration,
    /// Dissimilarity from the previous sample, 0.0 – 100.0.
    pub diff_score: f64,
}

/// A half-open time window `[start, end)` produced by a boundary decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneWindow {
    /// Inclusive start.
    pub start: Duration,
    /// Exclusive end.
    pub end: Duration,
}

impl SceneWindow {
    /// Length of the window.
    pub fn length(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }

    /// Midpoint of the window, the default thumbnail position.
    pub fn midpoint(&self) -> Duration {
        self.start + self.length() / 2
    }
}

/// Build contiguous windows from sorted interior boundaries.
///
/// Boundaries at or before zero, at or after `duration`, or not strictly
/// after the previous boundary are ignored, so the result always covers
/// `[0, duration)` without gaps or overlaps. A zero `duration` yields no
/// windows.
pub fn windows_from_boundaries(boundaries: &[Duration], duration: Duration) -> Vec<SceneWindow> {
    let mut windows = Vec::with_capacity(boundaries.len() + 1);
    let mut start = Duration::ZERO;

    for &boundary in boundaries {
        if boundary <= start || boundary >= duration {
            continue;
        }
        windows.push(SceneWindow {
            start,
            end: boundary,
        });
        start = boundary;
    }

    if duration > start {
        windows.push(SceneWindow {
            start,
            end: duration,
        });
    }

    windows
}

/// One scene of the segmented video.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Sequential id, starting at 0 in output order.
    pub id: u32,
    /// Inclusive start time.
    pub start_time: Duration,
    /// Exclusive end time.
    pub end_time: Duration,
    /// Representative frame, or `None` when extraction failed for this scene.
    pub thumbnail: Option<Thumbnail>,
}

impl Scene {
    /// Length of the scene.
    pub fn length(&self) -> Duration {
        self.end_time.saturating_sub(self.start_time)
    }

    /// The thumbnail as a `data:` URI, if one was produced.
    pub fn thumbnail_data_url(&self) -> Option<String> {
        self.thumbnail.as_ref().map(Thumbnail::data_url)
    }
}

/// The complete output of one segmentation run.
#[derive(Debug, Clone)]
pub struct SegmentationResult {
    /// Scenes ordered by id and start time, covering `[0, duration)`.
    pub scenes: Vec<Scene>,
    /// The diff timeline, ordered by timestamp.
    pub diffs: Vec<FrameDiff>,
    /// Duration of the segmented video.
    pub duration: Duration,
    /// Mode the boundaries were decided with.
    pub mode: SegmentationMode,
}

impl SegmentationResult {
    /// Render the machine-readable form consumed by downstream analysis.
    ///
    /// Times are in seconds. Scenes without a thumbnail carry
    /// `"thumbnailDataUrl": null`.
    pub fn to_json(&self) -> Value {
        json!({
            "durationSeconds": self.duration.as_secs_f64(),
            "mode": self.mode.to_string(),
            "scenes": self.scenes.iter().map(|scene| json!({
                "id": scene.id,
                "startTime": scene.start_time.as_secs_f64(),
                "endTime": scene.end_time.as_secs_f64(),
                "thumbnailDataUrl": scene.thumbnail_data_url(),
            })).collect::<Vec<_>>(),
            "diffs": self.diffs.iter().map(|diff| json!({
                "frameIndex": diff.frame_index,
                "timestamp": diff.timestamp.as_secs_f64(),
                "diffScore": diff.diff_score,
            })).collect::<Vec<_>>(),
        })
    }

    /// Scenes whose thumbnail could not be produced.
    pub fn scenes_missing_thumbnails(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter().filter(|scene| scene.thumbnail.is_none())
    }
}
