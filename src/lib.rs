//! # scenecut
//!
//! Split a video into scenes, either adaptively at visual cuts or at fixed
//! intervals, and render a thumbnail for each one.
//!
//! `scenecut` samples frames at a regular cadence, scores each sample against
//! the previous one on a coarse RGB grid, and turns the resulting diff
//! timeline into contiguous scene windows. Decoding is powered by FFmpeg via
//! the [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate, but the
//! pipeline only needs a [`FrameSource`], so any decoder can be plugged in.
//!
//! ## Quick Start
//!
//! ### Adaptive segmentation
//!
//! ```no_run
//! use scenecut::{SceneSegmenter, SegmentOptions, SegmentationMode};
//!
//! let segmenter = SceneSegmenter::new(SegmentOptions::new());
//! let result = segmenter
//!     .segment_file("input.mp4", SegmentationMode::Adaptive)
//!     .unwrap();
//!
//! for scene in &result.scenes {
//!     println!("{}: {:?} – {:?}", scene.id, scene.start_time, scene.end_time);
//! }
//! ```
//!
//! ### Fixed-length slices
//!
//! ```no_run
//! use scenecut::{SceneSegmenter, SegmentOptions, SegmentationMode};
//!
//! let result = SceneSegmenter::new(SegmentOptions::new())
//!     .segment_file("input.mp4", SegmentationMode::fixed_secs(8))
//!     .unwrap();
//! println!("{}", result.to_json());
//! ```
//!
//! ### Just the boundaries
//!
//! ```
//! use std::time::Duration;
//!
//! use scenecut::{CutDetector, CutDetectorOptions, FrameDiff};
//!
//! let diffs: Vec<FrameDiff> = (1..20u64)
//!     .map(|i| FrameDiff {
//!         frame_index: i * 15,
//!         timestamp: Duration::from_millis(i * 500),
//!         diff_score: if i == 10 { 80.0 } else { 1.0 },
//!     })
//!     .collect();
//!
//! let windows = CutDetector::new(CutDetectorOptions::new())
//!     .detect(&diffs, Duration::from_secs(10));
//! assert_eq!(windows.len(), 2);
//! ```
//!
//! ## Features
//!
//! - **Adaptive cut detection**: median baseline with a multiplier and
//!   margin, merged to a minimum scene length
//! - **Fixed-length slicing**: with short-tail absorption
//! - **Diff timeline**: per-sample scores for downstream analysis
//! - **Thumbnails**: midpoint JPEGs, available as `data:` URIs
//! - **Progress & cancellation**: strictly increasing percentages, polled
//!   handles, and a cooperative `CancellationToken`
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `async` | `segment_file_async` with a progress stream via Tokio |
//! | `rayon` | Thumbnails rendered on rayon workers, one decoder each |
//! | `full` | Enables all of the above |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod configuration;
pub mod detect;
pub mod diff;
pub mod error;
pub mod ffmpeg;
pub mod media;
#[cfg(feature = "rayon")]
mod parallel;
pub mod progress;
pub mod scene;
pub mod segmenter;
pub mod slicer;
pub mod source;
#[cfg(feature = "async")]
pub mod stream;
pub mod thumbnail;
mod utilities;

pub use configuration::{SegmentOptions, SegmentationMode};
pub use detect::{CutDetector, CutDetectorOptions};
pub use diff::{DiffScorer, FrameSignature};
pub use error::SegmentError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use media::{MediaSource, VideoMetadata};
pub use progress::{
    CancellationToken, ProgressCallback, ProgressHandle, ProgressInfo, SegmentationPhase,
};
pub use scene::{FrameDiff, Scene, SceneWindow, SegmentationResult};
pub use segmenter::SceneSegmenter;
pub use slicer::FixedSlicer;
pub use source::{FrameSample, FrameSource};
#[cfg(feature = "async")]
pub use stream::{ProgressStream, SegmentationFuture, segment_file_async};
pub use thumbnail::{Thumbnail, ThumbnailExtractor, ThumbnailOptions};
