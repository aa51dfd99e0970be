//! The segmentation driver.
//!
//! [`SceneSegmenter`] runs the whole pipeline for one video: sample frames at
//! a fixed cadence, score each sample against the previous one, decide scene
//! boundaries (adaptively or at fixed intervals), and render one thumbnail
//! per scene. Progress is reported through the configured
//! [`ProgressCallback`](crate::ProgressCallback) and the run stops at the
//! next sample or thumbnail once its [`CancellationToken`](crate::CancellationToken)
//! fires.
//!
//! # Example
//!
//! ```no_run
//! use scenecut::{SceneSegmenter, SegmentError, SegmentOptions, SegmentationMode};
//!
//! let segmenter = SceneSegmenter::new(SegmentOptions::new());
//! let result = segmenter.segment_file("input.mp4", SegmentationMode::Adaptive)?;
//!
//! for scene in &result.scenes {
//!     println!("scene {}: {:?} – {:?}", scene.id, scene.start_time, scene.end_time);
//! }
//! # Ok::<(), SegmentError>(())
//! ```

use std::path::Path;
use std::time::Duration;

use crate::configuration::{SegmentOptions, SegmentationMode};
use crate::detect::CutDetector;
use crate::error::SegmentError;
use crate::media::MediaSource;
use crate::progress::{ProgressTracker, SegmentationPhase};
use crate::scene::{FrameDiff, Scene, SceneWindow, SegmentationResult};
use crate::slicer::FixedSlicer;
use crate::source::FrameSource;
use crate::thumbnail::{Thumbnail, ThumbnailExtractor};

/// Timestamps sampled for a video: `0, interval, 2 × interval, …` while
/// strictly below `duration`.
///
/// A zero interval yields no samples.
pub fn sample_timestamps(duration: Duration, interval: Duration) -> Vec<Duration> {
    if interval.is_zero() {
        return Vec::new();
    }
    std::iter::successors(Some(Duration::ZERO), |previous| Some(*previous + interval))
        .take_while(|timestamp| *timestamp < duration)
        .collect()
}

/// Splits a video into scenes.
#[derive(Debug, Clone, Default)]
pub struct SceneSegmenter {
    options: SegmentOptions,
}

impl SceneSegmenter {
    /// Create a segmenter with the given configuration.
    pub fn new(options: SegmentOptions) -> Self {
        Self { options }
    }

    /// The configuration this segmenter runs with.
    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    /// Segment a video file.
    ///
    /// Opens a [`MediaSource`] limited to the configured decode size and runs
    /// [`segment`](SceneSegmenter::segment) on it. With the `rayon` feature
    /// the thumbnails are rendered by parallel workers, each with its own
    /// decoder.
    ///
    /// # Errors
    ///
    /// Any error from [`MediaSource::open`] or
    /// [`segment`](SceneSegmenter::segment).
    pub fn segment_file<P: AsRef<Path>>(
        &self,
        path: P,
        mode: SegmentationMode,
    ) -> Result<SegmentationResult, SegmentError> {
        let path = path.as_ref();
        log::info!("Segmenting {} ({mode})", path.display());

        let mut source =
            MediaSource::open(path)?.with_max_dimension(self.options.decode_max_dimension);

        #[cfg(feature = "rayon")]
        let result = self.segment_parallel(path, &mut source, mode);
        #[cfg(not(feature = "rayon"))]
        let result = self.segment(&mut source, mode);

        result
    }

    #[cfg(feature = "rayon")]
    fn segment_parallel(
        &self,
        path: &Path,
        source: &mut MediaSource,
        mode: SegmentationMode,
    ) -> Result<SegmentationResult, SegmentError> {
        let (diffs, windows, mut tracker) = self.analyse(source, mode)?;
        let thumbnails = if self.options.thumbnails_enabled && windows.len() > 1 {
            crate::parallel::extract_thumbnails(path, &windows, &self.options, &mut tracker)?
        } else {
            self.extract_thumbnails(source, &windows, &mut tracker)?
        };
        Ok(self.assemble(windows, thumbnails, diffs, mode, &mut tracker))
    }

    /// Segment the video behind any [`FrameSource`].
    ///
    /// # Errors
    ///
    /// - [`SegmentError::InvalidConfiguration`] for a zero sampling interval
    ///   or segment length.
    /// - [`SegmentError::Decode`] if the source reports a zero duration or a
    ///   sample cannot be decoded. No partial result is returned.
    /// - [`SegmentError::Cancelled`] if the cancellation token fires.
    ///
    /// Thumbnail failures are not errors: the affected scene is emitted with
    /// `thumbnail: None`.
    pub fn segment<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        mode: SegmentationMode,
    ) -> Result<SegmentationResult, SegmentError> {
        let (diffs, windows, mut tracker) = self.analyse(source, mode)?;
        let thumbnails = self.extract_thumbnails(source, &windows, &mut tracker)?;
        Ok(self.assemble(windows, thumbnails, diffs, mode, &mut tracker))
    }

    /// Scan the source and decide the scene windows.
    fn analyse<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        mode: SegmentationMode,
    ) -> Result<(Vec<FrameDiff>, Vec<SceneWindow>, ProgressTracker), SegmentError> {
        self.options.validate()?;
        mode.validate()?;

        let duration = source.duration();
        if duration.is_zero() {
            return Err(SegmentError::decode("video reports a zero duration"));
        }

        let mut tracker =
            ProgressTracker::new(self.options.progress.clone(), self.options.batch_size);

        let diffs = if mode.is_adaptive() || self.options.fixed_mode_diffs {
            self.scan(source, duration, &mut tracker)?
        } else {
            Vec::new()
        };

        let windows = match mode {
            SegmentationMode::Adaptive => {
                CutDetector::new(self.options.cut_detector).detect(&diffs, duration)
            }
            SegmentationMode::Fixed { segment_length } => FixedSlicer::new(segment_length)?
                .with_min_tail(self.options.min_tail)
                .slice(duration),
        };

        log::info!(
            "Found {} scene(s) in {:?} from {} diff sample(s)",
            windows.len(),
            duration,
            diffs.len()
        );

        Ok((diffs, windows, tracker))
    }

    /// Sample the source and build the diff timeline.
    fn scan<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        duration: Duration,
        tracker: &mut ProgressTracker,
    ) -> Result<Vec<FrameDiff>, SegmentError> {
        let timestamps = sample_timestamps(duration, self.options.sampling_interval);
        log::debug!(
            "Scanning {} sample(s) every {:?}",
            timestamps.len(),
            self.options.sampling_interval
        );

        tracker.begin(SegmentationPhase::Scanning, timestamps.len() as u64);

        let scorer = self.options.scorer;
        let mut diffs = Vec::with_capacity(timestamps.len().saturating_sub(1));
        let mut previous = None;
        let mut last_index = None;

        for timestamp in timestamps {
            if self.options.is_cancelled() {
                log::debug!("Scan cancelled at {:?}", timestamp);
                return Err(SegmentError::Cancelled);
            }

            let sample = source
                .frame_at(timestamp)
                .map_err(|error| error.at_position(timestamp, last_index))?;
            let signature = scorer.signature(&sample.pixels);

            if let Some(previous) = &previous {
                diffs.push(FrameDiff {
                    frame_index: sample.frame_index,
                    timestamp,
                    diff_score: scorer.compare(previous, &signature),
                });
            }

            previous = Some(signature);
            last_index = Some(sample.frame_index);
            tracker.advance(Some(timestamp));
        }

        Ok(diffs)
    }

    /// Render one thumbnail per window, sequentially.
    fn extract_thumbnails<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        windows: &[SceneWindow],
        tracker: &mut ProgressTracker,
    ) -> Result<Vec<Option<Thumbnail>>, SegmentError> {
        if !self.options.thumbnails_enabled {
            return Ok(vec![None; windows.len()]);
        }

        let extractor = ThumbnailExtractor::new(self.options.thumbnail);
        tracker.begin(SegmentationPhase::Thumbnails, windows.len() as u64);

        let mut thumbnails = Vec::with_capacity(windows.len());
        for window in windows {
            if self.options.is_cancelled() {
                return Err(SegmentError::Cancelled);
            }
            thumbnails.push(thumbnail_or_placeholder(
                extractor.extract(source, window),
            )?);
            tracker.advance(Some(ThumbnailExtractor::position(window)));
        }

        Ok(thumbnails)
    }

    fn assemble(
        &self,
        windows: Vec<SceneWindow>,
        thumbnails: Vec<Option<Thumbnail>>,
        diffs: Vec<FrameDiff>,
        mode: SegmentationMode,
        tracker: &mut ProgressTracker,
    ) -> SegmentationResult {
        let duration = windows.last().map(|window| window.end).unwrap_or_default();
        let scenes = windows
            .into_iter()
            .zip(thumbnails)
            .enumerate()
            .map(|(id, (window, thumbnail))| Scene {
                id: id as u32,
                start_time: window.start,
                end_time: window.end,
                thumbnail,
            })
            .collect();

        tracker.finish();

        SegmentationResult {
            scenes,
            diffs,
            duration,
            mode,
        }
    }
}

/// Turn a per-scene thumbnail failure into a placeholder.
///
/// Cancellation still aborts the run.
pub(crate) fn thumbnail_or_placeholder(
    result: Result<Thumbnail, SegmentError>,
) -> Result<Option<Thumbnail>, SegmentError> {
    match result {
        Ok(thumbnail) => Ok(Some(thumbnail)),
        Err(SegmentError::Cancelled) => Err(SegmentError::Cancelled),
        Err(error) => {
            log::warn!("{error}; emitting the scene without a thumbnail");
            Ok(None)
        }
    }
}
