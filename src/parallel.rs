//! Parallel thumbnail extraction.
//!
//! Splits the scene windows into contiguous chunks and renders each chunk on
//! a [`rayon`] worker. Each worker opens its own demuxer and decoder, so
//! there is no shared mutable decoder state; only the progress tracker is
//! shared, behind a mutex.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use ::rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::configuration::SegmentOptions;
use crate::error::SegmentError;
use crate::media::MediaSource;
use crate::progress::{ProgressTracker, SegmentationPhase};
use crate::scene::SceneWindow;
use crate::segmenter::thumbnail_or_placeholder;
use crate::thumbnail::{Thumbnail, ThumbnailExtractor};

/// Render one thumbnail per window using the rayon thread pool.
///
/// The result is in window order. A worker that cannot open the file marks
/// its whole chunk as missing thumbnails; cancellation aborts the run.
pub(crate) fn extract_thumbnails(
    file_path: &Path,
    windows: &[SceneWindow],
    options: &SegmentOptions,
    tracker: &mut ProgressTracker,
) -> Result<Vec<Option<Thumbnail>>, SegmentError> {
    if windows.is_empty() {
        return Ok(Vec::new());
    }

    tracker.begin(SegmentationPhase::Thumbnails, windows.len() as u64);

    let chunks = split_into_chunks(windows.len(), ::rayon::current_num_threads());
    let extractor = ThumbnailExtractor::new(options.thumbnail);
    let tracker = Mutex::new(tracker);

    log::debug!(
        "Extracting {} thumbnail(s) on {} worker(s)",
        windows.len(),
        chunks.len()
    );

    let results: Result<Vec<Vec<(usize, Option<Thumbnail>)>>, SegmentError> = chunks
        .into_par_iter()
        .map(|(start, end)| {
            let mut source = match MediaSource::open(file_path) {
                Ok(source) => source.with_max_dimension(options.decode_max_dimension),
                Err(error) => {
                    log::warn!("Thumbnail worker could not open the video: {error}");
                    return Ok((start..end).map(|index| (index, None)).collect::<Vec<_>>());
                }
            };

            let mut rendered = Vec::with_capacity(end - start);
            for (index, window) in windows.iter().enumerate().take(end).skip(start) {
                if options.is_cancelled() {
                    return Err(SegmentError::Cancelled);
                }
                let thumbnail = thumbnail_or_placeholder(extractor.extract(&mut source, window))?;
                rendered.push((index, thumbnail));

                tracker
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .advance(Some(ThumbnailExtractor::position(window)));
            }
            Ok(rendered)
        })
        .collect();

    let mut thumbnails: Vec<(usize, Option<Thumbnail>)> = results?.into_iter().flatten().collect();
    thumbnails.sort_by_key(|(index, _)| *index);
    Ok(thumbnails.into_iter().map(|(_, thumbnail)| thumbnail).collect())
}

/// Split `0..count` into at most `workers` contiguous, near-equal ranges.
fn split_into_chunks(count: usize, workers: usize) -> Vec<(usize, usize)> {
    let workers = workers.clamp(1, count.max(1));
    let chunk_size = count.div_ceil(workers);
    (0..count)
        .step_by(chunk_size.max(1))
        .map(|start| (start, (start + chunk_size).min(count)))
        .collect()
}
