//! Async segmentation.
//!
//! [`segment_file_async`] runs a segmentation on a blocking thread via
//! `tokio::task::spawn_blocking` and hands back two halves: a
//! [`SegmentationFuture`] that resolves to the result, and a
//! [`ProgressStream`] of progress snapshots. Decoding never runs on the
//! async runtime's worker threads.
//!
//! Progress travels through a `watch` channel, so a consumer that polls
//! slowly sees the latest snapshot rather than every one, and the decode
//! thread never waits on it. The final `100.0` snapshot is always observed
//! by a consumer that keeps polling until the stream ends.
//!
//! # Example
//!
//! ```no_run
//! use tokio_stream::StreamExt;
//!
//! use scenecut::{SegmentError, SegmentOptions, SegmentationMode, segment_file_async};
//!
//! # async fn example() -> Result<(), SegmentError> {
//! let (future, mut progress) =
//!     segment_file_async("input.mp4", SegmentationMode::Adaptive, SegmentOptions::new());
//!
//! let watcher = tokio::spawn(async move {
//!     while let Some(info) = progress.next().await {
//!         println!("{:.1}%", info.percentage);
//!     }
//! });
//!
//! let result = future.await?;
//! watcher.await.ok();
//! println!("{} scenes", result.scenes.len());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::watch::{self, Sender};
use tokio::task::JoinHandle;
use tokio_stream::Stream;
use tokio_stream::wrappers::WatchStream;

use crate::configuration::{SegmentOptions, SegmentationMode};
use crate::error::SegmentError;
use crate::progress::{CancellationToken, ProgressCallback, ProgressInfo};
use crate::scene::SegmentationResult;
use crate::segmenter::SceneSegmenter;

/// A stream of progress snapshots from a background segmentation.
///
/// Implements [`tokio_stream::Stream`]. The stream ends once the
/// background run has finished, successfully or not.
pub struct ProgressStream {
    inner: WatchStream<Option<ProgressInfo>>,
}

impl Stream for ProgressStream {
    type Item = ProgressInfo;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Some(info))) => return Poll::Ready(Some(info)),
                // The initial value, before anything was reported.
                Poll::Ready(Some(None)) => continue,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// A future that resolves to the result of a background segmentation.
///
/// Dropping the future does not stop the background thread; call
/// [`cancel`](SegmentationFuture::cancel) first.
pub struct SegmentationFuture {
    handle: JoinHandle<Result<SegmentationResult, SegmentError>>,
    cancellation: CancellationToken,
}

impl SegmentationFuture {
    /// Ask the background run to stop. The future then resolves to
    /// [`SegmentError::Cancelled`].
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }
}

impl Future for SegmentationFuture {
    type Output = Result<SegmentationResult, SegmentError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|result| result.unwrap_or_else(|_| Err(SegmentError::Cancelled)))
    }
}

/// Forwards every report to the channel and to the caller's own callback.
struct ChannelProgress {
    sender: Sender<Option<ProgressInfo>>,
    inner: Arc<dyn ProgressCallback>,
}

impl ProgressCallback for ChannelProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.sender.send_replace(Some(info.clone()));
        self.inner.on_progress(info);
    }
}

/// Segment a video file on a blocking thread.
///
/// Must be called from within a Tokio runtime. Any progress callback or
/// cancellation token already set on `options` keeps working; the returned
/// future's [`cancel`](SegmentationFuture::cancel) shares the same token.
pub fn segment_file_async<P: Into<PathBuf>>(
    path: P,
    mode: SegmentationMode,
    options: SegmentOptions,
) -> (SegmentationFuture, ProgressStream) {
    let path = path.into();
    let (sender, receiver) = watch::channel(None);

    let cancellation = options.cancellation.clone().unwrap_or_default();
    let callback = ChannelProgress {
        sender,
        inner: options.progress.clone(),
    };
    let options = options
        .with_progress(Arc::new(callback))
        .with_cancellation(cancellation.clone());

    let handle = tokio::task::spawn_blocking(move || {
        SceneSegmenter::new(options).segment_file(&path, mode)
    });

    (
        SegmentationFuture {
            handle,
            cancellation,
        },
        ProgressStream {
            inner: WatchStream::new(receiver),
        },
    )
}
