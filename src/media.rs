//! FFmpeg-backed frame source.
//!
//! [`MediaSource`] opens a container with `ffmpeg-next`, picks the best video
//! stream, and serves [`FrameSource::frame_at`] requests by decoding forward
//! from the current position. It only seeks when a request lies behind the
//! current position or further ahead than [`SEEK_FORWARD_THRESHOLD`], which
//! keeps the segmenter's monotonic sampling pass close to a single linear
//! decode.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use scenecut::{FrameSource, MediaSource, SegmentError};
//!
//! let mut source = MediaSource::open("input.mp4")?.with_max_dimension(Some(640));
//! println!("{:?}", source.metadata());
//! let sample = source.frame_at(Duration::from_secs(3))?;
//! sample.pixels.save("three_seconds.png")?;
//! # Ok::<(), SegmentError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;
use tempfile::NamedTempFile;

use crate::error::SegmentError;
use crate::source::{FrameSample, FrameSource};
use crate::thumbnail::fit_dimensions;
use crate::utilities;

/// Requests further ahead than this are served by seeking instead of
/// decoding forward.
pub const SEEK_FORWARD_THRESHOLD: Duration = Duration::from_secs(2);

/// Requests this far past the container duration are still accepted, to
/// absorb duration rounding in container headers.
pub const DURATION_TOLERANCE: Duration = Duration::from_millis(50);

/// Properties of the decoded video stream.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Average frames per second (0.0 if the container does not say).
    pub frames_per_second: f64,
    /// Codec name (e.g. `"h264"`).
    pub codec: String,
    /// Duration of the video.
    pub duration: Duration,
}

/// A [`FrameSource`] that decodes with FFmpeg.
pub struct MediaSource {
    input: Input,
    decoder: VideoDecoder,
    scaler: Option<(ScalingContext, (Pixel, u32, u32))>,
    stream_index: usize,
    time_base: Rational,
    start_pts: i64,
    metadata: VideoMetadata,
    max_dimension: Option<u32>,
    /// The sample returned for `last_request`, reused for requests that it
    /// still answers.
    last_sample: Option<FrameSample>,
    last_request: Option<Duration>,
    /// Decoded but not yet converted frame preceding the current position.
    previous_frame: Option<(VideoFrame, Duration)>,
    drained: bool,
    /// Set once the decoder has handed out every frame after `drained`.
    exhausted: bool,
    path: PathBuf,
    /// Keeps the spill file of [`MediaSource::from_bytes`] alive.
    _spill: Option<NamedTempFile>,
}

impl Debug for MediaSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaSource")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("stream_index", &self.stream_index)
            .field("max_dimension", &self.max_dimension)
            .field("last_request", &self.last_request)
            .finish_non_exhaustive()
    }
}

impl MediaSource {
    /// Open a video file.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::FileOpen`] if the container cannot be read,
    /// [`SegmentError::NoVideoStream`] if it has no video, or
    /// [`SegmentError::Decode`] if the codec is unsupported.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SegmentError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening video: {}", path.display());

        ffmpeg_next::init().map_err(|error| SegmentError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| SegmentError::FileOpen {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        Self::from_input(input, path)
    }

    /// Open a video held in memory.
    ///
    /// The bytes are written to a temporary file that lives as long as the
    /// source.
    ///
    /// # Errors
    ///
    /// Same as [`open`](MediaSource::open), plus [`SegmentError::IoError`]
    /// if the temporary file cannot be written.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SegmentError> {
        let mut spill = tempfile::Builder::new().prefix("scenecut-").tempfile()?;
        spill.write_all(bytes)?;
        spill.flush()?;

        let mut source = Self::open(spill.path())?;
        source._spill = Some(spill);
        Ok(source)
    }

    /// Limit decoded frames to `max_dimension` on their longest edge.
    ///
    /// `None` (the default) keeps the source resolution.
    #[must_use]
    pub fn with_max_dimension(mut self, max_dimension: Option<u32>) -> Self {
        self.max_dimension = max_dimension.map(|value| value.max(1));
        self.scaler = None;
        self.last_sample = None;
        self.last_request = None;
        self
    }

    /// Properties of the decoded stream.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn from_input(input: Input, path: PathBuf) -> Result<Self, SegmentError> {
        let (stream_index, time_base, start_pts, stream_duration, frames_per_second, decoder) = {
            let stream = input
                .streams()
                .best(Type::Video)
                .ok_or(SegmentError::NoVideoStream)?;

            let frame_rate = stream.avg_frame_rate();
            let frames_per_second = if frame_rate.denominator() != 0 {
                f64::from(frame_rate.numerator()) / f64::from(frame_rate.denominator())
            } else {
                let rate = stream.rate();
                if rate.denominator() != 0 {
                    f64::from(rate.numerator()) / f64::from(rate.denominator())
                } else {
                    0.0
                }
            };

            let start_pts = match stream.start_time() {
                ffmpeg_sys_next::AV_NOPTS_VALUE => 0,
                start => start,
            };

            let decoder = CodecContext::from_parameters(stream.parameters())
                .and_then(|context| context.decoder().video())
                .map_err(|error| SegmentError::decode(format!("unsupported video codec: {error}")))?;

            (
                stream.index(),
                stream.time_base(),
                start_pts,
                stream.duration(),
                frames_per_second,
                decoder,
            )
        };

        let container_duration = input.duration();
        let duration = if container_duration > 0 {
            Duration::from_micros(container_duration as u64)
        } else if stream_duration > 0 {
            Duration::from_secs_f64(utilities::stream_timestamp_to_seconds(
                stream_duration,
                0,
                time_base,
            ))
        } else {
            Duration::ZERO
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            codec,
            duration,
        };

        log::debug!(
            "Video stream {}: {}x{} @ {:.3} fps [{}], duration {:?}",
            stream_index,
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.codec,
            metadata.duration,
        );

        Ok(Self {
            input,
            decoder,
            scaler: None,
            stream_index,
            time_base,
            start_pts,
            metadata,
            max_dimension: None,
            last_sample: None,
            last_request: None,
            previous_frame: None,
            drained: false,
            exhausted: false,
            path,
            _spill: None,
        })
    }

    /// Half a frame interval; a decoded frame this close before the target
    /// counts as "at" the target.
    fn frame_tolerance(&self) -> Duration {
        if self.metadata.frames_per_second > 0.0 {
            Duration::from_secs_f64(0.5 / self.metadata.frames_per_second)
        } else {
            Duration::from_millis(1)
        }
    }

    fn seek(&mut self, timestamp: Duration) -> Result<(), SegmentError> {
        log::debug!("Seeking to {:?}", timestamp);
        let target = utilities::duration_to_seek_timestamp(timestamp);
        self.input.seek(target, ..target)?;
        self.decoder.flush();
        self.last_sample = None;
        self.previous_frame = None;
        self.drained = false;
        self.exhausted = false;
        Ok(())
    }

    fn frame_timestamp(&self, frame: &VideoFrame) -> Duration {
        let pts = frame.timestamp().or_else(|| frame.pts()).unwrap_or(self.start_pts);
        let seconds = utilities::stream_timestamp_to_seconds(pts, self.start_pts, self.time_base);
        Duration::from_secs_f64(seconds.max(0.0))
    }

    fn convert(&mut self, frame: &VideoFrame, timestamp: Duration) -> Result<FrameSample, SegmentError> {
        let key = (frame.format(), frame.width(), frame.height());
        let (output_width, output_height) = match self.max_dimension {
            Some(max_dimension) => fit_dimensions(frame.width(), frame.height(), max_dimension),
            None => (frame.width(), frame.height()),
        };

        if self.scaler.as_ref().is_none_or(|(_, current)| *current != key) {
            let scaler = ScalingContext::get(
                frame.format(),
                frame.width(),
                frame.height(),
                Pixel::RGB24,
                output_width,
                output_height,
                ScalingFlags::BILINEAR,
            )?;
            self.scaler = Some((scaler, key));
        }

        let mut rgb_frame = VideoFrame::empty();
        if let Some((scaler, _)) = self.scaler.as_mut() {
            scaler.run(frame, &mut rgb_frame)?;
        }

        let buffer = utilities::frame_to_rgb_buffer(&rgb_frame, output_width, output_height);
        let pixels = RgbImage::from_raw(output_width, output_height, buffer).ok_or_else(|| {
            SegmentError::decode("Failed to construct RGB image from decoded frame data")
        })?;

        Ok(FrameSample {
            frame_index: utilities::seconds_to_frame_index(
                timestamp.as_secs_f64(),
                self.metadata.frames_per_second,
            ),
            timestamp,
            pixels,
        })
    }

    /// The last frame the stream produced, reusing its converted sample when
    /// one is cached.
    fn last_frame(&mut self, timestamp: Duration) -> Result<FrameSample, SegmentError> {
        let (frame, frame_timestamp) = self.previous_frame.take().ok_or_else(|| {
            SegmentError::decode(format!("no frame decoded at or before {timestamp:?}"))
        })?;
        let cached = self
            .last_sample
            .as_ref()
            .filter(|sample| sample.timestamp == frame_timestamp)
            .cloned();
        let sample = match cached {
            Some(sample) => Ok(sample),
            None => self.convert(&frame, frame_timestamp),
        };
        self.previous_frame = Some((frame, frame_timestamp));
        sample
    }

    /// Decode forward until a frame at or after `target` appears.
    ///
    /// Returns `None` when the stream ends first; the last decoded frame is
    /// then left in `previous_frame`.
    fn decode_until(&mut self, target: Duration) -> Result<Option<FrameSample>, SegmentError> {
        let tolerance = self.frame_tolerance();
        let mut packet = Packet::empty();
        let mut decoded = VideoFrame::empty();

        loop {
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let timestamp = self.frame_timestamp(&decoded);
                if timestamp + tolerance >= target {
                    let sample = self.convert(&decoded, timestamp)?;
                    self.previous_frame = Some((decoded, timestamp));
                    return Ok(Some(sample));
                }
                let spare = match self.previous_frame.take() {
                    Some((frame, _)) => frame,
                    None => VideoFrame::empty(),
                };
                self.previous_frame = Some((std::mem::replace(&mut decoded, spare), timestamp));
            }

            if self.drained {
                self.exhausted = true;
                return Ok(None);
            }

            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() != self.stream_index {
                        continue;
                    }
                    self.decoder
                        .send_packet(&packet)
                        .map_err(|error| SegmentError::decode(error.to_string()))?;
                }
                Err(FfmpegError::Eof) => {
                    // Ignore the result: an already-flushed decoder reports EOF again.
                    let _ = self.decoder.send_eof();
                    self.drained = true;
                }
                Err(error) => return Err(SegmentError::decode(error.to_string())),
            }
        }
    }
}

/// How [`MediaSource::frame_at`] serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestPlan {
    /// Keep decoding from the current position.
    DecodeForward,
    /// Seek to the nearest keyframe first.
    Seek,
    /// The stream has ended at or before the request; answer with its last
    /// frame.
    LastFrame,
}

/// Decide how to serve a request for `timestamp`, given the previous request,
/// the timestamp of the last decoded frame, and whether the decoder has
/// returned its final frame.
///
/// Once the decoder is exhausted, any request at or after the last frame is
/// answered with that frame without seeking. Containers whose duration runs
/// past the last video frame hit this for every sample in the tail.
fn plan_request(
    timestamp: Duration,
    last_request: Option<Duration>,
    position: Option<Duration>,
    exhausted: bool,
) -> RequestPlan {
    if exhausted && position.is_some_and(|position| timestamp >= position) {
        return RequestPlan::LastFrame;
    }

    let moving_backward = last_request.is_some_and(|last| timestamp < last);
    let position = position.unwrap_or(Duration::ZERO);
    if moving_backward || timestamp > position + SEEK_FORWARD_THRESHOLD {
        RequestPlan::Seek
    } else {
        RequestPlan::DecodeForward
    }
}

impl FrameSource for MediaSource {
    fn duration(&self) -> Duration {
        self.metadata.duration
    }

    fn frame_at(&mut self, timestamp: Duration) -> Result<FrameSample, SegmentError> {
        let duration = self.metadata.duration;
        if timestamp > duration + DURATION_TOLERANCE {
            return Err(SegmentError::Seek {
                timestamp,
                duration,
            });
        }

        let moving_backward = self.last_request.is_some_and(|last| timestamp < last);
        if !moving_backward && let Some(sample) = &self.last_sample {
            if sample.timestamp + self.frame_tolerance() >= timestamp {
                self.last_request = Some(timestamp);
                return Ok(sample.clone());
            }
        }

        let position = self.previous_frame.as_ref().map(|(_, position)| *position);
        let sample = match plan_request(timestamp, self.last_request, position, self.exhausted) {
            RequestPlan::LastFrame => self.last_frame(timestamp)?,
            plan => {
                if plan == RequestPlan::Seek {
                    self.seek(timestamp)?;
                }
                match self.decode_until(timestamp)? {
                    Some(sample) => sample,
                    // Past the last frame but inside the duration.
                    None => self.last_frame(timestamp)?,
                }
            }
        };

        self.last_request = Some(timestamp);
        self.last_sample = Some(sample.clone());
        Ok(sample)
    }
}
