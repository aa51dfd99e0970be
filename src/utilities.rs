//! Internal utility functions.
//!
//! Helpers for pixel-data copying and timestamp conversion shared by the
//! FFmpeg-backed source.

use std::time::Duration;

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy pixel data from an FFmpeg RGB24 frame into a tightly-packed buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3).
/// This strips that padding so the result can be passed directly to
/// [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// Rescale a stream timestamp to seconds, relative to the stream start.
pub(crate) fn stream_timestamp_to_seconds(pts: i64, start: i64, time_base: Rational) -> f64 {
    (pts - start) as f64 * f64::from(time_base.numerator()) / f64::from(time_base.denominator())
}

/// Convert a [`Duration`] to a seek timestamp in `AV_TIME_BASE` units.
///
/// `input.seek()` (via `avformat_seek_file` with `stream_index = -1`)
/// expects container-level timestamps, not stream time base.
pub(crate) fn duration_to_seek_timestamp(duration: Duration) -> i64 {
    (duration.as_secs_f64() * f64::from(ffmpeg_sys_next::AV_TIME_BASE)) as i64
}

/// Nearest frame index for a timestamp at a constant frame rate.
pub(crate) fn seconds_to_frame_index(seconds: f64, frames_per_second: f64) -> u64 {
    if frames_per_second <= 0.0 {
        return 0;
    }
    (seconds.max(0.0) * frames_per_second).round() as u64
}
