//! Shared helpers for integration tests.
//!
//! [`SyntheticSource`] is an in-memory [`FrameSource`]: solid-colour frames
//! whose colour changes at configured cut times. It records every request
//! and can be told to fail or to cancel a token partway through a run.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::{Rgb, RgbImage};
use scenecut::{
    CancellationToken, FrameSample, FrameSource, ProgressCallback, ProgressInfo, SegmentError,
};

pub const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";
/// Video stream ends at 4 s, audio (and the container) at 8 s.
pub const AUDIO_TAIL_VIDEO: &str = "tests/fixtures/audio_tail.mp4";

/// High-contrast colours; every neighbouring pair scores well above the
/// default detection margin.
pub const PALETTE: [[u8; 3]; 6] = [
    [0, 0, 0],
    [255, 255, 255],
    [255, 0, 0],
    [0, 0, 255],
    [0, 255, 0],
    [255, 255, 0],
];

pub fn secs(value: f64) -> Duration {
    Duration::from_secs_f64(value)
}

pub struct SyntheticSource {
    duration: Duration,
    cuts: Vec<Duration>,
    frames_per_second: f64,
    width: u32,
    height: u32,
    failing_from: Option<Duration>,
    failing_at: Vec<Duration>,
    cancel_after: Option<(usize, CancellationToken)>,
    pub requests: Vec<Duration>,
}

impl SyntheticSource {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            cuts: Vec::new(),
            frames_per_second: 30.0,
            width: 64,
            height: 36,
            failing_from: None,
            failing_at: Vec::new(),
            cancel_after: None,
            requests: Vec::new(),
        }
    }

    /// Change colour at each of these times (seconds).
    pub fn with_cuts(mut self, cuts: &[f64]) -> Self {
        self.cuts = cuts.iter().map(|&cut| secs(cut)).collect();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Every request at or after `timestamp` fails with a decode error.
    pub fn failing_from(mut self, timestamp: Duration) -> Self {
        self.failing_from = Some(timestamp);
        self
    }

    /// Requests for exactly `timestamp` fail with a decode error.
    pub fn failing_at(mut self, timestamp: Duration) -> Self {
        self.failing_at.push(timestamp);
        self
    }

    /// Cancel `token` once `requests` frames have been served.
    pub fn cancel_after(mut self, requests: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((requests, token));
        self
    }

    pub fn color_at(&self, timestamp: Duration) -> [u8; 3] {
        let scene = self.cuts.iter().filter(|&&cut| cut <= timestamp).count();
        PALETTE[scene % PALETTE.len()]
    }
}

impl FrameSource for SyntheticSource {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn frame_at(&mut self, timestamp: Duration) -> Result<FrameSample, SegmentError> {
        self.requests.push(timestamp);

        if timestamp > self.duration {
            return Err(SegmentError::Seek {
                timestamp,
                duration: self.duration,
            });
        }
        if self.failing_from.is_some_and(|from| timestamp >= from)
            || self.failing_at.contains(&timestamp)
        {
            return Err(SegmentError::Decode {
                timestamp: None,
                frame_index: None,
                reason: "corrupt packet".to_string(),
            });
        }

        if let Some((after, token)) = &self.cancel_after {
            if self.requests.len() >= *after {
                token.cancel();
            }
        }

        Ok(FrameSample {
            frame_index: (timestamp.as_secs_f64() * self.frames_per_second).round() as u64,
            timestamp,
            pixels: RgbImage::from_pixel(self.width, self.height, Rgb(self.color_at(timestamp))),
        })
    }
}

/// Records every progress report.
#[derive(Default)]
pub struct RecordingProgress {
    pub infos: Mutex<Vec<ProgressInfo>>,
}

impl RecordingProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn percentages(&self) -> Vec<f32> {
        self.infos
            .lock()
            .unwrap()
            .iter()
            .map(|info| info.percentage)
            .collect()
    }
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().unwrap().push(info.clone());
    }
}

/// Assert the structural invariants every scene list must satisfy.
pub fn assert_contiguous(scenes: &[scenecut::Scene], duration: Duration) {
    assert!(!scenes.is_empty(), "scene list must not be empty");
    assert_eq!(scenes[0].start_time, Duration::ZERO);
    assert_eq!(scenes[scenes.len() - 1].end_time, duration);

    for (position, scene) in scenes.iter().enumerate() {
        assert_eq!(scene.id as usize, position, "ids are sequential from 0");
        assert!(scene.start_time < scene.end_time, "scene {position} is empty");
    }
    for pair in scenes.windows(2) {
        assert_eq!(pair[0].end_time, pair[1].start_time, "gap or overlap");
    }
}
