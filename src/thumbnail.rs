//! Scene thumbnail extraction.
//!
//! A thumbnail is the frame at the midpoint of a scene window, scaled to fit
//! a maximum edge length and JPEG-encoded. The encoded bytes travel inside a
//! [`Thumbnail`], which can render itself as a self-contained `data:` URI for
//! consumers that expect one.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, codecs::jpeg::JpegEncoder, imageops::FilterType};

use crate::error::SegmentError;
use crate::scene::SceneWindow;
use crate::source::FrameSource;

/// Default longest edge of a thumbnail, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 320;
/// Default JPEG quality (1 – 100).
pub const DEFAULT_QUALITY: u8 = 75;

/// An encoded thumbnail image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// MIME type of `data`.
    pub mime_type: &'static str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoded image bytes.
    pub data: Vec<u8>,
}

impl Thumbnail {
    /// Encode the thumbnail as `data:<mime>;base64,<payload>`.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }

    /// Decode the thumbnail back into pixels.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::ImageError`] if the bytes are not a valid
    /// image of the recorded type.
    pub fn decode(&self) -> Result<DynamicImage, SegmentError> {
        let format = ImageFormat::from_mime_type(self.mime_type).unwrap_or(ImageFormat::Jpeg);
        Ok(image::load_from_memory_with_format(&self.data, format)?)
    }
}

/// Thumbnail size and encoding settings.
///
/// # Example
///
/// ```
/// use scenecut::ThumbnailOptions;
///
/// let options = ThumbnailOptions::new().with_max_dimension(480).with_quality(85);
/// assert_eq!(options.max_dimension, 480);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ThumbnailOptions {
    /// Longest edge of the encoded image. Aspect ratio is preserved.
    pub max_dimension: u32,
    /// JPEG quality, 1 – 100.
    pub quality: u8,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl ThumbnailOptions {
    /// Create options with the defaults (320 px, quality 75).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the longest edge. Clamped to at least 1.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }

    /// Set the JPEG quality. Clamped to `1 – 100`.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }
}

/// Renders one representative frame per scene window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailExtractor {
    options: ThumbnailOptions,
}

impl ThumbnailExtractor {
    /// Create an extractor with the given settings.
    pub fn new(options: ThumbnailOptions) -> Self {
        Self { options }
    }

    /// The timestamp a window's thumbnail is taken from: its midpoint,
    /// clamped to `[start, end)`.
    pub fn position(window: &SceneWindow) -> Duration {
        let midpoint = window.midpoint();
        if midpoint >= window.end {
            window.start
        } else {
            midpoint.max(window.start)
        }
    }

    /// Decode and encode the thumbnail for `window`.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::Thumbnail`] if the frame cannot be decoded or
    /// encoded. Cancellation is passed through unchanged.
    pub fn extract<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        window: &SceneWindow,
    ) -> Result<Thumbnail, SegmentError> {
        let timestamp = Self::position(window);
        log::debug!(
            "Generating thumbnail at {:?} (max_dim={})",
            timestamp,
            self.options.max_dimension
        );

        let sample = source.frame_at(timestamp).map_err(|error| match error {
            SegmentError::Cancelled => SegmentError::Cancelled,
            other => SegmentError::Thumbnail {
                timestamp,
                reason: other.to_string(),
            },
        })?;

        self.encode(DynamicImage::ImageRgb8(sample.pixels))
            .map_err(|error| SegmentError::Thumbnail {
                timestamp,
                reason: error.to_string(),
            })
    }

    /// Scale and JPEG-encode an already decoded frame.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::Decode`] for an empty frame and
    /// [`SegmentError::ImageError`] if encoding fails.
    pub fn encode(&self, image: DynamicImage) -> Result<Thumbnail, SegmentError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SegmentError::decode("decoded frame is empty"));
        }
        let (width, height) =
            fit_dimensions(image.width(), image.height(), self.options.max_dimension);
        let scaled = if (width, height) == (image.width(), image.height()) {
            image
        } else {
            image.resize_exact(width, height, FilterType::Triangle)
        };

        let mut data = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut data, self.options.quality);
        scaled.to_rgb8().write_with_encoder(encoder)?;

        Ok(Thumbnail {
            mime_type: "image/jpeg",
            width,
            height,
            data,
        })
    }
}

/// Compute dimensions that fit within `max_dimension` preserving aspect ratio.
///
/// Frames already inside the bound keep their size.
pub(crate) fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width.max(height) <= max_dimension {
        return (width, height);
    }
    let scale = max_dimension as f64 / width.max(height) as f64;
    let new_width = ((width as f64) * scale).round() as u32;
    let new_height = ((height as f64) * scale).round() as u32;
    (new_width.max(1), new_height.max(1))
}
