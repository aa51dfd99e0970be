//! Frame-to-frame visual difference scoring.
//!
//! Frames are reduced to a small fixed RGB grid before comparison, which
//! makes the score independent of the source resolution and keeps the cost
//! per comparison constant. The score is the mean absolute per-channel
//! difference across grid cells, scaled to `0.0 – 100.0`.
//!
//! # Example
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use scenecut::DiffScorer;
//!
//! let scorer = DiffScorer::default();
//! let black = RgbImage::from_pixel(64, 36, Rgb([0, 0, 0]));
//! let white = RgbImage::from_pixel(1920, 1080, Rgb([255, 255, 255]));
//!
//! assert_eq!(scorer.score(&black, &black), 0.0);
//! assert!((scorer.score(&black, &white) - 100.0).abs() < 1e-9);
//! ```

use image::{RgbImage, imageops::FilterType};

/// Default number of grid columns.
pub const DEFAULT_GRID_WIDTH: u32 = 16;
/// Default number of grid rows.
pub const DEFAULT_GRID_HEIGHT: u32 = 9;

/// A frame reduced to the scorer's grid.
///
/// The segmenter keeps only the previous sample's signature between
/// iterations, not its full pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSignature {
    cells: Vec<u8>,
}

impl FrameSignature {
    /// Raw RGB cell values, row-major.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

/// Scores visual dissimilarity between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffScorer {
    grid_width: u32,
    grid_height: u32,
}

impl Default for DiffScorer {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
        }
    }
}

impl DiffScorer {
    /// Create a scorer with a custom grid. Each dimension is clamped to at
    /// least 1.
    pub fn new(grid_width: u32, grid_height: u32) -> Self {
        Self {
            grid_width: grid_width.max(1),
            grid_height: grid_height.max(1),
        }
    }

    /// Grid dimensions as `(columns, rows)`.
    pub fn grid(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    /// Reduce a frame to the grid.
    pub fn signature(&self, image: &RgbImage) -> FrameSignature {
        if image.width() == 0 || image.height() == 0 {
            let cell_count = (self.grid_width * self.grid_height * 3) as usize;
            return FrameSignature {
                cells: vec![0; cell_count],
            };
        }

        let reduced = if image.width() >= self.grid_width && image.height() >= self.grid_height {
            // Box-averages source pixels into each cell.
            image::imageops::thumbnail(image, self.grid_width, self.grid_height)
        } else {
            image::imageops::resize(
                image,
                self.grid_width,
                self.grid_height,
                FilterType::Nearest,
            )
        };

        FrameSignature {
            cells: reduced.into_raw(),
        }
    }

    /// Compare two signatures produced by this scorer.
    ///
    /// Returns `0.0` for identical grids and `100.0` for maximally different
    /// ones (every channel of every cell flipped between 0 and 255).
    pub fn compare(&self, previous: &FrameSignature, current: &FrameSignature) -> f64 {
        let cell_count = previous.cells.len().min(current.cells.len());
        if cell_count == 0 {
            return 0.0;
        }

        let total: u64 = previous
            .cells
            .iter()
            .zip(&current.cells)
            .map(|(&a, &b)| u64::from(a.abs_diff(b)))
            .sum();

        total as f64 / (cell_count as f64 * 255.0) * 100.0
    }

    /// Score two full frames.
    pub fn score(&self, previous: &RgbImage, current: &RgbImage) -> f64 {
        self.compare(&self.signature(previous), &self.signature(current))
    }
}
