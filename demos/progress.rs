//! Demonstrate progress reporting and cancellation during segmentation.
//!
//! Usage:
//!   cargo run --example progress -- <input_file>

use std::error::Error;
use std::sync::Arc;

use scenecut::{
    CancellationToken, ProgressCallback, ProgressInfo, SceneSegmenter, SegmentError,
    SegmentOptions, SegmentationMode,
};

/// Simple progress callback that prints to stdout.
struct PrintProgress;

impl ProgressCallback for PrintProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let remaining = info
            .estimated_remaining
            .map_or("???".to_string(), |r| format!("{:.1}s", r.as_secs_f64()));
        println!(
            "[{:?}] {}/{} ({:.1}%) elapsed={:.1}s remaining={remaining}",
            info.phase,
            info.current,
            info.total,
            info.percentage,
            info.elapsed.as_secs_f64(),
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input.mp4".to_string());

    // ── Progress callback ──────────────────────────────────────────
    println!("Segmenting with progress reporting...");
    let options = SegmentOptions::new()
        .with_progress(Arc::new(PrintProgress))
        .with_batch_size(5);

    let result = SceneSegmenter::new(options).segment_file(&input_path, SegmentationMode::Adaptive)?;
    println!("Found {} scenes\n", result.scenes.len());

    // ── Cancellation token ─────────────────────────────────────────
    println!("Demonstrating cancellation...");
    let token = CancellationToken::new();
    let options = SegmentOptions::new().with_cancellation(token.clone());

    // Cancel immediately to demonstrate the mechanism.
    token.cancel();

    match SceneSegmenter::new(options).segment_file(&input_path, SegmentationMode::Adaptive) {
        Err(SegmentError::Cancelled) => println!("Operation was cancelled as expected."),
        Err(e) => println!("Unexpected error: {e}"),
        Ok(result) => println!("Got {} scenes (cancel was too late)", result.scenes.len()),
    }

    println!("\nDone!");
    Ok(())
}
