//! Split a video into scenes and save one thumbnail per scene.
//!
//! Usage:
//!   cargo run --example segment -- <input_file> [fixed_seconds]

use std::error::Error;

use scenecut::{SceneSegmenter, SegmentOptions, SegmentationMode};

fn main() -> Result<(), Box<dyn Error>> {
    let mut arguments = std::env::args().skip(1);
    let input_path = arguments.next().unwrap_or_else(|| "input.mp4".to_string());
    let mode = match arguments.next() {
        Some(seconds) => SegmentationMode::fixed_secs(seconds.parse()?),
        None => SegmentationMode::Adaptive,
    };

    let segmenter = SceneSegmenter::new(SegmentOptions::new());
    let result = segmenter.segment_file(&input_path, mode)?;

    println!(
        "{} scene(s) in {:.2}s ({} diff samples, mode {})",
        result.scenes.len(),
        result.duration.as_secs_f64(),
        result.diffs.len(),
        result.mode
    );

    for scene in &result.scenes {
        println!(
            "  scene {:>3}: {:>8.2}s – {:>8.2}s",
            scene.id,
            scene.start_time.as_secs_f64(),
            scene.end_time.as_secs_f64()
        );
        if let Some(thumbnail) = &scene.thumbnail {
            let path = format!("scene_{:03}.jpg", scene.id);
            std::fs::write(&path, &thumbnail.data)?;
        }
    }

    // The strongest changes in the timeline.
    let mut diffs = result.diffs.clone();
    diffs.sort_by(|a, b| b.diff_score.total_cmp(&a.diff_score));
    println!("\nTop changes:");
    for diff in diffs.iter().take(5) {
        println!(
            "  {:>8.2}s  score {:.1}",
            diff.timestamp.as_secs_f64(),
            diff.diff_score
        );
    }

    Ok(())
}
