//! Segment a video on a background thread while streaming progress.
//!
//! Usage:
//!   cargo run --example async_segment --features async -- <input_file>

use std::error::Error;

use scenecut::{SegmentOptions, SegmentationMode, segment_file_async};
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input.mp4".to_string());

    let (future, mut progress) = segment_file_async(
        input_path,
        SegmentationMode::fixed_secs(8),
        SegmentOptions::new().with_batch_size(10),
    );

    let watcher = tokio::spawn(async move {
        while let Some(info) = progress.next().await {
            println!("[{:?}] {:.1}%", info.phase, info.percentage);
        }
    });

    let result = future.await?;
    watcher.await?;

    println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    Ok(())
}
