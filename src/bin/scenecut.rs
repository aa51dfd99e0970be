use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use scenecut::{
    FfmpegLogLevel, MediaSource, ProgressCallback, ProgressInfo, SceneSegmenter, SegmentOptions,
    SegmentationMode, SegmentationPhase, SegmentationResult,
    configuration::STANDARD_SEGMENT_LENGTHS,
};

const CLI_AFTER_HELP: &str = "Examples:\n  scenecut segment input.mp4\n  scenecut segment input.mp4 --mode fixed --segment-length 8 --json\n  scenecut segment input.mp4 --thumbnails thumbs --progress --verbose\n  scenecut diffs input.mp4 --interval 250 --csv\n  scenecut completions zsh > _scenecut";

#[derive(Debug, Parser)]
#[command(
    name = "scenecut",
    version,
    about = "Split videos into scenes and render a thumbnail for each",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Split a video into scenes.
    #[command(
        about = "Split a video into scenes",
        after_help = "Examples:\n  scenecut segment input.mp4\n  scenecut segment input.mp4 --mode fixed --segment-length 10 --out scenes.json\n  cat input.mp4 | scenecut segment - --json"
    )]
    Segment {
        /// Input video path, or `-` to read from stdin.
        input: String,
        /// Segmentation mode: adaptive | fixed.
        #[arg(long, default_value = "adaptive")]
        mode: String,
        /// Scene length in seconds for fixed mode (5, 8, and 10 are typical).
        #[arg(long, default_value_t = 5.0)]
        segment_length: f64,
        /// Sampling interval in milliseconds.
        #[arg(long, default_value_t = 500)]
        interval: u64,
        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
        /// Write the JSON result to a file.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Directory to write one JPEG per scene into.
        #[arg(long, conflicts_with = "no_thumbnails")]
        thumbnails: Option<PathBuf>,
        /// Skip thumbnail extraction.
        #[arg(long)]
        no_thumbnails: bool,
    },

    /// Print the frame-difference timeline.
    #[command(
        about = "Print the frame-difference timeline",
        after_help = "Examples:\n  scenecut diffs input.mp4\n  scenecut diffs input.mp4 --interval 250 --csv > diffs.csv"
    )]
    Diffs {
        /// Input video path, or `-` to read from stdin.
        input: String,
        /// Sampling interval in milliseconds.
        #[arg(long, default_value_t = 500)]
        interval: u64,
        /// Output CSV instead of an aligned table.
        #[arg(long)]
        csv: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_mode(mode: &str, segment_length: f64) -> Result<SegmentationMode, String> {
    match mode.to_ascii_lowercase().as_str() {
        "adaptive" | "auto" => Ok(SegmentationMode::Adaptive),
        "fixed" => {
            if !segment_length.is_finite() || segment_length <= 0.0 {
                return Err(format!(
                    "--segment-length must be a positive number of seconds, got {segment_length}"
                ));
            }
            let segment_length = Duration::try_from_secs_f64(segment_length)
                .map_err(|error| format!("--segment-length {segment_length} is out of range: {error}"))?;
            if segment_length.is_zero() {
                return Err("--segment-length rounds to zero".to_string());
            }
            Ok(SegmentationMode::Fixed { segment_length })
        }
        other => Err(format!("unsupported --mode: {other} (expected adaptive or fixed)")),
    }
}

fn parse_interval(milliseconds: u64) -> Result<Duration, String> {
    if milliseconds == 0 {
        return Err("--interval must be greater than zero".to_string());
    }
    Ok(Duration::from_millis(milliseconds))
}

fn is_standard_length(segment_length: f64) -> bool {
    STANDARD_SEGMENT_LENGTHS
        .iter()
        .any(|&standard| (standard as f64 - segment_length).abs() < f64::EPSILON)
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let level = if global.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init()?;

    if let Some(level) = &global.log_level {
        let parsed: FfmpegLogLevel = level
            .parse()
            .map_err(|_| format!("unsupported --log-level: {level}"))?;
        scenecut::set_ffmpeg_log_level(parsed);
    } else {
        scenecut::set_ffmpeg_log_level(FfmpegLogLevel::Error);
    }

    Ok(())
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}",
            )?
            .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_position(info.percentage as u64);
        let message = match info.phase {
            SegmentationPhase::Scanning => "scanning",
            SegmentationPhase::Thumbnails => "thumbnails",
            _ => "done",
        };
        self.bar.set_message(message);
    }
}

fn run_segmentation(
    input: &str,
    mode: SegmentationMode,
    mut options: SegmentOptions,
    show_progress: bool,
) -> Result<SegmentationResult, Box<dyn std::error::Error>> {
    let progress = if show_progress {
        let progress = Arc::new(TerminalProgress::new()?);
        options = options.with_progress(progress.clone());
        Some(progress)
    } else {
        None
    };

    let segmenter = SceneSegmenter::new(options);
    let result = if input == "-" {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        let mut source = MediaSource::from_bytes(&bytes)?
            .with_max_dimension(segmenter.options().decode_max_dimension());
        segmenter.segment(&mut source, mode)
    } else {
        segmenter.segment_file(input, mode)
    };

    if let Some(progress) = progress {
        progress.finish();
    }

    Ok(result?)
}

fn write_thumbnails(
    result: &SegmentationResult,
    directory: &Path,
    overwrite: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    fs::create_dir_all(directory)?;

    let mut written = 0;
    for scene in &result.scenes {
        let Some(thumbnail) = &scene.thumbnail else {
            continue;
        };
        let path = directory.join(format!("scene_{:04}.jpg", scene.id));
        ensure_writable_path(&path, overwrite)?;
        fs::write(&path, &thumbnail.data)?;
        written += 1;
    }

    Ok(written)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Segment {
            input,
            mode,
            segment_length,
            interval,
            json,
            out,
            thumbnails,
            no_thumbnails,
        } => {
            let mode = parse_mode(&mode, segment_length)?;
            if !mode.is_adaptive() && !is_standard_length(segment_length) {
                log::info!("Using non-standard segment length {segment_length}s");
            }

            if let Some(out) = &out {
                ensure_writable_path(out, cli.global.overwrite)?;
            }

            let options = SegmentOptions::new()
                .with_sampling_interval(parse_interval(interval)?)
                .with_thumbnails(!no_thumbnails);
            let result = run_segmentation(&input, mode, options, cli.global.progress)?;

            if let Some(directory) = &thumbnails {
                let written = write_thumbnails(&result, directory, cli.global.overwrite)?;
                eprintln!(
                    "{} {}",
                    "wrote".green().bold(),
                    format!("{written} thumbnail(s) to {}", directory.display()).green()
                );
            }

            if let Some(out) = &out {
                fs::write(out, serde_json::to_string_pretty(&result.to_json())?)?;
                eprintln!(
                    "{} {}",
                    "wrote".green().bold(),
                    out.display().to_string().green()
                );
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&result.to_json())?);
            } else {
                println!(
                    "{} {} scene(s) in {:.2}s [{}]",
                    "segmented".cyan().bold(),
                    result.scenes.len(),
                    result.duration.as_secs_f64(),
                    result.mode
                );
                for scene in &result.scenes {
                    let marker = if scene.thumbnail.is_some() {
                        "thumbnail".green()
                    } else {
                        "no thumbnail".yellow()
                    };
                    println!(
                        "  #{:<4} {:>9.3}s – {:>9.3}s  ({})",
                        scene.id,
                        scene.start_time.as_secs_f64(),
                        scene.end_time.as_secs_f64(),
                        marker
                    );
                }
            }
        }
        Commands::Diffs {
            input,
            interval,
            csv,
        } => {
            let options = SegmentOptions::new()
                .with_sampling_interval(parse_interval(interval)?)
                .with_thumbnails(false);
            let result = run_segmentation(
                &input,
                SegmentationMode::Adaptive,
                options,
                cli.global.progress,
            )?;

            if csv {
                println!("frame_index,timestamp,diff_score");
                for diff in &result.diffs {
                    println!(
                        "{},{:.3},{:.4}",
                        diff.frame_index,
                        diff.timestamp.as_secs_f64(),
                        diff.diff_score
                    );
                }
            } else {
                eprintln!(
                    "{} {} sample(s) over {:.2}s",
                    "scanned".cyan().bold(),
                    result.diffs.len() + 1,
                    result.duration.as_secs_f64()
                );
                println!("{:>8} {:>10} {:>8}", "frame", "time (s)", "score");
                for diff in &result.diffs {
                    println!(
                        "{:>8} {:>10.3} {:>8.2}",
                        diff.frame_index,
                        diff.timestamp.as_secs_f64(),
                        diff.diff_score
                    );
                }
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "scenecut", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
