//! FFmpeg log level configuration.
//!
//! FFmpeg prints warnings and errors to stderr on its own, independently of
//! the Rust [`log`](https://crates.io/crates/log) facade this crate uses.
//! Decoding hundreds of sample points can make that output noisy, so this
//! module exposes FFmpeg's log-level switch without requiring callers to
//! depend on `ffmpeg-next` directly.
//!
//! # Example
//!
//! ```no_run
//! use scenecut::FfmpegLogLevel;
//!
//! scenecut::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! ```

use std::str::FromStr;

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity level.
///
/// Ordered from quietest to most verbose. Setting a level suppresses every
/// FFmpeg message below that severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FfmpegLogLevel {
    /// Print nothing.
    Quiet,
    /// Only unrecoverable errors.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Decoder debugging output.
    Debug,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        }
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "quiet" | "off" => Ok(FfmpegLogLevel::Quiet),
            "fatal" | "panic" => Ok(FfmpegLogLevel::Fatal),
            "error" => Ok(FfmpegLogLevel::Error),
            "warning" | "warn" => Ok(FfmpegLogLevel::Warning),
            "info" | "verbose" => Ok(FfmpegLogLevel::Info),
            "debug" | "trace" => Ok(FfmpegLogLevel::Debug),
            other => Err(format!("unknown FFmpeg log level: {other}")),
        }
    }
}

/// Set the FFmpeg internal log verbosity level.
///
/// This controls what FFmpeg itself prints to stderr; it does not affect
/// messages emitted through the `log` crate.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}
