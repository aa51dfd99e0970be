use std::env;
use std::path::PathBuf;

const WATCHED_VARIABLES: [&str; 5] = [
    "FFMPEG_DIR",
    "FFMPEG_PKG_CONFIG_PATH",
    "VCPKG_ROOT",
    "VCPKGRS_DYNAMIC",
    "VCPKGRS_TRIPLET",
];

fn main() {
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if let Some(hint) = discovery_hint(&target_os) {
        println!("cargo:warning={hint}");
    }
}

/// A hint for locating FFmpeg when `ffmpeg-sys-next` is likely to need help.
///
/// Only Windows lacks a system pkg-config setup by default; elsewhere the
/// sys crate finds FFmpeg on its own.
fn discovery_hint(target_os: &str) -> Option<String> {
    if target_os != "windows" {
        return None;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        return Some(
            "FFMPEG_DIR is not set. Install FFmpeg via vcpkg and set VCPKG_ROOT or FFMPEG_DIR so scenecut can link against it."
                .to_string(),
        );
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let install = PathBuf::from(&vcpkg_root).join("installed").join(&triplet);

    if !install.exists() {
        return Some(format!(
            "VCPKG_ROOT is set but no FFmpeg install was found at {}.",
            install.display()
        ));
    }

    let mut hint = format!(
        "Found vcpkg FFmpeg at {0}. Set FFMPEG_DIR={0} to make discovery explicit.",
        install.display()
    );
    if env::var_os("VCPKGRS_DYNAMIC").is_none() {
        hint.push_str(" Set VCPKGRS_DYNAMIC=1 for dynamic vcpkg builds.");
    }
    Some(hint)
}
