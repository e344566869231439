//! Snapshot naming and PNG writing.
//!
//! File names are `screenshot_<YYYY-MM-DD_HH-MM-SS>_<suffix>.png` with the
//! suffix scanned upward from 1 until an unused name is found, so a save
//! never overwrites an existing file and rapid repeated saves within one
//! second get strictly increasing suffixes. Failures here abort only the
//! single save, never the pipeline.

use anyhow::{Context, Result};
use chrono::Local;
use image::RgbImage;
use std::path::{Path, PathBuf};

use crate::capture::VideoFrame;
use crate::global;

const FILE_EXTENSION: &str = "png";

/// The screenshots directory next to the executable.
pub fn default_dir() -> Result<PathBuf> {
    global::screenshots_dir()
}

/// Write `frame` as a PNG under `dir` with a collision-free name and return
/// the path. Creates the directory if absent (idempotent).
pub fn save_frame(dir: &Path, frame: &VideoFrame) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create screenshot directory {}", dir.display()))?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let path = unique_path(dir, &timestamp);

    let image = RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
        .context("Frame buffer does not match its dimensions")?;
    image
        .save(&path)
        .with_context(|| format!("Failed to write screenshot {}", path.display()))?;

    Ok(path)
}

/// First unused `screenshot_<timestamp>_<suffix>.png` path, suffix >= 1.
fn unique_path(dir: &Path, timestamp: &str) -> PathBuf {
    let mut suffix = 1u32;
    loop {
        let candidate = dir.join(format!("screenshot_{timestamp}_{suffix}.{FILE_EXTENSION}"));
        if !candidate.exists() {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_frame() -> VideoFrame {
        VideoFrame {
            width: 2,
            height: 2,
            data: vec![0u8; 12],
        }
    }

    #[test]
    fn first_save_of_a_second_gets_suffix_one() {
        let dir = tempdir().unwrap();
        let path = unique_path(dir.path(), "2024-01-01_12-00-00");
        assert_eq!(
            path.file_name().unwrap(),
            "screenshot_2024-01-01_12-00-00_1.png"
        );
    }

    #[test]
    fn suffix_scan_skips_existing_files() {
        let dir = tempdir().unwrap();
        for suffix in 1..=2 {
            std::fs::write(
                dir.path()
                    .join(format!("screenshot_2024-01-01_12-00-00_{suffix}.png")),
                b"x",
            )
            .unwrap();
        }

        let path = unique_path(dir.path(), "2024-01-01_12-00-00");
        assert_eq!(
            path.file_name().unwrap(),
            "screenshot_2024-01-01_12-00-00_3.png"
        );
    }

    #[test]
    fn consecutive_saves_never_collide() {
        let dir = tempdir().unwrap();
        let frame = test_frame();

        let first = save_frame(dir.path(), &frame).unwrap();
        let second = save_frame(dir.path(), &frame).unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("reCamScreenshots");

        let path = save_frame(&nested, &test_frame()).unwrap();
        assert!(path.exists());

        // pre-existing directory is not an error
        save_frame(&nested, &test_frame()).unwrap();
    }

    #[test]
    fn mismatched_frame_buffer_is_rejected() {
        let dir = tempdir().unwrap();
        let bad = VideoFrame {
            width: 4,
            height: 4,
            data: vec![0u8; 3],
        };
        assert!(save_frame(dir.path(), &bad).is_err());
    }
}
