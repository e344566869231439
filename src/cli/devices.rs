//! Device listing and interactive selection.

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Select};

use crate::devices::{self, CameraInfo, MicrophoneInfo};

pub fn handle_devices_command() -> Result<()> {
    let cameras = devices::list_cameras();
    if cameras.is_empty() {
        println!("No cameras detected");
    } else {
        println!("Cameras:");
        for camera in &cameras {
            println!("  {}: {}x{}", camera.index, camera.width, camera.height);
        }
    }

    let microphones = devices::list_microphones();
    if microphones.is_empty() {
        println!("No microphones detected");
    } else {
        println!("Microphones:");
        for microphone in &microphones {
            println!(
                "  {}: {} ({} ch)",
                microphone.index, microphone.name, microphone.channels
            );
        }
    }

    Ok(())
}

pub fn pick_camera(cameras: &[CameraInfo]) -> Result<u32> {
    let labels: Vec<String> = cameras
        .iter()
        .map(|camera| format!("{}x{}", camera.width, camera.height))
        .collect();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select camera")
        .items(&labels)
        .default(0)
        .interact()
        .context("Camera selection aborted")?;

    Ok(cameras[choice].index)
}

pub fn pick_microphone(microphones: &[MicrophoneInfo]) -> Result<usize> {
    let labels: Vec<&str> = microphones
        .iter()
        .map(|microphone| microphone.name.as_str())
        .collect();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select microphone")
        .items(&labels)
        .default(0)
        .interact()
        .context("Microphone selection aborted")?;

    Ok(microphones[choice].index)
}
