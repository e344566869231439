//! Capture device enumeration.
//!
//! Cameras are discovered by probing a bounded index range: each candidate is
//! opened, its negotiated resolution recorded, and the handle released before
//! the next probe. A failed open silently excludes the index — absence from
//! the result is the only signal. Microphones come from the audio host's own
//! enumeration, filtered to devices that can actually record.

use cpal::traits::{DeviceTrait, HostTrait};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tracing::debug;

/// Highest camera index probed (inclusive).
pub const MAX_CAMERA_PROBE_INDEX: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraInfo {
    pub index: u32,
    /// Negotiated resolution recorded at probe time.
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicrophoneInfo {
    /// Position in the host's input-device enumeration order.
    pub index: usize,
    pub name: String,
    pub channels: u16,
}

/// Probe camera indices 0..=9 and report the ones that open.
///
/// Every probed handle is released before the next index is tried; no
/// hardware is left open after this returns.
pub fn list_cameras() -> Vec<CameraInfo> {
    probe_cameras(|index| {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        match Camera::new(CameraIndex::Index(index), requested) {
            Ok(camera) => {
                let resolution = camera.resolution();
                Some((resolution.width(), resolution.height()))
            }
            Err(e) => {
                debug!(index, "camera probe failed: {e}");
                None
            }
        }
    })
}

fn probe_cameras(mut probe: impl FnMut(u32) -> Option<(u32, u32)>) -> Vec<CameraInfo> {
    (0..=MAX_CAMERA_PROBE_INDEX)
        .filter_map(|index| {
            probe(index).map(|(width, height)| CameraInfo {
                index,
                width,
                height,
            })
        })
        .collect()
}

/// List input-capable audio devices in host-reported order.
pub fn list_microphones() -> Vec<MicrophoneInfo> {
    let host = cpal::default_host();
    let devices = match host.input_devices() {
        Ok(devices) => devices,
        Err(e) => {
            debug!("audio input enumeration failed: {e}");
            return Vec::new();
        }
    };

    devices
        .enumerate()
        .filter_map(|(index, device)| {
            let name = device.name().unwrap_or_else(|_| "(unknown)".to_string());
            let channels = device
                .default_input_config()
                .map(|config| config.channels())
                .unwrap_or(0);
            (channels > 0).then_some(MicrophoneInfo {
                index,
                name,
                channels,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_keeps_only_successful_indices_in_order() {
        let cameras = probe_cameras(|index| match index {
            0 => Some((1280, 720)),
            2 => Some((640, 480)),
            _ => None,
        });

        assert_eq!(
            cameras,
            vec![
                CameraInfo {
                    index: 0,
                    width: 1280,
                    height: 720
                },
                CameraInfo {
                    index: 2,
                    width: 640,
                    height: 480
                },
            ]
        );
    }

    #[test]
    fn probe_visits_each_index_exactly_once() {
        let mut visited = Vec::new();
        probe_cameras(|index| {
            visited.push(index);
            None
        });
        assert_eq!(visited, (0..=MAX_CAMERA_PROBE_INDEX).collect::<Vec<_>>());
    }

    #[test]
    fn probe_with_no_cameras_yields_empty_list() {
        assert!(probe_cameras(|_| None).is_empty());
    }
}
