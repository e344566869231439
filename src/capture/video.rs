//! Camera capture via nokhwa.
//!
//! Exactly one camera handle is live at a time. A device switch is a
//! two-phase transaction: release the current handle fully, then open the
//! new index. The render loop owns this source and applies switches between
//! reads, so a read can never race a swap.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use tracing::{debug, info, warn};

use super::CaptureError;

/// One captured frame, RGB8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub struct VideoSource {
    camera: Option<Camera>,
    index: u32,
    requested_width: u32,
    requested_height: u32,
}

impl VideoSource {
    /// Open the camera at `index`, requesting the given resolution. The
    /// device's closest supported format wins if the request cannot be met.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, CaptureError> {
        let camera = open_camera(index, width, height)?;
        Ok(Self {
            camera: Some(camera),
            index,
            requested_width: width,
            requested_height: height,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Blocking read bounded by the device's own latency. `None` is a normal
    /// transient (no frame ready, decode failure, or no camera after a failed
    /// swap) and never alters state.
    pub fn read_frame(&mut self) -> Option<VideoFrame> {
        let camera = self.camera.as_mut()?;

        let buffer = match camera.frame() {
            Ok(buffer) => buffer,
            Err(e) => {
                debug!("no frame available: {e}");
                return None;
            }
        };

        let image = match buffer.decode_image::<RgbFormat>() {
            Ok(image) => image,
            Err(e) => {
                debug!("frame decode failed: {e}");
                return None;
            }
        };

        Some(VideoFrame {
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
        })
    }

    /// Two-phase hot-swap: release the current handle, then open `index`.
    /// Between the phases no handle exists. On reopen failure the source is
    /// left empty — reads return `None` until a later switch succeeds.
    pub fn switch_to(&mut self, index: u32) -> Result<(), CaptureError> {
        if self.camera.is_some() && index == self.index {
            return Ok(());
        }

        self.release();
        let camera = open_camera(index, self.requested_width, self.requested_height)?;
        self.camera = Some(camera);
        self.index = index;
        Ok(())
    }

    /// Release the camera handle. Idempotent.
    pub fn close(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!("failed to stop camera stream cleanly: {e}");
            }
        }
    }
}

fn open_camera(index: u32, width: u32, height: u32) -> Result<Camera, CaptureError> {
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
        CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30),
    ));

    let mut camera = Camera::new(CameraIndex::Index(index), requested)
        .map_err(|source| CaptureError::CameraOpen { index, source })?;
    camera.open_stream().map_err(CaptureError::CameraStream)?;

    let negotiated = camera.resolution();
    info!(
        index,
        width = negotiated.width(),
        height = negotiated.height(),
        "camera opened"
    );
    Ok(camera)
}
