//! Camera and microphone capture sources.

pub mod audio;
pub mod video;

pub use video::{VideoFrame, VideoSource};

use nokhwa::NokhwaError;
use thiserror::Error;

/// The audio loopback is mono end to end.
pub const AUDIO_CHANNELS: u16 = 1;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open camera {index}")]
    CameraOpen {
        index: u32,
        #[source]
        source: NokhwaError,
    },

    #[error("failed to start camera stream")]
    CameraStream(#[source] NokhwaError),

    #[error("microphone index {index} not found")]
    MicrophoneNotFound { index: usize },

    #[error("failed to enumerate audio devices")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query audio input config")]
    AudioConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio input stream")]
    AudioStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio input stream")]
    AudioPlay(#[from] cpal::PlayStreamError),

    #[error("unsupported audio sample format {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),
}
