//! Application wiring: device selection, session launch, window loop,
//! teardown.

use anyhow::{anyhow, bail, Result};
use eframe::egui;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

use crate::capture::VideoSource;
use crate::cli::{self, Cli};
use crate::config::{Config, VideoConfig};
use crate::devices;
use crate::pipeline::{self, CancelToken, FrameQueue, SessionContext, AUDIO_QUEUE_CAPACITY};
use crate::screenshot;
use crate::ui::{MonitorApp, WINDOW_TITLE};

pub fn run(cli: Cli) -> Result<()> {
    info!("Starting reCam");

    let config = Config::load()?;

    let cameras = devices::list_cameras();
    if cameras.is_empty() {
        bail!("No usable cameras detected");
    }
    let camera_index = match cli.camera {
        Some(index) => index,
        None => cli::pick_camera(&cameras)?,
    };

    let microphones = devices::list_microphones();
    if microphones.is_empty() {
        bail!("No usable microphones detected");
    }
    let microphone_index = match cli.microphone {
        Some(index) => index,
        None => cli::pick_microphone(&microphones)?,
    };

    info!(
        camera = camera_index,
        microphone = microphone_index,
        "devices selected"
    );

    // Everything fallible that launch depends on resolves before any worker
    // starts, so an error here cannot strand a running worker.
    let screenshots_dir = screenshot::default_dir()?;
    let (index, width, height) = camera_request(camera_index, &config.video);
    let source = VideoSource::open(index, width, height)?;

    let cancel = CancelToken::new();
    let context = Arc::new(SessionContext {
        cancel: cancel.clone(),
        queue: Arc::new(FrameQueue::new(AUDIO_QUEUE_CAPACITY)),
        microphone_index,
        sample_rate: config.audio.sample_rate,
        chunk_samples: config.audio.chunk_samples,
    });

    // The sending half is the device-selection boundary; it only carries
    // post-launch camera hot-swaps. The launch selection binds directly
    // above. Held here so the channel stays connected for the session.
    let (_control, control_rx) = pipeline::control_channel();

    let session = Arc::new(Mutex::new(Some(pipeline::launch(Arc::clone(&context))?)));

    let app = MonitorApp::new(
        source,
        Arc::clone(&session),
        cancel.clone(),
        control_rx,
        screenshots_dir,
    );
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([
                config.video.frame_width as f32,
                config.video.frame_height as f32,
            ]),
        ..Default::default()
    };

    let run_result = eframe::run_native(WINDOW_TITLE, options, Box::new(move |_cc| Box::new(app)));

    // The window's exit hook tears the session down on the normal path; if
    // the window loop failed before reaching it, the workers are still live
    // here and must be cancelled and joined before the error propagates.
    if let Some(session) = session.lock().take() {
        cancel.cancel();
        session.shutdown();
    }
    run_result.map_err(|e| anyhow!("Window loop failed: {e}"))?;

    info!("reCam stopped");
    Ok(())
}

/// What launch opens: the operator's selected camera at the configured
/// capture resolution.
fn camera_request(selected: u32, video: &VideoConfig) -> (u32, u32, u32) {
    (selected, video.frame_width, video.frame_height)
}
