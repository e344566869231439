//! Session lifecycle: the shared context handed to every worker, the
//! cancellation token gating their loops, worker spawn/join, and the control
//! channel that carries device selections into the render loop.

pub mod frame_queue;

pub use frame_queue::{AudioFrame, FrameQueue, AUDIO_QUEUE_CAPACITY};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// Cooperative cancellation signal shared by all workers.
///
/// Cancellation is advisory: a worker blocked in a device call observes the
/// token only when that call returns, so shutdown latency is bounded by the
/// slowest single blocking call.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Everything the audio workers share, built once at launch.
pub struct SessionContext {
    pub cancel: CancelToken,
    pub queue: Arc<FrameQueue>,
    /// Position in the host's input-device enumeration order.
    pub microphone_index: usize,
    pub sample_rate: u32,
    pub chunk_samples: usize,
}

/// Requests from the device-selection boundary into the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    SwitchCamera(u32),
}

/// Sending half of the device-selection boundary. The render loop owns the
/// receiving half and applies commands between frame reads, which is what
/// serializes a camera hot-swap against in-flight captures.
#[derive(Clone)]
pub struct ControlHandle {
    tx: Sender<ControlCommand>,
}

impl ControlHandle {
    pub fn select_camera(&self, index: u32) {
        if self.tx.send(ControlCommand::SwitchCamera(index)).is_err() {
            warn!(index, "control channel closed, camera selection dropped");
        }
    }
}

pub fn control_channel() -> (ControlHandle, Receiver<ControlCommand>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (ControlHandle { tx }, rx)
}

/// Handles to the running audio workers. The render loop runs on the main
/// thread inside the window toolkit and is not represented here.
pub struct Session {
    workers: Vec<(&'static str, JoinHandle<()>)>,
}

impl Session {
    /// Wait for every worker to exit. Callers cancel the token first; the
    /// join guarantees no device handle is released while a worker still
    /// runs.
    pub fn shutdown(self) {
        for (name, handle) in self.workers {
            if handle.join().is_err() {
                warn!(worker = name, "worker panicked during shutdown");
            } else {
                debug!(worker = name, "worker joined");
            }
        }
    }
}

/// Start the audio capture and playback workers.
pub fn launch(context: Arc<SessionContext>) -> Result<Session> {
    let capture = spawn_worker("audio-capture", Arc::clone(&context), |ctx| {
        crate::capture::audio::run_capture(ctx).map_err(Into::into)
    })?;
    let playback = spawn_worker("audio-playback", context, crate::playback::run_playback)?;

    Ok(Session {
        workers: vec![capture, playback],
    })
}

fn spawn_worker<F>(
    name: &'static str,
    context: Arc<SessionContext>,
    run: F,
) -> Result<(&'static str, JoinHandle<()>)>
where
    F: FnOnce(&SessionContext) -> Result<()> + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            if let Err(e) = run(&context) {
                error!(worker = name, "worker failed: {e:#}");
                // A dead capture or playback worker leaves the session
                // without a data path; abort the whole session rather than
                // run against a missing device.
                context.cancel.cancel();
            }
        })
        .with_context(|| format!("Failed to spawn {name} worker"))?;
    Ok((name, handle))
}
