//! Audio playback worker.
//!
//! Opens the default output device once via rodio and drains the shared
//! queue: pop the oldest frame (blocking with a timeout), append it to the
//! sink in FIFO order. The timeout replaces the original busy-poll consumer
//! and also bounds shutdown latency.

use anyhow::{Context, Result};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use std::time::Duration;
use tracing::info;

use crate::capture::AUDIO_CHANNELS;
use crate::pipeline::SessionContext;

const POP_TIMEOUT: Duration = Duration::from_millis(100);

/// Playback worker entry point. A failed device open is fatal to this
/// worker; the spawner aborts the session on error return.
pub fn run_playback(context: &SessionContext) -> Result<()> {
    let (_stream, handle) =
        OutputStream::try_default().context("No audio output device available")?;
    let sink = Sink::try_new(&handle).context("Failed to create audio sink")?;

    info!(rate = context.sample_rate, "audio playback started");

    while !context.cancel.is_cancelled() {
        if let Some(frame) = context.queue.pop_timeout(POP_TIMEOUT) {
            let source = SamplesBuffer::new(AUDIO_CHANNELS, context.sample_rate, frame.into_samples());
            sink.append(source);
        }
        // empty pop is a normal idle tick
    }

    sink.stop();
    info!("audio playback stopped");
    Ok(())
}
