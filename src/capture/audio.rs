//! Microphone capture worker.
//!
//! Opens the selected input device once, builds a mono stream at the
//! configured rate, converts the device's native sample format to i16, and
//! slices the callback stream into exact fixed-size frames pushed into the
//! shared queue (drop-oldest when full). The input handle closes when the
//! worker exits.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info, trace};

use super::{CaptureError, AUDIO_CHANNELS};
use crate::pipeline::{AudioFrame, SessionContext};

/// How often the supervision loop re-checks the cancellation token.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Capture worker entry point. A failed device open is fatal to this worker;
/// the spawner aborts the session on error return.
pub fn run_capture(context: &SessionContext) -> Result<(), CaptureError> {
    let device = resolve_input_device(context.microphone_index)?;
    let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
    let sample_format = device.default_input_config()?.sample_format();

    let config = cpal::StreamConfig {
        channels: AUDIO_CHANNELS,
        sample_rate: cpal::SampleRate(context.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    info!(
        device = %device_name,
        rate = context.sample_rate,
        format = ?sample_format,
        "audio capture starting"
    );

    let stream = match sample_format {
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, context, |s| s)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, context, i16_from_u16)?,
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, context, i16_from_f32)?,
        other => return Err(CaptureError::UnsupportedFormat(other)),
    };
    stream.play()?;

    // Samples arrive on the stream's callback thread; this loop only
    // supervises cancellation, checked once per tick rather than mid-read.
    while !context.cancel.is_cancelled() {
        thread::sleep(CANCEL_POLL_INTERVAL);
    }

    drop(stream);
    info!("audio capture stopped");
    Ok(())
}

fn resolve_input_device(index: usize) -> Result<cpal::Device, CaptureError> {
    let host = cpal::default_host();
    host.input_devices()?
        .nth(index)
        .ok_or(CaptureError::MicrophoneNotFound { index })
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    context: &SessionContext,
    convert: fn(T) -> i16,
) -> Result<cpal::Stream, CaptureError>
where
    T: cpal::SizedSample + Send + 'static,
{
    let queue = Arc::clone(&context.queue);
    let mut chunker = Chunker::new(context.chunk_samples);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            chunker.push(data.iter().map(|&sample| convert(sample)), |samples| {
                if queue.push(AudioFrame::new(samples)) {
                    trace!("audio queue full, dropped oldest frame");
                }
            });
        },
        log_stream_error,
        None,
    )?;
    Ok(stream)
}

fn log_stream_error(err: cpal::StreamError) {
    error!("audio input stream error: {err}");
}

fn i16_from_f32(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

fn i16_from_u16(sample: u16) -> i16 {
    (sample as i32 - 32_768) as i16
}

/// Accumulates converted samples and emits exact fixed-size frames.
struct Chunker {
    pending: Vec<i16>,
    chunk_samples: usize,
}

impl Chunker {
    fn new(chunk_samples: usize) -> Self {
        Self {
            pending: Vec::with_capacity(chunk_samples * 2),
            chunk_samples,
        }
    }

    fn push(&mut self, samples: impl IntoIterator<Item = i16>, mut emit: impl FnMut(Vec<i16>)) {
        self.pending.extend(samples);
        while self.pending.len() >= self.chunk_samples {
            emit(self.pending.drain(..self.chunk_samples).collect());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunker_emits_exact_frames_across_ragged_input() {
        let mut chunker = Chunker::new(512);
        let mut frames = Vec::new();

        chunker.push(vec![1i16; 1000], |f| frames.push(f));
        assert_eq!(frames.len(), 1);

        chunker.push(vec![2i16; 600], |f| frames.push(f));
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.len() == 512));

        // 1600 in, 1536 emitted, 64 still pending
        assert_eq!(chunker.pending.len(), 64);
    }

    #[test]
    fn chunker_holds_short_input_back() {
        let mut chunker = Chunker::new(1024);
        let mut frames = Vec::new();
        chunker.push(vec![0i16; 1023], |f| frames.push(f));
        assert!(frames.is_empty());
        chunker.push(std::iter::once(0i16), |f| frames.push(f));
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn f32_conversion_clamps_to_i16_range() {
        assert_eq!(i16_from_f32(0.0), 0);
        assert_eq!(i16_from_f32(1.0), i16::MAX);
        assert_eq!(i16_from_f32(2.0), i16::MAX);
        assert_eq!(i16_from_f32(-2.0), -i16::MAX);
    }

    #[test]
    fn u16_conversion_recenters_around_zero() {
        assert_eq!(i16_from_u16(0), i16::MIN);
        assert_eq!(i16_from_u16(32_768), 0);
        assert_eq!(i16_from_u16(u16::MAX), i16::MAX);
    }
}
