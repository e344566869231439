//! Bounded FIFO hand-off between audio capture and playback.
//!
//! Capacity is fixed at [`AUDIO_QUEUE_CAPACITY`]; a push at capacity evicts
//! the oldest frame first (drop-oldest), bounding memory and end-to-end
//! latency at the cost of audible gaps under sustained overload. Surviving
//! frames keep strict production order.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of audio frames held between capture and playback.
pub const AUDIO_QUEUE_CAPACITY: usize = 10;

/// One fixed-size block of 16-bit mono samples. Produced by the capture
/// worker, consumed exactly once by the playback worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    samples: Vec<i16>,
}

impl AudioFrame {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

pub struct FrameQueue {
    inner: Mutex<VecDeque<AudioFrame>>,
    available: Condvar,
    capacity: usize,
}

impl FrameQueue {
    /// `capacity` must be at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            available: Condvar::new(),
            capacity,
        }
    }

    /// Append a frame, evicting the oldest one first if the queue is full.
    /// Returns `true` when a frame was evicted.
    pub fn push(&self, frame: AudioFrame) -> bool {
        let mut queue = self.inner.lock();
        let evicted = if queue.len() >= self.capacity {
            queue.pop_front();
            true
        } else {
            false
        };
        queue.push_back(frame);
        drop(queue);
        self.available.notify_one();
        evicted
    }

    /// Pop the oldest frame, blocking up to `timeout` for one to arrive.
    /// `None` means the queue stayed empty for the whole timeout — a normal
    /// idle tick, not an error.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<AudioFrame> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.inner.lock();
        loop {
            if let Some(frame) = queue.pop_front() {
                return Some(frame);
            }
            if self.available.wait_until(&mut queue, deadline).timed_out() {
                return queue.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn frame(seq: i16) -> AudioFrame {
        AudioFrame::new(vec![seq; 4])
    }

    fn seq(frame: &AudioFrame) -> i16 {
        frame.samples()[0]
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let queue = FrameQueue::new(AUDIO_QUEUE_CAPACITY);
        for n in 0..30 {
            queue.push(frame(n));
            assert!(queue.len() <= AUDIO_QUEUE_CAPACITY);
        }
        assert_eq!(queue.len(), AUDIO_QUEUE_CAPACITY);
    }

    #[test]
    fn partial_fill_keeps_exact_length() {
        let queue = FrameQueue::new(AUDIO_QUEUE_CAPACITY);
        for n in 0..5 {
            queue.push(frame(n));
        }
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn overflow_evicts_oldest_and_keeps_newest_in_order() {
        let queue = FrameQueue::new(AUDIO_QUEUE_CAPACITY);
        for n in 0..30 {
            queue.push(frame(n));
        }

        let survivors: Vec<i16> =
            std::iter::from_fn(|| queue.pop_timeout(Duration::from_millis(10)))
                .map(|f| seq(&f))
                .collect();
        assert_eq!(survivors, (20..30).collect::<Vec<i16>>());
    }

    #[test]
    fn push_reports_eviction_only_at_capacity() {
        let queue = FrameQueue::new(3);
        assert!(!queue.push(frame(0)));
        assert!(!queue.push(frame(1)));
        assert!(!queue.push(frame(2)));
        assert!(queue.push(frame(3)));
    }

    #[test]
    fn pop_is_fifo() {
        let queue = FrameQueue::new(AUDIO_QUEUE_CAPACITY);
        for n in 0..4 {
            queue.push(frame(n));
        }
        for n in 0..4 {
            assert_eq!(seq(&queue.pop_timeout(Duration::from_millis(10)).unwrap()), n);
        }
    }

    #[test]
    fn pop_times_out_on_empty_queue() {
        let queue = FrameQueue::new(AUDIO_QUEUE_CAPACITY);
        assert!(queue.pop_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn pop_wakes_when_a_frame_arrives() {
        let queue = Arc::new(FrameQueue::new(AUDIO_QUEUE_CAPACITY));
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                queue.push(frame(7));
            })
        };

        let popped = queue.pop_timeout(Duration::from_secs(2));
        producer.join().unwrap();
        assert_eq!(seq(&popped.unwrap()), 7);
    }
}
