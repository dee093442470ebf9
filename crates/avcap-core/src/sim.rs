//! Deterministic stand-ins for real devices, used by this crate's own tests
//! and available to any caller that wants to exercise the pipeline without
//! touching V4L2/ALSA/hardware-encoder bindings.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{CaptureError, EncodeError};
use crate::model::VideoFrame;
use crate::traits::{AudioSource, ByteSink, DequeueOutcome, EncodedOutput, VideoEncoder, VideoSource};

/// Produces a fixed number of synthetic NV12 frames, then reports
/// `WouldBlock` forever. Can be configured to jump or regress the V4L2
/// `sequence` counter once, to exercise drop-accounting on a capture gap,
/// and to report `WouldBlock` some number of times before the first frame,
/// to exercise a slow-starting producer.
pub struct SimVideoSource {
    frame_size: usize,
    sequence: u32,
    frames_remaining: u64,
    would_block_before: u64,
    /// `(sequence value that triggers it, signed adjustment beyond the
    /// normal +1 step)`: applied once, the first time `sequence` is returned.
    sequence_jump: Option<(u32, i32)>,
}

impl SimVideoSource {
    pub fn new(width: u32, height: u32, frame_count: u64) -> Self {
        let frame_size = (width as usize * height as usize * 3) / 2; // NV12
        Self {
            frame_size,
            sequence: 0,
            frames_remaining: frame_count,
            would_block_before: 0,
            sequence_jump: None,
        }
    }

    /// Skips one sequence number after the second frame: a forward gap of 1.
    pub fn with_sequence_gap(self) -> Self {
        self.with_forward_gap_at(1, 1)
    }

    /// After the frame whose sequence equals `at_sequence` is returned, skip
    /// `extra` additional numbers before the next one (a forward gap).
    pub fn with_forward_gap_at(mut self, at_sequence: u32, extra: u32) -> Self {
        self.sequence_jump = Some((at_sequence, extra as i32));
        self
    }

    /// After the frame whose sequence equals `at_sequence` is returned, the
    /// next sequence number regresses by `back_by` instead of advancing: a
    /// duplicate or out-of-order buffer, which must never inflate `drop_count`.
    pub fn with_regression_at(mut self, at_sequence: u32, back_by: u32) -> Self {
        self.sequence_jump = Some((at_sequence, -(back_by as i32) - 1));
        self
    }

    /// Reports `WouldBlock` `n` times before the first real frame, simulating
    /// a producer that is slow to start delivering buffers.
    pub fn with_initial_would_block(mut self, n: u64) -> Self {
        self.would_block_before = n;
        self
    }

    /// Starts the sequence counter at an arbitrary value, to exercise
    /// behavior near a genuine `u32` wraparound.
    pub fn with_starting_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }
}

impl VideoSource for SimVideoSource {
    fn dequeue(&mut self) -> Result<DequeueOutcome, CaptureError> {
        if self.would_block_before > 0 {
            self.would_block_before -= 1;
            return Ok(DequeueOutcome::WouldBlock);
        }
        if self.frames_remaining == 0 {
            return Ok(DequeueOutcome::WouldBlock);
        }
        self.frames_remaining -= 1;

        let sequence = self.sequence;
        let mut next = sequence.wrapping_add(1);
        if let Some((at, delta)) = self.sequence_jump {
            if sequence == at {
                next = next.wrapping_add_signed(delta);
                self.sequence_jump = None;
            }
        }
        self.sequence = next;

        Ok(DequeueOutcome::Frame { index: 0, sequence, bytes: vec![0u8; self.frame_size] })
    }

    fn requeue(&mut self, _index: usize) -> Result<(), CaptureError> {
        Ok(())
    }
}

/// Produces silent PCM periods at a fixed rate, then reads `0` forever.
pub struct SimAudioSource {
    sample_rate: u32,
    channels: u16,
    bytes_per_sample: u16,
    frames_per_period: u32,
    periods_remaining: u64,
}

impl SimAudioSource {
    pub fn new(sample_rate: u32, channels: u16, frames_per_period: u32, period_count: u64) -> Self {
        Self { sample_rate, channels, bytes_per_sample: 2, frames_per_period, periods_remaining: period_count }
    }
}

impl AudioSource for SimAudioSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn bytes_per_sample(&self) -> u16 {
        self.bytes_per_sample
    }

    fn frames_per_period(&self) -> u32 {
        self.frames_per_period
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CaptureError> {
        if self.periods_remaining == 0 {
            return Ok(0);
        }
        self.periods_remaining -= 1;
        let want = self.frames_per_period as usize * self.channels as usize * self.bytes_per_sample as usize;
        let n = want.min(buf.len());
        buf[..n].fill(0);
        Ok(n)
    }
}

/// Pass-through "encoder": wraps each frame's bytes directly as one access
/// unit, every third frame marked a keyframe. Good enough to exercise queue
/// plumbing and PTS propagation without a real codec.
pub struct PassthroughEncoder {
    count: u64,
}

impl PassthroughEncoder {
    pub fn new() -> Self {
        Self { count: 0 }
    }
}

impl Default for PassthroughEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoEncoder for PassthroughEncoder {
    fn encode(&mut self, frame: &VideoFrame) -> Result<Option<EncodedOutput>, EncodeError> {
        let is_keyframe = self.count % 3 == 0;
        self.count += 1;
        Ok(Some(EncodedOutput { bytes: frame.bytes.clone(), is_keyframe }))
    }
}

/// An in-memory sink that records every write, for assertions in tests.
#[derive(Clone, Default)]
pub struct MemorySink {
    data: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.data.lock().unwrap().clone()
    }
}

impl ByteSink for MemorySink {
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.data.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

/// A sink that always reports a short write, to exercise the fatal
/// partial-write shutdown path.
#[derive(Default)]
pub struct ShortWriteSink;

impl ByteSink for ShortWriteSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        Ok(bytes.len().saturating_sub(1))
    }
}

/// Wraps another sink and sleeps before every write, to simulate a slow
/// consumer and exercise upstream backpressure dropping.
pub struct SlowSink<S> {
    inner: S,
    delay: Duration,
}

impl<S: ByteSink> SlowSink<S> {
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl<S: ByteSink> ByteSink for SlowSink<S> {
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        std::thread::sleep(self.delay);
        self.inner.write_bytes(bytes)
    }
}
