//! Domain types carried on the three queues.
//!
//! Ownership transfer through [`crate::queue::BoundedQueue`] means there is
//! no separate "free" step the way the original C queue required: a frame
//! dropped on a full queue, or one that falls out of scope at the bottom of
//! a stage loop, is reclaimed by `Drop` like any other owned value.

/// One captured video frame, NV12 (Y plane followed by an interleaved UV plane).
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    /// Monotonic microseconds, captured at the instant the frame was dequeued
    /// from the capture device — not when it later reaches the encoder.
    pub pts_us: u64,
    pub frame_id: u64,
}

impl VideoFrame {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32, stride: u32, pts_us: u64, frame_id: u64) -> Self {
        Self { bytes, width, height, stride, pts_us, frame_id }
    }
}

/// One encoded access unit produced by the video encoder.
#[derive(Debug, Clone)]
pub struct EncodedPacket {
    pub bytes: Vec<u8>,
    /// Inherited verbatim from the [`VideoFrame`] it was encoded from.
    pub pts_us: u64,
    pub is_keyframe: bool,
}

impl EncodedPacket {
    pub fn new(bytes: Vec<u8>, pts_us: u64, is_keyframe: bool) -> Self {
        Self { bytes, pts_us, is_keyframe }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// One period's worth of interleaved PCM (LRLR...).
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
    pub bytes_per_sample: u16,
    /// Frames per channel in this chunk, not total samples.
    pub frames: u32,
    pub pts_us: u64,
}

impl AudioChunk {
    pub fn new(
        bytes: Vec<u8>,
        sample_rate: u32,
        channels: u16,
        bytes_per_sample: u16,
        frames: u32,
        pts_us: u64,
    ) -> Self {
        Self { bytes, sample_rate, channels, bytes_per_sample, frames, pts_us }
    }
}
