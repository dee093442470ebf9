//! External collaborators the pipeline depends on without knowing their
//! concrete kind. `avcapd` supplies V4L2/ALSA/encoder/file implementations;
//! [`crate::sim`] supplies deterministic ones for tests.

use std::io::Write;

use crate::error::{CaptureError, EncodeError};
use crate::model::VideoFrame;

/// One successfully dequeued video buffer, or a would-block signal.
///
/// `index` identifies the driver buffer so it can be handed back via
/// [`VideoSource::requeue`]; implementations that manage buffer lifetime
/// internally (as some capture libraries do) may treat `requeue` as a no-op.
pub enum DequeueOutcome {
    Frame { index: usize, sequence: u32, bytes: Vec<u8> },
    WouldBlock,
}

/// A video capture device. Implementations choose whether to block or to
/// return `WouldBlock` promptly; the capture stage handles both.
pub trait VideoSource: Send {
    fn dequeue(&mut self) -> Result<DequeueOutcome, CaptureError>;
    fn requeue(&mut self, index: usize) -> Result<(), CaptureError>;
}

/// A PCM capture device, read as fixed-size periods of interleaved samples.
pub trait AudioSource: Send {
    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
    fn bytes_per_sample(&self) -> u16;
    fn frames_per_period(&self) -> u32;

    /// Blocking read of up to `buf.len()` bytes, returning the number of
    /// bytes actually read. A short or zero read is not an error by itself;
    /// the caller decides whether to retry.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CaptureError>;
}

/// Output of a single encode call: the bitstream plus whether it starts a GOP.
pub struct EncodedOutput {
    pub bytes: Vec<u8>,
    pub is_keyframe: bool,
}

/// A video encoder, fed one raw frame at a time.
///
/// `Ok(None)` means the encoder consumed the frame but has not yet produced
/// an access unit (buffering); this is not a drop.
pub trait VideoEncoder: Send {
    fn encode(&mut self, frame: &VideoFrame) -> Result<Option<EncodedOutput>, EncodeError>;
}

/// A byte-oriented output — anything that can be written to and knows how
/// many bytes it actually accepted, so callers can detect partial writes.
pub trait ByteSink: Send {
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<usize>;
}

/// Any `Write + Send` type is a [`ByteSink`] for free — in particular `File`,
/// which is what the real binary hands to the sink stages.
impl<T: Write + Send> ByteSink for T {
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.write(bytes)
    }
}
