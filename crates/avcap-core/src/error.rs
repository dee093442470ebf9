//! Error taxonomy for the pipeline core.
//!
//! Most of these are not "errors" in the sense of aborting the run — they are
//! local, per-call outcomes a stage folds into `drop_count` or logs and moves
//! past. Only [`QueueError`] (bad construction arguments) and the device-open
//! failures surfaced by [`CaptureError`]/[`EncodeError`]/[`SinkError`] are
//! meant to reach a caller that decides whether to keep running.

use thiserror::Error;

/// Returned by [`crate::queue::BoundedQueue::new`] for invalid construction arguments.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum QueueError {
    #[error("queue capacity must be at least 1")]
    BadArg,
}

/// Errors from a [`crate::traits::VideoSource`] or [`crate::traits::AudioSource`].
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Device could not be opened or configured at startup.
    #[error("device open failed: {0}")]
    Open(String),
    /// A single read/dequeue call failed; the caller counts this as a drop and retries.
    #[error("device io error: {0}")]
    Io(String),
}

/// Errors from a [`crate::traits::VideoEncoder`].
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("encoder init failed: {0}")]
    Init(String),
    /// A single frame failed to encode; the caller counts this as a drop and continues.
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Errors from a [`crate::traits::ByteSink`].
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink open failed: {0}")]
    Open(String),
    #[error("sink io error: {0}")]
    Io(#[from] std::io::Error),
}
