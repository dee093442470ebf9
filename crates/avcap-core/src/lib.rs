//! Concurrent capture/encode pipeline core.
//!
//! Wires together a handful of OS threads around three bounded queues:
//!
//! ```text
//! VideoCapture --(raw, cap 8, drop-on-full)--> VideoEncode --(h264, cap 64, blocking)--> H264Sink
//! AudioCapture ------------------------------------------------(pcm, cap 256, blocking)--> PcmSink
//! ```
//!
//! A [`stop::Shutdown`] latch coordinates cooperative shutdown: the first
//! caller to observe the transition closes all three queues exactly once,
//! which unblocks every thread parked on a `pop`/`push` call. Devices are
//! abstracted behind the traits in [`traits`] so the pipeline itself never
//! touches V4L2, ALSA, or any particular encoder.

pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod queue;
pub mod sim;
pub mod stages;
pub mod stats;
pub mod stop;
pub mod traits;

#[cfg(unix)]
pub mod signal;

pub use config::PipelineConfig;
pub use error::{CaptureError, EncodeError, QueueError, SinkError};
pub use model::{AudioChunk, EncodedPacket, VideoFrame};
pub use pipeline::{PipelineDevices, run};
pub use queue::BoundedQueue;
pub use stats::{Stats, StatsWindow};
pub use stop::Shutdown;
pub use traits::{AudioSource, ByteSink, DequeueOutcome, EncodedOutput, VideoEncoder, VideoSource};
