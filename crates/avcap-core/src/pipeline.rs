//! Orchestrator: spawns every worker thread in the order startup requires,
//! joins them in the order shutdown requires, and owns the three queues in
//! between.

use std::sync::Arc;
use std::thread;

use crate::config::PipelineConfig;
use crate::error::QueueError;
use crate::model::{AudioChunk, EncodedPacket, VideoFrame};
use crate::queue::BoundedQueue;
use crate::stages;
use crate::stats::Stats;
use crate::stop::Shutdown;
use crate::traits::{AudioSource, ByteSink, VideoEncoder, VideoSource};

#[cfg(unix)]
use crate::signal;

/// The three bounded queues connecting pipeline stages. Cheap to clone: each
/// field is an `Arc`.
#[derive(Clone)]
pub struct Queues {
    pub raw: Arc<BoundedQueue<VideoFrame>>,
    pub h264: Arc<BoundedQueue<EncodedPacket>>,
    pub pcm: Arc<BoundedQueue<AudioChunk>>,
}

/// Shared state every stage closure captures: the queues, the shutdown
/// latch, and the stats counters.
pub struct PipelineContext {
    pub queues: Queues,
    pub shutdown: Arc<Shutdown>,
    pub stats: Arc<Stats>,
}

/// The external collaborators a concrete run is wired to. Boxed trait
/// objects so `avcapd` can hand in real devices and `sim`-based tests can
/// hand in fakes through the exact same entry point.
pub struct PipelineDevices {
    pub video_source: Box<dyn VideoSource>,
    pub video_encoder: Box<dyn VideoEncoder>,
    pub audio_source: Box<dyn AudioSource>,
    pub h264_sink: Box<dyn ByteSink>,
    pub pcm_sink: Box<dyn ByteSink>,
}

/// Runs one full pipeline session to completion: spawns every stage, blocks
/// until shutdown (by signal, timer, or a fatal sink error) has drained
/// every stage, and returns once every thread has joined and the queues are
/// empty.
pub fn run(devices: PipelineDevices, config: PipelineConfig) -> Result<Arc<Stats>, QueueError> {
    #[cfg(unix)]
    signal::block_signals().expect("block SIGINT/SIGTERM before spawning workers");

    let queues = Queues {
        raw: Arc::new(BoundedQueue::new(config.raw_queue_capacity)?),
        h264: Arc::new(BoundedQueue::new(config.h264_queue_capacity)?),
        pcm: Arc::new(BoundedQueue::new(config.pcm_queue_capacity)?),
    };
    let shutdown = Arc::new(Shutdown::new());
    let stats = Arc::new(Stats::new());
    let ctx = Arc::new(PipelineContext { queues: queues.clone(), shutdown: shutdown.clone(), stats: stats.clone() });

    #[cfg(unix)]
    let signal_waiter = signal::spawn(shutdown.clone(), queues.clone()).expect("spawn signal waiter");

    let timer_handle = (config.duration_sec > 0).then(|| {
        let ctx = ctx.clone();
        let duration_sec = config.duration_sec;
        thread::Builder::new()
            .name("timer".into())
            .spawn(move || stages::run_timer(ctx, duration_sec))
            .expect("spawn timer thread")
    });

    let stats_handle = {
        let ctx = ctx.clone();
        thread::Builder::new()
            .name("stats-ticker".into())
            .spawn(move || stages::run_stats_ticker(ctx))
            .expect("spawn stats-ticker thread")
    };

    let PipelineDevices { video_source, video_encoder, audio_source, h264_sink, pcm_sink } = devices;

    let video_capture_handle = {
        let ctx = ctx.clone();
        let (w, h, s) = (config.video_width, config.video_height, config.video_stride);
        thread::Builder::new()
            .name("video-capture".into())
            .spawn(move || stages::run_video_capture(ctx, video_source, w, h, s))
            .expect("spawn video-capture thread")
    };

    let audio_capture_handle = {
        let ctx = ctx.clone();
        thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || stages::run_audio_capture(ctx, audio_source))
            .expect("spawn audio-capture thread")
    };

    let video_encode_handle = {
        let ctx = ctx.clone();
        thread::Builder::new()
            .name("video-encode".into())
            .spawn(move || stages::run_video_encode(ctx, video_encoder))
            .expect("spawn video-encode thread")
    };

    let h264_sink_handle = {
        let ctx = ctx.clone();
        thread::Builder::new()
            .name("h264-sink".into())
            .spawn(move || stages::run_h264_sink(ctx, h264_sink))
            .expect("spawn h264-sink thread")
    };

    let pcm_sink_handle = {
        let ctx = ctx.clone();
        thread::Builder::new()
            .name("pcm-sink".into())
            .spawn(move || stages::run_pcm_sink(ctx, pcm_sink))
            .expect("spawn pcm-sink thread")
    };

    // Fixed join order: producers, then the stage that drains them, then the
    // sinks that drain that. request_stop() only after every stage that
    // could itself trigger a fatal stop has had a chance to do so — this
    // guarantees the stats ticker (which only exits via should_stop) is
    // woken even if nothing else ever fired.
    let _ = video_capture_handle.join();
    let _ = audio_capture_handle.join();
    let _ = video_encode_handle.join();
    let _ = h264_sink_handle.join();
    let _ = pcm_sink_handle.join();

    shutdown.request_stop(&queues);
    let _ = stats_handle.join();

    #[cfg(unix)]
    {
        signal_waiter.wake();
        signal_waiter.join();
    }

    if let Some(handle) = timer_handle {
        let _ = handle.join();
    }

    queues.raw.drain();
    queues.h264.drain();
    queues.pcm.drain();

    Ok(stats)
}
