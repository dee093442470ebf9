use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::pipeline::PipelineContext;

/// Logs one structured line a second: throughput counters read-and-reset
/// since the last tick, current queue depths, and the last-seen PTS deltas.
pub fn run_stats_ticker(ctx: Arc<PipelineContext>) {
    while !ctx.shutdown.should_stop() {
        thread::sleep(Duration::from_secs(1));

        let window = ctx.stats.take_window();
        let enc_kbps = (window.enc_bytes * 8) / 1000;
        tracing::info!(
            video_fps = window.video_frames,
            enc_kbps,
            audio_chunks_per_sec = window.audio_chunks,
            drop_count = window.drop_count,
            "pipeline stats"
        );

        tracing::info!(
            raw = ctx.queues.raw.len(),
            raw_cap = ctx.queues.raw.capacity(),
            h264 = ctx.queues.h264.len(),
            h264_cap = ctx.queues.h264.capacity(),
            pcm = ctx.queues.pcm.len(),
            pcm_cap = ctx.queues.pcm.capacity(),
            "queue depth"
        );

        let (video_delta_us, audio_delta_us) = ctx.stats.pts_deltas_us();
        tracing::info!(
            video_pts_delta_us = video_delta_us,
            audio_pts_delta_us = audio_delta_us,
            "pts delta"
        );
    }
}
