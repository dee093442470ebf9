use std::sync::Arc;

use crate::pipeline::PipelineContext;
use crate::traits::ByteSink;

/// Drains `h264` and writes each access unit to the output sink. A partial
/// write or io error is fatal for the run: once a sink stops accepting full
/// writes there is no meaningful way to resume the elementary stream, so
/// this requests shutdown rather than looping on a broken file descriptor.
pub fn run_h264_sink(ctx: Arc<PipelineContext>, mut sink: Box<dyn ByteSink>) {
    let mut last_pts_us: u64 = 0;

    loop {
        let packet = match ctx.queues.h264.pop() {
            Some(packet) => packet,
            None => break,
        };

        if last_pts_us != 0 && packet.pts_us > last_pts_us {
            ctx.stats.set_video_pts_delta_us(packet.pts_us - last_pts_us);
        }
        last_pts_us = packet.pts_us;

        match sink.write_bytes(&packet.bytes) {
            Ok(written) if written == packet.bytes.len() => {}
            Ok(written) => {
                tracing::error!(written, expected = packet.bytes.len(), "h264 sink partial write");
                ctx.shutdown.request_stop(&ctx.queues);
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "h264 sink write failed");
                ctx.shutdown.request_stop(&ctx.queues);
                break;
            }
        }
    }
}
