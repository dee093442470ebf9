use std::sync::Arc;

use crate::pipeline::PipelineContext;
use crate::traits::ByteSink;

/// Drains `pcm` and writes each chunk to the output sink. Mirrors
/// [`super::h264_sink::run_h264_sink`]; the only difference is which stats
/// counter advances on a clean write.
pub fn run_pcm_sink(ctx: Arc<PipelineContext>, mut sink: Box<dyn ByteSink>) {
    let mut last_pts_us: u64 = 0;

    loop {
        let chunk = match ctx.queues.pcm.pop() {
            Some(chunk) => chunk,
            None => break,
        };

        if last_pts_us != 0 && chunk.pts_us > last_pts_us {
            ctx.stats.set_audio_pts_delta_us(chunk.pts_us - last_pts_us);
        }
        last_pts_us = chunk.pts_us;

        match sink.write_bytes(&chunk.bytes) {
            Ok(written) if written == chunk.bytes.len() => {
                ctx.stats.add_audio_chunk();
            }
            Ok(written) => {
                tracing::error!(written, expected = chunk.bytes.len(), "pcm sink partial write");
                ctx.shutdown.request_stop(&ctx.queues);
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "pcm sink write failed");
                ctx.shutdown.request_stop(&ctx.queues);
                break;
            }
        }
    }
}
