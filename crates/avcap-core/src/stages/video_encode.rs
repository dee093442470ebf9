use std::sync::Arc;

use crate::model::EncodedPacket;
use crate::pipeline::PipelineContext;
use crate::traits::VideoEncoder;

/// Drains `raw`, feeds the encoder, and pushes access units to `h264`. A
/// single encode failure is a drop, not a fatal error; the frame is released
/// either way once this loop iteration ends.
pub fn run_video_encode(ctx: Arc<PipelineContext>, mut encoder: Box<dyn VideoEncoder>) {
    loop {
        let frame = match ctx.queues.raw.pop() {
            Some(frame) => frame,
            None => break,
        };

        match encoder.encode(&frame) {
            Ok(Some(output)) => {
                let packet = EncodedPacket::new(output.bytes, frame.pts_us, output.is_keyframe);
                let size = packet.size() as u64;
                if ctx.queues.h264.push(packet).is_err() {
                    break;
                }
                ctx.stats.add_video_frame(size);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "video encode failed");
                ctx.stats.add_drop(1);
            }
        }
    }
}
