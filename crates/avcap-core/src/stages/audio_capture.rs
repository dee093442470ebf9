use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::clock::monotonic_now_us;
use crate::model::AudioChunk;
use crate::pipeline::PipelineContext;
use crate::traits::AudioSource;

/// Reads fixed-size periods off the audio device and feeds `pcm`. Unlike
/// video, audio has no allowance to drop on backpressure — the queue is deep
/// (256 slots) specifically so a blocking push almost never actually blocks
/// in practice, and if it does, audio continuity matters more than latency.
pub fn run_audio_capture(ctx: Arc<PipelineContext>, mut source: Box<dyn AudioSource>) {
    let sample_rate = source.sample_rate();
    let channels = source.channels();
    let bytes_per_sample = source.bytes_per_sample();
    let frames_per_period = source.frames_per_period();
    let bytes_per_frame = channels as usize * bytes_per_sample as usize;
    let chunk_bytes = frames_per_period as usize * bytes_per_frame;

    let mut pts_us = monotonic_now_us();

    while !ctx.shutdown.should_stop() {
        let mut buf = vec![0u8; chunk_bytes];
        let n = match source.read(&mut buf) {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(error = %e, "audio capture io error");
                ctx.stats.add_drop(1);
                thread::sleep(Duration::from_millis(1));
                continue;
            }
        };

        if n == 0 {
            thread::sleep(Duration::from_millis(1));
            continue;
        }

        buf.truncate(n);
        let frames = (n / bytes_per_frame) as u32;
        let chunk = AudioChunk::new(buf, sample_rate, channels, bytes_per_sample, frames, pts_us);
        pts_us += frames as u64 * 1_000_000 / sample_rate as u64;

        if ctx.queues.pcm.push(chunk).is_err() {
            break;
        }
    }
}
