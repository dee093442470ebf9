use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::clock::monotonic_now_us;
use crate::model::VideoFrame;
use crate::pipeline::PipelineContext;
use crate::queue::TryPushOutcome;
use crate::traits::{DequeueOutcome, VideoSource};

/// Pulls frames off the capture device and feeds `raw`. Drops under
/// backpressure rather than blocking the device's buffer pool: a video
/// source that cannot hand frames back promptly stalls every other buffer
/// behind it.
pub fn run_video_capture(
    ctx: Arc<PipelineContext>,
    mut source: Box<dyn VideoSource>,
    width: u32,
    height: u32,
    stride: u32,
) {
    let mut frame_id: u64 = 0;
    let mut last_sequence: Option<u32> = None;

    while !ctx.shutdown.should_stop() {
        match source.dequeue() {
            Ok(DequeueOutcome::WouldBlock) => {
                thread::sleep(Duration::from_millis(1));
            }
            Err(e) => {
                tracing::debug!(error = %e, "video capture io error");
                ctx.stats.add_drop(1);
                thread::sleep(Duration::from_millis(1));
            }
            Ok(DequeueOutcome::Frame { index, sequence, bytes }) => {
                if let Some(prev) = last_sequence {
                    // Signed distance from prev to sequence, wrap-aware: a
                    // regression or duplicate yields a non-positive delta and
                    // must never count as a drop, only `cur > prev + 1` does.
                    let delta = sequence.wrapping_sub(prev) as i32;
                    if delta > 1 {
                        ctx.stats.add_drop((delta - 1) as u64);
                    }
                }
                last_sequence = Some(sequence);

                let pts_us = monotonic_now_us();
                let frame = VideoFrame::new(bytes, width, height, stride, pts_us, frame_id);
                frame_id += 1;

                let mut should_stop_loop = false;
                match ctx.queues.raw.try_push(frame) {
                    TryPushOutcome::Accepted => {}
                    TryPushOutcome::Full(_dropped) => {
                        ctx.stats.add_drop(1);
                    }
                    TryPushOutcome::Closed(_dropped) => {
                        should_stop_loop = true;
                    }
                }

                if let Err(e) = source.requeue(index) {
                    tracing::debug!(error = %e, "video capture requeue failed");
                }

                if should_stop_loop {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Queues;
    use crate::queue::BoundedQueue;
    use crate::sim::SimVideoSource;
    use crate::stats::Stats;
    use crate::stop::Shutdown;

    fn test_ctx() -> Arc<PipelineContext> {
        let queues = Queues {
            raw: Arc::new(BoundedQueue::new(64).unwrap()),
            h264: Arc::new(BoundedQueue::new(64).unwrap()),
            pcm: Arc::new(BoundedQueue::new(64).unwrap()),
        };
        Arc::new(PipelineContext { queues, shutdown: Arc::new(Shutdown::new()), stats: Arc::new(Stats::new()) })
    }

    /// Runs the capture loop against a source that exhausts its frames and
    /// then spins on `WouldBlock`, stopping it shortly after once every
    /// frame has had time to be produced and accounted for.
    fn run_to_exhaustion(ctx: Arc<PipelineContext>, source: Box<dyn VideoSource>) {
        let run_ctx = ctx.clone();
        let handle = thread::spawn(move || run_video_capture(run_ctx, source, 4, 4, 4));
        thread::sleep(Duration::from_millis(20));
        ctx.shutdown.request_stop(&ctx.queues);
        handle.join().unwrap();
    }

    #[test]
    fn forward_gap_counts_cur_minus_prev_minus_one() {
        let ctx = test_ctx();
        let source = Box::new(SimVideoSource::new(4, 4, 10).with_forward_gap_at(1, 4));
        run_to_exhaustion(ctx.clone(), source);
        assert_eq!(ctx.stats.take_window().drop_count, 4);
    }

    #[test]
    fn consecutive_sequences_never_count_as_a_drop() {
        let ctx = test_ctx();
        let source = Box::new(SimVideoSource::new(4, 4, 10));
        run_to_exhaustion(ctx.clone(), source);
        assert_eq!(ctx.stats.take_window().drop_count, 0);
    }

    #[test]
    fn regression_never_counts_as_a_drop() {
        // A duplicate or out-of-order buffer must never be folded into
        // drop_count, however large the backward jump looks once wrapped.
        let ctx = test_ctx();
        let source = Box::new(SimVideoSource::new(4, 4, 10).with_regression_at(1, 5));
        run_to_exhaustion(ctx.clone(), source);
        assert_eq!(ctx.stats.take_window().drop_count, 0);
    }

    #[test]
    fn sequence_wraparound_by_one_is_not_a_drop() {
        // Sequence wrapping past u32::MAX back to 0 is a normal increment,
        // not driver-level loss.
        let ctx = test_ctx();
        let source = Box::new(SimVideoSource::new(4, 4, 3).with_starting_sequence(u32::MAX));
        run_to_exhaustion(ctx.clone(), source);
        assert_eq!(ctx.stats.take_window().drop_count, 0);
    }

    #[test]
    fn sequence_wraparound_gap_counts_missed_numbers() {
        // Wrapping past u32::MAX with two numbers actually missed (u32::MAX
        // itself and 0) must still count as a gap of 2, just like any other
        // forward gap.
        let ctx = test_ctx();
        let source = Box::new(SimVideoSource::new(4, 4, 3).with_starting_sequence(u32::MAX - 1).with_forward_gap_at(u32::MAX - 1, 2));
        run_to_exhaustion(ctx.clone(), source);
        assert_eq!(ctx.stats.take_window().drop_count, 2);
    }
}
