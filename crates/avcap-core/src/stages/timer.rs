use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::pipeline::PipelineContext;

/// Counts down `duration_sec` in one-second ticks and requests shutdown on
/// natural expiry. Only spawned when `duration_sec > 0`; a run-forever
/// pipeline has no timer thread at all.
pub fn run_timer(ctx: Arc<PipelineContext>, duration_sec: u64) {
    let mut remaining = duration_sec;
    while remaining > 0 && !ctx.shutdown.should_stop() {
        thread::sleep(Duration::from_secs(1));
        remaining -= 1;
    }

    if !ctx.shutdown.should_stop() {
        tracing::info!(duration_sec, "run duration elapsed, stopping");
        ctx.shutdown.request_stop(&ctx.queues);
    }
}
