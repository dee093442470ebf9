use std::time::{Duration, Instant};

use avcap_core::config::PipelineConfig;
use avcap_core::pipeline::{self, PipelineDevices};
use avcap_core::sim::{MemorySink, PassthroughEncoder, ShortWriteSink, SimAudioSource, SimVideoSource, SlowSink};

#[test]
fn happy_path_runs_to_completion_and_writes_both_streams() {
    let video_source = Box::new(SimVideoSource::new(64, 48, 20));
    let audio_source = Box::new(SimAudioSource::new(48_000, 2, 960, 20));
    let h264_sink = MemorySink::new();
    let pcm_sink = MemorySink::new();

    let devices = PipelineDevices {
        video_source,
        video_encoder: Box::new(PassthroughEncoder::new()),
        audio_source,
        h264_sink: Box::new(h264_sink.clone()),
        pcm_sink: Box::new(pcm_sink.clone()),
    };

    let config = PipelineConfig::new(64, 48, 1);
    let stats = pipeline::run(devices, config).expect("pipeline run");

    let window = stats.take_window();
    // The stats ticker may or may not have ticked during a 1s run, but the
    // run must not panic, must join cleanly, and bytes must have landed.
    assert!(window.video_frames <= 20);
    assert!(!h264_sink.snapshot().is_empty());
    assert!(!pcm_sink.snapshot().is_empty());
}

#[test]
fn sequence_gap_does_not_stall_the_pipeline() {
    // A dropped capture sequence number must be folded into drop_count, not
    // cause the capture stage to wedge or the run to fail.
    let video_source = Box::new(SimVideoSource::new(32, 24, 10).with_sequence_gap());
    let audio_source = Box::new(SimAudioSource::new(48_000, 2, 960, 10));
    let h264_sink = MemorySink::new();

    let devices = PipelineDevices {
        video_source,
        video_encoder: Box::new(PassthroughEncoder::new()),
        audio_source,
        h264_sink: Box::new(h264_sink.clone()),
        pcm_sink: Box::new(MemorySink::new()),
    };

    let config = PipelineConfig::new(32, 24, 1);
    let _stats = pipeline::run(devices, config).expect("pipeline run");
    assert!(!h264_sink.snapshot().is_empty());
}

#[test]
fn sequence_regression_does_not_stall_the_pipeline() {
    // A duplicate or out-of-order buffer (sequence regresses instead of
    // advancing) must not wedge the capture stage or fail the run. Exact
    // drop-count accounting for this case is covered by
    // `stages::video_capture::tests::regression_never_counts_as_a_drop`,
    // isolated from the stats ticker's once-a-second reset.
    let video_source = Box::new(SimVideoSource::new(32, 24, 10).with_regression_at(1, 5));
    let audio_source = Box::new(SimAudioSource::new(48_000, 2, 960, 10));
    let h264_sink = MemorySink::new();

    let devices = PipelineDevices {
        video_source,
        video_encoder: Box::new(PassthroughEncoder::new()),
        audio_source,
        h264_sink: Box::new(h264_sink.clone()),
        pcm_sink: Box::new(MemorySink::new()),
    };

    let config = PipelineConfig::new(32, 24, 1);
    let _stats = pipeline::run(devices, config).expect("pipeline run");
    assert!(!h264_sink.snapshot().is_empty());
}

#[test]
fn short_write_triggers_fatal_shutdown_before_the_timer_expires() {
    // A sink that can never accept a full write is fatal: the sink stage
    // must request shutdown immediately rather than loop on it, so the run
    // finishes long before a generously long timer would have fired.
    let video_source = Box::new(SimVideoSource::new(32, 24, 500));
    let audio_source = Box::new(SimAudioSource::new(48_000, 2, 960, 500));
    let pcm_sink = MemorySink::new();

    let devices = PipelineDevices {
        video_source,
        video_encoder: Box::new(PassthroughEncoder::new()),
        audio_source,
        h264_sink: Box::new(ShortWriteSink::default()),
        pcm_sink: Box::new(pcm_sink.clone()),
    };

    let config = PipelineConfig::new(32, 24, 30);
    let started = Instant::now();
    let _stats = pipeline::run(devices, config).expect("pipeline run");
    assert!(
        started.elapsed() < Duration::from_secs(30),
        "pipeline should stop on the fatal short write, not wait for the timer"
    );
}

#[test]
fn slow_sink_applies_backpressure_without_deadlocking() {
    // A sink too slow to keep up must make the upstream queues back up and
    // force drops at the capture stage, never stall the pipeline outright.
    let video_source = Box::new(SimVideoSource::new(16, 16, 400));
    let audio_source = Box::new(SimAudioSource::new(48_000, 2, 960, 400));
    let h264_sink = MemorySink::new();

    let devices = PipelineDevices {
        video_source,
        video_encoder: Box::new(PassthroughEncoder::new()),
        audio_source,
        h264_sink: Box::new(SlowSink::new(h264_sink.clone(), Duration::from_millis(5))),
        pcm_sink: Box::new(MemorySink::new()),
    };

    let mut config = PipelineConfig::new(16, 16, 1);
    config.raw_queue_capacity = 1;
    config.h264_queue_capacity = 1;

    let _stats = pipeline::run(devices, config).expect("pipeline run");
    assert!(!h264_sink.snapshot().is_empty());
}

#[test]
fn slow_producer_eventually_delivers_frames_after_would_block() {
    // A producer that reports WouldBlock for a while before its first frame
    // must not be mistaken for end-of-stream or stall out the pipeline.
    let video_source = Box::new(SimVideoSource::new(32, 24, 10).with_initial_would_block(50));
    let audio_source = Box::new(SimAudioSource::new(48_000, 2, 960, 10));
    let h264_sink = MemorySink::new();

    let devices = PipelineDevices {
        video_source,
        video_encoder: Box::new(PassthroughEncoder::new()),
        audio_source,
        h264_sink: Box::new(h264_sink.clone()),
        pcm_sink: Box::new(MemorySink::new()),
    };

    let config = PipelineConfig::new(32, 24, 1);
    let _stats = pipeline::run(devices, config).expect("pipeline run");
    assert!(!h264_sink.snapshot().is_empty());
}

#[test]
fn timer_expiry_stops_a_pipeline_that_would_otherwise_run_forever() {
    // Producers that never run out of frames must still be stopped, by the
    // timer alone, within roughly its configured duration.
    let video_source = Box::new(SimVideoSource::new(16, 16, u64::MAX));
    let audio_source = Box::new(SimAudioSource::new(48_000, 2, 960, u64::MAX));

    let devices = PipelineDevices {
        video_source,
        video_encoder: Box::new(PassthroughEncoder::new()),
        audio_source,
        h264_sink: Box::new(MemorySink::new()),
        pcm_sink: Box::new(MemorySink::new()),
    };

    let config = PipelineConfig::new(16, 16, 1);
    let started = Instant::now();
    let _stats = pipeline::run(devices, config).expect("pipeline run");
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1), "timer must not stop the pipeline early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(10), "timer must stop the pipeline close to its duration: {elapsed:?}");
}
