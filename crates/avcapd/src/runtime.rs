//! Wires parsed CLI args to real devices and hands the whole thing to
//! `avcap_core::pipeline::run`.

use std::fs::File;

use anyhow::{Context, Result};
use avcap_core::config::PipelineConfig;
use avcap_core::pipeline::PipelineDevices;

use crate::cli::Args;

#[cfg(target_os = "linux")]
pub fn run(args: Args) -> Result<()> {
    use crate::devices::alsa_capture::AlsaSource;
    use crate::devices::encoder_openh264::OpenH264Encoder;
    use crate::devices::v4l2::V4l2Source;

    let video_path = args.video_dev.to_string_lossy().into_owned();
    let video_source =
        V4l2Source::open(&video_path, args.size.width, args.size.height).context("open video device")?;

    let frames_per_period = args.sample_rate / 1000 * args.audio_chunk_ms;
    let audio_source = AlsaSource::open(&args.audio_dev, args.sample_rate, args.channels, frames_per_period)
        .context("open audio device")?;

    let encoder = OpenH264Encoder::new(args.size.width, args.size.height, args.fps, args.bitrate)
        .context("init video encoder")?;

    let h264_file = File::create(&args.out_h264).with_context(|| format!("create {:?}", args.out_h264))?;
    let pcm_file = File::create(&args.out_pcm).with_context(|| format!("create {:?}", args.out_pcm))?;

    let devices = PipelineDevices {
        video_source: Box::new(video_source),
        video_encoder: Box::new(encoder),
        audio_source: Box::new(audio_source),
        h264_sink: Box::new(h264_file),
        pcm_sink: Box::new(pcm_file),
    };

    let config = PipelineConfig::new(args.size.width, args.size.height, args.duration_sec);

    tracing::info!(
        video_dev = %args.video_dev.display(),
        audio_dev = %args.audio_dev,
        width = args.size.width,
        height = args.size.height,
        fps = args.fps,
        duration_sec = args.duration_sec,
        "starting capture pipeline"
    );

    avcap_core::pipeline::run(devices, config).context("pipeline run")?;
    tracing::info!("pipeline stopped");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn run(_args: Args) -> Result<()> {
    anyhow::bail!("avcapd requires Linux (V4L2 + ALSA device backends)")
}
