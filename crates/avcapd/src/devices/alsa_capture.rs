//! ALSA PCM capture, backed by the `alsa` crate's raw PCM API.
//!
//! Raw ALSA over `cpal` here: the pipeline needs a blocking, fixed-size
//! period read in a known sample format, which is exactly what `alsa`'s
//! `IO::readi` gives you and what `cpal`'s portable output-callback
//! abstraction does not.

use anyhow::{Context, Result};
use alsa::pcm::{Access, Format, HwParams, PCM, State};
use alsa::{Direction, ValueOr};
use avcap_core::error::CaptureError;
use avcap_core::traits::AudioSource;

pub struct AlsaSource {
    pcm: PCM,
    sample_rate: u32,
    channels: u16,
    frames_per_period: u32,
}

impl AlsaSource {
    pub fn open(device: &str, sample_rate: u32, channels: u16, frames_per_period: u32) -> Result<Self> {
        let pcm = PCM::new(device, Direction::Capture, false).with_context(|| format!("open {device}"))?;
        {
            let hwp = HwParams::any(&pcm).context("query hw params")?;
            hwp.set_channels(channels as u32).context("set channels")?;
            hwp.set_rate(sample_rate, ValueOr::Nearest).context("set sample rate")?;
            hwp.set_format(Format::s16()).context("set S16_LE format")?;
            hwp.set_access(Access::RWInterleaved).context("set interleaved access")?;
            hwp.set_period_size(frames_per_period as i64, ValueOr::Nearest).context("set period size")?;
            pcm.hw_params(&hwp).context("apply hw params")?;
        }
        pcm.prepare().context("prepare pcm")?;

        Ok(Self { pcm, sample_rate, channels, frames_per_period })
    }
}

impl AudioSource for AlsaSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn bytes_per_sample(&self) -> u16 {
        2
    }

    fn frames_per_period(&self) -> u32 {
        self.frames_per_period
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CaptureError> {
        let io = self.pcm.io_i16().map_err(|e| CaptureError::Io(e.to_string()))?;
        let channels = self.channels as usize;
        let want_frames = buf.len() / (channels * 2);
        let mut samples = vec![0i16; want_frames * channels];

        let frames_read = match io.readi(&mut samples) {
            Ok(n) => n,
            Err(e) if self.pcm.state() == State::XRun => {
                self.pcm.prepare().map_err(|e2| CaptureError::Io(e2.to_string()))?;
                return Err(CaptureError::Io(e.to_string()));
            }
            Err(e) => return Err(CaptureError::Io(e.to_string())),
        };

        let sample_count = frames_read * channels;
        for (i, sample) in samples[..sample_count].iter().enumerate() {
            let bytes = sample.to_le_bytes();
            buf[i * 2] = bytes[0];
            buf[i * 2 + 1] = bytes[1];
        }
        Ok(sample_count * 2)
    }
}
