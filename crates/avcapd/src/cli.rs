//! Command-line surface: one long flag per config knob, defaults matching
//! the values the daemon has always shipped with.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "avcapd",
    about = "Capture V4L2 video and ALSA audio, encode video to H.264, and write raw elementary streams to disk."
)]
pub struct Args {
    /// V4L2 video device node.
    #[arg(long = "video-dev", default_value = "/dev/video0")]
    pub video_dev: PathBuf,

    /// Capture resolution as WIDTHxHEIGHT.
    #[arg(long = "size", default_value = "1280x720", value_parser = parse_size)]
    pub size: Size,

    /// Target frame rate in frames per second.
    #[arg(long = "fps", default_value_t = 30)]
    pub fps: u32,

    /// Target H.264 bitrate in bits per second.
    #[arg(long = "bitrate", default_value_t = 2_000_000)]
    pub bitrate: u32,

    /// ALSA capture device, e.g. hw:0,0.
    #[arg(long = "audio-dev", default_value = "hw:0,0")]
    pub audio_dev: String,

    /// Audio sample rate in Hz.
    #[arg(long = "sr", default_value_t = 48_000)]
    pub sample_rate: u32,

    /// Number of audio channels.
    #[arg(long = "ch", default_value_t = 2)]
    pub channels: u16,

    /// ALSA capture period length in milliseconds.
    #[arg(long = "audio-chunk-ms", default_value_t = 20)]
    pub audio_chunk_ms: u32,

    /// How long to run before stopping on its own. `0` runs until a signal arrives.
    #[arg(long = "sec", default_value_t = 10)]
    pub duration_sec: u64,

    /// Output path for the raw H.264 elementary stream.
    #[arg(long = "out-h264", default_value = "out.h264")]
    pub out_h264: PathBuf,

    /// Output path for raw interleaved PCM.
    #[arg(long = "out-pcm", default_value = "out.pcm")]
    pub out_pcm: PathBuf,
}

/// A parsed WIDTHxHEIGHT pair.
#[derive(Debug, Clone, Copy)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s.split_once('x').ok_or_else(|| format!("invalid size {s:?}, expected WIDTHxHEIGHT"))?;
    let width: u32 = w.parse().map_err(|_| format!("invalid width in size {s:?}"))?;
    let height: u32 = h.parse().map_err(|_| format!("invalid height in size {s:?}"))?;
    if width == 0 || height == 0 {
        return Err(format!("size must be positive: {s:?}"));
    }
    Ok(Size { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_size_accepts_wxh() {
        let size = parse_size("1280x720").unwrap();
        assert_eq!(size.width, 1280);
        assert_eq!(size.height, 720);
    }

    #[test]
    fn parse_size_rejects_missing_separator() {
        assert!(parse_size("1280").is_err());
    }

    #[test]
    fn parse_size_rejects_zero_dimension() {
        assert!(parse_size("0x720").is_err());
        assert!(parse_size("1280x0").is_err());
    }

    #[test]
    fn defaults_match_documented_behavior() {
        let args = Args::parse_from(["avcapd"]);
        assert_eq!(args.video_dev, PathBuf::from("/dev/video0"));
        assert_eq!(args.fps, 30);
        assert_eq!(args.bitrate, 2_000_000);
        assert_eq!(args.sample_rate, 48_000);
        assert_eq!(args.channels, 2);
        assert_eq!(args.duration_sec, 10);
    }
}
