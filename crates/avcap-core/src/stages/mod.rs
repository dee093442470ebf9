//! One module per worker thread body. Each `run_*` function owns its devices
//! and runs until its input is exhausted, its output queue is closed, or
//! (for the timer/stats ticker) the shutdown latch trips.

mod audio_capture;
mod h264_sink;
mod pcm_sink;
mod stats_ticker;
mod timer;
mod video_capture;
mod video_encode;

pub use audio_capture::run_audio_capture;
pub use h264_sink::run_h264_sink;
pub use pcm_sink::run_pcm_sink;
pub use stats_ticker::run_stats_ticker;
pub use timer::run_timer;
pub use video_capture::run_video_capture;
pub use video_encode::run_video_encode;
