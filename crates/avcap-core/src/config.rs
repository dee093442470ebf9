//! Pipeline-level configuration, independent of how it was sourced (CLI, file, defaults).

/// Queue capacities and per-run knobs the orchestrator needs. Device-specific
/// configuration (paths, sample rate, bitrate, ...) lives with the concrete
/// `avcapd` device constructors instead, since the pipeline core never opens
/// a device itself.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub video_width: u32,
    pub video_height: u32,
    pub video_stride: u32,
    /// `0` means run until a signal or fatal error stops the pipeline.
    pub duration_sec: u64,
    pub raw_queue_capacity: usize,
    pub h264_queue_capacity: usize,
    pub pcm_queue_capacity: usize,
}

impl PipelineConfig {
    pub fn new(video_width: u32, video_height: u32, duration_sec: u64) -> Self {
        Self {
            video_width,
            video_height,
            video_stride: video_width,
            duration_sec,
            raw_queue_capacity: 8,
            h264_queue_capacity: 64,
            pcm_queue_capacity: 256,
        }
    }
}
