//! Process-wide counters, sampled once a second by the stats ticker stage.
//!
//! The four counters are read-and-reset every tick (an atomic swap against
//! zero), while the two PTS-delta gauges are plain last-value reads — a
//! gauge has no "since last tick" meaning to reset.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Stats {
    video_frames: AtomicU64,
    enc_bytes: AtomicU64,
    audio_chunks: AtomicU64,
    drop_count: AtomicU64,
    video_pts_delta_us: AtomicU64,
    audio_pts_delta_us: AtomicU64,
}

/// A one-second window of counter values, taken by [`Stats::take_window`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    pub video_frames: u64,
    pub enc_bytes: u64,
    pub audio_chunks: u64,
    pub drop_count: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_video_frame(&self, bytes: u64) {
        self.video_frames.fetch_add(1, Ordering::Relaxed);
        self.enc_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn add_audio_chunk(&self) {
        self.audio_chunks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_drop(&self, n: u64) {
        if n > 0 {
            self.drop_count.fetch_add(n, Ordering::Relaxed);
        }
    }

    pub fn set_video_pts_delta_us(&self, delta: u64) {
        self.video_pts_delta_us.store(delta, Ordering::Relaxed);
    }

    pub fn set_audio_pts_delta_us(&self, delta: u64) {
        self.audio_pts_delta_us.store(delta, Ordering::Relaxed);
    }

    /// PTS deltas as last observed by the sinks, `0` meaning "not yet available".
    pub fn pts_deltas_us(&self) -> (u64, u64) {
        (
            self.video_pts_delta_us.load(Ordering::Relaxed),
            self.audio_pts_delta_us.load(Ordering::Relaxed),
        )
    }

    /// Reads and zeroes the four per-second counters in one atomic swap each.
    pub fn take_window(&self) -> StatsWindow {
        StatsWindow {
            video_frames: self.video_frames.swap(0, Ordering::Relaxed),
            enc_bytes: self.enc_bytes.swap(0, Ordering::Relaxed),
            audio_chunks: self.audio_chunks.swap(0, Ordering::Relaxed),
            drop_count: self.drop_count.swap(0, Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_window_reads_and_resets() {
        let stats = Stats::new();
        stats.add_video_frame(100);
        stats.add_video_frame(50);
        stats.add_audio_chunk();
        stats.add_drop(3);

        let window = stats.take_window();
        assert_eq!(window.video_frames, 2);
        assert_eq!(window.enc_bytes, 150);
        assert_eq!(window.audio_chunks, 1);
        assert_eq!(window.drop_count, 3);

        let empty = stats.take_window();
        assert_eq!(empty, StatsWindow::default());
    }

    #[test]
    fn pts_deltas_are_last_value_not_reset_by_take_window() {
        let stats = Stats::new();
        stats.set_video_pts_delta_us(33_000);
        stats.take_window();
        assert_eq!(stats.pts_deltas_us().0, 33_000);
    }
}
