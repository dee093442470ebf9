//! Cooperative shutdown latch.
//!
//! No thread is ever killed. Every worker loop polls [`Shutdown::should_stop`]
//! or reacts to its queues being closed, and exactly one caller — whichever
//! thread first calls [`Shutdown::request_stop`] — is responsible for closing
//! the queues, guaranteed by a single atomic compare-and-swap.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::pipeline::Queues;

/// A one-shot, idempotent "please stop" flag.
pub struct StopLatch {
    flag: AtomicBool,
}

impl StopLatch {
    pub fn new() -> Self {
        Self { flag: AtomicBool::new(false) }
    }

    pub fn should_stop(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Flips the latch. Returns `true` only for the caller that actually
    /// performed the false-to-true transition.
    fn trip(&self) -> bool {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for StopLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Pairs a [`StopLatch`] with the queues it is responsible for closing.
pub struct Shutdown {
    latch: StopLatch,
}

impl Shutdown {
    pub fn new() -> Self {
        Self { latch: StopLatch::new() }
    }

    pub fn should_stop(&self) -> bool {
        self.latch.should_stop()
    }

    /// Requests pipeline shutdown. The first caller to observe the
    /// not-yet-stopping state closes all three queues, which wakes every
    /// thread parked on a `push`/`pop` call. Safe to call from any thread,
    /// any number of times.
    pub fn request_stop(&self, queues: &Queues) {
        if self.latch.trip() {
            queues.raw.close();
            queues.h264.close();
            queues.pcm.close();
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
