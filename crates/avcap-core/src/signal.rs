//! Dedicated SIGINT/SIGTERM waiter.
//!
//! `ctrlc`-style self-pipe handlers work fine for "exit the process", but
//! this pipeline needs to fold a signal into the same cooperative shutdown
//! path everything else uses, from a thread the orchestrator can wake back
//! up on demand during an otherwise-triggered shutdown. That needs the raw
//! POSIX sequence: block the signals process-wide before any worker thread
//! is spawned (so every thread inherits the mask), synchronously `sigwait`
//! them on one dedicated thread, and have the orchestrator `pthread_kill`
//! that specific thread to wake it once shutdown is already underway for
//! some other reason.

use std::io;
use std::mem::MaybeUninit;
use std::os::unix::thread::JoinHandleExt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::pipeline::Queues;
use crate::stop::Shutdown;

fn capture_set() -> libc::sigset_t {
    unsafe {
        let mut set = MaybeUninit::<libc::sigset_t>::uninit();
        libc::sigemptyset(set.as_mut_ptr());
        libc::sigaddset(set.as_mut_ptr(), libc::SIGINT);
        libc::sigaddset(set.as_mut_ptr(), libc::SIGTERM);
        set.assume_init()
    }
}

/// Blocks SIGINT/SIGTERM on the calling thread. Must run before any other
/// worker thread is spawned so the mask is inherited everywhere.
pub fn block_signals() -> io::Result<()> {
    let set = capture_set();
    let rc = unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &set, std::ptr::null_mut()) };
    if rc != 0 {
        return Err(io::Error::from_raw_os_error(rc));
    }
    Ok(())
}

/// Handle to the running signal-waiter thread.
pub struct SignalWaiter {
    join: JoinHandle<()>,
    tid: libc::pthread_t,
}

impl SignalWaiter {
    /// Wake the waiter thread even though no signal has actually arrived,
    /// so it can be joined during an orchestrator-driven shutdown.
    pub fn wake(&self) {
        unsafe {
            libc::pthread_kill(self.tid, libc::SIGTERM);
        }
    }

    pub fn join(self) {
        let _ = self.join.join();
    }
}

/// Spawns the thread that synchronously waits for SIGINT/SIGTERM and, on
/// receiving one, requests pipeline shutdown. Call [`block_signals`] first.
pub fn spawn(shutdown: Arc<Shutdown>, queues: Queues) -> io::Result<SignalWaiter> {
    let join = thread::Builder::new().name("signal-waiter".into()).spawn(move || {
        let set = capture_set();
        let mut signo: libc::c_int = 0;
        let rc = unsafe { libc::sigwait(&set, &mut signo) };
        if rc == 0 && signo != 0 {
            tracing::info!(signal = signo, "received signal, stopping");
            shutdown.request_stop(&queues);
        }
    })?;
    let tid = join.as_pthread_t();
    Ok(SignalWaiter { join, tid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::BoundedQueue;

    fn test_queues() -> Queues {
        Queues {
            raw: Arc::new(BoundedQueue::new(1).unwrap()),
            h264: Arc::new(BoundedQueue::new(1).unwrap()),
            pcm: Arc::new(BoundedQueue::new(1).unwrap()),
        }
    }

    #[test]
    fn sigwait_returning_a_signal_trips_shutdown_and_closes_the_queues() {
        // `wake()` delivers SIGTERM to the waiter's own thread id via
        // `pthread_kill`, the exact mechanism an immediate Ctrl-C relies on
        // (sigwait() consuming a blocked, pending signal) without raising a
        // process-wide signal that could hit an unrelated test thread that
        // hasn't called `block_signals`.
        block_signals().expect("block signals");
        let queues = test_queues();
        let shutdown = Arc::new(Shutdown::new());
        let waiter = spawn(shutdown.clone(), queues.clone()).expect("spawn signal waiter");

        waiter.wake();
        waiter.join();

        assert!(shutdown.should_stop());
        assert!(queues.raw.is_closed());
    }
}
