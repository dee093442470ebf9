//! Bounded, closable, multi-producer/multi-consumer FIFO.
//!
//! One [`std::sync::Condvar`] guards both "not empty" and "not full" the way
//! a single-condvar queue that broadcasts on every state change does: a
//! `notify_all()` after every push and pop wakes whichever side is waiting.
//! Two condvars would save a handful of spurious wakeups under heavy
//! contention, but this pipeline's queues are shallow (8/64/256 slots) and
//! low-frequency enough that the simpler single-condvar design is the right
//! tradeoff.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use crate::error::QueueError;

#[derive(Debug)]
struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// A fixed-capacity FIFO that can be closed to wake up blocked producers and consumers.
///
/// Once closed, `push`/`try_push` reject new items (returning them back to the
/// caller) and `pop` continues to drain whatever was already queued before
/// returning `None`.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>,
    cv: Condvar,
}

/// Returned when an item could not be accepted because the queue is closed.
/// Carries the item back so the caller can decide what to do with it.
#[derive(Debug)]
pub struct Closed<T>(pub T);

/// Outcome of a non-blocking push attempt.
#[derive(Debug)]
pub enum TryPushOutcome<T> {
    Accepted,
    /// Queue was open but at capacity; the item was not enqueued.
    Full(T),
    Closed(T),
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::BadArg);
        }
        Ok(Self {
            capacity,
            inner: Mutex::new(Inner { items: VecDeque::with_capacity(capacity), closed: false }),
            cv: Condvar::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current depth. Racy by design: useful for stats/logging, not for control flow.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Enqueue without blocking. Drops the item back to the caller if the
    /// queue is full or closed rather than waiting for room.
    pub fn try_push(&self, item: T) -> TryPushOutcome<T> {
        let mut guard = self.inner.lock().unwrap();
        if guard.closed {
            return TryPushOutcome::Closed(item);
        }
        if guard.items.len() >= self.capacity {
            return TryPushOutcome::Full(item);
        }
        guard.items.push_back(item);
        drop(guard);
        self.cv.notify_all();
        TryPushOutcome::Accepted
    }

    /// Enqueue, blocking while the queue is full. Returns the item back if
    /// the queue is closed, whether it was already closed on entry or was
    /// closed while waiting for room.
    pub fn push(&self, item: T) -> Result<(), Closed<T>> {
        let mut guard = self.inner.lock().unwrap();
        loop {
            if guard.closed {
                return Err(Closed(item));
            }
            if guard.items.len() < self.capacity {
                guard.items.push_back(item);
                drop(guard);
                self.cv.notify_all();
                return Ok(());
            }
            guard = self.cv.wait(guard).unwrap();
        }
    }

    /// Dequeue, blocking while the queue is empty and open. Returns `None`
    /// once the queue is closed and drained.
    pub fn pop(&self) -> Option<T> {
        let mut guard = self.inner.lock().unwrap();
        loop {
            if let Some(item) = guard.items.pop_front() {
                drop(guard);
                self.cv.notify_all();
                return Some(item);
            }
            if guard.closed {
                return None;
            }
            guard = self.cv.wait(guard).unwrap();
        }
    }

    /// Mark the queue closed and wake everyone waiting on it. Idempotent.
    pub fn close(&self) {
        let mut guard = self.inner.lock().unwrap();
        guard.closed = true;
        drop(guard);
        self.cv.notify_all();
    }

    /// Drop every remaining item. Call only after every producer/consumer
    /// thread touching this queue has joined.
    pub fn drain(&self) {
        let mut guard = self.inner.lock().unwrap();
        guard.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn new_rejects_zero_capacity() {
        assert_eq!(BoundedQueue::<u8>::new(0).unwrap_err(), QueueError::BadArg);
    }

    #[test]
    fn try_push_full_returns_item() {
        let q: BoundedQueue<i32> = BoundedQueue::new(1).unwrap();
        assert!(matches!(q.try_push(1), TryPushOutcome::Accepted));
        match q.try_push(2) {
            TryPushOutcome::Full(v) => assert_eq!(v, 2),
            other => panic!("expected Full, got {other:?}"),
        }
    }

    #[test]
    fn try_push_after_close_returns_item() {
        let q: BoundedQueue<i32> = BoundedQueue::new(4).unwrap();
        q.close();
        match q.try_push(7) {
            TryPushOutcome::Closed(v) => assert_eq!(v, 7),
            other => panic!("expected Closed, got {other:?}"),
        }
    }

    #[test]
    fn pop_drains_before_reporting_closed() {
        let q: BoundedQueue<i32> = BoundedQueue::new(4).unwrap();
        q.try_push(1);
        q.try_push(2);
        q.close();
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn push_blocks_until_room_then_succeeds() {
        let q = Arc::new(BoundedQueue::<i32>::new(1).unwrap());
        q.try_push(0);
        let barrier = Arc::new(Barrier::new(2));

        let q2 = q.clone();
        let b2 = barrier.clone();
        let handle = thread::spawn(move || {
            b2.wait();
            q2.push(1).unwrap();
        });

        barrier.wait();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(q.pop(), Some(0));
        handle.join().unwrap();
        assert_eq!(q.pop(), Some(1));
    }

    #[test]
    fn push_unblocks_with_closed_error_on_close() {
        let q = Arc::new(BoundedQueue::<i32>::new(1).unwrap());
        q.try_push(0);
        let barrier = Arc::new(Barrier::new(2));

        let q2 = q.clone();
        let b2 = barrier.clone();
        let handle = thread::spawn(move || {
            b2.wait();
            q2.push(1)
        });

        barrier.wait();
        thread::sleep(Duration::from_millis(20));
        q.close();
        let Closed(v) = handle.join().unwrap().unwrap_err();
        assert_eq!(v, 1);
    }

    #[test]
    fn pop_unblocks_with_none_on_close() {
        let q = Arc::new(BoundedQueue::<i32>::new(4).unwrap());
        let q2 = q.clone();
        let handle = thread::spawn(move || q2.pop());
        thread::sleep(Duration::from_millis(20));
        q.close();
        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn drain_clears_remaining_items() {
        let q: BoundedQueue<i32> = BoundedQueue::new(4).unwrap();
        q.try_push(1);
        q.try_push(2);
        q.drain();
        assert_eq!(q.len(), 0);
    }
}
