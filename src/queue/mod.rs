//! Blocking, thread-safe event queue.
//!
//! [`EventQueue`] is a double-ended queue guarded by a mutex/condition-variable
//! pair. Any number of producers may `put` concurrently; consumers block in
//! [`EventQueue::wait_and_pop`] until an element is available. Priority
//! insertion prepends to the head, so back-to-back priority puts are served
//! last-in first-out among themselves.

pub mod mailbox;

pub use mailbox::{Envelope, Mailbox};

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Outcome of a bounded wait on an [`EventQueue`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PopResult<T> {
    /// An element was removed from the head of the queue.
    Item(T),
    /// No element became available before the timeout elapsed.
    TimedOut,
}

impl<T> PopResult<T> {
    /// Convert into an `Option`, mapping a timeout to `None`.
    pub fn into_item(self) -> Option<T> {
        match self {
            Self::Item(item) => Some(item),
            Self::TimedOut => None,
        }
    }

    /// Returns `true` if the wait timed out.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// Thread-safe FIFO queue with front insertion for prioritized elements.
///
/// # Example
///
/// ```rust
/// use strata::queue::EventQueue;
///
/// let queue = EventQueue::new();
/// queue.put(1);
/// queue.put(2);
/// queue.put_prioritized(9);
///
/// assert_eq!(queue.wait_and_pop(), 9);
/// assert_eq!(queue.wait_and_pop(), 1);
/// assert_eq!(queue.wait_and_pop(), 2);
/// ```
#[derive(Debug)]
pub struct EventQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> EventQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Append an element to the tail and wake one waiter.
    pub fn put(&self, item: T) {
        self.items.lock().push_back(item);
        self.available.notify_one();
    }

    /// Prepend an element to the head and wake one waiter.
    ///
    /// The element is served before everything already queued.
    pub fn put_prioritized(&self, item: T) {
        self.items.lock().push_front(item);
        self.available.notify_one();
    }

    /// Block until the queue is non-empty, then remove and return the head.
    pub fn wait_and_pop(&self) -> T {
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return item;
            }
            self.available.wait(&mut items);
        }
    }

    /// Like [`wait_and_pop`](Self::wait_and_pop), but gives up after `timeout`.
    ///
    /// Nothing is removed when the wait times out. A timeout too large to
    /// express as a deadline waits without bound.
    pub fn wait_and_pop_for(&self, timeout: Duration) -> PopResult<T> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return PopResult::Item(self.wait_and_pop());
        };
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                return PopResult::Item(item);
            }
            if self.available.wait_until(&mut items, deadline).timed_out() {
                // An element may have landed between the wake-up and the deadline.
                return match items.pop_front() {
                    Some(item) => PopResult::Item(item),
                    None => PopResult::TimedOut,
                };
            }
        }
    }

    /// Remove the head without blocking.
    pub fn try_pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Advisory snapshot; may be stale as soon as it returns.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Advisory snapshot of the number of queued elements.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Drop every queued element without processing it.
    ///
    /// Threads blocked in `wait_and_pop` keep waiting.
    pub fn clear(&self) {
        self.items.lock().clear();
    }

    /// Replace the storage with a fresh, empty deque, releasing its capacity.
    pub fn reset(&self) {
        *self.items.lock() = VecDeque::new();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
