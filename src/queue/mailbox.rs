//! Sender handle for an actor's event queue.

use super::EventQueue;
use std::fmt;
use std::sync::Arc;

/// Queue entry delivered to an actor worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Envelope<E> {
    /// An application event to dispatch to the state machine.
    Event(E),
    /// Sentinel that makes the worker leave its loop.
    Shutdown,
}

/// Cloneable handle used to enqueue events for one actor.
///
/// Every clone feeds the same underlying [`EventQueue`], so a mailbox can be
/// moved into another thread or captured by a bus subscriber.
pub struct Mailbox<E> {
    queue: Arc<EventQueue<Envelope<E>>>,
}

impl<E> Mailbox<E> {
    /// Create a mailbox backed by a fresh queue.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(EventQueue::new()),
        }
    }

    /// Enqueue an event at the tail. Never blocks.
    pub fn send(&self, event: E) {
        self.queue.put(Envelope::Event(event));
    }

    /// Enqueue an event ahead of everything already queued.
    pub fn send_prioritized(&self, event: E) {
        self.queue.put_prioritized(Envelope::Event(event));
    }

    /// Advisory snapshot of pending entries.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Advisory emptiness check.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns `true` if both handles feed the same queue.
    pub fn same_queue(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.queue, &other.queue)
    }

    /// Drop pending events and wake the worker with a shutdown sentinel.
    pub(crate) fn shutdown(&self) {
        self.queue.clear();
        self.queue.put_prioritized(Envelope::Shutdown);
    }

    /// Drop a sentinel left behind by a worker that exited early.
    pub(crate) fn discard_pending(&self) {
        self.queue.reset();
    }

    pub(crate) fn recv(&self) -> Envelope<E> {
        self.queue.wait_and_pop()
    }

    pub(crate) fn try_recv(&self) -> Option<Envelope<E>> {
        self.queue.try_pop()
    }
}

impl<E> Clone for Mailbox<E> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<E> Default for Mailbox<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Mailbox<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox").field("len", &self.len()).finish()
    }
}
