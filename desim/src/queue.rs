use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use ordered_float::OrderedFloat;

use crate::Time;

/// Returned when popping from an empty [`EventQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no events left in the future event list")]
pub struct EmptyQueueError;

/// Entry type stored in the future event list, including the event value, the time when it is
/// supposed to occur, and the sequence number of its insertion.
#[derive(Debug)]
pub struct EventEntry<E> {
    time: OrderedFloat<Time>,
    seq: u64,
    event: E,
}

impl<E> EventEntry<E> {
    /// The time at which the event occurs.
    #[must_use]
    pub fn time(&self) -> Time {
        self.time.into_inner()
    }

    /// The event value.
    #[must_use]
    pub fn event(&self) -> &E {
        &self.event
    }

    /// Consumes the entry and returns the event value.
    #[must_use]
    pub fn into_event(self) -> E {
        self.event
    }

    fn key(&self) -> (OrderedFloat<Time>, u64) {
        (self.time, self.seq)
    }
}

impl<E> PartialEq for EventEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<E> Eq for EventEntry<E> {}

impl<E> PartialOrd for EventEntry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for EventEntry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Future event list: a priority queue of pending events ordered by their time.
///
/// Events scheduled for the same time are returned in the order they were scheduled.
///
/// # Examples
///
/// ```
/// # use desim::EventQueue;
/// let mut queue = EventQueue::default();
/// queue.schedule(2.0, "later");
/// queue.schedule(1.0, "first");
/// queue.schedule(1.0, "second");
/// assert_eq!(queue.pop_earliest().unwrap().into_event(), "first");
/// assert_eq!(queue.pop_earliest().unwrap().into_event(), "second");
/// assert_eq!(queue.pop_earliest().unwrap().into_event(), "later");
/// assert!(queue.pop_earliest().is_err());
/// ```
#[derive(Debug)]
pub struct EventQueue<E> {
    heap: BinaryHeap<Reverse<EventEntry<E>>>,
    next_seq: u64,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<E> EventQueue<E> {
    /// Inserts `event` to occur at `time`.
    ///
    /// # Panics
    ///
    /// Panics if `time` is `NaN`.
    pub fn schedule(&mut self, time: Time, event: E) {
        assert!(!time.is_nan(), "cannot schedule an event at NaN");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(EventEntry {
            time: OrderedFloat(time),
            seq,
            event,
        }));
    }

    /// Removes and returns the event with the earliest time.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQueueError`] if no events are left.
    pub fn pop_earliest(&mut self) -> Result<EventEntry<E>, EmptyQueueError> {
        self.heap
            .pop()
            .map(|Reverse(entry)| entry)
            .ok_or(EmptyQueueError)
    }

    /// Returns the time of the earliest event without removing it.
    #[must_use]
    pub fn peek_time(&self) -> Option<Time> {
        self.heap.peek().map(|Reverse(entry)| entry.time())
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Checks if there are no pending events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Iterates over pending events in an arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &EventEntry<E>> {
        self.heap.iter().map(|Reverse(entry)| entry)
    }
}

/// First in, first out queue.
///
/// This is a thin abstraction over [`VecDeque`] exposing only queue operations.
///
/// # Examples
///
/// ```
/// # use desim::Fifo;
/// let mut queue: Fifo<i32> = Fifo::default();
/// queue.push_back(1);
/// queue.push_back(2);
/// assert!(queue.contains(&2));
/// assert_eq!(queue.pop_front(), Some(1));
/// assert_eq!(queue.pop_front(), Some(2));
/// assert_eq!(queue.pop_front(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Fifo<T> {
    inner: VecDeque<T>,
}

impl<T> Default for Fifo<T> {
    fn default() -> Self {
        Self {
            inner: VecDeque::new(),
        }
    }
}

impl<T> Fifo<T> {
    /// Appends an element to the back of the queue.
    pub fn push_back(&mut self, value: T) {
        self.inner.push_back(value);
    }

    /// Removes the first element and returns it, or `None` if the queue is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    /// Returns a reference to the first element.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.inner.front()
    }

    /// Returns the number of elements in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks if the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates from the front to the back of the queue.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.iter()
    }
}

impl<T: PartialEq> Fifo<T> {
    /// Checks if `value` is waiting in the queue.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.inner.contains(value)
    }
}
