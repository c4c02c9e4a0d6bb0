use crate::{Clock, ClockRef, EmptyQueueError, EventEntry, EventQueue, Time};

/// Scheduler is used to keep the current time and information about the upcoming events.
///
/// Components receive a mutable reference to the scheduler when processing an event, which lets
/// them schedule new events at or after the current time.
#[derive(Debug)]
pub struct Scheduler<E> {
    events: EventQueue<E>,
    clock: Clock,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::starting_at(0.0)
    }
}

impl<E> Scheduler<E> {
    /// Creates a scheduler with an empty event list and the clock set to `time`.
    #[must_use]
    pub fn starting_at(time: Time) -> Self {
        Self {
            events: EventQueue::default(),
            clock: Clock::starting_at(time),
        }
    }

    /// Schedules `event` to be executed at the absolute time `time`.
    ///
    /// # Panics
    ///
    /// Panics if `time` is earlier than the current time or `NaN`.
    pub fn schedule(&mut self, time: Time, event: E) {
        assert!(
            time >= self.time(),
            "cannot schedule an event in the past: now={}, requested={}",
            self.time(),
            time
        );
        self.events.schedule(time, event);
    }

    /// Schedules `event` to be executed at `self.time() + delay`.
    pub fn schedule_after(&mut self, delay: Time, event: E) {
        self.schedule(self.time() + delay, event);
    }

    /// Schedules `event` to be executed at `self.time()`.
    pub fn schedule_immediately(&mut self, event: E) {
        self.schedule(self.time(), event);
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> Time {
        self.clock.time()
    }

    /// Returns a structure with immutable access to the simulation time.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        self.clock.clock_ref()
    }

    /// Removes and returns the next scheduled event, moving the clock to its time.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQueueError`] if there are no events left.
    pub fn pop(&mut self) -> Result<EventEntry<E>, EmptyQueueError> {
        let entry = self.events.pop_earliest()?;
        self.clock.advance(entry.time());
        Ok(entry)
    }

    /// Number of events waiting to be processed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Read-only access to the future event list.
    #[must_use]
    pub fn events(&self) -> &EventQueue<E> {
        &self.events
    }
}
