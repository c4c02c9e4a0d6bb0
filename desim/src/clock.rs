use std::cell::Cell;
use std::rc::Rc;

use crate::Time;

/// Simulation clock.
///
/// The clock is owned by the [`Scheduler`](crate::Scheduler), which is the only one allowed to
/// move it forward. Anybody else can observe it through a [`ClockRef`].
#[derive(Debug)]
pub struct Clock {
    time: Rc<Cell<Time>>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::starting_at(0.0)
    }
}

impl Clock {
    /// Creates a clock set to `time`.
    ///
    /// # Panics
    ///
    /// Panics if `time` is `NaN`.
    #[must_use]
    pub fn starting_at(time: Time) -> Self {
        assert!(!time.is_nan(), "clock cannot start at NaN");
        Self {
            time: Rc::new(Cell::new(time)),
        }
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> Time {
        self.time.get()
    }

    /// Moves the clock forward to `time`.
    ///
    /// # Panics
    ///
    /// Panics if `time` is earlier than the current time. The clock never moves backwards, and
    /// if it would, then some event has been scheduled in the past.
    pub(crate) fn advance(&self, time: Time) {
        let now = self.time.get();
        assert!(
            time >= now,
            "clock moving backwards: current={}, target={}",
            now,
            time
        );
        self.time.replace(time);
    }

    /// Returns a structure with immutable access to the simulation time.
    #[must_use]
    pub fn clock_ref(&self) -> ClockRef {
        ClockRef {
            time: Rc::clone(&self.time),
        }
    }
}

/// This struct has only immutable access to the simulation clock exposed.
#[derive(Debug, Clone)]
pub struct ClockRef {
    time: Rc<Cell<Time>>,
}

impl ClockRef {
    /// Return the current simulation time.
    #[must_use]
    pub fn time(&self) -> Time {
        self.time.get()
    }
}
