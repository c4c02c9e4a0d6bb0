use std::fmt;

use crate::{ClockRef, Scheduler, Time};

/// Implementors hold the entire mutable state of a simulated model and react to its events.
///
/// Exactly one event is processed at a time, to completion. While processing, the component can
/// schedule any number of new events through the `scheduler`, at or after the current time.
pub trait Component {
    /// Type of events processed by this component.
    type Event: fmt::Debug;

    /// Error returned when an event cannot be processed, e.g., due to invalid configuration.
    type Error: std::error::Error + 'static;

    /// Processes a single event that occurs at `scheduler.time()`.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the simulation.
    fn process_event(
        &mut self,
        event: Self::Event,
        scheduler: &mut Scheduler<Self::Event>,
    ) -> Result<(), Self::Error>;
}

/// Errors returned by the [`Simulation`] engine.
#[derive(Debug, thiserror::Error)]
pub enum Error<E: std::error::Error + 'static> {
    /// The engine has finished its run and cannot be reused.
    #[error("simulation has already completed; a new engine is required for another run")]
    Completed,
    /// The component failed to process an event.
    #[error("failed to process event at time {time}")]
    Handler {
        /// Time of the failed event.
        time: Time,
        /// Error returned by the component.
        #[source]
        source: E,
    },
}

/// Lifecycle of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No event has been processed yet.
    Idle,
    /// Events are being processed.
    Running,
    /// The event list was exhausted, the event budget was reached, or an event failed.
    /// This state is terminal.
    Completed,
}

/// The main simulation object: drives a single [`Component`] by repeatedly popping the earliest
/// event, advancing the clock, and calling the component's handler.
pub struct Simulation<C: Component> {
    scheduler: Scheduler<C::Event>,
    component: C,
    status: Status,
    processed: usize,
}

impl<C: Component> Simulation<C> {
    /// Creates a new simulation with the clock at time 0.
    pub fn new(component: C) -> Self {
        Self::starting_at(0.0, component)
    }

    /// Creates a new simulation with the clock at `time`.
    pub fn starting_at(time: Time, component: C) -> Self {
        Self {
            scheduler: Scheduler::starting_at(time),
            component,
            status: Status::Idle,
            processed: 0,
        }
    }

    /// Schedules `event` at the absolute time `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Completed`] if the simulation has already completed.
    pub fn schedule(&mut self, time: Time, event: C::Event) -> Result<(), Error<C::Error>> {
        self.ensure_not_completed()?;
        self.scheduler.schedule(time, event);
        Ok(())
    }

    /// Processes exactly one event. Returns `false` if there were no events left, in which case
    /// the simulation is completed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Completed`] if called on a completed simulation, or [`Error::Handler`]
    /// if the component failed to process the event.
    pub fn step(&mut self) -> Result<bool, Error<C::Error>> {
        self.ensure_not_completed()?;
        self.status = Status::Running;
        let entry = if let Ok(entry) = self.scheduler.pop() {
            entry
        } else {
            self.status = Status::Completed;
            return Ok(false);
        };
        let time = entry.time();
        log::trace!("[{:.3}] {:?}", time, entry.event());
        if let Err(source) = self
            .component
            .process_event(entry.into_event(), &mut self.scheduler)
        {
            self.status = Status::Completed;
            return Err(Error::Handler { time, source });
        }
        self.processed += 1;
        Ok(true)
    }

    /// Processes all events until none are left. Returns the number of processed events.
    ///
    /// # Errors
    ///
    /// See [`Simulation::run_with_hook`].
    pub fn run(&mut self) -> Result<usize, Error<C::Error>> {
        self.run_for(usize::MAX)
    }

    /// Processes at most `max_events` events. Any remaining events stay in the queue untouched.
    /// Returns the number of processed events.
    ///
    /// # Errors
    ///
    /// See [`Simulation::run_with_hook`].
    pub fn run_for(&mut self, max_events: usize) -> Result<usize, Error<C::Error>> {
        self.run_with_hook(max_events, |_, _| {})
    }

    /// Processes at most `max_events` events, calling `hook` with the current time and the
    /// component after each of them. The simulation is completed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Completed`] if called on a completed simulation, or [`Error::Handler`]
    /// if the component failed to process an event.
    pub fn run_with_hook<F>(
        &mut self,
        max_events: usize,
        mut hook: F,
    ) -> Result<usize, Error<C::Error>>
    where
        F: FnMut(Time, &C),
    {
        self.ensure_not_completed()?;
        let mut processed = 0;
        while processed < max_events && self.step()? {
            processed += 1;
            hook(self.scheduler.time(), &self.component);
        }
        self.status = Status::Completed;
        log::debug!("Simulation completed after {} events", processed);
        Ok(processed)
    }

    /// Current simulation time.
    #[must_use]
    pub fn time(&self) -> Time {
        self.scheduler.time()
    }

    /// Returns a structure with immutable access to the simulation time.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        self.scheduler.clock()
    }

    /// Current status of the simulation.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Total number of events processed so far.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Read-only access to the scheduler, e.g., to inspect pending events.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler<C::Event> {
        &self.scheduler
    }

    /// The simulated component.
    #[must_use]
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Mutable access to the simulated component.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Consumes the simulation and returns the component.
    pub fn into_component(self) -> C {
        self.component
    }

    fn ensure_not_completed(&self) -> Result<(), Error<C::Error>> {
        if self.status == Status::Completed {
            Err(Error::Completed)
        } else {
            Ok(())
        }
    }
}
