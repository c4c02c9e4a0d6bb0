#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::default_trait_access)]

//! This is a general purpose discrete-event simulation library that provides the mechanisms such
//! as: future event list, clock, scheduler, queues, and the engine driving a simulation component.
//!
//! # Examples
//!
//! ```
//! # use desim::{Component, Scheduler, Simulation};
//! struct Counter(usize);
//!
//! impl Component for Counter {
//!     type Event = usize;
//!     type Error = std::convert::Infallible;
//!
//!     fn process_event(
//!         &mut self,
//!         event: usize,
//!         scheduler: &mut Scheduler<usize>,
//!     ) -> Result<(), Self::Error> {
//!         self.0 += 1;
//!         if event > 0 {
//!             scheduler.schedule_after(1.0, event - 1);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut sim = Simulation::new(Counter(0));
//! sim.schedule(0.0, 3).unwrap();
//! assert_eq!(sim.run().unwrap(), 4);
//! assert_eq!(sim.component().0, 4);
//! assert_eq!(sim.time(), 3.0);
//! ```

pub use clock::{Clock, ClockRef};
pub use engine::{Component, Error, Simulation, Status};
pub use queue::{EmptyQueueError, EventEntry, EventQueue, Fifo};
pub use scheduler::Scheduler;

mod clock;
mod engine;
mod queue;
mod scheduler;

/// Logical simulation time. The unit is up to the simulated model.
pub type Time = f64;
