//! Bike sharing simulation.
//!
//! A fleet of bikes is distributed over stations, each having a fixed number of racks.
//! Customers arrive at stations according to historical trip counts, rent a bike if one is
//! available, ride it to a destination drawn from historical destination probabilities, and
//! return it if a rack is free there. Customers that cannot pick up or drop off wait in line.
//! The simulation is driven by the discrete-event engine from the [`desim`] crate.

#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::default_trait_access,
    clippy::cast_precision_loss
)]

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

pub use desim::Time;

mod arrivals;
pub use arrivals::{almost_uniform, scale_trip_counts, ArrivalSchedules};

mod config;
pub use config::SimulationConfig;

mod customer;
pub use customer::{Customer, CustomerStatus, Customers, TripOutcome};

mod dataset;
pub use dataset::{
    TripData, DESTINATION_PROBABILITIES_FILE, DURATIONS_FILE, TRIP_COUNTS_FILE,
};

mod error;
pub use error::{ConfigError, DatasetError, Error};

mod event;
pub use event::Event;

mod runner;
pub use runner::{build, run, run_with_hook, RunReport};

mod simulation;
pub use simulation::{BikeSharing, Parameters};

mod station;
pub use station::Station;

mod statistics;
pub use statistics::{StationStatistics, Statistics};

mod wait_queue;
pub use wait_queue::{WaitPurpose, WaitQueue};

/// Duration of the simulated day in minutes.
pub const DAY_DURATION: Time = 24.0 * 60.0;

/// Fee for renting a bike.
pub const TRIP_FEE: f64 = 20.0;

/// If a customer has to wait more than this many minutes, they get a refund (if waiting for
/// dropoff), or they will use a different mode of transport (if waiting for pickup).
pub const REFUND_TIME: Time = 5.0;

/// Probability of a bike becoming lost or damaged during a ride.
pub const BIKE_LOSS_PROBABILITY: f64 = 0.001;

/// Default number of bikes in the system.
pub const NUM_BIKES: usize = 12_000;

/// Default number of racks at each station. This is the parking capacity of a station.
pub const RACKS: usize = 30;

/// Time of the initialization event, preceding all arrivals.
pub const INITIALIZE_TIME: Time = -1.0;

/// Station ID.
#[derive(
    From,
    Into,
    Debug,
    PartialEq,
    PartialOrd,
    Eq,
    Ord,
    Serialize,
    Deserialize,
    Copy,
    Clone,
    Hash,
    Display,
)]
pub struct StationId(usize);

/// Customer ID, unique throughout the entire simulation.
#[derive(
    From,
    Into,
    Debug,
    PartialEq,
    PartialOrd,
    Eq,
    Ord,
    Serialize,
    Deserialize,
    Copy,
    Clone,
    Hash,
    Display,
)]
pub struct CustomerId(usize);

/// Index of the timeframe that `time` falls into, when the day of length `day_duration` is
/// split into `num_timeframes` equal parts. Times outside of the day are clamped to the first
/// or last timeframe.
///
/// # Examples
///
/// ```
/// # use bikesim::timeframe;
/// assert_eq!(timeframe(0.0, 1440.0, 4), 0);
/// assert_eq!(timeframe(359.9, 1440.0, 4), 0);
/// assert_eq!(timeframe(360.0, 1440.0, 4), 1);
/// assert_eq!(timeframe(1440.0, 1440.0, 4), 3);
/// assert_eq!(timeframe(2000.0, 1440.0, 4), 3);
/// assert_eq!(timeframe(-1.0, 1440.0, 4), 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn timeframe(time: Time, day_duration: Time, num_timeframes: usize) -> usize {
    let frame = ((time / day_duration) * num_timeframes as f64).floor();
    if frame <= 0.0 {
        0
    } else {
        std::cmp::min(frame as usize, num_timeframes.saturating_sub(1))
    }
}
