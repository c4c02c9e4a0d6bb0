//! Test fixtures for the bike sharing simulation.

#![warn(
    missing_docs,
    rust_2018_idioms,
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

use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaChaRng};

pub mod logger;

/// Raw trip statistics in the same layout as the dataset files:
/// trip counts `[station][timeframe]`, average durations `[origin][destination]`,
/// and destination probabilities `[origin][timeframe][destination]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNetwork {
    /// Number of trips starting at a station in a timeframe.
    pub trip_counts: Vec<Vec<u32>>,
    /// Average trip duration in minutes between two stations.
    pub durations: Vec<Vec<f64>>,
    /// Probability of choosing a destination given the origin and timeframe.
    pub destination_probabilities: Vec<Vec<Vec<f64>>>,
}

impl RawNetwork {
    /// Number of stations.
    #[must_use]
    pub fn num_stations(&self) -> usize {
        self.trip_counts.len()
    }

    /// Number of timeframes in a day.
    #[must_use]
    pub fn num_timeframes(&self) -> usize {
        self.trip_counts.first().map_or(0, Vec::len)
    }
}

/// Three stations with quarterly timeframes.
///
/// From station 0 during the first timeframe, the only possible destination is station 2.
#[must_use]
pub fn three_stations() -> RawNetwork {
    RawNetwork {
        trip_counts: vec![vec![4, 1, 2, 3], vec![5, 1, 2, 3], vec![3, 1, 2, 3]],
        durations: vec![
            vec![0.0, 0.25, 0.1],
            vec![0.65, 0.0, 0.8],
            vec![0.1, 1.2, 0.0],
        ],
        destination_probabilities: vec![
            vec![
                vec![0.0, 0.0, 1.0],
                vec![0.0, 0.4, 0.6],
                vec![0.0, 0.4, 0.6],
                vec![0.0, 0.4, 0.6],
            ],
            vec![vec![0.3, 0.0, 0.7]; 4],
            vec![vec![0.5, 0.5, 0.0]; 4],
        ],
    }
}

/// Generates a random network with the given dimensions.
///
/// Trip counts are drawn from `0..=max_trips`, durations from `[1, 60)` minutes, and every
/// destination distribution is a normalized vector of random weights.
#[must_use]
pub fn random_network(
    num_stations: usize,
    num_timeframes: usize,
    max_trips: u32,
    seed: u64,
) -> RawNetwork {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    let trip_counts = (0..num_stations)
        .map(|_| {
            (0..num_timeframes)
                .map(|_| rng.gen_range(0..=max_trips))
                .collect()
        })
        .collect();
    let durations = (0..num_stations)
        .map(|origin| {
            (0..num_stations)
                .map(|destination| {
                    if origin == destination {
                        0.0
                    } else {
                        rng.gen_range(1.0..60.0)
                    }
                })
                .collect()
        })
        .collect();
    let destination_probabilities = (0..num_stations)
        .map(|_| {
            (0..num_timeframes)
                .map(|_| {
                    let weights: Vec<f64> =
                        (0..num_stations).map(|_| rng.gen_range(0.1..1.0)).collect();
                    let sum: f64 = weights.iter().sum();
                    weights.into_iter().map(|w| w / sum).collect()
                })
                .collect()
        })
        .collect();
    RawNetwork {
        trip_counts,
        durations,
        destination_probabilities,
    }
}
