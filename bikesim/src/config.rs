use rand_chacha::{rand_core::SeedableRng, ChaChaRng};
use serde::{Deserialize, Serialize};

use crate::{
    almost_uniform, ConfigError, Parameters, Time, BIKE_LOSS_PROBABILITY, DAY_DURATION,
    NUM_BIKES, RACKS, REFUND_TIME, TRIP_FEE,
};

/// Configuration of a simulation run.
///
/// Every field has a default, so a configuration file only needs to list the values that differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Total number of bikes, distributed almost uniformly over stations.
    pub total_bikes: usize,
    /// Explicit number of bikes at each station. Overrides `total_bikes`.
    pub initial_distribution: Option<Vec<usize>>,
    /// Number of racks at each station.
    pub racks_per_station: usize,
    /// Multiplier of historical trip counts.
    pub scale_arrival_rate: f64,
    /// Probability of a bike getting lost or damaged during a ride.
    pub bike_loss_probability: f64,
    /// Fee paid for each ride.
    pub trip_fee: f64,
    /// Wait time after which customers give up (pickup) or get refunded (dropoff).
    pub refund_time: Time,
    /// Length of the simulated day in minutes.
    pub day_duration: Time,
    /// Random seed. If missing, the generator is seeded from system entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_bikes: NUM_BIKES,
            initial_distribution: None,
            racks_per_station: RACKS,
            scale_arrival_rate: 1.0,
            bike_loss_probability: BIKE_LOSS_PROBABILITY,
            trip_fee: TRIP_FEE,
            refund_time: REFUND_TIME,
            day_duration: DAY_DURATION,
            seed: None,
        }
    }
}

fn check(name: &'static str, value: f64, valid: bool) -> Result<(), ConfigError> {
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

impl SimulationConfig {
    /// Checks that all parameters are within their valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] for the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = self.bike_loss_probability;
        check("bike_loss_probability", p, (0.0..=1.0).contains(&p))?;
        let scale = self.scale_arrival_rate;
        check("scale_arrival_rate", scale, scale.is_finite() && scale >= 0.0)?;
        let fee = self.trip_fee;
        check("trip_fee", fee, fee.is_finite() && fee >= 0.0)?;
        let refund = self.refund_time;
        check("refund_time", refund, refund.is_finite() && refund >= 0.0)?;
        let day = self.day_duration;
        check("day_duration", day, day.is_finite() && day > 0.0)?;
        check(
            "racks_per_station",
            self.racks_per_station as f64,
            self.racks_per_station > 0,
        )
    }

    /// Number of bikes at each station at the beginning of the day.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DistributionLength`] if the explicit distribution does not match
    /// the number of stations.
    pub fn initial_distribution(&self, num_stations: usize) -> Result<Vec<usize>, ConfigError> {
        match &self.initial_distribution {
            Some(distribution) if distribution.len() != num_stations => {
                Err(ConfigError::DistributionLength {
                    expected: num_stations,
                    actual: distribution.len(),
                })
            }
            Some(distribution) => Ok(distribution.clone()),
            None => Ok(almost_uniform(num_stations, self.total_bikes)),
        }
    }

    /// Model parameters used by the event handlers.
    #[must_use]
    pub fn parameters(&self) -> Parameters {
        Parameters {
            trip_fee: self.trip_fee,
            refund_time: self.refund_time,
            bike_loss_probability: self.bike_loss_probability,
            day_duration: self.day_duration,
            racks_per_station: self.racks_per_station,
        }
    }

    /// Random number generator seeded with [`SimulationConfig::seed`], or from entropy.
    #[must_use]
    pub fn rng(&self) -> ChaChaRng {
        self.seed
            .map_or_else(ChaChaRng::from_entropy, ChaChaRng::seed_from_u64)
    }
}
