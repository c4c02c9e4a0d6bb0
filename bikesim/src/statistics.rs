use serde::Serialize;

use crate::{StationId, Time};

/// Aggregate outcome of a simulation run.
///
/// Per-station vectors are indexed by station ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Fees collected minus refunds issued.
    pub revenue: f64,
    /// Total time customers spent waiting for a bike at each station.
    pub pickup_wait: Vec<Time>,
    /// Total time customers spent waiting for a rack at each station.
    pub dropoff_wait: Vec<Time>,
    /// Number of customers that gave up waiting for a bike at each station.
    pub customers_lost: Vec<usize>,
    /// Number of bikes lost or damaged during rides.
    pub bikes_lost: usize,
    /// Bike-minutes during which bikes stood unused at each station.
    pub idle_time: Vec<Time>,
    /// Number of rides that were paid for.
    pub paid_rides: usize,
    /// Number of refunds issued for long dropoff waits.
    pub refunds: usize,
    /// Number of bikes successfully returned.
    pub completed_trips: usize,
}

/// Statistics of a single station, one row of the per-station output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStatistics {
    /// Station ID.
    pub station: StationId,
    /// See [`Statistics::pickup_wait`].
    pub pickup_wait: Time,
    /// See [`Statistics::dropoff_wait`].
    pub dropoff_wait: Time,
    /// See [`Statistics::customers_lost`].
    pub customers_lost: usize,
    /// See [`Statistics::idle_time`].
    pub idle_time: Time,
}

impl Statistics {
    /// Zeroed statistics for `num_stations` stations.
    #[must_use]
    pub fn new(num_stations: usize) -> Self {
        Self {
            revenue: 0.0,
            pickup_wait: vec![0.0; num_stations],
            dropoff_wait: vec![0.0; num_stations],
            customers_lost: vec![0; num_stations],
            bikes_lost: 0,
            idle_time: vec![0.0; num_stations],
            paid_rides: 0,
            refunds: 0,
            completed_trips: 0,
        }
    }

    /// Number of stations covered.
    #[must_use]
    pub fn num_stations(&self) -> usize {
        self.idle_time.len()
    }

    pub(crate) fn charge(&mut self, fee: f64) {
        self.revenue += fee;
        self.paid_rides += 1;
    }

    pub(crate) fn refund(&mut self, fee: f64) {
        self.revenue -= fee;
        self.refunds += 1;
    }

    /// Total pickup waiting time over all stations.
    #[must_use]
    pub fn total_pickup_wait(&self) -> Time {
        self.pickup_wait.iter().sum()
    }

    /// Total dropoff waiting time over all stations.
    #[must_use]
    pub fn total_dropoff_wait(&self) -> Time {
        self.dropoff_wait.iter().sum()
    }

    /// Total number of customers lost over all stations.
    #[must_use]
    pub fn total_customers_lost(&self) -> usize {
        self.customers_lost.iter().sum()
    }

    /// Total idle bike-time over all stations.
    #[must_use]
    pub fn total_idle_time(&self) -> Time {
        self.idle_time.iter().sum()
    }

    /// Per-station rows, ordered by station ID.
    #[must_use]
    pub fn station_rows(&self) -> Vec<StationStatistics> {
        (0..self.num_stations())
            .map(|s| StationStatistics {
                station: StationId::from(s),
                pickup_wait: self.pickup_wait[s],
                dropoff_wait: self.dropoff_wait[s],
                customers_lost: self.customers_lost[s],
                idle_time: self.idle_time[s],
            })
            .collect()
    }
}
