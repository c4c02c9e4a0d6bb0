use std::collections::VecDeque;

use ndarray::Array2;

use crate::{StationId, Time};

/// Scales the number of trips in each timeframe by `factor`, rounding to the nearest integer.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scale_trip_counts(counts: &Array2<u32>, factor: f64) -> Array2<u32> {
    counts.mapv(|count| (f64::from(count) * factor).round().max(0.0) as u32)
}

/// Distributes `total` bikes over `num_stations` stations as evenly as possible: each station
/// gets `total / num_stations`, and the first `total % num_stations` stations get one more.
///
/// # Examples
///
/// ```
/// # use bikesim::almost_uniform;
/// assert_eq!(almost_uniform(3, 10), vec![4, 3, 3]);
/// assert_eq!(almost_uniform(4, 8), vec![2, 2, 2, 2]);
/// assert!(almost_uniform(0, 8).is_empty());
/// ```
#[must_use]
pub fn almost_uniform(num_stations: usize, total: usize) -> Vec<usize> {
    if num_stations == 0 {
        return Vec::new();
    }
    let base = total / num_stations;
    let remainder = total % num_stations;
    (0..num_stations)
        .map(|s| if s < remainder { base + 1 } else { base })
        .collect()
}

/// Upcoming arrival times at each station, in ascending order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrivalSchedules {
    schedules: Vec<VecDeque<Time>>,
}

impl ArrivalSchedules {
    /// Computes arrival times from trip counts indexed by `[station, timeframe]`.
    ///
    /// The day of length `day_duration` is split into equal timeframes. The `n` arrivals of a
    /// timeframe are evenly spaced, starting at the beginning of the timeframe.
    #[must_use]
    pub fn from_trip_counts(counts: &Array2<u32>, day_duration: Time) -> Self {
        let num_timeframes = counts.ncols();
        let timeframe_length = day_duration / num_timeframes as f64;
        let schedules = counts
            .outer_iter()
            .map(|station_counts| {
                station_counts
                    .iter()
                    .enumerate()
                    .filter(|&(_, &n)| n > 0)
                    .flat_map(|(timeframe, &n)| {
                        let start = timeframe as f64 * timeframe_length;
                        let interval = timeframe_length / f64::from(n);
                        (0..n).map(move |j| start + f64::from(j) * interval)
                    })
                    .collect()
            })
            .collect();
        Self { schedules }
    }

    /// Constructs schedules from explicit arrival times for each station.
    ///
    /// # Panics
    ///
    /// Panics if any of the schedules is not sorted.
    #[must_use]
    pub fn from_times(times: Vec<Vec<Time>>) -> Self {
        for (station, station_times) in times.iter().enumerate() {
            assert!(
                station_times.windows(2).all(|w| w[0] <= w[1]),
                "arrival times of station {} are not sorted",
                station
            );
        }
        Self {
            schedules: times.into_iter().map(VecDeque::from).collect(),
        }
    }

    /// Removes and returns the next arrival time at `station`, or `None` if there are no more
    /// arrivals.
    pub fn pop_next(&mut self, station: StationId) -> Option<Time> {
        self.schedules
            .get_mut(usize::from(station))
            .and_then(VecDeque::pop_front)
    }

    /// Next arrival time at `station` without removing it.
    #[must_use]
    pub fn peek(&self, station: StationId) -> Option<Time> {
        self.schedules
            .get(usize::from(station))
            .and_then(|s| s.front().copied())
    }

    /// Number of upcoming arrivals at `station`.
    #[must_use]
    pub fn remaining(&self, station: StationId) -> usize {
        self.schedules.get(usize::from(station)).map_or(0, VecDeque::len)
    }

    /// Number of upcoming arrivals at all stations.
    #[must_use]
    pub fn total_remaining(&self) -> usize {
        self.schedules.iter().map(VecDeque::len).sum()
    }

    /// Number of stations.
    #[must_use]
    pub fn num_stations(&self) -> usize {
        self.schedules.len()
    }
}
