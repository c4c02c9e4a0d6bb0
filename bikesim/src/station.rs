use crate::{ConfigError, StationId, Time};

/// A bike station with a fixed number of racks.
///
/// Each rack either holds an available bike or is an available spot to return a bike, so
/// `available_bikes() + available_racks() == racks()` at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    id: StationId,
    racks: usize,
    bikes: usize,
    last_event: Time,
}

impl Station {
    /// Constructs a station with `racks` racks, `bikes` of which hold a bike.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooManyBikes`] if there are more bikes than racks.
    pub fn new(id: StationId, racks: usize, bikes: usize) -> Result<Self, ConfigError> {
        if bikes > racks {
            return Err(ConfigError::TooManyBikes {
                station: id,
                bikes,
                racks,
            });
        }
        Ok(Self {
            id,
            racks,
            bikes,
            last_event: 0.0,
        })
    }

    /// Station ID.
    #[must_use]
    pub fn id(&self) -> StationId {
        self.id
    }

    /// Total number of racks.
    #[must_use]
    pub fn racks(&self) -> usize {
        self.racks
    }

    /// Number of bikes ready to be picked up.
    #[must_use]
    pub fn available_bikes(&self) -> usize {
        self.bikes
    }

    /// Number of empty racks ready for a bike to be returned.
    #[must_use]
    pub fn available_racks(&self) -> usize {
        self.racks - self.bikes
    }

    /// Time of the last idle time accrual.
    #[must_use]
    pub fn last_event(&self) -> Time {
        self.last_event
    }

    /// Returns the bike-time the available bikes spent idle since the last accrual, and marks
    /// `now` as the last accrual time.
    pub fn accrue_idle_time(&mut self, now: Time) -> Time {
        let idle = self.bikes as f64 * (now - self.last_event);
        self.last_event = now;
        idle
    }

    /// A customer takes a bike, freeing a rack.
    ///
    /// # Panics
    ///
    /// Panics if no bike is available.
    pub fn take_bike(&mut self) {
        assert!(self.bikes > 0, "no bikes available at station {}", self.id);
        self.bikes -= 1;
    }

    /// A customer returns a bike, occupying a rack.
    ///
    /// # Panics
    ///
    /// Panics if no rack is available.
    pub fn return_bike(&mut self) {
        assert!(
            self.bikes < self.racks,
            "no racks available at station {}",
            self.id
        );
        self.bikes += 1;
    }
}
