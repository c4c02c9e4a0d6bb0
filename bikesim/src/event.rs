use crate::{CustomerId, StationId};

/// Events processed by the [`BikeSharing`](crate::BikeSharing) simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Creates stations with the given number of bikes each and schedules the first arrivals.
    Initialize {
        /// Number of bikes at each station.
        initial_distribution: Vec<usize>,
    },
    /// A customer wants to pick up a bike at `station`.
    ///
    /// If `customer` is `None`, a new customer enters the system. Otherwise, a customer that
    /// waited for a bike is dispatched again.
    Arrival {
        /// Station of the arrival.
        station: StationId,
        /// Customer re-dispatched from the pickup queue.
        customer: Option<CustomerId>,
    },
    /// A customer arrives at the destination and tries to return the bike.
    BikeReturn {
        /// Riding customer.
        customer: CustomerId,
    },
    /// The bike of a customer was lost or damaged during the ride.
    BikeLoss {
        /// Riding customer.
        customer: CustomerId,
    },
}
