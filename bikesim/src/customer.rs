use serde::Serialize;

use crate::{CustomerId, StationId, Time};

/// How a customer left the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TripOutcome {
    /// Returned the bike at the destination.
    Completed,
    /// Waited too long for a bike and left.
    Abandoned,
    /// The bike was lost or damaged during the ride.
    BikeLost,
}

/// Where the customer currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CustomerStatus {
    /// Just arrived at the origin station, or is being re-dispatched after waiting.
    Arriving,
    /// Waiting in the pickup queue of a station.
    WaitingForPickup(StationId),
    /// Riding a bike.
    Riding,
    /// Waiting in the dropoff queue of a station.
    WaitingForDropoff(StationId),
    /// No longer in the system.
    Finished(TripOutcome),
}

/// A bike sharing customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    id: CustomerId,
    /// Station where the customer picks up a bike.
    pub origin: Option<StationId>,
    /// Station where the customer returns the bike.
    pub destination: Option<StationId>,
    /// When the customer started waiting in the current queue.
    pub wait_start: Option<Time>,
    /// Where the customer currently is.
    pub status: CustomerStatus,
}

impl Customer {
    /// The ID of the customer, unique throughout the entire simulation.
    #[must_use]
    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// Time spent waiting since [`Customer::wait_start`].
    ///
    /// # Panics
    ///
    /// Panics if the customer has not been waiting.
    #[must_use]
    pub fn waited(&self, now: Time) -> Time {
        now - self
            .wait_start
            .unwrap_or_else(|| panic!("customer {} has not been waiting", self.id))
    }
}

/// Stores all customers that entered the system. Customers are referred to by their ID, which is
/// also their position in the store.
#[derive(Debug, Default)]
pub struct Customers {
    customers: Vec<Customer>,
}

impl Customers {
    /// Creates a new customer arriving at `origin` and returns its ID.
    pub fn create(&mut self, origin: StationId) -> CustomerId {
        let id = CustomerId::from(self.customers.len());
        self.customers.push(Customer {
            id,
            origin: Some(origin),
            destination: None,
            wait_start: None,
            status: CustomerStatus::Arriving,
        });
        id
    }

    /// Returns the customer with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not issued by this store.
    #[must_use]
    pub fn get(&self, id: CustomerId) -> &Customer {
        self.customers
            .get(usize::from(id))
            .unwrap_or_else(|| panic!("unknown customer {}", id))
    }

    /// Returns the customer with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID was not issued by this store.
    pub fn get_mut(&mut self, id: CustomerId) -> &mut Customer {
        self.customers
            .get_mut(usize::from(id))
            .unwrap_or_else(|| panic!("unknown customer {}", id))
    }

    /// Number of customers that have ever entered the system.
    #[must_use]
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Checks if no customers have entered the system yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Iterates over all customers in the order of their arrival.
    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    /// Counts customers currently in the given status.
    #[must_use]
    pub fn count(&self, status: CustomerStatus) -> usize {
        self.customers.iter().filter(|c| c.status == status).count()
    }
}
