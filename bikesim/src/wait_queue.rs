use desim::Fifo;

use crate::{CustomerId, StationId};

/// What the customers in a [`WaitQueue`] are waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum WaitPurpose {
    /// Waiting for a bike to become available.
    Pickup,
    /// Waiting for a rack to become available.
    Dropoff,
}

/// FIFO line of customers waiting at a single station.
#[derive(Debug)]
pub struct WaitQueue {
    station: StationId,
    purpose: WaitPurpose,
    customers: Fifo<CustomerId>,
}

impl WaitQueue {
    /// Constructs an empty queue.
    #[must_use]
    pub fn new(station: StationId, purpose: WaitPurpose) -> Self {
        Self {
            station,
            purpose,
            customers: Fifo::default(),
        }
    }

    /// Station at which the customers wait.
    #[must_use]
    pub fn station(&self) -> StationId {
        self.station
    }

    /// What the customers wait for.
    #[must_use]
    pub fn purpose(&self) -> WaitPurpose {
        self.purpose
    }

    /// Appends a customer at the end of the line.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the customer is already in this queue.
    pub fn push(&mut self, customer: CustomerId) {
        debug_assert!(
            !self.customers.contains(&customer),
            "customer {} is already waiting for {} at station {}",
            customer,
            self.purpose,
            self.station
        );
        self.customers.push_back(customer);
    }

    /// Removes the customer at the front of the line.
    pub fn pop(&mut self) -> Option<CustomerId> {
        self.customers.pop_front()
    }

    /// Customer at the front of the line.
    #[must_use]
    pub fn front(&self) -> Option<CustomerId> {
        self.customers.front().copied()
    }

    /// Checks if the customer is in the line.
    #[must_use]
    pub fn contains(&self, customer: CustomerId) -> bool {
        self.customers.contains(&customer)
    }

    /// Number of waiting customers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Checks if nobody is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Iterates over waiting customers, front to back.
    pub fn iter(&self) -> impl Iterator<Item = CustomerId> + '_ {
        self.customers.iter().copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = WaitQueue::new(StationId::from(2), WaitPurpose::Pickup);
        assert!(queue.is_empty());
        queue.push(CustomerId::from(5));
        queue.push(CustomerId::from(1));
        queue.push(CustomerId::from(3));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.front(), Some(CustomerId::from(5)));
        assert!(queue.contains(CustomerId::from(1)));
        assert_eq!(
            queue.iter().collect::<Vec<_>>(),
            vec![CustomerId::from(5), CustomerId::from(1), CustomerId::from(3)]
        );
        assert_eq!(queue.pop(), Some(CustomerId::from(5)));
        assert_eq!(queue.pop(), Some(CustomerId::from(1)));
        assert_eq!(queue.pop(), Some(CustomerId::from(3)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "customer 1 is already waiting for dropoff at station 0")]
    fn test_push_twice() {
        let mut queue = WaitQueue::new(StationId::from(0), WaitPurpose::Dropoff);
        queue.push(CustomerId::from(1));
        queue.push(CustomerId::from(1));
    }
}
