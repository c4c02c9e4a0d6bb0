use desim::{Component, Scheduler, Simulation};
use rand::Rng;
use rand_chacha::ChaChaRng;
use rand_distr::{Distribution, WeightedAliasIndex};

use crate::{
    timeframe, ArrivalSchedules, ConfigError, CustomerId, CustomerStatus, Customers, DatasetError,
    Event, Station, StationId, Statistics, Time, TripData, TripOutcome, WaitPurpose, WaitQueue,
    BIKE_LOSS_PROBABILITY, DAY_DURATION, INITIALIZE_TIME, RACKS, REFUND_TIME, TRIP_FEE,
};

/// Parameters of the bike sharing model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Fee paid for each ride.
    pub trip_fee: f64,
    /// Wait time after which customers give up (pickup) or get refunded (dropoff).
    pub refund_time: Time,
    /// Probability of a bike getting lost or damaged during a ride.
    pub bike_loss_probability: f64,
    /// Length of the simulated day. Idle time is only accrued within the day.
    pub day_duration: Time,
    /// Number of racks at each station.
    pub racks_per_station: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            trip_fee: TRIP_FEE,
            refund_time: REFUND_TIME,
            bike_loss_probability: BIKE_LOSS_PROBABILITY,
            day_duration: DAY_DURATION,
            racks_per_station: RACKS,
        }
    }
}

/// Bike sharing system: the state mutated by the event handlers.
pub struct BikeSharing<R: Rng = ChaChaRng> {
    params: Parameters,
    data: TripData,
    destinations: Destinations,
    arrivals: ArrivalSchedules,
    stations: Vec<Station>,
    pickup_queues: Vec<WaitQueue>,
    dropoff_queues: Vec<WaitQueue>,
    customers: Customers,
    statistics: Statistics,
    rng: R,
}

impl<R: Rng> BikeSharing<R> {
    /// Constructs a system without stations. Stations are created when processing
    /// [`Event::Initialize`].
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Weights`] if destination probabilities cannot be sampled from.
    ///
    /// # Panics
    ///
    /// Panics if `arrivals` and `data` have different numbers of stations.
    pub fn new(
        params: Parameters,
        data: TripData,
        arrivals: ArrivalSchedules,
        rng: R,
    ) -> Result<Self, DatasetError> {
        assert_eq!(
            arrivals.num_stations(),
            data.num_stations(),
            "arrival schedules must cover all stations"
        );
        let destinations = calc_destinations(&data)?;
        let statistics = Statistics::new(data.num_stations());
        Ok(Self {
            params,
            data,
            destinations,
            arrivals,
            stations: Vec::new(),
            pickup_queues: Vec::new(),
            dropoff_queues: Vec::new(),
            customers: Customers::default(),
            statistics,
            rng,
        })
    }

    /// Wraps the system in a simulation starting at [`INITIALIZE_TIME`], with the
    /// [`Event::Initialize`] event already scheduled.
    ///
    /// # Errors
    ///
    /// Never fails for a new simulation; the error is propagated from
    /// [`Simulation::schedule`].
    pub fn into_simulation(
        self,
        initial_distribution: Vec<usize>,
    ) -> Result<Simulation<Self>, desim::Error<ConfigError>> {
        let mut simulation = Simulation::starting_at(INITIALIZE_TIME, self);
        simulation.schedule(
            INITIALIZE_TIME,
            Event::Initialize {
                initial_distribution,
            },
        )?;
        Ok(simulation)
    }

    /// Model parameters.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Trip data driving the arrivals and destinations.
    #[must_use]
    pub fn data(&self) -> &TripData {
        &self.data
    }

    /// Number of stations, whether already initialized or not.
    #[must_use]
    pub fn num_stations(&self) -> usize {
        self.data.num_stations()
    }

    /// Checks if the stations have been created.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        !self.stations.is_empty()
    }

    /// All stations, ordered by ID. Empty before initialization.
    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Station with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the station does not exist.
    #[must_use]
    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[usize::from(id)]
    }

    /// Customers waiting at `station` for the given purpose.
    ///
    /// # Panics
    ///
    /// Panics if the station does not exist.
    #[must_use]
    pub fn wait_queue(&self, station: StationId, purpose: WaitPurpose) -> &WaitQueue {
        match purpose {
            WaitPurpose::Pickup => &self.pickup_queues[usize::from(station)],
            WaitPurpose::Dropoff => &self.dropoff_queues[usize::from(station)],
        }
    }

    /// All customers that entered the system.
    #[must_use]
    pub fn customers(&self) -> &Customers {
        &self.customers
    }

    /// Upcoming arrivals that have not been scheduled yet.
    #[must_use]
    pub fn arrivals(&self) -> &ArrivalSchedules {
        &self.arrivals
    }

    /// Statistics collected so far.
    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Consumes the system and returns the collected statistics.
    #[must_use]
    pub fn into_statistics(self) -> Statistics {
        self.statistics
    }

    /// Number of bikes parked at all stations.
    #[must_use]
    pub fn parked_bikes(&self) -> usize {
        self.stations.iter().map(Station::available_bikes).sum()
    }

    fn initialize(
        &mut self,
        initial_distribution: &[usize],
        scheduler: &mut Scheduler<Event>,
    ) -> Result<(), ConfigError> {
        if self.is_initialized() {
            return Err(ConfigError::AlreadyInitialized);
        }
        if initial_distribution.len() != self.num_stations() {
            return Err(ConfigError::DistributionLength {
                expected: self.num_stations(),
                actual: initial_distribution.len(),
            });
        }
        let racks = self.params.racks_per_station;
        self.stations = initial_distribution
            .iter()
            .enumerate()
            .map(|(id, &bikes)| Station::new(StationId::from(id), racks, bikes))
            .collect::<Result<_, _>>()?;
        let ids = (0..self.num_stations()).map(StationId::from);
        self.pickup_queues = ids
            .clone()
            .map(|id| WaitQueue::new(id, WaitPurpose::Pickup))
            .collect();
        self.dropoff_queues = ids
            .clone()
            .map(|id| WaitQueue::new(id, WaitPurpose::Dropoff))
            .collect();
        for station in ids {
            if let Some(time) = self.arrivals.pop_next(station) {
                scheduler.schedule(
                    time,
                    Event::Arrival {
                        station,
                        customer: None,
                    },
                );
            } else {
                log::warn!("No arrivals at station {}", station);
            }
        }
        log::debug!(
            "Initialized {} stations with {} bikes",
            self.stations.len(),
            self.parked_bikes()
        );
        Ok(())
    }

    fn arrival(
        &mut self,
        station: StationId,
        customer: Option<CustomerId>,
        scheduler: &mut Scheduler<Event>,
    ) {
        let now = scheduler.time();
        let s = usize::from(station);

        if let Some(time) = self.arrivals.pop_next(station) {
            scheduler.schedule(
                time,
                Event::Arrival {
                    station,
                    customer: None,
                },
            );
        }

        let id = customer.unwrap_or_else(|| self.customers.create(station));

        if self.stations[s].available_bikes() == 0 {
            let customer = self.customers.get_mut(id);
            assert_eq!(
                customer.status,
                CustomerStatus::Arriving,
                "customer {} cannot wait for pickup",
                id
            );
            customer.wait_start = Some(now);
            customer.status = CustomerStatus::WaitingForPickup(station);
            self.pickup_queues[s].push(id);
            log::debug!(
                "[{:.3}] Customer {} waits for a bike at station {}",
                now,
                id,
                station
            );
            return;
        }

        let fee = self.params.trip_fee;
        self.statistics.charge(fee);

        let frame = timeframe(now, self.params.day_duration, self.data.num_timeframes());
        let destination = StationId::from(self.destinations[s][frame].sample(&mut self.rng));
        let end = now + self.data.duration(station, destination);
        let lost = self.rng.gen_bool(self.params.bike_loss_probability);

        let customer = self.customers.get_mut(id);
        customer.origin = Some(station);
        customer.destination = Some(destination);
        customer.wait_start = None;
        customer.status = CustomerStatus::Riding;

        scheduler.schedule(
            end,
            if lost {
                Event::BikeLoss { customer: id }
            } else {
                Event::BikeReturn { customer: id }
            },
        );

        self.accrue_idle_time(s, now);
        self.stations[s].take_bike();
        log::debug!(
            "[{:.3}] Customer {} rides from {} to {}, arriving at {:.3}",
            now,
            id,
            station,
            destination,
            end
        );

        if let Some(waiting) = self.dropoff_queues[s].pop() {
            let customer = self.customers.get_mut(waiting);
            let waited = customer.waited(now);
            customer.wait_start = None;
            customer.status = CustomerStatus::Riding;
            self.statistics.dropoff_wait[s] += waited;
            if waited > self.params.refund_time {
                self.statistics.refund(fee);
                log::debug!(
                    "[{:.3}] Customer {} refunded after waiting {:.3} to return a bike",
                    now,
                    waiting,
                    waited
                );
            }
            scheduler.schedule(now, Event::BikeReturn { customer: waiting });
        }
    }

    fn bike_return(&mut self, id: CustomerId, scheduler: &mut Scheduler<Event>) {
        let now = scheduler.time();
        let customer = self.customers.get_mut(id);
        assert_eq!(
            customer.status,
            CustomerStatus::Riding,
            "customer {} cannot return a bike",
            id
        );
        let station = customer
            .destination
            .unwrap_or_else(|| panic!("riding customer {} has no destination", id));
        let s = usize::from(station);

        if self.stations[s].available_racks() == 0 {
            customer.wait_start = Some(now);
            customer.status = CustomerStatus::WaitingForDropoff(station);
            self.dropoff_queues[s].push(id);
            log::debug!(
                "[{:.3}] Customer {} waits for a rack at station {}",
                now,
                id,
                station
            );
            return;
        }

        customer.status = CustomerStatus::Finished(TripOutcome::Completed);
        self.statistics.completed_trips += 1;
        self.accrue_idle_time(s, now);
        self.stations[s].return_bike();
        log::debug!(
            "[{:.3}] Customer {} returned a bike at station {}",
            now,
            id,
            station
        );

        while let Some(waiting) = self.pickup_queues[s].pop() {
            let customer = self.customers.get_mut(waiting);
            let waited = customer.waited(now);
            customer.wait_start = None;
            self.statistics.pickup_wait[s] += waited;
            if waited < self.params.refund_time {
                customer.status = CustomerStatus::Arriving;
                scheduler.schedule(
                    now,
                    Event::Arrival {
                        station,
                        customer: Some(waiting),
                    },
                );
                log::trace!(
                    "[{:.3}] Customer {} gets a bike after waiting {:.3}",
                    now,
                    waiting,
                    waited
                );
                break;
            }
            customer.status = CustomerStatus::Finished(TripOutcome::Abandoned);
            self.statistics.customers_lost[s] += 1;
            log::debug!(
                "[{:.3}] Customer {} gave up after waiting {:.3} at station {}",
                now,
                waiting,
                waited,
                station
            );
        }
    }

    fn bike_loss(&mut self, id: CustomerId, now: Time) {
        let customer = self.customers.get_mut(id);
        assert_eq!(
            customer.status,
            CustomerStatus::Riding,
            "customer {} cannot lose a bike",
            id
        );
        customer.status = CustomerStatus::Finished(TripOutcome::BikeLost);
        self.statistics.bikes_lost += 1;
        log::debug!("[{:.3}] Customer {} lost the bike", now, id);
    }

    /// Idle time is bounded to a single day, including its last instant.
    fn accrue_idle_time(&mut self, s: usize, now: Time) {
        if now <= self.params.day_duration {
            self.statistics.idle_time[s] += self.stations[s].accrue_idle_time(now);
        }
    }
}

impl<R: Rng> Component for BikeSharing<R> {
    type Event = Event;
    type Error = ConfigError;

    fn process_event(
        &mut self,
        event: Event,
        scheduler: &mut Scheduler<Event>,
    ) -> Result<(), ConfigError> {
        match event {
            Event::Initialize {
                initial_distribution,
            } => self.initialize(&initial_distribution, scheduler)?,
            Event::Arrival { station, customer } => self.arrival(station, customer, scheduler),
            Event::BikeReturn { customer } => self.bike_return(customer, scheduler),
            Event::BikeLoss { customer } => self.bike_loss(customer, scheduler.time()),
        }
        Ok(())
    }
}

type Destinations = Vec<Vec<WeightedAliasIndex<f64>>>;

fn calc_destinations(data: &TripData) -> Result<Destinations, DatasetError> {
    (0..data.num_stations())
        .map(StationId::from)
        .map(|station| {
            (0..data.num_timeframes())
                .map(|timeframe| {
                    let weights = data.destination_probabilities(station, timeframe).to_vec();
                    WeightedAliasIndex::new(weights).map_err(|source| DatasetError::Weights {
                        station,
                        timeframe,
                        source,
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    use float_cmp::approx_eq;
    use rand_chacha::rand_core::SeedableRng;
    use rstest::{fixture, rstest};

    type Sim = Simulation<BikeSharing>;

    fn params(racks_per_station: usize) -> Parameters {
        Parameters {
            bike_loss_probability: 0.0,
            racks_per_station,
            ..Parameters::default()
        }
    }

    /// Two stations, each sending all customers to the other one, with a single timeframe.
    fn two_stations(duration: Time) -> TripData {
        TripData::from_nested(
            vec![vec![1], vec![1]],
            vec![vec![0.0, duration], vec![duration, 0.0]],
            vec![vec![vec![0.0, 1.0]], vec![vec![1.0, 0.0]]],
        )
        .unwrap()
    }

    fn simulation(
        params: Parameters,
        data: TripData,
        arrivals: Vec<Vec<Time>>,
        initial_distribution: Vec<usize>,
    ) -> Sim {
        BikeSharing::new(
            params,
            data,
            ArrivalSchedules::from_times(arrivals),
            ChaChaRng::seed_from_u64(17),
        )
        .unwrap()
        .into_simulation(initial_distribution)
        .unwrap()
    }

    fn pending(sim: &Sim) -> Vec<(Time, Event)> {
        let mut events: Vec<_> = sim
            .scheduler()
            .events()
            .iter()
            .map(|e| (e.time(), e.event().clone()))
            .collect();
        events.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap()
                .then_with(|| format!("{:?}", a.1).cmp(&format!("{:?}", b.1)))
        });
        events
    }

    fn steps(sim: &mut Sim, n: usize) {
        for _ in 0..n {
            assert!(sim.step().unwrap());
        }
    }

    fn arrival(station: usize, customer: Option<usize>) -> Event {
        Event::Arrival {
            station: StationId::from(station),
            customer: customer.map(CustomerId::from),
        }
    }

    #[fixture]
    fn three_stations() -> Sim {
        let network = testing::three_stations();
        let data = TripData::from_nested(
            network.trip_counts,
            network.durations,
            network.destination_probabilities,
        )
        .unwrap();
        let arrivals = ArrivalSchedules::from_trip_counts(data.trip_counts(), DAY_DURATION);
        BikeSharing::new(
            params(RACKS),
            data,
            arrivals,
            ChaChaRng::seed_from_u64(0),
        )
        .unwrap()
        .into_simulation(vec![2, 0, 1])
        .unwrap()
    }

    #[rstest]
    fn test_initialize(mut three_stations: Sim) {
        assert!(!three_stations.component().is_initialized());
        assert_eq!(three_stations.time(), INITIALIZE_TIME);
        assert!(three_stations.step().unwrap());
        let system = three_stations.component();
        assert!(system.is_initialized());
        assert_eq!(
            system
                .stations()
                .iter()
                .map(Station::available_bikes)
                .collect::<Vec<_>>(),
            vec![2, 0, 1]
        );
        assert!(system.stations().iter().all(|s| s.racks() == RACKS));
        for s in 0..3 {
            let id = StationId::from(s);
            assert!(system.wait_queue(id, WaitPurpose::Pickup).is_empty());
            assert!(system.wait_queue(id, WaitPurpose::Dropoff).is_empty());
        }
        assert_eq!(
            pending(&three_stations),
            vec![
                (0.0, arrival(0, None)),
                (0.0, arrival(1, None)),
                (0.0, arrival(2, None)),
            ]
        );
        assert_eq!(three_stations.component().arrivals().total_remaining(), 30 - 3);
    }

    #[test]
    fn test_invalid_destination_weights() {
        let data = TripData::new_unchecked(
            ndarray::Array2::ones((2, 1)),
            ndarray::Array2::zeros((2, 2)),
            ndarray::Array3::zeros((2, 1, 2)),
        );
        let result = BikeSharing::new(
            params(2),
            data,
            ArrivalSchedules::from_times(vec![vec![], vec![]]),
            ChaChaRng::seed_from_u64(0),
        );
        assert!(matches!(
            result,
            Err(DatasetError::Weights { timeframe: 0, .. })
        ));
    }

    #[test]
    fn test_station_without_arrivals() {
        let mut sim = simulation(
            params(2),
            two_stations(1.0),
            vec![vec![], vec![3.0]],
            vec![1, 1],
        );
        sim.step().unwrap();
        assert_eq!(pending(&sim), vec![(3.0, arrival(1, None))]);
    }

    #[test]
    fn test_too_many_bikes() {
        let mut sim = simulation(params(2), two_stations(1.0), vec![vec![], vec![]], vec![3, 1]);
        match sim.step() {
            Err(desim::Error::Handler { time, source }) => {
                assert!(approx_eq!(f64, time, INITIALIZE_TIME));
                assert!(matches!(
                    source,
                    ConfigError::TooManyBikes {
                        bikes: 3,
                        racks: 2,
                        ..
                    }
                ));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!sim.component().is_initialized());
    }

    #[test]
    fn test_wrong_distribution_length() {
        let mut sim = simulation(params(2), two_stations(1.0), vec![vec![], vec![]], vec![1]);
        assert!(matches!(
            sim.step(),
            Err(desim::Error::Handler {
                source: ConfigError::DistributionLength {
                    expected: 2,
                    actual: 1
                },
                ..
            })
        ));
    }

    #[test]
    fn test_initialize_twice() {
        let mut sim = simulation(params(2), two_stations(1.0), vec![vec![], vec![]], vec![1, 1]);
        sim.schedule(
            0.0,
            Event::Initialize {
                initial_distribution: vec![1, 1],
            },
        )
        .unwrap();
        assert!(sim.step().unwrap());
        assert!(matches!(
            sim.step(),
            Err(desim::Error::Handler {
                source: ConfigError::AlreadyInitialized,
                ..
            })
        ));
    }

    #[test]
    fn test_arrival_at_empty_station() {
        let mut sim = simulation(
            params(2),
            two_stations(1.0),
            vec![vec![1.0, 2.0], vec![]],
            vec![0, 1],
        );
        sim.step().unwrap();
        sim.step().unwrap();
        let system = sim.component();
        let queue = system.wait_queue(StationId::from(0), WaitPurpose::Pickup);
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![CustomerId::from(0)]);
        let customer = system.customers().get(CustomerId::from(0));
        assert_eq!(customer.wait_start, Some(1.0));
        assert_eq!(
            customer.status,
            CustomerStatus::WaitingForPickup(StationId::from(0))
        );
        assert!(approx_eq!(f64, system.statistics().revenue, 0.0));
        assert_eq!(system.statistics().paid_rides, 0);
        assert_eq!(pending(&sim), vec![(2.0, arrival(0, None))]);
    }

    #[test]
    fn test_ride() {
        let mut sim = simulation(
            params(2),
            two_stations(2.5),
            vec![vec![10.0], vec![]],
            vec![1, 1],
        );
        sim.run_for(2).unwrap();
        let system = sim.component();
        assert!(approx_eq!(f64, system.statistics().revenue, TRIP_FEE));
        assert_eq!(system.station(StationId::from(0)).available_bikes(), 0);
        assert!(approx_eq!(f64, system.statistics().idle_time[0], 10.0));
        let customer = system.customers().get(CustomerId::from(0));
        assert_eq!(customer.destination, Some(StationId::from(1)));
        assert_eq!(customer.status, CustomerStatus::Riding);
        assert_eq!(
            pending(&sim),
            vec![(
                12.5,
                Event::BikeReturn {
                    customer: CustomerId::from(0)
                }
            )]
        );
    }

    #[test]
    fn test_dropoff_refund() {
        // Station 1 is full when customer 0 arrives at 1.0 and stays full until 10.0.
        let mut sim = simulation(
            params(1),
            two_stations(1.0),
            vec![vec![0.0], vec![10.0]],
            vec![1, 1],
        );
        steps(&mut sim, 3);
        {
            let system = sim.component();
            let queue = system.wait_queue(StationId::from(1), WaitPurpose::Dropoff);
            assert_eq!(queue.front(), Some(CustomerId::from(0)));
            assert!(approx_eq!(f64, system.statistics().revenue, TRIP_FEE));
        }

        assert!(sim.step().unwrap());
        let system = sim.component();
        assert!(system
            .wait_queue(StationId::from(1), WaitPurpose::Dropoff)
            .is_empty());
        assert!(approx_eq!(f64, system.statistics().dropoff_wait[1], 9.0));
        assert_eq!(system.statistics().refunds, 1);
        assert_eq!(system.statistics().paid_rides, 2);
        assert!(approx_eq!(f64, system.statistics().revenue, TRIP_FEE));
        assert_eq!(
            pending(&sim),
            vec![
                (
                    10.0,
                    Event::BikeReturn {
                        customer: CustomerId::from(0)
                    }
                ),
                (
                    11.0,
                    Event::BikeReturn {
                        customer: CustomerId::from(1)
                    }
                ),
            ]
        );

        sim.run().unwrap();
        let system = sim.component();
        assert_eq!(system.statistics().completed_trips, 2);
        assert_eq!(system.station(StationId::from(0)).available_bikes(), 1);
        assert_eq!(system.station(StationId::from(1)).available_bikes(), 1);
    }

    #[test]
    fn test_short_dropoff_wait_not_refunded() {
        let mut sim = simulation(
            params(1),
            two_stations(1.0),
            vec![vec![0.0], vec![3.0]],
            vec![1, 1],
        );
        sim.run().unwrap();
        let stats = sim.component().statistics();
        assert!(approx_eq!(f64, stats.dropoff_wait[1], 2.0));
        assert_eq!(stats.refunds, 0);
        assert!(approx_eq!(f64, stats.revenue, 2.0 * TRIP_FEE));
    }

    #[test]
    fn test_requeued_dropoff_waiter_refunded_again() {
        // Riders from station 1 return to station 1 immediately, taking the rack freed for
        // customer 0, who has to wait again.
        let data = TripData::from_nested(
            vec![vec![1], vec![2]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![vec![vec![0.0, 1.0]], vec![vec![0.0, 1.0]]],
        )
        .unwrap();
        let mut sim = simulation(params(1), data, vec![vec![0.0], vec![10.0, 20.0]], vec![1, 1]);
        sim.run().unwrap();
        let system = sim.component();
        let stats = system.statistics();
        assert_eq!(stats.paid_rides, 3);
        assert_eq!(stats.refunds, 2);
        assert_eq!(stats.completed_trips, 2);
        assert!(approx_eq!(f64, stats.dropoff_wait[1], 9.0 + 10.0));
        assert!(approx_eq!(
            f64,
            stats.revenue,
            TRIP_FEE * (stats.paid_rides as f64 - stats.refunds as f64)
        ));
        assert_eq!(
            system.customers().get(CustomerId::from(0)).status,
            CustomerStatus::WaitingForDropoff(StationId::from(1))
        );
        assert_eq!(
            system
                .wait_queue(StationId::from(1), WaitPurpose::Dropoff)
                .iter()
                .collect::<Vec<_>>(),
            vec![CustomerId::from(0)]
        );
    }

    #[fixture]
    fn two_waiters() -> Sim {
        // Customers 0 and 2 wait at the empty station 0 from 0.0 and 4.0; customer 1 brings a
        // bike from station 1 at 6.0.
        simulation(
            params(2),
            two_stations(4.0),
            vec![vec![0.0, 4.0], vec![2.0]],
            vec![0, 1],
        )
    }

    #[rstest]
    fn test_two_waiters(mut two_waiters: Sim) {
        steps(&mut two_waiters, 5);
        let system = two_waiters.component();
        assert_eq!(two_waiters.time(), 6.0);
        let stats = system.statistics();
        assert_eq!(stats.customers_lost, vec![1, 0]);
        assert!(approx_eq!(f64, stats.pickup_wait[0], 6.0 + 2.0));
        assert_eq!(
            system.customers().get(CustomerId::from(0)).status,
            CustomerStatus::Finished(TripOutcome::Abandoned)
        );
        assert_eq!(
            system.customers().get(CustomerId::from(2)).status,
            CustomerStatus::Arriving
        );
        assert!(system
            .wait_queue(StationId::from(0), WaitPurpose::Pickup)
            .is_empty());
        assert_eq!(system.station(StationId::from(0)).available_bikes(), 1);
        assert_eq!(pending(&two_waiters), vec![(6.0, arrival(0, Some(2)))]);

        assert!(two_waiters.step().unwrap());
        let system = two_waiters.component();
        assert_eq!(system.station(StationId::from(0)).available_bikes(), 0);
        assert_eq!(system.statistics().paid_rides, 2);
        assert_eq!(
            system.customers().get(CustomerId::from(2)).status,
            CustomerStatus::Riding
        );
    }

    #[test]
    fn test_all_waiters_abandon() {
        let mut sim = simulation(
            params(2),
            two_stations(10.0),
            vec![vec![0.0, 1.0], vec![2.0]],
            vec![0, 1],
        );
        sim.run().unwrap();
        let system = sim.component();
        assert_eq!(system.statistics().customers_lost, vec![2, 0]);
        assert!(approx_eq!(f64, system.statistics().pickup_wait[0], 12.0 + 11.0));
        assert_eq!(system.station(StationId::from(0)).available_bikes(), 1);
    }

    #[test]
    fn test_bike_loss() {
        let mut sim = simulation(
            Parameters {
                bike_loss_probability: 1.0,
                ..params(2)
            },
            two_stations(1.0),
            vec![vec![0.0], vec![]],
            vec![1, 0],
        );
        sim.run().unwrap();
        let system = sim.component();
        assert_eq!(system.statistics().bikes_lost, 1);
        assert_eq!(system.parked_bikes(), 0);
        assert_eq!(
            system.customers().get(CustomerId::from(0)).status,
            CustomerStatus::Finished(TripOutcome::BikeLost)
        );
    }

    fn idle_time_with_return_at(duration: Time) -> Vec<Time> {
        let mut sim = simulation(
            Parameters {
                day_duration: 10.0,
                ..params(2)
            },
            two_stations(duration),
            vec![vec![4.0], vec![]],
            vec![2, 1],
        );
        sim.run().unwrap();
        sim.into_component().into_statistics().idle_time
    }

    #[test]
    fn test_idle_time_bounded_to_day() {
        let idle_time = idle_time_with_return_at(7.0);
        assert!(approx_eq!(f64, idle_time[0], 8.0));
        assert!(approx_eq!(f64, idle_time[1], 0.0));
    }

    #[test]
    fn test_idle_time_at_day_end() {
        let idle_time = idle_time_with_return_at(6.0);
        assert!(approx_eq!(f64, idle_time[0], 8.0));
        assert!(approx_eq!(f64, idle_time[1], 10.0));
    }

    #[rstest]
    fn test_first_timeframe_destination(mut three_stations: Sim) {
        three_stations.run_for(2).unwrap();
        let customer = three_stations.component().customers().get(CustomerId::from(0));
        assert_eq!(customer.destination, Some(StationId::from(2)));
    }
}
