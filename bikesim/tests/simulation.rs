use bikesim::{BikeSharing, ConfigError, CustomerStatus, Error, SimulationConfig, Time, TripData};
use float_cmp::approx_eq;
use proptest::prelude::*;
use rstest::{fixture, rstest};

fn trip_data(network: testing::RawNetwork) -> TripData {
    TripData::from_nested(
        network.trip_counts,
        network.durations,
        network.destination_probabilities,
    )
    .unwrap()
}

#[fixture]
fn three_stations() -> TripData {
    trip_data(testing::three_stations())
}

#[fixture]
fn config() -> SimulationConfig {
    SimulationConfig {
        total_bikes: 4,
        racks_per_station: 2,
        scale_arrival_rate: 20.0,
        bike_loss_probability: 0.01,
        seed: Some(1234),
        ..SimulationConfig::default()
    }
}

/// Bikes held by riding customers, including those waiting to return them.
fn bikes_in_use(system: &BikeSharing) -> usize {
    system
        .customers()
        .iter()
        .filter(|c| {
            matches!(
                c.status,
                CustomerStatus::Riding | CustomerStatus::WaitingForDropoff(_)
            )
        })
        .count()
}

fn check_invariants(
    system: &BikeSharing,
    total_bikes: usize,
    time: Time,
    last_time: &mut Time,
) -> Result<(), TestCaseError> {
    prop_assert!(time >= *last_time, "clock moved from {} to {}", last_time, time);
    *last_time = time;
    for station in system.stations() {
        prop_assert_eq!(
            station.available_bikes() + station.available_racks(),
            system.parameters().racks_per_station
        );
    }
    if system.is_initialized() {
        prop_assert_eq!(
            system.parked_bikes() + bikes_in_use(system) + system.statistics().bikes_lost,
            total_bikes
        );
    }
    Ok(())
}

#[rstest]
fn test_run_three_stations(three_stations: TripData, config: SimulationConfig) {
    let report = bikesim::run(&config, three_stations).unwrap();
    let stats = &report.statistics;
    assert_eq!(report.customers, 600);
    assert!(report.events_processed > report.customers);
    assert!(report.end_time >= 0.0);
    assert_eq!(stats.num_stations(), 3);
    assert!(stats.paid_rides > 0);
    assert!(approx_eq!(
        f64,
        stats.revenue,
        config.trip_fee * (stats.paid_rides as f64 - stats.refunds as f64),
        epsilon = 1e-9
    ));
}

#[rstest]
fn test_every_ride_ends(three_stations: TripData, config: SimulationConfig) {
    let mut simulation = bikesim::build(&config, three_stations).unwrap();
    simulation.run().unwrap();
    let system = simulation.component();
    let stats = system.statistics();
    let waiting = system
        .customers()
        .iter()
        .filter(|c| matches!(c.status, CustomerStatus::WaitingForDropoff(_)))
        .count();
    assert_eq!(bikes_in_use(system), waiting);
    assert_eq!(
        stats.completed_trips + stats.bikes_lost + waiting,
        stats.paid_rides
    );
    assert_eq!(
        system.parked_bikes() + waiting + stats.bikes_lost,
        config.total_bikes
    );
}

#[rstest]
fn test_fixed_seed_is_deterministic(three_stations: TripData, config: SimulationConfig) {
    let first = bikesim::run(&config, three_stations.clone()).unwrap();
    let second = bikesim::run(&config, three_stations).unwrap();
    assert_eq!(first, second);
}

#[rstest]
fn test_different_seeds(three_stations: TripData, mut config: SimulationConfig) {
    config.bike_loss_probability = 0.3;
    let first = bikesim::run(&config, three_stations.clone()).unwrap();
    config.seed = Some(4321);
    let second = bikesim::run(&config, three_stations).unwrap();
    assert_ne!(first.statistics, second.statistics);
}

#[rstest]
fn test_no_arrivals(three_stations: TripData, mut config: SimulationConfig) {
    config.scale_arrival_rate = 0.0;
    let report = bikesim::run(&config, three_stations).unwrap();
    assert_eq!(report.events_processed, 1);
    assert_eq!(report.customers, 0);
    assert!(approx_eq!(f64, report.statistics.revenue, 0.0));
}

#[rstest]
fn test_too_many_bikes(three_stations: TripData, mut config: SimulationConfig) {
    config.initial_distribution = Some(vec![3, 0, 0]);
    match bikesim::run(&config, three_stations) {
        Err(Error::Simulation(desim::Error::Handler {
            source: ConfigError::TooManyBikes { bikes, racks, .. },
            ..
        })) => {
            assert_eq!(bikes, 3);
            assert_eq!(racks, 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[rstest]
fn test_wrong_distribution_length(three_stations: TripData, mut config: SimulationConfig) {
    config.initial_distribution = Some(vec![1, 1]);
    assert!(matches!(
        bikesim::run(&config, three_stations),
        Err(Error::Config(ConfigError::DistributionLength {
            expected: 3,
            actual: 2
        }))
    ));
}

#[rstest]
fn test_invalid_config(three_stations: TripData, mut config: SimulationConfig) {
    config.bike_loss_probability = -0.5;
    assert!(matches!(
        bikesim::run(&config, three_stations),
        Err(Error::Config(ConfigError::InvalidParameter {
            name: "bike_loss_probability",
            ..
        }))
    ));
}

#[rstest]
fn test_hook_sees_every_event(three_stations: TripData, config: SimulationConfig) {
    let mut calls = 0;
    let mut last_time = f64::NEG_INFINITY;
    let report = bikesim::run_with_hook(&config, three_stations, |time, system| {
        calls += 1;
        check_invariants(system, 4, time, &mut last_time).unwrap();
    })
    .unwrap();
    assert_eq!(calls, report.events_processed);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_conservation(
        num_stations in 2_usize..6,
        num_timeframes in 1_usize..5,
        max_trips in 0_u32..30,
        racks in 1_usize..4,
        seed in any::<u64>(),
    ) {
        let network = testing::random_network(num_stations, num_timeframes, max_trips, seed);
        let data = trip_data(network);
        let total_bikes = num_stations * racks / 2;
        let config = SimulationConfig {
            total_bikes,
            racks_per_station: racks,
            bike_loss_probability: 0.05,
            refund_time: 3.0,
            seed: Some(seed),
            ..SimulationConfig::default()
        };
        let mut last_time = f64::NEG_INFINITY;
        let mut result = Ok(());
        let report = bikesim::run_with_hook(&config, data, |time, system| {
            if result.is_ok() {
                result = check_invariants(system, total_bikes, time, &mut last_time);
            }
        })
        .unwrap();
        result?;
        let stats = &report.statistics;
        prop_assert!(approx_eq!(
            f64,
            stats.revenue,
            config.trip_fee * (stats.paid_rides as f64 - stats.refunds as f64),
            epsilon = 1e-6
        ));
        prop_assert!(stats.idle_time.iter().all(|&t| t >= 0.0));
        prop_assert!(stats.pickup_wait.iter().all(|&t| t >= 0.0));
        prop_assert!(stats.dropoff_wait.iter().all(|&t| t >= 0.0));
    }
}
