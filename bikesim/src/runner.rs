use desim::Simulation;
use serde::Serialize;

use crate::{
    scale_trip_counts, ArrivalSchedules, BikeSharing, Error, SimulationConfig, Statistics, Time,
    TripData,
};

/// Outcome of a complete simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Aggregate statistics.
    pub statistics: Statistics,
    /// Number of events processed by the engine.
    pub events_processed: usize,
    /// Number of customers that entered the system.
    pub customers: usize,
    /// Time of the last processed event.
    pub end_time: Time,
}

impl RunReport {
    /// Logs the summary of the run at the info level.
    pub fn log_summary(&self) {
        let stats = &self.statistics;
        log::info!("Revenue: {}", stats.revenue);
        log::info!("Time waited for pickup: {:.3}", stats.total_pickup_wait());
        log::info!("Time waited for dropoff: {:.3}", stats.total_dropoff_wait());
        log::info!("Customers lost: {}", stats.total_customers_lost());
        log::info!("Bikes lost: {}", stats.bikes_lost);
        log::info!("Total idle time: {:.3}", stats.total_idle_time());
    }
}

/// Builds a simulation ready to run: arrival schedules are derived from the scaled trip counts,
/// and the initialization event is scheduled.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn build(
    config: &SimulationConfig,
    data: TripData,
) -> Result<Simulation<BikeSharing>, Error> {
    config.validate()?;
    let initial_distribution = config.initial_distribution(data.num_stations())?;
    let trip_counts = scale_trip_counts(data.trip_counts(), config.scale_arrival_rate);
    let arrivals = ArrivalSchedules::from_trip_counts(&trip_counts, config.day_duration);
    log::info!("Stations: {}", data.num_stations());
    log::info!("Timeframes: {}", data.num_timeframes());
    log::info!("Bikes: {}", initial_distribution.iter().sum::<usize>());
    log::info!("Racks per station: {}", config.racks_per_station);
    log::info!("Arrival rate scale: {}", config.scale_arrival_rate);
    log::info!("Bike loss probability: {}", config.bike_loss_probability);
    log::info!("Total arrival events: {}", arrivals.total_remaining());
    let system = BikeSharing::new(config.parameters(), data, arrivals, config.rng())?;
    Ok(system.into_simulation(initial_distribution)?)
}

/// Runs the simulation to completion.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn run(config: &SimulationConfig, data: TripData) -> Result<RunReport, Error> {
    run_with_hook(config, data, |_, _| {})
}

/// Runs the simulation to completion, calling `hook` after each processed event.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn run_with_hook<F>(
    config: &SimulationConfig,
    data: TripData,
    hook: F,
) -> Result<RunReport, Error>
where
    F: FnMut(Time, &BikeSharing),
{
    let mut simulation = build(config, data)?;
    let events_processed = simulation.run_with_hook(usize::MAX, hook)?;
    let end_time = simulation.time();
    let system = simulation.into_component();
    let report = RunReport {
        customers: system.customers().len(),
        statistics: system.into_statistics(),
        events_processed,
        end_time,
    };
    report.log_summary();
    Ok(report)
}
