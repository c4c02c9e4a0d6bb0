//! Bike sharing simulation application.
#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::default_trait_access)]

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::WrapErr;
use indicatif::{ProgressBar, ProgressStyle};

use bikesim::{BikeSharing, RunReport, SimulationConfig, Time, TripData};

/// Format of the per-station output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::ToString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    /// One row per station.
    Csv,
    /// The entire report as a JSON object.
    Json,
}

/// Runs bike sharing simulation.
#[derive(Parser)]
#[clap(version, author)]
struct Opt {
    /// Directory containing `trip_counts.json`, `durations.json`, and
    /// `destination_probabilities.json`.
    #[clap(long)]
    data_dir: PathBuf,

    /// Path to a JSON file with the simulation configuration.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Total number of bikes in the system.
    #[clap(long)]
    total_bikes: Option<usize>,

    /// Comma-separated number of bikes at each station. Overrides `--total-bikes`.
    #[clap(long, value_delimiter = ',')]
    initial_distribution: Option<Vec<usize>>,

    /// Number of racks at each station.
    #[clap(long)]
    racks_per_station: Option<usize>,

    /// Multiplier of the historical arrival rates.
    #[clap(long)]
    scale_arrival_rate: Option<f64>,

    /// Probability of a bike getting lost during a ride.
    #[clap(long)]
    bike_loss_probability: Option<f64>,

    /// Fee paid for each ride.
    #[clap(long)]
    trip_fee: Option<f64>,

    /// Wait time in minutes after which customers give up or get refunded.
    #[clap(long)]
    refund_time: Option<Time>,

    /// Length of the simulated day in minutes.
    #[clap(long)]
    day_duration: Option<Time>,

    /// Random seed.
    #[clap(long)]
    seed: Option<u64>,

    /// Verbosity.
    #[clap(short, long, parse(from_occurrences))]
    verbose: i32,

    /// Store the logs this file.
    #[clap(long)]
    log_output: Option<PathBuf>,

    /// Do not log to the stderr.
    #[clap(long)]
    no_stderr: bool,

    /// Write the results to this file.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Format of the results.
    #[clap(long, default_value = "csv")]
    format: OutputFormat,
}

impl Opt {
    fn simulation_config(&self) -> eyre::Result<SimulationConfig> {
        let mut config = if let Some(path) = &self.config {
            let file = File::open(path).wrap_err("unable to open config file")?;
            serde_json::from_reader(BufReader::new(file)).wrap_err("unable to parse config file")?
        } else {
            SimulationConfig::default()
        };
        if let Some(total_bikes) = self.total_bikes {
            config.total_bikes = total_bikes;
            config.initial_distribution = None;
        }
        if let Some(distribution) = &self.initial_distribution {
            config.initial_distribution = Some(distribution.clone());
        }
        if let Some(racks) = self.racks_per_station {
            config.racks_per_station = racks;
        }
        if let Some(scale) = self.scale_arrival_rate {
            config.scale_arrival_rate = scale;
        }
        if let Some(probability) = self.bike_loss_probability {
            config.bike_loss_probability = probability;
        }
        if let Some(fee) = self.trip_fee {
            config.trip_fee = fee;
        }
        if let Some(refund_time) = self.refund_time {
            config.refund_time = refund_time;
        }
        if let Some(day_duration) = self.day_duration {
            config.day_duration = day_duration;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        Ok(config)
    }
}

fn set_up_logger(opt: &Opt) -> Result<(), fern::InitError> {
    let log_level = match opt.verbose {
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        3 => log::LevelFilter::Trace,
        _ => log::LevelFilter::Warn,
    };
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(log_level);
    let dispatch = if let Some(path) = &opt.log_output {
        dispatch.chain(fern::log_file(path)?)
    } else {
        dispatch
    };
    let dispatch = if opt.no_stderr {
        dispatch
    } else {
        dispatch.chain(std::io::stderr())
    };
    dispatch.apply()?;
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn run(config: &SimulationConfig, data: TripData, pb: &ProgressBar) -> eyre::Result<RunReport> {
    let report = bikesim::run_with_hook(config, data, |time: Time, system: &BikeSharing| {
        let minute = time.max(0.0) as u64;
        if pb.position() < minute {
            pb.set_position(minute);
            let stats = system.statistics();
            pb.set_message(&format!(
                "[{time}m] [C={customers}] [P={paid}] [R={refunds}] [X={lost}]",
                time = minute,
                customers = system.customers().len(),
                paid = stats.paid_rides,
                refunds = stats.refunds,
                lost = stats.total_customers_lost(),
            ));
        }
    })?;
    pb.finish();
    Ok(report)
}

fn write_report(report: &RunReport, path: &Path, format: OutputFormat) -> eyre::Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)?;
            for row in report.statistics.station_rows() {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let file = File::create(path)?;
            serde_json::to_writer_pretty(file, report)?;
        }
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let opt = Opt::parse();
    set_up_logger(&opt)?;
    let config = opt.simulation_config()?;
    let data = TripData::load(&opt.data_dir).wrap_err("unable to load trip data")?;
    let pb = if opt.no_stderr {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(config.day_duration.ceil() as u64)
            .with_style(ProgressStyle::default_bar().template("{msg} {wide_bar} {percent}%"))
    };
    let report = run(&config, data, &pb)?;
    println!("Revenue: {}", report.statistics.revenue);
    println!(
        "Time waited for pickup: {:.3}",
        report.statistics.total_pickup_wait()
    );
    println!(
        "Time waited for dropoff: {:.3}",
        report.statistics.total_dropoff_wait()
    );
    println!(
        "Customers lost: {}",
        report.statistics.total_customers_lost()
    );
    println!("Bikes lost: {}", report.statistics.bikes_lost);
    println!(
        "Total idle time: {:.3}",
        report.statistics.total_idle_time()
    );
    if let Some(path) = &opt.output {
        write_report(&report, path, opt.format)
            .wrap_err_with(|| format!("unable to write results to {}", path.display()))?;
        log::info!("Results written to {} as {}", path.display(), opt.format.to_string());
    }
    Ok(())
}
