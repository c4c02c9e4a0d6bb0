use std::path::PathBuf;

use crate::StationId;

/// Invalid run configuration. The simulation must not proceed when any of these is detected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A station was assigned more bikes than it has racks.
    #[error("station {station} has {bikes} bikes but only {racks} racks")]
    TooManyBikes {
        /// Offending station.
        station: StationId,
        /// Number of bikes assigned to the station.
        bikes: usize,
        /// Number of racks at each station.
        racks: usize,
    },
    /// Initial distribution does not cover exactly all the stations.
    #[error("initial distribution has {actual} entries but there are {expected} stations")]
    DistributionLength {
        /// Number of stations.
        expected: usize,
        /// Length of the distribution.
        actual: usize,
    },
    /// Stations have already been initialized.
    #[error("stations can be initialized only once")]
    AlreadyInitialized,
    /// A parameter is out of its valid range.
    #[error("invalid value of `{name}`: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Given value.
        value: f64,
    },
}

/// Invalid or unreadable trip dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Failed to read a dataset file.
    #[error("unable to read {}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse a dataset file.
    #[error("unable to parse {}", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying parsing error.
        #[source]
        source: serde_json::Error,
    },
    /// Dimensions of the arrays do not agree.
    #[error("invalid shape of {name}: {details}")]
    Shape {
        /// Array name.
        name: &'static str,
        /// What was wrong.
        details: String,
    },
    /// Negative, infinite, or `NaN` trip duration.
    #[error("invalid trip duration from {origin} to {destination}: {value}")]
    Duration {
        /// Origin station.
        origin: StationId,
        /// Destination station.
        destination: StationId,
        /// Offending value.
        value: f64,
    },
    /// Destination probabilities are not a distribution.
    #[error(
        "destination probabilities of station {station} in timeframe {timeframe} \
         do not form a distribution (sum = {sum})"
    )]
    Probabilities {
        /// Origin station.
        station: StationId,
        /// Timeframe index.
        timeframe: usize,
        /// Sum of the probabilities.
        sum: f64,
    },
    /// Destination probabilities cannot be sampled from.
    #[error("invalid destination weights of station {station} in timeframe {timeframe}")]
    Weights {
        /// Origin station.
        station: StationId,
        /// Timeframe index.
        timeframe: usize,
        /// Underlying sampling error.
        #[source]
        source: rand_distr::WeightedError,
    },
}

/// Any error that can stop a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Invalid dataset.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// Error raised while running the simulation.
    #[error(transparent)]
    Simulation(#[from] desim::Error<ConfigError>),
}
