use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use itertools::Itertools;
use ndarray::{Array2, Array3, ArrayView1};
use serde::de::DeserializeOwned;

use crate::{DatasetError, StationId};

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Name of the file containing trip counts.
pub const TRIP_COUNTS_FILE: &str = "trip_counts.json";
/// Name of the file containing average trip durations.
pub const DURATIONS_FILE: &str = "durations.json";
/// Name of the file containing destination probabilities.
pub const DESTINATION_PROBABILITIES_FILE: &str = "destination_probabilities.json";

/// Historical trip statistics driving the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct TripData {
    trip_counts: Array2<u32>,
    durations: Array2<f64>,
    destination_probabilities: Array3<f64>,
}

fn shape_error(name: &'static str, details: String) -> DatasetError {
    DatasetError::Shape { name, details }
}

fn to_array2<T: Clone>(name: &'static str, rows: Vec<Vec<T>>) -> Result<Array2<T>, DatasetError> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some((row, values)) = rows.iter().find_position(|r| r.len() != ncols) {
        return Err(shape_error(
            name,
            format!("row {} has {} elements, expected {}", row, values.len(), ncols),
        ));
    }
    let flat: Vec<T> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat).map_err(|e| shape_error(name, e.to_string()))
}

fn to_array3(
    name: &'static str,
    matrices: Vec<Vec<Vec<f64>>>,
) -> Result<Array3<f64>, DatasetError> {
    let n0 = matrices.len();
    let n1 = matrices.first().map_or(0, Vec::len);
    let n2 = matrices
        .first()
        .and_then(|m| m.first())
        .map_or(0, Vec::len);
    for (i, matrix) in matrices.iter().enumerate() {
        if matrix.len() != n1 {
            return Err(shape_error(
                name,
                format!("entry {} has {} rows, expected {}", i, matrix.len(), n1),
            ));
        }
        if let Some((j, row)) = matrix.iter().find_position(|r| r.len() != n2) {
            return Err(shape_error(
                name,
                format!("entry [{}][{}] has {} elements, expected {}", i, j, row.len(), n2),
            ));
        }
    }
    let flat: Vec<f64> = matrices.into_iter().flatten().flatten().collect();
    Array3::from_shape_vec((n0, n1, n2), flat).map_err(|e| shape_error(name, e.to_string()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl TripData {
    /// Validates and constructs trip data.
    ///
    /// * `trip_counts` is indexed by `[station, timeframe]`,
    /// * `durations` is indexed by `[origin, destination]`,
    /// * `destination_probabilities` is indexed by `[origin, timeframe, destination]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions do not agree, any duration is negative or not finite,
    /// or any probability row is not a distribution.
    pub fn new(
        trip_counts: Array2<u32>,
        durations: Array2<f64>,
        destination_probabilities: Array3<f64>,
    ) -> Result<Self, DatasetError> {
        let (num_stations, num_timeframes) = trip_counts.dim();
        if num_stations == 0 || num_timeframes == 0 {
            return Err(shape_error(
                "trip counts",
                String::from("at least one station and one timeframe required"),
            ));
        }
        if durations.dim() != (num_stations, num_stations) {
            return Err(shape_error(
                "durations",
                format!(
                    "expected {0}x{0} but got {1:?}",
                    num_stations,
                    durations.dim()
                ),
            ));
        }
        let expected = (num_stations, num_timeframes, num_stations);
        if destination_probabilities.dim() != expected {
            return Err(shape_error(
                "destination probabilities",
                format!(
                    "expected {:?} but got {:?}",
                    expected,
                    destination_probabilities.dim()
                ),
            ));
        }
        if let Some(((origin, destination), &value)) = durations
            .indexed_iter()
            .find(|&(_, &d)| !d.is_finite() || d < 0.0)
        {
            return Err(DatasetError::Duration {
                origin: StationId::from(origin),
                destination: StationId::from(destination),
                value,
            });
        }
        for ((origin, timeframe), row) in (0..num_stations)
            .cartesian_product(0..num_timeframes)
            .map(|(s, t)| ((s, t), destination_probabilities.slice(ndarray::s![s, t, ..])))
        {
            if !is_distribution(row) {
                return Err(DatasetError::Probabilities {
                    station: StationId::from(origin),
                    timeframe,
                    sum: row.sum(),
                });
            }
        }
        Ok(Self {
            trip_counts,
            durations,
            destination_probabilities,
        })
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(
        trip_counts: Array2<u32>,
        durations: Array2<f64>,
        destination_probabilities: Array3<f64>,
    ) -> Self {
        Self {
            trip_counts,
            durations,
            destination_probabilities,
        }
    }

    /// Constructs trip data from nested vectors, with the same layout as [`TripData::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if the nested vectors are ragged, or if [`TripData::new`] fails.
    pub fn from_nested(
        trip_counts: Vec<Vec<u32>>,
        durations: Vec<Vec<f64>>,
        destination_probabilities: Vec<Vec<Vec<f64>>>,
    ) -> Result<Self, DatasetError> {
        Self::new(
            to_array2("trip counts", trip_counts)?,
            to_array2("durations", durations)?,
            to_array3("destination probabilities", destination_probabilities)?,
        )
    }

    /// Loads trip data from [`TRIP_COUNTS_FILE`], [`DURATIONS_FILE`], and
    /// [`DESTINATION_PROBABILITIES_FILE`] in `dir`. Each file contains a nested JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or parsed, or the data is invalid.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        log::debug!("Loading trip data from {}", dir.display());
        Self::from_nested(
            read_json(&dir.join(TRIP_COUNTS_FILE))?,
            read_json(&dir.join(DURATIONS_FILE))?,
            read_json(&dir.join(DESTINATION_PROBABILITIES_FILE))?,
        )
    }

    /// Number of stations.
    #[must_use]
    pub fn num_stations(&self) -> usize {
        self.trip_counts.nrows()
    }

    /// Number of timeframes the day is split into.
    #[must_use]
    pub fn num_timeframes(&self) -> usize {
        self.trip_counts.ncols()
    }

    /// Trip counts indexed by `[station, timeframe]`.
    #[must_use]
    pub fn trip_counts(&self) -> &Array2<u32> {
        &self.trip_counts
    }

    /// Average trip durations indexed by `[origin, destination]`.
    #[must_use]
    pub fn durations(&self) -> &Array2<f64> {
        &self.durations
    }

    /// Average duration of a trip from `origin` to `destination`.
    #[must_use]
    pub fn duration(&self, origin: StationId, destination: StationId) -> f64 {
        self.durations[[usize::from(origin), usize::from(destination)]]
    }

    /// Probabilities of choosing each destination when starting at `origin` in `timeframe`.
    #[must_use]
    pub fn destination_probabilities(
        &self,
        origin: StationId,
        timeframe: usize,
    ) -> ArrayView1<'_, f64> {
        self.destination_probabilities
            .slice(ndarray::s![usize::from(origin), timeframe, ..])
    }
}

fn is_distribution(row: ArrayView1<'_, f64>) -> bool {
    row.iter().all(|&p| p.is_finite() && p >= 0.0)
        && (row.sum() - 1.0).abs() <= PROBABILITY_TOLERANCE
}
