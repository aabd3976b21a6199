//! Flight registry and admission control.
//!
//! The [`Registry`] owns every known flight, decides each flight's
//! [`SuccessStatus`] once on insertion and persists the set as CSV ordered by
//! arrival time.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::codec;
use crate::config::AdmissionConfig;
use crate::error::{Error, Result};
use crate::flight::{Flight, SuccessStatus};

/// Default daily capacity.
pub const DEFAULT_MAX_FLIGHTS_PER_DAY: usize = 20;

/// Default minimum ground time, in minutes.
pub const DEFAULT_MIN_GROUND_TIME_MINUTES: i64 = 180;

/// In-memory flight registry.
///
/// Admission rules, applied in insertion order:
/// - a flight fails if more flights than `max_flights_per_day` have already
///   succeeded (strictly more, so one flight past the limit still succeeds);
/// - a flight fails if its ground time is below `min_ground_time`.
///
/// Flights are never removed or re-evaluated after insertion.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Flights in insertion order.
    flights: Vec<Flight>,
    /// Flight ID to position in `flights`.
    index: HashMap<String, usize>,
    max_flights_per_day: usize,
    min_ground_time: Duration,
    success_count: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(
            DEFAULT_MAX_FLIGHTS_PER_DAY,
            Duration::minutes(DEFAULT_MIN_GROUND_TIME_MINUTES),
        )
    }

    /// Create an empty registry with custom limits.
    #[must_use]
    pub fn with_limits(max_flights_per_day: usize, min_ground_time: Duration) -> Self {
        Self {
            flights: Vec::new(),
            index: HashMap::new(),
            max_flights_per_day,
            min_ground_time,
            success_count: 0,
        }
    }

    /// Create an empty registry from the admission section of the config.
    #[must_use]
    pub fn from_config(config: &AdmissionConfig) -> Self {
        Self::with_limits(config.max_flights_per_day, config.min_ground_time())
    }

    /// Remove every flight and reset the success counter.
    pub fn reset(&mut self) {
        self.flights.clear();
        self.index.clear();
        self.success_count = 0;
    }

    /// Admit a flight and store it.
    ///
    /// Returns the status assigned to the flight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFlight`] if a flight with the same ID is
    /// already stored. The registry is left unchanged in that case.
    pub fn add_flight(&mut self, mut flight: Flight) -> Result<SuccessStatus> {
        if self.index.contains_key(&flight.flight_id) {
            return Err(Error::duplicate_flight(flight.flight_id));
        }

        let status = if self.success_count > self.max_flights_per_day
            || flight.ground_time() < self.min_ground_time
        {
            SuccessStatus::Fail
        } else {
            self.success_count += 1;
            SuccessStatus::Success
        };
        flight.set_success(status);

        debug!("Admitted {}", flight);
        self.index.insert(flight.flight_id.clone(), self.flights.len());
        self.flights.push(flight);
        Ok(status)
    }

    /// Look up a flight by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchFlight`] if the ID is unknown.
    pub fn get_flight(&self, flight_id: &str) -> Result<&Flight> {
        self.index
            .get(flight_id)
            .map(|&position| &self.flights[position])
            .ok_or_else(|| Error::no_such_flight(flight_id))
    }

    /// Number of stored flights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Check if no flights are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Number of flights admitted as [`SuccessStatus::Success`].
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.success_count
    }

    /// Configured daily capacity.
    #[must_use]
    pub fn max_flights_per_day(&self) -> usize {
        self.max_flights_per_day
    }

    /// Configured minimum ground time.
    #[must_use]
    pub fn min_ground_time(&self) -> Duration {
        self.min_ground_time
    }

    /// Iterate over flights ordered by arrival time.
    ///
    /// Flights arriving at the same time keep their insertion order.
    pub fn flights_by_arrival(&self) -> impl Iterator<Item = &Flight> {
        let mut ordered: Vec<&Flight> = self.flights.iter().collect();
        ordered.sort_by_key(|flight| flight.arrival);
        ordered.into_iter()
    }

    /// Summarize admission outcomes.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let failed = self
            .flights
            .iter()
            .filter(|flight| flight.success() == SuccessStatus::Fail)
            .count();

        RegistryStats {
            total: self.flights.len(),
            succeeded: self.success_count,
            failed,
        }
    }

    /// Load a CSV document, admitting each row in order.
    ///
    /// The first row is treated as the header and skipped. Returns the
    /// number of flights added.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed row or duplicate ID and returns that
    /// error. Flights added before the failing row stay in the registry.
    pub fn load_from<R: Read>(&mut self, source: R) -> Result<usize> {
        let mut rdr = codec::reader(source);
        let mut added = 0;

        for record in rdr.records() {
            let record = record.map_err(|e| {
                warn!("Aborted flights load after {} rows: {}", added, e);
                Error::from(e)
            })?;
            let line = record.position().map_or(0, csv::Position::line);
            let fields: Vec<&str> = record.iter().collect();

            let flight = codec::parse_row(&fields)
                .map_err(|e| e.at_line(line))
                .and_then(|flight| match flight {
                    Some(flight) => self.add_flight(flight).map(|_| true),
                    None => Ok(false),
                });

            match flight {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("Aborted flights load after {} rows: {}", added, e);
                    return Err(e);
                }
            }
        }

        Ok(added)
    }

    /// Load a CSV file. See [`Registry::load_from`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or any row is rejected.
    pub fn load_csv(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        debug!("Loading flights from {}", path.display());

        let file = File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let added = self.load_from(file)?;

        info!("Loaded {} flights from {}", added, path.display());
        Ok(added)
    }

    /// Write the header and every flight, ordered by arrival time.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the destination fails.
    pub fn dump_to<W: Write>(&self, destination: W) -> Result<()> {
        let mut wtr = codec::writer(destination);
        wtr.write_record(codec::CSV_COLUMNS)?;
        for flight in self.flights_by_arrival() {
            wtr.write_record(codec::to_row(flight))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the registry to a CSV file, replacing its contents.
    ///
    /// Creates the parent directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn dump_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let file = File::create(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        self.dump_to(file)?;

        info!("Wrote {} flights to {}", self.len(), path.display());
        Ok(())
    }
}

/// Admission statistics for a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    /// Total number of flights stored.
    pub total: usize,
    /// Flights admitted as successful.
    pub succeeded: usize,
    /// Flights rejected by an admission rule.
    pub failed: usize,
}
