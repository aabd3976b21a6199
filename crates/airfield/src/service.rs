//! Shared flight service state.
//!
//! [`FlightService`] pairs a [`Registry`] with the CSV file that backs it.
//! Every operation holds one async lock for its whole duration, so reads and
//! writes from concurrent callers never interleave. After each successful
//! mutation the registry is written back to the file.
//!
//! Errors leave the service as [`ServiceError`]s carrying an HTTP-style status
//! code, ready to be handed to whatever transport sits in front.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::AdmissionConfig;
use crate::error::{Error, Result};
use crate::flight::{Flight, SuccessStatus};
use crate::registry::{Registry, RegistryStats};

/// Status code for input the caller got wrong.
pub const STATUS_BAD_REQUEST: u16 = 400;
/// Status code for an unknown flight.
pub const STATUS_NOT_FOUND: u16 = 404;
/// Status code for failures unrelated to the request.
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Payload for creating a flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRequest {
    /// Identifier of the new flight.
    pub flight_id: String,
    /// Arrival time, `HH:MM`.
    #[serde(with = "hhmm")]
    pub arrival: NaiveTime,
    /// Departure time, `HH:MM`.
    #[serde(with = "hhmm")]
    pub departure: NaiveTime,
}

impl FlightRequest {
    /// Convert into an unadmitted flight.
    #[must_use]
    pub fn into_flight(self) -> Flight {
        Flight::new(self.flight_id, self.arrival, self.departure)
    }
}

/// A stored flight as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightView {
    /// Flight identifier.
    pub flight_id: String,
    /// Arrival time, `HH:MM`.
    #[serde(with = "hhmm")]
    pub arrival: NaiveTime,
    /// Departure time, `HH:MM`.
    #[serde(with = "hhmm")]
    pub departure: NaiveTime,
    /// Admission outcome.
    pub success: SuccessStatus,
}

impl From<&Flight> for FlightView {
    fn from(flight: &Flight) -> Self {
        Self {
            flight_id: flight.flight_id.clone(),
            arrival: flight.arrival,
            departure: flight.departure,
            success: flight.success(),
        }
    }
}

/// A failed service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {detail}")]
pub struct ServiceError {
    /// HTTP-style status code.
    pub status: u16,
    /// Message safe to show to the caller.
    pub detail: String,
}

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        if !err.is_invalid_input() {
            error!("Flight service failure: {}", err);
            return Self {
                status: STATUS_INTERNAL_ERROR,
                detail: "Unknown Error".to_string(),
            };
        }

        let status = if err.is_not_found() {
            STATUS_NOT_FOUND
        } else {
            STATUS_BAD_REQUEST
        };
        Self {
            status,
            detail: format!("Error in input: {err}"),
        }
    }
}

/// Registry plus backing file, shared between callers.
///
/// Cloning is cheap; clones share the same registry and lock.
#[derive(Debug, Clone)]
pub struct FlightService {
    inner: Arc<ServiceInner>,
}

#[derive(Debug)]
struct ServiceInner {
    database: PathBuf,
    registry: Mutex<Registry>,
}

impl FlightService {
    /// Open the service over a CSV database.
    ///
    /// Loads the file if it exists, then writes it straight back so that it
    /// is ordered and carries freshly computed statuses. A missing file is
    /// created with only the header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file is rejected or the file cannot
    /// be written.
    pub fn open(database: impl Into<PathBuf>, admission: &AdmissionConfig) -> Result<Self> {
        let database = database.into();
        let registry = load_registry(&database, admission)?;
        registry.dump_csv(&database)?;
        Ok(Self::from_parts(database, registry))
    }

    /// Load the service over a CSV database without touching the file.
    ///
    /// A missing file yields an empty registry. Nothing is written until a
    /// flight is created or [`FlightService::flush`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file is rejected.
    pub fn load(database: impl Into<PathBuf>, admission: &AdmissionConfig) -> Result<Self> {
        let database = database.into();
        let registry = load_registry(&database, admission)?;
        Ok(Self::from_parts(database, registry))
    }

    fn from_parts(database: PathBuf, registry: Registry) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                database,
                registry: Mutex::new(registry),
            }),
        }
    }

    /// Path of the backing CSV file.
    #[must_use]
    pub fn database(&self) -> &Path {
        &self.inner.database
    }

    /// Fetch a flight by ID.
    ///
    /// # Errors
    ///
    /// Status 404 if the flight is unknown.
    pub async fn get_flight(
        &self,
        flight_id: &str,
    ) -> std::result::Result<FlightView, ServiceError> {
        let registry = self.inner.registry.lock().await;
        let flight = registry.get_flight(flight_id)?;
        Ok(FlightView::from(flight))
    }

    /// Admit a new flight and persist the registry.
    ///
    /// # Errors
    ///
    /// Status 400 for a duplicate ID, 500 if the database cannot be written.
    pub async fn create_flight(
        &self,
        request: FlightRequest,
    ) -> std::result::Result<FlightView, ServiceError> {
        let mut registry = self.inner.registry.lock().await;
        let flight_id = request.flight_id.clone();

        let status = registry.add_flight(request.into_flight())?;
        registry.dump_csv(&self.inner.database)?;
        info!("Created flight {} ({})", flight_id, status);

        let flight = registry.get_flight(&flight_id)?;
        Ok(FlightView::from(flight))
    }

    /// Admission statistics for the current registry.
    pub async fn stats(&self) -> RegistryStats {
        self.inner.registry.lock().await.stats()
    }

    /// Write the registry to the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn flush(&self) -> Result<()> {
        let registry = self.inner.registry.lock().await;
        registry.dump_csv(&self.inner.database)
    }
}

fn load_registry(database: &Path, admission: &AdmissionConfig) -> Result<Registry> {
    let mut registry = Registry::from_config(admission);
    if database.exists() {
        registry.load_csv(database)?;
    } else {
        debug!("No database at {}, starting empty", database.display());
    }
    Ok(registry)
}

/// Serde adapter for `HH:MM` times of day.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::codec;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&codec::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        codec::parse_time(text.trim()).map_err(serde::de::Error::custom)
    }
}
