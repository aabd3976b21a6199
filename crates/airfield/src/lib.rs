//! `airfield` - Flight admission control over a CSV flight schedule
//!
//! Flights are admitted one at a time into a [`Registry`], which marks each
//! one as a success or failure based on daily capacity and minimum ground
//! time, and persists the result as CSV ordered by arrival.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod flight;
pub mod logging;
pub mod registry;
pub mod service;

pub use config::Config;
pub use error::{Error, Result};
pub use flight::{Flight, SuccessStatus};
pub use logging::init_logging;
pub use registry::{Registry, RegistryStats};
pub use service::{FlightRequest, FlightService, FlightView, ServiceError};
