//! Data core and HTTP API for the Fusagasugá water-quality observatory.
//!
//! Readings of physical, chemical and microbiological parameters for the
//! municipality's water sources are loaded into a [`Store`], classified
//! against each parameter's interpretation ranges, and shaped into the
//! dashboard's page views by the pure functions in [`aggregate`] and
//! [`views`].

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod dates;
pub mod errors;
pub mod models;
pub mod routes;
pub mod source;
pub mod store;
pub mod views;
pub mod widgets;

pub use config::Config;
pub use errors::{ObservatoryError, Result};
pub use models::{Parameter, RawReading, Reading, Status};
pub use source::{Backend, QualityDataSource};
pub use store::{DataKind, Dataset, Store};
