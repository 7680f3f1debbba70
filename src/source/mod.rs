//! Data-access layer.
//!
//! Views never talk to a backend directly; the [`Store`](crate::store::Store)
//! pulls the four collections through [`QualityDataSource`] and keeps the
//! normalized snapshot. Two backends exist: the mock catalog with generated
//! readings, and an HTTP/JSON API serving the same record shapes.

use std::future::Future;

use crate::errors::Result;
use crate::models::{MonitoringSite, Parameter, RawReading, WaterSource};

pub mod catalog;
mod http;
mod mock;

pub use http::HttpDataSource;
pub use mock::MockDataSource;

// ---

pub trait QualityDataSource: Send + Sync {
    fn fetch_water_sources(&self) -> impl Future<Output = Result<Vec<WaterSource>>> + Send;

    fn fetch_monitoring_sites(&self) -> impl Future<Output = Result<Vec<MonitoringSite>>> + Send;

    fn fetch_parameters(&self) -> impl Future<Output = Result<Vec<Parameter>>> + Send;

    fn fetch_quality_data(&self) -> impl Future<Output = Result<Vec<RawReading>>> + Send;
}

/// Backend selected at startup from configuration.
#[derive(Debug, Clone)]
pub enum Backend {
    Mock(MockDataSource),
    Http(HttpDataSource),
}

impl Backend {
    pub fn describe(&self) -> String {
        match self {
            Backend::Mock(mock) => format!(
                "mock ({} months of history up to {})",
                mock.history_months(),
                mock.anchor()
            ),
            Backend::Http(http) => format!("http ({})", http.base_url()),
        }
    }
}

impl QualityDataSource for Backend {
    async fn fetch_water_sources(&self) -> Result<Vec<WaterSource>> {
        match self {
            Backend::Mock(mock) => mock.fetch_water_sources().await,
            Backend::Http(http) => http.fetch_water_sources().await,
        }
    }

    async fn fetch_monitoring_sites(&self) -> Result<Vec<MonitoringSite>> {
        match self {
            Backend::Mock(mock) => mock.fetch_monitoring_sites().await,
            Backend::Http(http) => http.fetch_monitoring_sites().await,
        }
    }

    async fn fetch_parameters(&self) -> Result<Vec<Parameter>> {
        match self {
            Backend::Mock(mock) => mock.fetch_parameters().await,
            Backend::Http(http) => http.fetch_parameters().await,
        }
    }

    async fn fetch_quality_data(&self) -> Result<Vec<RawReading>> {
        match self {
            Backend::Mock(mock) => mock.fetch_quality_data().await,
            Backend::Http(http) => http.fetch_quality_data().await,
        }
    }
}
