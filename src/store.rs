//! Process-wide dataset snapshot.
//!
//! The store is populated by an explicit [`Store::init`] call that joins the
//! four collection fetches, and afterwards replaced wholesale by
//! [`Store::refresh`]. Readers take a cheap [`Snapshot`] (an `Arc` clone) and
//! never mutate it; writers build a new [`Dataset`] and swap it in.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::errors::{Result, LOAD_FAILED_MESSAGE};
use crate::models::{MonitoringSite, Parameter, RawReading, Reading, WaterSource};
use crate::source::{Backend, QualityDataSource};

// ---

/// The four collections, with readings validated and classified.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub water_sources: Vec<WaterSource>,
    pub parameters: Vec<Parameter>,
    pub monitoring_sites: Vec<MonitoringSite>,
    pub readings: Vec<Reading>,
    /// Kept so statuses can be re-derived when parameters change.
    raw_readings: Vec<RawReading>,
}

impl Dataset {
    pub fn assemble(
        water_sources: Vec<WaterSource>,
        parameters: Vec<Parameter>,
        monitoring_sites: Vec<MonitoringSite>,
        raw_readings: Vec<RawReading>,
    ) -> Self {
        // ---
        let readings = normalize_readings(&raw_readings, &parameters);
        Self {
            water_sources,
            parameters,
            monitoring_sites,
            readings,
            raw_readings,
        }
    }

    fn with_water_sources(&self, water_sources: Vec<WaterSource>) -> Self {
        Self {
            water_sources,
            ..self.clone()
        }
    }

    fn with_monitoring_sites(&self, monitoring_sites: Vec<MonitoringSite>) -> Self {
        Self {
            monitoring_sites,
            ..self.clone()
        }
    }

    fn with_parameters(&self, parameters: Vec<Parameter>) -> Self {
        Self::assemble(
            self.water_sources.clone(),
            parameters,
            self.monitoring_sites.clone(),
            self.raw_readings.clone(),
        )
    }

    fn with_raw_readings(&self, raw_readings: Vec<RawReading>) -> Self {
        Self::assemble(
            self.water_sources.clone(),
            self.parameters.clone(),
            self.monitoring_sites.clone(),
            raw_readings,
        )
    }

    // --- lookups

    pub fn water_source(&self, id: u32) -> Option<&WaterSource> {
        self.water_sources.iter().find(|s| s.id == id)
    }

    pub fn monitoring_site(&self, id: u32) -> Option<&MonitoringSite> {
        self.monitoring_sites.iter().find(|s| s.id == id)
    }

    pub fn parameter(&self, id: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id == id)
    }

    pub fn sites_of(&self, water_source_id: u32) -> Vec<MonitoringSite> {
        self.monitoring_sites
            .iter()
            .filter(|s| s.water_source_id == water_source_id)
            .cloned()
            .collect()
    }

    pub fn readings_for_parameter(&self, parameter_id: &str) -> Vec<Reading> {
        self.filter_readings(|r| r.parameter_id == parameter_id)
    }

    pub fn readings_for_source(&self, water_source_id: u32) -> Vec<Reading> {
        self.filter_readings(|r| r.water_source_id == water_source_id)
    }

    pub fn readings_for_site(&self, site_id: u32) -> Vec<Reading> {
        self.filter_readings(|r| r.site_id == site_id)
    }

    fn filter_readings(&self, keep: impl Fn(&Reading) -> bool) -> Vec<Reading> {
        self.readings.iter().filter(|r| keep(r)).cloned().collect()
    }

    /// Date of the most recent reading.
    pub fn last_update(&self) -> Option<NaiveDate> {
        self.readings.iter().map(|r| r.date).max()
    }
}

fn normalize_readings(raw_readings: &[RawReading], parameters: &[Parameter]) -> Vec<Reading> {
    // ---
    let mut unknown: HashSet<&str> = HashSet::new();
    let mut readings = Vec::with_capacity(raw_readings.len());

    for raw in raw_readings {
        let parameter = parameters.iter().find(|p| p.id == raw.parameter_id);
        if parameter.is_none() && unknown.insert(raw.parameter_id.as_str()) {
            warn!("Parameter not found: {}", raw.parameter_id);
        }
        match raw.normalize(parameter) {
            Some(reading) => readings.push(reading),
            None => debug!(
                "Excluding malformed reading {} (value={}, date='{}')",
                raw.id, raw.value, raw.date
            ),
        }
    }

    if readings.len() < raw_readings.len() {
        info!(
            "Excluded {} of {} readings as malformed",
            raw_readings.len() - readings.len(),
            raw_readings.len()
        );
    }
    readings
}

// ---

/// Which collection to reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataKind {
    WaterSources,
    Parameters,
    MonitoringSites,
    QualityData,
    #[default]
    All,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::WaterSources => "waterSources",
            DataKind::Parameters => "parameters",
            DataKind::MonitoringSites => "monitoringSites",
            DataKind::QualityData => "qualityData",
            DataKind::All => "all",
        };
        f.write_str(name)
    }
}

/// What readers see: the current dataset plus load state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub data: Arc<Dataset>,
    pub loading: bool,
    /// Localized message for the last failed load, if any.
    pub error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

pub struct Store<S = Backend> {
    source: S,
    state: RwLock<Snapshot>,
    /// Serializes writers so a refresh never builds on a stale dataset.
    writer: Mutex<()>,
}

impl<S: QualityDataSource> Store<S> {
    /// Create the store and perform the initial load.
    ///
    /// A failed load does not prevent startup; the snapshot carries the error
    /// message and an empty dataset until a refresh succeeds.
    pub async fn init(source: S) -> Self {
        let store = Self {
            source,
            state: RwLock::new(Snapshot {
                loading: true,
                ..Snapshot::default()
            }),
            writer: Mutex::new(()),
        };
        if let Err(e) = store.fetch_all().await {
            debug!("Initial load failed, starting with an empty dataset: {}", e);
        }
        store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    /// Fetch all four collections concurrently and swap in the result.
    /// On failure the previous dataset is kept.
    pub async fn fetch_all(&self) -> Result<()> {
        let _guard = self.writer.lock().await;
        self.load_all().await
    }

    async fn load_all(&self) -> Result<()> {
        // ---
        self.begin().await;

        let fetched = tokio::try_join!(
            self.source.fetch_water_sources(),
            self.source.fetch_parameters(),
            self.source.fetch_monitoring_sites(),
            self.source.fetch_quality_data(),
        );

        match fetched {
            Ok((water_sources, parameters, monitoring_sites, raw_readings)) => {
                let dataset =
                    Dataset::assemble(water_sources, parameters, monitoring_sites, raw_readings);
                info!(
                    "Dataset loaded: {} sources, {} sites, {} parameters, {} readings",
                    dataset.water_sources.len(),
                    dataset.monitoring_sites.len(),
                    dataset.parameters.len(),
                    dataset.readings.len()
                );
                self.commit(dataset).await;
                Ok(())
            }
            Err(e) => {
                error!("Error fetching data: {}", e);
                self.fail(LOAD_FAILED_MESSAGE.to_string()).await;
                Err(e)
            }
        }
    }

    /// Reload one collection, or everything for [`DataKind::All`].
    pub async fn refresh(&self, kind: DataKind) -> Result<()> {
        // ---
        let _guard = self.writer.lock().await;
        self.begin().await;
        let current = self.snapshot().await.data;

        let rebuilt = match kind {
            DataKind::All => return self.load_all().await,
            DataKind::WaterSources => self
                .source
                .fetch_water_sources()
                .await
                .map(|v| current.with_water_sources(v)),
            DataKind::Parameters => self
                .source
                .fetch_parameters()
                .await
                .map(|v| current.with_parameters(v)),
            DataKind::MonitoringSites => self
                .source
                .fetch_monitoring_sites()
                .await
                .map(|v| current.with_monitoring_sites(v)),
            DataKind::QualityData => self
                .source
                .fetch_quality_data()
                .await
                .map(|v| current.with_raw_readings(v)),
        };

        match rebuilt {
            Ok(dataset) => {
                info!("Refreshed {}", kind);
                self.commit(dataset).await;
                Ok(())
            }
            Err(e) => {
                error!("Error refreshing {}: {}", kind, e);
                self.fail(format!("Error al actualizar {kind}")).await;
                Err(e)
            }
        }
    }

    async fn begin(&self) {
        self.state.write().await.loading = true;
    }

    async fn commit(&self, dataset: Dataset) {
        let mut state = self.state.write().await;
        state.data = Arc::new(dataset);
        state.loading = false;
        state.error = None;
        state.loaded_at = Some(Utc::now());
    }

    async fn fail(&self, message: String) {
        let mut state = self.state.write().await;
        state.loading = false;
        state.error = Some(message);
    }
}
