use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::debug;

use super::{catalog, QualityDataSource};
use crate::classify::classify_or;
use crate::dates;
use crate::errors::Result;
use crate::models::{MonitoringSite, Parameter, RawReading, Status, WaterSource};

// ---

const WATER_SOURCES_LATENCY_MS: u64 = 600;
const MONITORING_SITES_LATENCY_MS: u64 = 500;
const PARAMETERS_LATENCY_MS: u64 = 400;
const QUALITY_DATA_LATENCY_MS: u64 = 800;

/// In-memory backend serving the reference catalog plus generated monthly
/// readings, with simulated request latency.
///
/// Readings are generated once at construction, for every site × parameter ×
/// month going back `history_months` from `anchor`. Values are deterministic
/// for a given catalog and anchor.
#[derive(Debug, Clone)]
pub struct MockDataSource {
    anchor: NaiveDate,
    history_months: u32,
    latency_pct: u32,
    readings: Arc<Vec<RawReading>>,
}

impl MockDataSource {
    /// `latency_pct` scales the simulated delays; 0 disables them.
    pub fn new(anchor: NaiveDate, history_months: u32, latency_pct: u32) -> Self {
        // ---
        let readings = generate_quality_data(
            &catalog::monitoring_sites(),
            &catalog::parameters(),
            anchor,
            history_months,
        );
        debug!(
            "Generated {} mock readings anchored at {}",
            readings.len(),
            anchor
        );

        Self {
            anchor,
            history_months,
            latency_pct,
            readings: Arc::new(readings),
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn history_months(&self) -> u32 {
        self.history_months
    }

    async fn simulate_latency(&self, base_ms: u64) {
        if self.latency_pct == 0 {
            return;
        }
        let millis = base_ms * u64::from(self.latency_pct) / 100;
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

impl QualityDataSource for MockDataSource {
    async fn fetch_water_sources(&self) -> Result<Vec<WaterSource>> {
        self.simulate_latency(WATER_SOURCES_LATENCY_MS).await;
        Ok(catalog::water_sources())
    }

    async fn fetch_monitoring_sites(&self) -> Result<Vec<MonitoringSite>> {
        self.simulate_latency(MONITORING_SITES_LATENCY_MS).await;
        Ok(catalog::monitoring_sites())
    }

    async fn fetch_parameters(&self) -> Result<Vec<Parameter>> {
        self.simulate_latency(PARAMETERS_LATENCY_MS).await;
        Ok(catalog::parameters())
    }

    async fn fetch_quality_data(&self) -> Result<Vec<RawReading>> {
        self.simulate_latency(QUALITY_DATA_LATENCY_MS).await;
        Ok(self.readings.as_ref().clone())
    }
}

// ---

/// One reading per site, parameter and month, newest month first.
fn generate_quality_data(
    sites: &[MonitoringSite],
    parameters: &[Parameter],
    anchor: NaiveDate,
    history_months: u32,
) -> Vec<RawReading> {
    // ---
    let mut data = Vec::new();

    for site in sites {
        for (param_index, param) in parameters.iter().enumerate() {
            for i in 0..history_months {
                let Some(date) = dates::months_back(anchor, i) else {
                    continue;
                };

                let seed = (u64::from(site.id) << 32) ^ ((param_index as u64) << 16) ^ u64::from(i);
                let value = round2(sample_value(&param.id, seed));
                let status = classify_or(value, &param.interpretation, Status::DEFAULT);

                data.push(RawReading {
                    id: format!("{}-{}-{}", site.id, param.id, i),
                    site_id: site.id,
                    site_name: site.name.clone(),
                    water_source_id: site.water_source_id,
                    parameter_id: param.id.clone(),
                    parameter_name: param.name.clone(),
                    value,
                    unit: param.unit.clone(),
                    date: dates::format_date(date),
                    status: Some(status),
                });
            }
        }
    }

    data
}

/// Value in a plausible range for the parameter.
fn sample_value(parameter_id: &str, seed: u64) -> f64 {
    let r = unit_interval(seed);
    match parameter_id {
        "ph" => 6.5 + r * 2.5,
        "turbidity" => r * 4.0,
        "color" => r * 25.0,
        "conductivity" => 200.0 + r * 800.0,
        // Clean 70% of the time, otherwise 0..=9 colonies.
        "total_coliforms" => {
            if r < 0.7 {
                0.0
            } else {
                (unit_interval(seed.wrapping_add(0x9E37)) * 10.0).floor()
            }
        }
        _ => r * 100.0,
    }
}

/// Deterministic value in `[0, 1)` derived from `seed` (splitmix64 finalizer).
fn unit_interval(seed: u64) -> f64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::Reading;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 16).unwrap()
    }

    #[test]
    fn test_generates_every_site_parameter_month() {
        // ---
        let mock = MockDataSource::new(anchor(), 12, 0);
        let readings = tokio_test::block_on(mock.fetch_quality_data()).unwrap();

        assert_eq!(readings.len(), 3 * 5 * 12);
        assert_eq!(readings[0].id, "1-ph-0");
        assert_eq!(readings[0].date, "16/12/2024");
        assert_eq!(readings[11].date, "16/01/2024");
    }

    #[test]
    fn test_generated_values_stay_in_parameter_ranges() {
        // ---
        let mock = MockDataSource::new(anchor(), 24, 0);
        let readings = tokio_test::block_on(mock.fetch_quality_data()).unwrap();

        for r in &readings {
            let (low, high) = match r.parameter_id.as_str() {
                "ph" => (6.5, 9.0),
                "turbidity" => (0.0, 4.0),
                "color" => (0.0, 25.0),
                "conductivity" => (200.0, 1000.0),
                "total_coliforms" => (0.0, 9.0),
                other => panic!("unexpected parameter {other}"),
            };
            assert!(
                r.value >= low && r.value <= high,
                "{} = {} outside [{low}, {high}]",
                r.id,
                r.value
            );
            assert_eq!(r.value, round2(r.value));
        }
    }

    #[test]
    fn test_generated_status_matches_interpretation() {
        // ---
        let parameters = catalog::parameters();
        let mock = MockDataSource::new(anchor(), 12, 0);
        let readings = tokio_test::block_on(mock.fetch_quality_data()).unwrap();

        for raw in &readings {
            let parameter = parameters.iter().find(|p| p.id == raw.parameter_id);
            let normalized: Reading = raw.normalize(parameter).expect("mock data is well formed");
            assert_eq!(Some(normalized.status), raw.status, "{}", raw.id);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = MockDataSource::new(anchor(), 12, 0);
        let b = MockDataSource::new(anchor(), 12, 0);
        assert_eq!(a.readings, b.readings);
    }

    #[test]
    fn test_unit_interval_bounds() {
        for seed in 0..10_000u64 {
            let r = unit_interval(seed);
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated_and_scaled() {
        // ---
        let mock = MockDataSource::new(anchor(), 1, 50);
        let start = tokio::time::Instant::now();
        mock.fetch_quality_data().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(400), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(800), "elapsed {elapsed:?}");

        let instant = MockDataSource::new(anchor(), 1, 0);
        let start = tokio::time::Instant::now();
        instant.fetch_parameters().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
