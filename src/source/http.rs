use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::QualityDataSource;
use crate::errors::{ObservatoryError, Result};
use crate::models::{MonitoringSite, Parameter, RawReading, WaterSource};

// ---

/// Backend for a JSON API exposing the four collections as arrays:
/// `{base}/water-sources`, `{base}/monitoring-sites`, `{base}/parameters`
/// and `{base}/quality-data`.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        // ---
        let url = self.url(path);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ObservatoryError::Fetch(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let body = self.get_json(path).await?;
        Ok(serde_json::from_value(body)?)
    }
}

impl QualityDataSource for HttpDataSource {
    async fn fetch_water_sources(&self) -> Result<Vec<WaterSource>> {
        self.get_collection("water-sources").await
    }

    async fn fetch_monitoring_sites(&self) -> Result<Vec<MonitoringSite>> {
        self.get_collection("monitoring-sites").await
    }

    async fn fetch_parameters(&self) -> Result<Vec<Parameter>> {
        self.get_collection("parameters").await
    }

    /// Items that fail to decode are skipped rather than failing the batch.
    async fn fetch_quality_data(&self) -> Result<Vec<RawReading>> {
        let body = self.get_json("quality-data").await?;
        let readings = decode_readings(&body)?;
        info!("Fetched {} readings from {}", readings.len(), self.base_url);
        Ok(readings)
    }
}

fn decode_readings(body: &serde_json::Value) -> Result<Vec<RawReading>> {
    // ---
    let items = body.as_array().ok_or_else(|| {
        ObservatoryError::Fetch("quality-data response is not an array".to_string())
    })?;

    let mut readings = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match serde_json::from_value::<RawReading>(item.clone()) {
            Ok(reading) => readings.push(reading),
            Err(e) => {
                debug!("Skipping reading {}: {} - Raw item: {}", i, e, item);
            }
        }
    }
    Ok(readings)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let source = HttpDataSource::new("http://localhost:9000/api/");
        assert_eq!(source.base_url(), "http://localhost:9000/api");
        assert_eq!(source.url("parameters"), "http://localhost:9000/api/parameters");
    }

    #[test]
    fn test_decode_readings_skips_malformed_items() {
        // ---
        let body = json!([
            {
                "id": "1-ph-0", "siteId": 1, "siteName": "Bocatoma Río Cuja",
                "waterSourceId": 1, "parameterId": "ph", "parameterName": "pH",
                "value": 7.1, "unit": "unidades", "date": "2024-01-15", "status": "óptimo"
            },
            { "id": "broken", "siteId": "one" },
            {
                "id": "1-ph-1", "siteId": 1, "siteName": "Bocatoma Río Cuja",
                "waterSourceId": 1, "parameterId": "ph", "value": 6.2, "date": "15/12/2023"
            }
        ]);

        let readings = decode_readings(&body).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].id, "1-ph-0");
        assert_eq!(readings[1].status, None);
    }

    #[test]
    fn test_decode_readings_rejects_non_array_body() {
        let err = decode_readings(&json!({"results": []})).unwrap_err();
        assert!(matches!(err, ObservatoryError::Fetch(_)));
    }
}
