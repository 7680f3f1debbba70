//! Configuration loader for the `fusa-water-observatory` service.
//!
//! All runtime settings are read here from environment variables (with
//! optional `.env` support provided by the caller), so no other module calls
//! `env::var` directly.
use std::env;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};

use crate::source::{Backend, HttpDataSource, MockDataSource};

/// Upper bound for `HISTORY_MONTHS`; the mock generates every month up front.
const MAX_HISTORY_MONTHS: u32 = 240;

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional `YYYY-MM-DD` environment variable.
macro_rules! parse_env_date {
    ($var_name:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d"))
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
    };
}

/// Read an optional string environment variable; blank counts as unset.
macro_rules! optional_env {
    ($var_name:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
}

/// Immutable application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // ---
    /// Port the HTTP API listens on.
    pub port: u16,

    /// Base URL of a JSON data API. `None` selects the mock backend.
    pub data_api_url: Option<String>,

    /// Scale for the mock backend's simulated latency, in percent.
    pub mock_latency_pct: u32,

    /// Months of generated history in the mock backend.
    pub history_months: u32,

    /// Date the mock history ends at.
    pub anchor_date: NaiveDate,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `OBSERVATORY_PORT` – listen port (default: 8080)
/// - `DATA_API_URL` – data API base URL (default: mock backend)
/// - `MOCK_LATENCY_PCT` – simulated latency scale (default: 100)
/// - `HISTORY_MONTHS` – mock history length (default: 12, max: 240)
/// - `ANCHOR_DATE` – last month of mock history, `YYYY-MM-DD` (default: today)
pub fn load_from_env() -> Result<Config> {
    // ---
    let port = parse_env_u32!("OBSERVATORY_PORT", 8080);
    let port = u16::try_from(port).map_err(|_| anyhow!("Invalid OBSERVATORY_PORT: {}", port))?;
    let data_api_url = optional_env!("DATA_API_URL");
    let mock_latency_pct = parse_env_u32!("MOCK_LATENCY_PCT", 100);
    let history_months = parse_env_u32!("HISTORY_MONTHS", 12);
    if history_months > MAX_HISTORY_MONTHS {
        return Err(anyhow!(
            "Invalid HISTORY_MONTHS: {} (max {})",
            history_months,
            MAX_HISTORY_MONTHS
        ));
    }
    let anchor_date = parse_env_date!("ANCHOR_DATE").unwrap_or_else(|| Local::now().date_naive());

    Ok(Config {
        port,
        data_api_url,
        mock_latency_pct,
        history_months,
        anchor_date,
    })
}

impl Config {
    /// Build the data backend this configuration selects.
    pub fn backend(&self) -> Backend {
        match &self.data_api_url {
            Some(url) => Backend::Http(HttpDataSource::new(url.clone())),
            None => Backend::Mock(MockDataSource::new(
                self.anchor_date,
                self.history_months,
                self.mock_latency_pct,
            )),
        }
    }

    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  OBSERVATORY_PORT : {}", self.port);
        tracing::info!(
            "  DATA_API_URL     : {}",
            self.data_api_url.as_deref().unwrap_or("(mock)")
        );
        tracing::info!("  MOCK_LATENCY_PCT : {}", self.mock_latency_pct);
        tracing::info!("  HISTORY_MONTHS   : {}", self.history_months);
        tracing::info!("  ANCHOR_DATE      : {}", self.anchor_date);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    const VARS: [&str; 5] = [
        "OBSERVATORY_PORT",
        "DATA_API_URL",
        "MOCK_LATENCY_PCT",
        "HISTORY_MONTHS",
        "ANCHOR_DATE",
    ];

    fn clear() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    // Environment is process-global, so every case runs in one test.
    #[test]
    fn test_load_from_env() {
        // ---
        clear();
        let cfg = load_from_env().unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.data_api_url, None);
        assert_eq!(cfg.mock_latency_pct, 100);
        assert_eq!(cfg.history_months, 12);
        assert!(matches!(cfg.backend(), Backend::Mock(_)));

        env::set_var("OBSERVATORY_PORT", "9090");
        env::set_var("DATA_API_URL", "  http://localhost:9000/api ");
        env::set_var("MOCK_LATENCY_PCT", "0");
        env::set_var("HISTORY_MONTHS", "24");
        env::set_var("ANCHOR_DATE", "2024-12-16");
        let cfg = load_from_env().unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.data_api_url.as_deref(), Some("http://localhost:9000/api"));
        assert_eq!(cfg.mock_latency_pct, 0);
        assert_eq!(cfg.history_months, 24);
        assert_eq!(cfg.anchor_date, NaiveDate::from_ymd_opt(2024, 12, 16).unwrap());
        assert!(matches!(cfg.backend(), Backend::Http(_)));

        env::set_var("DATA_API_URL", "");
        assert_eq!(load_from_env().unwrap().data_api_url, None);

        env::set_var("HISTORY_MONTHS", "twelve");
        assert!(load_from_env().is_err());
        env::set_var("HISTORY_MONTHS", "241");
        assert!(load_from_env().is_err());
        env::set_var("HISTORY_MONTHS", "240");
        assert_eq!(load_from_env().unwrap().history_months, 240);
        env::set_var("HISTORY_MONTHS", "12");

        env::set_var("OBSERVATORY_PORT", "70000");
        assert!(load_from_env().is_err());
        env::set_var("OBSERVATORY_PORT", "8080");

        env::set_var("ANCHOR_DATE", "16/12/2024");
        assert!(load_from_env().is_err());

        clear();
    }
}
