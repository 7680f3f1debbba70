//! Data model for the water quality observatory.
//!
//! Records serialize with camelCase field names, the same shape the data
//! sources deliver and the API serves.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify;
use crate::dates;

// ---

/// Derived classification of a reading against a parameter's interpretation
/// ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "óptimo")]
    Optimal,
    #[serde(rename = "aceptable")]
    Acceptable,
    #[serde(rename = "alto")]
    High,
    #[serde(rename = "bajo")]
    Low,
}

impl Status {
    /// Fallback used when no interpretation range matches during reading
    /// normalization and mock generation.
    pub const DEFAULT: Status = Status::Optimal;

    pub fn label(&self) -> &'static str {
        match self {
            Status::Optimal => "óptimo",
            Status::Acceptable => "aceptable",
            Status::High => "alto",
            Status::Low => "bajo",
        }
    }

    /// Bar color used by the comparison chart.
    pub fn color(&self) -> &'static str {
        match self {
            Status::Optimal => "#059669",
            Status::Acceptable => "#d97706",
            Status::High => "#dc2626",
            Status::Low => "#3b82f6",
        }
    }

    /// Rank used to summarize several readings into one status.
    /// Out-of-range values outrank merely acceptable ones.
    pub fn severity(&self) -> u8 {
        match self {
            Status::Optimal => 0,
            Status::Acceptable => 1,
            Status::Low => 2,
            Status::High => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

// ---

/// Inclusive value range `[low, high]`. An absent upper bound is unbounded
/// and serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange(pub f64, pub Option<f64>);

impl ValueRange {
    pub fn bounded(low: f64, high: f64) -> Self {
        Self(low, Some(high))
    }

    pub fn at_least(low: f64) -> Self {
        Self(low, None)
    }

    pub fn low(&self) -> f64 {
        self.0
    }

    pub fn high(&self) -> Option<f64> {
        self.1
    }

    /// NaN never matches.
    pub fn contains(&self, value: f64) -> bool {
        self.0 <= value && self.1.map_or(true, |high| value <= high)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub range: ValueRange,
    pub status: Status,
    #[serde(default)]
    pub description: String,
}

/// Regulatory thresholds, used for reference lines and compliance checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalLimit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default)]
    pub reference: String,
}

impl LegalLimit {
    pub fn complies(&self, value: f64) -> bool {
        value.is_finite()
            && self.min.map_or(true, |min| value >= min)
            && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub legal_limit: Option<LegalLimit>,
    /// Checked in order; the first matching range wins.
    #[serde(default)]
    pub interpretation: Vec<Interpretation>,
}

impl Parameter {
    pub fn classify(&self, value: f64) -> Option<Status> {
        classify::classify(value, &self.interpretation)
    }
}

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterSourceType {
    River,
    Stream,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSource {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WaterSourceType,
    #[serde(default)]
    pub description: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub average_flow: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub catchment_location: String,
    #[serde(default)]
    pub catchment_coordinates: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteType {
    Catchment,
    Monitoring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSite {
    pub id: u32,
    pub name: String,
    pub water_source_id: u32,
    #[serde(rename = "type")]
    pub kind: SiteType,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

// ---

/// Reading as delivered by a data source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    pub id: String,
    pub site_id: u32,
    pub site_name: String,
    pub water_source_id: u32,
    pub parameter_id: String,
    #[serde(default)]
    pub parameter_name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    pub date: String,
    #[serde(default)]
    pub status: Option<Status>,
}

/// Validated reading served to the views.
///
/// `status` is always derived from `value` by [`RawReading::normalize`];
/// it is never taken from the source when the parameter is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: String,
    pub site_id: u32,
    pub site_name: String,
    pub water_source_id: u32,
    pub parameter_id: String,
    pub parameter_name: String,
    pub value: f64,
    pub unit: String,
    pub date: NaiveDate,
    pub status: Status,
}

impl RawReading {
    /// Validate and classify. Returns `None` for non-finite values or
    /// unparseable dates.
    ///
    /// With a known parameter the status comes from its interpretation
    /// ranges (default [`Status::DEFAULT`]); otherwise the incoming status is
    /// kept, falling back to the default.
    pub fn normalize(&self, parameter: Option<&Parameter>) -> Option<Reading> {
        // ---
        if !self.value.is_finite() {
            return None;
        }
        let date = dates::parse_date(&self.date)?;

        let status = match parameter {
            Some(p) => p.classify(self.value).unwrap_or(Status::DEFAULT),
            None => self.status.unwrap_or(Status::DEFAULT),
        };

        let (parameter_name, unit) = match parameter {
            Some(p) if self.parameter_name.is_empty() || self.unit.is_empty() => (
                non_empty_or(&self.parameter_name, &p.name),
                non_empty_or(&self.unit, &p.unit),
            ),
            _ => (self.parameter_name.clone(), self.unit.clone()),
        };

        Some(Reading {
            id: self.id.clone(),
            site_id: self.site_id,
            site_name: self.site_name.clone(),
            water_source_id: self.water_source_id,
            parameter_id: self.parameter_id.clone(),
            parameter_name,
            value: self.value,
            unit,
            date,
            status,
        })
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
