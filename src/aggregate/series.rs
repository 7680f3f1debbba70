use std::collections::BTreeMap;

use serde::Serialize;

use super::monthly::group_by_month;
use crate::dates::MonthKey;
use crate::models::{LegalLimit, Parameter, Reading, Status};

// ---

/// Bar color when a value has no interpretation match.
pub const NEUTRAL_BAR_COLOR: &str = "#2563eb";

/// One chart row per month, one column per site.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySeriesRow {
    /// e.g. `Enero 2024`
    pub month: String,
    pub key: MonthKey,
    /// Site name → value. Flattened so each site is its own column.
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySeries {
    /// Every site name in the input, in first-seen order. One line per site.
    pub sites: Vec<String>,
    pub rows: Vec<MonthlySeriesRow>,
}

/// Shape readings into a per-month line-chart series.
///
/// When a site has several readings in the same month, the first one in the
/// bucket (input order) is kept and the rest are ignored.
pub fn monthly_series(readings: &[Reading]) -> MonthlySeries {
    // ---
    let rows = group_by_month(readings)
        .into_iter()
        .map(|bucket| {
            let mut values = BTreeMap::new();
            for item in &bucket.items {
                values.entry(item.site_name.clone()).or_insert(item.value);
            }
            MonthlySeriesRow {
                month: bucket.label(),
                key: bucket.key,
                values,
            }
        })
        .collect();

    let mut sites: Vec<String> = Vec::new();
    for reading in readings {
        if !sites.contains(&reading.site_name) {
            sites.push(reading.site_name.clone());
        }
    }

    MonthlySeries { sites, rows }
}

// ---

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteComparisonRow {
    pub site_name: String,
    pub value: f64,
    pub status: Option<Status>,
    pub bar_color: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteComparison {
    pub rows: Vec<SiteComparisonRow>,
    pub reference_lines: Vec<ReferenceLine>,
}

/// Shape a single time slice (typically the latest reading per site) into
/// bar-chart rows.
///
/// Status banding uses the parameter's interpretation with no default: a
/// value outside every range gets no status and the neutral color. Without a
/// parameter every bar is neutral.
pub fn site_comparison(readings: &[Reading], parameter: Option<&Parameter>) -> SiteComparison {
    // ---
    let rows = readings
        .iter()
        .map(|reading| {
            let status = parameter.and_then(|p| p.classify(reading.value));
            SiteComparisonRow {
                site_name: reading.site_name.clone(),
                value: reading.value,
                status,
                bar_color: status.map_or(NEUTRAL_BAR_COLOR, |s| s.color()),
            }
        })
        .collect();

    SiteComparison {
        rows,
        reference_lines: reference_lines(parameter.and_then(|p| p.legal_limit.as_ref())),
    }
}

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    Min,
    Max,
}

/// Horizontal reference line for a legal limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceLine {
    pub kind: LimitKind,
    pub value: f64,
    pub label: String,
    pub stroke: &'static str,
}

/// Reference lines for whichever bounds the limit defines. A bound of zero
/// is a real limit and gets a line.
pub fn reference_lines(limit: Option<&LegalLimit>) -> Vec<ReferenceLine> {
    // ---
    let Some(limit) = limit else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    if let Some(min) = limit.min {
        lines.push(ReferenceLine {
            kind: LimitKind::Min,
            value: min,
            label: format!("Mín: {min}"),
            stroke: "#0369a1",
        });
    }
    if let Some(max) = limit.max {
        lines.push(ReferenceLine {
            kind: LimitKind::Max,
            value: max,
            label: format!("Máx: {max}"),
            stroke: "#b91c1c",
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::aggregate::fixtures::reading;
    use crate::models::{Interpretation, ValueRange};

    fn turbidity() -> Parameter {
        Parameter {
            id: "turbidity".to_string(),
            name: "Turbiedad".to_string(),
            unit: "NTU".to_string(),
            description: String::new(),
            category: "físico".to_string(),
            legal_limit: Some(LegalLimit {
                min: None,
                max: Some(2.0),
                reference: "Resolución 2115 de 2007".to_string(),
            }),
            interpretation: vec![
                Interpretation {
                    range: ValueRange::bounded(0.0, 2.0),
                    status: Status::Optimal,
                    description: String::new(),
                },
                Interpretation {
                    range: ValueRange::bounded(2.0, 5.0),
                    status: Status::Acceptable,
                    description: String::new(),
                },
            ],
        }
    }

    #[test]
    fn test_monthly_series_one_column_per_site() {
        // ---
        let readings = vec![
            reading("ph", 1, "2024-02-10", 6.9),
            reading("ph", 3, "2024-02-12", 6.4),
            reading("ph", 1, "2024-01-15", 7.0),
        ];

        let series = monthly_series(&readings);

        assert_eq!(series.sites, vec!["Bocatoma Río Cuja", "Bocatoma Quebrada Honda"]);
        assert_eq!(series.rows.len(), 2);
        assert_eq!(series.rows[0].month, "Enero 2024");
        assert_eq!(series.rows[0].values.len(), 1);
        assert_eq!(series.rows[1].values["Bocatoma Río Cuja"], 6.9);
        assert_eq!(series.rows[1].values["Bocatoma Quebrada Honda"], 6.4);
    }

    #[test]
    fn test_duplicate_site_in_month_keeps_first_value() {
        // ---
        let readings = vec![
            reading("ph", 1, "2024-03-20", 7.3),
            reading("ph", 1, "2024-03-02", 6.7),
        ];

        let series = monthly_series(&readings);

        assert_eq!(series.rows.len(), 1);
        assert_eq!(series.rows[0].values["Bocatoma Río Cuja"], 7.3);
    }

    #[test]
    fn test_monthly_series_row_serializes_sites_as_columns() {
        // ---
        let series = monthly_series(&[reading("ph", 1, "2024-01-15", 7.0)]);
        let json = serde_json::to_value(&series.rows[0]).unwrap();

        assert_eq!(json["month"], "Enero 2024");
        assert_eq!(json["Bocatoma Río Cuja"], 7.0);
        assert_eq!(json["key"]["month"], 0);
    }

    #[test]
    fn test_site_comparison_bands_by_interpretation() {
        // ---
        let readings = vec![
            reading("turbidity", 1, "2024-02-01", 1.5),
            reading("turbidity", 2, "2024-02-01", 3.2),
            reading("turbidity", 3, "2024-02-01", 10.0),
        ];

        let comparison = site_comparison(&readings, Some(&turbidity()));

        let statuses: Vec<Option<Status>> = comparison.rows.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![Some(Status::Optimal), Some(Status::Acceptable), None]);
        assert_eq!(comparison.rows[0].bar_color, "#059669");
        assert_eq!(comparison.rows[2].bar_color, NEUTRAL_BAR_COLOR);
        assert_eq!(comparison.reference_lines.len(), 1);
        assert_eq!(comparison.reference_lines[0].label, "Máx: 2");
    }

    #[test]
    fn test_site_comparison_without_parameter_is_neutral() {
        let readings = vec![reading("ph", 1, "2024-02-01", 7.0)];
        let comparison = site_comparison(&readings, None);
        assert_eq!(comparison.rows[0].bar_color, NEUTRAL_BAR_COLOR);
        assert!(comparison.reference_lines.is_empty());
    }

    #[test]
    fn test_reference_lines_include_zero_limits() {
        // ---
        let coliforms = LegalLimit {
            min: None,
            max: Some(0.0),
            reference: String::new(),
        };
        let lines = reference_lines(Some(&coliforms));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, LimitKind::Max);
        assert_eq!(lines[0].label, "Máx: 0");

        let ph = LegalLimit {
            min: Some(6.5),
            max: Some(9.0),
            reference: String::new(),
        };
        let labels: Vec<String> = reference_lines(Some(&ph)).into_iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Mín: 6.5", "Máx: 9"]);

        assert!(reference_lines(None).is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(monthly_series(&[]), MonthlySeries::default());
        assert!(site_comparison(&[], Some(&turbidity())).rows.is_empty());
    }
}
