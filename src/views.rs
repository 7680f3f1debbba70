//! Page-level views: each function takes the current [`Dataset`] and shapes
//! one dashboard page, ready to serialize.

use chrono::Datelike;
use serde::Serialize;
use tracing::warn;

use crate::aggregate::{
    by_parameter_and_site, by_parameter_and_source, by_site, latest_per_key, monthly_series,
    reference_lines, site_comparison, MonthlySeries, ReferenceLine, SiteComparison,
};
use crate::dates;
use crate::errors::{ObservatoryError, Result};
use crate::models::{LegalLimit, MonitoringSite, Parameter, Reading, Status, WaterSource};
use crate::store::Dataset;
use crate::widgets::{DashboardWidget, ListItem, WidgetContent};

// ---

const CRITICAL_LIMIT: usize = 3;
const UNAVAILABLE: &str = "No disponible";
const UNKNOWN_PARAMETER: &str = "Desconocido";

fn newest_first(mut readings: Vec<Reading>) -> Vec<Reading> {
    readings.sort_by(|a, b| b.date.cmp(&a.date));
    readings
}

/// Highest-severity status among `readings`, `óptimo` when empty.
fn worst_status<'a>(readings: impl IntoIterator<Item = &'a Reading>) -> Status {
    readings
        .into_iter()
        .map(|r| r.status)
        .max_by_key(Status::severity)
        .unwrap_or(Status::Optimal)
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSourceSummary {
    #[serde(flatten)]
    pub source: WaterSource,
    pub site_count: usize,
    /// Worst status among the latest reading of each parameter at each site.
    pub status: Status,
}

/// Latest reading that is not `óptimo`, with its parameter's display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalReading {
    #[serde(flatten)]
    pub reading: Reading,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeOverview {
    /// `dd/mm/yyyy`, or `No disponible` without readings.
    pub last_update: String,
    pub water_sources: Vec<WaterSourceSummary>,
    pub latest: Vec<Reading>,
    pub critical: Vec<CriticalReading>,
    pub widgets: Vec<DashboardWidget>,
}

pub fn home_overview(data: &Dataset) -> HomeOverview {
    // ---
    let latest = latest_per_key(&data.readings, by_parameter_and_site);

    let last_update = data
        .last_update()
        .map(dates::format_date)
        .unwrap_or_else(|| UNAVAILABLE.to_string());

    let critical: Vec<CriticalReading> = latest
        .iter()
        .filter(|r| r.status != Status::Optimal)
        .take(CRITICAL_LIMIT)
        .map(|r| {
            let (name, unit) = match data.parameter(&r.parameter_id) {
                Some(p) => (p.name.clone(), p.unit.clone()),
                None => (UNKNOWN_PARAMETER.to_string(), String::new()),
            };
            CriticalReading {
                reading: Reading { unit, ..r.clone() },
                name,
            }
        })
        .collect();

    let water_sources: Vec<WaterSourceSummary> = data
        .water_sources
        .iter()
        .map(|source| WaterSourceSummary {
            source: source.clone(),
            site_count: data.sites_of(source.id).len(),
            status: worst_status(latest.iter().filter(|r| r.water_source_id == source.id)),
        })
        .collect();

    let widgets = home_widgets(data, &water_sources, &latest, &critical, &last_update);

    HomeOverview {
        last_update,
        water_sources,
        latest,
        critical,
        widgets,
    }
}

fn home_widgets(
    data: &Dataset,
    sources: &[WaterSourceSummary],
    latest: &[Reading],
    critical: &[CriticalReading],
    last_update: &str,
) -> Vec<DashboardWidget> {
    // ---
    let mut widgets = vec![
        DashboardWidget::new(
            "Fuentes monitoreadas",
            WidgetContent::Stat {
                value: sources.len().to_string(),
                change: None,
            },
        )
        .linked("/mapa"),
        DashboardWidget::new(
            "Sitios de monitoreo",
            WidgetContent::Stat {
                value: data.monitoring_sites.len().to_string(),
                change: None,
            },
        )
        .linked("/mapa"),
    ];

    for summary in sources {
        let own: Vec<&Reading> = latest
            .iter()
            .filter(|r| r.water_source_id == summary.source.id)
            .collect();
        let optimal = own.iter().filter(|r| r.status == Status::Optimal).count();
        widgets.push(
            DashboardWidget::new(
                format!("Estado {}", summary.source.name),
                WidgetContent::Status {
                    status: summary.status,
                    description: format!(
                        "{} de {} mediciones recientes en rango óptimo",
                        optimal,
                        own.len()
                    ),
                },
            )
            .linked(format!("/fuente/{}", summary.source.id)),
        );
    }

    widgets.push(
        DashboardWidget::new(
            "Parámetros críticos",
            WidgetContent::List {
                items: critical
                    .iter()
                    .map(|c| ListItem {
                        label: format!("{} - {}", c.name, c.reading.site_name),
                        value: critical_value(&c.reading),
                    })
                    .collect(),
            },
        )
        .linked("/datos"),
    );

    widgets.push(DashboardWidget::new(
        "Última actualización",
        WidgetContent::Text {
            text: last_update.to_string(),
        },
    ));

    widgets
}

/// `6.31 unidades (9 sept)`
fn critical_value(reading: &Reading) -> String {
    let measured = if reading.unit.is_empty() {
        reading.value.to_string()
    } else {
        format!("{} {}", reading.value, reading.unit)
    };
    format!(
        "{} ({} {})",
        measured,
        reading.date.day(),
        dates::short_month(reading.date)
    )
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Line chart of one parameter over time, one line per site.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterChart {
    pub title: String,
    pub parameter_id: String,
    pub unit: String,
    pub series: MonthlySeries,
    pub reference_lines: Vec<ReferenceLine>,
}

pub fn parameter_chart(parameter: &Parameter, readings: &[Reading]) -> ParameterChart {
    ParameterChart {
        title: format!("Evolución de {} ({})", parameter.name, parameter.unit),
        parameter_id: parameter.id.clone(),
        unit: parameter.unit.clone(),
        series: monthly_series(readings),
        reference_lines: reference_lines(parameter.legal_limit.as_ref()),
    }
}

// ---------------------------------------------------------------------------
// Water source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSourceDetail {
    pub source: WaterSource,
    pub sites: Vec<MonitoringSite>,
    /// Parameters measured at this source, in order of first appearance.
    pub parameters: Vec<Parameter>,
    pub latest: Vec<Reading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ParameterChart>,
}

pub fn water_source_detail(
    data: &Dataset,
    source_id: u32,
    selected_parameter: Option<&str>,
) -> Result<WaterSourceDetail> {
    // ---
    let source = data.water_source(source_id).cloned().ok_or_else(|| {
        warn!("Water source not found: {}", source_id);
        ObservatoryError::not_found("water source", source_id)
    })?;

    let readings = data.readings_for_source(source_id);

    let mut parameters: Vec<Parameter> = Vec::new();
    for reading in &readings {
        if parameters.iter().any(|p| p.id == reading.parameter_id) {
            continue;
        }
        if let Some(parameter) = data.parameter(&reading.parameter_id) {
            parameters.push(parameter.clone());
        }
    }

    let chart = match selected_parameter {
        Some(id) => {
            let parameter = data.parameter(id).ok_or_else(|| {
                warn!("Parameter not found: {}", id);
                ObservatoryError::not_found("parameter", id)
            })?;
            let series_input: Vec<Reading> = readings
                .iter()
                .filter(|r| r.parameter_id == id)
                .cloned()
                .collect();
            Some(parameter_chart(parameter, &series_input))
        }
        None => None,
    };

    Ok(WaterSourceDetail {
        sites: data.sites_of(source_id),
        latest: latest_per_key(&readings, by_parameter_and_site),
        source,
        parameters,
        chart,
    })
}

// ---------------------------------------------------------------------------
// Parameter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDetail {
    pub parameter: Parameter,
    /// e.g. `Mínimo: 6.5 unidades / Máximo: 9 unidades`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_limit_text: Option<String>,
    /// Newest first.
    pub readings: Vec<Reading>,
    pub latest_by_site: Vec<Reading>,
    pub chart: ParameterChart,
    pub comparison: SiteComparison,
}

pub fn parameter_detail(data: &Dataset, parameter_id: &str) -> Result<ParameterDetail> {
    // ---
    let parameter = data.parameter(parameter_id).cloned().ok_or_else(|| {
        warn!("Parameter not found: {}", parameter_id);
        ObservatoryError::not_found("parameter", parameter_id)
    })?;

    let readings = newest_first(data.readings_for_parameter(parameter_id));
    let latest_by_site = latest_per_key(&readings, by_site);

    Ok(ParameterDetail {
        legal_limit_text: parameter
            .legal_limit
            .as_ref()
            .and_then(|limit| legal_limit_text(limit, &parameter.unit)),
        chart: parameter_chart(&parameter, &readings),
        comparison: site_comparison(&latest_by_site, Some(&parameter)),
        parameter,
        readings,
        latest_by_site,
    })
}

pub fn legal_limit_text(limit: &LegalLimit, unit: &str) -> Option<String> {
    let parts: Vec<String> = [("Mínimo", limit.min), ("Máximo", limit.max)]
        .into_iter()
        .filter_map(|(label, bound)| bound.map(|v| format!("{label}: {v} {unit}")))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" / "))
    }
}

// ---------------------------------------------------------------------------
// Monitoring site
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDetail {
    pub site: MonitoringSite,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_source: Option<WaterSource>,
    /// Newest first.
    pub readings: Vec<Reading>,
    /// Latest reading per parameter.
    pub latest: Vec<Reading>,
}

pub fn site_detail(data: &Dataset, site_id: u32) -> Result<SiteDetail> {
    // ---
    let site = data.monitoring_site(site_id).cloned().ok_or_else(|| {
        warn!("Monitoring site not found: {}", site_id);
        ObservatoryError::not_found("monitoring site", site_id)
    })?;

    let water_source = data.water_source(site.water_source_id).cloned();
    if water_source.is_none() {
        warn!(
            "Site {} points at missing water source {}",
            site.id, site.water_source_id
        );
    }

    let readings = newest_first(data.readings_for_site(site_id));
    let latest = latest_per_key(&readings, |r: &Reading| r.parameter_id.clone());

    Ok(SiteDetail {
        site,
        water_source,
        readings,
        latest,
    })
}

// ---------------------------------------------------------------------------
// Analysis: source vs source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compliance {
    #[serde(rename = "Cumple")]
    Complies,
    #[serde(rename = "Requiere tratamiento")]
    RequiresTreatment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceValue {
    pub value: f64,
    pub unit: String,
    pub date: chrono::NaiveDate,
    pub status: Status,
    pub compliance: Compliance,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRow {
    pub parameter_id: String,
    pub name: String,
    pub category: String,
    /// `6.5 - 9`, `Máx. 2` or `N/A`.
    pub limit: String,
    pub left: Option<SourceValue>,
    pub right: Option<SourceValue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAnalysis {
    pub left: WaterSource,
    pub right: WaterSource,
    pub rows: Vec<AnalysisRow>,
}

/// Latest value of each parameter at two sources, side by side, with
/// compliance against the legal limit.
pub fn source_analysis(data: &Dataset, left_id: u32, right_id: u32) -> Result<SourceAnalysis> {
    // ---
    let lookup = |id: u32| {
        data.water_source(id).cloned().ok_or_else(|| {
            warn!("Water source not found: {}", id);
            ObservatoryError::not_found("water source", id)
        })
    };
    let left = lookup(left_id)?;
    let right = lookup(right_id)?;

    let latest = latest_per_key(&newest_first(data.readings.clone()), by_parameter_and_source);

    let value_at = |parameter: &Parameter, source_id: u32| {
        latest
            .iter()
            .find(|r| r.parameter_id == parameter.id && r.water_source_id == source_id)
            .map(|r| SourceValue {
                value: r.value,
                unit: r.unit.clone(),
                date: r.date,
                status: r.status,
                compliance: compliance(parameter.legal_limit.as_ref(), r.value),
            })
    };

    let rows = data
        .parameters
        .iter()
        .map(|parameter| AnalysisRow {
            parameter_id: parameter.id.clone(),
            name: parameter.name.clone(),
            category: parameter.category.clone(),
            limit: limit_label(parameter.legal_limit.as_ref()),
            left: value_at(parameter, left_id),
            right: value_at(parameter, right_id),
        })
        .collect();

    Ok(SourceAnalysis { left, right, rows })
}

pub fn compliance(limit: Option<&LegalLimit>, value: f64) -> Compliance {
    match limit {
        Some(limit) if !limit.complies(value) => Compliance::RequiresTreatment,
        _ => Compliance::Complies,
    }
}

pub fn limit_label(limit: Option<&LegalLimit>) -> String {
    match limit.map(|l| (l.min, l.max)) {
        Some((Some(min), Some(max))) => format!("{min} - {max}"),
        Some((None, Some(max))) => format!("Máx. {max}"),
        Some((Some(min), None)) => format!("Mín. {min}"),
        _ => "N/A".to_string(),
    }
}
