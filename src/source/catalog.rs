//! Reference catalog for the Fusagasugá observatory: the monitored water
//! sources, their monitoring sites and the quality parameters with their
//! Resolución 2115 de 2007 limits.
//!
//! The mock backend serves these records as-is.

use crate::models::{
    Coordinates, Interpretation, LegalLimit, MonitoringSite, Parameter, SiteType, Status,
    ValueRange, WaterSource, WaterSourceType,
};

// ---

const RESOLUTION_2115: &str = "Resolución 2115 de 2007";

pub fn water_sources() -> Vec<WaterSource> {
    vec![
        WaterSource {
            id: 1,
            name: "Río Cuja".to_string(),
            kind: WaterSourceType::River,
            description: "Principal fuente de abastecimiento para el acueducto de Fusagasugá."
                .to_string(),
            coordinates: Coordinates {
                lat: 4.309306,
                lng: -74.342528,
            },
            image_url: Some("/assets/images/rio-cuja.jpg".to_string()),
            average_flow: "120 L/s".to_string(),
            distance: "8.3 km al casco urbano".to_string(),
            catchment_location: "Vereda Alto del Molino".to_string(),
            catchment_coordinates: "N:4°18′34″ - W:74°20′31″".to_string(),
        },
        WaterSource {
            id: 2,
            name: "Quebrada Honda (Barro Blanco)".to_string(),
            kind: WaterSourceType::Stream,
            description:
                "Fuente secundaria que complementa el suministro de agua para el municipio."
                    .to_string(),
            coordinates: Coordinates {
                lat: 4.382481,
                lng: -74.313856,
            },
            image_url: Some("/assets/images/quebrada-honda.jpg".to_string()),
            average_flow: "85 L/s".to_string(),
            distance: "11.2 km al casco urbano".to_string(),
            catchment_location: "Vereda Providencia".to_string(),
            catchment_coordinates: "N:4°22′56.93″ - W:74°18′49.88″".to_string(),
        },
    ]
}

pub fn monitoring_sites() -> Vec<MonitoringSite> {
    vec![
        MonitoringSite {
            id: 1,
            name: "Bocatoma Río Cuja".to_string(),
            water_source_id: 1,
            kind: SiteType::Catchment,
            coordinates: Coordinates {
                lat: 4.309306,
                lng: -74.342528,
            },
            description: "Punto de captación principal del acueducto municipal".to_string(),
            image_url: Some("/assets/images/bocatoma-cuja.jpg".to_string()),
        },
        MonitoringSite {
            id: 2,
            name: "Puente Aguadita - Río Cuja".to_string(),
            water_source_id: 1,
            kind: SiteType::Monitoring,
            coordinates: Coordinates {
                lat: 4.323456,
                lng: -74.334567,
            },
            description: "Punto de monitoreo antes de la zona urbana".to_string(),
            image_url: Some("/assets/images/puente-aguadita.jpg".to_string()),
        },
        MonitoringSite {
            id: 3,
            name: "Bocatoma Quebrada Honda".to_string(),
            water_source_id: 2,
            kind: SiteType::Catchment,
            coordinates: Coordinates {
                lat: 4.382481,
                lng: -74.313856,
            },
            description: "Punto de captación secundario del acueducto municipal".to_string(),
            image_url: Some("/assets/images/bocatoma-honda.jpg".to_string()),
        },
    ]
}

fn interp(range: ValueRange, status: Status, description: &str) -> Interpretation {
    Interpretation {
        range,
        status,
        description: description.to_string(),
    }
}

fn limit(min: Option<f64>, max: Option<f64>) -> Option<LegalLimit> {
    Some(LegalLimit {
        min,
        max,
        reference: RESOLUTION_2115.to_string(),
    })
}

pub fn parameters() -> Vec<Parameter> {
    vec![
        Parameter {
            id: "ph".to_string(),
            name: "pH".to_string(),
            unit: "unidades".to_string(),
            description: "Medida de acidez o alcalinidad del agua".to_string(),
            category: "físico-químico".to_string(),
            legal_limit: limit(Some(6.5), Some(9.0)),
            interpretation: vec![
                interp(
                    ValueRange::bounded(0.0, 6.5),
                    Status::Low,
                    "Agua ácida, puede causar corrosión",
                ),
                interp(
                    ValueRange::bounded(6.5, 9.0),
                    Status::Optimal,
                    "Rango óptimo para consumo humano",
                ),
                interp(
                    ValueRange::bounded(9.0, 14.0),
                    Status::High,
                    "Agua alcalina, puede afectar el sabor",
                ),
            ],
        },
        Parameter {
            id: "turbidity".to_string(),
            name: "Turbiedad".to_string(),
            unit: "NTU".to_string(),
            description: "Medida de la claridad del agua".to_string(),
            category: "físico".to_string(),
            legal_limit: limit(None, Some(2.0)),
            interpretation: vec![
                interp(
                    ValueRange::bounded(0.0, 2.0),
                    Status::Optimal,
                    "Agua clara, apta para consumo",
                ),
                interp(
                    ValueRange::bounded(2.0, 5.0),
                    Status::Acceptable,
                    "Requiere tratamiento convencional",
                ),
                interp(
                    ValueRange::at_least(5.0),
                    Status::High,
                    "Requiere tratamiento avanzado",
                ),
            ],
        },
        Parameter {
            id: "color".to_string(),
            name: "Color Aparente".to_string(),
            unit: "UPC".to_string(),
            description: "Medida del color del agua".to_string(),
            category: "físico".to_string(),
            legal_limit: limit(None, Some(15.0)),
            interpretation: vec![
                interp(
                    ValueRange::bounded(0.0, 15.0),
                    Status::Optimal,
                    "Agua incolora, apta para consumo",
                ),
                interp(
                    ValueRange::bounded(15.0, 30.0),
                    Status::Acceptable,
                    "Requiere tratamiento básico",
                ),
                interp(
                    ValueRange::at_least(30.0),
                    Status::High,
                    "Requiere tratamiento avanzado",
                ),
            ],
        },
        Parameter {
            id: "conductivity".to_string(),
            name: "Conductividad".to_string(),
            unit: "µS/cm".to_string(),
            description: "Capacidad del agua para conducir electricidad".to_string(),
            category: "físico-químico".to_string(),
            legal_limit: limit(None, Some(1000.0)),
            interpretation: vec![
                interp(
                    ValueRange::bounded(0.0, 400.0),
                    Status::Low,
                    "Agua con baja mineralización",
                ),
                interp(
                    ValueRange::bounded(400.0, 1000.0),
                    Status::Optimal,
                    "Rango normal para agua potable",
                ),
                interp(
                    ValueRange::at_least(1000.0),
                    Status::High,
                    "Alta mineralización, sabor salado",
                ),
            ],
        },
        Parameter {
            id: "total_coliforms".to_string(),
            name: "Coliformes Totales".to_string(),
            unit: "UFC/100ml".to_string(),
            description: "Indicador de contaminación microbiológica".to_string(),
            category: "microbiológico".to_string(),
            legal_limit: limit(None, Some(0.0)),
            interpretation: vec![
                interp(
                    ValueRange::bounded(0.0, 0.0),
                    Status::Optimal,
                    "Agua segura microbiológicamente",
                ),
                interp(
                    ValueRange::at_least(1.0),
                    Status::High,
                    "Agua contaminada, no apta para consumo sin tratamiento",
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    // ---
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_no_duplicate_ids() {
        // ---
        let mut seen = HashSet::new();
        for source in water_sources() {
            assert!(seen.insert(source.id), "duplicate source id {}", source.id);
        }

        let mut seen = HashSet::new();
        for site in monitoring_sites() {
            assert!(seen.insert(site.id), "duplicate site id {}", site.id);
        }

        let mut seen = HashSet::new();
        for parameter in parameters() {
            assert!(seen.insert(parameter.id.clone()), "duplicate parameter '{}'", parameter.id);
        }
    }

    #[test]
    fn test_every_site_belongs_to_a_known_source() {
        let source_ids: Vec<u32> = water_sources().iter().map(|s| s.id).collect();
        for site in monitoring_sites() {
            assert!(
                source_ids.contains(&site.water_source_id),
                "site '{}' points at unknown source {}",
                site.name,
                site.water_source_id
            );
        }
    }

    #[test]
    fn test_interpretation_ranges_ascend_and_are_well_formed() {
        // ---
        // Overlap at shared boundaries is allowed; first match wins there.
        for parameter in parameters() {
            assert!(
                !parameter.interpretation.is_empty(),
                "'{}' needs at least one range",
                parameter.name
            );
            for pair in parameter.interpretation.windows(2) {
                assert!(
                    pair[0].range.low() < pair[1].range.low(),
                    "ranges of '{}' must ascend",
                    parameter.name
                );
                assert!(pair[0].range.high().is_some(), "only the last range may be open");
            }
            for entry in &parameter.interpretation {
                if let Some(high) = entry.range.high() {
                    assert!(entry.range.low() <= high, "inverted range in '{}'", parameter.name);
                }
            }
        }
    }

    #[test]
    fn test_legal_limits_fall_in_optimal_band() {
        // ---
        for parameter in parameters() {
            let limit = parameter.legal_limit.as_ref().expect("catalog parameters have limits");
            if let Some(max) = limit.max {
                assert_eq!(
                    parameter.classify(max),
                    Some(Status::Optimal),
                    "max limit of '{}' should still be optimal",
                    parameter.name
                );
            }
        }
    }
}
