use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use proptest::prelude::*;

use fusa_water_observatory::aggregate::{
    by_parameter_and_site, group_by_month, latest_per_key, monthly_series,
};
use fusa_water_observatory::classify::{classify, classify_or};
use fusa_water_observatory::dates::MonthKey;
use fusa_water_observatory::models::{Interpretation, Reading, Status, ValueRange};
use fusa_water_observatory::source::catalog;

// ---

fn reading(id: &str, site_id: u32, parameter_id: &str, date: &str, value: f64) -> Reading {
    Reading {
        id: id.to_string(),
        site_id,
        site_name: format!("Sitio {site_id}"),
        water_source_id: 1,
        parameter_id: parameter_id.to_string(),
        parameter_name: parameter_id.to_string(),
        value,
        unit: "unidades".to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        status: Status::Optimal,
    }
}

fn scenario() -> Vec<Reading> {
    vec![
        reading("a", 1, "ph", "2024-01-15", 7.0),
        reading("b", 1, "ph", "2024-02-10", 6.9),
        reading("c", 1, "ph", "2024-01-20", 7.2),
    ]
}

#[test]
fn buckets_are_chronological_and_partition_input() {
    // ---
    let buckets = group_by_month(&scenario());

    let labels: Vec<String> = buckets.iter().map(|b| b.label()).collect();
    assert_eq!(labels, vec!["Enero 2024", "Febrero 2024"]);
    assert_eq!(buckets[0].items.len(), 2);
    assert_eq!(buckets[1].items.len(), 1);

    let total: usize = buckets.iter().map(|b| b.items.len()).sum();
    assert_eq!(total, scenario().len());
    assert!(group_by_month(&[]).is_empty());
}

#[test]
fn latest_reading_per_parameter_and_site() {
    // ---
    let latest = latest_per_key(&scenario(), by_parameter_and_site);
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].value, 6.9);
    assert!(latest_per_key(&[], by_parameter_and_site).is_empty());
}

#[test]
fn classification_first_match_and_default() {
    // ---
    let ranges = vec![
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
    ];
    assert_eq!(classify(1.5, &ranges), Some(Status::Optimal));
    assert_eq!(classify(2.0, &ranges), Some(Status::Optimal));
    assert_eq!(classify(10.0, &ranges), None);
    assert_eq!(classify_or(10.0, &ranges, Status::High), Status::High);
}

#[test]
fn aggregation_is_idempotent_over_serialized_input() {
    // ---
    let input = scenario();
    let json = serde_json::to_string(&input).unwrap();
    let reparsed: Vec<Reading> = serde_json::from_str(&json).unwrap();

    assert_eq!(monthly_series(&input), monthly_series(&reparsed));
    assert_eq!(monthly_series(&input), monthly_series(&input));
}

// ---

const PARAMETER_IDS: [&str; 3] = ["ph", "turbidity", "color"];

fn arb_reading() -> impl Strategy<Value = Reading> {
    (
        0usize..PARAMETER_IDS.len(),
        1u32..=3,
        2022i32..=2025,
        1u32..=12,
        1u32..=28,
        0i32..=10_000,
    )
        .prop_map(|(param, site, year, month, day, hundredths)| {
            let date = format!("{year}-{month:02}-{day:02}");
            let parameter_id = PARAMETER_IDS[param];
            reading(
                &format!("{site}-{parameter_id}-{date}"),
                site,
                parameter_id,
                &date,
                f64::from(hundredths) / 100.0,
            )
        })
}

fn arb_readings() -> impl Strategy<Value = Vec<Reading>> {
    prop::collection::vec(arb_reading(), 0..60)
}

proptest! {
    /// A classified value lies in the first range that contains it; no
    /// match means no range contains it and the default applies.
    #[test]
    fn classify_picks_first_containing_range(
        param in 0usize..5,
        value in -50.0f64..1500.0,
    ) {
        let parameter = &catalog::parameters()[param];
        let ranges = &parameter.interpretation;
        match classify(value, ranges) {
            Some(status) => {
                let first = ranges.iter().find(|i| i.range.contains(value));
                prop_assert_eq!(first.map(|i| i.status), Some(status));
            }
            None => {
                prop_assert!(ranges.iter().all(|i| !i.range.contains(value)));
                prop_assert_eq!(classify_or(value, ranges, Status::High), Status::High);
            }
        }
    }

    /// One bucket per distinct month, in ascending order, partitioning the input.
    #[test]
    fn month_buckets_partition_input(readings in arb_readings()) {
        let buckets = group_by_month(&readings);

        let distinct: HashSet<MonthKey> = readings.iter().map(|r| MonthKey::of(r.date)).collect();
        prop_assert_eq!(buckets.len(), distinct.len());
        prop_assert!(buckets.windows(2).all(|w| w[0].key < w[1].key));

        let total: usize = buckets.iter().map(|b| b.items.len()).sum();
        prop_assert_eq!(total, readings.len());
        for bucket in &buckets {
            prop_assert!(bucket.items.iter().all(|r| MonthKey::of(r.date) == bucket.key));
        }
    }

    /// At most one reading per key, and it carries the key's latest date.
    #[test]
    fn latest_keeps_one_newest_reading_per_key(readings in arb_readings()) {
        let latest = latest_per_key(&readings, by_parameter_and_site);

        let mut newest: HashMap<(String, u32), NaiveDate> = HashMap::new();
        for r in &readings {
            let date = newest.entry(by_parameter_and_site(r)).or_insert(r.date);
            *date = (*date).max(r.date);
        }
        prop_assert_eq!(latest.len(), newest.len());

        let mut seen = HashSet::new();
        for kept in &latest {
            let key = by_parameter_and_site(kept);
            prop_assert_eq!(Some(&kept.date), newest.get(&key));
            prop_assert!(seen.insert(key));
        }
    }

    /// Shaping a series does not depend on whether the input went through JSON.
    #[test]
    fn series_survives_serde_round_trip(readings in arb_readings()) {
        let json = serde_json::to_string(&readings).unwrap();
        let reparsed: Vec<Reading> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(monthly_series(&readings), monthly_series(&reparsed));
    }
}
