use std::collections::HashMap;

use serde::Serialize;

use crate::dates::MonthKey;
use crate::models::Reading;

// ---

/// Readings that fall in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    pub key: MonthKey,
    /// Capitalized Spanish month name, e.g. `Enero`.
    pub month: String,
    pub year: i32,
    /// In input order.
    pub items: Vec<Reading>,
}

impl MonthBucket {
    pub fn label(&self) -> String {
        self.key.label()
    }
}

/// Group readings into one bucket per distinct (month, year), sorted
/// chronologically by the carried [`MonthKey`].
pub fn group_by_month(readings: &[Reading]) -> Vec<MonthBucket> {
    // ---
    let mut index: HashMap<MonthKey, usize> = HashMap::new();
    let mut buckets: Vec<MonthBucket> = Vec::new();

    for reading in readings {
        let key = MonthKey::of(reading.date);
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(MonthBucket {
                key,
                month: key.month_name(),
                year: key.year,
                items: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].items.push(reading.clone());
    }

    buckets.sort_by_key(|bucket| bucket.key);
    buckets
}
