use std::collections::HashMap;
use std::hash::Hash;

use crate::models::Reading;

// ---

/// Keep the most recent reading per key.
///
/// A reading replaces the retained one only when its date is strictly later,
/// so on equal dates the first reading seen wins. Output follows the order in
/// which each key first appears in `readings`.
pub fn latest_per_key<K, F>(readings: &[Reading], key_fn: F) -> Vec<Reading>
where
    K: Eq + Hash,
    F: Fn(&Reading) -> K,
{
    // ---
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut latest: Vec<&Reading> = Vec::new();

    for reading in readings {
        match index.get(&key_fn(reading)) {
            Some(&slot) => {
                if reading.date > latest[slot].date {
                    latest[slot] = reading;
                }
            }
            None => {
                index.insert(key_fn(reading), latest.len());
                latest.push(reading);
            }
        }
    }

    latest.into_iter().cloned().collect()
}

pub fn by_parameter_and_site(reading: &Reading) -> (String, u32) {
    (reading.parameter_id.clone(), reading.site_id)
}

pub fn by_parameter_and_source(reading: &Reading) -> (String, u32) {
    (reading.parameter_id.clone(), reading.water_source_id)
}

pub fn by_site(reading: &Reading) -> u32 {
    reading.site_id
}
