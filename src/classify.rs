//! Status classification against ordered interpretation ranges.
//!
//! Interpretation lists are not guaranteed to be disjoint (pH uses `[0, 6.5]`
//! and `[6.5, 9.0]`), so they are scanned in order and the first inclusive
//! match wins. A boundary value therefore takes the status of the earlier
//! range.

use crate::models::{Interpretation, Status};

/// Status of the first range containing `value`, or `None` if no range does.
pub fn classify(value: f64, interpretation: &[Interpretation]) -> Option<Status> {
    interpretation
        .iter()
        .find(|interp| interp.range.contains(value))
        .map(|interp| interp.status)
}

/// Like [`classify`], falling back to `default` when nothing matches.
pub fn classify_or(value: f64, interpretation: &[Interpretation], default: Status) -> Status {
    classify(value, interpretation).unwrap_or(default)
}
