//! Date helpers shared by the data layer and the aggregation core.
//!
//! Display strings follow the `es-CO` conventions the dashboard uses:
//! `15/01/2024` for short dates, `15 de enero de 2024` for long dates and
//! capitalized month names (`Enero`) for chart buckets.

use chrono::{DateTime, Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

// ---

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const SHORT_MONTH_NAMES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Calendar month used as a grouping key.
///
/// Field order matters: the derived `Ord` sorts by year, then month, which is
/// chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    /// Zero-based month index (January = 0).
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    /// Capitalized Spanish month name, e.g. `Enero`.
    pub fn month_name(&self) -> String {
        month_name(self.month)
    }

    /// Chart label, e.g. `Enero 2024`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

/// Parse a date in any of the shapes the data sources produce.
///
/// Accepts ISO (`2024-01-15`), `es-CO` short format (`15/01/2024`) and
/// RFC 3339 timestamps. Returns `None` for anything else.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    // ---
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// `15/01/2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `15 de enero de 2024`
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTH_NAMES[date.month0() as usize],
        date.year()
    )
}

/// Abbreviated month, e.g. `ene`.
pub fn short_month(date: NaiveDate) -> &'static str {
    SHORT_MONTH_NAMES[date.month0() as usize]
}

/// Capitalized month name for a zero-based month index. Out-of-range
/// indexes wrap rather than panic.
pub fn month_name(month0: u32) -> String {
    let name = MONTH_NAMES[(month0 % 12) as usize];
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The date `n` calendar months before `anchor`, clamping the day to the end
/// of shorter months (31 March minus one month is 29 February in a leap year).
pub fn months_back(anchor: NaiveDate, n: u32) -> Option<NaiveDate> {
    anchor.checked_sub_months(Months::new(n))
}
