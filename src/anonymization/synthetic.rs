//! Deterministic synthetic data transforms
//!
//! Dates and datetimes are truncated one-way: month and day collapse to
//! January 1st, years beyond the truncation age cap at
//! `reference_year - truncation_years`, and datetimes get a fixed time of
//! day in UTC. Names are selected from the shared corpus using the record's
//! seed, so the transformation is repeatable but not reversible.

use crate::anonymization::names::NameCorpus;
use crate::domain::patient::HumanName;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;

/// Fallback for date strings that cannot be parsed.
const DEFAULT_DATE: &str = "2000-01-01";

/// Fallback for datetime strings that cannot be parsed.
const DEFAULT_DATE_TIME: &str = "2000-01-01T01:01:01Z";

/// Fixed time of day applied to every synthesized datetime.
const FIXED_TIME: &str = "12:34:56";

/// Deterministic date/datetime truncation and name selection.
#[derive(Debug, Clone)]
pub struct SyntheticData {
    names: Arc<NameCorpus>,
    family_name_offset: u64,
    truncation_years: i32,
    reference_year: i32,
}

impl SyntheticData {
    /// Create a transform using the current year as the truncation
    /// reference.
    pub fn new(names: Arc<NameCorpus>, family_name_offset: u64, truncation_years: i32) -> Self {
        Self::with_reference_year(
            names,
            family_name_offset,
            truncation_years,
            Utc::now().year(),
        )
    }

    /// Create a transform with an explicit reference year. The year cap is
    /// `reference_year - truncation_years`.
    pub fn with_reference_year(
        names: Arc<NameCorpus>,
        family_name_offset: u64,
        truncation_years: i32,
        reference_year: i32,
    ) -> Self {
        Self {
            names,
            family_name_offset,
            truncation_years,
            reference_year,
        }
    }

    /// Truncate a date. Blank input stays absent; unparseable input becomes
    /// the fixed default; otherwise the year is capped and month/day
    /// collapse to January 1st.
    pub fn synthesize_date(&self, raw_date: Option<&str>) -> Option<String> {
        let raw = raw_date?.trim();
        if raw.is_empty() {
            return None;
        }
        let date = match raw.parse::<NaiveDate>() {
            Ok(date) => {
                let year = self.cap_year(date.year());
                NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default()
            }
            Err(_) => {
                tracing::info!(raw_date = raw, "Unable to parse date, using default");
                return Some(DEFAULT_DATE.to_string());
            }
        };
        Some(date.format("%Y-%m-%d").to_string())
    }

    /// Truncate a datetime. Same rules as [`synthesize_date`], with the time
    /// of day forced to a fixed value at a fixed (UTC) offset.
    ///
    /// [`synthesize_date`]: Self::synthesize_date
    pub fn synthesize_date_time(&self, raw_date_time: Option<&str>) -> Option<String> {
        let raw = raw_date_time?.trim();
        if raw.is_empty() {
            return None;
        }
        let date = match parse_date_time(raw) {
            Some(parsed) => {
                let year = self.cap_year(parsed.year());
                NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default()
            }
            None => {
                tracing::info!(raw_date_time = raw, "Unable to parse dateTime, using default");
                return Some(DEFAULT_DATE_TIME.to_string());
            }
        };
        Some(format!("{}T{FIXED_TIME}Z", date.format("%Y-%m-%d")))
    }

    /// Select a synthetic name from the corpus. Given and family names come
    /// from offset positions so nearby seeds don't collapse to the same
    /// pair.
    pub fn synthesize_name(&self, seed: u64) -> Vec<HumanName> {
        let given = self.names.name(seed).to_string();
        let family = self
            .names
            .name(seed.wrapping_add(self.family_name_offset))
            .to_string();
        let text = format!("{given} {family}");
        vec![HumanName {
            text: Some(text),
            family: vec![family],
            given: vec![given],
        }]
    }

    /// Years older than the truncation age, or past the reference year, cap
    /// at `reference_year - truncation_years`.
    fn cap_year(&self, year: i32) -> i32 {
        let cutoff = self.reference_year - self.truncation_years;
        if year < cutoff || year > self.reference_year {
            cutoff
        } else {
            year
        }
    }
}

fn parse_date_time(raw: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.date_naive());
    }
    // Local datetimes without an offset, e.g. 1998-03-12T08:30:00
    raw.parse::<NaiveDateTime>().ok().map(|dt| dt.date())
}
