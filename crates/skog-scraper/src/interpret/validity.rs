use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;

use crate::recorder::sanitize;

static VALIDITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^geldig van (\d{1,2})-(\d{1,2}) t/m\b").expect("valid validity regex")
});

/// Reads the start of a promotion window such as
/// `"Geldig van 24-6 t/m 30-6"`.
///
/// The window start is taken in the year of `now`, at midnight UTC. It is
/// only returned when it falls on a later day than `now`; a window that
/// already started yields `now` itself. Returns `None` for copy that does
/// not match or names an impossible date.
#[must_use]
pub fn interpret_validity(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lower = sanitize(text).to_lowercase();
    let caps = VALIDITY_RE.captures(&lower)?;

    let day = caps[1].parse::<u32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let start = NaiveDate::from_ymd_opt(now.year(), month, day)?;

    if start > now.date_naive() {
        Some(start.and_hms_opt(0, 0, 0)?.and_utc())
    } else {
        Some(now)
    }
}
