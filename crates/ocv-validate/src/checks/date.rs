//! ISO 8601 full and partial dates.

use std::sync::LazyLock;

use chrono::NaiveDate;
use ocv_model::Rule;
use regex::Regex;

use super::Violation;

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$").expect("Invalid date regex")
});

/// A component is skipped or left dangling: `YYYY--DD`, `YYYY-`, `YYYY-MM-`.
static GAPPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}(?:-|--\d{2}|-\d{2}-)$").expect("Invalid date regex"));

/// Precision of a valid date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

/// Parse a date, returning its precision or the rule it breaks.
pub fn parse_date(value: &str) -> Result<DatePrecision, Rule> {
    let value = value.trim();
    if GAPPED.is_match(value) {
        return Err(Rule::InconsistentDatePrecision);
    }
    let caps = DATE.captures(value).ok_or(Rule::InvalidDate)?;

    let year: i32 = caps[1].parse().map_err(|_| Rule::InvalidDate)?;
    if year == 0 {
        return Err(Rule::InvalidDate);
    }

    let Some(month) = caps.get(2) else {
        return Ok(DatePrecision::Year);
    };
    let month: u32 = month.as_str().parse().map_err(|_| Rule::InvalidDate)?;
    if !(1..=12).contains(&month) {
        return Err(Rule::InvalidDate);
    }

    let Some(day) = caps.get(3) else {
        return Ok(DatePrecision::Month);
    };
    let day: u32 = day.as_str().parse().map_err(|_| Rule::InvalidDate)?;
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|_| DatePrecision::Day)
        .ok_or(Rule::InvalidDate)
}

pub fn check_date(value: &str) -> Option<Violation> {
    let trimmed = value.trim();
    match parse_date(trimmed) {
        Ok(_) => None,
        Err(Rule::InconsistentDatePrecision) => Some(Violation::new(
            Rule::InconsistentDatePrecision,
            trimmed,
            format!("'{trimmed}' skips or leaves out a date component"),
        )),
        Err(rule) => Some(Violation::new(
            rule,
            trimmed,
            format!("'{trimmed}' is not a valid YYYY, YYYY-MM or YYYY-MM-DD date"),
        )),
    }
}
