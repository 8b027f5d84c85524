use chrono::{Datelike, NaiveDate};

use super::types::CivilStatus;

/// Whole-franc amount from free text. Every non-digit is dropped, so Swiss
/// grouping (`1'250'000`) and currency prefixes are accepted; anything
/// without digits is 0.
pub fn parse_money(raw: &str) -> f64 {
    let digits = raw
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    digits.parse::<f64>().unwrap_or(0.0)
}

pub fn amount_from_number(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Completed years of age on `today`. Unknown when the date is missing,
/// unparseable or in the future.
pub fn age_on(birth_date: &str, today: NaiveDate) -> Option<u32> {
    let birth = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d").ok()?;
    if birth > today {
        return None;
    }

    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

pub fn parse_build_year(raw: &str) -> Option<i32> {
    let digits = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();
    digits.parse::<i32>().ok()
}

pub fn parse_civil_status(raw: &str) -> CivilStatus {
    match raw.trim().to_ascii_lowercase().as_str() {
        "married" | "verheiratet" => CivilStatus::Married,
        _ => CivilStatus::Single,
    }
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "ja" | "on"
    )
}
