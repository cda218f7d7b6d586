//! Birth details as entered by the user.
//!
//! Dates and times are read in Indian Standard Time (UTC+05:30), the only
//! locale the charts are cast for.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::KundaliError;

pub const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;
const BIRTH_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDetails {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour clock
    pub time: String,
    pub place: String,
}

impl BirthDetails {
    pub fn new(date: impl Into<String>, time: impl Into<String>, place: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            place: place.into(),
        }
    }

    pub fn moment(&self) -> Result<DateTime<Utc>, KundaliError> {
        parse_birth_moment(&self.date, &self.time)
    }
}

/// Parse a local birth date and time into a UTC instant.
pub fn parse_birth_moment(date: &str, time: &str) -> Result<DateTime<Utc>, KundaliError> {
    let input = format!("{} {}", date.trim(), time.trim());
    let invalid = || KundaliError::InputFormat { input: input.clone() };

    let naive = NaiveDateTime::parse_from_str(&input, BIRTH_FORMAT).map_err(|_| invalid())?;
    let ist = FixedOffset::east_opt(IST_OFFSET_SECONDS).ok_or_else(invalid)?;
    let local = ist.from_local_datetime(&naive).single().ok_or_else(invalid)?;
    Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ist_is_converted_to_utc() {
        let moment = parse_birth_moment("1990-06-15", "10:00").unwrap();
        assert_eq!(moment, Utc.with_ymd_and_hms(1990, 6, 15, 4, 30, 0).unwrap());
    }

    #[test]
    fn test_early_morning_rolls_back_a_day() {
        let moment = parse_birth_moment("2001-01-01", "02:15").unwrap();
        assert_eq!(moment, Utc.with_ymd_and_hms(2000, 12, 31, 20, 45, 0).unwrap());
    }

    #[test]
    fn test_malformed_input() {
        for (date, time) in [("15-06-1990", "10:00"), ("1990-06-15", "10am"), ("1990-02-30", "10:00"), ("", "")] {
            let err = parse_birth_moment(date, time).unwrap_err();
            assert!(matches!(err, KundaliError::InputFormat { .. }), "{date} {time}");
            assert!(err.is_input_error());
        }
    }

    #[test]
    fn test_details_moment() {
        let details = BirthDetails::new("1990-06-15", "10:00", "Varanasi");
        assert!(details.moment().is_ok());
    }
}
