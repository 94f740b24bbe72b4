//! Date and time parsing for request payloads
//!
//! "Today" and "now" are the server's local clock.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use shared::error::{AppError, AppResult};
use shared::models::serde_helpers::parse_hhmm;

/// Parse `YYYY-MM-DD`
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date} (expected YYYY-MM-DD)")))
}

/// Parse `HH:MM` (seconds are tolerated)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    parse_hhmm(time.trim())
        .ok_or_else(|| AppError::validation(format!("Invalid time format: {time} (expected HH:MM)")))
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates() {
        assert_eq!(
            parse_date("2030-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2030, 2, 28).unwrap()
        );
        assert!(parse_date("2030-02-30").is_err());
        assert!(parse_date("28/02/2030").is_err());
    }

    #[test]
    fn times() {
        assert_eq!(
            parse_time("19:30").unwrap(),
            NaiveTime::from_hms_opt(19, 30, 0).unwrap()
        );
        assert!(parse_time("25:00").is_err());
        let err = parse_time("7pm").unwrap_err();
        assert!(err.message.contains("HH:MM"));
    }
}
