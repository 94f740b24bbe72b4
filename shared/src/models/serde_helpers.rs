//! Serde adapters for wall-clock times
//!
//! Times travel as `HH:MM`. Inputs with seconds (`HH:MM:SS`) are accepted so
//! values read back from a `TIME` column parse too.

use chrono::NaiveTime;

const HHMM: &str = "%H:%M";

/// Parse `HH:MM` (or `HH:MM:SS`) into a [`NaiveTime`]
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, HHMM)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

pub fn format_hhmm(t: &NaiveTime) -> String {
    t.format(HHMM).to_string()
}

pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_hhmm(t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_hhmm(&raw).ok_or_else(|| D::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }
}

pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_str(&super::format_hhmm(t)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => super::parse_hhmm(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid time '{raw}', expected HH:MM"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_seconds() {
        assert_eq!(parse_hhmm("19:30"), NaiveTime::from_hms_opt(19, 30, 0));
        assert_eq!(parse_hhmm("19:30:00"), NaiveTime::from_hms_opt(19, 30, 0));
        assert_eq!(parse_hhmm("7pm"), None);
        assert_eq!(parse_hhmm("25:00"), None);
    }

    #[test]
    fn formats_without_seconds() {
        let t = NaiveTime::from_hms_opt(8, 5, 59).unwrap();
        assert_eq!(format_hhmm(&t), "08:05");
    }
}
