//! Restaurant Model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::serde_helpers::hhmm_opt;

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub cuisine: Option<String>,
    pub image_url: Option<String>,
    #[serde(with = "hhmm_opt", default)]
    pub open_time: Option<NaiveTime>,
    #[serde(with = "hhmm_opt", default)]
    pub close_time: Option<NaiveTime>,
    /// Average review rating, 0 when there are no reviews
    pub rating: f64,
    pub review_count: i32,
    pub created_at: i64,
}

impl Restaurant {
    /// Whether a reservation may start at `time`.
    ///
    /// Restaurants without both opening and closing times accept any time.
    /// A closing time earlier than the opening time means the window wraps
    /// past midnight (e.g. 18:00 to 02:00).
    pub fn accepts_time(&self, time: NaiveTime) -> bool {
        match (self.open_time, self.close_time) {
            (Some(open), Some(close)) if open <= close => time >= open && time <= close,
            (Some(open), Some(close)) => time >= open || time <= close,
            _ => true,
        }
    }
}

/// Create restaurant payload
///
/// Times arrive as raw strings so malformed values surface as validation
/// errors instead of body rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub cuisine: Option<String>,
    pub image_url: Option<String>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

/// Update restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub cuisine: Option<String>,
    pub image_url: Option<String>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(open: Option<&str>, close: Option<&str>) -> Restaurant {
        let t = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").unwrap();
        Restaurant {
            id: "r1".into(),
            name: "Casa".into(),
            description: None,
            address: None,
            phone: None,
            cuisine: None,
            image_url: None,
            open_time: open.map(t),
            close_time: close.map(t),
            rating: 0.0,
            review_count: 0,
            created_at: 0,
        }
    }

    fn at(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn same_day_window() {
        let r = restaurant(Some("12:00"), Some("23:00"));
        assert!(r.accepts_time(at("12:00")));
        assert!(r.accepts_time(at("20:30")));
        assert!(!r.accepts_time(at("11:59")));
        assert!(!r.accepts_time(at("23:30")));
    }

    #[test]
    fn overnight_window() {
        let r = restaurant(Some("18:00"), Some("02:00"));
        assert!(r.accepts_time(at("23:00")));
        assert!(r.accepts_time(at("01:30")));
        assert!(!r.accepts_time(at("12:00")));
    }

    #[test]
    fn missing_hours_accept_anything() {
        assert!(restaurant(None, None).accepts_time(at("04:00")));
        assert!(restaurant(Some("10:00"), None).accepts_time(at("04:00")));
    }

    #[test]
    fn times_serialize_as_hhmm() {
        let json = serde_json::to_value(restaurant(Some("09:00"), None)).unwrap();
        assert_eq!(json["open_time"], "09:00");
        assert!(json["close_time"].is_null());
    }
}
