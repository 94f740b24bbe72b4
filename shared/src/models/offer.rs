//! Offer Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Promotional offer of a restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Offer {
    pub id: String,
    pub restaurant_id: String,
    pub title: String,
    pub description: String,
    /// Percentage off, in (0, 100]
    pub discount: f64,
    /// Last day the offer applies (inclusive)
    pub valid_until: NaiveDate,
    pub created_at: i64,
}

impl Offer {
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.valid_until >= today
    }
}

/// Create offer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferCreate {
    pub restaurant_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discount: f64,
    pub valid_until: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_through_last_day() {
        let offer = Offer {
            id: "o".into(),
            restaurant_id: "r".into(),
            title: "2x1".into(),
            description: String::new(),
            discount: 50.0,
            valid_until: NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
            created_at: 0,
        };
        assert!(offer.is_active_on(NaiveDate::from_ymd_opt(2030, 1, 9).unwrap()));
        assert!(offer.is_active_on(NaiveDate::from_ymd_opt(2030, 1, 10).unwrap()));
        assert!(!offer.is_active_on(NaiveDate::from_ymd_opt(2030, 1, 11).unwrap()));
    }
}
