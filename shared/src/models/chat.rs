//! Chat assistant conversation state
//!
//! The booking assistant collects a reservation over several turns. Each
//! turn stores the current [`ChatStep`] and the [`BookingDraft`] assembled so
//! far. Fields expected per step:
//!
//! | step                  | expected draft fields                                   |
//! |-----------------------|---------------------------------------------------------|
//! | `start`               |                                                         |
//! | `awaiting_restaurant` |                                                         |
//! | `awaiting_date`       | `restaurant_id`                                         |
//! | `awaiting_time`       | `restaurant_id`, `date`                                 |
//! | `awaiting_guests`     | `restaurant_id`, `date`, `time`                         |
//! | `awaiting_contact`    | `restaurant_id`, `date`, `time`, `guests`               |
//! | `confirming`          | all of the above plus `customer_name`, `phone`          |
//!
//! Every field is optional on the wire so partial drafts round-trip exactly.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::serde_helpers::hhmm_opt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStep {
    #[default]
    Start,
    AwaitingRestaurant,
    AwaitingDate,
    AwaitingTime,
    AwaitingGuests,
    AwaitingContact,
    Confirming,
}

/// Reservation fields gathered so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookingDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
}

impl BookingDraft {
    /// Names of the fields `step` expects that are still empty
    pub fn missing_for(&self, step: ChatStep) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let rank = step as u8;
        let mut need = |present: bool, from: ChatStep, name: &'static str| {
            if rank >= from as u8 && !present {
                missing.push(name);
            }
        };
        need(self.restaurant_id.is_some(), ChatStep::AwaitingDate, "restaurant_id");
        need(self.date.is_some(), ChatStep::AwaitingTime, "date");
        need(self.time.is_some(), ChatStep::AwaitingGuests, "time");
        need(self.guests.is_some(), ChatStep::AwaitingContact, "guests");
        need(self.customer_name.is_some(), ChatStep::Confirming, "customer_name");
        need(self.phone.is_some(), ChatStep::Confirming, "phone");
        missing
    }
}

/// Stored conversation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub step: ChatStep,
    pub data: BookingDraft,
    /// Unix millis of the last write
    pub last_update: i64,
}

impl ConversationState {
    /// Fresh state for a conversation that has not started yet
    pub fn new(now: i64) -> Self {
        Self {
            step: ChatStep::Start,
            data: BookingDraft::default(),
            last_update: now,
        }
    }
}

/// `POST /api/chatbot/state/{chat_id}` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStateUpdate {
    pub step: ChatStep,
    #[serde(default)]
    pub data: BookingDraft,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_state_shape() {
        let json = serde_json::to_value(ConversationState::new(42)).unwrap();
        assert_eq!(json, json!({ "step": "start", "data": {}, "last_update": 42 }));
    }

    #[test]
    fn partial_draft_round_trips_exactly() {
        let update: ChatStateUpdate =
            serde_json::from_value(json!({ "step": "awaiting_date", "data": { "guests": 4 } }))
                .unwrap();
        assert_eq!(update.step, ChatStep::AwaitingDate);
        assert_eq!(serde_json::to_value(&update.data).unwrap(), json!({ "guests": 4 }));
    }

    #[test]
    fn time_uses_hhmm() {
        let draft: BookingDraft =
            serde_json::from_value(json!({ "date": "2030-02-14", "time": "21:15" })).unwrap();
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({ "date": "2030-02-14", "time": "21:15" })
        );
    }

    #[test]
    fn unknown_keys_and_steps_are_rejected() {
        assert!(serde_json::from_value::<BookingDraft>(json!({ "color": "red" })).is_err());
        assert!(
            serde_json::from_value::<ChatStateUpdate>(json!({ "step": "dancing" })).is_err()
        );
    }

    #[test]
    fn missing_fields_follow_step_schema() {
        let draft = BookingDraft {
            restaurant_id: Some("r1".into()),
            ..Default::default()
        };
        assert!(draft.missing_for(ChatStep::Start).is_empty());
        assert!(draft.missing_for(ChatStep::AwaitingDate).is_empty());
        assert_eq!(draft.missing_for(ChatStep::AwaitingTime), vec!["date"]);
        assert_eq!(
            draft.missing_for(ChatStep::Confirming),
            vec!["date", "time", "guests", "customer_name", "phone"]
        );
    }
}
