//! # Status History
//!
//! The three-checkpoint progress record stored on every order.
//!
//! ## Shapes
//!
//! Persisted form (`status_history` jsonb column, numeric keys so renames
//! never touch stored rows):
//!
//! ```json
//! { "0": {"isCompleted": true,  "completedAt": "2024-01-01T10:00:00Z"},
//!   "1": {"isCompleted": false, "completedAt": null},
//!   "2": {"isCompleted": false, "completedAt": null} }
//! ```
//!
//! Display form (what the frontend renders), same records keyed
//! `accepted` / `dispatched` / `completed`. The two forms carry identical
//! information and convert losslessly in both directions.
//!
//! ## Rules
//!
//! - Exactly three slots, always. A missing, null or empty column reads as
//!   "nothing has happened yet", never as an error.
//! - `completedAt` is stamped with the current time the first time a slot
//!   flips to completed; an existing stamp is only replaced when a caller
//!   supplies one explicitly.
//! - An unknown slot identifier is a caller bug and fails the whole
//!   operation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SlotError {
    #[error("unknown status slot: {0}")]
    UnknownSlot(String),
}

/// One of the three checkpoints, addressable by numeric key or display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Accepted,
    Dispatched,
    Completed,
}

impl Slot {
    pub const ALL: [Self; 3] = [Self::Accepted, Self::Dispatched, Self::Completed];

    pub fn name(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Dispatched => "dispatched",
            Self::Completed => "completed",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Accepted => "0",
            Self::Dispatched => "1",
            Self::Completed => "2",
        }
    }

    /// Accepts either encoding: `"0"` / `"accepted"`, `"1"` / `"dispatched"`,
    /// `"2"` / `"completed"`.
    pub fn parse(identifier: &str) -> Result<Self, SlotError> {
        match identifier {
            "0" | "accepted" => Ok(Self::Accepted),
            "1" | "dispatched" => Ok(Self::Dispatched),
            "2" | "completed" => Ok(Self::Completed),
            other => Err(SlotError::UnknownSlot(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Storage form: serializes with the numeric keys used in the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusHistory {
    #[serde(rename = "0", default)]
    pub accepted: SlotRecord,
    #[serde(rename = "1", default)]
    pub dispatched: SlotRecord,
    #[serde(rename = "2", default)]
    pub completed: SlotRecord,
}

/// Display form: the same three records keyed by checkpoint name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayHistory {
    #[serde(default)]
    pub accepted: SlotRecord,
    #[serde(default)]
    pub dispatched: SlotRecord,
    #[serde(default)]
    pub completed: SlotRecord,
}

/// Partial update for a single slot. Leaving `completed_at` out lets the
/// auto-stamp rule decide.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl StatusHistory {
    /// Reads the persisted `status_history` column. Null, missing keys, or
    /// anything that does not parse falls back to the all-incomplete default.
    pub fn from_storage_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    pub fn to_display(&self) -> DisplayHistory {
        DisplayHistory {
            accepted: self.accepted.clone(),
            dispatched: self.dispatched.clone(),
            completed: self.completed.clone(),
        }
    }

    pub fn slot(&self, slot: Slot) -> &SlotRecord {
        match slot {
            Slot::Accepted => &self.accepted,
            Slot::Dispatched => &self.dispatched,
            Slot::Completed => &self.completed,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotRecord {
        match slot {
            Slot::Accepted => &mut self.accepted,
            Slot::Dispatched => &mut self.dispatched,
            Slot::Completed => &mut self.completed,
        }
    }

    /// Returns a new history with only the addressed slot changed. The first
    /// transition to completed stamps `completed_at` with the current time
    /// unless the update carries a timestamp of its own.
    pub fn set_status(&self, identifier: &str, update: &StatusUpdate) -> Result<Self, SlotError> {
        let slot = Slot::parse(identifier)?;
        let mut next = self.clone();
        let record = next.slot_mut(slot);

        if let Some(is_completed) = update.is_completed {
            record.is_completed = is_completed;
        }
        if update.completed_at.is_some() {
            record.completed_at = update.completed_at;
        } else if record.is_completed && record.completed_at.is_none() {
            record.completed_at = Some(Utc::now());
        }

        Ok(next)
    }

    /// Collapses the history and the cancellation flag into the single label
    /// the order list shows. Cancellation always wins; otherwise the furthest
    /// completed checkpoint does; an untouched history is pending.
    pub fn display_label(&self, cancelled: bool) -> StatusLabel {
        if cancelled {
            StatusLabel::Cancelled
        } else if self.completed.is_completed {
            StatusLabel::Completed
        } else if self.dispatched.is_completed {
            StatusLabel::Dispatched
        } else if self.accepted.is_completed {
            StatusLabel::Accepted
        } else {
            StatusLabel::Pending
        }
    }
}

impl DisplayHistory {
    /// Same tolerance as [`StatusHistory::from_storage_value`].
    pub fn from_display_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    pub fn to_storage(&self) -> StatusHistory {
        StatusHistory {
            accepted: self.accepted.clone(),
            dispatched: self.dispatched.clone(),
            completed: self.completed.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusLabel {
    Cancelled,
    Completed,
    Dispatched,
    Accepted,
    Pending,
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
            Self::Dispatched => "Dispatched",
            Self::Accepted => "Accepted",
            Self::Pending => "Pending",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn accepted_only() -> StatusHistory {
        StatusHistory::from_storage_value(&json!({
            "0": {"isCompleted": true, "completedAt": "2024-01-01T10:00:00Z"},
            "1": {"isCompleted": false, "completedAt": null},
            "2": {"isCompleted": false, "completedAt": null},
        }))
    }

    #[test]
    fn test_round_trip_both_directions() {
        let storage = accepted_only();
        assert_eq!(storage.to_display().to_storage(), storage);

        let display = storage.to_display();
        assert_eq!(display.to_storage().to_display(), display);
    }

    #[test]
    fn test_storage_wire_keys() {
        let value = serde_json::to_value(accepted_only()).unwrap();
        assert_eq!(value["0"]["isCompleted"], json!(true));
        assert_eq!(value["0"]["completedAt"], json!("2024-01-01T10:00:00Z"));
        assert_eq!(value["1"]["completedAt"], json!(null));
        assert_eq!(value["2"]["isCompleted"], json!(false));
    }

    #[test]
    fn test_empty_inputs_read_as_default() {
        let default = StatusHistory::default();

        assert_eq!(StatusHistory::from_storage_value(&json!(null)), default);
        assert_eq!(StatusHistory::from_storage_value(&json!({})), default);
        assert_eq!(StatusHistory::from_storage_value(&json!("garbage")), default);
        assert_eq!(DisplayHistory::from_display_value(&json!(null)), default.to_display());

        assert!(!default.accepted.is_completed);
        assert!(default.accepted.completed_at.is_none());
    }

    #[test]
    fn test_set_status_touches_one_slot() {
        let before = accepted_only();
        let after = before
            .set_status("dispatched", &StatusUpdate {
                is_completed: Some(true),
                completed_at: None,
            })
            .unwrap();

        assert_eq!(after.slot(Slot::Accepted), before.slot(Slot::Accepted));
        assert_eq!(after.slot(Slot::Completed), before.slot(Slot::Completed));
        assert!(after.slot(Slot::Dispatched).is_completed);
    }

    #[test]
    fn test_auto_stamp_on_first_completion() {
        let update = StatusUpdate {
            is_completed: Some(true),
            completed_at: None,
        };

        let stamped = accepted_only().set_status("1", &update).unwrap();
        assert!(stamped.dispatched.completed_at.is_some());

        // Applying the same update again keeps the original stamp.
        let first_stamp = stamped.dispatched.completed_at;
        let again = stamped.set_status("dispatched", &update).unwrap();
        assert_eq!(again.dispatched.completed_at, first_stamp);
    }

    #[test]
    fn test_explicit_stamp_wins() {
        let explicit = Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap();
        let history = accepted_only()
            .set_status("completed", &StatusUpdate {
                is_completed: Some(true),
                completed_at: Some(explicit),
            })
            .unwrap();

        assert_eq!(history.completed.completed_at, Some(explicit));
    }

    #[test]
    fn test_unknown_slot_rejected() {
        let before = accepted_only();
        let err = before
            .set_status("shipped", &StatusUpdate {
                is_completed: Some(true),
                completed_at: None,
            })
            .unwrap_err();

        assert_eq!(err, SlotError::UnknownSlot("shipped".to_string()));
        assert_eq!(before, accepted_only());
    }

    #[test]
    fn test_label_precedence() {
        let mut history = StatusHistory::default();
        assert_eq!(history.display_label(true), StatusLabel::Cancelled);
        assert_eq!(history.display_label(false), StatusLabel::Pending);

        history.completed.is_completed = true;
        assert_eq!(history.display_label(false), StatusLabel::Completed);
        assert_eq!(history.display_label(true), StatusLabel::Cancelled);

        history = StatusHistory::default();
        history.dispatched.is_completed = true;
        assert_eq!(history.display_label(false), StatusLabel::Dispatched);

        assert_eq!(accepted_only().display_label(false), StatusLabel::Accepted);
        assert_eq!(StatusLabel::Dispatched.to_string(), "Dispatched");
    }

    #[test]
    fn test_concrete_example_from_order_list() {
        let history = accepted_only();
        let display = serde_json::to_value(history.to_display()).unwrap();

        assert_eq!(
            display,
            json!({
                "accepted": {"isCompleted": true, "completedAt": "2024-01-01T10:00:00Z"},
                "dispatched": {"isCompleted": false, "completedAt": null},
                "completed": {"isCompleted": false, "completedAt": null},
            })
        );
        assert_eq!(history.display_label(false), StatusLabel::Accepted);
    }

    #[test]
    fn test_slot_parse_accepts_both_encodings() {
        for slot in Slot::ALL {
            assert_eq!(Slot::parse(slot.key()).unwrap(), slot);
            assert_eq!(Slot::parse(slot.name()).unwrap(), slot);
        }
        assert!(Slot::parse("3").is_err());
        assert!(Slot::parse("").is_err());
    }
}
