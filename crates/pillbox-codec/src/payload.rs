use serde::{Deserialize, Serialize};

use pillbox_core::types::{PillColor, PlanEntry, Weekday};

/// Full-week snapshot published after a schedule is created or edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePayload {
    pub user_id: i64,
    pub name: String,
    pub schedule: Vec<Dose>,
}

/// One non-zero slot of a [`SchedulePayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dose {
    pub day: Weekday,
    pub time: String,
    pub color: PillColor,
    pub quantity: u32,
}

/// Per-day snapshot sent in reply to a device sync request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPayload {
    pub name: String,
    pub day: Weekday,
    pub schedule: Vec<SlotDose>,
}

/// One slot of a [`DailyPayload`] — the day is implied by the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDose {
    pub time: String,
    pub color: PillColor,
    pub quantity: u32,
}

/// Build the write-path payload: every entry with a non-zero quantity.
pub fn schedule_payload(user_id: i64, name: &str, entries: &[PlanEntry]) -> SchedulePayload {
    SchedulePayload {
        user_id,
        name: name.to_string(),
        schedule: entries
            .iter()
            .filter(|e| e.quantity > 0)
            .map(|e| Dose {
                day: e.day,
                time: e.time.clone(),
                color: e.color,
                quantity: e.quantity,
            })
            .collect(),
    }
}

/// Build the sync-reply payload for one day. Rows are forwarded as queried —
/// a slot explicitly zeroed by an edit still shows up with quantity 0.
pub fn daily_payload(name: &str, day: Weekday, entries: &[PlanEntry]) -> DailyPayload {
    DailyPayload {
        name: name.to_string(),
        day,
        schedule: entries
            .iter()
            .map(|e| SlotDose {
                time: e.time.clone(),
                color: e.color,
                quantity: e.quantity,
            })
            .collect(),
    }
}
