use serde_json::{json, Map, Value};

use pillbox_core::types::{PillColor, PlanEntry, TimeOfDay, Weekday};

/// A plan row whose time label did not match any of the four known slots.
///
/// Legacy rows can carry arbitrary labels; they are kept verbatim and shown
/// under their raw label instead of being dropped or "fixed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraSlot {
    pub day: Weekday,
    pub time: String,
    pub color: PillColor,
    pub quantity: u32,
}

/// The total weekly grid: every day × time × color combination, defaulting to
/// quantity 0. The relational store is sparse; this view never is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleGrid {
    cells: [[[u32; PillColor::ALL.len()]; TimeOfDay::ALL.len()]; Weekday::ALL.len()],
    extras: Vec<ExtraSlot>,
}

impl ScheduleGrid {
    /// An all-zero grid — the blank create form.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, day: Weekday, time: TimeOfDay, color: PillColor) -> u32 {
        self.cells[day.index()][time.index()][color.index()]
    }

    pub fn set(&mut self, day: Weekday, time: TimeOfDay, color: PillColor, quantity: u32) {
        self.cells[day.index()][time.index()][color.index()] = quantity;
    }

    /// Rows whose time label matched none of the known slots.
    pub fn extras(&self) -> &[ExtraSlot] {
        &self.extras
    }

    /// Overlay sparse plan rows onto an all-zero grid.
    ///
    /// Time labels match the four known slots case-insensitively; anything
    /// else lands in [`extras`](Self::extras) under its raw label.
    pub fn from_entries(entries: &[PlanEntry]) -> Self {
        let mut grid = Self::new();
        for entry in entries {
            match entry.time.parse::<TimeOfDay>() {
                Ok(time) => grid.set(entry.day, time, entry.color, entry.quantity),
                Err(_) => grid.extras.push(ExtraSlot {
                    day: entry.day,
                    time: entry.time.clone(),
                    color: entry.color,
                    quantity: entry.quantity,
                }),
            }
        }
        grid
    }

    /// The nested day → time → color → quantity view used by forms and
    /// display. Known slots appear under their capitalized display label;
    /// extras appear under their raw label within the matching day.
    pub fn nested(&self) -> Value {
        let mut days = Map::new();
        for day in Weekday::ALL {
            let mut times = Map::new();
            for time in TimeOfDay::ALL {
                let mut colors = Map::new();
                for color in PillColor::ALL {
                    colors.insert(color.to_string(), json!(self.get(day, time, color)));
                }
                times.insert(time.display_label().to_string(), Value::Object(colors));
            }
            for extra in self.extras.iter().filter(|e| e.day == day) {
                let slot = times
                    .entry(extra.time.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Some(colors) = slot.as_object_mut() {
                    colors.insert(extra.color.to_string(), json!(extra.quantity));
                }
            }
            days.insert(day.to_string(), Value::Object(times));
        }
        Value::Object(days)
    }
}
