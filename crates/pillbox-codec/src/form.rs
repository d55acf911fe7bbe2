use std::collections::HashMap;

use pillbox_core::types::{PillColor, PlanEntry, TimeOfDay, Weekday};

/// Expand a sparse form submission into one entry per day/time/color
/// combination.
///
/// Fields are keyed `{Day}_{time}_{color}` (e.g. `Monday_morning_red`).
/// Absent or unparseable values read as 0; the create path drops zeroes at
/// the store, the edit path writes them all.
pub fn entries_from_form(form: &HashMap<String, String>) -> Vec<PlanEntry> {
    let mut entries =
        Vec::with_capacity(Weekday::ALL.len() * TimeOfDay::ALL.len() * PillColor::ALL.len());
    for day in Weekday::ALL {
        for time in TimeOfDay::ALL {
            for color in PillColor::ALL {
                let key = format!("{day}_{time}_{color}");
                let quantity = form
                    .get(&key)
                    .and_then(|raw| raw.trim().parse::<u32>().ok())
                    .unwrap_or(0);
                entries.push(PlanEntry::new(day, time, color, quantity));
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ScheduleGrid;

    #[test]
    fn sparse_form_expands_to_every_combination() {
        let mut form = HashMap::new();
        form.insert("name".to_string(), "Alice".to_string());
        form.insert("Monday_morning_red".to_string(), "2".to_string());

        let entries = entries_from_form(&form);
        assert_eq!(entries.len(), 196);
        assert_eq!(entries.iter().filter(|e| e.quantity > 0).count(), 1);
    }

    #[test]
    fn junk_values_read_as_zero() {
        let mut form = HashMap::new();
        form.insert("Friday_noon_blue".to_string(), "lots".to_string());
        form.insert("Friday_noon_green".to_string(), "-3".to_string());
        form.insert("Friday_noon_yellow".to_string(), " 4 ".to_string());

        let entries = entries_from_form(&form);
        let get = |color: PillColor| {
            entries
                .iter()
                .find(|e| {
                    e.day == Weekday::Friday && e.time == "noon" && e.color == color
                })
                .unwrap()
                .quantity
        };
        assert_eq!(get(PillColor::Blue), 0);
        assert_eq!(get(PillColor::Green), 0);
        assert_eq!(get(PillColor::Yellow), 4);
    }

    #[test]
    fn form_to_grid_round_trips() {
        let mut form = HashMap::new();
        form.insert("Monday_morning_red".to_string(), "2".to_string());
        form.insert("Sunday_night_yellow".to_string(), "1".to_string());

        let entries = entries_from_form(&form);
        let grid = ScheduleGrid::from_entries(&entries);
        assert_eq!(grid.get(Weekday::Monday, TimeOfDay::Morning, PillColor::Red), 2);
        assert_eq!(grid.get(Weekday::Sunday, TimeOfDay::Night, PillColor::Yellow), 1);
        // Everything omitted from the form normalizes to zero.
        assert_eq!(grid.get(Weekday::Monday, TimeOfDay::Noon, PillColor::Red), 0);
    }
}
