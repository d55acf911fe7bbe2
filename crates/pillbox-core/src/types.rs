use serde::{Deserialize, Serialize};

/// Day of the week a plan entry applies to.
///
/// Stored and transmitted in its canonical capitalized form ("Monday").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days in display order. Index matches [`Weekday::index`].
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown day of week: {s}"))
    }
}

/// One of the four dispensing slots in a day.
///
/// The wire and storage form is lowercase ("morning"); the display form used
/// by the nested grid is capitalized ("Morning"). Arbitrary labels found in
/// old rows are tolerated by the codec and passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Noon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// All four slots in display order. Index matches [`TimeOfDay::index`].
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Noon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase storage/wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Noon => "noon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }

    /// Capitalized label used by the nested display grid.
    pub fn display_label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Noon => "Noon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TimeOfDay::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown time of day: {s}"))
    }
}

/// Pill color — the fixed shared lookup set. Extending the set means adding a
/// variant here; the Pills table is populated lazily from this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl PillColor {
    /// All known colors in display order. Index matches [`PillColor::index`].
    pub const ALL: [PillColor; 4] = [
        PillColor::Red,
        PillColor::Blue,
        PillColor::Green,
        PillColor::Yellow,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PillColor::Red => "red",
            PillColor::Blue => "blue",
            PillColor::Green => "green",
            PillColor::Yellow => "yellow",
        }
    }
}

impl std::fmt::Display for PillColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PillColor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PillColor::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown pill color: {s}"))
    }
}

/// One (day, time, color) → quantity record of a user's weekly plan.
///
/// `time` stays a raw string rather than a [`TimeOfDay`]: rows written by this
/// backend always carry the lowercase canonical label, but the grid code must
/// tolerate any label found in storage and pass it through unaltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub day: Weekday,
    pub time: String,
    pub color: PillColor,
    pub quantity: u32,
}

impl PlanEntry {
    pub fn new(day: Weekday, time: TimeOfDay, color: PillColor, quantity: u32) -> Self {
        Self {
            day,
            time: time.as_str().to_string(),
            color,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn weekday_round_trip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_str(day.as_str()).unwrap(), day);
        }
        assert_eq!(Weekday::from_str("monday").unwrap(), Weekday::Monday);
        assert!(Weekday::from_str("Someday").is_err());
    }

    #[test]
    fn time_of_day_case_insensitive() {
        assert_eq!(TimeOfDay::from_str("MORNING").unwrap(), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::Night.display_label(), "Night");
        assert!(TimeOfDay::from_str("brunch").is_err());
    }

    #[test]
    fn color_serde_is_lowercase() {
        let json = serde_json::to_string(&PillColor::Yellow).unwrap();
        assert_eq!(json, r#""yellow""#);
        let back: PillColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PillColor::Yellow);
    }
}
