use crate::purpose::PurposeId;
use crate::time::{self, Time};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;
use tabled::Tabled;

pub type PlaceId = Arc<str>;

/// Stay assumed for places without an explicit duration.
pub const DEFAULT_STAY_MINUTES: u32 = 60;

/// Map-relative coordinates, 0-100 on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Position {
        Position { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub purpose_id: Option<PurposeId>,
    #[serde(flatten)]
    pub position: Position,
    #[serde(default)]
    pub stay_duration: Option<u32>,
    #[serde(default, deserialize_with = "time::deserialize_optional")]
    pub open_time: Option<Time>,
    #[serde(default, deserialize_with = "time::deserialize_optional")]
    pub close_time: Option<Time>,
    #[serde(default, deserialize_with = "time::deserialize_optional")]
    pub break_time_start: Option<Time>,
    #[serde(default, deserialize_with = "time::deserialize_optional")]
    pub break_time_end: Option<Time>,
    /// Weekdays the place does not open. Stored and listed, never evaluated.
    #[serde(default)]
    pub closed_days: Vec<String>,
}

impl Place {
    pub fn new(id: &str, name: &str, position: Position) -> Place {
        Place {
            id: Arc::from(id),
            name: name.to_string(),
            description: String::new(),
            purpose_id: None,
            position,
            stay_duration: None,
            open_time: None,
            close_time: None,
            break_time_start: None,
            break_time_end: None,
            closed_days: Vec::new(),
        }
    }

    /// Planned stay. Zero counts as unset, the same as a missing duration.
    pub fn stay_minutes(&self) -> u32 {
        match self.stay_duration {
            None | Some(0) => DEFAULT_STAY_MINUTES,
            Some(minutes) => minutes,
        }
    }

    /// Operating window, only when both ends are set.
    pub fn operating_hours(&self) -> Option<(Time, Time)> {
        self.open_time.zip(self.close_time)
    }

    /// Break window, only when both ends are set.
    pub fn break_time(&self) -> Option<(Time, Time)> {
        self.break_time_start.zip(self.break_time_end)
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn range_or_dash(range: Option<(Time, Time)>) -> String {
    range
        .map(|(from, to)| format!("{}-{}", from, to))
        .unwrap_or_else(|| "-".to_string())
}

/// Flat table view of a place.
#[derive(Tabled)]
pub struct PlaceRow {
    pub id: String,
    pub name: String,
    pub purpose: String,
    pub stay: String,
    pub hours: String,
    #[tabled(rename = "break")]
    pub break_time: String,
    #[tabled(rename = "closed")]
    pub closed_days: String,
    pub position: String,
}

impl From<&Place> for PlaceRow {
    fn from(place: &Place) -> Self {
        PlaceRow {
            id: place.id.to_string(),
            name: place.name.clone(),
            purpose: place
                .purpose_id
                .as_ref()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            stay: match place.stay_duration {
                Some(mins) if mins > 0 => format!("{}m", mins),
                _ => format!("{}m*", DEFAULT_STAY_MINUTES),
            },
            hours: range_or_dash(place.operating_hours()),
            break_time: range_or_dash(place.break_time()),
            closed_days: if place.closed_days.is_empty() {
                "-".to_string()
            } else {
                place.closed_days.join(", ")
            },
            position: format!("({:.0}, {:.0})", place.position.x, place.position.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_attributes_missing() {
        let place = Place::new("P1", "Cafe", Position::new(10.0, 10.0));
        assert_eq!(DEFAULT_STAY_MINUTES, place.stay_minutes());
        assert_eq!(None, place.operating_hours());
        assert_eq!(None, place.break_time());
    }

    #[test]
    fn test_half_set_pairs_are_disabled() {
        let mut place = Place::new("P1", "Cafe", Position::default());
        place.open_time = Some(Time::hm(9, 0));
        place.break_time_end = Some(Time::hm(15, 0));
        assert_eq!(None, place.operating_hours());
        assert_eq!(None, place.break_time());
    }

    #[test]
    fn test_zero_stay_means_default() {
        let mut place = Place::new("P1", "Photo spot", Position::default());
        place.stay_duration = Some(0);
        assert_eq!(DEFAULT_STAY_MINUTES, place.stay_minutes());
        assert_eq!("60m*", PlaceRow::from(&place).stay);

        place.stay_duration = Some(1);
        assert_eq!(1, place.stay_minutes());
    }

    #[test]
    fn test_closed_days_are_kept() {
        let json = r#"{"id": "a", "name": "A", "x": 0, "y": 0, "closedDays": ["Monday", "Tuesday"]}"#;
        let place: Place = serde_json::from_str(json).unwrap();
        assert_eq!(vec!["Monday", "Tuesday"], place.closed_days);
        assert_eq!("Monday, Tuesday", PlaceRow::from(&place).closed_days);

        let open_daily = Place::new("b", "B", Position::default());
        assert_eq!("-", PlaceRow::from(&open_daily).closed_days);
    }

    #[test]
    fn test_deserialize_scenario_place() {
        let json = r#"{
            "id": "noodle",
            "name": "Noodle House",
            "purposeId": "dining",
            "x": 40.0,
            "y": 55.5,
            "stayDuration": 45,
            "openTime": "11:00",
            "closeTime": "21:00",
            "breakTimeStart": "",
            "breakTimeEnd": null
        }"#;
        let place: Place = serde_json::from_str(json).unwrap();
        assert_eq!("Noodle House", place.name);
        assert_eq!(Some(Arc::from("dining")), place.purpose_id);
        assert_eq!(Position::new(40.0, 55.5), place.position);
        assert_eq!(45, place.stay_minutes());
        assert_eq!(Some((Time::hm(11, 0), Time::hm(21, 0))), place.operating_hours());
        assert_eq!(None, place.break_time());
    }

    #[test]
    fn test_deserialize_rejects_malformed_time() {
        let json = r#"{"id": "a", "name": "A", "x": 0, "y": 0, "openTime": "9h"}"#;
        assert!(serde_json::from_str::<Place>(json).is_err());
    }

    #[test]
    fn test_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(30.0, 40.0);
        assert_eq!(50.0, a.distance(&b));
    }
}
