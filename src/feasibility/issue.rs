use crate::time::Time;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Wire index of issues that concern the whole itinerary.
pub const ITINERARY_INDEX: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Closed,
    BreakTime,
    InsufficientTime,
    Overlap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Arrival falls outside the place's operating hours.
    Closed {
        place_index: usize,
        place: String,
        open: Time,
        close: Time,
        arrival: Time,
    },
    /// The visit collides with the place's break.
    BreakTime {
        place_index: usize,
        place: String,
        start: Time,
        end: Time,
        arrival: Time,
    },
    /// The walk ends after the window closes.
    InsufficientTime { overage_minutes: u32 },
    /// Reserved. The engine never emits it.
    Overlap { place_index: usize, place: String },
}

impl ValidationIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            ValidationIssue::Closed { .. } => IssueKind::Closed,
            ValidationIssue::BreakTime { .. } => IssueKind::BreakTime,
            ValidationIssue::InsufficientTime { .. } => IssueKind::InsufficientTime,
            ValidationIssue::Overlap { .. } => IssueKind::Overlap,
        }
    }

    /// Index of the offending stop, `None` for itinerary-level issues.
    pub fn place_index(&self) -> Option<usize> {
        match self {
            ValidationIssue::Closed { place_index, .. }
            | ValidationIssue::BreakTime { place_index, .. }
            | ValidationIssue::Overlap { place_index, .. } => Some(*place_index),
            ValidationIssue::InsufficientTime { .. } => None,
        }
    }

    pub fn wire_index(&self) -> i64 {
        self.place_index()
            .map(|i| i as i64)
            .unwrap_or(ITINERARY_INDEX)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Closed {
                place,
                open,
                close,
                arrival,
                ..
            } => write!(
                f,
                "{} is closed on arrival at {} (open {}-{}).",
                place, arrival, open, close
            ),
            ValidationIssue::BreakTime {
                place, start, end, ..
            } => write!(f, "{} overlaps its break time ({}-{}).", place, start, end),
            ValidationIssue::InsufficientTime { overage_minutes } => write!(
                f,
                "The itinerary runs {} minutes past the end time.",
                overage_minutes
            ),
            ValidationIssue::Overlap { place, .. } => {
                write!(f, "{} overlaps the previous visit.", place)
            }
        }
    }
}

impl Serialize for ValidationIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationIssue", 3)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("placeIndex", &self.wire_index())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Outcome of one feasibility evaluation.
///
/// `NotApplicable` means nothing was evaluated (no window or no stops). It is
/// not valid, but it carries no issues and must not be shown as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    NotApplicable,
    Evaluated(Vec<ValidationIssue>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Evaluated(issues) if issues.is_empty())
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(self, Validation::Evaluated(_))
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Validation::NotApplicable => &[],
            Validation::Evaluated(issues) => issues,
        }
    }
}

impl Serialize for Validation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Validation", 2)?;
        state.serialize_field("isValid", &self.is_valid())?;
        state.serialize_field("issues", self.issues())?;
        state.end()
    }
}
