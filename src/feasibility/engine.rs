use crate::feasibility::issue::{Validation, ValidationIssue};
use crate::feasibility::travel::{TravelModel, TravelTimeEstimator};
use crate::place::Place;
use crate::time::{Time, TimeParseError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a break window is compared against a visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum BreakPolicy {
    /// The whole stay `[arrival, arrival + stay)` must miss `[start, end)`.
    #[default]
    #[serde(rename = "interval")]
    #[value(name = "interval")]
    IntervalOverlap,
    /// Only the arrival instant is checked, against `[start, end]`.
    #[serde(rename = "arrival")]
    #[value(name = "arrival")]
    ArrivalInstant,
}

impl BreakPolicy {
    pub fn conflicts(self, arrival: Time, stay: u32, window: (Time, Time)) -> bool {
        match self {
            BreakPolicy::IntervalOverlap => Time::is_overlapping(&(arrival, arrival + stay), &window),
            BreakPolicy::ArrivalInstant => window.0 <= arrival && arrival <= window.1,
        }
    }
}

impl std::fmt::Display for BreakPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakPolicy::IntervalOverlap => write!(f, "interval"),
            BreakPolicy::ArrivalInstant => write!(f, "arrival"),
        }
    }
}

/// Start and end of the excursion. Either end may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub start: Option<Time>,
    #[serde(default, deserialize_with = "crate::time::deserialize_optional")]
    pub end: Option<Time>,
}

impl TimeWindow {
    pub fn new(start: Time, end: Time) -> TimeWindow {
        TimeWindow {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Parses `HH:MM` bounds, blank strings leave a bound unset.
    pub fn parse(start: &str, end: &str) -> Result<TimeWindow, TimeParseError> {
        Ok(TimeWindow {
            start: Time::parse_optional(start)?,
            end: Time::parse_optional(end)?,
        })
    }

    pub fn bounds(&self) -> Option<(Time, Time)> {
        self.start.zip(self.end)
    }
}

/// A place at its position in the visit order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItineraryEntry<'a> {
    pub visit_index: usize,
    pub place: &'a Place,
}

impl<'a> ItineraryEntry<'a> {
    pub fn from_places<I>(places: I) -> Vec<ItineraryEntry<'a>>
    where
        I: IntoIterator<Item = &'a Place>,
    {
        places
            .into_iter()
            .enumerate()
            .map(|(visit_index, place)| ItineraryEntry { visit_index, place })
            .collect()
    }
}

/// Computed timing of one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub visit_index: usize,
    pub arrival: Time,
    pub departure: Time,
    pub travel_to_next: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct FeasibilityEngine<T = TravelModel> {
    pub break_policy: BreakPolicy,
    pub travel: T,
}

impl<T: TravelTimeEstimator> FeasibilityEngine<T> {
    pub fn new(break_policy: BreakPolicy, travel: T) -> Self {
        FeasibilityEngine {
            break_policy,
            travel,
        }
    }

    /// Walks the stops in the given order starting at `start`.
    ///
    /// Time advances by each stay and, between consecutive stops, by the
    /// travel estimate. Nothing is checked here.
    pub fn timeline(&self, entries: &[ItineraryEntry<'_>], start: Time) -> Vec<Stop> {
        let mut current = start;
        let mut stops = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let arrival = current;
            current += entry.place.stay_minutes();
            let departure = current;
            let travel_to_next = entries.get(i + 1).map(|next| {
                self.travel
                    .travel_minutes(entry.place.position, next.place.position)
            });
            if let Some(minutes) = travel_to_next {
                current += minutes;
            }
            stops.push(Stop {
                visit_index: entry.visit_index,
                arrival,
                departure,
                travel_to_next,
            });
        }
        stops
    }

    /// Checks that the stops can be visited in order inside `window`.
    ///
    /// Every stop is checked even after a violation; the itinerary-level
    /// overrun, if any, is reported last.
    pub fn evaluate(&self, entries: &[ItineraryEntry<'_>], window: &TimeWindow) -> Validation {
        let Some((start, end)) = window.bounds() else {
            return Validation::NotApplicable;
        };
        if entries.is_empty() {
            return Validation::NotApplicable;
        }

        let stops = self.timeline(entries, start);
        let mut issues = vec![];

        for (entry, stop) in entries.iter().zip(&stops) {
            let place = entry.place;
            debug!(
                place = %place.name,
                arrival = %stop.arrival,
                departure = %stop.departure,
                travel = ?stop.travel_to_next,
                "evaluating stop {}",
                entry.visit_index
            );

            // arrival instant only, the stay may still run past closing
            if let Some((open, close)) = place.operating_hours() {
                if stop.arrival < open || stop.arrival > close {
                    issues.push(ValidationIssue::Closed {
                        place_index: entry.visit_index,
                        place: place.name.clone(),
                        open,
                        close,
                        arrival: stop.arrival,
                    });
                }
            }

            if let Some((break_start, break_end)) = place.break_time() {
                if self
                    .break_policy
                    .conflicts(stop.arrival, place.stay_minutes(), (break_start, break_end))
                {
                    issues.push(ValidationIssue::BreakTime {
                        place_index: entry.visit_index,
                        place: place.name.clone(),
                        start: break_start,
                        end: break_end,
                        arrival: stop.arrival,
                    });
                }
            }
        }

        let finish = stops.last().map(|s| s.departure).unwrap_or(start);
        if finish > end {
            issues.push(ValidationIssue::InsufficientTime {
                overage_minutes: finish - end,
            });
        }

        debug!(
            stops = stops.len(),
            finish = %finish,
            issues = issues.len(),
            "itinerary evaluated"
        );
        Validation::Evaluated(issues)
    }
}
