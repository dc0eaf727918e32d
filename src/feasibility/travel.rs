//! Placeholder estimates of transit time between consecutive stops.
//!
//! Positions are map-relative percentages, so none of these models is a real
//! routing distance. They only need to be deterministic and documented, since
//! the chosen model shifts every arrival time after the first stop.

use crate::place::Position;
use serde::{Deserialize, Serialize};

pub trait TravelTimeEstimator {
    /// Minutes needed to get from one stop to the next.
    fn travel_minutes(&self, from: Position, to: Position) -> u32;
}

/// Straight-line distance scaled to minutes and clamped into a range.
///
/// With the defaults: `clamp(round(distance * 0.8), 5, 60)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DistanceHeuristic {
    pub minutes_per_unit: f64,
    pub min_minutes: u32,
    pub max_minutes: u32,
}

impl Default for DistanceHeuristic {
    fn default() -> Self {
        Self {
            minutes_per_unit: 0.8,
            min_minutes: 5,
            max_minutes: 60,
        }
    }
}

impl TravelTimeEstimator for DistanceHeuristic {
    fn travel_minutes(&self, from: Position, to: Position) -> u32 {
        let minutes = (from.distance(&to) * self.minutes_per_unit).round();
        if minutes.is_nan() {
            return self.min_minutes;
        }
        minutes.clamp(self.min_minutes as f64, self.max_minutes as f64) as u32
    }
}

/// The same fixed hop for every pair of stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatTravelTime {
    pub minutes: u32,
}

impl Default for FlatTravelTime {
    fn default() -> Self {
        Self { minutes: 30 }
    }
}

impl TravelTimeEstimator for FlatTravelTime {
    fn travel_minutes(&self, _from: Position, _to: Position) -> u32 {
        self.minutes
    }
}

/// Model selectable from a scenario file or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TravelModel {
    Distance(DistanceHeuristic),
    Flat(FlatTravelTime),
}

impl Default for TravelModel {
    fn default() -> Self {
        TravelModel::Distance(DistanceHeuristic::default())
    }
}

impl TravelTimeEstimator for TravelModel {
    fn travel_minutes(&self, from: Position, to: Position) -> u32 {
        match self {
            TravelModel::Distance(model) => model.travel_minutes(from, to),
            TravelModel::Flat(model) => model.travel_minutes(from, to),
        }
    }
}

impl std::fmt::Display for TravelModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TravelModel::Distance(model) => write!(
                f,
                "distance x{} ({}-{} min)",
                model.minutes_per_unit, model.min_minutes, model.max_minutes
            ),
            TravelModel::Flat(model) => write!(f, "flat {} min", model.minutes),
        }
    }
}
