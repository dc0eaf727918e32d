//! Schedule feasibility of an ordered itinerary.
//!
//! The engine walks the stops in the order given, advancing a single clock by
//! stay durations and travel estimates, and reports every stop that is closed
//! or on break at the time it is visited, plus an overrun of the day window.

mod engine;
mod issue;
mod travel;

#[cfg(test)]
mod tests;

pub use engine::{BreakPolicy, FeasibilityEngine, ItineraryEntry, Stop, TimeWindow};
pub use issue::{ITINERARY_INDEX, IssueKind, Validation, ValidationIssue};
pub use travel::{DistanceHeuristic, FlatTravelTime, TravelModel, TravelTimeEstimator};
