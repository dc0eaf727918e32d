//! Day-trip itinerary planning with schedule feasibility checks.
//!
//! Places carry opening hours, break times and stay durations. An
//! [`itinerary::Itinerary`] holds the ordered route through them and asks the
//! [`feasibility::FeasibilityEngine`] whether the day can be walked as planned.

pub mod feasibility;
pub mod itinerary;
pub mod place;
pub mod purpose;
pub mod time;
