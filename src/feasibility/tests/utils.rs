use crate::feasibility::{
    FeasibilityEngine, ItineraryEntry, IssueKind, TimeWindow, Validation,
};
use crate::place::{Place, Position};
use crate::time::Time;
use proptest::option;
use proptest::prelude::Strategy;
use std::sync::Arc;

pub fn t(s: &str) -> Time {
    s.parse().unwrap()
}

pub fn window(start: &str, end: &str) -> TimeWindow {
    TimeWindow::parse(start, end).unwrap()
}

pub fn add_place(
    places: &mut Vec<Place>,
    place_id: &str,
    x: f64,
    y: f64,
    stay_duration: Option<u32>,
    hours: Option<(&str, &str)>,
    break_time: Option<(&str, &str)>,
) {
    let mut place = Place::new(place_id, place_id, Position::new(x, y));
    place.stay_duration = stay_duration;
    place.open_time = hours.map(|(open, _)| t(open));
    place.close_time = hours.map(|(_, close)| t(close));
    place.break_time_start = break_time.map(|(start, _)| t(start));
    place.break_time_end = break_time.map(|(_, end)| t(end));
    places.push(place);
}

pub fn evaluate(places: &[Place], window: &TimeWindow) -> Validation {
    evaluate_with(&FeasibilityEngine::default(), places, window)
}

pub fn evaluate_with(
    engine: &FeasibilityEngine,
    places: &[Place],
    window: &TimeWindow,
) -> Validation {
    let entries = ItineraryEntry::from_places(places);
    engine.evaluate(&entries, window)
}

/// `(kind, wire index)` of every issue, in reported order.
pub fn kinds(validation: &Validation) -> Vec<(IssueKind, i64)> {
    validation
        .issues()
        .iter()
        .map(|issue| (issue.kind(), issue.wire_index()))
        .collect()
}

pub fn arb_time() -> impl Strategy<Value = Time> {
    (0..24u32, 0..60u32).prop_map(|(h, m)| Time::hm(h, m))
}

pub fn arb_unconstrained_place() -> impl Strategy<Value = Place> {
    (0.0..=100.0f64, 0.0..=100.0f64, option::of(0..=60u32)).prop_map(|(x, y, stay)| {
        let mut place = Place::new("P", "Unconstrained", Position::new(x, y));
        place.stay_duration = stay;
        place
    })
}

pub fn arb_place() -> impl Strategy<Value = Place> {
    (
        arb_unconstrained_place(),
        option::of((arb_time(), arb_time())),
        option::of((arb_time(), arb_time())),
    )
        .prop_map(|(mut place, hours, break_time)| {
            place.id = Arc::from("C");
            place.name = "Constrained".to_string();
            place.open_time = hours.map(|h| h.0);
            place.close_time = hours.map(|h| h.1);
            place.break_time_start = break_time.map(|b| b.0);
            place.break_time_end = break_time.map(|b| b.1);
            place
        })
}
