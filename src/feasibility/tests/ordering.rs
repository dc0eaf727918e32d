use crate::feasibility::IssueKind::Closed;
use crate::feasibility::tests::utils::{add_place, evaluate, kinds, window};
use crate::feasibility::{FeasibilityEngine, ItineraryEntry, TravelModel};

#[test]
fn test_same_input_same_result() {
    let mut places = Vec::new();
    add_place(&mut places, "GALLERY", 10.0, 80.0, Some(90), Some(("10:00", "17:00")), None);
    add_place(&mut places, "NOODLES", 70.0, 20.0, Some(45), Some(("11:00", "21:00")), Some(("15:00", "17:00")));
    let engine = FeasibilityEngine::<TravelModel>::default();
    let entries = ItineraryEntry::from_places(&places);
    let day = window("09:30", "13:00");

    let first = engine.evaluate(&entries, &day);
    let second = engine.evaluate(&entries, &day);

    assert_eq!(first, second);
}

#[test]
fn test_order_decides_which_stop_is_closed() {
    let mut museum_first = Vec::new();
    add_place(&mut museum_first, "MUSEUM", 0.0, 0.0, Some(180), None, None);
    add_place(&mut museum_first, "LUNCH", 0.0, 0.0, Some(60), Some(("11:00", "14:00")), None);
    let lunch_first: Vec<_> = museum_first.iter().rev().cloned().collect();

    let ok = evaluate(&museum_first, &window("09:00", "18:00"));
    let too_early = evaluate(&lunch_first, &window("09:00", "18:00"));

    assert!(ok.is_valid());
    assert_eq!(vec![(Closed, 0)], kinds(&too_early));
}

#[test]
fn test_issue_index_follows_visit_order() {
    let mut places = Vec::new();
    add_place(&mut places, "A", 0.0, 0.0, Some(60), None, None);
    add_place(&mut places, "B", 0.0, 0.0, Some(60), None, None);
    add_place(&mut places, "NIGHT_MARKET", 0.0, 0.0, Some(60), Some(("18:00", "23:00")), None);

    let last = evaluate(&places, &window("09:00", "18:00"));
    places.rotate_right(1);
    let first = evaluate(&places, &window("09:00", "18:00"));

    assert_eq!(vec![(Closed, 2)], kinds(&last));
    assert_eq!(vec![(Closed, 0)], kinds(&first));
}

#[test]
fn test_unconstrained_day_is_valid() {
    let mut places = Vec::new();
    add_place(&mut places, "BEACH", 5.0, 5.0, None, None, None);
    add_place(&mut places, "PIER", 95.0, 95.0, Some(20), None, None);
    add_place(&mut places, "OLD_TOWN", 50.0, 10.0, Some(120), None, None);

    let validation = evaluate(&places, &window("08:00", "20:00"));

    assert!(validation.is_valid());
    assert!(validation.is_evaluated());
}
