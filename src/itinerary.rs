use crate::feasibility::{
    BreakPolicy, FeasibilityEngine, ItineraryEntry, Stop, TimeWindow, TravelModel, Validation,
};
use crate::place::{Place, PlaceId};
use crate::purpose::Purpose;
use crate::time::TimeParseError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItineraryError {
    #[error("unknown place {0}")]
    UnknownPlace(PlaceId),
    #[error("{0} is already in the route")]
    AlreadySelected(String),
    #[error("{0} is not in the route")]
    NotInRoute(PlaceId),
    #[error("position {position} is out of range for a route of {len} stops")]
    PositionOutOfRange { position: usize, len: usize },
    #[error(transparent)]
    Time(#[from] TimeParseError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub break_policy: BreakPolicy,
    pub travel: TravelModel,
}

/// The place catalog together with the route being planned through it.
pub struct Itinerary {
    purposes: Vec<Purpose>,
    places: HashMap<PlaceId, Place>,
    route: Vec<PlaceId>,
    window: TimeWindow,
    pub settings: EngineSettings,
}

impl Itinerary {
    pub fn new(purposes: Vec<Purpose>, places: Vec<Place>, settings: EngineSettings) -> Itinerary {
        let places = places.into_iter().map(|p| (p.id.clone(), p)).collect();
        Itinerary {
            purposes,
            places,
            route: vec![],
            window: TimeWindow::default(),
            settings,
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> io::Result<Self> {
        #[derive(Deserialize)]
        struct RawData {
            #[serde(default)]
            purposes: Vec<Purpose>,
            places: Vec<Place>,
            #[serde(default)]
            route: Vec<PlaceId>,
            #[serde(default)]
            window: TimeWindow,
            #[serde(default)]
            settings: EngineSettings,
        }
        let raw: RawData = serde_json::from_str(data)?;

        let mut itinerary = Itinerary::new(raw.purposes, raw.places, raw.settings);
        itinerary.window = raw.window;
        for place_id in raw.route {
            itinerary
                .select(&place_id)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        }
        Ok(itinerary)
    }

    pub fn purposes(&self) -> &[Purpose] {
        &self.purposes
    }

    pub fn place(&self, place_id: &str) -> Option<&Place> {
        self.places.get(place_id)
    }

    /// Catalog places sorted by id, optionally limited to one purpose.
    pub fn places_by_purpose(&self, purpose: Option<&str>) -> Vec<&Place> {
        let purpose_id = purpose.map(|query| {
            self.purposes
                .iter()
                .find(|p| p.matches(query))
                .map(|p| p.id.clone())
                .unwrap_or_else(|| Arc::from(query))
        });
        let mut places = self
            .places
            .values()
            .filter(|p| purpose_id.is_none() || p.purpose_id == purpose_id)
            .collect::<Vec<_>>();
        places.sort_by(|a, b| a.id.cmp(&b.id));
        places
    }

    pub fn route(&self) -> &[PlaceId] {
        &self.route
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn select(&mut self, place_id: &str) -> Result<&Place, ItineraryError> {
        let place = self
            .places
            .get(place_id)
            .ok_or_else(|| ItineraryError::UnknownPlace(Arc::from(place_id)))?;
        if self.route.iter().any(|id| **id == *place_id) {
            return Err(ItineraryError::AlreadySelected(place.name.clone()));
        }
        self.route.push(place.id.clone());
        info!(place = %place.name, stops = self.route.len(), "place added to route");

        self.assert_invariants();
        Ok(place)
    }

    pub fn remove(&mut self, place_id: &str) -> Result<(), ItineraryError> {
        let position = self
            .route
            .iter()
            .position(|id| **id == *place_id)
            .ok_or_else(|| ItineraryError::NotInRoute(Arc::from(place_id)))?;
        let removed = self.route.remove(position);
        info!(place = %removed, stops = self.route.len(), "place removed from route");

        self.assert_invariants();
        Ok(())
    }

    /// Moves the stop at `from` to `to`, both 0-based.
    pub fn move_stop(&mut self, from: usize, to: usize) -> Result<(), ItineraryError> {
        let len = self.route.len();
        for position in [from, to] {
            if position >= len {
                return Err(ItineraryError::PositionOutOfRange { position, len });
            }
        }
        let place_id = self.route.remove(from);
        info!(place = %place_id, from, to, "stop moved");
        self.route.insert(to, place_id);

        self.assert_invariants();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.route.clear();
        info!("route cleared");
    }

    pub fn set_window(&mut self, start: &str, end: &str) -> Result<(), ItineraryError> {
        self.window = TimeWindow::parse(start, end)?;
        info!(start = ?self.window.start, end = ?self.window.end, "time window set");
        Ok(())
    }

    pub fn clear_window(&mut self) {
        self.window = TimeWindow::default();
    }

    pub fn set_break_policy(&mut self, policy: BreakPolicy) {
        self.settings.break_policy = policy;
    }

    pub fn set_travel(&mut self, travel: TravelModel) {
        self.settings.travel = travel;
    }

    pub fn engine(&self) -> FeasibilityEngine {
        FeasibilityEngine::new(self.settings.break_policy, self.settings.travel)
    }

    pub fn entries(&self) -> Vec<ItineraryEntry<'_>> {
        ItineraryEntry::from_places(self.route.iter().filter_map(|id| self.places.get(id)))
    }

    pub fn validate(&self) -> Validation {
        self.engine().evaluate(&self.entries(), &self.window)
    }

    /// Arrival and departure per stop, once a start time is set.
    pub fn timeline(&self) -> Option<Vec<Stop>> {
        self.window
            .start
            .map(|start| self.engine().timeline(&self.entries(), start))
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        debug_assert!(
            self.route.iter().all(|id| self.places.contains_key(id)),
            "Route <-> catalog membership invariant violated"
        );

        let mut seen = self.route.clone();
        seen.sort();
        seen.dedup();
        debug_assert_eq!(
            seen.len(),
            self.route.len(),
            "Route uniqueness invariant violated"
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_invariants(&self) {}
}
