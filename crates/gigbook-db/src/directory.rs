//! Name search and location grouping over loaded collections.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::entities::{artist, venue};
use crate::schedule::Booked;

/// Anything listed by name in the directory.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for venue::Model {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for artist::Model {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<M: Named> Named for Booked<M> {
    fn name(&self) -> &str {
        self.entity.name()
    }
}

/// Case-insensitive substring match on the name. The term is trimmed first,
/// so `" hop"` matches like `"hop"` and a blank term matches everything.
/// Input order is preserved.
pub fn search<'a, T: Named>(entities: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return entities.iter().collect();
    }
    entities
        .iter()
        .filter(|e| e.name().to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// All venues sharing one (city, state) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

pub fn group_by_location(venues: &[Booked<venue::Model>]) -> Vec<Area> {
    group_by_location_at(venues, Utc::now())
}

/// One area per distinct (city, state) pair, ordered by state then city.
/// Venues keep their input order inside an area.
pub fn group_by_location_at(venues: &[Booked<venue::Model>], now: DateTime<Utc>) -> Vec<Area> {
    let mut areas: BTreeMap<(&str, &str), Vec<VenueSummary>> = BTreeMap::new();
    for booked in venues {
        let v = &booked.entity;
        areas
            .entry((v.state.as_str(), v.city.as_str()))
            .or_default()
            .push(VenueSummary {
                id: v.id,
                name: v.name.clone(),
                num_upcoming_shows: booked.num_upcoming_shows_at(now),
            });
    }

    areas
        .into_iter()
        .map(|((state, city), venues)| Area {
            city: city.to_string(),
            state: state.to_string(),
            venues,
        })
        .collect()
}
