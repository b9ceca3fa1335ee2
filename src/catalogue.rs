//! Owns stops, buses, and the interstop road-distance index; answers
//! lookups and derives bus statistics and stop-to-buses listings.
//!
//! The catalogue exclusively owns its stops and buses in append-only,
//! index-addressed arenas. [`StopId`]/[`BusId`] are stable for the
//! lifetime of the catalogue even though the backing `Vec`s may
//! reallocate — the portable rendering of the source's raw-pointer
//! handles (see DESIGN.md).

use std::cell::OnceCell;
use std::collections::HashMap;

use crate::geo::{self, Coordinates};

/// Index of a stop in [`Catalogue`]. Stable for the catalogue's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub usize);

/// Index of a bus in [`Catalogue`]. Stable for the catalogue's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(pub usize);

#[derive(Debug)]
pub struct Stop {
    pub name: String,
    pub coordinates: Coordinates,
}

/// Derived, lazily-cached statistics for a bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusStatistics {
    pub stops_num: u32,
    pub uniq_stops_num: u32,
    pub geographic_length: f64,
    pub road_length: u32,
    pub curvature: f64,
}

#[derive(Debug)]
pub struct Bus {
    pub name: String,
    /// The *stored* stop list: for a roundtrip bus this is the closed
    /// cycle as given; for a non-roundtrip bus this is already the
    /// palindrome `[s1..sn, sn-1..s1]`.
    pub stops: Vec<StopId>,
    pub is_roundtrip: bool,
    stats: OnceCell<BusStatistics>,
}

/// Result of a `stop_stats`-style query, distinguishing "stop doesn't
/// exist" from "stop exists but no bus serves it".
#[derive(Debug, Clone, PartialEq)]
pub enum StopQuery<'a> {
    NotFound,
    NoBuses,
    Buses(Vec<&'a str>),
}

#[derive(Debug, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_by_name: HashMap<String, StopId>,
    bus_by_name: HashMap<String, BusId>,
    distances: HashMap<(StopId, StopId), u32>,
    /// Stop -> ids of every bus through it, in bus-insertion order;
    /// populated eagerly in `add_bus` as each stop in the stored list is
    /// visited, so it is always consistent with `buses` and never needs
    /// invalidation. Sorted into names on demand by `stop_listing`.
    stop_buses: HashMap<StopId, Vec<BusId>>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a stop. Each name is expected to appear at most once; a
    /// duplicate name silently shadows the earlier stop in the name index
    /// (the earlier stop's storage slot is retained but unreachable by
    /// name), matching the caller-undefined contract for duplicate inserts.
    pub fn add_stop(&mut self, name: impl Into<String>, lat: f64, lng: f64) -> StopId {
        let name = name.into();
        let id = StopId(self.stops.len());
        self.stops.push(Stop { name: name.clone(), coordinates: Coordinates::new(lat, lng) });
        self.stop_by_name.insert(name, id);
        id
    }

    /// Records a one-way road distance. A call naming an unknown stop is
    /// silently ignored.
    pub fn add_distance(&mut self, from: &str, to: &str, metres: u32) {
        let (Some(&from_id), Some(&to_id)) = (self.stop_by_name.get(from), self.stop_by_name.get(to)) else {
            log::debug!("ignoring add_distance({from:?}, {to:?}, {metres}): unknown stop");
            return;
        };
        self.distances.insert((from_id, to_id), metres);
    }

    /// Inserts a bus. All named stops must already be known to the
    /// catalogue; behaviour otherwise is caller-undefined (the external
    /// parser is expected to add all stops before any bus).
    pub fn add_bus(&mut self, name: impl Into<String>, stop_names: &[impl AsRef<str>], is_roundtrip: bool) -> BusId {
        let name = name.into();
        let forward: Vec<StopId> = stop_names
            .iter()
            .map(|s| self.stop_by_name[s.as_ref()])
            .collect();

        let stored = if is_roundtrip || forward.len() <= 1 {
            forward
        } else {
            let mut stored = forward.clone();
            stored.extend(forward[..forward.len() - 1].iter().rev().copied());
            stored
        };

        let id = BusId(self.buses.len());
        for &stop in &stored {
            self.stop_buses.entry(stop).or_default().push(id);
        }
        self.buses.push(Bus { name: name.clone(), stops: stored, is_roundtrip, stats: OnceCell::new() });
        self.bus_by_name.insert(name, id);
        id
    }

    pub fn find_stop(&self, name: &str) -> Option<StopId> {
        self.stop_by_name.get(name).copied()
    }

    pub fn find_bus(&self, name: &str) -> Option<BusId> {
        self.bus_by_name.get(name).copied()
    }

    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id.0]
    }

    pub fn bus(&self, id: BusId) -> &Bus {
        &self.buses[id.0]
    }

    /// Ids of every bus in insertion order.
    pub fn bus_ids(&self) -> impl Iterator<Item = BusId> {
        (0..self.buses.len()).map(BusId)
    }

    /// Directed distance from `from` to `to`, or `0` if none was recorded.
    pub fn distance(&self, from: StopId, to: StopId) -> u32 {
        self.distances.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Recorded distance along `from -> to`, falling back to the reverse
    /// direction, then `0`. Feeds a bus's `road_length`.
    fn directed_distance_with_fallback(&self, from: StopId, to: StopId) -> u32 {
        if let Some(&d) = self.distances.get(&(from, to)) {
            d
        } else {
            self.distances.get(&(to, from)).copied().unwrap_or(0)
        }
    }

    /// Derives (and caches) statistics for the named bus.
    pub fn bus_statistics(&self, name: &str) -> Option<&BusStatistics> {
        let id = self.find_bus(name)?;
        let bus = self.bus(id);
        Some(bus.stats.get_or_init(|| self.compute_bus_statistics(bus)))
    }

    fn compute_bus_statistics(&self, bus: &Bus) -> BusStatistics {
        let stops_num = bus.stops.len() as u32;
        let uniq_stops_num = {
            let mut uniq: Vec<StopId> = bus.stops.clone();
            uniq.sort_unstable();
            uniq.dedup();
            uniq.len() as u32
        };

        let mut geographic_length = 0.0;
        let mut road_length: u64 = 0;
        for pair in bus.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            geographic_length += geo::great_circle(self.stop(a).coordinates, self.stop(b).coordinates);
            road_length += self.directed_distance_with_fallback(a, b) as u64;
        }

        let curvature = if geographic_length > 0.0 {
            road_length as f64 / geographic_length
        } else {
            1.0
        };

        BusStatistics {
            stops_num,
            uniq_stops_num,
            geographic_length,
            road_length: road_length as u32,
            curvature,
        }
    }

    /// Sorted list of bus names through `name`, or [`StopQuery::NotFound`]
    /// / [`StopQuery::NoBuses`] for the not-found / no-service cases.
    pub fn stop_listing(&self, name: &str) -> StopQuery<'_> {
        let Some(id) = self.find_stop(name) else {
            return StopQuery::NotFound;
        };
        match self.stop_buses.get(&id) {
            None => StopQuery::NoBuses,
            Some(buses) => {
                let mut names: Vec<&str> = buses.iter().map(|&b| self.bus(b).name.as_str()).collect();
                names.sort_unstable();
                StopQuery::Buses(names)
            }
        }
    }

    /// Sorted names of every stop served by at least one bus.
    pub fn all_stop_names_with_buses(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .stop_buses
            .keys()
            .map(|&id| self.stop(id).name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Sorted names of every bus in the catalogue.
    pub fn all_bus_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.buses.iter().map(|b| b.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}
