//! The heart of the system: builds a time-weighted graph from a frozen
//! [`Catalogue`] using the vertex-split model, and decodes
//! the shortest-path oracle's answers back into semantic itineraries of
//! *Wait* and *Bus* steps.

use std::collections::HashMap;

use crate::catalogue::{BusId, Catalogue, StopId};
use crate::error::RouterSettingsError;
use crate::graph::{DirectedWeightedGraph, Edge, EdgeId, VertexId};
use crate::oracle::ShortestPathOracle;

/// `bus_wait_time` (minutes) and `bus_velocity` (km/h), validated once at
/// construction — the router's only external configuration surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterSettings {
    pub bus_wait_time: u32,
    pub bus_velocity: f64,
}

impl RouterSettings {
    pub fn new(bus_wait_time: u32, bus_velocity: f64) -> Result<Self, RouterSettingsError> {
        if !(1..=1000).contains(&bus_wait_time) {
            return Err(RouterSettingsError::WaitTimeOutOfRange(bus_wait_time));
        }
        if !(bus_velocity > 1.0 && bus_velocity <= 1000.0) {
            return Err(RouterSettingsError::VelocityOutOfRange(bus_velocity));
        }
        Ok(Self { bus_wait_time, bus_velocity })
    }

    /// Converts the configured km/h velocity to metres per minute.
    fn metres_per_minute(&self) -> f64 {
        self.bus_velocity * 1000.0 / 60.0
    }
}

/// One itinerary step.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Wait { stop: String, time: f64 },
    Bus { bus: String, span_count: u32, time: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub total_time: f64,
    pub items: Vec<Item>,
}

/// What a ride edge was built from: which bus, and the `(i, j)` pair of
/// positions in its *stored* stop list that the edge spans. Recording
/// this directly (rather than re-scanning the bus's stop list on decode)
/// is what makes decoding correct even for buses that revisit a stop.
#[derive(Debug, Clone, Copy)]
struct RideInfo {
    bus: BusId,
    from_order: usize,
    to_order: usize,
}

/// `None` for a wait edge (tagged "no bus"), `Some` for a ride edge.
type EdgeTag = Option<RideInfo>;

pub struct TransportRouter<'c> {
    catalogue: &'c Catalogue,
    settings: RouterSettings,
    graph: DirectedWeightedGraph<f64>,
    oracle: ShortestPathOracle,
    edge_tags: Vec<EdgeTag>,
    /// `board` vertex id for each stop that has at least one bus.
    board_vertex: HashMap<StopId, VertexId>,
    /// reverse of `board_vertex`, for decoding wait-edge stop names.
    vertex_stop: HashMap<VertexId, StopId>,
}

impl<'c> TransportRouter<'c> {
    pub fn new(catalogue: &'c Catalogue, settings: RouterSettings) -> Self {
        let served_stop_names = catalogue.all_stop_names_with_buses();
        let served_stops: Vec<StopId> = served_stop_names
            .iter()
            .map(|name| catalogue.find_stop(name).expect("all_stop_names_with_buses returns known stops"))
            .collect();

        // Vertex-split: two vertices per served stop, board then ride,
        // allocated in `all_stop_names_with_buses` order; the concrete
        // order is immaterial as long as the mapping is kept.
        let mut board_vertex = HashMap::with_capacity(served_stops.len());
        let mut vertex_stop = HashMap::with_capacity(served_stops.len() * 2);
        let mut ride_vertex = HashMap::with_capacity(served_stops.len());
        let mut next_vertex = 0usize;
        for &stop in &served_stops {
            let board = next_vertex;
            let ride = next_vertex + 1;
            next_vertex += 2;
            board_vertex.insert(stop, board);
            ride_vertex.insert(stop, ride);
            vertex_stop.insert(board, stop);
            vertex_stop.insert(ride, stop);
        }

        let mut graph = DirectedWeightedGraph::new(next_vertex);
        let mut edge_tags = Vec::new();

        // Wait edges: s_ride -> s_board, weight bus_wait_time, tagged
        // "no bus" so the decoder emits a Wait step.
        for &stop in &served_stops {
            let id = graph.add_edge(Edge {
                from: ride_vertex[&stop],
                to: board_vertex[&stop],
                weight: settings.bus_wait_time as f64,
            });
            debug_assert_eq!(id, edge_tags.len());
            edge_tags.push(None);
        }

        // Ride edges: enumerate every span a passenger could stay aboard
        // without alighting, per bus.
        for bus_id in catalogue.bus_ids() {
            let bus = catalogue.bus(bus_id);
            let n = bus.stops.len();
            if n <= 1 {
                continue;
            }

            let velocity = settings.metres_per_minute();
            let segment_ranges: Vec<std::ops::Range<usize>> = if bus.is_roundtrip {
                vec![0..n]
            } else {
                // Palindrome [s1..sn, sn-1..s1] of length 2n'-1: forward
                // half 0..n', reverse half n'-1..2n'-1, no pair straddles
                // the midpoint (the terminal is a forced alight).
                let n_forward = (n + 1) / 2;
                vec![0..n_forward, (n_forward - 1)..n]
            };

            for range in segment_ranges {
                for i in range.clone() {
                    let mut cumulative_metres = 0u64;
                    for j in (i + 1)..range.end {
                        let a = bus.stops[j - 1];
                        let b = bus.stops[j];
                        cumulative_metres += directed_distance_with_fallback(catalogue, a, b) as u64;
                        let weight = cumulative_metres as f64 / velocity;

                        let from_stop = bus.stops[i];
                        let to_stop = bus.stops[j];
                        let id = graph.add_edge(Edge {
                            from: board_vertex[&from_stop],
                            to: ride_vertex[&to_stop],
                            weight,
                        });
                        debug_assert_eq!(id, edge_tags.len());
                        edge_tags.push(Some(RideInfo { bus: bus_id, from_order: i, to_order: j }));
                    }
                }
            }
        }

        log::debug!(
            "transport router built: {} vertices, {} edges ({} served stops, {} buses)",
            graph.vertex_count(),
            graph.edge_count(),
            served_stops.len(),
            catalogue.all_bus_names().len()
        );

        let oracle = ShortestPathOracle::build(&graph);

        Self { catalogue, settings, graph, oracle, edge_tags, board_vertex, vertex_stop }
    }

    /// Finds the minimum-total-time itinerary from `from_name` to
    /// `to_name`, or `None` if either name is unknown, either stop has no
    /// bus service, or the destination is unreachable.
    pub fn find_route(&self, from_name: &str, to_name: &str) -> Option<Itinerary> {
        let from_stop = self.catalogue.find_stop(from_name)?;
        let to_stop = self.catalogue.find_stop(to_name)?;
        let &from_board = self.board_vertex.get(&from_stop)?;
        let &to_board = self.board_vertex.get(&to_stop)?;

        let answer = self.oracle.build_route(&self.graph, from_board, to_board)?;
        if from_board == to_board {
            return Some(Itinerary { total_time: 0.0, items: Vec::new() });
        }

        let mut items = vec![Item::Wait { stop: from_name.to_owned(), time: self.settings.bus_wait_time as f64 }];
        for edge_id in &answer.edges {
            items.push(self.decode_edge(*edge_id));
        }

        // The path always ends at `to_board`, reached via a wait edge at
        // `to`; a passenger already at their destination does not wait.
        if matches!(items.last(), Some(Item::Wait { .. })) {
            items.pop();
        }

        Some(Itinerary { total_time: answer.total_weight, items })
    }

    fn decode_edge(&self, edge_id: EdgeId) -> Item {
        let edge = self.graph.get_edge(edge_id);
        match self.edge_tags[edge_id] {
            Some(RideInfo { bus, from_order, to_order }) => Item::Bus {
                bus: self.catalogue.bus(bus).name.clone(),
                span_count: (to_order - from_order) as u32,
                time: edge.weight,
            },
            None => {
                let stop = self.vertex_stop[&edge.from];
                Item::Wait { stop: self.catalogue.stop(stop).name.clone(), time: edge.weight }
            }
        }
    }

    #[cfg(test)]
    fn ride_spans_for(&self, bus: BusId) -> Vec<(usize, usize)> {
        self.edge_tags
            .iter()
            .filter_map(|tag| tag.as_ref())
            .filter(|info| info.bus == bus)
            .map(|info| (info.from_order, info.to_order))
            .collect()
    }
}

fn directed_distance_with_fallback(catalogue: &Catalogue, from: StopId, to: StopId) -> u32 {
    let direct = catalogue.distance(from, to);
    if direct != 0 {
        direct
    } else {
        catalogue.distance(to, from)
    }
}
