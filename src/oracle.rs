//! Single-source shortest paths over a non-negative-weight
//! [`DirectedWeightedGraph<f64>`]. Construction eagerly runs Dijkstra from
//! every vertex, so a later [`ShortestPathOracle::build_route`] is O(L) in
//! the length of the returned path.
//!
//! The oracle does not own the graph it was built from — it is handed
//! back in to [`ShortestPathOracle::build_route`] for predecessor-edge
//! lookups. This lets a single owner (e.g. [`crate::transport_router`])
//! hold both the graph and the oracle without a self-referential borrow.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::{DirectedWeightedGraph, EdgeId, VertexId};

/// A shortest path: its total weight and the ordered edges that make it up.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAnswer {
    pub total_weight: f64,
    pub edges: Vec<EdgeId>,
}

pub struct ShortestPathOracle {
    // distance[source][vertex]
    distance: Vec<Vec<f64>>,
    // predecessor_edge[source][vertex] = the edge relaxed last on the
    // shortest path from `source` to `vertex`, or None for `source` itself
    // or an unreached vertex.
    predecessor_edge: Vec<Vec<Option<EdgeId>>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    dist: f64,
    vertex: VertexId,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that `BinaryHeap` (a max-heap) pops the smallest
        // distance first.
        other.dist.total_cmp(&self.dist)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ShortestPathOracle {
    /// Runs Dijkstra from every vertex in `graph`. Weights must be
    /// non-negative; debug builds assert this while relaxing an edge.
    pub fn build(graph: &DirectedWeightedGraph<f64>) -> Self {
        let v = graph.vertex_count();
        let mut distance = Vec::with_capacity(v);
        let mut predecessor_edge = Vec::with_capacity(v);

        for source in 0..v {
            let (dist, pred) = Self::dijkstra_from(graph, source);
            distance.push(dist);
            predecessor_edge.push(pred);
        }

        Self { distance, predecessor_edge }
    }

    fn dijkstra_from(graph: &DirectedWeightedGraph<f64>, source: VertexId) -> (Vec<f64>, Vec<Option<EdgeId>>) {
        let v = graph.vertex_count();
        let mut dist = vec![f64::INFINITY; v];
        let mut pred = vec![None; v];
        dist[source] = 0.0;

        let mut heap = BinaryHeap::new();
        heap.push(HeapEntry { dist: 0.0, vertex: source });

        while let Some(HeapEntry { dist: d, vertex: u }) = heap.pop() {
            // Stale heap entry: a shorter path to `u` was already found.
            if d > dist[u] {
                continue;
            }
            for &edge_id in graph.incident_edges(u) {
                let edge = graph.get_edge(edge_id);
                if edge.weight < 0.0 {
                    log::error!(
                        "negative edge weight {} on edge {}->{}; oracle results are undefined",
                        edge.weight,
                        edge.from,
                        edge.to
                    );
                }
                debug_assert!(
                    edge.weight >= 0.0,
                    "shortest-path oracle rejects negative edge weight {} on edge {}->{}",
                    edge.weight,
                    edge.from,
                    edge.to
                );
                let candidate = d + edge.weight;
                // Strict less-than: on a tie the earlier-relaxed
                // predecessor is kept, giving deterministic,
                // insertion-order-reproducible tie-breaking.
                if candidate < dist[edge.to] {
                    dist[edge.to] = candidate;
                    pred[edge.to] = Some(edge_id);
                    heap.push(HeapEntry { dist: candidate, vertex: edge.to });
                }
            }
        }

        (dist, pred)
    }

    /// Returns the shortest path from `from` to `to`, or `None` if `to` is
    /// unreachable. Returns `{0.0, []}` iff `from == to`. `graph` must be
    /// the same graph this oracle was built from.
    pub fn build_route(&self, graph: &DirectedWeightedGraph<f64>, from: VertexId, to: VertexId) -> Option<RouteAnswer> {
        let total_weight = self.distance[from][to];
        if !total_weight.is_finite() {
            return None;
        }
        if from == to {
            return Some(RouteAnswer { total_weight: 0.0, edges: Vec::new() });
        }

        let mut edges = Vec::new();
        let mut current = to;
        while current != from {
            let edge_id = self.predecessor_edge[from][current]?;
            edges.push(edge_id);
            current = graph.get_edge(edge_id).from;
        }
        edges.reverse();
        Some(RouteAnswer { total_weight, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn line_graph() -> DirectedWeightedGraph<f64> {
        let mut g = DirectedWeightedGraph::new(4);
        g.add_edge(Edge { from: 0, to: 1, weight: 1.0 });
        g.add_edge(Edge { from: 1, to: 2, weight: 1.0 });
        g.add_edge(Edge { from: 2, to: 3, weight: 1.0 });
        g
    }

    #[test]
    fn identity_route_is_zero_and_empty() {
        let g = line_graph();
        let oracle = ShortestPathOracle::build(&g);
        let answer = oracle.build_route(&g, 0, 0).unwrap();
        assert_eq!(answer.total_weight, 0.0);
        assert!(answer.edges.is_empty());
    }

    #[test]
    fn unreachable_vertex_is_none() {
        let mut g = DirectedWeightedGraph::new(2);
        g.add_edge(Edge { from: 1, to: 0, weight: 1.0 });
        let oracle = ShortestPathOracle::build(&g);
        assert!(oracle.build_route(&g, 0, 1).is_none());
    }

    #[test]
    fn shortest_path_picks_minimum_weight() {
        let mut g = DirectedWeightedGraph::new(3);
        g.add_edge(Edge { from: 0, to: 2, weight: 10.0 });
        g.add_edge(Edge { from: 0, to: 1, weight: 1.0 });
        g.add_edge(Edge { from: 1, to: 2, weight: 1.0 });
        let oracle = ShortestPathOracle::build(&g);
        let answer = oracle.build_route(&g, 0, 2).unwrap();
        assert_eq!(answer.total_weight, 2.0);
        assert_eq!(answer.edges.len(), 2);
    }

    #[test]
    fn equal_weight_ties_favor_first_relaxed_edge() {
        // Two equal-cost ways to reach vertex 2 from 0: edge chain
        // 0->1->2 and 0->3->2 have equal total weight. Edge ids are
        // assigned in insertion order, so the first one relaxed (lowest
        // edge id path) wins the tie.
        let mut g = DirectedWeightedGraph::new(4);
        g.add_edge(Edge { from: 0, to: 1, weight: 1.0 }); // id 0
        g.add_edge(Edge { from: 1, to: 2, weight: 1.0 }); // id 1
        g.add_edge(Edge { from: 0, to: 3, weight: 1.0 }); // id 2
        g.add_edge(Edge { from: 3, to: 2, weight: 1.0 }); // id 3
        let oracle = ShortestPathOracle::build(&g);
        let answer = oracle.build_route(&g, 0, 2).unwrap();
        assert_eq!(answer.total_weight, 2.0);
        assert_eq!(answer.edges, vec![0, 1]);
    }
}
