use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use geo::{Coord, LineString};
use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use super::state::{State, traversable};
use crate::{Cost, Impedance, model::StreetGraph};

/// Minimum-cost path between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Visited nodes, from source to target inclusive
    pub nodes: Vec<NodeIndex>,
    /// Total cost under the impedance used for the search
    pub cost: Cost,
}

impl Route {
    pub fn source(&self) -> Option<NodeIndex> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<NodeIndex> {
        self.nodes.last().copied()
    }

    /// Route geometry following edge shapes where they are known
    pub fn geometry(&self, graph: &StreetGraph, impedance: Impedance) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = Vec::with_capacity(self.nodes.len());
        if let Some(first) = self.source().and_then(|idx| graph.node_point(idx)) {
            coords.push(first.into());
        }

        for pair in self.nodes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            // The cheapest of possibly parallel edges is the one the search used
            let shape = graph
                .neighbours(from)
                .filter(|(next, _)| *next == to)
                .filter_map(|(_, edge)| edge.cost(impedance).map(|cost| (cost, edge)))
                .filter(|(cost, _)| traversable(*cost))
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, edge)| oriented_shape(graph, from, edge));

            match shape {
                Some(shape) if shape.len() > 1 => coords.extend(shape.into_iter().skip(1)),
                _ => coords.extend(graph.node_point(to).map(Coord::from)),
            }
        }

        LineString::new(coords)
    }
}

/// Edge coordinates ordered starting at `from`
fn oriented_shape(
    graph: &StreetGraph,
    from: NodeIndex,
    edge: &crate::StreetEdge,
) -> Vec<Coord<f64>> {
    let mut coords = edge.geometry.0.clone();
    if let (Some(start), Some(first), Some(last)) =
        (graph.node_point(from), coords.first(), coords.last())
    {
        let start: Coord<f64> = start.into();
        let to_first = (first.x - start.x).hypot(first.y - start.y);
        let to_last = (last.x - start.x).hypot(last.y - start.y);
        if to_last < to_first {
            coords.reverse();
        }
    }
    coords
}

/// Dijkstra's algorithm with predecessor tracking.
/// Returns the minimum-cost path from `start` to `target`, if any.
pub fn dijkstra_route(
    graph: &StreetGraph,
    start: NodeIndex,
    target: NodeIndex,
    impedance: Impedance,
) -> Option<Route> {
    // Estimate capacity based on graph size (adjust as needed)
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, Cost> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut settled = FixedBitSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    let mut reached = false;
    while let Some(State { cost, node }) = heap.pop() {
        if settled.put(node.index()) {
            continue;
        }

        if node == target {
            reached = true;
            break;
        }

        for (next, edge) in graph.neighbours(node) {
            if settled.contains(next.index()) {
                continue;
            }
            let Some(edge_cost) = edge.cost(impedance).filter(|c| traversable(*c)) else {
                continue;
            };
            let next_cost = cost + edge_cost;

            let improved = distances.get(&next).is_none_or(|&best| next_cost < best);
            if improved {
                distances.insert(next, next_cost);
                predecessors.insert(next, node);
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    if !reached {
        return None;
    }

    // Follow predecessors backward from target to start
    let mut nodes = vec![target];
    let mut current = target;
    while current != start {
        current = *predecessors.get(&current)?;
        nodes.push(current);
    }
    nodes.reverse(); // Now path is from start to target

    Some(Route {
        nodes,
        cost: distances[&target],
    })
}
