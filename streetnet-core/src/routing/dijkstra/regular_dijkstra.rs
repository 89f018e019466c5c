use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use super::state::{State, traversable};
use crate::{Cost, Impedance, model::StreetGraph};

/// Dijkstra's algorithm over the street network.
///
/// Returns a map of settled node indices to their minimum cost from `start`.
/// The search stops once `target` is settled, and never expands past
/// `max_cost`, so every returned cost is final and within the bound.
/// Edges with a negative, missing or non-finite cost are not traversed.
pub fn dijkstra_path_weights(
    graph: &StreetGraph,
    start: NodeIndex,
    impedance: Impedance,
    target: Option<NodeIndex>,
    max_cost: Option<Cost>,
) -> HashMap<NodeIndex, Cost> {
    let mut distances: HashMap<NodeIndex, Cost> = HashMap::new();
    let mut settled = FixedBitSet::with_capacity(graph.node_count());
    let mut heap = BinaryHeap::new();

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        // Stale heap entry, a cheaper one was already settled
        if settled.put(node.index()) {
            continue;
        }

        // Check if we've reached the target
        if target == Some(node) {
            break;
        }

        // Examine neighbors
        for (next, edge) in graph.neighbours(node) {
            if settled.contains(next.index()) {
                continue;
            }
            let Some(edge_cost) = edge.cost(impedance).filter(|c| traversable(*c)) else {
                continue;
            };
            let next_cost = cost + edge_cost;

            // Check max cost constraint
            if max_cost.is_some_and(|max| next_cost > max) {
                continue;
            }

            // Add or update distance if better using Entry API
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    // Drop tentative costs left behind by an early stop
    distances.retain(|node, _| settled.contains(node.index()));
    distances
}
