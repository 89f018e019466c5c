//! Shortest path queries over the street graph
//!
//! Every query validates its node indices up front and then runs a
//! binary-heap Dijkstra search weighted by the requested [`Impedance`].

pub mod dijkstra;

use hashbrown::HashMap;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use crate::{Cost, Error, Impedance, StreetGraph};
use dijkstra::{dijkstra_path_weights, dijkstra_route};

pub use dijkstra::Route;

/// Minimum-cost path from `source` to `target`, `None` if unreachable
///
/// # Errors
///
/// Returns an error if either node is not part of the graph
pub fn shortest_path(
    graph: &StreetGraph,
    source: NodeIndex,
    target: NodeIndex,
    impedance: Impedance,
) -> Result<Option<Route>, Error> {
    graph.validate_node(source)?;
    graph.validate_node(target)?;
    Ok(dijkstra_route(graph, source, target, impedance))
}

/// Minimum total cost from `source` to `target`, `None` if unreachable
///
/// # Errors
///
/// Returns an error if either node is not part of the graph
pub fn shortest_path_cost(
    graph: &StreetGraph,
    source: NodeIndex,
    target: NodeIndex,
    impedance: Impedance,
) -> Result<Option<Cost>, Error> {
    graph.validate_node(source)?;
    graph.validate_node(target)?;
    let costs = dijkstra_path_weights(graph, source, impedance, Some(target), None);
    Ok(costs.get(&target).copied())
}

/// Minimum cost from `source` to every reachable node.
///
/// The source maps to zero, unreachable nodes are absent. With a `cutoff`
/// only nodes whose cost does not exceed it are returned.
///
/// # Errors
///
/// Returns an error for an unknown source or a negative or NaN cutoff
pub fn single_source_costs(
    graph: &StreetGraph,
    source: NodeIndex,
    impedance: Impedance,
    cutoff: Option<Cost>,
) -> Result<HashMap<NodeIndex, Cost>, Error> {
    graph.validate_node(source)?;
    if let Some(cutoff) = cutoff
        && (cutoff.is_nan() || cutoff < 0.0)
    {
        return Err(Error::InvalidData(format!(
            "Cost cutoff must be non-negative, got {cutoff}"
        )));
    }
    Ok(dijkstra_path_weights(graph, source, impedance, None, cutoff))
}

/// Minimum cost from `source` to each of `targets`, in order
///
/// # Errors
///
/// Returns an error if any node is not part of the graph
pub fn one_to_many(
    graph: &StreetGraph,
    source: NodeIndex,
    targets: &[NodeIndex],
    impedance: Impedance,
) -> Result<Vec<Option<Cost>>, Error> {
    for &target in targets {
        graph.validate_node(target)?;
    }
    let costs = single_source_costs(graph, source, impedance, None)?;
    Ok(targets
        .iter()
        .map(|target| costs.get(target).copied())
        .collect())
}

/// Costs between every ordered pair of `nodes`, row = origin, column = destination
///
/// # Errors
///
/// Returns an error if any node is not part of the graph
pub fn cost_matrix(
    graph: &StreetGraph,
    nodes: &[NodeIndex],
    impedance: Impedance,
) -> Result<Vec<Vec<Option<Cost>>>, Error> {
    for &node in nodes {
        graph.validate_node(node)?;
    }

    nodes
        .par_iter()
        .map(|&origin| one_to_many(graph, origin, nodes, impedance))
        .collect()
}
