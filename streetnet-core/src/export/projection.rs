use geo::Point;
use hashbrown::HashMap;
use log::trace;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use crate::{Cost, Error, StreetGraph, algo::nearest::DistanceMetric};

/// Joins node costs onto arbitrary points.
///
/// Each point takes the cost of its nearest node. Points farther than
/// `max_snap_distance` from the network, or whose node was not reached,
/// get `None`.
///
/// # Errors
///
/// Returns [`Error::NoPointsFound`] if the graph has no nodes
pub fn project_costs(
    graph: &StreetGraph,
    points: &[Point<f64>],
    costs: &HashMap<NodeIndex, Cost>,
    metric: DistanceMetric,
    max_snap_distance: Option<f64>,
) -> Result<Vec<Option<Cost>>, Error> {
    if graph.is_empty() {
        return Err(Error::NoPointsFound);
    }

    Ok(points
        .par_iter()
        .map(|point| {
            let (node, distance) = graph.nearest_node(point, metric)?;
            if max_snap_distance.is_some_and(|max| distance > max) {
                trace!("Point {point:?} is {distance:.1} from the network - left without cost");
                return None;
            }
            costs.get(&node).copied()
        })
        .collect())
}
