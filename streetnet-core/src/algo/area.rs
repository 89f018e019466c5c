//! Polygons covering the nodes reached by a search.
//!
//! A convex hull is cheap but overstates coverage around concave networks.
//! Dissolving the H3 cells of reached nodes follows the network shape at the
//! chosen cell resolution.

use geo::{ConvexHull, MultiPoint, MultiPolygon, Point};
use h3o::{CellIndex, LatLng, Resolution, geom::SolventBuilder};
use hashbrown::HashMap;
use itertools::Itertools;
use petgraph::graph::NodeIndex;

use crate::{Cost, Error, StreetGraph};

/// H3 resolution used when none is requested, cells of roughly 66 m edge
pub const DEFAULT_HEX_RESOLUTION: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaMethod {
    ConvexHull,
    HexCells { resolution: u8 },
}

impl Default for AreaMethod {
    fn default() -> Self {
        AreaMethod::HexCells {
            resolution: DEFAULT_HEX_RESOLUTION,
        }
    }
}

/// Area covered by the nodes present in `costs`
///
/// # Errors
///
/// Returns an error if no node was reached or the H3 resolution is invalid
pub fn reachable_area(
    graph: &StreetGraph,
    costs: &HashMap<NodeIndex, Cost>,
    method: AreaMethod,
) -> Result<MultiPolygon, Error> {
    let points: Vec<Point<f64>> = costs
        .keys()
        .filter_map(|&idx| graph.node_point(idx))
        .collect();

    if points.is_empty() {
        return Err(Error::IsochroneError(
            "No reached nodes to build an area from".to_string(),
        ));
    }

    match method {
        AreaMethod::ConvexHull => {
            let hull = MultiPoint::from(points).convex_hull();
            Ok(MultiPolygon::new(vec![hull]))
        }
        AreaMethod::HexCells { resolution } => hex_coverage(&points, resolution),
    }
}

fn hex_coverage(points: &[Point<f64>], resolution: u8) -> Result<MultiPolygon, Error> {
    let resolution = Resolution::try_from(resolution)
        .map_err(|e| Error::InvalidData(format!("Got invalid H3 resolution {e}")))?;

    let cells = points
        .iter()
        .map(|point| Ok(LatLng::new(point.y(), point.x())?.to_cell(resolution)))
        .collect::<Result<Vec<CellIndex>, Error>>()?;

    let solvent = SolventBuilder::new().build();
    solvent
        .dissolve(cells.into_iter().unique())
        .map_err(|e| Error::IsochroneError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Directedness;
    use crate::routing::single_source_costs;
    use crate::test_support::grid_graph;
    use geo::{Area, Intersects};

    fn reached() -> (StreetGraph, HashMap<NodeIndex, Cost>) {
        let graph = grid_graph(Directedness::Directed, 4, 4, 150.0, 24.9, 60.2);
        let costs =
            single_source_costs(&graph, NodeIndex::new(0), crate::Impedance::Length, Some(150.0))
                .unwrap();
        (graph, costs)
    }

    #[test]
    fn convex_hull_covers_reached_nodes() {
        let (graph, costs) = reached();
        let area = reachable_area(&graph, &costs, AreaMethod::ConvexHull).unwrap();
        assert!(area.unsigned_area() > 0.0);
        for idx in costs.keys() {
            assert!(area.intersects(&graph.node_point(*idx).unwrap()));
        }
    }

    #[test]
    fn hex_cells_produce_polygons() {
        let (graph, costs) = reached();
        let area = reachable_area(&graph, &costs, AreaMethod::HexCells { resolution: 9 }).unwrap();
        assert!(!area.0.is_empty());
    }

    #[test]
    fn rejects_bad_resolution_and_empty_input() {
        let (graph, costs) = reached();
        assert!(matches!(
            reachable_area(&graph, &costs, AreaMethod::HexCells { resolution: 42 }),
            Err(Error::InvalidData(_))
        ));
        assert!(reachable_area(&graph, &HashMap::new(), AreaMethod::ConvexHull).is_err());
    }
}
