//! Synthetic networks shared by unit tests

use geo::LineString;
use petgraph::graph::NodeIndex;

use crate::{Directedness, StreetEdge, StreetGraph, StreetNode};

/// Meters per degree of longitude on the equator
pub(crate) const METERS_PER_DEGREE: f64 = 111_195.08;

pub(crate) fn edge(length: f64) -> StreetEdge {
    StreetEdge::new(length, LineString::new(Vec::new()))
}

fn connect(graph: &mut StreetGraph, a: NodeIndex, b: NodeIndex, length: f64) {
    let (pa, pb) = (graph.graph[a].geometry, graph.graph[b].geometry);
    let geometry = LineString::from(vec![(pa.x(), pa.y()), (pb.x(), pb.y())]);
    graph
        .add_street(a, b, StreetEdge::new(length, geometry), true)
        .unwrap();
}

/// `count` nodes on the equator, `spacing` meters apart, joined by two-way streets
pub(crate) fn line_graph(directedness: Directedness, count: usize, spacing: f64) -> StreetGraph {
    let mut graph = StreetGraph::new(directedness);
    let step = spacing / METERS_PER_DEGREE;
    let nodes: Vec<_> = (0..count)
        .map(|i| graph.add_node(StreetNode::new(i as i64 + 1, i as f64 * step, 0.0)))
        .collect();
    for pair in nodes.windows(2) {
        connect(&mut graph, pair[0], pair[1], spacing);
    }
    graph
}

/// `rows` x `cols` lattice of two-way streets, `spacing` meters apart,
/// anchored at (`lon`, `lat`). Node `r * cols + c` sits at row `r`, column `c`.
pub(crate) fn grid_graph(
    directedness: Directedness,
    rows: usize,
    cols: usize,
    spacing: f64,
    lon: f64,
    lat: f64,
) -> StreetGraph {
    let mut graph = StreetGraph::new(directedness);
    let lat_step = spacing / METERS_PER_DEGREE;
    let lon_step = lat_step / lat.to_radians().cos();

    for r in 0..rows {
        for c in 0..cols {
            let id = (r * cols + c) as i64 + 1;
            graph.add_node(StreetNode::new(
                id,
                lon + c as f64 * lon_step,
                lat + r as f64 * lat_step,
            ));
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            let here = NodeIndex::new(r * cols + c);
            if c + 1 < cols {
                connect(&mut graph, here, NodeIndex::new(r * cols + c + 1), spacing);
            }
            if r + 1 < rows {
                connect(&mut graph, here, NodeIndex::new((r + 1) * cols + c), spacing);
            }
        }
    }
    graph
}
