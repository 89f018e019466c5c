//! Snapping of arbitrary coordinates to street graph nodes

use std::f64::consts::FRAC_PI_2;

use geo::{LineString, Point};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use rstar::{AABB, PointDistance};
use serde::{Deserialize, Serialize};

use crate::StreetGraph;

/// Mean Earth radius in meters
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Widening of the haversine search box, in degrees
const ENVELOPE_MARGIN: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Great-circle distance in meters
    #[default]
    Haversine,
    /// Planar distance in coordinate units
    Euclidean,
}

impl DistanceMetric {
    pub fn distance(self, a: Point<f64>, b: Point<f64>) -> f64 {
        match self {
            DistanceMetric::Haversine => haversine_distance(a, b),
            DistanceMetric::Euclidean => (a.x() - b.x()).hypot(a.y() - b.y()),
        }
    }
}

/// Great-circle distance in meters between two lon/lat points
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let (lat_a, lat_b) = (a.y().to_radians(), b.y().to_radians());
    let d_lat = lat_b - lat_a;
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * h.sqrt().min(1.0).asin()
}

/// Length in meters of a lon/lat line string
pub fn haversine_length(line: &LineString<f64>) -> f64 {
    line.lines()
        .map(|segment| haversine_distance(segment.start.into(), segment.end.into()))
        .sum()
}

/// Box holding every point within `radius` meters of `center`.
///
/// `None` when such a box would cross a pole or the antimeridian.
fn haversine_envelope(center: Point<f64>, radius: f64) -> Option<AABB<[f64; 2]>> {
    let angular = radius / EARTH_RADIUS;
    let lat = center.y().to_radians();
    if lat.abs() + angular >= FRAC_PI_2 {
        return None;
    }

    let d_lat = angular.to_degrees() + ENVELOPE_MARGIN;
    let d_lon = (angular.sin() / lat.cos()).asin().to_degrees() + ENVELOPE_MARGIN;
    if center.x() - d_lon < -180.0 || center.x() + d_lon > 180.0 {
        return None;
    }

    Some(AABB::from_corners(
        [center.x() - d_lon, center.y() - d_lat],
        [center.x() + d_lon, center.y() + d_lat],
    ))
}

impl StreetGraph {
    /// Find the node closest to `point` and its distance.
    ///
    /// Equally distant nodes resolve to the lowest node index. Returns `None`
    /// for an empty graph.
    pub fn nearest_node(
        &self,
        point: &Point<f64>,
        metric: DistanceMetric,
    ) -> Option<(NodeIndex, f64)> {
        let query = [point.x(), point.y()];
        let candidate = self.rtree_ref().nearest_neighbor(&query)?;

        match metric {
            DistanceMetric::Euclidean => self.closest_of(
                point,
                metric,
                self.rtree_ref()
                    .locate_within_distance(query, candidate.distance_2(&query))
                    .map(|indexed| indexed.data),
            ),
            DistanceMetric::Haversine => {
                // Planar nearest is only an upper bound on the great-circle one
                let bound = haversine_distance(*point, self.graph[candidate.data].geometry);
                match haversine_envelope(*point, bound) {
                    Some(envelope) => self.closest_of(
                        point,
                        metric,
                        self.rtree_ref()
                            .locate_in_envelope(&envelope)
                            .map(|indexed| indexed.data),
                    ),
                    None => self.closest_of(point, metric, self.graph.node_indices()),
                }
            }
        }
    }

    /// Snap many points at once, see [`StreetGraph::nearest_node`]
    pub fn nearest_nodes(
        &self,
        points: &[Point<f64>],
        metric: DistanceMetric,
    ) -> Vec<Option<(NodeIndex, f64)>> {
        points
            .par_iter()
            .map(|point| self.nearest_node(point, metric))
            .collect()
    }

    fn closest_of(
        &self,
        point: &Point<f64>,
        metric: DistanceMetric,
        nodes: impl Iterator<Item = NodeIndex>,
    ) -> Option<(NodeIndex, f64)> {
        nodes
            .map(|idx| (idx, metric.distance(*point, self.graph[idx].geometry)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::grid_graph;
    use crate::{Directedness, StreetNode};

    fn brute_force(graph: &StreetGraph, point: Point<f64>, metric: DistanceMetric) -> f64 {
        graph
            .graph
            .node_weights()
            .map(|node| metric.distance(point, node.geometry))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn haversine_of_one_equatorial_degree() {
        let d = haversine_distance(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!((d - 111_195.08).abs() < 0.01, "{d}");
        assert_eq!(haversine_distance(Point::new(24.9, 60.2), Point::new(24.9, 60.2)), 0.0);
    }

    #[test]
    fn nearest_distance_is_minimal_at_high_latitude() {
        // At 60°N planar nearest in degrees differs from the great-circle nearest
        let graph = grid_graph(Directedness::Directed, 6, 6, 120.0, 24.93, 60.16);
        let queries = [
            Point::new(24.9312, 60.1612),
            Point::new(24.9401, 60.1655),
            Point::new(24.9250, 60.1580),
            Point::new(24.9600, 60.1700),
            Point::new(24.93, 60.16),
        ];

        for query in queries {
            for metric in [DistanceMetric::Haversine, DistanceMetric::Euclidean] {
                let (node, distance) = graph.nearest_node(&query, metric).unwrap();
                let expected = brute_force(&graph, query, metric);
                assert!((distance - expected).abs() < 1e-9, "{metric:?} {query:?}");
                assert!(
                    (metric.distance(query, graph.graph[node].geometry) - distance).abs() < 1e-9
                );
            }
        }
    }

    #[test]
    fn haversine_prefers_true_nearest_over_planar_nearest() {
        let mut graph = StreetGraph::new(Directedness::Directed);
        // 0.0010° north is ~111 m, 0.0015° east at 60°N is ~83 m
        let north = graph.add_node(StreetNode::new(1, 10.0, 60.001));
        let east = graph.add_node(StreetNode::new(2, 10.0015, 60.0));
        let query = Point::new(10.0, 60.0);

        let (planar, _) = graph.nearest_node(&query, DistanceMetric::Euclidean).unwrap();
        let (spherical, meters) = graph.nearest_node(&query, DistanceMetric::Haversine).unwrap();
        assert_eq!(planar, north);
        assert_eq!(spherical, east);
        assert!(meters < 90.0);
    }

    #[test]
    fn equidistant_nodes_resolve_to_lowest_index() {
        for (first_x, second_x) in [(1.0, -1.0), (-1.0, 1.0)] {
            let mut graph = StreetGraph::new(Directedness::Directed);
            let first = graph.add_node(StreetNode::new(1, first_x, 0.0));
            graph.add_node(StreetNode::new(2, second_x, 0.0));

            for metric in [DistanceMetric::Euclidean, DistanceMetric::Haversine] {
                let (node, _) = graph.nearest_node(&Point::new(0.0, 0.0), metric).unwrap();
                assert_eq!(node, first, "{metric:?}");
            }
        }
    }

    #[test]
    fn falls_back_to_scan_near_the_pole() {
        let mut graph = StreetGraph::new(Directedness::Directed);
        graph.add_node(StreetNode::new(1, 0.0, 89.9));
        let far_side = graph.add_node(StreetNode::new(2, 180.0, 89.95));

        let (node, _) = graph
            .nearest_node(&Point::new(180.0, 89.99), DistanceMetric::Haversine)
            .unwrap();
        assert_eq!(node, far_side);
    }

    #[test]
    fn empty_graph_has_no_nearest_node() {
        let graph = StreetGraph::new(Directedness::Undirected);
        assert!(
            graph
                .nearest_node(&Point::new(0.0, 0.0), DistanceMetric::Haversine)
                .is_none()
        );
    }

    #[test]
    fn batch_snapping_matches_single_lookups() {
        let graph = grid_graph(Directedness::Undirected, 3, 3, 100.0, 0.0, 0.0);
        let points = vec![Point::new(0.0001, 0.0001), Point::new(0.002, 0.002)];
        let batch = graph.nearest_nodes(&points, DistanceMetric::Haversine);
        for (point, snapped) in points.iter().zip(batch) {
            assert_eq!(snapped, graph.nearest_node(point, DistanceMetric::Haversine));
        }
    }
}
