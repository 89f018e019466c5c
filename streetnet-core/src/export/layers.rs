use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use hashbrown::HashMap;
use petgraph::graph::NodeIndex;
use serde_json::{Map, Value as JsonValue, json};

use crate::{Cost, Error, Impedance, StreetGraph, routing::Route};

fn feature(geometry: Geometry, properties: JsonValue) -> Result<Feature, Error> {
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    });
    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

/// Reached nodes as points, each carrying its cost under `property`.
///
/// Features are ordered by cost, then node index.
pub fn node_costs_to_geojson(
    graph: &StreetGraph,
    costs: &HashMap<NodeIndex, Cost>,
    property: &str,
) -> Result<FeatureCollection, Error> {
    let mut reached: Vec<(NodeIndex, Cost)> = costs.iter().map(|(n, c)| (*n, *c)).collect();
    reached.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let features = reached
        .into_iter()
        .map(|(idx, cost)| {
            let node = graph.node(idx).ok_or(Error::InvalidNodeIndex)?;
            let mut properties = Map::new();
            properties.insert("node".to_string(), json!(idx.index()));
            properties.insert("osm_id".to_string(), json!(node.id));
            properties.insert(property.to_string(), json!(cost));

            feature(
                Geometry::new(GeoJsonValue::from(&node.geometry)),
                JsonValue::Object(properties),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(collection(features))
}

/// Every edge as a line string with its length and cost attributes
pub fn edges_to_geojson(graph: &StreetGraph) -> Result<FeatureCollection, Error> {
    let attributes = graph.cost_attributes();

    let features = graph
        .edges()
        .map(|(source, target, edge)| {
            let geometry = if edge.geometry.0.len() > 1 {
                edge.geometry.clone()
            } else {
                straight_line(graph, source, target)?
            };

            let mut properties = Map::new();
            properties.insert("u".to_string(), json!(graph.graph[source].id));
            properties.insert("v".to_string(), json!(graph.graph[target].id));
            properties.insert("length".to_string(), json!(edge.length));
            for (slot, name) in attributes.iter().enumerate() {
                if let Some(cost) = edge.cost(Impedance::Attribute(slot)) {
                    properties.insert(name.clone(), json!(cost));
                }
            }

            feature(
                Geometry::new(GeoJsonValue::from(&geometry)),
                JsonValue::Object(properties),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(collection(features))
}

/// A route as a single line string feature
pub fn route_to_geojson(
    graph: &StreetGraph,
    route: &Route,
    impedance: Impedance,
) -> Result<Feature, Error> {
    let line = route.geometry(graph, impedance);
    let osm_ids = route
        .nodes
        .iter()
        .map(|&idx| graph.node(idx).map(|node| node.id))
        .collect::<Option<Vec<_>>>()
        .ok_or(Error::InvalidNodeIndex)?;

    feature(
        Geometry::new(GeoJsonValue::from(&line)),
        json!({
            "cost": route.cost,
            "node_count": route.nodes.len(),
            "osm_ids": osm_ids,
        }),
    )
}

fn straight_line(
    graph: &StreetGraph,
    source: NodeIndex,
    target: NodeIndex,
) -> Result<LineString<f64>, Error> {
    let from: Point<f64> = graph.node_point(source).ok_or(Error::InvalidNodeIndex)?;
    let to: Point<f64> = graph.node_point(target).ok_or(Error::InvalidNodeIndex)?;
    Ok(LineString::from(vec![from.0, to.0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{shortest_path, single_source_costs};
    use crate::test_support::{edge, line_graph};
    use crate::{Directedness, StreetNode, TravelMode, algo::travel_time::annotate_travel_times};

    #[test]
    fn node_costs_are_sorted_points() {
        let graph = line_graph(Directedness::Undirected, 4, 100.0);
        let costs =
            single_source_costs(&graph, NodeIndex::new(2), Impedance::Length, None).unwrap();
        let layer = node_costs_to_geojson(&graph, &costs, "distance").unwrap();

        assert_eq!(layer.features.len(), 4);
        let first = &layer.features[0];
        assert_eq!(first.property("distance"), Some(&json!(0.0)));
        assert_eq!(first.property("osm_id"), Some(&json!(3)));
        let last = layer.features.last().unwrap();
        assert_eq!(last.property("distance"), Some(&json!(200.0)));
    }

    #[test]
    fn edges_carry_cost_attributes() {
        let mut graph = line_graph(Directedness::Directed, 2, 100.0);
        annotate_travel_times(&mut graph, &TravelMode::walk());
        // An edge without shape falls back to a straight line
        let extra = graph.add_node(StreetNode::new(50, 0.5, 0.5));
        graph
            .add_street(NodeIndex::new(0), extra, edge(10.0), false)
            .unwrap();

        let layer = edges_to_geojson(&graph).unwrap();
        assert_eq!(layer.features.len(), 3);
        assert_eq!(layer.features[0].property("walk_time"), Some(&json!(80.0)));
        assert_eq!(layer.features[0].property("length"), Some(&json!(100.0)));
        assert!(layer.features[2].property("walk_time").is_none());
        assert!(layer.features.iter().all(|f| f.geometry.is_some()));
    }

    #[test]
    fn route_feature_lists_nodes() {
        let graph = line_graph(Directedness::Undirected, 3, 100.0);
        let route = shortest_path(&graph, NodeIndex::new(0), NodeIndex::new(2), Impedance::Length)
            .unwrap()
            .unwrap();
        let feature = route_to_geojson(&graph, &route, Impedance::Length).unwrap();

        assert_eq!(feature.property("cost"), Some(&json!(200.0)));
        assert_eq!(feature.property("osm_ids"), Some(&json!([1, 2, 3])));
    }
}
