use std::path::Path;

use geo::{LineString, Point};
use hashbrown::HashMap;
use log::{info, trace, warn};
use osm4routing::{BikeAccessibility, CarAccessibility, EdgeProperties, FootAccessibility};
use petgraph::graph::NodeIndex;

use crate::{
    Directedness, Error, OsmId, StreetEdge, StreetGraph, StreetNode,
    algo::nearest::{haversine_distance, haversine_length},
    loading::NetworkType,
};

/// Directions in which a street may be travelled, relative to its geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreetAccess {
    pub forward: bool,
    pub backward: bool,
}

impl StreetAccess {
    pub fn is_accessible(self) -> bool {
        self.forward || self.backward
    }

    fn for_network(network_type: NetworkType, properties: &EdgeProperties) -> Self {
        let foot = matches!(properties.foot, FootAccessibility::Allowed);
        let bike = |access: &BikeAccessibility| {
            !matches!(
                access,
                BikeAccessibility::Unknown | BikeAccessibility::Forbidden
            )
        };
        let car = |access: &CarAccessibility| {
            !matches!(
                access,
                CarAccessibility::Unknown | CarAccessibility::Forbidden
            )
        };

        let (bike_forward, bike_backward) = (
            bike(&properties.bike_forward),
            bike(&properties.bike_backward),
        );
        let (car_forward, car_backward) =
            (car(&properties.car_forward), car(&properties.car_backward));

        match network_type {
            NetworkType::Walk => Self {
                forward: foot,
                backward: foot,
            },
            NetworkType::Bike => Self {
                forward: bike_forward,
                backward: bike_backward,
            },
            NetworkType::Drive => Self {
                forward: car_forward,
                backward: car_backward,
            },
            NetworkType::All => Self {
                forward: foot || bike_forward || car_forward,
                backward: foot || bike_backward || car_backward,
            },
        }
    }
}

/// Inserts a street respecting its allowed directions.
///
/// Undirected graphs cannot express one-way streets, any accessible
/// street becomes a single edge there.
pub(crate) fn add_oriented_street(
    graph: &mut StreetGraph,
    source: NodeIndex,
    target: NodeIndex,
    edge: StreetEdge,
    access: StreetAccess,
) -> Result<(), Error> {
    match (access.forward, access.backward) {
        (true, true) => graph.add_street(source, target, edge, true),
        (true, false) => graph.add_street(source, target, edge, false),
        (false, true) => graph.add_street(target, source, edge.reversed(), false),
        (false, false) => Ok(()),
    }
}

/// Reads an OSM PBF extract into a street graph
pub(crate) fn create_street_graph(
    path: &Path,
    network_type: NetworkType,
    directedness: Directedness,
) -> Result<StreetGraph, Error> {
    let filename = path
        .to_str()
        .ok_or_else(|| Error::InvalidData(format!("Invalid OSM path: {}", path.display())))?;

    let (nodes, edges) = osm4routing::read(filename)
        .map_err(|e| Error::OsmError(format!("Error reading OSM data: {e:?}")))?;

    info!(
        "Read {} nodes and {} street segments from OSM",
        nodes.len(),
        edges.len()
    );

    let coordinates: HashMap<OsmId, Point<f64>> = nodes
        .iter()
        .map(|node| (node.id.0, Point::new(node.coord.lon, node.coord.lat)))
        .collect();

    let mut graph = StreetGraph::new(directedness);
    let mut node_indices: HashMap<OsmId, NodeIndex> = HashMap::with_capacity(nodes.len());
    let mut dangling = 0usize;

    for edge in &edges {
        let access = StreetAccess::for_network(network_type, &edge.properties);
        if !access.is_accessible() {
            continue;
        }

        let (Some(source), Some(target)) = (
            intern_node(&mut graph, &mut node_indices, &coordinates, edge.source.0),
            intern_node(&mut graph, &mut node_indices, &coordinates, edge.target.0),
        ) else {
            trace!("Street {:?} references a missing node - skipped", edge.id);
            dangling += 1;
            continue;
        };

        let geometry: LineString<f64> = edge
            .geometry
            .iter()
            .map(|coord| (coord.lon, coord.lat))
            .collect::<Vec<_>>()
            .into();

        let length = if geometry.0.len() > 1 {
            haversine_length(&geometry)
        } else {
            haversine_distance(graph.graph[source].geometry, graph.graph[target].geometry)
        };

        add_oriented_street(
            &mut graph,
            source,
            target,
            StreetEdge::new(length, geometry),
            access,
        )?;
    }

    if dangling > 0 {
        warn!("{dangling} street segments referenced nodes missing from the extract");
    }

    info!(
        "Built {:?} {:?} street graph with {} nodes and {} edges",
        network_type,
        directedness,
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Graph node for an OSM node id, created on first use
fn intern_node(
    graph: &mut StreetGraph,
    node_indices: &mut HashMap<OsmId, NodeIndex>,
    coordinates: &HashMap<OsmId, Point<f64>>,
    id: OsmId,
) -> Option<NodeIndex> {
    if let Some(&idx) = node_indices.get(&id) {
        return Some(idx);
    }
    let point = coordinates.get(&id)?;
    let idx = graph.add_node(StreetNode::new(id, point.x(), point.y()));
    node_indices.insert(id, idx);
    Some(idx)
}
