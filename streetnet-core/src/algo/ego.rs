use petgraph::graph::NodeIndex;

use crate::{Cost, Error, Impedance, StreetGraph, routing::single_source_costs};

/// Sub-graph of everything reachable from `source` within `radius`.
///
/// Contains exactly the nodes whose minimum cost from `source` does not
/// exceed `radius`, and every edge among them. Node indices are renumbered.
///
/// # Errors
///
/// Returns an error for an unknown source node or a negative or NaN radius
pub fn ego_graph(
    graph: &StreetGraph,
    source: NodeIndex,
    radius: Cost,
    impedance: Impedance,
) -> Result<StreetGraph, Error> {
    let costs = single_source_costs(graph, source, impedance, Some(radius))?;
    log::debug!(
        "Ego graph around {source:?} within {radius}: {} of {} nodes",
        costs.len(),
        graph.node_count()
    );
    Ok(graph.induced_subgraph(|idx| costs.contains_key(&idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Directedness;
    use crate::algo::travel_time::annotate_travel_times;
    use crate::model::TravelMode;
    use crate::test_support::grid_graph;
    use hashbrown::HashMap;

    #[test]
    fn contains_only_nodes_within_radius() {
        let mut graph = grid_graph(Directedness::Directed, 5, 5, 100.0, 24.9, 60.2);
        let walk = annotate_travel_times(&mut graph, &TravelMode::walk());
        let source = NodeIndex::new(12);

        let all = single_source_costs(&graph, source, walk, None).unwrap();
        let cost_by_osm: HashMap<_, _> = all
            .iter()
            .map(|(idx, cost)| (graph.graph[*idx].id, *cost))
            .collect();

        // 160 s covers two 80 s blocks in any direction
        let ego = ego_graph(&graph, source, 160.0, walk).unwrap();
        assert_eq!(ego.node_count(), 13);
        for node in ego.graph.node_weights() {
            assert!(cost_by_osm[&node.id] <= 160.0);
        }
        assert!(ego.graph.node_weights().any(|node| node.id == 13));
        assert_eq!(ego.cost_attributes(), graph.cost_attributes());
    }

    #[test]
    fn zero_radius_keeps_the_source() {
        let graph = grid_graph(Directedness::Undirected, 3, 3, 100.0, 0.0, 0.0);
        let ego = ego_graph(&graph, NodeIndex::new(4), 0.0, Impedance::Length).unwrap();
        assert_eq!(ego.node_count(), 1);
        assert_eq!(ego.edge_count(), 0);
        assert_eq!(ego.graph[NodeIndex::new(0)].id, 5);
    }

    #[test]
    fn edges_are_induced() {
        let graph = grid_graph(Directedness::Undirected, 1, 4, 100.0, 0.0, 0.0);
        let ego = ego_graph(&graph, NodeIndex::new(0), 250.0, Impedance::Length).unwrap();
        assert_eq!(ego.node_count(), 3);
        assert_eq!(ego.edge_count(), 2);
        assert!(!ego.is_directed());
    }

    #[test]
    fn rejects_invalid_radius_and_source() {
        let graph = grid_graph(Directedness::Directed, 2, 2, 100.0, 0.0, 0.0);
        assert!(ego_graph(&graph, NodeIndex::new(0), -1.0, Impedance::Length).is_err());
        assert!(ego_graph(&graph, NodeIndex::new(0), f64::NAN, Impedance::Length).is_err());
        assert!(matches!(
            ego_graph(&graph, NodeIndex::new(9), 10.0, Impedance::Length),
            Err(Error::InvalidNodeIndex)
        ));
    }
}
