use std::io::Write;

use hashbrown::HashMap;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::{Cost, Error, OsmId, StreetGraph};

#[derive(Debug, Serialize)]
struct NodeCostRecord {
    node: usize,
    osm_id: OsmId,
    lon: f64,
    lat: f64,
    cost: Cost,
}

/// Writes one CSV row per reached node, cheapest first
///
/// # Errors
///
/// Returns an error if a node is not part of the graph or writing fails
pub fn write_node_costs_csv<W: Write>(
    graph: &StreetGraph,
    costs: &HashMap<NodeIndex, Cost>,
    writer: W,
) -> Result<(), Error> {
    let mut reached: Vec<(NodeIndex, Cost)> = costs.iter().map(|(n, c)| (*n, *c)).collect();
    reached.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let mut csv_writer = csv::Writer::from_writer(writer);
    for (idx, cost) in reached {
        let node = graph.node(idx).ok_or(Error::InvalidNodeIndex)?;
        csv_writer.serialize(NodeCostRecord {
            node: idx.index(),
            osm_id: node.id,
            lon: node.geometry.x(),
            lat: node.geometry.y(),
            cost,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Directedness;
    use crate::Impedance;
    use crate::routing::single_source_costs;
    use crate::test_support::line_graph;

    #[test]
    fn writes_header_and_sorted_rows() {
        let graph = line_graph(Directedness::Directed, 3, 100.0);
        let costs =
            single_source_costs(&graph, NodeIndex::new(0), Impedance::Length, None).unwrap();

        let mut buffer = Vec::new();
        write_node_costs_csv(&graph, &costs, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "node,osm_id,lon,lat,cost");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("0,1,0.0,0.0,0.0"));
        assert!(lines[3].ends_with(",200.0"));
    }

    #[test]
    fn rejects_foreign_nodes() {
        let graph = line_graph(Directedness::Directed, 2, 100.0);
        let costs: HashMap<_, _> = [(NodeIndex::new(40), 1.0)].into_iter().collect();
        assert!(write_node_costs_csv(&graph, &costs, Vec::new()).is_err());
    }
}
