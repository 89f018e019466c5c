//! Street graph with a spatial index over its nodes

use geo::Point;
use hashbrown::HashMap;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};
use serde::{Deserialize, Serialize};

use crate::{Error, model::Impedance};

use super::{StreetEdge, StreetNode};

/// Lengths closer than this (meters) are considered the same street
/// when collapsing reciprocal edges.
const LENGTH_TOLERANCE: f64 = 1e-6;

/// Node coordinate `[lon, lat]` stored in the spatial index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// How edges of a [`StreetGraph`] are traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directedness {
    /// Each edge is traversed from source to target only,
    /// a two-way street is stored as two edges
    #[default]
    Directed,
    /// Each edge is traversed both ways,
    /// a two-way street is stored as one edge
    Undirected,
}

/// Street network graph
#[derive(Debug, Clone)]
pub struct StreetGraph {
    pub graph: DiGraph<StreetNode, StreetEdge>,
    directedness: Directedness,
    cost_attributes: Vec<String>,
    rtree: RTree<IndexedPoint>,
}

impl StreetGraph {
    pub fn new(directedness: Directedness) -> Self {
        Self {
            graph: DiGraph::new(),
            directedness,
            cost_attributes: Vec::new(),
            rtree: RTree::new(),
        }
    }

    fn from_parts(
        graph: DiGraph<StreetNode, StreetEdge>,
        directedness: Directedness,
        cost_attributes: Vec<String>,
    ) -> Self {
        let points = graph
            .node_indices()
            .map(|idx| {
                let geometry = graph[idx].geometry;
                IndexedPoint::new([geometry.x(), geometry.y()], idx)
            })
            .collect();

        Self {
            graph,
            directedness,
            cost_attributes,
            rtree: RTree::bulk_load(points),
        }
    }

    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    pub fn is_directed(&self) -> bool {
        self.directedness == Directedness::Directed
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn add_node(&mut self, node: StreetNode) -> NodeIndex {
        let point = [node.geometry.x(), node.geometry.y()];
        let idx = self.graph.add_node(node);
        self.rtree.insert(IndexedPoint::new(point, idx));
        idx
    }

    /// Adds a single edge from `source` to `target`
    ///
    /// # Errors
    ///
    /// Returns an error if either node is not part of the graph
    pub fn add_edge(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        edge: StreetEdge,
    ) -> Result<EdgeIndex, Error> {
        self.validate_node(source)?;
        self.validate_node(target)?;
        Ok(self.graph.add_edge(source, target, edge))
    }

    /// Adds a street between two nodes.
    ///
    /// A two-way street in a directed graph becomes two edges, one per
    /// direction. In an undirected graph every street is a single edge.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is not part of the graph
    pub fn add_street(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        edge: StreetEdge,
        bidirectional: bool,
    ) -> Result<(), Error> {
        if bidirectional && self.is_directed() {
            let reverse = edge.reversed();
            self.add_edge(source, target, edge)?;
            self.add_edge(target, source, reverse)?;
        } else {
            self.add_edge(source, target, edge)?;
        }
        Ok(())
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&StreetNode> {
        self.graph.node_weight(idx)
    }

    pub fn node_point(&self, idx: NodeIndex) -> Option<Point<f64>> {
        self.graph.node_weight(idx).map(|node| node.geometry)
    }

    /// Check that a node belongs to this graph
    pub fn validate_node(&self, idx: NodeIndex) -> Result<(), Error> {
        if idx.index() < self.graph.node_count() {
            Ok(())
        } else {
            Err(Error::InvalidNodeIndex)
        }
    }

    /// Node for a raw index supplied from outside the crate.
    ///
    /// Indices beyond the `u32` node index space are rejected rather than
    /// truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeIndex`] if no such node exists
    pub fn node_id(&self, index: usize) -> Result<NodeIndex, Error> {
        let index = u32::try_from(index).map_err(|_| Error::InvalidNodeIndex)?;
        let idx = NodeIndex::from(index);
        self.validate_node(idx)?;
        Ok(idx)
    }

    /// Nodes reachable in one step from `node`, together with the edge used.
    ///
    /// Undirected graphs also follow incoming edges backwards.
    pub fn neighbours(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, &StreetEdge)> {
        let undirected = !self.is_directed();

        let outgoing = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (edge.target(), edge.weight()));

        // Self loops were already yielded as outgoing edges
        let incoming = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .filter(move |edge| undirected && edge.source() != edge.target())
            .map(|edge| (edge.source(), edge.weight()));

        outgoing.chain(incoming)
    }

    /// All edges as `(source, target, edge)`
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &StreetEdge)> {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), edge.weight()))
    }

    /// Names of the derived cost attributes carried by the edges
    pub fn cost_attributes(&self) -> &[String] {
        &self.cost_attributes
    }

    /// Resolve an impedance by name, `"length"` is always available
    ///
    /// # Errors
    ///
    /// Returns an error if no cost attribute with that name was annotated
    pub fn impedance(&self, name: &str) -> Result<Impedance, Error> {
        if name == "length" {
            return Ok(Impedance::Length);
        }
        self.cost_attributes
            .iter()
            .position(|attribute| attribute == name)
            .map(Impedance::Attribute)
            .ok_or_else(|| Error::UnknownImpedance(name.to_string()))
    }

    /// Slot of a cost attribute, registering it if needed
    pub(crate) fn attribute_slot(&mut self, name: &str) -> usize {
        if let Some(slot) = self.cost_attributes.iter().position(|a| a == name) {
            slot
        } else {
            self.cost_attributes.push(name.to_string());
            self.cost_attributes.len() - 1
        }
    }

    pub fn rtree_ref(&self) -> &RTree<IndexedPoint> {
        &self.rtree
    }

    /// Copy of the nodes without any edges, indices are preserved
    fn without_edges(&self, directedness: Directedness) -> Self {
        let mut graph = DiGraph::with_capacity(self.graph.node_count(), self.graph.edge_count());
        for node in self.graph.node_weights() {
            graph.add_node(node.clone());
        }
        Self {
            graph,
            directedness,
            cost_attributes: self.cost_attributes.clone(),
            rtree: self.rtree.clone(),
        }
    }

    /// Undirected view of the network.
    ///
    /// Reciprocal edge pairs (`a -> b` and `b -> a` of equal length) collapse
    /// into one edge. One-way streets and parallel edges are kept as they are.
    pub fn to_undirected(&self) -> Self {
        if !self.is_directed() {
            return self.clone();
        }

        let mut result = self.without_edges(Directedness::Undirected);
        // (low, high) -> [(source, length, matched)]
        let mut emitted: HashMap<(NodeIndex, NodeIndex), Vec<(NodeIndex, f64, bool)>> =
            HashMap::new();

        for edge in self.graph.edge_references() {
            let (source, target) = (edge.source(), edge.target());
            let street = edge.weight();

            if source != target {
                let key = (source.min(target), source.max(target));
                let candidates = emitted.entry(key).or_default();

                let reciprocal = candidates.iter_mut().find(|(from, length, matched)| {
                    !*matched
                        && *from == target
                        && (*length - street.length).abs() < LENGTH_TOLERANCE
                });
                if let Some(entry) = reciprocal {
                    entry.2 = true;
                    continue;
                }
                candidates.push((source, street.length, false));
            }

            result.graph.add_edge(source, target, street.clone());
        }

        result
    }

    /// Directed view of the network, every undirected edge becomes
    /// one edge per direction.
    pub fn to_directed(&self) -> Self {
        if self.is_directed() {
            return self.clone();
        }

        let mut result = self.without_edges(Directedness::Directed);
        for edge in self.graph.edge_references() {
            let (source, target) = (edge.source(), edge.target());
            result.graph.add_edge(source, target, edge.weight().clone());
            if source != target {
                result.graph.add_edge(target, source, edge.weight().reversed());
            }
        }
        result
    }

    /// Sub-graph over the nodes accepted by `keep` and the edges among them.
    ///
    /// Node indices are renumbered, OSM ids are carried over.
    pub fn induced_subgraph(&self, mut keep: impl FnMut(NodeIndex) -> bool) -> Self {
        let graph = self.graph.filter_map(
            |idx, node| keep(idx).then(|| node.clone()),
            |_, edge| Some(edge.clone()),
        );
        Self::from_parts(graph, self.directedness, self.cost_attributes.clone())
    }
}
