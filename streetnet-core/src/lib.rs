//! Street network accessibility analysis.
//!
//! Builds a routable graph from OpenStreetMap data, annotates edges with
//! travel times per mode, snaps coordinates to graph nodes and runs
//! single-source searches (paths, cost maps, bounded ego graphs). Results
//! can be projected back onto points and exported as `GeoJSON` or CSV.

pub mod algo;
pub mod error;
pub mod export;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;
pub use loading::{NetworkConfig, NetworkType, create_street_network};
pub use model::{
    Directedness, Impedance, StreetEdge, StreetGraph, StreetNode, TravelMode,
};

/// Index of a node inside a [`StreetGraph`]
pub type StreetNodeId = petgraph::graph::NodeIndex;
/// Edge traversal cost (seconds for travel times, meters for length)
pub type Cost = f64;
/// OpenStreetMap node identifier
pub type OsmId = i64;
