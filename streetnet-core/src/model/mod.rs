//! Data model for street network analysis
//!
//! Contains the street graph, its nodes and edges, and the travel modes
//! whose costs are derived from edge lengths.

pub mod mode;
pub mod streets;

pub use mode::{Impedance, TravelMode};
pub use streets::network::{Directedness, IndexedPoint, StreetGraph};
pub use streets::{StreetEdge, StreetNode};
