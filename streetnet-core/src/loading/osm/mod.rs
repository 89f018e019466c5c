//! OSM pbf processing

mod processor;

pub(crate) use processor::create_street_graph;
pub use processor::StreetAccess;
