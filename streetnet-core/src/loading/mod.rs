//! This module is responsible for loading street data from OSM
//! and building an annotated routing graph.

mod builder;
mod config;
pub mod osm;

pub use builder::create_street_network;
pub use config::{NetworkConfig, NetworkType};
