// Re-export key components
pub use crate::algo::area::{AreaMethod, DEFAULT_HEX_RESOLUTION, reachable_area};
pub use crate::algo::ego::ego_graph;
pub use crate::algo::nearest::{DistanceMetric, haversine_distance};
pub use crate::algo::travel_time::{annotate_travel_times, travel_time_seconds};
pub use crate::export::{
    edges_to_geojson, node_costs_to_geojson, project_costs, route_to_geojson,
    write_node_costs_csv,
};
pub use crate::loading::{NetworkConfig, NetworkType, create_street_network};
pub use crate::model::{Directedness, Impedance, StreetGraph, TravelMode};
pub use crate::routing::{
    Route, cost_matrix, one_to_many, shortest_path, shortest_path_cost, single_source_costs,
};

// Core types for the street network
pub use crate::Cost;
pub use crate::Error;
pub use crate::OsmId;
pub use crate::StreetNodeId;
