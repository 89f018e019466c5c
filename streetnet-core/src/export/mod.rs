//! Projection of search results back onto geography: point joins,
//! `GeoJSON` layers and CSV tables.

mod layers;
mod projection;
mod table;

pub use layers::{edges_to_geojson, node_costs_to_geojson, route_to_geojson};
pub use projection::project_costs;
pub use table::write_node_costs_csv;
