//! Algorithms on top of the street graph: cost annotation, snapping,
//! bounded sub-graphs and reachable areas.

pub mod area;
pub mod ego;
pub mod nearest;
pub mod travel_time;
