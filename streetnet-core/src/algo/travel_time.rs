use log::debug;

use crate::{Cost, Impedance, StreetGraph, TravelMode};

/// Time in seconds to cover `length` meters at `speed_kmh`,
/// rounded to one decimal.
pub fn travel_time_seconds(length: f64, speed_kmh: f64) -> Cost {
    let seconds = length / (speed_kmh * 1000.0) * 3600.0;
    (seconds * 10.0).round() / 10.0
}

/// Annotates every edge with the travel time of `mode`.
///
/// The attribute is named after the mode. Annotating the same mode again
/// overwrites the previous values. Returns the impedance to search with.
pub fn annotate_travel_times(graph: &mut StreetGraph, mode: &TravelMode) -> Impedance {
    let slot = graph.attribute_slot(&mode.name);
    for edge in graph.graph.edge_weights_mut() {
        edge.set_cost(slot, travel_time_seconds(edge.length, mode.speed_kmh));
    }

    debug!(
        "Annotated {} edges with '{}' at {} km/h",
        graph.edge_count(),
        mode.name,
        mode.speed_kmh
    );
    Impedance::Attribute(slot)
}
