use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::define_stub_info_gatherer;

use isochrone::py_reachable_area;
use matrix::travel_time_matrix;
use model::{PyStreetNetwork, py_load_street_network};
use routing::{
    py_ego_graph, py_project_costs, py_single_source_costs, shortest_path, shortest_path_length,
    travel_times_geojson,
};

pub mod isochrone;
pub mod matrix;
pub mod model;
pub mod routing;

/// A Python module implemented in Rust.
#[pymodule]
fn streetnet(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyStreetNetwork>()?;
    m.add_function(wrap_pyfunction!(py_load_street_network, m)?)?;

    m.add_function(wrap_pyfunction!(shortest_path, m)?)?;
    m.add_function(wrap_pyfunction!(shortest_path_length, m)?)?;
    m.add_function(wrap_pyfunction!(py_single_source_costs, m)?)?;
    m.add_function(wrap_pyfunction!(py_ego_graph, m)?)?;
    m.add_function(wrap_pyfunction!(travel_times_geojson, m)?)?;
    m.add_function(wrap_pyfunction!(py_project_costs, m)?)?;

    m.add_function(wrap_pyfunction!(travel_time_matrix, m)?)?;

    m.add_function(wrap_pyfunction!(py_reachable_area, m)?)?;
    Ok(())
}

#[cfg(feature = "stubgen")]
define_stub_info_gatherer!(stub_info);
