use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::gen_stub_pyfunction;
use streetnet_core::prelude::*;
use wkt::ToWkt;

use crate::model::{PyStreetNetwork, core_error};

/// Area reachable from ``source`` within ``radius``, as WKT
///
/// ``method`` is either ``"hex"`` (dissolved H3 cells of the reached nodes
/// at ``resolution``) or ``"convex_hull"``.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "reachable_area")]
#[pyo3(signature = (
    network,
    source,
    radius,
    weight = "walk_time",
    method = "hex",
    resolution = DEFAULT_HEX_RESOLUTION,
))]
pub fn py_reachable_area(
    py: Python<'_>,
    network: &PyStreetNetwork,
    source: usize,
    radius: f64,
    weight: &str,
    method: &str,
    resolution: u8,
) -> PyResult<String> {
    let method = match method {
        "hex" => AreaMethod::HexCells { resolution },
        "convex_hull" => AreaMethod::ConvexHull,
        other => {
            return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Unknown area method '{other}', expected 'hex' or 'convex_hull'"
            )));
        }
    };

    py.detach(|| {
        let impedance = network.graph.impedance(weight)?;
        let source = network.graph.node_id(source)?;
        let costs = single_source_costs(&network.graph, source, impedance, Some(radius))?;
        reachable_area(&network.graph, &costs, method)
    })
    .map(|area| area.to_wkt().to_string())
    .map_err(|e| core_error("Failed to calculate reachable area", e))
}
