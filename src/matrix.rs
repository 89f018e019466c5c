use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::gen_stub_pyfunction;
use streetnet_core::prelude::*;

use crate::model::{PyStreetNetwork, core_error};

/// Costs between every ordered pair of ``nodes``
///
/// Row ``i`` holds the costs from ``nodes[i]`` to each node, ``None``
/// where unreachable. Rows are computed in parallel.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (network, nodes, weight = "walk_time"))]
pub fn travel_time_matrix(
    py: Python<'_>,
    network: &PyStreetNetwork,
    nodes: Vec<usize>,
    weight: &str,
) -> PyResult<Vec<Vec<Option<f64>>>> {
    let impedance = network
        .graph
        .impedance(weight)
        .map_err(|e| core_error("Invalid weight", e))?;
    let nodes = nodes
        .into_iter()
        .map(|index| network.graph.node_id(index))
        .collect::<Result<Vec<StreetNodeId>, _>>()
        .map_err(|e| core_error("Invalid node", e))?;

    py.detach(|| cost_matrix(&network.graph, &nodes, impedance))
        .map_err(|e| core_error("Matrix calculation failed", e))
}
