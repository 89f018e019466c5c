use std::collections::HashMap;

use geo::Point;
use hashbrown::HashMap as HashbrownMap;
use pyo3::prelude::*;
use pyo3::types::PyDict;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::gen_stub_pyfunction;
use streetnet_core::prelude::*;

use crate::model::{PyStreetNetwork, core_error, parse_metric};

fn node(network: &PyStreetNetwork, index: usize) -> PyResult<StreetNodeId> {
    network
        .graph
        .node_id(index)
        .map_err(|e| core_error("Invalid node", e))
}

fn impedance(network: &PyStreetNetwork, weight: &str) -> PyResult<Impedance> {
    network
        .graph
        .impedance(weight)
        .map_err(|e| core_error("Invalid weight", e))
}

/// Minimum-cost path between two nodes
///
/// Returns ``None`` if the target is unreachable, otherwise a dict with
/// ``nodes`` (list of node ids from source to target) and ``cost``.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (network, source, target, weight = "walk_time"))]
pub fn shortest_path<'py>(
    py: Python<'py>,
    network: &PyStreetNetwork,
    source: usize,
    target: usize,
    weight: &str,
) -> PyResult<Option<Bound<'py, PyDict>>> {
    let impedance = impedance(network, weight)?;
    let (source, target) = (node(network, source)?, node(network, target)?);

    let route = py
        .detach(|| {
            streetnet_core::routing::shortest_path(&network.graph, source, target, impedance)
        })
        .map_err(|e| core_error("Route calculation failed", e))?;

    match route {
        Some(route) => {
            let dict = PyDict::new(py);
            let nodes: Vec<usize> = route.nodes.iter().map(|n| n.index()).collect();
            dict.set_item("nodes", nodes)?;
            dict.set_item("cost", route.cost)?;
            Ok(Some(dict))
        }
        None => Ok(None),
    }
}

/// Minimum total cost between two nodes, ``None`` if unreachable
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (network, source, target, weight = "walk_time"))]
pub fn shortest_path_length(
    py: Python<'_>,
    network: &PyStreetNetwork,
    source: usize,
    target: usize,
    weight: &str,
) -> PyResult<Option<f64>> {
    let impedance = impedance(network, weight)?;
    let (source, target) = (node(network, source)?, node(network, target)?);

    py.detach(|| shortest_path_cost(&network.graph, source, target, impedance))
        .map_err(|e| core_error("Route calculation failed", e))
}

/// Minimum cost from ``source`` to every reachable node
///
/// Returns a dict of node id to cost. Unreachable nodes are absent, and
/// with a ``cutoff`` only nodes within it are included.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "single_source_costs")]
#[pyo3(signature = (network, source, weight = "walk_time", cutoff = None))]
pub fn py_single_source_costs(
    py: Python<'_>,
    network: &PyStreetNetwork,
    source: usize,
    weight: &str,
    cutoff: Option<f64>,
) -> PyResult<HashMap<usize, f64>> {
    let impedance = impedance(network, weight)?;
    let source = node(network, source)?;

    let costs = py
        .detach(|| single_source_costs(&network.graph, source, impedance, cutoff))
        .map_err(|e| core_error("Cost calculation failed", e))?;

    Ok(costs
        .into_iter()
        .map(|(node, cost)| (node.index(), cost))
        .collect())
}

/// Sub-network of every node within ``radius`` of ``source``
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "ego_graph")]
#[pyo3(signature = (network, source, radius, weight = "walk_time"))]
pub fn py_ego_graph(
    py: Python<'_>,
    network: &PyStreetNetwork,
    source: usize,
    radius: f64,
    weight: &str,
) -> PyResult<PyStreetNetwork> {
    let impedance = impedance(network, weight)?;
    let source = node(network, source)?;

    let graph = py
        .detach(|| ego_graph(&network.graph, source, radius, impedance))
        .map_err(|e| core_error("Ego graph extraction failed", e))?;
    Ok(PyStreetNetwork { graph })
}

/// Costs from ``source`` as a GeoJSON FeatureCollection string of points
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction]
#[pyo3(signature = (network, source, weight = "walk_time", cutoff = None))]
pub fn travel_times_geojson(
    py: Python<'_>,
    network: &PyStreetNetwork,
    source: usize,
    weight: &str,
    cutoff: Option<f64>,
) -> PyResult<String> {
    let impedance = impedance(network, weight)?;
    let source = node(network, source)?;

    py.detach(|| {
        let costs = single_source_costs(&network.graph, source, impedance, cutoff)?;
        node_costs_to_geojson(&network.graph, &costs, weight)
    })
    .map_err(|e| core_error("Export failed", e))
    .and_then(|layer| {
        serde_json::to_string(&layer).map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("Export failed: {e}"))
        })
    })
}

/// Join node costs onto points given as ``(lat, lon)`` pairs
///
/// Each point takes the cost of its nearest node, or ``None`` when that
/// node was not reached or lies farther than ``max_snap_distance``.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "project_costs")]
#[pyo3(signature = (network, points, costs, max_snap_distance = None, metric = "haversine"))]
pub fn py_project_costs(
    py: Python<'_>,
    network: &PyStreetNetwork,
    points: Vec<(f64, f64)>,
    costs: HashMap<usize, f64>,
    max_snap_distance: Option<f64>,
    metric: &str,
) -> PyResult<Vec<Option<f64>>> {
    let metric = parse_metric(metric)?;
    let points: Vec<Point<f64>> = points
        .into_iter()
        .map(|(lat, lon)| Point::new(lon, lat))
        .collect();
    let costs = costs
        .into_iter()
        .map(|(index, cost)| node(network, index).map(|node| (node, cost)))
        .collect::<PyResult<HashbrownMap<StreetNodeId, f64>>>()?;

    py.detach(|| project_costs(&network.graph, &points, &costs, metric, max_snap_distance))
        .map_err(|e| core_error("Projection failed", e))
}
