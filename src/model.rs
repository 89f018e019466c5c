use std::collections::HashMap;

use geo::Point;
use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};
use streetnet_core::prelude::*;

/// Map library errors onto Python exceptions
pub(crate) fn core_error(context: &str, error: Error) -> PyErr {
    let message = format!("{context}: {error}");
    match error {
        Error::NoPointsFound
        | Error::InvalidNodeIndex
        | Error::UnknownImpedance(_)
        | Error::InvalidData(_) => PyErr::new::<pyo3::exceptions::PyValueError, _>(message),
        _ => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(message),
    }
}

pub(crate) fn parse_metric(metric: &str) -> PyResult<DistanceMetric> {
    match metric {
        "haversine" => Ok(DistanceMetric::Haversine),
        "euclidean" => Ok(DistanceMetric::Euclidean),
        other => Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "Unknown distance metric '{other}', expected 'haversine' or 'euclidean'"
        ))),
    }
}

/// StreetNetwork
///
/// A street graph built from OpenStreetMap data. Nodes are street
/// intersections, edges are street segments carrying their length in
/// meters and one travel time attribute per annotated travel mode.
///
/// Example:
///
/// .. code-block:: python
///
///     network = load_street_network("helsinki.osm.pbf", "walk")
///     node, distance = network.nearest_node(60.1699, 24.9384)
///     costs = single_source_costs(network, node, "walk_time", cutoff=900)
#[cfg_attr(feature = "stubgen", gen_stub_pyclass)]
#[pyclass(name = "StreetNetwork")]
pub struct PyStreetNetwork {
    pub(crate) graph: StreetGraph,
}

#[cfg_attr(feature = "stubgen", gen_stub_pymethods)]
#[pymethods]
impl PyStreetNetwork {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_directed(&self) -> bool {
        self.graph.is_directed()
    }

    /// Names of the travel time attributes carried by the edges
    pub fn cost_attributes(&self) -> Vec<String> {
        self.graph.cost_attributes().to_vec()
    }

    /// Add (or overwrite) a travel time attribute for a constant speed in km/h
    pub fn annotate_travel_times(&mut self, name: &str, speed_kmh: f64) -> PyResult<()> {
        let mode = TravelMode::new(name, speed_kmh);
        mode.validate()
            .map_err(|e| core_error("Invalid travel mode", e))?;
        annotate_travel_times(&mut self.graph, &mode);
        Ok(())
    }

    /// Closest node to a coordinate, returned as ``(node, distance)``
    #[pyo3(signature = (lat, lon, metric = "haversine"))]
    pub fn nearest_node(&self, lat: f64, lon: f64, metric: &str) -> PyResult<(usize, f64)> {
        let metric = parse_metric(metric)?;
        self.graph
            .nearest_node(&Point::new(lon, lat), metric)
            .map(|(node, distance)| (node.index(), distance))
            .ok_or_else(|| core_error("Nearest node lookup failed", Error::NoPointsFound))
    }

    /// Node coordinates as ``(lat, lon)``
    pub fn node_coordinates(&self, node: usize) -> PyResult<(f64, f64)> {
        self.graph
            .node_id(node)
            .and_then(|idx| self.graph.node_point(idx).ok_or(Error::InvalidNodeIndex))
            .map(|point| (point.y(), point.x()))
            .map_err(|e| core_error("Unknown node", e))
    }

    /// OpenStreetMap id of a node
    pub fn osm_id(&self, node: usize) -> PyResult<i64> {
        self.graph
            .node_id(node)
            .and_then(|idx| self.graph.node(idx).ok_or(Error::InvalidNodeIndex))
            .map(|node| node.id)
            .map_err(|e| core_error("Unknown node", e))
    }

    pub fn to_undirected(&self) -> PyStreetNetwork {
        PyStreetNetwork {
            graph: self.graph.to_undirected(),
        }
    }

    pub fn to_directed(&self) -> PyStreetNetwork {
        PyStreetNetwork {
            graph: self.graph.to_directed(),
        }
    }

    /// All edges as a GeoJSON FeatureCollection string
    pub fn edges_geojson(&self) -> PyResult<String> {
        let layer = edges_to_geojson(&self.graph).map_err(|e| core_error("Export failed", e))?;
        serde_json::to_string(&layer).map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("Export failed: {e}"))
        })
    }

    fn __repr__(&self) -> String {
        format!(
            "StreetNetwork({} nodes, {} edges, {}, attributes: {:?})",
            self.graph.node_count(),
            self.graph.edge_count(),
            if self.graph.is_directed() {
                "directed"
            } else {
                "undirected"
            },
            self.graph.cost_attributes()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

fn parse_network_type(network_type: &str) -> PyResult<NetworkType> {
    match network_type {
        "walk" => Ok(NetworkType::Walk),
        "bike" => Ok(NetworkType::Bike),
        "drive" => Ok(NetworkType::Drive),
        "all" => Ok(NetworkType::All),
        other => Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "Unknown network type '{other}', expected one of walk, bike, drive, all"
        ))),
    }
}

/// Build a street network from an OpenStreetMap extract
///
/// Parameters
/// ----------
/// osm_path : str
///     Path to OpenStreetMap PBF file containing street network data
/// network_type : str, default="walk"
///     Which streets to keep: "walk", "bike", "drive" or "all"
/// directed : bool, default=True
///     Directed graphs store two-way streets as two edges and honour
///     one-way streets. Undirected graphs store one edge per street.
/// modes : dict[str, float], optional
///     Travel time attributes to annotate, name -> speed in km/h.
///     Defaults to ``{"walk_time": 4.5, "bike_time": 15.0}``.
///
/// Returns
/// -------
/// StreetNetwork
///
/// Raises
/// ------
/// ValueError
///     If the configuration is invalid
/// RuntimeError
///     If the OSM data cannot be read
///
/// Notes
/// -----
/// The function releases the GIL during processing to allow other Python
/// threads to continue execution.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "load_street_network")]
#[pyo3(signature = (osm_path, network_type = "walk", directed = true, modes = None))]
pub fn py_load_street_network(
    py: Python<'_>,
    osm_path: &str,
    network_type: &str,
    directed: bool,
    modes: Option<HashMap<String, f64>>,
) -> PyResult<PyStreetNetwork> {
    let mut config = NetworkConfig::new(osm_path);
    config.network_type = parse_network_type(network_type)?;
    config.directedness = if directed {
        Directedness::Directed
    } else {
        Directedness::Undirected
    };
    if let Some(modes) = modes {
        config.modes = modes
            .into_iter()
            .map(|(name, speed)| TravelMode::new(name, speed))
            .collect();
        config.modes.sort_by(|a, b| a.name.cmp(&b.name));
    }

    // Allow Python threads during all blocking operations
    py.detach(|| {
        let graph = create_street_network(&config)
            .map_err(|e| core_error("Failed to create street network", e))?;
        Ok(PyStreetNetwork { graph })
    })
}
