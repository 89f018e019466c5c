use axum::{Json, extract::State};
use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use streetnet_core::{StreetGraph, prelude::*};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    fn point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

fn default_impedance() -> String {
    "walk_time".to_string()
}

#[derive(Debug, Deserialize)]
pub struct NearestRequest {
    #[serde(flatten)]
    pub point: Coordinate,
    #[serde(default)]
    pub metric: DistanceMetric,
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub from: Coordinate,
    pub to: Coordinate,
    #[serde(default = "default_impedance")]
    pub impedance: String,
}

#[derive(Debug, Deserialize)]
pub struct TravelTimesRequest {
    pub origin: Coordinate,
    #[serde(default = "default_impedance")]
    pub impedance: String,
    pub cutoff: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct EgoGraphRequest {
    pub origin: Coordinate,
    pub radius: f64,
    #[serde(default = "default_impedance")]
    pub impedance: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaShape {
    #[default]
    HexCells,
    ConvexHull,
}

#[derive(Debug, Deserialize)]
pub struct AreaRequest {
    pub origin: Coordinate,
    pub radius: f64,
    #[serde(default = "default_impedance")]
    pub impedance: String,
    #[serde(default)]
    pub method: AreaShape,
    /// H3 resolution, only used by `hex_cells`
    pub resolution: Option<u8>,
}

impl AreaRequest {
    fn area_method(&self) -> AreaMethod {
        match self.method {
            AreaShape::ConvexHull => AreaMethod::ConvexHull,
            AreaShape::HexCells => AreaMethod::HexCells {
                resolution: self.resolution.unwrap_or(DEFAULT_HEX_RESOLUTION),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SnappedNode {
    pub node: usize,
    pub osm_id: OsmId,
    pub distance_m: f64,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub cost: Cost,
    pub from: SnappedNode,
    pub to: SnappedNode,
    pub route: Feature,
}

/// Run a search on the blocking pool, the graph is shared read-only
async fn run_blocking<T, F>(state: &AppState, job: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&StreetGraph) -> Result<T, ApiError> + Send + 'static,
{
    let network = state.network.clone();
    tokio::task::spawn_blocking(move || job(&network))
        .await
        .map_err(|e| ApiError::internal(format!("Search worker failed: {e}")))?
}

fn snap(network: &StreetGraph, coordinate: Coordinate) -> Result<(StreetNodeId, f64), ApiError> {
    network
        .nearest_node(&coordinate.point(), DistanceMetric::Haversine)
        .ok_or_else(|| streetnet_core::Error::NoPointsFound.into())
}

fn snapped(network: &StreetGraph, (node, distance): (StreetNodeId, f64)) -> SnappedNode {
    SnappedNode {
        node: node.index(),
        osm_id: network.graph[node].id,
        distance_m: distance,
    }
}

pub async fn health(State(state): State<AppState>) -> Json<JsonValue> {
    let network = &state.network;
    Json(json!({
        "status": "ok",
        "nodes": network.node_count(),
        "edges": network.edge_count(),
        "directed": network.is_directed(),
        "cost_attributes": network.cost_attributes(),
    }))
}

pub async fn nearest(
    State(state): State<AppState>,
    Json(request): Json<NearestRequest>,
) -> Result<Json<SnappedNode>, ApiError> {
    let network = &state.network;
    let (node, distance) = network
        .nearest_node(&request.point.point(), request.metric)
        .ok_or(streetnet_core::Error::NoPointsFound)?;
    Ok(Json(snapped(network, (node, distance))))
}

#[tracing::instrument(skip(state))]
pub async fn route(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    run_blocking(&state, move |network| {
        let impedance = network.impedance(&request.impedance)?;
        let from = snap(network, request.from)?;
        let to = snap(network, request.to)?;

        let route = shortest_path(network, from.0, to.0, impedance)?
            .ok_or_else(|| ApiError::not_found("No route between the given points"))?;
        tracing::debug!("Found route over {} nodes", route.nodes.len());

        Ok(RouteResponse {
            cost: route.cost,
            from: snapped(network, from),
            to: snapped(network, to),
            route: route_to_geojson(network, &route, impedance)?,
        })
    })
    .await
    .map(Json)
}

#[tracing::instrument(skip(state))]
pub async fn travel_times(
    State(state): State<AppState>,
    Json(request): Json<TravelTimesRequest>,
) -> Result<Json<FeatureCollection>, ApiError> {
    run_blocking(&state, move |network| {
        let impedance = network.impedance(&request.impedance)?;
        let (origin, _) = snap(network, request.origin)?;
        let costs = single_source_costs(network, origin, impedance, request.cutoff)?;
        Ok(node_costs_to_geojson(network, &costs, &request.impedance)?)
    })
    .await
    .map(Json)
}

#[tracing::instrument(skip(state))]
pub async fn ego(
    State(state): State<AppState>,
    Json(request): Json<EgoGraphRequest>,
) -> Result<Json<FeatureCollection>, ApiError> {
    run_blocking(&state, move |network| {
        let impedance = network.impedance(&request.impedance)?;
        let (origin, _) = snap(network, request.origin)?;
        let sub_graph = ego_graph(network, origin, request.radius, impedance)?;
        Ok(edges_to_geojson(&sub_graph)?)
    })
    .await
    .map(Json)
}

#[tracing::instrument(skip(state))]
pub async fn area(
    State(state): State<AppState>,
    Json(request): Json<AreaRequest>,
) -> Result<Json<Geometry>, ApiError> {
    run_blocking(&state, move |network| {
        let impedance = network.impedance(&request.impedance)?;
        let (origin, _) = snap(network, request.origin)?;
        let costs = single_source_costs(network, origin, impedance, Some(request.radius))?;
        let polygons = reachable_area(network, &costs, request.area_method())?;
        Ok(Geometry::new(GeoJsonValue::from(&polygons)))
    })
    .await
    .map(Json)
}
