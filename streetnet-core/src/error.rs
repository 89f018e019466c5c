use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No nearby points found for snapping")]
    NoPointsFound,
    #[error("Invalid node index")]
    InvalidNodeIndex,
    #[error("Unknown impedance attribute: {0}")]
    UnknownImpedance(String),
    #[error("OSM error: {0}")]
    OsmError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Isochrone error: {0}")]
    IsochroneError(String),
    #[error("H3 error: {0}")]
    H3Error(#[from] h3o::error::InvalidLatLng),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
