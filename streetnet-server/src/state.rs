use std::sync::Arc;

use streetnet_core::StreetGraph;

/// Shared, read-only state of the service
#[derive(Clone)]
pub struct AppState {
    pub network: Arc<StreetGraph>,
}

impl AppState {
    pub fn new(network: StreetGraph) -> Self {
        Self {
            network: Arc::new(network),
        }
    }
}
