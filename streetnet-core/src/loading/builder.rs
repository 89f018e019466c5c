use log::{info, warn};

use super::config::NetworkConfig;
use super::osm::create_street_graph;
use crate::{Error, StreetGraph, algo::travel_time::annotate_travel_times};

/// Creates an annotated street network based on the provided configuration
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the OSM data
/// cannot be read
pub fn create_street_network(config: &NetworkConfig) -> Result<StreetGraph, Error> {
    config.validate()?;

    info!(
        "Processing street data (OSM): {}",
        config.osm_path.display()
    );
    let mut graph = create_street_graph(
        &config.osm_path,
        config.network_type,
        config.directedness,
    )?;

    if graph.is_empty() {
        warn!(
            "No {:?} streets found in {}. Every query on this network will fail to snap.",
            config.network_type,
            config.osm_path.display()
        );
    }

    for mode in &config.modes {
        annotate_travel_times(&mut graph, mode);
        info!(
            "Annotated '{}' travel times at {} km/h",
            mode.name, mode.speed_kmh
        );
    }

    info!("Street network created successfully");
    // While processing OSM protobuf data large amounts of memory are
    // allocated. This memory is not always released back to the system.
    // This call will release all free memory from the tail of the heap
    // back to the system.
    //
    // # Safety
    //
    // This call is safe to use on linux with glibc implementation
    // which is checked by the cfg attribute in compile time.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            log::debug!("Memory trimming released nothing - continuing anyway");
        } else {
            log::debug!("Successfully trimmed unused heap memory");
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_missing_extract_before_reading() {
        let config = NetworkConfig::new("/nowhere/region.osm.pbf");
        assert!(matches!(
            create_street_network(&config),
            Err(Error::InvalidData(_))
        ));
    }
}
