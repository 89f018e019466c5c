use std::path::PathBuf;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::{Directedness, Error, TravelMode};

/// Which streets of an OSM extract end up in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Streets open to pedestrians, always two-way
    #[default]
    Walk,
    /// Streets open to cyclists, honouring one-way restrictions
    Bike,
    /// Streets open to cars, honouring one-way restrictions
    Drive,
    /// Every street usable by any of the above
    All,
}

/// Configuration for building a street network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Path to an OpenStreetMap PBF extract
    pub osm_path: PathBuf,
    #[serde(default)]
    pub network_type: NetworkType,
    #[serde(default)]
    pub directedness: Directedness,
    /// Travel modes to annotate edges with
    #[serde(default = "default_modes")]
    pub modes: Vec<TravelMode>,
}

fn default_modes() -> Vec<TravelMode> {
    vec![TravelMode::walk(), TravelMode::bike()]
}

impl NetworkConfig {
    pub fn new(osm_path: impl Into<PathBuf>) -> Self {
        Self {
            osm_path: osm_path.into(),
            network_type: NetworkType::default(),
            directedness: Directedness::default(),
            modes: default_modes(),
        }
    }

    /// Checks the configuration before any data is read
    ///
    /// # Errors
    ///
    /// Returns an error if the OSM file is missing, no travel mode is given,
    /// mode names repeat or a mode has an invalid speed
    pub fn validate(&self) -> Result<(), Error> {
        if !self.osm_path.exists() {
            return Err(Error::InvalidData(format!(
                "OSM file not found: {}",
                self.osm_path.display()
            )));
        }

        if self.modes.is_empty() {
            return Err(Error::InvalidData(
                "No travel modes provided in the configuration".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for mode in &self.modes {
            mode.validate()?;
            if !names.insert(mode.name.as_str()) {
                return Err(Error::InvalidData(format!(
                    "Travel mode '{}' is defined more than once",
                    mode.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing_file() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{ "osm_path": "helsinki.osm.pbf" }"#).unwrap();
        assert_eq!(config.network_type, NetworkType::Walk);
        assert_eq!(config.directedness, Directedness::Directed);
        assert_eq!(config.modes, vec![TravelMode::walk(), TravelMode::bike()]);
    }

    #[test]
    fn deserializes_explicit_values() {
        let config: NetworkConfig = serde_json::from_str(
            r#"{
                "osm_path": "x.pbf",
                "network_type": "drive",
                "directedness": "undirected",
                "modes": [{ "name": "drive_time", "speed_kmh": 30.0 }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.network_type, NetworkType::Drive);
        assert_eq!(config.directedness, Directedness::Undirected);
        assert_eq!(config.modes[0].speed_kmh, 30.0);
    }

    #[test]
    fn validation() {
        let mut config = NetworkConfig::new(existing_file());
        assert!(config.validate().is_ok());

        config.modes.push(TravelMode::walk());
        assert!(config.validate().is_err());

        config.modes = vec![TravelMode::new("walk_time", 0.0)];
        assert!(config.validate().is_err());

        config.modes.clear();
        assert!(config.validate().is_err());

        let missing = NetworkConfig::new("/definitely/not/here.osm.pbf");
        assert!(matches!(missing.validate(), Err(Error::InvalidData(_))));
    }
}
