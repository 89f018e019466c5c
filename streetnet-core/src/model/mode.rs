use serde::{Deserialize, Serialize};

use crate::Error;

/// A way of travelling along the network at a constant speed.
///
/// Annotating a graph with a mode adds a cost attribute named after
/// the mode, holding the traversal time of each edge in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelMode {
    /// Attribute name of the derived cost, e.g. `walk_time`
    pub name: String,
    /// Constant speed in km/h
    pub speed_kmh: f64,
}

impl TravelMode {
    pub fn new(name: impl Into<String>, speed_kmh: f64) -> Self {
        Self {
            name: name.into(),
            speed_kmh,
        }
    }

    pub fn walk() -> Self {
        Self::new("walk_time", 4.5)
    }

    pub fn bike() -> Self {
        Self::new("bike_time", 15.0)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() || self.name == "length" {
            return Err(Error::InvalidData(format!(
                "Invalid travel mode name '{}'",
                self.name
            )));
        }
        if !self.speed_kmh.is_finite() || self.speed_kmh <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Travel mode '{}' must have a positive speed, got {} km/h",
                self.name, self.speed_kmh
            )));
        }
        Ok(())
    }
}

/// Edge value used as weight in path searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Impedance {
    /// Physical length in meters
    Length,
    /// Derived cost attribute, by slot in the graph's attribute list
    Attribute(usize),
}
