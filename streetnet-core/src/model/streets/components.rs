//! Street network components - nodes and edges

use geo::{LineString, Point};

use crate::{Cost, OsmId, model::Impedance};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// OSM ID of the node
    pub id: OsmId,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
}

impl StreetNode {
    pub fn new(id: OsmId, lon: f64, lat: f64) -> Self {
        Self {
            id,
            geometry: Point::new(lon, lat),
        }
    }
}

/// Street graph edge (street segment)
#[derive(Debug, Clone)]
pub struct StreetEdge {
    /// Physical length in meters
    pub length: f64,
    /// Segment geometry, from source to target
    pub geometry: LineString<f64>,
    /// Derived costs, aligned with the owning graph's cost attributes
    pub(crate) costs: Vec<Cost>,
}

impl StreetEdge {
    pub fn new(length: f64, geometry: LineString<f64>) -> Self {
        Self {
            length,
            geometry,
            costs: Vec::new(),
        }
    }

    /// Value of the given impedance on this edge.
    ///
    /// `None` means the attribute was never annotated on this edge,
    /// such an edge cannot be traversed with that impedance.
    pub fn cost(&self, impedance: Impedance) -> Option<Cost> {
        match impedance {
            Impedance::Length => Some(self.length),
            Impedance::Attribute(slot) => self.costs.get(slot).copied().filter(|c| !c.is_nan()),
        }
    }

    pub(crate) fn set_cost(&mut self, slot: usize, value: Cost) {
        if self.costs.len() <= slot {
            self.costs.resize(slot + 1, f64::NAN);
        }
        self.costs[slot] = value;
    }

    /// Copy of this edge running in the opposite direction
    pub(crate) fn reversed(&self) -> Self {
        let mut geometry = self.geometry.clone();
        geometry.0.reverse();
        Self {
            length: self.length,
            geometry,
            costs: self.costs.clone(),
        }
    }
}
