//! Polygon geometry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::line_string::LinearRing;

/// Polygon geometry: one exterior ring and any number of interior rings
/// (holes).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Outer boundary. An empty ring means the polygon is empty.
    pub exterior: LinearRing,
    /// Holes in the outer boundary.
    pub interiors: Vec<LinearRing>,
    crs: Option<Arc<Crs>>,
}

impl Polygon {
    /// Creates a polygon from its rings.
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        Self {
            exterior,
            interiors,
            crs: None,
        }
    }

    /// Appends a ring to the polygon.
    ///
    /// The first ring added to an empty polygon becomes the exterior; every
    /// further ring becomes an interior. Ring nesting is not verified.
    pub fn add_ring(&mut self, ring: LinearRing) {
        if self.is_empty() {
            self.exterior = ring;
        } else {
            self.interiors.push(ring);
        }
    }

    /// Whether the polygon has no rings.
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty() && self.interiors.is_empty()
    }

    /// Number of rings, counting the exterior.
    pub fn ring_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            1 + self.interiors.len()
        }
    }

    /// Whether any vertex carries a z coordinate.
    pub fn has_z(&self) -> bool {
        self.exterior.has_z() || self.interiors.iter().any(LinearRing::has_z)
    }

    /// The attached coordinate reference system, if any.
    pub fn crs(&self) -> Option<&Arc<Crs>> {
        self.crs.as_ref()
    }

    /// Attaches or clears the coordinate reference system.
    pub fn set_crs(&mut self, crs: Option<Arc<Crs>>) {
        self.crs = crs;
    }
}

impl From<LinearRing> for Polygon {
    fn from(value: LinearRing) -> Self {
        Self::new(value, vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Coord;

    fn ring(offset: f64) -> LinearRing {
        LinearRing::new(vec![
            Coord::new(offset, offset),
            Coord::new(offset + 1.0, offset),
            Coord::new(offset + 1.0, offset + 1.0),
            Coord::new(offset, offset),
        ])
    }

    #[test]
    fn first_ring_becomes_exterior() {
        let mut polygon = Polygon::default();
        assert!(polygon.is_empty());
        assert_eq!(polygon.ring_count(), 0);

        polygon.add_ring(ring(0.0));
        assert_eq!(polygon.ring_count(), 1);
        assert!(polygon.interiors.is_empty());

        polygon.add_ring(ring(10.0));
        polygon.add_ring(ring(20.0));
        assert_eq!(polygon.ring_count(), 3);
        assert_eq!(polygon.interiors.len(), 2);
        assert_eq!(polygon.exterior, ring(0.0));
    }
}
