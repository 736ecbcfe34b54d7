//! Line string and ring types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::point::Coord;

/// Line string geometry: an ordered sequence of coordinates.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    /// Vertices in order.
    pub points: Vec<Coord>,
    crs: Option<Arc<Crs>>,
}

impl LineString {
    /// Creates a line string from the given vertices.
    pub fn new(points: Vec<Coord>) -> Self {
        Self { points, crs: None }
    }

    /// Whether the line string has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any vertex carries a z coordinate.
    pub fn has_z(&self) -> bool {
        self.points.iter().any(|c| c.z.is_some())
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

/// A ring bounding a polygon or a hole within it.
///
/// Rings only ever appear as polygon boundaries, never as a top-level
/// geometry, so they carry no spatial reference of their own. Decoders do
/// not require the first and last vertex to coincide; closure is the
/// consumer's concern.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRing {
    /// Vertices in order.
    pub points: Vec<Coord>,
}

impl LinearRing {
    /// Creates a ring from the given vertices.
    pub fn new(points: Vec<Coord>) -> Self {
        Self { points }
    }

    /// Whether the ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any vertex carries a z coordinate.
    pub fn has_z(&self) -> bool {
        self.points.iter().any(|c| c.z.is_some())
    }
}
