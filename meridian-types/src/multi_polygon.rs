//! Multi polygon geometry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::polygon::Polygon;

/// A homogeneous set of polygons.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygon {
    /// Member polygons.
    pub polygons: Vec<Polygon>,
    crs: Option<Arc<Crs>>,
}

impl MultiPolygon {
    /// Creates a multi polygon from the given members.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            crs: None,
        }
    }

    /// Whether the geometry has no members.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Whether any member carries a z coordinate.
    pub fn has_z(&self) -> bool {
        self.polygons.iter().any(Polygon::has_z)
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
