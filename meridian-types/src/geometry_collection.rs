//! Heterogeneous geometry collection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::geometry::Geometry;

/// An ordered collection of geometries of any kind.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryCollection {
    /// Member geometries.
    pub geometries: Vec<Geometry>,
    crs: Option<Arc<Crs>>,
}

impl GeometryCollection {
    /// Creates a collection from the given members.
    pub fn new(geometries: Vec<Geometry>) -> Self {
        Self {
            geometries,
            crs: None,
        }
    }

    /// Whether the collection has no members.
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Whether any member carries a z coordinate.
    pub fn has_z(&self) -> bool {
        self.geometries.iter().any(Geometry::has_z)
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
