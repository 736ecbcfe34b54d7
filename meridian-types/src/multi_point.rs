//! Multi point geometry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::point::Point;

/// A homogeneous set of points.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPoint {
    /// Member points.
    pub points: Vec<Point>,
    crs: Option<Arc<Crs>>,
}

impl MultiPoint {
    /// Creates a multi point from the given members.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points, crs: None }
    }

    /// Whether the geometry has no members.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any member carries a z coordinate.
    pub fn has_z(&self) -> bool {
        self.points.iter().any(Point::has_z)
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
