//! Coordinate and point types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;

/// A single position: `x`, `y` and an optional `z`.
///
/// This is the bare currency of all geometry types. A coordinate carries no
/// spatial reference; the [`Crs`] belongs to the geometry that owns it.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Coord {
    /// Easting or longitude.
    pub x: f64,
    /// Northing or latitude.
    pub y: f64,
    /// Elevation, if the coordinate is three-dimensional.
    pub z: Option<f64>,
}

impl Coord {
    /// Creates a two-dimensional coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates a three-dimensional coordinate.
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

/// Point geometry: a single coordinate.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// The point's position.
    pub coord: Coord,
    crs: Option<Arc<Crs>>,
}

impl Point {
    /// Creates a two-dimensional point.
    pub fn new(x: f64, y: f64) -> Self {
        Self::from_coord(Coord::new(x, y))
    }

    /// Creates a three-dimensional point.
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self::from_coord(Coord::with_z(x, y, z))
    }

    /// Creates a point at the given coordinate.
    pub fn from_coord(coord: Coord) -> Self {
        Self { coord, crs: None }
    }

    /// X coordinate of the point.
    pub fn x(&self) -> f64 {
        self.coord.x
    }

    /// Y coordinate of the point.
    pub fn y(&self) -> f64 {
        self.coord.y
    }

    /// Z coordinate of the point, if present.
    pub fn z(&self) -> Option<f64> {
        self.coord.z
    }

    /// Whether the point carries a z coordinate.
    pub fn has_z(&self) -> bool {
        self.coord.z.is_some()
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

impl From<Coord> for Point {
    fn from(value: Coord) -> Self {
        Self::from_coord(value)
    }
}
