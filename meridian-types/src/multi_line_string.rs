//! Multi line string geometry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::line_string::LineString;

/// A homogeneous set of line strings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLineString {
    /// Member line strings.
    pub lines: Vec<LineString>,
    crs: Option<Arc<Crs>>,
}

impl MultiLineString {
    /// Creates a multi line string from the given members.
    pub fn new(lines: Vec<LineString>) -> Self {
        Self { lines, crs: None }
    }

    /// Whether the geometry has no members.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether any member carries a z coordinate.
    pub fn has_z(&self) -> bool {
        self.lines.iter().any(LineString::has_z)
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
