//! Coordinate reference system descriptors.

use serde::{Deserialize, Serialize};

/// An opaque coordinate reference system descriptor.
///
/// A geometry never owns its `Crs` exclusively. The descriptor is shared
/// between all holders through [`Arc`](std::sync::Arc) and lives as long as
/// the longest surviving holder, so attaching it to a geometry is a
/// reference count bump, not a copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs {
    authority: String,
    code: u32,
}

impl Crs {
    /// Creates a descriptor for the given authority and code.
    pub fn new(authority: impl Into<String>, code: u32) -> Self {
        Self {
            authority: authority.into(),
            code,
        }
    }

    /// Creates a descriptor for a code in the EPSG namespace.
    pub fn epsg(code: u32) -> Self {
        Self::new("EPSG", code)
    }

    /// WGS 84 geographic coordinates (EPSG:4326).
    pub fn wgs84() -> Self {
        Self::epsg(4326)
    }

    /// The naming authority, e.g. `EPSG`.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// The code within the authority's namespace.
    pub fn code(&self) -> u32 {
        self.code
    }
}
