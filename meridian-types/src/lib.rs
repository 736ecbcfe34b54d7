//! Geometry model used by the meridian well-known format codecs.
//!
//! The crate defines concrete geometry types for the seven top-level
//! geometry kinds, the [`Geometry`] enum that unites them, and the shared
//! [`Crs`] coordinate reference system descriptor. The types store their
//! own coordinates and own their children exclusively; only the `Crs` is
//! shared, through an atomically reference counted handle.

mod crs;
pub use crs::*;

mod error;
pub use error::*;

mod geometry;
pub use geometry::*;

mod geometry_collection;
pub use geometry_collection::*;

mod line_string;
pub use line_string::*;

mod multi_line_string;
pub use multi_line_string::*;

mod multi_point;
pub use multi_point::*;

mod multi_polygon;
pub use multi_polygon::*;

mod point;
pub use point::*;

mod polygon;
pub use polygon::*;
