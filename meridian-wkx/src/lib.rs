//! Well-known binary (WKB) and well-known text (WKT) codecs over the
//! [`meridian_types`] geometry model.
//!
//! The readers are built for hostile input: truncated buffers, corrupt
//! byte-order markers, unknown type codes, malformed text, hostile element
//! counts and deeply nested collections all produce a structured
//! [`MeridianWkxError`] instead of a panic or an unbounded allocation.

pub mod error;
pub use error::MeridianWkxError;

mod factory;
pub use factory::*;

pub mod wkb;
pub mod wkt;

/// Collections nested deeper than this are rejected as corrupt by both
/// readers, bounding stack growth on adversarial input.
pub const MAX_NESTING_DEPTH: usize = 32;
