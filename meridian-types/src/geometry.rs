//! The geometry variant enum and its type codes.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::error::MeridianTypesError;
use crate::geometry_collection::GeometryCollection;
use crate::line_string::LineString;
use crate::multi_line_string::MultiLineString;
use crate::multi_point::MultiPoint;
use crate::multi_polygon::MultiPolygon;
use crate::point::Point;
use crate::polygon::Polygon;

/// Dimensionality flag bit of a well-known binary type code.
///
/// A type code with this bit set describes the same kind of geometry with
/// three doubles per coordinate instead of two.
pub const TYPE_CODE_Z_BIT: u32 = 0x8000_0000;

/// Any of the seven top-level geometry kinds.
///
/// The set is closed. Every dispatch over geometries in this workspace is an
/// exhaustive match, so adding a kind makes the compiler revisit every
/// dispatch site instead of failing at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Point geometry.
    Point(Point),
    /// Line string geometry.
    LineString(LineString),
    /// Polygon geometry.
    Polygon(Polygon),
    /// Multi point geometry.
    MultiPoint(MultiPoint),
    /// Multi line string geometry.
    MultiLineString(MultiLineString),
    /// Multi polygon geometry.
    MultiPolygon(MultiPolygon),
    /// Heterogeneous collection of geometries.
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// The kind of this geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// The attached coordinate reference system, if any.
    pub fn crs(&self) -> Option<&Arc<Crs>> {
        match self {
            Geometry::Point(v) => v.crs(),
            Geometry::LineString(v) => v.crs(),
            Geometry::Polygon(v) => v.crs(),
            Geometry::MultiPoint(v) => v.crs(),
            Geometry::MultiLineString(v) => v.crs(),
            Geometry::MultiPolygon(v) => v.crs(),
            Geometry::GeometryCollection(v) => v.crs(),
        }
    }

    /// Attaches or clears the coordinate reference system.
    ///
    /// This swaps the shared handle; the descriptor itself is never copied.
    pub fn set_crs(&mut self, crs: Option<Arc<Crs>>) {
        match self {
            Geometry::Point(v) => v.set_crs(crs),
            Geometry::LineString(v) => v.set_crs(crs),
            Geometry::Polygon(v) => v.set_crs(crs),
            Geometry::MultiPoint(v) => v.set_crs(crs),
            Geometry::MultiLineString(v) => v.set_crs(crs),
            Geometry::MultiPolygon(v) => v.set_crs(crs),
            Geometry::GeometryCollection(v) => v.set_crs(crs),
        }
    }

    /// Whether any vertex of the geometry carries a z coordinate.
    pub fn has_z(&self) -> bool {
        match self {
            Geometry::Point(v) => v.has_z(),
            Geometry::LineString(v) => v.has_z(),
            Geometry::Polygon(v) => v.has_z(),
            Geometry::MultiPoint(v) => v.has_z(),
            Geometry::MultiLineString(v) => v.has_z(),
            Geometry::MultiPolygon(v) => v.has_z(),
            Geometry::GeometryCollection(v) => v.has_z(),
        }
    }

    /// Whether the geometry has no vertices or members.
    ///
    /// A point always has a coordinate and is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::LineString(v) => v.is_empty(),
            Geometry::Polygon(v) => v.is_empty(),
            Geometry::MultiPoint(v) => v.is_empty(),
            Geometry::MultiLineString(v) => v.is_empty(),
            Geometry::MultiPolygon(v) => v.is_empty(),
            Geometry::GeometryCollection(v) => v.is_empty(),
        }
    }
}

impl From<Point> for Geometry {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

impl From<LineString> for Geometry {
    fn from(value: LineString) -> Self {
        Self::LineString(value)
    }
}

impl From<Polygon> for Geometry {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

impl From<MultiPoint> for Geometry {
    fn from(value: MultiPoint) -> Self {
        Self::MultiPoint(value)
    }
}

impl From<MultiLineString> for Geometry {
    fn from(value: MultiLineString) -> Self {
        Self::MultiLineString(value)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(value: MultiPolygon) -> Self {
        Self::MultiPolygon(value)
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(value: GeometryCollection) -> Self {
        Self::GeometryCollection(value)
    }
}

fn conversion_error(expected: GeometryKind, got: GeometryKind) -> MeridianTypesError {
    MeridianTypesError::Conversion(format!("expected {expected}, got {got}"))
}

impl TryFrom<Geometry> for Point {
    type Error = MeridianTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::Point(v) => Ok(v),
            other => Err(conversion_error(GeometryKind::Point, other.kind())),
        }
    }
}

impl TryFrom<Geometry> for LineString {
    type Error = MeridianTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::LineString(v) => Ok(v),
            other => Err(conversion_error(GeometryKind::LineString, other.kind())),
        }
    }
}

impl TryFrom<Geometry> for Polygon {
    type Error = MeridianTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::Polygon(v) => Ok(v),
            other => Err(conversion_error(GeometryKind::Polygon, other.kind())),
        }
    }
}

impl TryFrom<Geometry> for MultiPoint {
    type Error = MeridianTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::MultiPoint(v) => Ok(v),
            other => Err(conversion_error(GeometryKind::MultiPoint, other.kind())),
        }
    }
}

impl TryFrom<Geometry> for MultiLineString {
    type Error = MeridianTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::MultiLineString(v) => Ok(v),
            other => Err(conversion_error(
                GeometryKind::MultiLineString,
                other.kind(),
            )),
        }
    }
}

impl TryFrom<Geometry> for MultiPolygon {
    type Error = MeridianTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::MultiPolygon(v) => Ok(v),
            other => Err(conversion_error(GeometryKind::MultiPolygon, other.kind())),
        }
    }
}

impl TryFrom<Geometry> for GeometryCollection {
    type Error = MeridianTypesError;

    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        match value {
            Geometry::GeometryCollection(v) => Ok(v),
            other => Err(conversion_error(
                GeometryKind::GeometryCollection,
                other.kind(),
            )),
        }
    }
}

/// Geometry kind with its canonical well-known binary type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Point, type code 1.
    Point = 1,
    /// Line string, type code 2.
    LineString = 2,
    /// Polygon, type code 3.
    Polygon = 3,
    /// Multi point, type code 4.
    MultiPoint = 4,
    /// Multi line string, type code 5.
    MultiLineString = 5,
    /// Multi polygon, type code 6.
    MultiPolygon = 6,
    /// Geometry collection, type code 7.
    GeometryCollection = 7,
}

impl GeometryKind {
    /// Strips dimensionality flag bits from a type code, leaving the code of
    /// the base kind.
    pub fn flatten_type_code(code: u32) -> u32 {
        code & !TYPE_CODE_Z_BIT
    }

    /// Maps a type code to a kind, flattening it first.
    ///
    /// Returns `None` for codes outside the recognized set.
    pub fn from_type_code(code: u32) -> Option<Self> {
        match Self::flatten_type_code(code) {
            1 => Some(GeometryKind::Point),
            2 => Some(GeometryKind::LineString),
            3 => Some(GeometryKind::Polygon),
            4 => Some(GeometryKind::MultiPoint),
            5 => Some(GeometryKind::MultiLineString),
            6 => Some(GeometryKind::MultiPolygon),
            7 => Some(GeometryKind::GeometryCollection),
            _ => None,
        }
    }

    /// The flattened type code of this kind.
    pub fn type_code(self) -> u32 {
        self as u32
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Coord;

    #[test]
    fn type_codes_round_trip() {
        for code in 1..=7 {
            let kind = GeometryKind::from_type_code(code).unwrap();
            assert_eq!(kind.type_code(), code);
        }

        assert_eq!(GeometryKind::from_type_code(0), None);
        assert_eq!(GeometryKind::from_type_code(8), None);
        assert_eq!(GeometryKind::from_type_code(255), None);
    }

    #[test]
    fn flattening_strips_the_z_bit() {
        assert_eq!(
            GeometryKind::from_type_code(1 | TYPE_CODE_Z_BIT),
            Some(GeometryKind::Point)
        );
        assert_eq!(
            GeometryKind::from_type_code(7 | TYPE_CODE_Z_BIT),
            Some(GeometryKind::GeometryCollection)
        );
        assert_eq!(GeometryKind::from_type_code(8 | TYPE_CODE_Z_BIT), None);
    }

    #[test]
    fn conversion_to_wrong_variant_fails() {
        let geometry = Geometry::Point(Point::new(1.0, 2.0));
        let err = Polygon::try_from(geometry).unwrap_err();
        assert_eq!(
            err,
            MeridianTypesError::Conversion("expected Polygon, got Point".into())
        );
    }

    #[test]
    fn crs_is_shared_not_copied() {
        let crs = Arc::new(Crs::wgs84());
        let mut geometry = Geometry::Point(Point::new(1.0, 2.0));
        geometry.set_crs(Some(crs.clone()));

        assert_eq!(Arc::strong_count(&crs), 2);
        assert!(Arc::ptr_eq(geometry.crs().unwrap(), &crs));

        drop(geometry);
        assert_eq!(Arc::strong_count(&crs), 1);
    }

    #[test]
    fn geometry_serde_round_trip() {
        let geometry = Geometry::LineString(LineString::new(vec![
            Coord::new(0.0, 0.0),
            Coord::with_z(1.0, 2.0, 3.0),
        ]));

        let json = serde_json::to_string(&geometry).unwrap();
        let restored: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, geometry);
    }
}
