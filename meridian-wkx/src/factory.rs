//! Creation, destruction and shape normalization of geometries.
//!
//! This is the consumer-facing surface of the crate: construct from either
//! well-known format, construct empty by type code, destroy, and the two
//! polygon normalization transforms.

use std::sync::Arc;

use meridian_types::{
    Crs, Geometry, GeometryCollection, GeometryKind, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

use crate::error::MeridianWkxError;
use crate::wkt::WktCursor;
use crate::{wkb, wkt};

/// Creates a geometry from its well-known binary representation.
///
/// On success the spatial reference is attached to the returned geometry.
/// On failure nothing is attached and every partially decoded child has
/// already been released.
pub fn from_wkb(data: &[u8], crs: Option<Arc<Crs>>) -> Result<Geometry, MeridianWkxError> {
    let mut geometry = wkb::read_geometry(data)?;
    geometry.set_crs(crs);
    Ok(geometry)
}

/// Creates a geometry from well-known text, advancing the cursor exactly
/// past the consumed text.
///
/// After a failure the cursor position is unspecified; reset it before
/// reusing the input.
pub fn from_wkt_cursor(
    cursor: &mut WktCursor<'_>,
    crs: Option<Arc<Crs>>,
) -> Result<Geometry, MeridianWkxError> {
    let mut geometry = wkt::read_geometry(cursor)?;
    geometry.set_crs(crs);
    Ok(geometry)
}

/// Creates a geometry from well-known text.
///
/// Trailing input after the geometry is ignored; use [`from_wkt_cursor`] to
/// learn where the geometry text ends.
pub fn from_wkt(input: &str, crs: Option<Arc<Crs>>) -> Result<Geometry, MeridianWkxError> {
    from_wkt_cursor(&mut WktCursor::new(input), crs)
}

/// Creates an empty geometry of the kind a type code names, flattening
/// dimensionality flags first.
///
/// Returns `None` for codes outside the recognized set. Pure allocation, no
/// parsing.
pub fn create_geometry(type_code: u32) -> Option<Geometry> {
    Some(match GeometryKind::from_type_code(type_code)? {
        GeometryKind::Point => Geometry::Point(Point::default()),
        GeometryKind::LineString => Geometry::LineString(LineString::default()),
        GeometryKind::Polygon => Geometry::Polygon(Polygon::default()),
        GeometryKind::MultiPoint => Geometry::MultiPoint(MultiPoint::default()),
        GeometryKind::MultiLineString => Geometry::MultiLineString(MultiLineString::default()),
        GeometryKind::MultiPolygon => Geometry::MultiPolygon(MultiPolygon::default()),
        GeometryKind::GeometryCollection => {
            Geometry::GeometryCollection(GeometryCollection::default())
        }
    })
}

/// Destroys a geometry, releasing all of its children and its spatial
/// reference hold.
///
/// Consuming the value makes the release transitive and exactly-once;
/// geometries going out of scope release the same way.
pub fn destroy_geometry(geometry: Geometry) {
    drop(geometry);
}

/// Merges a geometry collection or multi polygon into a single polygon.
///
/// Every polygon member contributes its exterior ring and then its interior
/// rings, in encounter order; the first contributed ring becomes the
/// output's exterior. Members of other kinds are skipped. The rings are
/// merged as stored, without any nesting or validity check. Any other input
/// is returned unchanged.
pub fn force_to_polygon(geometry: Geometry) -> Geometry {
    let crs = geometry.crs().cloned();
    let members: Vec<Geometry> = match geometry {
        Geometry::GeometryCollection(collection) => collection.geometries,
        Geometry::MultiPolygon(multi) => {
            multi.polygons.into_iter().map(Geometry::Polygon).collect()
        }
        other => return other,
    };

    let mut polygon = Polygon::default();
    for member in members {
        let Geometry::Polygon(other) = member else {
            continue;
        };
        polygon.add_ring(other.exterior);
        for ring in other.interiors {
            polygon.add_ring(ring);
        }
    }

    polygon.set_crs(crs);
    Geometry::Polygon(polygon)
}

/// Wraps a polygon as the sole member of a new multi polygon.
///
/// Any other input is returned unchanged. No attempt is made to split a
/// polygon into component islands.
pub fn force_to_multi_polygon(geometry: Geometry) -> Geometry {
    match geometry {
        Geometry::Polygon(polygon) => {
            let crs = polygon.crs().cloned();
            let mut multi = MultiPolygon::new(vec![polygon]);
            multi.set_crs(crs);
            Geometry::MultiPolygon(multi)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use meridian_types::{Coord, LinearRing, TYPE_CODE_Z_BIT};

    use super::*;
    use crate::wkb::ByteOrder;

    fn ring(offset: f64) -> LinearRing {
        LinearRing::new(vec![
            Coord::new(offset, offset),
            Coord::new(offset + 4.0, offset),
            Coord::new(offset + 4.0, offset + 4.0),
            Coord::new(offset, offset),
        ])
    }

    fn square(offset: f64) -> Polygon {
        Polygon::new(ring(offset), vec![])
    }

    #[test]
    fn create_geometry_covers_the_type_code_range() {
        for (code, kind) in [
            (1, GeometryKind::Point),
            (2, GeometryKind::LineString),
            (3, GeometryKind::Polygon),
            (4, GeometryKind::MultiPoint),
            (5, GeometryKind::MultiLineString),
            (6, GeometryKind::MultiPolygon),
            (7, GeometryKind::GeometryCollection),
        ] {
            let geometry = create_geometry(code).expect("recognized code");
            assert_eq!(geometry.kind(), kind);
            assert!(geometry.crs().is_none());
        }

        assert!(create_geometry(0).is_none());
        assert!(create_geometry(8).is_none());
        assert!(create_geometry(255).is_none());
    }

    #[test]
    fn create_geometry_flattens_the_code() {
        let geometry = create_geometry(1 | TYPE_CODE_Z_BIT).expect("flagged point code");
        assert_eq!(geometry.kind(), GeometryKind::Point);
    }

    #[test]
    fn from_wkb_attaches_crs_on_success() {
        let crs = Arc::new(Crs::wgs84());
        let data = wkb::write_geometry(
            &Geometry::Point(Point::new(30.0, 10.0)),
            ByteOrder::LittleEndian,
        );

        let geometry = from_wkb(&data, Some(crs.clone())).expect("decode failed");
        assert!(Arc::ptr_eq(geometry.crs().expect("crs attached"), &crs));
        assert_eq!(Arc::strong_count(&crs), 2);

        destroy_geometry(geometry);
        assert_eq!(Arc::strong_count(&crs), 1);
    }

    #[test]
    fn failed_decode_attaches_nothing() {
        let crs = Arc::new(Crs::wgs84());

        // Unknown type code 8 in an otherwise well-formed header.
        let result = from_wkb(&[0x01, 0x08, 0x00, 0x00, 0x00], Some(crs.clone()));
        assert_matches!(result, Err(MeridianWkxError::UnsupportedGeometryType(_)));
        assert_eq!(Arc::strong_count(&crs), 1);
    }

    #[test]
    fn from_wkt_cursor_reports_where_the_geometry_ends() {
        let mut cursor = WktCursor::new("POINT (30 10),POINT (40 20)");
        let geometry = from_wkt_cursor(&mut cursor, None).expect("decode failed");

        assert_eq!(geometry, Geometry::Point(Point::new(30.0, 10.0)));
        assert_eq!(cursor.position(), "POINT (30 10)".len());
    }

    #[test]
    fn force_to_polygon_merges_multi_polygon_rings() {
        let mut two_ring = square(10.0);
        two_ring.interiors.push(ring(11.0));
        let multi = Geometry::MultiPolygon(MultiPolygon::new(vec![square(0.0), two_ring]));

        let Geometry::Polygon(merged) = force_to_polygon(multi) else {
            panic!("expected a polygon");
        };
        assert_eq!(merged.ring_count(), 3);
        assert_eq!(merged.exterior, ring(0.0));
        assert_eq!(merged.interiors, vec![ring(10.0), ring(11.0)]);
    }

    #[test]
    fn force_to_polygon_skips_non_polygon_members() {
        let collection = Geometry::GeometryCollection(GeometryCollection::new(vec![
            Geometry::Point(Point::new(1.0, 1.0)),
            Geometry::Polygon(square(0.0)),
            Geometry::Polygon(square(5.0)),
        ]));

        let Geometry::Polygon(merged) = force_to_polygon(collection) else {
            panic!("expected a polygon");
        };
        assert_eq!(merged.ring_count(), 2);
        assert_eq!(merged.exterior, ring(0.0));
        assert_eq!(merged.interiors, vec![ring(5.0)]);
    }

    #[test]
    fn force_to_polygon_leaves_other_kinds_unchanged() {
        let polygon = Geometry::Polygon(square(0.0));
        assert_eq!(force_to_polygon(polygon.clone()), polygon);

        let point = Geometry::Point(Point::new(1.0, 2.0));
        assert_eq!(force_to_polygon(point.clone()), point);
    }

    #[test]
    fn force_to_polygon_carries_the_crs() {
        let crs = Arc::new(Crs::epsg(3857));
        let mut multi = Geometry::MultiPolygon(MultiPolygon::new(vec![square(0.0)]));
        multi.set_crs(Some(crs.clone()));

        let merged = force_to_polygon(multi);
        assert!(Arc::ptr_eq(merged.crs().expect("crs carried"), &crs));
    }

    #[test]
    fn force_to_multi_polygon_wraps_a_polygon() {
        let polygon = square(0.0);
        let Geometry::MultiPolygon(multi) = force_to_multi_polygon(Geometry::Polygon(polygon.clone()))
        else {
            panic!("expected a multi polygon");
        };
        assert_eq!(multi.polygons, vec![polygon]);
    }

    #[test]
    fn force_to_multi_polygon_leaves_other_kinds_unchanged() {
        let multi = Geometry::MultiPolygon(MultiPolygon::new(vec![square(0.0)]));
        assert_eq!(force_to_multi_polygon(multi.clone()), multi);

        let line = Geometry::LineString(LineString::new(vec![Coord::new(0.0, 0.0)]));
        assert_eq!(force_to_multi_polygon(line.clone()), line);
    }

    #[test]
    fn formats_agree_on_the_same_geometry() {
        let text = "MULTIPOLYGON (((0 0,4 0,4 4,0 4,0 0)),((10 10,14 10,14 14,10 14,10 10)))";
        let from_text = from_wkt(text, None).expect("decode failed");

        let data = wkb::write_geometry(&from_text, ByteOrder::BigEndian);
        let from_binary = from_wkb(&data, None).expect("decode failed");

        assert_eq!(from_binary, from_text);
        assert_eq!(wkt::write_geometry(&from_binary), text);
    }
}
