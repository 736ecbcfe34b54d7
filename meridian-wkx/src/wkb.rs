//! Well-known binary reader and writer.
//!
//! Every record is one byte-order marker, a four byte type code read in the
//! declared order, and a type specific payload. Collection payloads hold a
//! count followed by that many fully tagged child records, so every record
//! (including nested ones) declares its own byte order.

use bytes::{Buf, BufMut};
use meridian_types::{
    Coord, Geometry, GeometryCollection, GeometryKind, LineString, LinearRing, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, TYPE_CODE_Z_BIT,
};

use crate::error::MeridianWkxError;
use crate::MAX_NESTING_DEPTH;

/// Byte order of a well-known binary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first (XDR), marker byte 0.
    BigEndian,
    /// Least significant byte first (NDR), marker byte 1.
    LittleEndian,
}

/// One byte-order marker plus a four byte type code.
const HEADER_SIZE: usize = 5;

/// Reads one geometry from its well-known binary representation.
///
/// The buffer must hold a complete record; trailing bytes are ignored. The
/// number of bytes consumed is not reported; call [`wkb_size`] on the result
/// when the caller needs to know where the record ended.
pub fn read_geometry(data: &[u8]) -> Result<Geometry, MeridianWkxError> {
    if data.len() < HEADER_SIZE {
        return Err(MeridianWkxError::NotEnoughData);
    }

    let mut buf = data;
    read_tagged(&mut buf, 0)
}

fn read_tagged(buf: &mut &[u8], depth: usize) -> Result<Geometry, MeridianWkxError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(MeridianWkxError::CorruptData(format!(
            "collections nested deeper than {MAX_NESTING_DEPTH} levels"
        )));
    }

    if buf.remaining() < HEADER_SIZE {
        return Err(MeridianWkxError::NotEnoughData);
    }

    // The marker byte is the primary corruption gate: a foreign buffer
    // almost never starts a record with 0 or 1.
    let head = buf.chunk();
    let order = match head[0] {
        0 => ByteOrder::BigEndian,
        1 => ByteOrder::LittleEndian,
        other => {
            log::debug!(
                "corrupt record, leading bytes {:02x?}",
                &head[..head.len().min(9)]
            );
            return Err(MeridianWkxError::CorruptData(format!(
                "invalid byte order marker {other:#04x}"
            )));
        }
    };
    buf.advance(1);

    let code = read_u32(buf, order)?;
    let kind = GeometryKind::from_type_code(code)
        .ok_or_else(|| MeridianWkxError::UnsupportedGeometryType(format!("type code {code}")))?;
    let has_z = code & TYPE_CODE_Z_BIT != 0;

    match kind {
        GeometryKind::Point => Ok(Geometry::Point(Point::from_coord(read_coord(
            buf, order, has_z,
        )?))),
        GeometryKind::LineString => Ok(Geometry::LineString(LineString::new(
            read_coord_sequence(buf, order, has_z)?,
        ))),
        GeometryKind::Polygon => Ok(Geometry::Polygon(read_polygon_body(buf, order, has_z)?)),
        GeometryKind::MultiPoint => Ok(Geometry::MultiPoint(read_multi_point_body(
            buf, order, depth,
        )?)),
        GeometryKind::MultiLineString => Ok(Geometry::MultiLineString(
            read_multi_line_string_body(buf, order, depth)?,
        )),
        GeometryKind::MultiPolygon => Ok(Geometry::MultiPolygon(read_multi_polygon_body(
            buf, order, depth,
        )?)),
        GeometryKind::GeometryCollection => Ok(Geometry::GeometryCollection(
            read_collection_body(buf, order, depth)?,
        )),
    }
}

fn read_u32(buf: &mut &[u8], order: ByteOrder) -> Result<u32, MeridianWkxError> {
    if buf.remaining() < 4 {
        return Err(MeridianWkxError::NotEnoughData);
    }
    Ok(match order {
        ByteOrder::BigEndian => buf.get_u32(),
        ByteOrder::LittleEndian => buf.get_u32_le(),
    })
}

fn read_f64(buf: &mut &[u8], order: ByteOrder) -> Result<f64, MeridianWkxError> {
    if buf.remaining() < 8 {
        return Err(MeridianWkxError::NotEnoughData);
    }
    Ok(match order {
        ByteOrder::BigEndian => buf.get_f64(),
        ByteOrder::LittleEndian => buf.get_f64_le(),
    })
}

/// Reads an element count and checks it against the bytes actually left, so
/// a hostile count cannot drive allocation.
fn read_count(
    buf: &mut &[u8],
    order: ByteOrder,
    min_element_size: usize,
) -> Result<usize, MeridianWkxError> {
    let count = read_u32(buf, order)? as usize;
    if count.saturating_mul(min_element_size) > buf.remaining() {
        return Err(MeridianWkxError::NotEnoughData);
    }
    Ok(count)
}

fn coord_size(has_z: bool) -> usize {
    if has_z {
        24
    } else {
        16
    }
}

fn read_coord(buf: &mut &[u8], order: ByteOrder, has_z: bool) -> Result<Coord, MeridianWkxError> {
    let x = read_f64(buf, order)?;
    let y = read_f64(buf, order)?;
    if has_z {
        Ok(Coord::with_z(x, y, read_f64(buf, order)?))
    } else {
        Ok(Coord::new(x, y))
    }
}

fn read_coord_sequence(
    buf: &mut &[u8],
    order: ByteOrder,
    has_z: bool,
) -> Result<Vec<Coord>, MeridianWkxError> {
    let count = read_count(buf, order, coord_size(has_z))?;
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        points.push(read_coord(buf, order, has_z)?);
    }
    Ok(points)
}

fn read_polygon_body(
    buf: &mut &[u8],
    order: ByteOrder,
    has_z: bool,
) -> Result<Polygon, MeridianWkxError> {
    // Rings are bare coordinate sequences without their own record header.
    let ring_count = read_count(buf, order, 4)?;
    let mut rings = Vec::with_capacity(ring_count);
    for _ in 0..ring_count {
        rings.push(LinearRing::new(read_coord_sequence(buf, order, has_z)?));
    }

    let mut rings = rings.into_iter();
    let exterior = rings.next().unwrap_or_default();
    Ok(Polygon::new(exterior, rings.collect()))
}

fn read_multi_point_body(
    buf: &mut &[u8],
    order: ByteOrder,
    depth: usize,
) -> Result<MultiPoint, MeridianWkxError> {
    let count = read_count(buf, order, HEADER_SIZE)?;
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let child = read_tagged(buf, depth + 1)?;
        points.push(
            Point::try_from(child).map_err(|e| MeridianWkxError::CorruptData(e.to_string()))?,
        );
    }
    Ok(MultiPoint::new(points))
}

fn read_multi_line_string_body(
    buf: &mut &[u8],
    order: ByteOrder,
    depth: usize,
) -> Result<MultiLineString, MeridianWkxError> {
    let count = read_count(buf, order, HEADER_SIZE)?;
    let mut lines = Vec::with_capacity(count);
    for _ in 0..count {
        let child = read_tagged(buf, depth + 1)?;
        lines.push(
            LineString::try_from(child)
                .map_err(|e| MeridianWkxError::CorruptData(e.to_string()))?,
        );
    }
    Ok(MultiLineString::new(lines))
}

fn read_multi_polygon_body(
    buf: &mut &[u8],
    order: ByteOrder,
    depth: usize,
) -> Result<MultiPolygon, MeridianWkxError> {
    let count = read_count(buf, order, HEADER_SIZE)?;
    let mut polygons = Vec::with_capacity(count);
    for _ in 0..count {
        let child = read_tagged(buf, depth + 1)?;
        polygons.push(
            Polygon::try_from(child).map_err(|e| MeridianWkxError::CorruptData(e.to_string()))?,
        );
    }
    Ok(MultiPolygon::new(polygons))
}

fn read_collection_body(
    buf: &mut &[u8],
    order: ByteOrder,
    depth: usize,
) -> Result<GeometryCollection, MeridianWkxError> {
    let count = read_count(buf, order, HEADER_SIZE)?;
    let mut geometries = Vec::with_capacity(count);
    for _ in 0..count {
        geometries.push(read_tagged(buf, depth + 1)?);
    }
    Ok(GeometryCollection::new(geometries))
}

/// Encodes the geometry in its well-known binary representation.
pub fn write_geometry(geometry: &Geometry, order: ByteOrder) -> Vec<u8> {
    let mut out = Vec::with_capacity(wkb_size(geometry));
    write_tagged(&mut out, geometry, order);
    out
}

/// The exact number of bytes [`write_geometry`] produces for the geometry.
pub fn wkb_size(geometry: &Geometry) -> usize {
    match geometry {
        Geometry::Point(point) => point_size(point),
        Geometry::LineString(line) => line_string_size(line),
        Geometry::Polygon(polygon) => polygon_size(polygon),
        Geometry::MultiPoint(multi) => {
            HEADER_SIZE + 4 + multi.points.iter().map(point_size).sum::<usize>()
        }
        Geometry::MultiLineString(multi) => {
            HEADER_SIZE + 4 + multi.lines.iter().map(line_string_size).sum::<usize>()
        }
        Geometry::MultiPolygon(multi) => {
            HEADER_SIZE + 4 + multi.polygons.iter().map(polygon_size).sum::<usize>()
        }
        Geometry::GeometryCollection(collection) => {
            HEADER_SIZE + 4 + collection.geometries.iter().map(wkb_size).sum::<usize>()
        }
    }
}

fn point_size(point: &Point) -> usize {
    HEADER_SIZE + coord_size(point.has_z())
}

fn line_string_size(line: &LineString) -> usize {
    HEADER_SIZE + 4 + line.points.len() * coord_size(line.has_z())
}

fn polygon_size(polygon: &Polygon) -> usize {
    let coord = coord_size(polygon.has_z());
    let mut size = HEADER_SIZE + 4;
    if !polygon.is_empty() {
        size += 4 + polygon.exterior.points.len() * coord;
        for ring in &polygon.interiors {
            size += 4 + ring.points.len() * coord;
        }
    }
    size
}

fn write_tagged(out: &mut Vec<u8>, geometry: &Geometry, order: ByteOrder) {
    match geometry {
        Geometry::Point(point) => write_point(out, point, order),
        Geometry::LineString(line) => write_line_string(out, line, order),
        Geometry::Polygon(polygon) => write_polygon(out, polygon, order),
        Geometry::MultiPoint(multi) => {
            write_header(out, GeometryKind::MultiPoint, multi.has_z(), order);
            put_u32(out, multi.points.len() as u32, order);
            for point in &multi.points {
                write_point(out, point, order);
            }
        }
        Geometry::MultiLineString(multi) => {
            write_header(out, GeometryKind::MultiLineString, multi.has_z(), order);
            put_u32(out, multi.lines.len() as u32, order);
            for line in &multi.lines {
                write_line_string(out, line, order);
            }
        }
        Geometry::MultiPolygon(multi) => {
            write_header(out, GeometryKind::MultiPolygon, multi.has_z(), order);
            put_u32(out, multi.polygons.len() as u32, order);
            for polygon in &multi.polygons {
                write_polygon(out, polygon, order);
            }
        }
        Geometry::GeometryCollection(collection) => {
            write_header(out, GeometryKind::GeometryCollection, collection.has_z(), order);
            put_u32(out, collection.geometries.len() as u32, order);
            for child in &collection.geometries {
                write_tagged(out, child, order);
            }
        }
    }
}

fn write_header(out: &mut Vec<u8>, kind: GeometryKind, has_z: bool, order: ByteOrder) {
    out.put_u8(match order {
        ByteOrder::BigEndian => 0,
        ByteOrder::LittleEndian => 1,
    });
    let code = kind.type_code() | if has_z { TYPE_CODE_Z_BIT } else { 0 };
    put_u32(out, code, order);
}

fn write_point(out: &mut Vec<u8>, point: &Point, order: ByteOrder) {
    write_header(out, GeometryKind::Point, point.has_z(), order);
    write_coord(out, point.coord, point.has_z(), order);
}

fn write_line_string(out: &mut Vec<u8>, line: &LineString, order: ByteOrder) {
    write_header(out, GeometryKind::LineString, line.has_z(), order);
    write_coord_sequence(out, &line.points, line.has_z(), order);
}

fn write_polygon(out: &mut Vec<u8>, polygon: &Polygon, order: ByteOrder) {
    let has_z = polygon.has_z();
    write_header(out, GeometryKind::Polygon, has_z, order);
    put_u32(out, polygon.ring_count() as u32, order);
    if !polygon.is_empty() {
        write_coord_sequence(out, &polygon.exterior.points, has_z, order);
        for ring in &polygon.interiors {
            write_coord_sequence(out, &ring.points, has_z, order);
        }
    }
}

fn write_coord_sequence(out: &mut Vec<u8>, points: &[Coord], has_z: bool, order: ByteOrder) {
    put_u32(out, points.len() as u32, order);
    for coord in points {
        write_coord(out, *coord, has_z, order);
    }
}

fn write_coord(out: &mut Vec<u8>, coord: Coord, has_z: bool, order: ByteOrder) {
    put_f64(out, coord.x, order);
    put_f64(out, coord.y, order);
    if has_z {
        // A z-less vertex inside a z geometry encodes elevation zero.
        put_f64(out, coord.z.unwrap_or(0.0), order);
    }
}

fn put_u32(out: &mut Vec<u8>, value: u32, order: ByteOrder) {
    match order {
        ByteOrder::BigEndian => out.put_u32(value),
        ByteOrder::LittleEndian => out.put_u32_le(value),
    }
}

fn put_f64(out: &mut Vec<u8>, value: f64, order: ByteOrder) {
    match order {
        ByteOrder::BigEndian => out.put_f64(value),
        ByteOrder::LittleEndian => out.put_f64_le(value),
    }
}
