//! Well-known text reader and writer.
//!
//! The grammar is `KEYWORD '(' body ')'` with case-insensitive keywords.
//! Bodies are whitespace-separated numbers in comma-separated, possibly
//! nested parenthesized lists; `EMPTY` stands in for the body of an empty
//! geometry.

use meridian_types::{
    Coord, Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

use crate::error::MeridianWkxError;
use crate::MAX_NESTING_DEPTH;

/// Tokens longer than this are rejected; no keyword or realistic numeric
/// literal comes close.
const MAX_TOKEN_LEN: usize = 64;

/// A read position over well-known text input.
///
/// Every successful read advances the cursor past the consumed text. After
/// a failed read the position is unspecified; reset the cursor before
/// reusing the input.
#[derive(Debug, Clone)]
pub struct WktCursor<'a> {
    input: &'a str,
    pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    LParen,
    RParen,
    Comma,
    Word(&'a str),
}

impl<'a> WktCursor<'a> {
    /// Creates a cursor at the start of the input.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Next token, or `None` at the end of the input.
    fn next_token(&mut self) -> Result<Option<Token<'a>>, MeridianWkxError> {
        self.skip_whitespace();
        let rest = self.rest();
        let Some(first) = rest.chars().next() else {
            return Ok(None);
        };

        Ok(Some(match first {
            '(' => {
                self.pos += 1;
                Token::LParen
            }
            ')' => {
                self.pos += 1;
                Token::RParen
            }
            ',' => {
                self.pos += 1;
                Token::Comma
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | ','))
                    .unwrap_or(rest.len());
                if end > MAX_TOKEN_LEN {
                    return Err(MeridianWkxError::CorruptData(format!(
                        "token longer than {MAX_TOKEN_LEN} characters"
                    )));
                }
                self.pos += end;
                Token::Word(&rest[..end])
            }
        }))
    }

    fn peek_token(&self) -> Result<Option<Token<'a>>, MeridianWkxError> {
        let mut lookahead = self.clone();
        lookahead.next_token()
    }
}

/// Reads one geometry from the cursor, advancing it exactly past the
/// consumed text.
pub fn read_geometry(cursor: &mut WktCursor<'_>) -> Result<Geometry, MeridianWkxError> {
    read_nested(cursor, 0)
}

fn read_nested(cursor: &mut WktCursor<'_>, depth: usize) -> Result<Geometry, MeridianWkxError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(MeridianWkxError::CorruptData(format!(
            "collections nested deeper than {MAX_NESTING_DEPTH} levels"
        )));
    }

    let keyword = match cursor.next_token()? {
        Some(Token::Word(word)) => word,
        _ => {
            return Err(MeridianWkxError::CorruptData(
                "missing geometry keyword".into(),
            ))
        }
    };

    if keyword.eq_ignore_ascii_case("POINT") {
        Ok(Geometry::Point(read_point_body(cursor)?))
    } else if keyword.eq_ignore_ascii_case("LINESTRING") {
        Ok(Geometry::LineString(LineString::new(read_coord_list(
            cursor,
        )?)))
    } else if keyword.eq_ignore_ascii_case("POLYGON") {
        Ok(Geometry::Polygon(read_polygon_body(cursor)?))
    } else if keyword.eq_ignore_ascii_case("GEOMETRYCOLLECTION") {
        Ok(Geometry::GeometryCollection(read_collection_body(
            cursor, depth,
        )?))
    } else if keyword.eq_ignore_ascii_case("MULTIPOLYGON") {
        Ok(Geometry::MultiPolygon(read_multi_polygon_body(cursor)?))
    } else if keyword.eq_ignore_ascii_case("MULTIPOINT") {
        Ok(Geometry::MultiPoint(read_multi_point_body(cursor)?))
    } else if keyword.eq_ignore_ascii_case("MULTILINESTRING") {
        Ok(Geometry::MultiLineString(read_multi_line_string_body(
            cursor,
        )?))
    } else {
        Err(MeridianWkxError::UnsupportedGeometryType(keyword.into()))
    }
}

/// Consumes the opening of a body. Returns `true` if the body was the
/// `EMPTY` keyword instead of a parenthesized list.
fn open_body(cursor: &mut WktCursor<'_>) -> Result<bool, MeridianWkxError> {
    match cursor.next_token()? {
        Some(Token::LParen) => Ok(false),
        Some(Token::Word(word)) if word.eq_ignore_ascii_case("EMPTY") => Ok(true),
        _ => Err(MeridianWkxError::CorruptData(
            "expected '(' to open a geometry body".into(),
        )),
    }
}

fn expect_r_paren(cursor: &mut WktCursor<'_>) -> Result<(), MeridianWkxError> {
    match cursor.next_token()? {
        Some(Token::RParen) => Ok(()),
        _ => Err(MeridianWkxError::CorruptData("expected ')'".into())),
    }
}

fn read_number(cursor: &mut WktCursor<'_>) -> Result<f64, MeridianWkxError> {
    match cursor.next_token()? {
        Some(Token::Word(word)) => word.parse::<f64>().map_err(|_| {
            MeridianWkxError::CorruptData(format!("invalid numeric literal '{word}'"))
        }),
        _ => Err(MeridianWkxError::CorruptData(
            "expected a numeric literal".into(),
        )),
    }
}

fn read_coord(cursor: &mut WktCursor<'_>) -> Result<Coord, MeridianWkxError> {
    let x = read_number(cursor)?;
    let y = read_number(cursor)?;
    // A third number before the separator is the optional z.
    if let Some(Token::Word(_)) = cursor.peek_token()? {
        Ok(Coord::with_z(x, y, read_number(cursor)?))
    } else {
        Ok(Coord::new(x, y))
    }
}

fn read_point_body(cursor: &mut WktCursor<'_>) -> Result<Point, MeridianWkxError> {
    if open_body(cursor)? {
        return Err(MeridianWkxError::CorruptData(
            "a point cannot be EMPTY".into(),
        ));
    }
    let coord = read_coord(cursor)?;
    expect_r_paren(cursor)?;
    Ok(Point::from_coord(coord))
}

fn read_coord_list(cursor: &mut WktCursor<'_>) -> Result<Vec<Coord>, MeridianWkxError> {
    if open_body(cursor)? {
        return Ok(vec![]);
    }

    let mut points = vec![read_coord(cursor)?];
    loop {
        match cursor.next_token()? {
            Some(Token::Comma) => points.push(read_coord(cursor)?),
            Some(Token::RParen) => return Ok(points),
            _ => {
                return Err(MeridianWkxError::CorruptData(
                    "expected ',' or ')' in a coordinate list".into(),
                ))
            }
        }
    }
}

fn read_polygon_body(cursor: &mut WktCursor<'_>) -> Result<Polygon, MeridianWkxError> {
    if open_body(cursor)? {
        return Ok(Polygon::default());
    }

    let mut rings = vec![LinearRing::new(read_coord_list(cursor)?)];
    loop {
        match cursor.next_token()? {
            Some(Token::Comma) => rings.push(LinearRing::new(read_coord_list(cursor)?)),
            Some(Token::RParen) => break,
            _ => {
                return Err(MeridianWkxError::CorruptData(
                    "expected ',' or ')' in a ring list".into(),
                ))
            }
        }
    }

    let mut rings = rings.into_iter();
    let exterior = rings.next().unwrap_or_default();
    Ok(Polygon::new(exterior, rings.collect()))
}

fn read_multi_point_body(cursor: &mut WktCursor<'_>) -> Result<MultiPoint, MeridianWkxError> {
    if open_body(cursor)? {
        return Ok(MultiPoint::default());
    }

    let mut points = vec![read_multi_point_member(cursor)?];
    loop {
        match cursor.next_token()? {
            Some(Token::Comma) => points.push(read_multi_point_member(cursor)?),
            Some(Token::RParen) => return Ok(MultiPoint::new(points)),
            _ => {
                return Err(MeridianWkxError::CorruptData(
                    "expected ',' or ')' in a point list".into(),
                ))
            }
        }
    }
}

/// A multi point member is either bare `x y` or parenthesized `(x y)`;
/// both forms occur in the wild.
fn read_multi_point_member(cursor: &mut WktCursor<'_>) -> Result<Point, MeridianWkxError> {
    if cursor.peek_token()? == Some(Token::LParen) {
        cursor.next_token()?;
        let coord = read_coord(cursor)?;
        expect_r_paren(cursor)?;
        Ok(Point::from_coord(coord))
    } else {
        Ok(Point::from_coord(read_coord(cursor)?))
    }
}

fn read_multi_line_string_body(
    cursor: &mut WktCursor<'_>,
) -> Result<MultiLineString, MeridianWkxError> {
    if open_body(cursor)? {
        return Ok(MultiLineString::default());
    }

    let mut lines = vec![LineString::new(read_coord_list(cursor)?)];
    loop {
        match cursor.next_token()? {
            Some(Token::Comma) => lines.push(LineString::new(read_coord_list(cursor)?)),
            Some(Token::RParen) => return Ok(MultiLineString::new(lines)),
            _ => {
                return Err(MeridianWkxError::CorruptData(
                    "expected ',' or ')' in a line list".into(),
                ))
            }
        }
    }
}

fn read_multi_polygon_body(cursor: &mut WktCursor<'_>) -> Result<MultiPolygon, MeridianWkxError> {
    if open_body(cursor)? {
        return Ok(MultiPolygon::default());
    }

    let mut polygons = vec![read_polygon_body(cursor)?];
    loop {
        match cursor.next_token()? {
            Some(Token::Comma) => polygons.push(read_polygon_body(cursor)?),
            Some(Token::RParen) => return Ok(MultiPolygon::new(polygons)),
            _ => {
                return Err(MeridianWkxError::CorruptData(
                    "expected ',' or ')' in a polygon list".into(),
                ))
            }
        }
    }
}

fn read_collection_body(
    cursor: &mut WktCursor<'_>,
    depth: usize,
) -> Result<GeometryCollection, MeridianWkxError> {
    if open_body(cursor)? {
        return Ok(GeometryCollection::default());
    }

    let mut geometries = vec![read_nested(cursor, depth + 1)?];
    loop {
        match cursor.next_token()? {
            Some(Token::Comma) => geometries.push(read_nested(cursor, depth + 1)?),
            Some(Token::RParen) => return Ok(GeometryCollection::new(geometries)),
            _ => {
                return Err(MeridianWkxError::CorruptData(
                    "expected ',' or ')' in a collection".into(),
                ))
            }
        }
    }
}

/// Encodes the geometry in its well-known text representation.
///
/// The form is canonical: uppercase keyword, one space before the body, no
/// space after commas, `EMPTY` for empty geometries.
pub fn write_geometry(geometry: &Geometry) -> String {
    let mut out = String::new();
    write_nested(&mut out, geometry);
    out
}

fn write_nested(out: &mut String, geometry: &Geometry) {
    match geometry {
        Geometry::Point(point) => {
            out.push_str("POINT (");
            push_coord(out, point.coord);
            out.push(')');
        }
        Geometry::LineString(line) => {
            out.push_str("LINESTRING ");
            if line.is_empty() {
                out.push_str("EMPTY");
            } else {
                push_coord_list(out, &line.points);
            }
        }
        Geometry::Polygon(polygon) => {
            out.push_str("POLYGON ");
            push_polygon_body(out, polygon);
        }
        Geometry::MultiPoint(multi) => {
            out.push_str("MULTIPOINT ");
            if multi.is_empty() {
                out.push_str("EMPTY");
                return;
            }
            out.push('(');
            for (i, point) in multi.points.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_coord(out, point.coord);
            }
            out.push(')');
        }
        Geometry::MultiLineString(multi) => {
            out.push_str("MULTILINESTRING ");
            if multi.is_empty() {
                out.push_str("EMPTY");
                return;
            }
            out.push('(');
            for (i, line) in multi.lines.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_coord_list(out, &line.points);
            }
            out.push(')');
        }
        Geometry::MultiPolygon(multi) => {
            out.push_str("MULTIPOLYGON ");
            if multi.is_empty() {
                out.push_str("EMPTY");
                return;
            }
            out.push('(');
            for (i, polygon) in multi.polygons.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_polygon_body(out, polygon);
            }
            out.push(')');
        }
        Geometry::GeometryCollection(collection) => {
            out.push_str("GEOMETRYCOLLECTION ");
            if collection.is_empty() {
                out.push_str("EMPTY");
                return;
            }
            out.push('(');
            for (i, child) in collection.geometries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_nested(out, child);
            }
            out.push(')');
        }
    }
}

fn push_polygon_body(out: &mut String, polygon: &Polygon) {
    if polygon.is_empty() {
        out.push_str("EMPTY");
        return;
    }
    out.push('(');
    push_coord_list(out, &polygon.exterior.points);
    for ring in &polygon.interiors {
        out.push(',');
        push_coord_list(out, &ring.points);
    }
    out.push(')');
}

fn push_coord_list(out: &mut String, points: &[Coord]) {
    out.push('(');
    for (i, coord) in points.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_coord(out, *coord);
    }
    out.push(')');
}

fn push_coord(out: &mut String, coord: Coord) {
    out.push_str(&coord.x.to_string());
    out.push(' ');
    out.push_str(&coord.y.to_string());
    if let Some(z) = coord.z {
        out.push(' ');
        out.push_str(&z.to_string());
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;

    fn read(input: &str) -> Result<Geometry, MeridianWkxError> {
        read_geometry(&mut WktCursor::new(input))
    }

    #[test]
    fn point_decodes_and_cursor_stops_past_the_body() {
        let input = "POINT (30 10) and trailing text";
        let mut cursor = WktCursor::new(input);

        let geometry = read_geometry(&mut cursor).expect("decode failed");
        assert_eq!(geometry, Geometry::Point(Point::new(30.0, 10.0)));
        assert_eq!(cursor.position(), "POINT (30 10)".len());
    }

    #[test]
    fn keywords_match_case_insensitively() {
        assert_eq!(
            read("point(30 10)").expect("decode failed"),
            Geometry::Point(Point::new(30.0, 10.0))
        );
        assert_eq!(
            read("MuLtIpOiNt (1 1)").expect("decode failed"),
            Geometry::MultiPoint(MultiPoint::new(vec![Point::new(1.0, 1.0)]))
        );
    }

    #[test]
    fn numeric_forms_decode() {
        let Geometry::LineString(line) =
            read("LINESTRING (1.5 -2.25,3e2 -4E-1,0.5 .25)").expect("decode failed")
        else {
            panic!("expected a line string");
        };

        assert_eq!(line.points.len(), 3);
        assert_abs_diff_eq!(line.points[1].x, 300.0);
        assert_abs_diff_eq!(line.points[1].y, -0.4);
        assert_abs_diff_eq!(line.points[2].y, 0.25);
    }

    #[test]
    fn z_coordinates_decode() {
        assert_eq!(
            read("POINT (1 2 3)").expect("decode failed"),
            Geometry::Point(Point::with_z(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn polygon_with_hole_decodes() {
        let Geometry::Polygon(polygon) =
            read("POLYGON ((0 0,4 0,4 4,0 4,0 0),(1 1,2 1,2 2,1 1))").expect("decode failed")
        else {
            panic!("expected a polygon");
        };

        assert_eq!(polygon.ring_count(), 2);
        assert_eq!(polygon.exterior.points.len(), 5);
        assert_eq!(polygon.interiors[0].points.len(), 4);
    }

    #[test]
    fn multi_polygon_example_decodes() {
        let input = "MULTIPOLYGON (((0 0,4 0,4 4,0 4,0 0)),((10 10,14 10,14 14,10 14,10 10)))";
        let Geometry::MultiPolygon(multi) = read(input).expect("decode failed") else {
            panic!("expected a multi polygon");
        };

        assert_eq!(multi.polygons.len(), 2);
        for polygon in &multi.polygons {
            assert_eq!(polygon.ring_count(), 1);
            assert_eq!(polygon.exterior.points.len(), 5);
        }
    }

    #[test]
    fn multi_point_accepts_both_member_forms() {
        let bare = read("MULTIPOINT (1 2,3 4)").expect("decode failed");
        let parenthesized = read("MULTIPOINT ((1 2),(3 4))").expect("decode failed");
        assert_eq!(bare, parenthesized);
    }

    #[test]
    fn empty_geometries_round_trip() {
        for input in [
            "LINESTRING EMPTY",
            "POLYGON EMPTY",
            "MULTIPOINT EMPTY",
            "MULTILINESTRING EMPTY",
            "MULTIPOLYGON EMPTY",
            "GEOMETRYCOLLECTION EMPTY",
        ] {
            let geometry = read(input).expect("decode failed");
            assert!(geometry.is_empty());
            assert_eq!(write_geometry(&geometry), input);
        }

        assert_matches!(
            read("POINT EMPTY"),
            Err(MeridianWkxError::CorruptData(_))
        );
    }

    #[test]
    fn collection_decodes_recursively() {
        let input = "GEOMETRYCOLLECTION (POINT (4 6),LINESTRING (4 6,7 10))";
        let Geometry::GeometryCollection(collection) = read(input).expect("decode failed") else {
            panic!("expected a collection");
        };

        assert_eq!(collection.geometries.len(), 2);
        assert_eq!(
            collection.geometries[0],
            Geometry::Point(Point::new(4.0, 6.0))
        );
    }

    #[test]
    fn text_round_trip() {
        let fixtures = [
            "POINT (30 10)",
            "POINT (1 2 3)",
            "LINESTRING (30 10,10 30,40 40)",
            "POLYGON ((35 10,45 45,15 40,10 20,35 10),(20 30,35 35,30 20,20 30))",
            "MULTIPOINT (10 40,40 30,20 20,30 10)",
            "MULTILINESTRING ((10 10,20 20,10 40),(40 40,30 30,40 20,30 10))",
            "MULTIPOLYGON (((0 0,4 0,4 4,0 4,0 0)),((10 10,14 10,14 14,10 14,10 10)))",
            "GEOMETRYCOLLECTION (POINT (40 10),LINESTRING (10 10,20 20,10 40),GEOMETRYCOLLECTION (POINT (1 1)))",
        ];

        for input in fixtures {
            let geometry = read(input).expect("decode failed");
            assert_eq!(write_geometry(&geometry), input);
        }
    }

    #[test]
    fn missing_body_is_corrupt() {
        for input in ["POLYGON", "", "   ", "POINT", "((1 2))", "LINESTRING 1 2"] {
            assert_matches!(read(input), Err(MeridianWkxError::CorruptData(_)));
        }
    }

    #[test]
    fn unknown_keyword_is_unsupported() {
        assert_eq!(
            read("BOGUS (1 2)"),
            Err(MeridianWkxError::UnsupportedGeometryType("BOGUS".into()))
        );
    }

    #[test]
    fn malformed_bodies_are_corrupt() {
        for input in [
            "POINT (a b)",
            "POINT (1 2",
            "POINT (1)",
            "LINESTRING (1 1,)",
            "POLYGON (0 0,1 1,1 0,0 0)",
            "MULTIPOINT (1 2,(3 4)",
            "GEOMETRYCOLLECTION (POINT (1 1)",
        ] {
            assert_matches!(read(input), Err(MeridianWkxError::CorruptData(_)));
        }
    }

    #[test]
    fn overlong_token_is_corrupt() {
        let input = format!("{} (1 2)", "P".repeat(MAX_TOKEN_LEN + 1));
        assert_matches!(read(&input), Err(MeridianWkxError::CorruptData(_)));
    }

    #[test]
    fn nesting_deeper_than_cap_is_corrupt() {
        let depth = MAX_NESTING_DEPTH + 2;
        let mut input = "GEOMETRYCOLLECTION (".repeat(depth);
        input.push_str("POINT (1 1)");
        input.push_str(&")".repeat(depth));

        assert_matches!(read(&input), Err(MeridianWkxError::CorruptData(_)));
    }
}
