//! Building labeled halfsegment regions from polygons and paths.

use kurbo::{BezPath, PathEl};

use crate::geom::{FaceId, Halfsegment, Point, RegionId};
use crate::Error;

fn pairs<T>(xs: &[T]) -> impl Iterator<Item = (&T, &T)> {
    xs.windows(2).map(|pair| (&pair[0], &pair[1]))
}

fn cyclic_pairs<T>(xs: &[T]) -> impl Iterator<Item = (&T, &T)> {
    pairs(xs).chain(xs.last().zip(xs.first()))
}

fn check_finite(points: &[Point]) -> Result<(), Error> {
    for p in points {
        if p.x.is_nan() || p.y.is_nan() {
            return Err(Error::NaN);
        }
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(Error::Infinity);
        }
    }
    Ok(())
}

/// Twice the signed area of a closed polygon; positive when the vertices
/// run counterclockwise.
fn signed_area(points: &[Point]) -> f64 {
    cyclic_pairs(points)
        .map(|(p, q)| p.x * q.y - q.x * p.y)
        .sum()
}

/// Convert one closed ring into halfsegment pairs.
///
/// The ring is normalized to counterclockwise orientation first, so the
/// bounded side is `inside`. Walking an edge with the interior on the
/// left, the interior face labels the side matching the walk direction:
/// `la` for edges traversed dominating-to-submissive, `lb` for the rest.
fn ring_to_halfsegments(
    points: &[Point],
    inside: FaceId,
    outside: FaceId,
    region: RegionId,
    out: &mut Vec<Halfsegment>,
) {
    let mut ring: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last() != Some(p) {
            ring.push(*p);
        }
    }
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return;
    }
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }

    for (p, q) in cyclic_pairs(&ring) {
        let (dom, sub, la, lb) = if p < q {
            (*p, *q, inside, outside)
        } else {
            (*q, *p, outside, inside)
        };
        let h = Halfsegment::new(dom, sub, la, lb, region);
        out.push(h);
        out.push(h.brother());
    }
}

/// Build a region from a single closed polygon.
///
/// The polygon may be given in either orientation; its bounded side gets
/// the face `inside` and the unbounded side `outside`. The returned
/// halfsegments are closed under taking brothers and sorted in
/// halfsegment order, ready for the sweep. Degenerate polygons (fewer
/// than three distinct vertices) yield an empty region.
pub fn from_polygon<P: Into<Point>>(
    points: impl IntoIterator<Item = P>,
    inside: FaceId,
    outside: FaceId,
    region: RegionId,
) -> Result<Vec<Halfsegment>, Error> {
    let points: Vec<Point> = points.into_iter().map(Into::into).collect();
    check_finite(&points)?;

    let mut out = Vec::with_capacity(points.len() * 2);
    ring_to_halfsegments(&points, inside, outside, region, &mut out);
    out.sort();
    Ok(out)
}

/// Build a region from a `kurbo` path.
///
/// Curves are flattened to line segments with the given `tolerance`. Each
/// subpath is treated as an independent closed ring (unclosed subpaths are
/// closed implicitly) and labeled like [`from_polygon`]; nested or
/// overlapping subpaths are the caller's responsibility.
pub fn from_bez_path(
    path: &BezPath,
    tolerance: f64,
    inside: FaceId,
    outside: FaceId,
    region: RegionId,
) -> Result<Vec<Halfsegment>, Error> {
    let mut rings: Vec<Vec<Point>> = Vec::new();
    let mut ring: Vec<Point> = Vec::new();
    path.flatten(tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            if ring.len() > 1 {
                rings.push(std::mem::take(&mut ring));
            } else {
                ring.clear();
            }
            ring.push(Point { x: p.x, y: p.y });
        }
        PathEl::LineTo(p) => {
            ring.push(Point { x: p.x, y: p.y });
        }
        PathEl::ClosePath => {
            if ring.len() > 1 {
                rings.push(std::mem::take(&mut ring));
            } else {
                ring.clear();
            }
        }
        // `flatten` only ever emits the three elements above.
        _ => {}
    });
    if ring.len() > 1 {
        rings.push(ring);
    }

    let mut out = Vec::new();
    for ring in &rings {
        check_finite(ring)?;
        ring_to_halfsegments(ring, inside, outside, region, &mut out);
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSIDE: FaceId = FaceId(1);
    const OUTSIDE: FaceId = FaceId(0);

    fn unit_square(region: RegionId) -> Vec<Halfsegment> {
        from_polygon(
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            INSIDE,
            OUTSIDE,
            region,
        )
        .unwrap()
    }

    #[test]
    fn square_labels_follow_the_interior() {
        let square = unit_square(RegionId::First);
        assert_eq!(square.len(), 8);

        let find = |dom: (f64, f64), sub: (f64, f64)| {
            let probe = Halfsegment::new(
                dom.into(),
                sub.into(),
                FaceId::NONE,
                FaceId::NONE,
                RegionId::First,
            );
            *square.iter().find(|h| **h == probe).unwrap()
        };

        let bottom = find((0.0, 0.0), (1.0, 0.0));
        assert_eq!((bottom.la, bottom.lb), (INSIDE, OUTSIDE));
        let top = find((0.0, 1.0), (1.0, 1.0));
        assert_eq!((top.la, top.lb), (OUTSIDE, INSIDE));
        // For verticals, `la` is the west side and `lb` the east side.
        let left = find((0.0, 0.0), (0.0, 1.0));
        assert_eq!((left.la, left.lb), (OUTSIDE, INSIDE));
        let right = find((1.0, 0.0), (1.0, 1.0));
        assert_eq!((right.la, right.lb), (INSIDE, OUTSIDE));
    }

    #[test]
    fn orientation_does_not_matter() {
        let ccw = unit_square(RegionId::First);
        let cw = from_polygon(
            [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)],
            INSIDE,
            OUTSIDE,
            RegionId::First,
        )
        .unwrap();
        assert_eq!(ccw.len(), cw.len());
        for (a, b) in ccw.iter().zip(&cw) {
            assert_eq!(a, b);
            assert_eq!((a.la, a.lb), (b.la, b.lb));
        }
    }

    #[test]
    fn output_is_sorted_and_paired() {
        let square = unit_square(RegionId::First);
        assert!(square.windows(2).all(|w| w[0] <= w[1]));
        for h in &square {
            assert!(square.iter().any(|g| *g == h.brother()));
        }
    }

    #[test]
    fn duplicate_and_closing_vertices_are_dropped() {
        let square = from_polygon(
            [
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0),
                (0.0, 1.0),
                (0.0, 0.0),
            ],
            INSIDE,
            OUTSIDE,
            RegionId::First,
        )
        .unwrap();
        assert_eq!(square.len(), 8);
    }

    #[test]
    fn degenerate_polygon_is_empty() {
        let out = from_polygon(
            [(0.0, 0.0), (1.0, 1.0)],
            INSIDE,
            OUTSIDE,
            RegionId::First,
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let inf = from_polygon(
            [(0.0, 0.0), (f64::INFINITY, 0.0), (1.0, 1.0)],
            INSIDE,
            OUTSIDE,
            RegionId::First,
        );
        assert_eq!(inf.unwrap_err(), Error::Infinity);
        let nan = from_polygon(
            [(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)],
            INSIDE,
            OUTSIDE,
            RegionId::First,
        );
        assert_eq!(nan.unwrap_err(), Error::NaN);
    }

    #[test]
    fn bez_path_square_matches_polygon() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 0.0));
        path.line_to((1.0, 1.0));
        path.line_to((0.0, 1.0));
        path.close_path();
        let from_path =
            from_bez_path(&path, 1e-3, INSIDE, OUTSIDE, RegionId::First).unwrap();
        let from_poly = unit_square(RegionId::First);
        assert_eq!(from_path.len(), from_poly.len());
        for (a, b) in from_path.iter().zip(&from_poly) {
            assert_eq!(a, b);
            assert_eq!((a.la, a.lb), (b.la, b.lb));
        }
    }
}
