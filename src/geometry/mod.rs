pub mod index;
pub mod projection;

use crate::model::{Feature, Geometry};
use geo::{BoundingRect, Centroid, Distance, Euclidean, Point};
use projection::project_coord;

/// projects every coordinate of a feature's geometry from WGS84 degrees to
/// Web Mercator meters. Called once per feature before matching so distance
/// and slope math runs in a planar frame.
pub fn project(geometry: &Geometry) -> Geometry {
    match geometry {
        Geometry::Point(p) => {
            let (x, y) = project_coord(p.x(), p.y());
            Geometry::point(x, y)
        }
        Geometry::LineString(ls) => {
            let coords = ls.0.iter().map(|c| project_coord(c.x, c.y)).collect();
            Geometry::line_string(coords)
        }
        Geometry::Polygon(p) => {
            let outer = p.exterior().0.iter().map(|c| project_coord(c.x, c.y)).collect();
            let holes = p
                .interiors()
                .iter()
                .map(|h| h.0.iter().map(|c| project_coord(c.x, c.y)).collect())
                .collect();
            Geometry::polygon(outer, holes)
        }
    }
}

/// feature paired with its projected geometry. Matching and dispatch both
/// work against this rather than re-projecting on every comparison.
pub struct ProjectedFeature<'a> {
    pub index: usize,
    pub source: &'a Feature,
    pub geometry: Option<Geometry>,
}

impl<'a> ProjectedFeature<'a> {
    pub fn new(index: usize, source: &'a Feature) -> Self {
        let geometry = source.geometry.as_ref().map(project);
        ProjectedFeature { index, source, geometry }
    }
}

/// centroid of any geometry kind, used directly for points and as the
/// reduction used when one side of a comparison is a Polygon.
pub fn centroid(geometry: &Geometry) -> Point<f64> {
    match geometry {
        Geometry::Point(p) => *p,
        Geometry::LineString(ls) => ls.centroid().unwrap_or_else(|| ls.0[0].into()),
        Geometry::Polygon(p) => p.centroid().unwrap_or_else(|| p.exterior().0[0].into()),
    }
}

/// planar distance in meters between two already-projected geometries.
///
/// Two polygons measure boundary-to-boundary, same as two lines. A polygon
/// paired with a point or a line reduces to its centroid — this engine has
/// no use for point-in-polygon or polygon/line boundary distance, only for
/// "how far is this area feature from that other feature" as a single
/// number.
///
/// `reject_point_line_cross` short-circuits to [`f64::MAX`] (this engine's
/// stand-in for the spec's `+∞` sentinel) when one side is a Point and the
/// other a LineString, used by the matcher to keep POIs from pairing
/// against road/trail geometries. It has no bearing on Polygon pairings.
pub fn distance(a: &Geometry, b: &Geometry, reject_point_line_cross: bool) -> f64 {
    let is_point_a = matches!(a, Geometry::Point(_));
    let is_line_a = matches!(a, Geometry::LineString(_));
    let is_point_b = matches!(b, Geometry::Point(_));
    let is_line_b = matches!(b, Geometry::LineString(_));
    if reject_point_line_cross && ((is_point_a && is_line_b) || (is_line_a && is_point_b)) {
        return f64::MAX;
    }
    match (a, b) {
        (Geometry::Polygon(p1), Geometry::Polygon(p2)) => Euclidean.distance(p1, p2),
        (Geometry::Polygon(_), _) | (_, Geometry::Polygon(_)) => {
            Euclidean.distance(centroid(a), centroid(b))
        }
        (Geometry::Point(p1), Geometry::Point(p2)) => Euclidean.distance(*p1, *p2),
        (Geometry::Point(p), Geometry::LineString(ls)) => Euclidean.distance(p, ls),
        (Geometry::LineString(ls), Geometry::Point(p)) => Euclidean.distance(ls, p),
        (Geometry::LineString(a), Geometry::LineString(b)) => Euclidean.distance(a, b),
    }
}

/// axis-aligned min/max corners of a geometry in its own coordinate frame,
/// used by [`index::SecondaryIndex`] to prune candidates before the exact
/// distance test rather than scanning every secondary per primary.
pub fn bounding_box(geometry: &Geometry) -> Option<((f64, f64), (f64, f64))> {
    let rect = match geometry {
        Geometry::Point(p) => geo::Rect::new(*p, *p),
        Geometry::LineString(ls) => ls.bounding_rect()?,
        Geometry::Polygon(p) => p.bounding_rect()?,
    };
    Some((rect.min().x_y(), rect.max().x_y()))
}

/// the two vertex indices a LineString's effective direction is sampled
/// from: two vertices in from each end, so a single noisy endpoint vertex
/// doesn't dominate the reading. Short lines (fewer than 5 vertices) fall
/// back to the two endpoints.
fn sample_indices(len: usize) -> (usize, usize) {
    if len < 5 {
        (0, len - 1)
    } else {
        (2, len - 3)
    }
}

/// a LineString's own rise/run slope over its sampled direction window.
/// `None` marks it degenerate: fewer than two vertices, the sampled points
/// coincide, or the window has zero run (a vertical segment, undefined
/// slope) — any of which make the line's orientation meaningless to compare.
fn line_slope(ls: &geo::LineString<f64>) -> Option<f64> {
    if ls.0.len() < 2 {
        return None;
    }
    let (lo, hi) = sample_indices(ls.0.len());
    let (x0, y0) = (ls.0[lo].x, ls.0[lo].y);
    let (x1, y1) = (ls.0[hi].x, ls.0[hi].y);
    let dx = x1 - x0;
    let dy = y1 - y0;
    if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
        return None;
    }
    if dx.abs() < f64::EPSILON {
        return None;
    }
    Some(dy / dx)
}

/// (angle delta in degrees, slope delta) between two LineStrings' own local
/// direction, each computed independently rather than as a shared bearing.
/// Non-LineString geometries, and a pair where either line's sampled
/// direction is degenerate (vertical, or its sample points coincide),
/// report `(0.0, 0.0)` — nothing to meaningfully compare.
pub fn slope_and_angle(a: &Geometry, b: &Geometry) -> (f64, f64) {
    let (Geometry::LineString(ls_a), Geometry::LineString(ls_b)) = (a, b) else {
        return (0.0, 0.0);
    };
    let (Some(m1), Some(m2)) = (line_slope(ls_a), line_slope(ls_b)) else {
        return (0.0, 0.0);
    };

    let slope_delta = m1 - m2;
    let angle_deg = ((m2 - m1) / (1.0 + m1 * m2)).atan().to_degrees().abs();

    (if angle_deg.is_nan() { 0.0 } else { angle_deg }, slope_delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_point_distance_is_symmetric() {
        let a = Geometry::point(0.0, 0.0);
        let b = Geometry::point(3.0, 4.0);
        assert!((distance(&a, &b, false) - 5.0).abs() < 1e-9);
        assert!((distance(&b, &a, false) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn point_line_cross_rejected_when_flagged() {
        let p = Geometry::point(0.0, 0.0);
        let ls = Geometry::line_string(vec![(0.0, 1.0), (10.0, 1.0)]);
        assert_eq!(distance(&p, &ls, true), f64::MAX);
        assert!(distance(&p, &ls, false) < f64::MAX);
    }

    #[test]
    fn polygon_point_reduces_to_centroid() {
        let square = Geometry::polygon(
            vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)],
            vec![],
        );
        let p = Geometry::point(1.0, 1.0);
        assert!((distance(&square, &p, false)).abs() < 1e-9);
    }

    #[test]
    fn polygon_polygon_measures_boundary_distance_not_centroid() {
        let left = Geometry::polygon(
            vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)],
            vec![],
        );
        let right = Geometry::polygon(
            vec![(5.0, 0.0), (7.0, 0.0), (7.0, 2.0), (5.0, 2.0), (5.0, 0.0)],
            vec![],
        );
        // centroids are 5 apart; the nearest boundary edges are 3 apart.
        assert!((distance(&left, &right, false) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn identical_orientation_has_zero_deltas() {
        let a = Geometry::line_string(vec![
            (0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0),
            (4.0, 0.0), (5.0, 0.0), (6.0, 0.0),
        ]);
        let b = Geometry::line_string(vec![
            (10.0, 10.0), (11.0, 10.0), (12.0, 10.0), (13.0, 10.0),
            (14.0, 10.0), (15.0, 10.0), (16.0, 10.0),
        ]);
        let (angle, slope) = slope_and_angle(&a, &b);
        assert!(angle < 1e-9);
        assert!(slope.abs() < 1e-9);
    }

    #[test]
    fn perpendicular_lines_report_ninety_degrees() {
        // slope 1 and slope -1: perpendicular, and both finite so the
        // atan formula (not the vertical-line degenerate case) is exercised.
        let rising = Geometry::line_string(vec![
            (0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0),
            (4.0, 4.0), (5.0, 5.0), (6.0, 6.0),
        ]);
        let falling = Geometry::line_string(vec![
            (0.0, 6.0), (1.0, 5.0), (2.0, 4.0), (3.0, 3.0),
            (4.0, 2.0), (5.0, 1.0), (6.0, 0.0),
        ]);
        let (angle, slope_delta) = slope_and_angle(&rising, &falling);
        assert!((angle - 90.0).abs() < 1e-6);
        assert!((slope_delta - 2.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_line_is_degenerate() {
        // 7 points (not 5) so the sampled indices (2, len-3) land on distinct
        // vertices rather than colliding, and degeneracy comes from the
        // vertical line's zero-run window rather than a same-point sample.
        let horiz = Geometry::line_string(vec![
            (0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0),
            (4.0, 0.0), (5.0, 0.0), (6.0, 0.0),
        ]);
        let vert = Geometry::line_string(vec![
            (0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (0.0, 3.0),
            (0.0, 4.0), (0.0, 5.0), (0.0, 6.0),
        ]);
        let (angle, slope_delta) = slope_and_angle(&horiz, &vert);
        assert_eq!(angle, 0.0);
        assert_eq!(slope_delta, 0.0);
    }

    #[test]
    fn five_point_line_samples_the_same_index_twice() {
        // at len == 5, ls[2] and ls[len-3] are literally the same vertex, so
        // the pair reports degenerate even though the line itself isn't.
        let a = Geometry::line_string(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
        let b = Geometry::line_string(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        let (angle, slope_delta) = slope_and_angle(&a, &b);
        assert_eq!(angle, 0.0);
        assert_eq!(slope_delta, 0.0);
    }

    #[test]
    fn short_line_falls_back_to_endpoints() {
        let a = Geometry::line_string(vec![(0.0, 0.0), (1.0, 1.0)]);
        let b = Geometry::line_string(vec![(0.0, 0.0), (2.0, 2.0)]);
        let (angle, slope_delta) = slope_and_angle(&a, &b);
        assert!(angle < 1e-9);
        assert!(slope_delta.abs() < 1e-9);
    }
}
