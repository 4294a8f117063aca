//! Geometric predicates over planar points.
//!
//! These are pure functions with no knowledge of the mesh. Every decision the
//! mesh algorithms make about convexity, legality, or crossings is routed
//! through this module, so swapping in a more robust arithmetic later only
//! touches this file.
//!
//! All predicates use plain `f64` arithmetic. Results near zero are taken at
//! face value; callers treat the degenerate outcomes ([`Orientation::Collinear`],
//! [`Circle::On`]) conservatively.

use std::cmp::Ordering;

use nalgebra::Point2;

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The triple makes a right turn.
    Clockwise,
    /// The three points lie on a common line.
    Collinear,
    /// The triple makes a left turn.
    CounterClockwise,
}

impl Orientation {
    /// Whether this is a strict left turn.
    #[inline]
    pub fn is_ccw(self) -> bool {
        self == Orientation::CounterClockwise
    }

    /// Whether this is a strict right turn.
    #[inline]
    pub fn is_cw(self) -> bool {
        self == Orientation::Clockwise
    }
}

/// Position of a point relative to a circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Circle {
    /// Strictly inside.
    Inside,
    /// Exactly on the circle.
    On,
    /// Strictly outside.
    Outside,
}

/// Twice the signed area of triangle `abc`.
#[inline]
pub fn cross(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Orientation of the triple `(a, b, c)`.
pub fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Orientation {
    let det = cross(a, b, c);
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Locate `d` relative to the circle through `a`, `b`, `c`.
///
/// The triangle `abc` must be counter-clockwise; for a clockwise triangle the
/// inside/outside answers are swapped.
pub fn in_circle(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, d: &Point2<f64>) -> Circle {
    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;
    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let ab_det = adx * bdy - bdx * ady;
    let bc_det = bdx * cdy - cdx * bdy;
    let ca_det = cdx * ady - adx * cdy;

    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;

    let det = a_lift * bc_det + b_lift * ca_det + c_lift * ab_det;
    if det > 0.0 {
        Circle::Inside
    } else if det < 0.0 {
        Circle::Outside
    } else {
        Circle::On
    }
}

/// Whether the open segments `p1p2` and `q1q2` cross at a single interior point.
///
/// Segments that merely touch (shared endpoint, an endpoint lying on the other
/// segment) or overlap collinearly do not cross.
pub fn segment_crossing(
    p1: &Point2<f64>,
    p2: &Point2<f64>,
    q1: &Point2<f64>,
    q2: &Point2<f64>,
) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if [o1, o2, o3, o4].contains(&Orientation::Collinear) {
        return false;
    }
    o1 != o2 && o3 != o4
}

/// Even-odd containment test of `p` against a closed polygon.
///
/// The polygon is given by its vertices in order; the closing edge is implied.
pub fn point_in_polygon(p: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_at = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_at {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Closed containment of `p` in the counter-clockwise triangle `abc`.
pub fn point_in_triangle(
    p: &Point2<f64>,
    a: &Point2<f64>,
    b: &Point2<f64>,
    c: &Point2<f64>,
) -> bool {
    !orientation(a, b, p).is_cw() && !orientation(b, c, p).is_cw() && !orientation(c, a, p).is_cw()
}

/// Centroid of triangle `abc`.
#[inline]
pub fn centroid(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Point2<f64> {
    Point2::from((a.coords + b.coords + c.coords) / 3.0)
}

/// Lexicographic (x, then y) comparison.
#[inline]
pub fn lexicographic(a: &Point2<f64>, b: &Point2<f64>) -> Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

/// Order points by polar angle around the lexicographically smallest point.
///
/// The pivot comes first. Because the pivot is an extreme point, every other
/// point lies in a half-plane around it and a cross-product comparator gives a
/// total order. Points collinear with the pivot are ordered nearest-first,
/// except those on the final ray, which are ordered farthest-first; this keeps
/// the resulting loop simple (a star-shaped polygon around the pivot).
pub fn angular_sort(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut sorted = points.to_vec();
    if sorted.len() < 3 {
        sorted.sort_by(lexicographic);
        return sorted;
    }

    let pivot_index = sorted
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| lexicographic(a, b))
        .map(|(i, _)| i)
        .unwrap_or(0);
    sorted.swap(0, pivot_index);
    let pivot = sorted[0];

    let dist2 = |p: &Point2<f64>| (p - pivot).norm_squared();
    sorted[1..].sort_by(|a, b| match orientation(&pivot, a, b) {
        Orientation::CounterClockwise => Ordering::Less,
        Orientation::Clockwise => Ordering::Greater,
        Orientation::Collinear => dist2(a).total_cmp(&dist2(b)),
    });

    // Reverse the run of points collinear with the pivot on the last ray.
    let last = sorted.len() - 1;
    let mut start = last;
    while start > 1 && orientation(&pivot, &sorted[start - 1], &sorted[last]) == Orientation::Collinear {
        start -= 1;
    }
    if start > 1 {
        sorted[start..].reverse();
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn test_orientation() {
        assert_eq!(orientation(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orientation(&p(0.0, 0.0), &p(0.0, 1.0), &p(1.0, 0.0)), Orientation::Clockwise);
        assert_eq!(orientation(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 2.0)), Orientation::Collinear);
    }

    #[test]
    fn test_in_circle() {
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        let c = p(0.0, 1.0);
        assert_eq!(in_circle(&a, &b, &c, &p(0.4, 0.4)), Circle::Inside);
        assert_eq!(in_circle(&a, &b, &c, &p(1.0, 1.0)), Circle::On);
        assert_eq!(in_circle(&a, &b, &c, &p(2.0, 2.0)), Circle::Outside);
    }

    #[test]
    fn test_segment_crossing() {
        assert!(segment_crossing(&p(0.0, 0.0), &p(1.0, 1.0), &p(0.0, 1.0), &p(1.0, 0.0)));
        // Shared endpoint
        assert!(!segment_crossing(&p(0.0, 0.0), &p(1.0, 1.0), &p(1.0, 1.0), &p(2.0, 0.0)));
        // T-junction
        assert!(!segment_crossing(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0)));
        // Disjoint
        assert!(!segment_crossing(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)));
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)];
        assert!(point_in_polygon(&p(1.0, 1.0), &square));
        assert!(!point_in_polygon(&p(3.0, 1.0), &square));

        // L-shape: the notch is outside
        let l_shape = [p(0.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(1.0, 1.0), p(1.0, 2.0), p(0.0, 2.0)];
        assert!(point_in_polygon(&p(0.5, 1.5), &l_shape));
        assert!(!point_in_polygon(&p(1.5, 1.5), &l_shape));
    }

    #[test]
    fn test_point_in_triangle_is_closed() {
        let (a, b, c) = (p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0));
        assert!(point_in_triangle(&p(0.5, 0.5), &a, &b, &c));
        assert!(point_in_triangle(&p(1.0, 0.0), &a, &b, &c));
        assert!(!point_in_triangle(&p(2.0, 2.0), &a, &b, &c));
    }

    #[test]
    fn test_angular_sort_forms_simple_loop() {
        let points = vec![p(1.0, 1.0), p(0.0, 0.0), p(2.0, 0.0), p(0.0, 2.0), p(2.0, 2.0)];
        let sorted = angular_sort(&points);
        assert_eq!(sorted[0], p(0.0, 0.0));
        assert_eq!(sorted[1], p(2.0, 0.0));
        assert_eq!(sorted[2], p(1.0, 1.0));
        assert_eq!(sorted[3], p(2.0, 2.0));
        assert_eq!(sorted[4], p(0.0, 2.0));
    }

    #[test]
    fn test_angular_sort_collinear_rays() {
        // First ray nearest-first, last ray farthest-first
        let points = vec![p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(0.0, 2.0), p(1.0, 1.0)];
        let sorted = angular_sort(&points);
        assert_eq!(
            sorted,
            vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(1.0, 1.0), p(0.0, 2.0), p(0.0, 1.0)]
        );
    }
}
