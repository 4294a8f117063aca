//! Ear-clipping triangulation of mesh faces.
//!
//! Both variants sweep around a face boundary starting from its leftmost
//! vertex. At every step the sweep either cuts off an ear with
//! [`HalfEdgeMesh::split_face`] and backs up one edge to re-examine the new
//! diagonal, or advances. A cut shortens the face by one edge and an advance
//! is bounded by the face length, so a full circuit without a cut means the
//! sweep is done (or, for a face that still needs cutting, stuck).
//!
//! - [`triangulate_interior`] reduces the bounded face of a freshly built loop
//!   to triangles.
//! - [`triangulate_exterior`] fills the pockets between the loop and its
//!   convex hull, leaving the outer face bounded by the hull.

use tracing::debug;

use crate::error::{MeshError, Result};
use crate::geometry;
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex};

/// Summary of a triangulation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangulateReport {
    /// Number of ears cut off (one new face each).
    pub ears: usize,
}

/// Triangulate the bounded face of a two-face mesh.
///
/// Looks for the first bounded face that is not yet a triangle; on a mesh
/// straight out of [`build_from_loop`](crate::mesh::build_from_loop) that is
/// the polygon interior. A simple loop of n points yields n - 2 triangles.
///
/// # Errors
/// [`MeshError::NoEar`] if the sweep circles the face without finding an
/// ear, which only happens for self-intersecting or degenerate loops. A
/// loop of three collinear points is already a face of three sides but has
/// no area, so it is reported the same way.
pub fn triangulate_interior<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<TriangulateReport> {
    let face = mesh.bounded_face_ids().find(|&f| mesh.face_degree(f) > 3);
    let Some(face) = face else {
        if let Some(flat) = mesh.bounded_face_ids().find(|&f| mesh.face_signed_area(f) <= 0.0) {
            return Err(MeshError::NoEar { face: flat.index() });
        }
        return Ok(TriangulateReport::default());
    };

    let ears = clip_ears(mesh, face, 3)?;
    debug!(face = face.index(), ears, "triangulated interior");
    Ok(TriangulateReport { ears })
}

/// Triangulate the region between the loop and its convex hull.
///
/// The outer face boundary runs clockwise, so a counter-clockwise turn along
/// it marks a pocket. Cutting those ears until none remain leaves the outer
/// face bounded by the convex hull, and every new face is a triangle.
///
/// # Errors
/// [`MeshError::NoEar`] is never returned for the outer face: once no pocket
/// ear remains, the outer face is convex.
pub fn triangulate_exterior<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<TriangulateReport> {
    let face = mesh.outer_face();
    let ears = clip_ears(mesh, face, 0)?;
    debug!(face = face.index(), ears, "triangulated exterior");
    Ok(TriangulateReport { ears })
}

/// Sweep `face`, cutting ears until it has `target` sides.
///
/// Every face lies to the left of its half-edges, so an ear is always a
/// strict left turn: a convex corner of a bounded face, or a pocket corner
/// of the clockwise outer face. The sweep also stops after a full circuit
/// without a cut, which is an error only when a target was set.
fn clip_ears<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, face: FaceId<I>, target: usize) -> Result<usize> {
    let mut it = leftmost_halfedge(mesh, face);
    let mut sides = mesh.face_degree(face);
    let mut ears = 0;
    let mut idle = 0;

    while sides > target {
        if idle >= sides {
            if target > 0 {
                return Err(MeshError::NoEar { face: face.index() });
            }
            break;
        }

        if is_ear(mesh, it) {
            let e2 = mesh.next(mesh.next(it));
            if mesh.split_face(it, e2).is_ok() {
                ears += 1;
                sides -= 1;
                idle = 0;
                // prev(it) is now the twin of the new diagonal; resume on the diagonal.
                it = mesh.twin(mesh.prev(it));
                continue;
            }
        }

        it = mesh.next(it);
        idle += 1;
    }

    Ok(ears)
}

/// The boundary half-edge of `face` whose origin has the smallest x (then y).
fn leftmost_halfedge<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, face: FaceId<I>) -> HalfEdgeId<I> {
    let start = mesh.face(face).halfedge;
    mesh.face_halfedges(face)
        .min_by(|&a, &b| geometry::lexicographic(mesh.position(mesh.origin(a)), mesh.position(mesh.origin(b))))
        .unwrap_or(start)
}

/// Whether the corner at `next(he)` is an ear of its face.
///
/// The triple `origin(he), origin(next(he)), origin(next(next(he)))` must turn
/// strictly left, and no other vertex of the face may lie inside or on the
/// triangle it spans.
fn is_ear<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, he: HalfEdgeId<I>) -> bool {
    let he1 = mesh.next(he);
    let he2 = mesh.next(he1);
    let (va, vb, vc) = (mesh.origin(he), mesh.origin(he1), mesh.origin(he2));
    let (a, b, c) = (mesh.position(va), mesh.position(vb), mesh.position(vc));

    if !geometry::orientation(a, b, c).is_ccw() {
        return false;
    }

    let face = mesh.face_of(he);
    !mesh
        .face_vertices(face)
        .filter(|&v| v != va && v != vb && v != vc)
        .any(|v| geometry::point_in_triangle(mesh.position(v), a, b, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    use crate::geometry::Orientation;
    use crate::mesh::build_from_loop;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn assert_all_ccw_triangles(mesh: &HalfEdgeMesh) {
        for f in mesh.bounded_face_ids() {
            assert_eq!(mesh.face_degree(f), 3, "face {:?} is not a triangle", f);
            assert!(mesh.face_signed_area(f) > 0.0, "face {:?} is inverted", f);
        }
    }

    #[test]
    fn test_square_gives_two_triangles() {
        let mut mesh: HalfEdgeMesh = build_from_loop(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]).unwrap();
        let report = triangulate_interior(&mut mesh).unwrap();

        assert_eq!(report.ears, 1);
        assert_eq!(mesh.num_bounded_faces(), 2);
        assert!(mesh.is_valid());
        assert_all_ccw_triangles(&mesh);
    }

    #[test]
    fn test_polygon_gives_n_minus_two_triangles() {
        let n = 9;
        let points: Vec<Point2<f64>> = (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                p(t.cos(), t.sin())
            })
            .collect();
        let mut mesh: HalfEdgeMesh = build_from_loop(&points).unwrap();
        triangulate_interior(&mut mesh).unwrap();

        assert_eq!(mesh.num_bounded_faces(), n - 2);
        assert_eq!(mesh.num_halfedges(), 2 * n + 2 * (n - 3));
        assert!(mesh.is_valid());
        assert_all_ccw_triangles(&mesh);
    }

    #[test]
    fn test_non_convex_polygon() {
        // A comb with two deep notches: a convexity-only test would cut across them.
        let points = vec![
            p(0.0, 0.0),
            p(5.0, 0.0),
            p(5.0, 3.0),
            p(4.0, 3.0),
            p(4.0, 1.0),
            p(3.0, 1.0),
            p(3.0, 3.0),
            p(2.0, 3.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 3.0),
            p(0.0, 3.0),
        ];
        let mut mesh: HalfEdgeMesh = build_from_loop(&points).unwrap();
        triangulate_interior(&mut mesh).unwrap();

        assert_eq!(mesh.num_bounded_faces(), points.len() - 2);
        assert!(mesh.is_valid());
        assert_all_ccw_triangles(&mesh);

        let area: f64 = mesh.bounded_face_ids().map(|f| mesh.face_signed_area(f)).sum();
        assert!((area - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_exterior_fills_pockets_to_hull() {
        let points = vec![
            p(0.0, 0.0),
            p(5.0, 0.0),
            p(5.0, 3.0),
            p(4.0, 3.0),
            p(4.0, 1.0),
            p(3.0, 1.0),
            p(3.0, 3.0),
            p(2.0, 3.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 3.0),
            p(0.0, 3.0),
        ];
        let mut mesh: HalfEdgeMesh = build_from_loop(&points).unwrap();
        triangulate_interior(&mut mesh).unwrap();
        let report = triangulate_exterior(&mut mesh).unwrap();

        assert!(report.ears > 0);
        assert!(mesh.is_valid());
        assert_all_ccw_triangles(&mesh);

        // The outer face is now the hull rectangle (with collinear points on it).
        let outer = mesh.outer_face();
        for h in mesh.face_halfedges(outer) {
            let a = mesh.position(mesh.origin(h));
            let b = mesh.position(mesh.dest(h));
            let c = mesh.position(mesh.dest(mesh.next(h)));
            assert_ne!(geometry::orientation(a, b, c), Orientation::CounterClockwise);
        }

        let area: f64 = mesh.bounded_face_ids().map(|f| mesh.face_signed_area(f)).sum();
        assert!((area - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_exterior_on_convex_loop_is_noop() {
        let mut mesh: HalfEdgeMesh = build_from_loop(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]).unwrap();
        triangulate_interior(&mut mesh).unwrap();
        let faces = mesh.num_faces();
        let report = triangulate_exterior(&mut mesh).unwrap();
        assert_eq!(report.ears, 0);
        assert_eq!(mesh.num_faces(), faces);
    }

    #[test]
    fn test_triangle_is_already_done() {
        let mut mesh: HalfEdgeMesh = build_from_loop(&[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)]).unwrap();
        let report = triangulate_interior(&mut mesh).unwrap();
        assert_eq!(report.ears, 0);
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_flat_triangle_has_no_ear() {
        let mut mesh: HalfEdgeMesh = build_from_loop(&[p(0.0, 0.0), p(0.0, 3.0), p(0.0, 5.0)]).unwrap();
        assert!(matches!(triangulate_interior(&mut mesh), Err(MeshError::NoEar { .. })));
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_collinear_loop_has_no_ear() {
        let mut mesh: HalfEdgeMesh =
            build_from_loop(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)]).unwrap();
        assert!(matches!(triangulate_interior(&mut mesh), Err(MeshError::NoEar { .. })));
        assert!(mesh.is_valid());
    }
}
