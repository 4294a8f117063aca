//! Mesh construction from an ordered point loop.
//!
//! The starting point for every triangulation is a two-face mesh: one bounded
//! face holding the polygon interior and the outer face holding everything
//! else. The triangulation algorithms in [`crate::algo`] then cut these faces
//! into triangles.

use nalgebra::Point2;

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a two-face half-edge mesh from a simple closed loop of points.
///
/// # Arguments
/// * `points` - The loop's vertices in order; the closing edge is implied.
///   The loop must not self-intersect. Either winding is accepted.
///
/// # Layout
/// For `n` points the mesh has `n` vertices (index `i` is `points[i]`),
/// `2n` half-edges and 2 faces. Half-edge `i` runs along the interior side of
/// the loop and half-edge `n + i` is its twin on the outer side. Bounded faces
/// are always counter-clockwise, so a clockwise input loop is linked in
/// reverse.
///
/// # Errors
/// - [`MeshError::TooFewPoints`] for fewer than 3 points
/// - [`MeshError::TooManyPoints`] if a full triangulation of the points, at
///   most `6n - 6` half-edges, would not fit in the index type `I`
///
/// # Example
/// ```
/// use trellis::mesh::{build_from_loop, HalfEdgeMesh};
/// use nalgebra::Point2;
///
/// let square = [
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
/// ];
/// let mesh: HalfEdgeMesh = build_from_loop(&square).unwrap();
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_halfedges(), 8);
/// assert_eq!(mesh.num_faces(), 2);
/// ```
pub fn build_from_loop<I: MeshIndex>(points: &[Point2<f64>]) -> Result<HalfEdgeMesh<I>> {
    let n = points.len();
    if n < 3 {
        return Err(MeshError::TooFewPoints { count: n });
    }
    let max = max_points::<I>();
    if n > max {
        return Err(MeshError::TooManyPoints { count: n, max });
    }

    let mut mesh = HalfEdgeMesh::with_capacity(n);

    let vertex_ids: Vec<VertexId<I>> = points.iter().map(|&p| mesh.add_vertex(p)).collect();

    // Walk order around the bounded face.
    let order: Vec<usize> = if signed_area(points) < 0.0 {
        (0..n).rev().collect()
    } else {
        (0..n).collect()
    };

    for _ in 0..n {
        mesh.halfedges.push(super::halfedge::HalfEdge::new());
    }
    for _ in 0..n {
        mesh.halfedges.push(super::halfedge::HalfEdge::new());
    }

    let outer = mesh.add_face(HalfEdgeId::new(n));
    let inner = mesh.add_face(HalfEdgeId::new(0));
    mesh.outer = outer;

    for i in 0..n {
        let inside = HalfEdgeId::<I>::new(i);
        let outside = HalfEdgeId::<I>::new(n + i);
        let from = vertex_ids[order[i]];
        let to = vertex_ids[order[(i + 1) % n]];

        {
            let he = mesh.halfedge_mut(inside);
            he.origin = from;
            he.twin = outside;
            he.prev = HalfEdgeId::new((i + n - 1) % n);
            he.next = HalfEdgeId::new((i + 1) % n);
            he.face = inner;
        }
        {
            // Outer side runs the other way round.
            let he = mesh.halfedge_mut(outside);
            he.origin = to;
            he.twin = inside;
            he.prev = HalfEdgeId::new(n + (i + 1) % n);
            he.next = HalfEdgeId::new(n + (i + n - 1) % n);
            he.face = outer;
        }

        mesh.vertex_mut(from).halfedge = inside;
    }

    Ok(mesh)
}

/// Largest point count whose triangulation indexes within `I`.
///
/// Vertices are only added here, and a planar triangulation of n points has
/// at most 3n - 3 edges and 2n - 2 faces, so half-edges bound every arena.
fn max_points<I: MeshIndex>() -> usize {
    I::MAX.to_usize().saturating_add(7) / 6
}

/// Shoelace area of a closed loop, positive when counter-clockwise.
fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (&points[i], &points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}
