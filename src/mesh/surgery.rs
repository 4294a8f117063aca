//! Local topological operations.
//!
//! Every operation here touches a constant number of records (apart from the
//! face reassignment in [`HalfEdgeMesh::split_face`], which is linear in the
//! size of the face being cut) and leaves all connectivity invariants intact.

use nalgebra::Point2;
use tracing::trace;

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, MeshIndex};
use crate::error::{MeshError, Result};
use crate::geometry::{in_circle, orientation, Circle};

/// The quadrilateral around an interior edge, in counter-clockwise order.
///
/// For a half-edge `e` from `a` to `c`, `d` is the apex of `e`'s triangle and
/// `b` the apex of its twin's triangle, so the corners run `a, b, c, d`.
#[derive(Debug, Clone, Copy)]
struct Quad {
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
}

impl Quad {
    /// Whether all four corners turn strictly left.
    fn is_strictly_convex(&self) -> bool {
        let Quad { a, b, c, d } = self;
        orientation(a, b, c).is_ccw()
            && orientation(a, c, d).is_ccw()
            && orientation(b, c, d).is_ccw()
            && orientation(b, d, a).is_ccw()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// The quadrilateral around `he`, or `None` if `he` touches the outer face
    /// or either side is not a triangle.
    fn quad(&self, he: HalfEdgeId<I>) -> Option<Quad> {
        let twin = self.twin(he);
        if self.is_outer_edge(he) || !self.is_triangle(he) || !self.is_triangle(twin) {
            return None;
        }
        Some(Quad {
            a: *self.position(self.origin(he)),
            b: *self.position(self.origin(self.prev(twin))),
            c: *self.position(self.origin(self.next(he))),
            d: *self.position(self.origin(self.prev(he))),
        })
    }

    /// Check the Delaunay in-circle criterion for an edge.
    ///
    /// Edges on the outer face are always legal, as are edges whose
    /// quadrilateral is not strictly convex (a flip would fold the mesh or
    /// leave it unchanged). Otherwise the edge is illegal exactly when the
    /// apex across it lies strictly inside the circumcircle of its own
    /// triangle. Cocircular configurations count as legal.
    pub fn is_legal(&self, he: HalfEdgeId<I>) -> bool {
        match self.quad(he) {
            Some(q) if q.is_strictly_convex() => in_circle(&q.a, &q.c, &q.d, &q.b) != Circle::Inside,
            _ => true,
        }
    }

    /// Check whether an edge can be flipped without folding the mesh.
    ///
    /// True for interior edges between two triangles whose union is a
    /// strictly convex quadrilateral, regardless of Delaunay legality.
    pub fn is_flippable(&self, he: HalfEdgeId<I>) -> bool {
        self.quad(he).is_some_and(|q| q.is_strictly_convex())
    }

    /// Replace the diagonal of the two triangles sharing `he` with the other
    /// diagonal.
    ///
    /// With `he` running a → c inside triangle (a, c, d) and its twin inside
    /// (c, a, b), afterwards `he` runs d → b inside (d, b, c) and the twin runs
    /// b → d inside (b, d, a). No records are allocated, the two faces keep
    /// their ids, and flipping the same half-edge twice restores the original
    /// adjacency.
    ///
    /// # Panics
    /// In debug builds, if `he` touches the outer face or either side is not
    /// a triangle. Checking [`is_flippable`](Self::is_flippable) first also
    /// guarantees the result is geometrically valid.
    pub fn flip(&mut self, he: HalfEdgeId<I>) {
        debug_assert!(!self.is_outer_edge(he), "cannot flip {:?} on the outer face", he);

        let twin = self.twin(he);
        debug_assert!(
            self.is_triangle(he) && self.is_triangle(twin),
            "cannot flip {:?} between non-triangular faces",
            he
        );

        let a = self.origin(he);
        let c = self.origin(twin);
        let face = self.face_of(he);
        let twin_face = self.face_of(twin);

        // e: a -> c, e_next: c -> d, e_prev: d -> a
        // t: c -> a, t_next: a -> b, t_prev: b -> c
        let e_next = self.next(he);
        let e_prev = self.prev(he);
        let t_next = self.next(twin);
        let t_prev = self.prev(twin);

        let d = self.origin(e_prev);
        let b = self.origin(t_prev);

        {
            let e = self.halfedge_mut(he);
            e.origin = d;
            e.next = t_prev;
            e.prev = e_next;
        }
        {
            let t = self.halfedge_mut(twin);
            t.origin = b;
            t.next = e_prev;
            t.prev = t_next;
        }

        // (d, b, c): he, t_prev, e_next
        {
            let h = self.halfedge_mut(t_prev);
            h.next = e_next;
            h.prev = he;
            h.face = face;
        }
        {
            let h = self.halfedge_mut(e_next);
            h.next = he;
            h.prev = t_prev;
        }

        // (b, d, a): twin, e_prev, t_next
        {
            let h = self.halfedge_mut(e_prev);
            h.next = t_next;
            h.prev = twin;
            h.face = twin_face;
        }
        {
            let h = self.halfedge_mut(t_next);
            h.next = twin;
            h.prev = e_prev;
        }

        self.face_mut(face).halfedge = he;
        self.face_mut(twin_face).halfedge = twin;

        // a and c lost he and twin as outgoing half-edges.
        self.vertex_mut(a).halfedge = t_next;
        self.vertex_mut(c).halfedge = e_next;

        trace!(halfedge = he.index(), from = ?(a, c), to = ?(d, b), "flip");
    }

    /// Cut a face in two along the diagonal from `origin(e1)` to `origin(e2)`.
    ///
    /// `e1` and `e2` must bound the same face and their origins must not
    /// already be neighbors along it. A new twin pair `(d, d')` is allocated:
    /// `d` runs from `origin(e1)` to `origin(e2)` and closes the chain
    /// `e2 .. prev(e1)`, which keeps the original face; `d'` runs back and
    /// closes the chain `e1 .. prev(e2)`, which becomes the returned new face.
    ///
    /// # Errors
    /// [`MeshError::InvalidDiagonal`] if the half-edges do not define a
    /// diagonal. The mesh is left untouched, and callers are expected to
    /// treat this as "no split here" rather than a failure.
    pub fn split_face(&mut self, e1: HalfEdgeId<I>, e2: HalfEdgeId<I>) -> Result<FaceId<I>> {
        let face = self.face_of(e1);
        if e1 == e2
            || face != self.face_of(e2)
            || self.origin(e2) == self.dest(e1)
            || self.origin(e1) == self.dest(e2)
        {
            return Err(MeshError::InvalidDiagonal {
                from: e1.index(),
                to: e2.index(),
            });
        }

        let e1_prev = self.prev(e1);
        let e2_prev = self.prev(e2);
        let from = self.origin(e1);
        let to = self.origin(e2);

        let (d, d_twin) = self.add_halfedge_pair();
        let new_face = self.add_face(d_twin);

        {
            let h = self.halfedge_mut(d);
            h.origin = from;
            h.next = e2;
            h.prev = e1_prev;
            h.face = face;
        }
        {
            let h = self.halfedge_mut(d_twin);
            h.origin = to;
            h.next = e1;
            h.prev = e2_prev;
            h.face = new_face;
        }

        self.halfedge_mut(e1_prev).next = d;
        self.halfedge_mut(e1).prev = d_twin;
        self.halfedge_mut(e2_prev).next = d_twin;
        self.halfedge_mut(e2).prev = d;

        let mut he = e1;
        while he != d_twin {
            self.halfedge_mut(he).face = new_face;
            he = self.next(he);
        }

        self.face_mut(face).halfedge = d;

        trace!(
            from = from.index(),
            to = to.index(),
            face = face.index(),
            new_face = new_face.index(),
            "split face"
        );
        Ok(new_face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_loop, VertexId};

    /// Two triangles (0, 1, 2) and (0, 2, 3) sharing the diagonal 0-2.
    fn split_quad(points: &[Point2<f64>]) -> (HalfEdgeMesh, HalfEdgeId) {
        let mut mesh: HalfEdgeMesh = build_from_loop(points).unwrap();
        let e0 = mesh.find_halfedge(VertexId::new(0), VertexId::new(1)).unwrap();
        let e2 = mesh.find_halfedge(VertexId::new(2), VertexId::new(3)).unwrap();
        mesh.split_face(e0, e2).unwrap();
        let diagonal = mesh.find_halfedge(VertexId::new(0), VertexId::new(2)).unwrap();
        (mesh, diagonal)
    }

    fn kite() -> Vec<Point2<f64>> {
        // Diagonal 0-2 is long; 1-3 is the Delaunay diagonal.
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, -0.5),
            Point2::new(4.0, 0.0),
            Point2::new(2.0, 0.5),
        ]
    }

    #[test]
    fn test_split_face() {
        let (mesh, diagonal) = split_quad(&kite());
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_halfedges(), 10);
        assert_eq!(mesh.num_faces(), 3);

        let f = mesh.face_of(diagonal);
        let g = mesh.face_of(mesh.twin(diagonal));
        assert_ne!(f, g);
        assert_eq!(mesh.face_degree(f), 3);
        assert_eq!(mesh.face_degree(g), 3);
        assert!(mesh.is_triangle(diagonal));
    }

    #[test]
    fn test_split_face_rejects_non_diagonal() {
        let mut mesh: HalfEdgeMesh = build_from_loop(&kite()).unwrap();
        let e0 = mesh.find_halfedge(VertexId::new(0), VertexId::new(1)).unwrap();
        let e1 = mesh.next(e0);
        let before = (mesh.num_halfedges(), mesh.num_faces());

        // Adjacent along the face
        assert!(matches!(mesh.split_face(e0, e1), Err(MeshError::InvalidDiagonal { .. })));
        // Same half-edge
        assert!(matches!(mesh.split_face(e0, e0), Err(MeshError::InvalidDiagonal { .. })));
        // Different faces
        let outer = mesh.twin(mesh.next(e1));
        assert!(matches!(mesh.split_face(e0, outer), Err(MeshError::InvalidDiagonal { .. })));

        assert_eq!((mesh.num_halfedges(), mesh.num_faces()), before);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_flip_preserves_invariants() {
        let (mut mesh, diagonal) = split_quad(&kite());
        let faces_before = mesh.num_faces();
        let halfedges_before = mesh.num_halfedges();

        mesh.flip(diagonal);

        assert!(mesh.is_valid());
        assert_eq!(mesh.num_faces(), faces_before);
        assert_eq!(mesh.num_halfedges(), halfedges_before);
        assert!(!mesh.contains_edge(VertexId::new(0), VertexId::new(2)));
        assert!(mesh.contains_edge(VertexId::new(1), VertexId::new(3)));
        assert!(mesh.is_triangle(diagonal));
        assert!(mesh.is_triangle(mesh.twin(diagonal)));

        for f in mesh.bounded_face_ids() {
            assert!(mesh.face_signed_area(f) > 0.0);
        }
    }

    #[test]
    fn test_flip_twice_restores_adjacency() {
        let (mut mesh, diagonal) = split_quad(&kite());
        let positions: Vec<Point2<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

        mesh.flip(diagonal);
        mesh.flip(diagonal);

        assert!(mesh.is_valid());
        assert!(mesh.contains_edge(VertexId::new(0), VertexId::new(2)));
        assert!(!mesh.contains_edge(VertexId::new(1), VertexId::new(3)));
        let after: Vec<Point2<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn test_legality() {
        let (mut mesh, diagonal) = split_quad(&kite());
        assert!(!mesh.is_legal(diagonal));
        assert!(!mesh.is_legal(mesh.twin(diagonal)));
        assert!(mesh.is_flippable(diagonal));

        mesh.flip(diagonal);
        assert!(mesh.is_legal(diagonal));
        assert!(mesh.is_flippable(diagonal));
    }

    #[test]
    fn test_outer_edges_are_legal_and_fixed() {
        let (mesh, _) = split_quad(&kite());
        let hull = mesh.find_halfedge(VertexId::new(0), VertexId::new(1)).unwrap();
        assert!(mesh.is_legal(hull));
        assert!(mesh.is_legal(mesh.twin(hull)));
        assert!(!mesh.is_flippable(hull));
    }

    #[test]
    fn test_non_convex_quad_is_legal_and_not_flippable() {
        // Vertex 3 is reflex, so the quadrilateral around 1-3 is a dart.
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, -2.0),
            Point2::new(4.0, 0.0),
            Point2::new(2.0, -1.0),
        ];
        let mut mesh: HalfEdgeMesh = build_from_loop(&points).unwrap();
        let e3 = mesh.find_halfedge(VertexId::new(3), VertexId::new(0)).unwrap();
        let e1 = mesh.find_halfedge(VertexId::new(1), VertexId::new(2)).unwrap();
        mesh.split_face(e1, e3).unwrap();
        let diagonal = mesh.find_halfedge(VertexId::new(1), VertexId::new(3)).unwrap();

        assert!(mesh.is_valid());
        assert!(!mesh.is_flippable(diagonal));
        assert!(mesh.is_legal(diagonal));
    }

    #[test]
    fn test_cocircular_is_legal() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let (mesh, diagonal) = split_quad(&square);
        assert!(mesh.is_flippable(diagonal));
        assert!(mesh.is_legal(diagonal));
    }
}
