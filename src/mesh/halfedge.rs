//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! of a planar subdivision. All cross-references are arena indices, so the
//! cyclic vertex/half-edge/face graph needs no shared ownership.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin**, **next** and **prev** around its face,
//!   **origin vertex**, and **face**
//! - Each vertex stores one outgoing half-edge
//! - Each face stores one half-edge on its boundary
//!
//! # The outer face
//!
//! Unlike a surface mesh with open boundary loops, every half-edge here has a
//! face. The region outside the point set is a real face, the *outer face*,
//! whose boundary runs clockwise. Bounded faces run counter-clockwise.

use nalgebra::Point2;

use super::index::{EdgeKey, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};
use crate::geometry;

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The planar position of this vertex.
    pub position: Point2<f64>,

    /// One outgoing half-edge from this vertex.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new, not yet connected vertex at the given position.
    pub fn new(position: Point2<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge (pointing in the reverse direction).
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face.
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// The face this half-edge bounds.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new unlinked half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// A planar half-edge mesh.
///
/// Vertices, half-edges and faces are stored in append-only arenas: the local
/// operations relink existing records in place and only
/// [`split_face`](HalfEdgeMesh::split_face) allocates. Build one with
/// [`build_from_loop`](super::build_from_loop).
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// All half-edges in the mesh.
    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// All faces in the mesh, including the outer face.
    pub(crate) faces: Vec<Face<I>>,

    /// The unbounded face.
    pub(crate) outer: FaceId<I>,
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a mesh with pre-allocated capacity for a loop of `n` points.
    ///
    /// A fully triangulated set of n points with h hull vertices has
    /// 3n - 3 - h edges and 2n - 2 - h bounded faces; capacity is sized for
    /// the worst case h = 3.
    pub(crate) fn with_capacity(n: usize) -> Self {
        let num_halfedges = 2 * (3 * n).saturating_sub(6);
        let num_faces = (2 * n).saturating_sub(4);

        Self {
            vertices: Vec::with_capacity(n),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
            outer: FaceId::invalid(),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Get the number of faces, including the outer face.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of bounded faces.
    #[inline]
    pub fn num_bounded_faces(&self) -> usize {
        self.faces.len().saturating_sub(1)
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    #[inline]
    pub(crate) fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        &mut self.faces[id.index()]
    }

    /// The unbounded face.
    #[inline]
    pub fn outer_face(&self) -> FaceId<I> {
        self.outer
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point2<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    ///
    /// Only the coordinates change; connectivity is untouched, so moving a
    /// vertex far enough can leave the mesh geometrically inverted.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point2<f64>) {
        self.vertex_mut(v).position = pos;
    }

    /// Find the vertex at exactly the given coordinates.
    pub fn find_vertex(&self, pos: &Point2<f64>) -> Option<VertexId<I>> {
        self.vertices
            .iter()
            .position(|v| v.position == *pos)
            .map(VertexId::new)
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// The undirected edge a half-edge belongs to.
    #[inline]
    pub fn edge_key(&self, he: HalfEdgeId<I>) -> EdgeKey<I> {
        EdgeKey::new(self.origin(he), self.dest(he))
    }

    /// Check if a half-edge bounds the outer face.
    #[inline]
    pub fn is_outer_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.face_of(he) == self.outer
    }

    /// Check if either side of an edge is the outer face.
    #[inline]
    pub fn is_outer_edge(&self, he: HalfEdgeId<I>) -> bool {
        self.is_outer_halfedge(he) || self.is_outer_halfedge(self.twin(he))
    }

    /// Check if a vertex lies on the boundary of the outer face.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex_halfedges(v).any(|he| self.is_outer_halfedge(he))
    }

    /// Number of half-edges on the boundary of a face.
    pub fn face_degree(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// Check if the face of a half-edge is a triangle.
    #[inline]
    pub fn is_triangle(&self, he: HalfEdgeId<I>) -> bool {
        let he2 = self.next(self.next(he));
        he2 != he && self.next(he2) == he
    }

    /// Find the half-edge running from `from` to `to`, if the mesh has that edge.
    pub fn find_halfedge(&self, from: VertexId<I>, to: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex_halfedges(from).find(|&he| self.dest(he) == to)
    }

    /// Check whether `a` and `b` are joined by an edge.
    #[inline]
    pub fn contains_edge(&self, a: VertexId<I>, b: VertexId<I>) -> bool {
        self.find_halfedge(a, b).is_some()
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over one half-edge per undirected edge.
    pub fn edge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedge_ids().filter(move |&he| he < self.twin(he))
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all face IDs, including the outer face.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over the bounded face IDs.
    pub fn bounded_face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        let outer = self.outer;
        self.face_ids().filter(move |&f| f != outer)
    }

    /// Iterate over half-edges around a vertex (outgoing half-edges).
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Iterate over faces around a vertex, the outer face included.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.face_of(he))
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Get the three vertices of a triangular face.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// Get the positions of the three vertices of a triangular face.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point2<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    // ==================== Geometry ====================

    /// Signed area of a face, positive for counter-clockwise boundaries.
    pub fn face_signed_area(&self, f: FaceId<I>) -> f64 {
        let pts: Vec<&Point2<f64>> = self.face_vertices(f).map(|v| self.position(v)).collect();
        let n = pts.len();
        (0..n)
            .map(|i| {
                let (a, b) = (pts[i], pts[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            * 0.5
    }

    /// Compute the centroid of a triangular face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point2<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        geometry::centroid(&p0, &p1, &p2)
    }

    /// Compute the length of an edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.dest(he));
        (p1 - p0).norm()
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check every connectivity invariant, reporting the first violation.
    ///
    /// - `twin(twin(e)) == e` and `twin(e) != e`
    /// - `next(prev(e)) == e` and `prev(next(e)) == e`
    /// - `origin(next(e)) == dest(e)`
    /// - walking `next` around a face stays on that face and closes
    /// - each vertex's half-edge originates at that vertex
    /// - the outer face exists and the half-edge count is even
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(MeshError::InvalidState(msg));

        if self.halfedges.len() % 2 != 0 {
            return fail(format!("odd half-edge count {}", self.halfedges.len()));
        }
        if !self.outer.is_valid() || self.outer.index() >= self.faces.len() {
            return fail(format!("outer face {:?} does not exist", self.outer));
        }

        for (vid, v) in self.vertices() {
            if !v.halfedge.is_valid() || v.halfedge.index() >= self.halfedges.len() {
                return fail(format!("{:?} has no outgoing half-edge", vid));
            }
            if self.origin(v.halfedge) != vid {
                return fail(format!("{:?} points at {:?} which starts elsewhere", vid, v.halfedge));
            }
        }

        let in_range = |id: HalfEdgeId<I>| id.is_valid() && id.index() < self.halfedges.len();
        for (heid, he) in self.halfedges() {
            if !(in_range(he.twin) && in_range(he.next) && in_range(he.prev)) {
                return fail(format!("{:?} is not fully linked", heid));
            }
            if !he.face.is_valid() || he.face.index() >= self.faces.len() {
                return fail(format!("{:?} has no face", heid));
            }
            let twin = self.halfedge(he.twin);
            if he.twin == heid || twin.twin != heid {
                return fail(format!("{:?} has inconsistent twin {:?}", heid, he.twin));
            }
            if self.halfedge(he.next).prev != heid {
                return fail(format!("prev(next({:?})) is not {:?}", heid, heid));
            }
            if self.halfedge(he.prev).next != heid {
                return fail(format!("next(prev({:?})) is not {:?}", heid, heid));
            }
            if self.origin(he.next) != twin.origin {
                return fail(format!("{:?} ends where its successor does not start", heid));
            }
        }

        for (fid, f) in self.faces() {
            if !f.halfedge.is_valid() || f.halfedge.index() >= self.halfedges.len() {
                return fail(format!("{:?} has no boundary half-edge", fid));
            }
            let mut he = f.halfedge;
            let mut steps = 0;
            loop {
                if self.face_of(he) != fid {
                    return fail(format!("{:?} on the boundary of {:?} claims another face", he, fid));
                }
                he = self.next(he);
                steps += 1;
                if he == f.halfedge {
                    break;
                }
                if steps > self.halfedges.len() {
                    return fail(format!("boundary of {:?} does not close", fid));
                }
            }
        }

        Ok(())
    }

    // ==================== Internal ====================

    /// Iterate over all faces with their IDs.
    pub(crate) fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Allocate an unlinked twin pair.
    pub(crate) fn add_halfedge_pair(&mut self) -> (HalfEdgeId<I>, HalfEdgeId<I>) {
        let a = HalfEdgeId::new(self.halfedges.len());
        let b = HalfEdgeId::new(self.halfedges.len() + 1);
        self.halfedges.push(HalfEdge {
            twin: b,
            ..HalfEdge::new()
        });
        self.halfedges.push(HalfEdge {
            twin: a,
            ..HalfEdge::new()
        });
        (a, b)
    }

    /// Allocate a face whose boundary starts at `he`.
    pub(crate) fn add_face(&mut self, he: HalfEdgeId<I>) -> FaceId<I> {
        let id = FaceId::new(self.faces.len());
        self.faces.push(Face::new(he));
        id
    }

    /// Add a new vertex and return its ID.
    pub(crate) fn add_vertex(&mut self, position: Point2<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }
}

/// Iterator over half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // he: v -> w, twin(he): w -> v, next(twin(he)) leaves v again.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_loop;

    fn pentagon() -> HalfEdgeMesh {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 1.5),
            Point2::new(1.0, 3.0),
            Point2::new(-1.0, 1.5),
        ];
        build_from_loop(&points).unwrap()
    }

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::<u32>::new(Point2::new(1.0, 2.0));
        assert_eq!(v.position, Point2::new(1.0, 2.0));
        assert!(!v.halfedge.is_valid());
    }

    #[test]
    fn test_loop_topology_queries() {
        let mesh = pentagon();
        let v0 = VertexId::new(0);
        let v1 = VertexId::new(1);
        let v2 = VertexId::new(2);

        assert!(mesh.contains_edge(v0, v1));
        assert!(mesh.contains_edge(v1, v0));
        assert!(!mesh.contains_edge(v0, v2));

        let he = mesh.find_halfedge(v0, v1).unwrap();
        assert_eq!(mesh.origin(he), v0);
        assert_eq!(mesh.dest(he), v1);
        assert!(mesh.is_outer_edge(he));
        assert!(!mesh.is_outer_halfedge(he));
        assert!(mesh.is_outer_halfedge(mesh.twin(he)));

        assert_eq!(mesh.vertex_neighbors(v0).count(), 2);
        assert_eq!(mesh.vertex_faces(v0).count(), 2);
        assert!(mesh.vertex_ids().all(|v| mesh.is_boundary_vertex(v)));
        assert_eq!(mesh.edge_ids().count(), 5);
    }

    #[test]
    fn test_face_orientation() {
        let mesh = pentagon();
        let inner = mesh.bounded_face_ids().next().unwrap();
        assert!(mesh.face_signed_area(inner) > 0.0);
        assert!(mesh.face_signed_area(mesh.outer_face()) < 0.0);
        assert_eq!(mesh.face_degree(inner), 5);
        assert_eq!(mesh.face_degree(mesh.outer_face()), 5);
    }

    #[test]
    fn test_validate_catches_broken_twin() {
        let mut mesh = pentagon();
        assert!(mesh.validate().is_ok());

        let he = HalfEdgeId::new(0);
        mesh.halfedge_mut(he).twin = HalfEdgeId::new(1);
        assert!(matches!(mesh.validate(), Err(MeshError::InvalidState(_))));
        assert!(!mesh.is_valid());
    }

    #[test]
    fn test_find_vertex() {
        let mesh = pentagon();
        assert_eq!(mesh.find_vertex(&Point2::new(3.0, 1.5)), Some(VertexId::new(2)));
        assert_eq!(mesh.find_vertex(&Point2::new(3.0, 1.0)), None);
    }
}
