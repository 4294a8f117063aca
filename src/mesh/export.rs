//! Read-only views of a mesh for rendering and export.

use nalgebra::Point2;

use super::halfedge::HalfEdgeMesh;
use super::index::MeshIndex;
use crate::geometry;

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Vertex coordinates in index order.
    pub fn positions(&self) -> Vec<Point2<f64>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Every bounded face as a triple of vertex indices.
    ///
    /// Only meaningful once the mesh is fully triangulated; for a face with
    /// more than three sides only its first three corners are reported.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.bounded_face_ids()
            .map(|f| self.face_triangle(f).map(|v| v.index()))
            .collect()
    }

    /// Triangles whose centroid lies inside `polygon`, with the vertex table.
    ///
    /// After constraining the polygon's edges into the mesh every triangle is
    /// either fully inside or fully outside it, so the centroid decides.
    pub fn interior_triangles(&self, polygon: &[Point2<f64>]) -> (Vec<Point2<f64>>, Vec<[usize; 3]>) {
        let triangles = self
            .bounded_face_ids()
            .filter(|&f| geometry::point_in_polygon(&self.face_centroid(f), polygon))
            .map(|f| self.face_triangle(f).map(|v| v.index()))
            .collect();
        (self.positions(), triangles)
    }

    /// Each undirected edge once, as a pair of endpoint coordinates.
    pub fn edge_segments(&self) -> Vec<[Point2<f64>; 2]> {
        self.edge_ids()
            .map(|he| [*self.position(self.origin(he)), *self.position(self.dest(he))])
            .collect()
    }

    /// Convert to a face-vertex representation.
    ///
    /// Returns (vertices, triangles) tuple.
    pub fn to_face_vertex(&self) -> (Vec<Point2<f64>>, Vec<[usize; 3]>) {
        (self.positions(), self.triangles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_loop, HalfEdgeMesh, VertexId};

    #[test]
    fn test_export_split_square() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let mut mesh: HalfEdgeMesh = build_from_loop(&square).unwrap();
        let e0 = mesh.find_halfedge(VertexId::new(0), VertexId::new(1)).unwrap();
        let e2 = mesh.find_halfedge(VertexId::new(2), VertexId::new(3)).unwrap();
        mesh.split_face(e0, e2).unwrap();

        let (positions, triangles) = mesh.to_face_vertex();
        assert_eq!(positions, square.to_vec());
        assert_eq!(triangles.len(), 2);
        for t in &triangles {
            assert!(t.contains(&0) && t.contains(&2));
        }

        assert_eq!(mesh.edge_segments().len(), 5);

        // Only the lower-right triangle's centroid is inside this polygon.
        let lower_right = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)];
        let (_, inside) = mesh.interior_triangles(&lower_right);
        assert_eq!(inside.len(), 1);
        assert!(inside[0].contains(&1));
    }
}
