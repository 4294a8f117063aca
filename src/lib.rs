//! # Trellis
//!
//! Planar Delaunay triangulation on a half-edge mesh, with required edges.
//!
//! Trellis keeps a doubly-connected edge list over a set of 2-D points and
//! drives it with a handful of local operations (face split, edge flip) to a
//! Delaunay triangulation, then forces required edges, such as the sides of
//! a polygon, into it while keeping the rest as close to Delaunay as they
//! allow.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Ear clipping**: interior of a simple loop and the pockets of its hull
//! - **Legalization**: edge flipping with cycle detection instead of a hang
//! - **Constrained edges**: crossing resolution by flipping, then re-legalization
//! - **JSON I/O** and a small command-line tool
//!
//! ## Quick Start
//!
//! ```
//! use trellis::prelude::*;
//! use nalgebra::Point2;
//!
//! let points = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(3.0, 0.0),
//!     Point2::new(3.0, 2.0),
//!     Point2::new(0.0, 2.0),
//!     Point2::new(1.2, 0.9),
//!     Point2::new(2.1, 1.1),
//! ];
//!
//! let tri: Triangulation = Triangulation::from_points(&points, &TriangulationOptions::default()).unwrap();
//! let mesh = tri.mesh();
//!
//! assert!(mesh.is_valid());
//! assert!(tri.legalization().is_converged());
//! for he in mesh.halfedge_ids() {
//!     assert!(mesh.is_legal(he));
//! }
//! ```
//!
//! ## Polygons
//!
//! ```
//! use trellis::prelude::*;
//! use nalgebra::Point2;
//!
//! let polygon = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(4.0, 1.5),
//!     Point2::new(1.5, 1.5),
//!     Point2::new(1.5, 4.0),
//!     Point2::new(0.0, 4.0),
//! ];
//! let inside = vec![Point2::new(0.7, 0.6), Point2::new(2.9, 0.8)];
//!
//! let tri: Triangulation =
//!     Triangulation::with_polygon(&inside, &polygon, &TriangulationOptions::default()).unwrap();
//! let (vertices, triangles) = tri.interior_triangles();
//! assert_eq!(vertices.len(), 8);
//! assert!(!triangles.is_empty());
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use trellis::prelude::*;
//! use nalgebra::Point2;
//!
//! let square = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//! let mut mesh: HalfEdgeMesh = build_from_loop(&square).unwrap();
//! triangulate_interior(&mut mesh).unwrap();
//!
//! // Iterate over neighbors of a vertex
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! // The outer face is a face like any other
//! assert_eq!(mesh.face_degree(mesh.outer_face()), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod triangulation;

pub use triangulation::{Triangulation, TriangulationOptions};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        enforce_edges, legalize, relax, triangulate_exterior, triangulate_interior, ConstraintOptions,
        LegalizeOptions, RelaxOptions,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_loop, EdgeKey, Face, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, Vertex, VertexId,
    };
    pub use crate::triangulation::{Triangulation, TriangulationOptions};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
