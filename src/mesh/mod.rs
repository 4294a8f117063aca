//! Core mesh data structures.
//!
//! This module provides the planar half-edge mesh and the local operations
//! that every higher-level algorithm is built from.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], a doubly-connected edge list over a
//! set of planar points. Besides the bounded faces it has one distinguished
//! *outer face* covering everything outside the point set, so every half-edge
//! has a face and every walk closes.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Local operations
//!
//! - [`HalfEdgeMesh::split_face`] cuts a face along a diagonal (the only
//!   operation that allocates)
//! - [`HalfEdgeMesh::flip`] swaps the diagonal of two adjacent triangles
//! - [`HalfEdgeMesh::is_legal`] and [`HalfEdgeMesh::is_flippable`] decide when
//!   a flip is wanted and when it is allowed
//!
//! # Construction
//!
//! ```
//! use trellis::mesh::{HalfEdgeMesh, build_from_loop};
//! use nalgebra::Point2;
//!
//! let triangle = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.5, 1.0),
//! ];
//!
//! let mesh: HalfEdgeMesh = build_from_loop(&triangle).unwrap();
//! assert!(mesh.is_valid());
//! ```

mod builder;
mod export;
mod halfedge;
mod index;
mod surgery;

pub use builder::build_from_loop;
pub use halfedge::{Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter};
pub use index::{EdgeKey, FaceId, HalfEdgeId, MeshIndex, VertexId};
