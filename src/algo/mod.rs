//! Triangulation algorithms.
//!
//! This module contains the algorithms that drive the mesh from a point loop
//! to a constrained Delaunay triangulation:
//!
//! - **Triangulation**: ear clipping of the loop interior and of the pockets
//!   between the loop and its convex hull
//! - **Legalization**: Delaunay edge flipping with cycle detection
//! - **Constraints**: inserting required edges by resolving crossings
//! - **Relaxation**: spring smoothing of interior vertex positions
//!
//! Each algorithm takes the mesh by mutable reference plus an options struct
//! and reports what it did.

pub mod constrain;
pub mod legalize;
pub mod relax;
pub mod triangulate;

pub use constrain::{enforce_edges, enforce_edges_by_position, ConstraintOptions, ConstraintReport};
pub use legalize::{legalize, legalize_edges, Convergence, LegalizeOptions, LegalizeReport};
pub use relax::{relax, RelaxOptions};
pub use triangulate::{triangulate_exterior, triangulate_interior, TriangulateReport};
