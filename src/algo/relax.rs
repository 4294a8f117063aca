//! Spring relaxation of vertex positions.
//!
//! Every vertex off the outer boundary is pulled toward its neighbors:
//!
//! `p ← p + step · Σ (q − p)` over all neighbors q
//!
//! Vertices are updated one after another in index order, so later vertices
//! already see the moved positions of earlier ones. With `step` at most
//! `1 / degree` a vertex never overshoots the mean of its neighbors. Only
//! positions change; the connectivity stays as it is, so the result may no
//! longer be Delaunay and is usually legalized again.
//!
//! # Example
//!
//! ```
//! use trellis::algo::{relax, RelaxOptions};
//! use trellis::{Triangulation, TriangulationOptions};
//! use nalgebra::Point2;
//!
//! let points = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(0.0, 2.0),
//!     Point2::new(0.6, 0.8),
//! ];
//! let mut tri: Triangulation = Triangulation::from_points(&points, &TriangulationOptions::default()).unwrap();
//!
//! let options = RelaxOptions::default().with_iterations(3).with_step(0.1);
//! relax(tri.mesh_mut(), &options).unwrap();
//! ```

use nalgebra::Vector2;
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Options for [`relax`].
#[derive(Debug, Clone)]
pub struct RelaxOptions {
    /// Number of sweeps over the vertices.
    pub iterations: usize,

    /// Fraction of the summed spring force applied per sweep.
    pub step: f64,
}

impl Default for RelaxOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            step: 0.1,
        }
    }
}

impl RelaxOptions {
    /// Set the number of sweeps.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the step size.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Check that the step is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() {
            return Err(MeshError::invalid_param("step", self.step, "must be finite"));
        }
        if self.step < 0.0 {
            return Err(MeshError::invalid_param("step", self.step, "must be non-negative"));
        }
        Ok(())
    }
}

/// Pull every interior vertex toward its neighbors.
///
/// Vertices on the outer boundary stay fixed.
///
/// # Errors
/// [`MeshError::InvalidParameter`] for a negative or non-finite step; the
/// mesh is not touched.
pub fn relax<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, options: &RelaxOptions) -> Result<()> {
    options.validate()?;
    if options.iterations == 0 || options.step == 0.0 {
        return Ok(());
    }

    let interior: Vec<_> = mesh.vertex_ids().filter(|&v| !mesh.is_boundary_vertex(v)).collect();

    let mut max_move = 0.0_f64;
    for _ in 0..options.iterations {
        max_move = 0.0;
        for &v in &interior {
            let p = *mesh.position(v);
            let force: Vector2<f64> = mesh.vertex_neighbors(v).map(|n| mesh.position(n) - p).sum();
            let delta = force * options.step;
            max_move = max_move.max(delta.norm());
            mesh.set_position(v, p + delta);
        }
    }

    debug!(
        iterations = options.iterations,
        vertices = interior.len(),
        last_max_move = max_move,
        "relaxed vertices"
    );
    Ok(())
}
