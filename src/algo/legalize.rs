//! Delaunay legalization by repeated edge flips.
//!
//! Each pass visits every candidate half-edge and flips the ones that fail
//! [`HalfEdgeMesh::is_legal`]. A pass without flips is a fixed point and the
//! triangulation is Delaunay. With floating-point predicates, near-cocircular
//! points can make flips undo each other forever, so every pass's set of
//! flipped half-edges is remembered; seeing the same set twice means the run
//! is cycling and it stops with [`Convergence::NonConvergent`].
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::algo::{legalize, triangulate_exterior, triangulate_interior, LegalizeOptions};
//! use nalgebra::Point2;
//!
//! let points = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, -0.5),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(2.0, 0.5),
//! ];
//! let mut mesh: HalfEdgeMesh = build_from_loop(&points).unwrap();
//! triangulate_interior(&mut mesh).unwrap();
//! triangulate_exterior(&mut mesh).unwrap();
//!
//! let report = legalize(&mut mesh, &LegalizeOptions::default());
//! assert!(report.is_converged());
//! ```

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeKey, HalfEdgeId, HalfEdgeMesh, MeshIndex};

/// Options for legalization.
#[derive(Debug, Clone, Default)]
pub struct LegalizeOptions {
    /// Stop with [`Convergence::NonConvergent`] after this many passes even
    /// if no cycle was seen. `None` relies on cycle detection alone.
    pub max_passes: Option<usize>,
}

impl LegalizeOptions {
    /// Create options with a hard limit on the number of passes.
    pub fn with_max_passes(max_passes: usize) -> Self {
        Self {
            max_passes: Some(max_passes),
        }
    }
}

/// How a legalization run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// A pass made no flips; every candidate edge is legal.
    Converged,
    /// Flipping cycled (or hit the pass limit). The mesh is valid but not
    /// guaranteed to be Delaunay.
    NonConvergent,
}

/// Outcome of a legalization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalizeReport {
    /// Number of passes performed, including the final one.
    pub passes: usize,
    /// Total number of flips.
    pub flips: usize,
    /// How the run ended.
    pub convergence: Convergence,
}

impl LegalizeReport {
    /// Whether the run reached a fixed point.
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.convergence == Convergence::Converged
    }

    /// Turn a non-convergent run into [`MeshError::NonConvergent`].
    pub fn into_result(self) -> Result<Self> {
        match self.convergence {
            Convergence::Converged => Ok(self),
            Convergence::NonConvergent => Err(MeshError::NonConvergent {
                passes: self.passes,
                flips: self.flips,
            }),
        }
    }
}

/// Flip illegal edges across the whole mesh until none remain.
///
/// Every half-edge is a candidate, so both directions of an edge are checked
/// each pass (the second check sees the already-flipped edge and is a no-op).
pub fn legalize<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, options: &LegalizeOptions) -> LegalizeReport {
    let candidates: Vec<HalfEdgeId<I>> = mesh.halfedge_ids().collect();
    let report = run(mesh, &candidates, &HashSet::new(), options);
    debug!(passes = report.passes, flips = report.flips, converged = report.is_converged(), "legalized mesh");
    report
}

/// Legalize only the given half-edges, never flipping a `fixed` edge.
///
/// Used after inserting required edges: the flips that carved out room for
/// them are revisited, while the required edges themselves stay put.
pub fn legalize_edges<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    candidates: &[HalfEdgeId<I>],
    fixed: &HashSet<EdgeKey<I>>,
    options: &LegalizeOptions,
) -> LegalizeReport {
    let report = run(mesh, candidates, fixed, options);
    debug!(
        candidates = candidates.len(),
        passes = report.passes,
        flips = report.flips,
        converged = report.is_converged(),
        "legalized edges"
    );
    report
}

fn run<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    candidates: &[HalfEdgeId<I>],
    fixed: &HashSet<EdgeKey<I>>,
    options: &LegalizeOptions,
) -> LegalizeReport {
    let mut seen: HashSet<Vec<HalfEdgeId<I>>> = HashSet::new();
    let mut passes = 0;
    let mut flips = 0;

    loop {
        passes += 1;

        let mut changed = Vec::new();
        for &he in candidates {
            if fixed.contains(&mesh.edge_key(he)) {
                continue;
            }
            if !mesh.is_legal(he) {
                mesh.flip(he);
                changed.push(he);
            }
        }
        flips += changed.len();

        if changed.is_empty() {
            return LegalizeReport {
                passes,
                flips,
                convergence: Convergence::Converged,
            };
        }

        if !seen.insert(changed) {
            warn!(passes, flips, "edge flips are cycling; stopping legalization");
            return non_convergent(passes, flips);
        }

        if options.max_passes.is_some_and(|max| passes >= max) {
            warn!(passes, flips, "legalization hit the pass limit");
            return non_convergent(passes, flips);
        }
    }
}

fn non_convergent(passes: usize, flips: usize) -> LegalizeReport {
    LegalizeReport {
        passes,
        flips,
        convergence: Convergence::NonConvergent,
    }
}
