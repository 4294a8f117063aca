//! Inserting required edges into a triangulation by flipping.
//!
//! For each required edge that is not already in the mesh, every edge whose
//! segment crosses it is queued. Edges are flipped one at a time from the
//! front of the queue; an edge that cannot be flipped yet (its quadrilateral
//! is not convex), or that still crosses after flipping, goes to the back. In
//! a valid triangulation some queued edge is always flippable, so the queue
//! drains and the required edge appears.
//!
//! Floating-point predicates can break that guarantee for nearly collinear
//! points, so the queue is watched: a full cycle without a flip, or too many
//! cycles overall, stops with [`MeshError::UnresolvedCrossing`].
//!
//! Afterwards the edges created by the flips are legalized again with every
//! required edge held fixed, which restores the Delaunay property wherever
//! the required edges allow it.

use std::collections::{HashSet, VecDeque};

use nalgebra::Point2;
use tracing::{debug, warn};

use super::legalize::{legalize_edges, LegalizeOptions, LegalizeReport};
use crate::error::{MeshError, Result};
use crate::geometry::segment_crossing;
use crate::mesh::{EdgeKey, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Options for constraint enforcement.
#[derive(Debug, Clone)]
pub struct ConstraintOptions {
    /// Give up on a required edge after this many passes through its
    /// crossing queue.
    pub max_queue_cycles: usize,
    /// Re-legalize the edges created by the flips once all required edges
    /// are in place.
    pub relegalize: bool,
    /// Options for that re-legalization.
    pub legalize: LegalizeOptions,
}

impl Default for ConstraintOptions {
    fn default() -> Self {
        Self {
            max_queue_cycles: 64,
            relegalize: true,
            legalize: LegalizeOptions::default(),
        }
    }
}

impl ConstraintOptions {
    /// Set the cap on crossing-queue cycles.
    pub fn with_max_queue_cycles(mut self, cycles: usize) -> Self {
        self.max_queue_cycles = cycles;
        self
    }

    /// Enable or disable the re-legalization pass.
    pub fn with_relegalize(mut self, relegalize: bool) -> Self {
        self.relegalize = relegalize;
        self
    }

    /// Set the options used for re-legalization.
    pub fn with_legalize(mut self, legalize: LegalizeOptions) -> Self {
        self.legalize = legalize;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_queue_cycles == 0 {
            return Err(MeshError::invalid_param(
                "max_queue_cycles",
                self.max_queue_cycles,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Outcome of constraint enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstraintReport {
    /// Required edges that had to be created by flipping.
    pub inserted: usize,
    /// Required edges that were already in the mesh.
    pub already_present: usize,
    /// Flips spent resolving crossings.
    pub flips: usize,
    /// Result of the re-legalization pass, if it ran.
    pub relegalization: Option<LegalizeReport>,
}

/// Make every pair in `constraints` an edge of the mesh.
///
/// Duplicate pairs (in either direction) are only counted once. Required
/// edges must not cross each other.
///
/// # Errors
/// - [`MeshError::InvalidVertexIndex`] or [`MeshError::DegenerateConstraint`]
///   for a bad pair, before the mesh is touched
/// - [`MeshError::UnresolvedCrossing`] if a required edge cannot be inserted;
///   the mesh is still a valid triangulation, but may lack some required edges
pub fn enforce_edges<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    constraints: &[(VertexId<I>, VertexId<I>)],
    options: &ConstraintOptions,
) -> Result<ConstraintReport> {
    options.validate()?;

    let mut fixed: HashSet<EdgeKey<I>> = HashSet::with_capacity(constraints.len());
    let mut pending = Vec::with_capacity(constraints.len());
    for &(u, v) in constraints {
        for w in [u, v] {
            if w.index() >= mesh.num_vertices() {
                return Err(MeshError::InvalidVertexIndex { vertex: w.index() });
            }
        }
        if u == v {
            return Err(MeshError::DegenerateConstraint { vertex: u.index() });
        }
        if fixed.insert(EdgeKey::new(u, v)) {
            pending.push((u, v));
        }
    }

    let mut report = ConstraintReport::default();
    let mut created = Vec::new();
    let mut inserted: HashSet<EdgeKey<I>> = HashSet::new();

    for (u, v) in pending {
        if mesh.contains_edge(u, v) {
            report.already_present += 1;
        } else {
            report.flips += insert_edge(mesh, u, v, &inserted, options, &mut created)?;
            report.inserted += 1;
        }
        inserted.insert(EdgeKey::new(u, v));
    }

    if options.relegalize && !created.is_empty() {
        report.relegalization = Some(legalize_edges(mesh, &created, &fixed, &options.legalize));
    }

    debug!(
        inserted = report.inserted,
        already_present = report.already_present,
        flips = report.flips,
        "enforced constraints"
    );
    Ok(report)
}

/// Make every coordinate pair an edge, matching endpoints to vertices by
/// exact position.
///
/// # Errors
/// [`MeshError::UnknownVertex`] if an endpoint is not a vertex of the mesh,
/// plus everything [`enforce_edges`] reports.
pub fn enforce_edges_by_position<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    segments: &[(Point2<f64>, Point2<f64>)],
    options: &ConstraintOptions,
) -> Result<ConstraintReport> {
    let lookup = |mesh: &HalfEdgeMesh<I>, p: &Point2<f64>| {
        mesh.find_vertex(p).ok_or(MeshError::UnknownVertex { x: p.x, y: p.y })
    };

    let constraints = segments
        .iter()
        .map(|(p, q)| Ok((lookup(mesh, p)?, lookup(mesh, q)?)))
        .collect::<Result<Vec<_>>>()?;

    enforce_edges(mesh, &constraints, options)
}

/// Flip away every edge crossing u-v. Returns the number of flips and
/// appends each non-crossing edge produced to `created`.
fn insert_edge<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    u: VertexId<I>,
    v: VertexId<I>,
    locked: &HashSet<EdgeKey<I>>,
    options: &ConstraintOptions,
    created: &mut Vec<HalfEdgeId<I>>,
) -> Result<usize> {
    let unresolved = |remaining: usize| MeshError::UnresolvedCrossing {
        from: u.index(),
        to: v.index(),
        remaining,
    };

    let mut queue: VecDeque<HalfEdgeId<I>> = mesh.edge_ids().filter(|&he| crosses(mesh, he, u, v)).collect();

    if queue.iter().any(|&he| locked.contains(&mesh.edge_key(he))) {
        warn!(from = u.index(), to = v.index(), "required edges cross each other");
        return Err(unresolved(queue.len()));
    }

    let mut flips = 0;
    let mut cycles = 0;
    let mut left_in_cycle = queue.len();
    let mut flipped_in_cycle = false;

    while let Some(he) = queue.pop_front() {
        if mesh.is_flippable(he) {
            mesh.flip(he);
            flips += 1;
            flipped_in_cycle = true;
            if crosses(mesh, he, u, v) {
                queue.push_back(he);
            } else {
                created.push(he);
            }
        } else {
            queue.push_back(he);
        }

        left_in_cycle -= 1;
        if left_in_cycle == 0 && !queue.is_empty() {
            cycles += 1;
            if !flipped_in_cycle || cycles >= options.max_queue_cycles {
                warn!(
                    from = u.index(),
                    to = v.index(),
                    cycles,
                    remaining = queue.len(),
                    "crossing queue stalled"
                );
                return Err(unresolved(queue.len()));
            }
            left_in_cycle = queue.len();
            flipped_in_cycle = false;
        }
    }

    // A vertex lying exactly on u-v blocks the edge without crossing it.
    if !mesh.contains_edge(u, v) {
        warn!(from = u.index(), to = v.index(), "required edge passes through a vertex");
        return Err(unresolved(0));
    }

    Ok(flips)
}

fn crosses<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, he: HalfEdgeId<I>, u: VertexId<I>, v: VertexId<I>) -> bool {
    segment_crossing(
        mesh.position(u),
        mesh.position(v),
        mesh.position(mesh.origin(he)),
        mesh.position(mesh.dest(he)),
    )
}
