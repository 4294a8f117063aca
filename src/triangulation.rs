//! End-to-end triangulation of point sets.
//!
//! [`Triangulation`] runs the whole pipeline: sort the points into a simple
//! loop around their lowest-leftmost point, build the two-face mesh, clip the
//! interior and the hull pockets into triangles, legalize, and optionally
//! force the edges of a polygon into the result.

use nalgebra::Point2;
use tracing::{debug, info};

use crate::algo::{
    enforce_edges_by_position, legalize, triangulate_exterior, triangulate_interior, ConstraintOptions,
    ConstraintReport, LegalizeOptions, LegalizeReport,
};
use crate::error::{MeshError, Result};
use crate::geometry::{self, angular_sort};
use crate::mesh::{build_from_loop, HalfEdgeMesh, MeshIndex};

/// Options for the triangulation pipeline.
#[derive(Debug, Clone, Default)]
pub struct TriangulationOptions {
    /// Options for the Delaunay legalization.
    pub legalize: LegalizeOptions,
    /// Options for polygon edge enforcement.
    pub constraints: ConstraintOptions,
}

impl TriangulationOptions {
    /// Set the legalization options.
    pub fn with_legalize(mut self, legalize: LegalizeOptions) -> Self {
        self.legalize = legalize;
        self
    }

    /// Set the constraint options.
    pub fn with_constraints(mut self, constraints: ConstraintOptions) -> Self {
        self.constraints = constraints;
        self
    }
}

/// A triangulated point set, with the reports of the steps that built it.
///
/// The index type bounds the point count: `Triangulation<u16>` takes at most
/// 10923 distinct points, `u32` about 715 million.
#[derive(Debug, Clone)]
pub struct Triangulation<I: MeshIndex = u32> {
    mesh: HalfEdgeMesh<I>,
    legalization: LegalizeReport,
    constraints: Option<ConstraintReport>,
    polygon: Option<Vec<Point2<f64>>>,
}

impl<I: MeshIndex> Triangulation<I> {
    /// Delaunay-triangulate a point set.
    ///
    /// Exact duplicates are merged. A legalization that does not converge is
    /// not an error; check [`legalization`](Self::legalization).
    ///
    /// # Errors
    /// - [`MeshError::InvalidParameter`] if a coordinate is not finite
    /// - [`MeshError::TooFewPoints`] for fewer than 3 distinct points
    /// - [`MeshError::TooManyPoints`] if the mesh would not fit in `I`
    /// - [`MeshError::NoEar`] if all points are collinear
    ///
    /// # Example
    ///
    /// ```
    /// use trellis::{Triangulation, TriangulationOptions};
    /// use nalgebra::Point2;
    ///
    /// let points = [
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(0.0, 1.0),
    ///     Point2::new(0.4, 0.6),
    /// ];
    /// let tri: Triangulation = Triangulation::from_points(&points, &TriangulationOptions::default()).unwrap();
    ///
    /// // 2n - h - 2 triangles for n points with h on the hull.
    /// assert_eq!(tri.mesh().num_bounded_faces(), 4);
    /// ```
    pub fn from_points(points: &[Point2<f64>], options: &TriangulationOptions) -> Result<Self> {
        let points = distinct(points)?;
        if points.len() < 3 {
            return Err(MeshError::TooFewPoints { count: points.len() });
        }

        let mut mesh = build_from_loop(&angular_sort(&points))?;
        let interior = triangulate_interior(&mut mesh)?;
        let exterior = triangulate_exterior(&mut mesh)?;
        let legalization = legalize(&mut mesh, &options.legalize);

        info!(
            points = points.len(),
            triangles = mesh.num_bounded_faces(),
            ears = interior.ears + exterior.ears,
            flips = legalization.flips,
            converged = legalization.is_converged(),
            "triangulated point set"
        );

        Ok(Self {
            mesh,
            legalization,
            constraints: None,
            polygon: None,
        })
    }

    /// Triangulate a point set so that every edge of `polygon` is a mesh edge.
    ///
    /// The polygon's vertices are added to the point set if missing. Its
    /// edges are the consecutive vertex pairs, closing edge included.
    ///
    /// # Errors
    /// Everything [`from_points`](Self::from_points) reports, plus
    /// [`MeshError::TooFewPoints`] for a polygon with fewer than 3 vertices and
    /// the errors of [`enforce_edges_by_position`].
    pub fn with_polygon(
        points: &[Point2<f64>],
        polygon: &[Point2<f64>],
        options: &TriangulationOptions,
    ) -> Result<Self> {
        if polygon.len() < 3 {
            return Err(MeshError::TooFewPoints { count: polygon.len() });
        }

        let all: Vec<Point2<f64>> = points.iter().chain(polygon).copied().collect();
        let mut triangulation = Self::from_points(&all, options)?;

        let n = polygon.len();
        let segments: Vec<(Point2<f64>, Point2<f64>)> = (0..n).map(|i| (polygon[i], polygon[(i + 1) % n])).collect();
        let report = enforce_edges_by_position(&mut triangulation.mesh, &segments, &options.constraints)?;
        debug!(
            edges = n,
            inserted = report.inserted,
            flips = report.flips,
            "constrained polygon"
        );

        triangulation.constraints = Some(report);
        triangulation.polygon = Some(polygon.to_vec());
        Ok(triangulation)
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &HalfEdgeMesh<I> {
        &self.mesh
    }

    /// Mutable access to the mesh, e.g. for [`relax`](crate::algo::relax).
    pub fn mesh_mut(&mut self) -> &mut HalfEdgeMesh<I> {
        &mut self.mesh
    }

    /// Take the mesh, dropping the reports.
    pub fn into_mesh(self) -> HalfEdgeMesh<I> {
        self.mesh
    }

    /// Report of the Delaunay legalization.
    pub fn legalization(&self) -> &LegalizeReport {
        &self.legalization
    }

    /// Report of the polygon edge enforcement, if a polygon was given.
    pub fn constraints(&self) -> Option<&ConstraintReport> {
        self.constraints.as_ref()
    }

    /// The constraining polygon, if any.
    pub fn polygon(&self) -> Option<&[Point2<f64>]> {
        self.polygon.as_deref()
    }

    /// Vertex table and the triangles inside the polygon.
    ///
    /// Without a polygon every triangle is returned.
    pub fn interior_triangles(&self) -> (Vec<Point2<f64>>, Vec<[usize; 3]>) {
        match &self.polygon {
            Some(polygon) => self.mesh.interior_triangles(polygon),
            None => self.mesh.to_face_vertex(),
        }
    }
}

/// Sorted copy of `points` with exact duplicates removed.
fn distinct(points: &[Point2<f64>]) -> Result<Vec<Point2<f64>>> {
    if let Some(bad) = points.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(MeshError::invalid_param("points", bad, "coordinates must be finite"));
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(geometry::lexicographic);
    sorted.dedup();
    if sorted.len() < points.len() {
        debug!(duplicates = points.len() - sorted.len(), "merged duplicate points");
    }
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::Convergence;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn grid_points() -> Vec<Point2<f64>> {
        // A 4x4 jittered grid: 16 points, 12 on the hull.
        let mut points = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                let jitter = if (1..3).contains(&i) && (1..3).contains(&j) {
                    0.1 * (i as f64 - j as f64 + 0.5)
                } else {
                    0.0
                };
                points.push(p(i as f64 + jitter, j as f64 - jitter * 0.5));
            }
        }
        points
    }

    #[test]
    fn test_triangle_count_matches_euler() {
        let points = grid_points();
        let tri: Triangulation = Triangulation::from_points(&points, &TriangulationOptions::default()).unwrap();
        let mesh = tri.mesh();

        let n = points.len();
        let h = mesh.face_degree(mesh.outer_face());
        assert_eq!(h, 12);
        assert_eq!(mesh.num_bounded_faces(), 2 * n - h - 2);
        assert_eq!(mesh.num_edges(), 3 * n - h - 3);
        assert!(mesh.is_valid());
        assert_eq!(tri.legalization().convergence, Convergence::Converged);
        assert!(tri.constraints().is_none());
        assert!(tri.polygon().is_none());
    }

    #[test]
    fn test_duplicates_are_merged() {
        let points = [p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 0.0), p(0.0, 0.0)];
        let tri: Triangulation = Triangulation::from_points(&points, &TriangulationOptions::default()).unwrap();
        assert_eq!(tri.mesh().num_vertices(), 3);
        assert_eq!(tri.mesh().num_bounded_faces(), 1);
    }

    #[test]
    fn test_too_few_points() {
        let points = [p(0.0, 0.0), p(1.0, 1.0), p(1.0, 1.0)];
        let err = Triangulation::<u32>::from_points(&points, &TriangulationOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::TooFewPoints { count: 2 }));
    }

    #[test]
    fn test_collinear_points() {
        let points = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0), p(3.0, 3.0)];
        let err = Triangulation::<u32>::from_points(&points, &TriangulationOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::NoEar { .. }));
    }

    #[test]
    fn test_three_collinear_points() {
        let points = [p(0.0, 0.0), p(0.0, 3.0), p(0.0, 5.0)];
        let err = Triangulation::<u32>::from_points(&points, &TriangulationOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::NoEar { .. }));
    }

    #[test]
    fn test_non_finite_points() {
        let points = [p(0.0, 0.0), p(1.0, 0.0), p(f64::NAN, 1.0)];
        let err = Triangulation::<u32>::from_points(&points, &TriangulationOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::InvalidParameter { name: "points", .. }));
    }

    /// An L-shaped hexagon with a few points inside and outside it.
    fn l_shape() -> (Vec<Point2<f64>>, Vec<Point2<f64>>) {
        let polygon = vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 1.5),
            p(1.5, 1.5),
            p(1.5, 4.0),
            p(0.0, 4.0),
        ];
        let points = vec![p(0.7, 0.6), p(2.9, 0.8), p(0.8, 3.1), p(3.2, 3.3), p(2.6, 2.2)];
        (points, polygon)
    }

    #[test]
    fn test_polygon_edges_are_enforced() {
        let (points, polygon) = l_shape();
        let tri: Triangulation =
            Triangulation::with_polygon(&points, &polygon, &TriangulationOptions::default()).unwrap();
        let mesh = tri.mesh();

        assert!(mesh.is_valid());
        for i in 0..polygon.len() {
            let a = mesh.find_vertex(&polygon[i]).unwrap();
            let b = mesh.find_vertex(&polygon[(i + 1) % polygon.len()]).unwrap();
            assert!(mesh.contains_edge(a, b), "missing polygon edge {}", i);
        }
        assert_eq!(tri.polygon(), Some(polygon.as_slice()));
        assert!(tri.constraints().is_some());
    }

    #[test]
    fn test_interior_triangles_cover_polygon() {
        let (points, polygon) = l_shape();
        let tri: Triangulation =
            Triangulation::with_polygon(&points, &polygon, &TriangulationOptions::default()).unwrap();

        let (vertices, triangles) = tri.interior_triangles();
        assert_eq!(vertices.len(), 11);
        assert!(triangles.len() < tri.mesh().num_bounded_faces());

        // The kept triangles tile the L exactly: area 4 * 1.5 + 1.5 * 2.5.
        let area: f64 = triangles
            .iter()
            .map(|&[a, b, c]| geometry::cross(&vertices[a], &vertices[b], &vertices[c]) * 0.5)
            .sum();
        assert!((area - 9.75).abs() < 1e-9);

        // No kept triangle uses the points outside the L.
        let outside = tri.mesh().find_vertex(&p(3.2, 3.3)).unwrap().index();
        assert!(triangles.iter().all(|t| !t.contains(&outside)));
    }

    #[test]
    fn test_small_polygon_is_rejected() {
        let err = Triangulation::<u32>::with_polygon(
            &[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)],
            &[p(0.0, 0.0), p(1.0, 0.0)],
            &TriangulationOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MeshError::TooFewPoints { count: 2 }));
    }
}
