//! File I/O for point sets and triangulations.
//!
//! Everything is stored as JSON:
//!
//! | Document | Shape |
//! |----------|-------|
//! | [`PointSet`] | `{"points": [[x, y], ...], "polygon": [[x, y], ...]}` (polygon optional) |
//! | [`TriangulationOutput`] | `{"vertices": [[x, y], ...], "triangles": [[i, j, k], ...], "edges": [[[x, y], [x, y]], ...]}` |
//!
//! # Usage
//!
//! ```no_run
//! use trellis::io::{load_points, save_output, TriangulationOutput};
//! use trellis::{Triangulation, TriangulationOptions};
//!
//! let input = load_points("points.json").unwrap();
//! let tri: Triangulation = Triangulation::from_points(&input.points(), &TriangulationOptions::default()).unwrap();
//! save_output(&TriangulationOutput::from_mesh(tri.mesh()), "mesh.json").unwrap();
//! ```

pub mod json;

pub use json::{load_output, load_points, save_output, save_points};

use std::collections::BTreeSet;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// A point set, optionally with a polygon to constrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    /// The points to triangulate.
    pub points: Vec<[f64; 2]>,

    /// Polygon vertices in order; the closing edge is implied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<[f64; 2]>>,
}

impl PointSet {
    /// Create a point set without a polygon.
    pub fn new(points: &[Point2<f64>]) -> Self {
        Self {
            points: points.iter().map(to_pair).collect(),
            polygon: None,
        }
    }

    /// Attach a polygon.
    pub fn with_polygon(mut self, polygon: &[Point2<f64>]) -> Self {
        self.polygon = Some(polygon.iter().map(to_pair).collect());
        self
    }

    /// The points as nalgebra points.
    pub fn points(&self) -> Vec<Point2<f64>> {
        self.points.iter().map(from_pair).collect()
    }

    /// The polygon as nalgebra points, if present.
    pub fn polygon(&self) -> Option<Vec<Point2<f64>>> {
        self.polygon.as_ref().map(|poly| poly.iter().map(from_pair).collect())
    }
}

/// Vertex table, triangle list and edge list of a triangulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulationOutput {
    /// Vertex coordinates in index order.
    pub vertices: Vec<[f64; 2]>,
    /// Counter-clockwise vertex index triples.
    pub triangles: Vec<[usize; 3]>,
    /// Each undirected edge once, as two coordinate pairs.
    pub edges: Vec<[[f64; 2]; 2]>,
}

impl TriangulationOutput {
    /// Every bounded triangle and every edge of the mesh.
    pub fn from_mesh<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Self {
        Self {
            vertices: mesh.positions().iter().map(to_pair).collect(),
            triangles: mesh.triangles(),
            edges: mesh
                .edge_segments()
                .iter()
                .map(|[a, b]| [to_pair(a), to_pair(b)])
                .collect(),
        }
    }

    /// A subset of triangles; the edges are those of the given triangles.
    pub fn from_triangles(vertices: &[Point2<f64>], triangles: Vec<[usize; 3]>) -> Self {
        let pairs: BTreeSet<(usize, usize)> = triangles
            .iter()
            .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
            .map(|(u, v)| (u.min(v), u.max(v)))
            .collect();

        Self {
            vertices: vertices.iter().map(to_pair).collect(),
            edges: pairs
                .into_iter()
                .map(|(u, v)| [to_pair(&vertices[u]), to_pair(&vertices[v])])
                .collect(),
            triangles,
        }
    }
}

fn to_pair(p: &Point2<f64>) -> [f64; 2] {
    [p.x, p.y]
}

fn from_pair(&[x, y]: &[f64; 2]) -> Point2<f64> {
    Point2::new(x, y)
}
