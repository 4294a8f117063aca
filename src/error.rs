//! Error types for trellis.
//!
//! Every fallible operation in the crate returns [`MeshError`]. Some variants
//! describe expected, recoverable outcomes rather than faults: the ear-clipping
//! sweep routinely receives [`MeshError::InvalidDiagonal`] and simply moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building or editing a triangulation.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Not enough distinct points to form a triangle.
    #[error("need at least 3 distinct points, got {count}")]
    TooFewPoints {
        /// Number of distinct points supplied.
        count: usize,
    },

    /// The triangulation of this many points would overflow the index type.
    #[error("{count} points exceed the {max} this index type can triangulate")]
    TooManyPoints {
        /// Number of points supplied.
        count: usize,
        /// Largest supported point count.
        max: usize,
    },

    /// The two half-edges passed to a face split do not define a diagonal.
    #[error("half-edges {from} and {to} do not form a diagonal of a common face")]
    InvalidDiagonal {
        /// Index of the first half-edge.
        from: usize,
        /// Index of the second half-edge.
        to: usize,
    },

    /// The ear-clipping sweep went all the way around a face without cutting.
    #[error("no ear found on face {face}; is the input loop simple?")]
    NoEar {
        /// The face being triangulated.
        face: usize,
    },

    /// Edge flipping entered a cycle instead of reaching a fixed point.
    #[error("legalization did not converge after {passes} passes ({flips} flips)")]
    NonConvergent {
        /// Number of passes performed.
        passes: usize,
        /// Total flips performed.
        flips: usize,
    },

    /// A required edge could not be inserted because crossing edges remain.
    #[error("could not insert edge ({from}, {to}): {remaining} crossing edges left")]
    UnresolvedCrossing {
        /// First endpoint vertex index.
        from: usize,
        /// Second endpoint vertex index.
        to: usize,
        /// Number of edges still crossing the required segment.
        remaining: usize,
    },

    /// A constraint references a vertex that does not exist.
    #[error("invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A constraint joins a vertex to itself.
    #[error("constraint joins vertex {vertex} to itself")]
    DegenerateConstraint {
        /// The repeated vertex index.
        vertex: usize,
    },

    /// A constraint endpoint does not coincide with any mesh vertex.
    #[error("no vertex at ({x}, {y})")]
    UnknownVertex {
        /// X coordinate of the unmatched point.
        x: f64,
        /// Y coordinate of the unmatched point.
        y: f64,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file path.
        path: PathBuf,
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Error serializing output.
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = MeshError::NonConvergent { passes: 4, flips: 9 };
        assert_eq!(err.to_string(), "legalization did not converge after 4 passes (9 flips)");

        let err = MeshError::TooManyPoints { count: 20000, max: 10923 };
        assert_eq!(err.to_string(), "20000 points exceed the 10923 this index type can triangulate");

        let err = MeshError::invalid_param("step", -1.0, "must be non-negative");
        assert_eq!(err.to_string(), "invalid parameter: step = -1 (must be non-negative)");
    }
}
