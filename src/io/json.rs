//! JSON reading and writing.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{PointSet, TriangulationOutput};
use crate::error::{MeshError, Result};

/// Load a point set.
///
/// # Errors
/// [`MeshError::Io`] if the file cannot be opened and [`MeshError::Parse`]
/// if it is not a valid point set document.
pub fn load_points<P: AsRef<Path>>(path: P) -> Result<PointSet> {
    let set: PointSet = load(path.as_ref())?;
    debug!(
        path = %path.as_ref().display(),
        points = set.points.len(),
        polygon = set.polygon.as_ref().map_or(0, Vec::len),
        "loaded point set"
    );
    Ok(set)
}

/// Save a point set.
pub fn save_points<P: AsRef<Path>>(set: &PointSet, path: P) -> Result<()> {
    save(set, path.as_ref())
}

/// Load a triangulation written by [`save_output`].
pub fn load_output<P: AsRef<Path>>(path: P) -> Result<TriangulationOutput> {
    load(path.as_ref())
}

/// Save a triangulation.
pub fn save_output<P: AsRef<Path>>(output: &TriangulationOutput, path: P) -> Result<()> {
    save(output, path.as_ref())?;
    debug!(
        path = %path.as_ref().display(),
        vertices = output.vertices.len(),
        triangles = output.triangles.len(),
        "saved triangulation"
    );
    Ok(())
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|source| MeshError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
