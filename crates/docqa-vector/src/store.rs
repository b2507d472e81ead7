//! On-disk layout of a saved index.
//!
//! A saved index is a folder holding two co-located artifacts: `index.json`
//! (dimension plus the normalized vectors, in insertion order) and
//! `chunks.json` (the chunk texts, same order). They are written index first,
//! so a crash between the two writes leaves a pair whose lengths disagree;
//! `read_pair` reports that as `CorruptState` instead of repairing it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use docqa_core::{Error, Result};

pub const INDEX_FILE: &str = "index.json";
pub const CHUNKS_FILE: &str = "chunks.json";

#[derive(Debug, Deserialize)]
pub(crate) struct IndexArtifact {
    pub dim: usize,
    pub vectors: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct IndexArtifactRef<'a> {
    dim: usize,
    vectors: &'a [Vec<f32>],
}

pub fn index_path(folder: &Path) -> PathBuf { folder.join(INDEX_FILE) }
pub fn chunks_path(folder: &Path) -> PathBuf { folder.join(CHUNKS_FILE) }

/// Both artifacts are present under `folder`.
pub fn artifacts_exist(folder: &Path) -> bool {
    index_path(folder).is_file() && chunks_path(folder).is_file()
}

pub(crate) fn write_pair(folder: &Path, dim: usize, vectors: &[Vec<f32>], chunks: &[String]) -> Result<()> {
    fs::create_dir_all(folder)?;
    write_json(&index_path(folder), &IndexArtifactRef { dim, vectors })?;
    write_json(&chunks_path(folder), chunks)?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// A file that opens but does not parse, e.g. one cut short by a crash, is
/// `CorruptState`; failing to open it stays an I/O error.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| Error::CorruptState(format!("{}: {e}", path.display())))
}

/// Read and cross-check both artifacts. Nothing is returned unless the pair
/// is consistent.
pub(crate) fn read_pair(folder: &Path) -> Result<(IndexArtifact, Vec<String>)> {
    let artifact: IndexArtifact = read_json(&index_path(folder))?;
    let chunks: Vec<String> = read_json(&chunks_path(folder))?;

    if artifact.vectors.len() != chunks.len() {
        return Err(Error::CorruptState(format!(
            "{} vectors but {} chunks in {}",
            artifact.vectors.len(),
            chunks.len(),
            folder.display()
        )));
    }
    if chunks.is_empty() || artifact.dim == 0 {
        return Err(Error::CorruptState(format!("empty index in {}", folder.display())));
    }
    if let Some(pos) = artifact.vectors.iter().position(|v| v.len() != artifact.dim) {
        return Err(Error::CorruptState(format!(
            "vector {} has dimension {}, expected {}",
            pos,
            artifact.vectors[pos].len(),
            artifact.dim
        )));
    }
    Ok((artifact, chunks))
}
