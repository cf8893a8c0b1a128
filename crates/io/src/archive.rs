//! History archives: one JSON document holding every frame and optional
//! metadata, `{"history": [...], "meta": ...}`.
//!
//! Frames are validated on load, so a loaded archive always yields a
//! non-empty history of congruent grids. Round trips are element-exact.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use cellsim_core::{AutomataError, History};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ensure_parent_dir;

#[derive(Serialize)]
struct ArchiveOut<'a> {
    history: &'a History,
    meta: Option<&'a Value>,
}

#[derive(Deserialize)]
struct ArchiveIn {
    history: History,
    #[serde(default)]
    meta: Option<Value>,
}

/// Writes `history` and `meta` to `path`, creating parent directories.
pub fn save_history(
    path: &Path,
    history: &History,
    meta: Option<&Value>,
) -> Result<(), AutomataError> {
    ensure_parent_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &ArchiveOut { history, meta })?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), frames = history.len(), "saved history archive");
    Ok(())
}

fn read(path: &Path) -> Result<ArchiveIn, AutomataError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Loads the frames stored at `path`.
pub fn load_history(path: &Path) -> Result<History, AutomataError> {
    read(path).map(|archive| archive.history)
}

/// Loads the metadata stored at `path`; `None` when absent or null.
pub fn load_meta(path: &Path) -> Result<Option<Value>, AutomataError> {
    read(path).map(|archive| archive.meta)
}
