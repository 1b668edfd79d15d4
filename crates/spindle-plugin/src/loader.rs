// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem helpers for loading plugin sources by path.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use spindle_core::{ScriptEngine, SpindleError};

/// Plugin name for a source file: its file name up to the first `.`.
///
/// `plugins/upper.filter.js` is loaded as `upper`.
pub fn plugin_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.split('.').next()?;
    (!stem.is_empty()).then(|| stem.to_string())
}

/// First engine, in registration order, that recognizes `path`.
pub fn select_engine(
    engines: &[Rc<dyn ScriptEngine>],
    path: &Path,
) -> Option<Rc<dyn ScriptEngine>> {
    engines
        .iter()
        .find(|engine| engine.matches_source(path))
        .cloned()
}

pub fn read_source(path: &Path) -> Result<String, SpindleError> {
    std::fs::read_to_string(path).map_err(|source| SpindleError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Regular files directly inside `dir`, sorted by path. Hidden files
/// (leading `.`) are skipped.
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>, SpindleError> {
    let io_err = |source| SpindleError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if path.is_file() && plugin_name(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
