//! Directory listing rooted at a configured base path.

use std::path::{Component, Path, PathBuf};

use crate::error::MediatorError;
use crate::protocol::{DirEntry, EntryType, ListDir};

/// Resolve `sub_path` (as taken from the request URL) under `base`.
///
/// Only plain path components are allowed; `..`, absolute paths and drive
/// prefixes are rejected so a request cannot leave `base`.
pub fn resolve(base: &Path, sub_path: &str) -> Result<PathBuf, MediatorError> {
    let mut path = base.to_path_buf();
    for component in Path::new(sub_path).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(MediatorError::InvalidPath(sub_path.to_string()));
            }
        }
    }
    Ok(path)
}

/// List the directory `sub_path` under `base`, sorted by name.
pub async fn list_dir(base: &Path, sub_path: &str) -> Result<ListDir, MediatorError> {
    let dir = resolve(base, sub_path)?;
    let mut reader = tokio::fs::read_dir(&dir).await?;

    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let kind = if entry.file_type().await?.is_dir() {
            EntryType::Dir
        } else {
            EntryType::File
        };
        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!(dir = %dir.display(), count = entries.len(), "listed directory");
    Ok(ListDir { entries })
}

// ── Tests ────────────────────────────────────────────────────────
