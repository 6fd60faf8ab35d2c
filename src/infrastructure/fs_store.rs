// Filesystem artifact store over the uploads directory
use crate::application::artifact_store::ArtifactStore;
use crate::domain::artifact::{Artifact, ArtifactPattern};
use crate::domain::error::RenderError;
use crate::domain::table::Table;
use crate::infrastructure::tabular;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    uploads_dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }
}

/// Pick the newest file in `dir` matching `pattern`.
///
/// A missing or unreadable directory is the same as no match. Equal
/// modification times fall back to the lexicographically last file name.
pub fn resolve_latest(dir: &Path, logical_name: &str, pattern: &ArtifactPattern) -> Option<Artifact> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "cannot list uploads directory: {}", e);
            return None;
        }
    };

    let mut latest: Option<(DateTime<Utc>, String, PathBuf)> = None;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !pattern.matches(name) {
            continue;
        }

        // Follow symlinks: file type and mtime come from the target
        let modified = match std::fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => match meta.modified() {
                Ok(time) => DateTime::<Utc>::from(time),
                Err(e) => {
                    tracing::debug!(file = name, "no modification time: {}", e);
                    continue;
                }
            },
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(file = name, "cannot stat artifact: {}", e);
                continue;
            }
        };

        let newer = latest
            .as_ref()
            .is_none_or(|(time, best, _)| (modified, name) > (*time, best.as_str()));
        if newer {
            latest = Some((modified, name.to_string(), entry.path()));
        }
    }

    let (modified, name, path) = latest?;
    tracing::debug!(%pattern, file = %name, %modified, "resolved artifact");
    Some(Artifact {
        logical_name: logical_name.to_string(),
        path,
        modified,
        format: pattern.format(),
    })
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn resolve(&self, logical_name: &str, pattern: &ArtifactPattern) -> Option<Artifact> {
        let dir = self.uploads_dir.clone();
        let logical_name = logical_name.to_string();
        let pattern = pattern.clone();

        tokio::task::spawn_blocking(move || resolve_latest(&dir, &logical_name, &pattern))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("artifact resolution task failed: {}", e);
                None
            })
    }

    async fn load_table(&self, artifact: &Artifact) -> Result<Table, RenderError> {
        let owned = artifact.clone();
        tokio::task::spawn_blocking(move || tabular::load_table(&owned))
            .await
            .map_err(|e| RenderError::parse_failure(artifact.file_name(), e))?
    }

    async fn read_bytes(&self, artifact: &Artifact) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&artifact.path).await
    }
}
