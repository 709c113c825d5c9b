//! Startup-time model loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{LinearScaling, LoadError, ModelEntry, ModelKind};

/// Artifact file locations, one per model kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    paths: BTreeMap<ModelKind, PathBuf>,
}

impl ArtifactPaths {
    /// Default file names resolved against `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let paths = ModelKind::ALL
            .into_iter()
            .map(|kind| (kind, dir.join(kind.default_file_name())))
            .collect();
        Self { paths }
    }

    /// Override the location of one artifact.
    pub fn with_path(mut self, kind: ModelKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }

    pub fn path(&self, kind: ModelKind) -> &Path {
        &self.paths[&kind]
    }
}

/// Identifier → loaded model, plus the reason every missing identifier failed.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    entries: BTreeMap<ModelKind, ModelEntry>,
    failures: BTreeMap<ModelKind, String>,
}

impl ModelRegistry {
    /// Load every artifact independently.
    ///
    /// A model that fails to load is logged and recorded in
    /// [`failures`](Self::failures); the rest of the registry is unaffected.
    /// Models whose input width differs from `n_features` count as failures.
    pub fn load(paths: &ArtifactPaths, scaling: LinearScaling, n_features: usize) -> Self {
        let mut registry = Self::default();

        for kind in ModelKind::ALL {
            let path = paths.path(kind);
            let loaded = ModelEntry::from_artifact(kind, path, scaling).and_then(|entry| {
                if entry.n_features() == n_features {
                    Ok(entry)
                } else {
                    Err(LoadError::WidthMismatch {
                        model: kind,
                        expected: n_features,
                        actual: entry.n_features(),
                    })
                }
            });

            match loaded {
                Ok(entry) => {
                    info!(model = %kind, path = %path.display(), summary = %entry.summary(), "model loaded");
                    registry.entries.insert(kind, entry);
                }
                Err(error) => {
                    warn!(model = %kind, path = %path.display(), %error, "model failed to load");
                    registry.failures.insert(kind, error.to_string());
                }
            }
        }

        info!(
            loaded = ?registry.loaded().collect::<Vec<_>>(),
            failed = registry.failures.len(),
            "model registry ready"
        );
        registry
    }

    /// Build a registry from already-constructed entries.
    pub fn from_entries(entries: impl IntoIterator<Item = ModelEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.kind(), e)).collect(),
            failures: BTreeMap::new(),
        }
    }

    pub fn get(&self, kind: ModelKind) -> Option<&ModelEntry> {
        self.entries.get(&kind)
    }

    /// Identifiers that loaded, in [`ModelKind::ALL`] order.
    pub fn loaded(&self) -> impl Iterator<Item = ModelKind> + '_ {
        self.entries.keys().copied()
    }

    pub fn failures(&self) -> &BTreeMap<ModelKind, String> {
        &self.failures
    }

    /// Load failure recorded for `kind`, if any.
    pub fn failure(&self, kind: ModelKind) -> Option<&str> {
        self.failures.get(&kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
