//! Readers for the persisted model artifacts.
//!
//! Each submodule owns the serde schema of one foreign format ("foreign types",
//! used only for parsing) and its conversion into [`crate::repr`] types:
//!
//! - [`xgboost`]: XGBoost's JSON model format (gbtree / dart boosters)
//! - [`sklearn`]: JSON exports of scikit-learn trees, forests, linear models,
//!   polynomial expanders and scalers

pub mod sklearn;
pub mod xgboost;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::repr::{ForestValidationError, TransformError, TreeValidationError};

/// Error converting a parsed artifact into a native representation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("tree {0} has no nodes")]
    EmptyTree(usize),
    #[error(
        "invalid node index in tree {tree}: node {node} references child {child} but tree has {num_nodes} nodes"
    )]
    InvalidNodeIndex {
        tree: usize,
        node: usize,
        child: i64,
        num_nodes: usize,
    },
    #[error("tree {tree}: array `{field}` has {actual} entries, expected {expected}")]
    ArrayLengthMismatch {
        tree: usize,
        field: &'static str,
        actual: usize,
        expected: usize,
    },
    #[error("tree {tree}: node {node} has invalid feature index {feature}")]
    InvalidFeatureIndex { tree: usize, node: usize, feature: i64 },
    #[error("tree {tree}: node {node} uses a categorical split, which is not supported")]
    UnsupportedCategoricalSplit { tree: usize, node: usize },
    #[error("gblinear boosters are not supported")]
    LinearBooster,
    #[error("ensemble has no trees")]
    EmptyEnsemble,
    #[error("{what}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("invalid polynomial transformer: {0}")]
    InvalidPolynomial(String),
    #[error("tree {tree}: {source}")]
    InvalidTree {
        tree: usize,
        #[source]
        source: TreeValidationError,
    },
    #[error(transparent)]
    InvalidForest(#[from] ForestValidationError),
    #[error(transparent)]
    InvalidTransform(#[from] TransformError),
}

/// Error loading an artifact from disk.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to convert {}: {source}", path.display())]
    Conversion {
        path: PathBuf,
        #[source]
        source: ConversionError,
    },
}

impl ArtifactError {
    /// Attach a path to a conversion failure.
    pub fn conversion(path: impl AsRef<Path>, source: ConversionError) -> Self {
        Self::Conversion {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Deserialize a JSON document from `path`.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ArtifactError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
