//! Error types for plasma-scene.

use thiserror::Error;

/// The main error type for plasma-scene operations.
#[derive(Error, Debug)]
pub enum PlasmaSceneError {
    /// No parent node was supplied to a builder that attaches geometry.
    #[error("a parent node, e.g. the scene root, must be provided")]
    MissingParent,

    /// A node id does not refer to a live node of the scene.
    #[error("node {0} not found in scene")]
    NodeNotFound(usize),

    /// The node exists but carries no solid.
    #[error("node {0} is not a primitive")]
    NotAPrimitive(usize),

    /// Mesh extents are not a valid, non-empty (R, Z) rectangle.
    #[error("invalid mesh extent: r = [{min_r}, {max_r}], z = [{min_z}, {max_z}]")]
    InvalidExtent {
        min_r: f64,
        max_r: f64,
        min_z: f64,
        max_z: f64,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The emissivity function is not defined on the supplied mesh.
    #[error("emissivity function is not defined on the supplied mesh")]
    FieldMeshMismatch,

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A required entry is missing from a data file.
    #[error("missing field '{0}'")]
    MissingField(String),

    /// The data file format is not supported by this build.
    #[error("unsupported data format: {0}")]
    UnsupportedFormat(String),

    /// Failure reported by the MAT-file reader.
    #[error("MAT file error: {0}")]
    MatError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for plasma-scene operations.
pub type Result<T> = std::result::Result<T, PlasmaSceneError>;
