//! Error types for rapid-gltf.

use thiserror::Error;

/// Result type for rapid-gltf operations.
pub type Result<T> = std::result::Result<T, GltfError>;

/// Errors that can occur while loading a glTF or GLB asset.
///
/// Every failure mode of the library maps onto one of these variants; the
/// first error encountered is the one surfaced, and a partially built
/// asset is never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GltfError {
    /// The base directory is not a directory, or the GLB path is not a
    /// regular file.
    #[error("path is not a usable file or directory")]
    InvalidPath,

    /// The JSON document failed to parse.
    #[error("invalid JSON document")]
    InvalidJson,

    /// GLB header magic/version mismatch, chunk-type mismatch, or a
    /// length inconsistency in the container.
    #[error("invalid GLB container")]
    InvalidGlb,

    /// A structural violation of the glTF schema.
    #[error("invalid glTF data")]
    InvalidGltf,

    /// The `asset` object or `asset.version` string is missing while the
    /// asset precondition is enabled.
    #[error("invalid or missing asset field")]
    InvalidOrMissingAssetField,

    /// `extensionsRequired` names an extension this library does not
    /// recognize.
    #[error("required extension is not supported")]
    UnsupportedExtensions,

    /// `extensionsRequired` names a recognized extension the caller did
    /// not enable.
    #[error("required extension is not enabled")]
    MissingExtensions,
}
