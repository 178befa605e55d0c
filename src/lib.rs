//! rapid-gltf: fast parsing of glTF 2.0 assets into a typed scene model.
//!
//! This crate reads both physical encodings of glTF 2.0, the UTF-8 JSON
//! document (`.gltf`) and the binary container (`.glb`), and produces an
//! owned, immutable [`Asset`] holding accessors, buffers, buffer views,
//! images, textures, materials, meshes, nodes and scenes.
//!
//! # Quick start
//!
//! ```ignore
//! use rapid_gltf::{load_gltf, Extensions, ParseOptions};
//!
//! let asset = load_gltf(&json_bytes, "assets/model", ParseOptions::empty(), Extensions::empty())?;
//! println!("{} meshes", asset.meshes.len());
//! ```
//!
//! For finer control, drive the parses yourself:
//!
//! ```ignore
//! use rapid_gltf::{Extensions, JsonSource, ParseOptions, Parser};
//!
//! let mut parser = Parser::new(Extensions::KHR_TEXTURE_TRANSFORM);
//! let source = JsonSource::from_bytes(&json_bytes);
//! let mut doc = parser.load_gltf(&source, "assets/model", ParseOptions::empty())?;
//! doc.parse_meshes()?;
//! doc.parse_materials()?;
//! let asset = doc.take_asset();
//! ```
//!
//! # What it does not do
//!
//! The library never reads buffer contents referenced by external file
//! URIs; it records the resolved path and leaves fetching to the caller.
//! Image pixels are not decoded, accessors are not interpreted, and
//! nothing is uploaded anywhere.

pub mod asset;
pub mod base64;
pub mod error;
pub mod options;
pub mod source;

mod extensions;
mod glb;
mod parser;
mod uri;

pub use asset::{
    Accessor, AccessorType, Asset, Buffer, BufferTarget, BufferView, ComponentType, DataLocation,
    DataSource, Image, Material, Mesh, MimeType, Node, PbrData, Primitive, PrimitiveType, Scene,
    Texture, TextureInfo,
};
pub use error::{GltfError, Result};
pub use options::{Extensions, ParseOptions};
pub use parser::{GltfDocument, Parser};
pub use source::JsonSource;

use std::path::{Path, PathBuf};

/// Parse a glTF JSON document in one call.
///
/// Runs every entity-array parse and returns the finished asset.
pub fn load_gltf(
    bytes: &[u8],
    base_dir: impl Into<PathBuf>,
    options: ParseOptions,
    extensions: Extensions,
) -> Result<Asset> {
    let source = JsonSource::from_bytes(bytes);
    let mut doc = Parser::new(extensions).load_gltf(&source, base_dir, options)?;
    doc.parse_all()?;
    doc.take_asset().ok_or(GltfError::InvalidGltf)
}

/// Parse a binary glTF (`.glb`) file in one call.
pub fn load_binary_gltf(
    path: impl AsRef<Path>,
    options: ParseOptions,
    extensions: Extensions,
) -> Result<Asset> {
    let mut doc =
        Parser::new(extensions).load_binary_gltf(path.as_ref(), options)?;
    doc.parse_all()?;
    doc.take_asset().ok_or(GltfError::InvalidGltf)
}
