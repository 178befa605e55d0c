//! Parser façade and the document handle.
//!
//! A [`Parser`] is configured once with the extensions the caller opts
//! into and then loads any number of documents. Each load runs the DOM
//! parse and the document-level preconditions and hands back a
//! [`GltfDocument`], from which the caller drives the per-array parses
//! and finally takes the finished [`Asset`].

mod objects;

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::asset::Asset;
use crate::error::{GltfError, Result};
use crate::extensions;
use crate::glb::{self, GlbData};
use crate::options::{Extensions, ParseOptions};
use crate::source::JsonSource;

/// The JSON object type used as the document DOM.
pub(crate) type JsonMap = serde_json::Map<String, Value>;

/// Parses glTF and GLB documents into [`GltfDocument`] handles.
pub struct Parser {
    extensions: Extensions,
    // Scratch buffer for the SIMD DOM parse, which consumes its input;
    // reused across loads.
    scratch: Vec<u8>,
}

impl Parser {
    /// Create a parser with the given set of enabled extensions.
    ///
    /// Performs no I/O.
    pub fn new(extensions: Extensions) -> Self {
        Self {
            extensions,
            scratch: Vec::new(),
        }
    }

    /// Load a glTF JSON document.
    ///
    /// `base_dir` must be an existing directory; relative resource URIs
    /// resolve against it. No resource I/O happens here.
    pub fn load_gltf(
        &mut self,
        source: &JsonSource,
        base_dir: impl Into<PathBuf>,
        options: ParseOptions,
    ) -> Result<GltfDocument> {
        let directory = base_dir.into();
        if !directory.is_dir() {
            return Err(GltfError::InvalidPath);
        }

        debug!(bytes = source.document().len(), "loading glTF document");
        let root = self.parse_dom(source, options)?;
        self.finish_load(root, directory, None, options)
    }

    /// Load a binary glTF (`.glb`) file.
    ///
    /// The container is framed into its JSON and BIN chunks; with
    /// `LOAD_GLB_BUFFERS` the BIN payload is read eagerly, otherwise only
    /// its position is recorded.
    pub fn load_binary_gltf(
        &mut self,
        path: impl Into<PathBuf>,
        options: ParseOptions,
    ) -> Result<GltfDocument> {
        let path = path.into();
        if !path.is_file() {
            return Err(GltfError::InvalidPath);
        }

        let (source, bin) = glb::read_binary(&path, options)?;
        debug!(
            path = %path.display(),
            json_bytes = source.document().len(),
            has_bin = bin.is_some(),
            "loading GLB document"
        );

        let root = self.parse_dom(&source, options)?;
        let directory = path.parent().map(PathBuf::from).unwrap_or_default();
        let glb = bin.map(|bin| GlbData { file: path, bin });
        self.finish_load(root, directory, glb, options)
    }

    /// The extensions this parser was configured with.
    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    fn parse_dom(&mut self, source: &JsonSource, options: ParseOptions) -> Result<JsonMap> {
        let value: Value = if options.contains(ParseOptions::DONT_USE_SIMD) {
            serde_json::from_slice(source.document()).map_err(|_| GltfError::InvalidJson)?
        } else {
            // The SIMD parser rewrites its input in place, so it gets a
            // copy of the document span.
            self.scratch.clear();
            self.scratch.extend_from_slice(source.document());
            simd_json::from_slice(&mut self.scratch).map_err(|_| GltfError::InvalidJson)?
        };

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(GltfError::InvalidJson),
        }
    }

    fn finish_load(
        &self,
        root: JsonMap,
        directory: PathBuf,
        glb: Option<GlbData>,
        options: ParseOptions,
    ) -> Result<GltfDocument> {
        if !options.contains(ParseOptions::DONT_REQUIRE_VALID_ASSET_MEMBER) {
            check_asset_field(&root)?;
        }
        extensions::check_required(&root, self.extensions)?;
        extensions::warn_unrecognized_used(&root);

        Ok(GltfDocument {
            root,
            directory,
            options,
            extensions: self.extensions,
            glb,
            asset: Asset::default(),
            error: None,
        })
    }
}

fn check_asset_field(root: &JsonMap) -> Result<()> {
    let asset = root
        .get("asset")
        .and_then(Value::as_object)
        .ok_or(GltfError::InvalidOrMissingAssetField)?;
    asset
        .get("version")
        .and_then(Value::as_str)
        .ok_or(GltfError::InvalidOrMissingAssetField)?;
    Ok(())
}

/// A loaded document from which entity arrays are parsed on demand.
///
/// The handle owns the DOM; nothing handed out references it, so the
/// finished asset is free of borrows. The first parse failure is latched
/// and every later operation short-circuits with it.
pub struct GltfDocument {
    pub(crate) root: JsonMap,
    pub(crate) directory: PathBuf,
    pub(crate) options: ParseOptions,
    pub(crate) extensions: Extensions,
    pub(crate) glb: Option<GlbData>,
    pub(crate) asset: Asset,
    pub(crate) error: Option<GltfError>,
}

impl GltfDocument {
    /// The latched error, if any parse has failed.
    pub fn error(&self) -> Option<GltfError> {
        self.error
    }

    /// The directory relative resource URIs resolve against.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Run every entity-array parse in one call.
    pub fn parse_all(&mut self) -> Result<()> {
        self.parse_accessors()?;
        self.parse_buffers()?;
        self.parse_buffer_views()?;
        self.parse_images()?;
        self.parse_materials()?;
        self.parse_meshes()?;
        self.parse_nodes()?;
        self.parse_scenes()?;
        self.parse_textures()?;
        Ok(())
    }

    /// Take ownership of the parsed asset.
    ///
    /// Returns `None` if any parse failed; a partial asset is never
    /// handed out.
    pub fn take_asset(self) -> Option<Asset> {
        if self.error.is_some() {
            return None;
        }
        Some(self.asset)
    }

    pub(crate) fn ensure_ok(&self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub(crate) fn latch(&mut self, err: GltfError) -> GltfError {
        self.error = Some(err);
        err
    }
}
