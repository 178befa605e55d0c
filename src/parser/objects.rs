//! Schema-driven parsers for the top-level glTF entity arrays.
//!
//! Each parser walks the DOM for one array. A missing array is success
//! (nothing appended); a present-but-malformed array or element is a
//! schema violation that latches on the document handle. Unknown fields
//! are ignored at every level.

use std::collections::HashMap;
use std::mem;
use std::path::Path;

use serde_json::Value;

use crate::asset::{
    Accessor, AccessorType, Buffer, BufferTarget, BufferView, ComponentType, DataSource, Image,
    Material, Mesh, MimeType, Node, PbrData, Primitive, PrimitiveType, Scene, Texture, TextureInfo,
};
use crate::error::{GltfError, Result};
use crate::extensions::EXTENSION_REGISTRY;
use crate::glb::{GlbBinChunk, GlbData};
use crate::options::{Extensions, ParseOptions};
use crate::parser::{GltfDocument, JsonMap};
use crate::uri::decode_uri;

impl GltfDocument {
    /// Parse the `accessors` array.
    pub fn parse_accessors(&mut self) -> Result<()> {
        self.ensure_ok()?;
        match accessors(&self.root, self.options) {
            Ok(list) => {
                self.asset.accessors = list;
                Ok(())
            }
            Err(err) => Err(self.latch(err)),
        }
    }

    /// Parse the `buffers` array.
    ///
    /// For a GLB document this is where the BIN chunk is attached to
    /// buffer 0; an eagerly loaded BIN payload is moved into the asset,
    /// so only the first call can observe it.
    pub fn parse_buffers(&mut self) -> Result<()> {
        self.ensure_ok()?;
        match buffers(&self.root, &self.directory, self.options, self.glb.as_mut()) {
            Ok(list) => {
                self.asset.buffers = list;
                Ok(())
            }
            Err(err) => Err(self.latch(err)),
        }
    }

    /// Parse the `bufferViews` array.
    pub fn parse_buffer_views(&mut self) -> Result<()> {
        self.ensure_ok()?;
        match buffer_views(&self.root) {
            Ok(list) => {
                self.asset.buffer_views = list;
                Ok(())
            }
            Err(err) => Err(self.latch(err)),
        }
    }

    /// Parse the `images` array.
    pub fn parse_images(&mut self) -> Result<()> {
        self.ensure_ok()?;
        match images(&self.root, &self.directory, self.options) {
            Ok(list) => {
                self.asset.images = list;
                Ok(())
            }
            Err(err) => Err(self.latch(err)),
        }
    }

    /// Parse the `materials` array.
    pub fn parse_materials(&mut self) -> Result<()> {
        self.ensure_ok()?;
        match materials(&self.root, self.extensions) {
            Ok(list) => {
                self.asset.materials = list;
                Ok(())
            }
            Err(err) => Err(self.latch(err)),
        }
    }

    /// Parse the `meshes` array.
    pub fn parse_meshes(&mut self) -> Result<()> {
        self.ensure_ok()?;
        match meshes(&self.root) {
            Ok(list) => {
                self.asset.meshes = list;
                Ok(())
            }
            Err(err) => Err(self.latch(err)),
        }
    }

    /// Parse the `nodes` array.
    pub fn parse_nodes(&mut self) -> Result<()> {
        self.ensure_ok()?;
        match nodes(&self.root) {
            Ok(list) => {
                self.asset.nodes = list;
                Ok(())
            }
            Err(err) => Err(self.latch(err)),
        }
    }

    /// Parse the `scenes` array and the root `scene` index.
    pub fn parse_scenes(&mut self) -> Result<()> {
        self.ensure_ok()?;
        match scenes(&self.root) {
            Ok((list, default_scene)) => {
                self.asset.scenes = list;
                self.asset.default_scene = default_scene;
                Ok(())
            }
            Err(err) => Err(self.latch(err)),
        }
    }

    /// Parse the `textures` array.
    pub fn parse_textures(&mut self) -> Result<()> {
        self.ensure_ok()?;
        match textures(&self.root, self.extensions) {
            Ok(list) => {
                self.asset.textures = list;
                Ok(())
            }
            Err(err) => Err(self.latch(err)),
        }
    }
}

/// Fetch a named array, distinguishing "absent" (`Ok(None)`) from
/// "present but not an array" (`InvalidGltf`).
fn json_array<'a>(parent: &'a JsonMap, key: &str) -> Result<Option<&'a Vec<Value>>> {
    match parent.get(key) {
        None => Ok(None),
        Some(Value::Array(array)) => Ok(Some(array)),
        Some(_) => Err(GltfError::InvalidGltf),
    }
}

fn as_object(value: &Value) -> Result<&JsonMap> {
    value.as_object().ok_or(GltfError::InvalidGltf)
}

fn required_index(object: &JsonMap, key: &str) -> Result<usize> {
    object
        .get(key)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .ok_or(GltfError::InvalidGltf)
}

fn optional_index(object: &JsonMap, key: &str) -> Option<usize> {
    object.get(key).and_then(Value::as_u64).map(|v| v as usize)
}

fn optional_name(object: &JsonMap) -> Option<String> {
    object.get("name").and_then(Value::as_str).map(str::to_owned)
}

/// Read a fixed-arity float array into `out`. Extra elements are ignored;
/// a non-numeric element is a schema violation.
fn fill_floats(array: &[Value], out: &mut [f32]) -> Result<()> {
    for (slot, value) in out.iter_mut().zip(array) {
        *slot = value.as_f64().ok_or(GltfError::InvalidGltf)? as f32;
    }
    Ok(())
}

fn accessors(root: &JsonMap, options: ParseOptions) -> Result<Vec<Accessor>> {
    let Some(array) = json_array(root, "accessors")? else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(array.len());
    for value in array {
        let object = as_object(value)?;

        let component_type = ComponentType::from_gltf_code(
            object
                .get("componentType")
                .and_then(Value::as_u64)
                .ok_or(GltfError::InvalidGltf)?,
        );
        if component_type == ComponentType::Double
            && !options.contains(ParseOptions::ALLOW_DOUBLE)
        {
            return Err(GltfError::InvalidGltf);
        }

        let accessor_type = AccessorType::from_gltf_str(
            object
                .get("type")
                .and_then(Value::as_str)
                .ok_or(GltfError::InvalidGltf)?,
        );

        out.push(Accessor {
            component_type,
            accessor_type,
            count: required_index(object, "count")?,
            byte_offset: optional_index(object, "byteOffset").unwrap_or(0),
            normalized: object
                .get("normalized")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            buffer_view: optional_index(object, "bufferView"),
            name: optional_name(object),
        });
    }

    Ok(out)
}

fn buffers(
    root: &JsonMap,
    directory: &Path,
    options: ParseOptions,
    mut glb: Option<&mut GlbData>,
) -> Result<Vec<Buffer>> {
    let Some(array) = json_array(root, "buffers")? else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(array.len());
    for (index, value) in array.iter().enumerate() {
        let object = as_object(value)?;
        let byte_length = required_index(object, "byteLength")?;

        // A GLB file's first buffer may omit its URI and use the BIN
        // chunk; an explicit URI always wins over the chunk.
        let data = if let Some(uri) = object.get("uri").and_then(Value::as_str) {
            decode_uri(uri, directory, options)?
        } else if index == 0 {
            match glb.as_deref_mut() {
                Some(glb) => match &mut glb.bin {
                    GlbBinChunk::Loaded(bytes) => DataSource::Inline {
                        bytes: mem::take(bytes),
                        mime_type: MimeType::None,
                    },
                    GlbBinChunk::Deferred { offset, length } => DataSource::FileRange {
                        path: glb.file.clone(),
                        offset: *offset,
                        length: Some(*length),
                        mime_type: MimeType::GltfBuffer,
                    },
                },
                None => return Err(GltfError::InvalidGltf),
            }
        } else {
            // Every other buffer has to carry a uri field.
            return Err(GltfError::InvalidGltf);
        };

        out.push(Buffer {
            byte_length,
            data,
            name: optional_name(object),
        });
    }

    Ok(out)
}

fn buffer_views(root: &JsonMap) -> Result<Vec<BufferView>> {
    let Some(array) = json_array(root, "bufferViews")? else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(array.len());
    for value in array {
        let object = as_object(value)?;

        let target = match object.get("target").and_then(Value::as_u64) {
            Some(code) => {
                Some(BufferTarget::from_gltf_code(code).ok_or(GltfError::InvalidGltf)?)
            }
            None => None,
        };

        out.push(BufferView {
            buffer: required_index(object, "buffer")?,
            byte_length: required_index(object, "byteLength")?,
            byte_offset: optional_index(object, "byteOffset").unwrap_or(0),
            byte_stride: optional_index(object, "byteStride"),
            target,
            name: optional_name(object),
        });
    }

    Ok(out)
}

fn images(root: &JsonMap, directory: &Path, options: ParseOptions) -> Result<Vec<Image>> {
    let Some(array) = json_array(root, "images")? else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(array.len());
    for value in array {
        let object = as_object(value)?;
        let mut data = DataSource::None;

        if let Some(uri) = object.get("uri").and_then(Value::as_str) {
            // uri and bufferView are mutually exclusive.
            if object.contains_key("bufferView") {
                return Err(GltfError::InvalidGltf);
            }
            data = decode_uri(uri, directory, options)?;
            if let Some(mime) = object.get("mimeType").and_then(Value::as_str) {
                data.set_mime_type(MimeType::from_media_type(mime));
            }
        }

        if let Some(buffer_view) = optional_index(object, "bufferView") {
            // A bufferView image must declare its media type.
            let mime = object
                .get("mimeType")
                .and_then(Value::as_str)
                .ok_or(GltfError::InvalidGltf)?;
            data = DataSource::BufferView {
                index: buffer_view,
                mime_type: MimeType::from_media_type(mime),
            };
        }

        if data == DataSource::None {
            return Err(GltfError::InvalidGltf);
        }

        out.push(Image {
            data,
            name: optional_name(object),
        });
    }

    Ok(out)
}

fn materials(root: &JsonMap, extensions: Extensions) -> Result<Vec<Material>> {
    let Some(array) = json_array(root, "materials")? else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(array.len());
    for value in array {
        let object = as_object(value)?;
        let mut material = Material::default();

        if let Some(factor) = object.get("emissiveFactor").and_then(Value::as_array) {
            if factor.len() != 3 {
                return Err(GltfError::InvalidGltf);
            }
            fill_floats(factor, &mut material.emissive_factor)?;
        }

        material.normal_texture = texture_info(object, "normalTexture", extensions)?;
        material.occlusion_texture = texture_info(object, "occlusionTexture", extensions)?;
        material.emissive_texture = texture_info(object, "emissiveTexture", extensions)?;

        if let Some(pbr_object) = object.get("pbrMetallicRoughness").and_then(Value::as_object) {
            let mut pbr = PbrData::default();

            if let Some(factor) = pbr_object.get("baseColorFactor").and_then(Value::as_array) {
                if factor.len() != 4 {
                    return Err(GltfError::InvalidGltf);
                }
                fill_floats(factor, &mut pbr.base_color_factor)?;
            }

            if let Some(factor) = pbr_object.get("metallicFactor").and_then(Value::as_f64) {
                pbr.metallic_factor = factor as f32;
            }
            if let Some(factor) = pbr_object.get("roughnessFactor").and_then(Value::as_f64) {
                pbr.roughness_factor = factor as f32;
            }

            pbr.base_color_texture = texture_info(pbr_object, "baseColorTexture", extensions)?;
            pbr.metallic_roughness_texture =
                texture_info(pbr_object, "metallicRoughnessTexture", extensions)?;

            material.pbr_data = Some(pbr);
        }

        material.name = optional_name(object);
        out.push(material);
    }

    Ok(out)
}

/// Parse one texture reference, shared by every texture-bearing material
/// field.
///
/// An absent field is `Ok(None)`. With `KHR_texture_transform` enabled,
/// a transform extension on the reference fills the UV-transform fields
/// and its inner `texCoord` overrides the outer one; otherwise the
/// transform fields keep their defaults.
fn texture_info(
    parent: &JsonMap,
    key: &str,
    extensions: Extensions,
) -> Result<Option<TextureInfo>> {
    let Some(object) = parent.get(key).and_then(Value::as_object) else {
        return Ok(None);
    };

    let mut info = TextureInfo {
        texture_index: required_index(object, "index")?,
        ..TextureInfo::default()
    };
    info.tex_coord = optional_index(object, "texCoord").unwrap_or(0);
    if let Some(scale) = object.get("scale").and_then(Value::as_f64) {
        info.scale = scale as f32;
    }

    if !extensions.contains(Extensions::KHR_TEXTURE_TRANSFORM) {
        return Ok(Some(info));
    }

    let transform = object
        .get("extensions")
        .and_then(Value::as_object)
        .and_then(|ext| ext.get("KHR_texture_transform"))
        .and_then(Value::as_object);
    if let Some(transform) = transform {
        if let Some(tex_coord) = optional_index(transform, "texCoord") {
            info.tex_coord = tex_coord;
        }
        if let Some(rotation) = transform.get("rotation").and_then(Value::as_f64) {
            info.rotation = rotation as f32;
        }
        if let Some(offset) = transform.get("offset").and_then(Value::as_array) {
            if offset.len() != 2 {
                return Err(GltfError::InvalidGltf);
            }
            fill_floats(offset, &mut info.uv_offset)?;
        }
        if let Some(scale) = transform.get("scale").and_then(Value::as_array) {
            if scale.len() != 2 {
                return Err(GltfError::InvalidGltf);
            }
            fill_floats(scale, &mut info.uv_scale)?;
        }
    }

    Ok(Some(info))
}

fn meshes(root: &JsonMap) -> Result<Vec<Mesh>> {
    let Some(array) = json_array(root, "meshes")? else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(array.len());
    for value in array {
        let object = as_object(value)?;

        // A mesh without primitives is skipped rather than rejected.
        let Some(primitives) = json_array(object, "primitives")? else {
            continue;
        };

        let mut mesh = Mesh {
            primitives: Vec::with_capacity(primitives.len()),
            name: optional_name(object),
        };

        for primitive_value in primitives {
            let primitive_object = as_object(primitive_value)?;

            let attributes_object = primitive_object
                .get("attributes")
                .and_then(Value::as_object)
                .ok_or(GltfError::InvalidGltf)?;
            // Every key is kept as found, recognized semantic or not.
            let mut attributes = HashMap::with_capacity(attributes_object.len());
            for (key, attribute) in attributes_object {
                let index = attribute.as_u64().ok_or(GltfError::InvalidGltf)? as usize;
                attributes.insert(key.clone(), index);
            }

            let mode = match primitive_object.get("mode").and_then(Value::as_u64) {
                Some(code) => {
                    PrimitiveType::from_gltf_code(code).ok_or(GltfError::InvalidGltf)?
                }
                None => PrimitiveType::Triangles,
            };

            mesh.primitives.push(Primitive {
                attributes,
                mode,
                indices: optional_index(primitive_object, "indices"),
                material: optional_index(primitive_object, "material"),
            });
        }

        out.push(mesh);
    }

    Ok(out)
}

fn nodes(root: &JsonMap) -> Result<Vec<Node>> {
    let Some(array) = json_array(root, "nodes")? else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(array.len());
    for value in array {
        let object = as_object(value)?;
        let mut node = Node {
            mesh_index: optional_index(object, "mesh"),
            name: optional_name(object),
            ..Node::default()
        };

        if let Some(children) = json_array(object, "children")? {
            node.children.reserve(children.len());
            for child in children {
                let index = child.as_u64().ok_or(GltfError::InvalidGltf)? as usize;
                node.children.push(index);
            }
        }

        if let Some(matrix) = object.get("matrix").and_then(Value::as_array) {
            // A non-numeric element clears has_matrix but keeps whatever
            // was filled so far; the TRS fields still parse below.
            node.has_matrix = true;
            node.matrix = [0.0; 16];
            for (slot, element) in node.matrix.iter_mut().zip(matrix) {
                match element.as_f64() {
                    Some(v) => *slot = v as f32,
                    None => {
                        node.has_matrix = false;
                        break;
                    }
                }
            }
        }

        if let Some(scale) = object.get("scale").and_then(Value::as_array) {
            fill_floats(scale, &mut node.scale)?;
        }
        if let Some(translation) = object.get("translation").and_then(Value::as_array) {
            fill_floats(translation, &mut node.translation)?;
        }
        if let Some(rotation) = object.get("rotation").and_then(Value::as_array) {
            fill_floats(rotation, &mut node.rotation)?;
        }

        out.push(node);
    }

    Ok(out)
}

fn scenes(root: &JsonMap) -> Result<(Vec<Scene>, Option<usize>)> {
    let Some(array) = json_array(root, "scenes")? else {
        return Ok((Vec::new(), None));
    };

    let default_scene = optional_index(root, "scene");

    let mut out = Vec::with_capacity(array.len());
    for value in array {
        let object = as_object(value)?;

        // A scene without a node list is dropped from the output.
        let Some(node_values) = json_array(object, "nodes")? else {
            continue;
        };

        let mut scene = Scene {
            node_indices: Vec::with_capacity(node_values.len()),
            name: optional_name(object),
        };
        for node in node_values {
            let index = node.as_u64().ok_or(GltfError::InvalidGltf)? as usize;
            scene.node_indices.push(index);
        }

        out.push(scene);
    }

    Ok((out, default_scene))
}

fn textures(root: &JsonMap, extensions: Extensions) -> Result<Vec<Texture>> {
    let Some(array) = json_array(root, "textures")? else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(array.len());
    for value in array {
        let object = as_object(value)?;

        let base_source = optional_index(object, "source");
        let mut image_index = base_source;
        let mut fallback_image_index = None;

        if let Some(extension_object) = object.get("extensions").and_then(Value::as_object) {
            if let Some(from_extension) = texture_extension_source(extension_object, extensions)? {
                fallback_image_index = base_source;
                image_index = Some(from_extension);
            }
        }

        // "When undefined, an extension or other mechanism SHOULD supply
        // an alternate texture source, otherwise behavior is undefined."
        if image_index.is_none() {
            return Err(GltfError::InvalidGltf);
        }

        out.push(Texture {
            image_index,
            fallback_image_index,
            sampler_index: optional_index(object, "sampler"),
            name: optional_name(object),
        });
    }

    Ok(out)
}

/// Find an alternate image source among the enabled texture extensions,
/// in registry priority order.
///
/// An enabled extension that is present without a usable `source` index
/// is a schema violation.
fn texture_extension_source(
    extension_object: &JsonMap,
    enabled: Extensions,
) -> Result<Option<usize>> {
    for (name, flag) in EXTENSION_REGISTRY {
        if *flag == Extensions::KHR_TEXTURE_TRANSFORM || !enabled.contains(*flag) {
            continue;
        }
        let Some(entry) = extension_object.get(*name).and_then(Value::as_object) else {
            continue;
        };
        let source = entry
            .get("source")
            .and_then(Value::as_u64)
            .ok_or(GltfError::InvalidGltf)?;
        return Ok(Some(source as usize));
    }

    Ok(None)
}
