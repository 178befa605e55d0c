//! The typed asset model produced by a parse.
//!
//! Every entity is created during parsing and never mutated by the
//! library afterwards. Cross-references between entities are 0-based
//! positions into the sibling sequences of [`Asset`], whose order matches
//! the source document.

mod material;

pub use material::{Material, PbrData, TextureInfo};

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root aggregate holding every parsed entity sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Typed views over buffer views.
    pub accessors: Vec<Accessor>,
    /// Binary data sources.
    pub buffers: Vec<Buffer>,
    /// Contiguous slices of buffers.
    pub buffer_views: Vec<BufferView>,
    /// Image resources.
    pub images: Vec<Image>,
    /// PBR materials.
    pub materials: Vec<Material>,
    /// Meshes, each a sequence of primitives.
    pub meshes: Vec<Mesh>,
    /// Scene-graph nodes.
    pub nodes: Vec<Node>,
    /// Scenes (root node sets).
    pub scenes: Vec<Scene>,
    /// Textures referencing images and samplers.
    pub textures: Vec<Texture>,
    /// Index of the default scene, if the document names one.
    pub default_scene: Option<usize>,
}

/// Scalar component type of an accessor.
///
/// The discriminants are the glTF component-type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
    /// Double precision; only accepted with `ParseOptions::ALLOW_DOUBLE`.
    Double,
    /// A code outside the glTF set.
    Invalid,
}

impl ComponentType {
    /// Map a glTF component-type code.
    pub fn from_gltf_code(code: u64) -> Self {
        match code {
            5120 => Self::Byte,
            5121 => Self::UnsignedByte,
            5122 => Self::Short,
            5123 => Self::UnsignedShort,
            5125 => Self::UnsignedInt,
            5126 => Self::Float,
            5130 => Self::Double,
            _ => Self::Invalid,
        }
    }

    /// Byte size of one component.
    pub fn size(&self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
            Self::Double => 8,
            Self::Invalid => 0,
        }
    }
}

/// Element shape of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    /// A type string outside the glTF set.
    Invalid,
}

impl AccessorType {
    /// Map a glTF accessor type string.
    pub fn from_gltf_str(value: &str) -> Self {
        match value {
            "SCALAR" => Self::Scalar,
            "VEC2" => Self::Vec2,
            "VEC3" => Self::Vec3,
            "VEC4" => Self::Vec4,
            "MAT2" => Self::Mat2,
            "MAT3" => Self::Mat3,
            "MAT4" => Self::Mat4,
            _ => Self::Invalid,
        }
    }

    /// Number of components per element.
    pub fn component_count(&self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
            Self::Invalid => 0,
        }
    }
}

/// A typed view over a buffer view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessor {
    /// Scalar component type.
    pub component_type: ComponentType,
    /// Element shape.
    pub accessor_type: AccessorType,
    /// Number of elements.
    pub count: usize,
    /// Byte offset within the buffer view.
    pub byte_offset: usize,
    /// Whether integer values are normalized to [0, 1] / [-1, 1].
    pub normalized: bool,
    /// Index of the buffer view holding the data.
    pub buffer_view: Option<usize>,
    /// Accessor name.
    pub name: Option<String>,
}

impl Accessor {
    /// Total byte size of all elements, ignoring stride.
    pub fn byte_size(&self) -> usize {
        self.count * self.accessor_type.component_count() * self.component_type.size()
    }
}

/// GPU binding target hint of a buffer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferTarget {
    /// Vertex data (34962).
    ArrayBuffer,
    /// Index data (34963).
    ElementArrayBuffer,
}

impl BufferTarget {
    /// Map a glTF buffer-view target code.
    pub fn from_gltf_code(code: u64) -> Option<Self> {
        match code {
            34962 => Some(Self::ArrayBuffer),
            34963 => Some(Self::ElementArrayBuffer),
            _ => None,
        }
    }
}

/// A contiguous, possibly strided slice of a buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferView {
    /// Index of the owning buffer.
    pub buffer: usize,
    /// Byte length of the slice.
    pub byte_length: usize,
    /// Byte offset into the buffer.
    pub byte_offset: usize,
    /// Stride between elements, when interleaved.
    pub byte_stride: Option<usize>,
    /// Binding target hint.
    pub target: Option<BufferTarget>,
    /// Buffer view name.
    pub name: Option<String>,
}

/// Media type of an embedded or referenced resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MimeType {
    Jpeg,
    Png,
    Ktx2,
    Dds,
    GltfBuffer,
    OctetStream,
    /// No media type was given or it was not recognized.
    None,
}

impl MimeType {
    /// Map a media-type string.
    pub fn from_media_type(value: &str) -> Self {
        match value {
            "image/jpeg" => Self::Jpeg,
            "image/png" => Self::Png,
            "image/ktx2" => Self::Ktx2,
            "image/vnd-ms.dds" => Self::Dds,
            "application/gltf-buffer" => Self::GltfBuffer,
            "application/octet-stream" => Self::OctetStream,
            _ => Self::None,
        }
    }
}

/// Where a resource's bytes live.
///
/// Derived from [`DataSource`]; kept for callers that speak in terms of
/// the classic location tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataLocation {
    None,
    VectorWithMime,
    FilePathWithByteRange,
    BufferViewWithMime,
}

/// The bytes backing a buffer or image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DataSource {
    /// No data was resolved. Never present in a successfully parsed asset.
    #[default]
    None,
    /// Bytes decoded from a data URI or an eagerly loaded GLB BIN chunk.
    Inline { bytes: Vec<u8>, mime_type: MimeType },
    /// A byte range inside a file the library did not read.
    FileRange {
        path: PathBuf,
        offset: u64,
        /// Known byte length, when the range comes from a GLB BIN chunk.
        length: Option<u64>,
        mime_type: MimeType,
    },
    /// A buffer view inside this same asset.
    BufferView { index: usize, mime_type: MimeType },
}

impl DataSource {
    /// The classic location tag for this source.
    pub fn location(&self) -> DataLocation {
        match self {
            Self::None => DataLocation::None,
            Self::Inline { .. } => DataLocation::VectorWithMime,
            Self::FileRange { .. } => DataLocation::FilePathWithByteRange,
            Self::BufferView { .. } => DataLocation::BufferViewWithMime,
        }
    }

    /// The media type carried by this source.
    pub fn mime_type(&self) -> MimeType {
        match self {
            Self::None => MimeType::None,
            Self::Inline { mime_type, .. }
            | Self::FileRange { mime_type, .. }
            | Self::BufferView { mime_type, .. } => *mime_type,
        }
    }

    /// Replace the media type, when the source carries one.
    pub(crate) fn set_mime_type(&mut self, mime: MimeType) {
        match self {
            Self::None => {}
            Self::Inline { mime_type, .. }
            | Self::FileRange { mime_type, .. }
            | Self::BufferView { mime_type, .. } => *mime_type = mime,
        }
    }
}

/// A binary data buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buffer {
    /// Declared byte length.
    pub byte_length: usize,
    /// Where the bytes live.
    pub data: DataSource,
    /// Buffer name.
    pub name: Option<String>,
}

/// An image resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Where the encoded image bytes live.
    pub data: DataSource,
    /// Image name.
    pub name: Option<String>,
}

/// A texture referencing an image and optionally a sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    /// Resolved image index. Always `Some` in a successfully parsed
    /// asset; an enabled texture extension takes precedence over the
    /// base `source` field.
    pub image_index: Option<usize>,
    /// The base `source` index, kept as a fallback when an extension
    /// supplied [`Self::image_index`].
    pub fallback_image_index: Option<usize>,
    /// Sampler index; repeat wrapping with auto filtering when absent.
    pub sampler_index: Option<usize>,
    /// Texture name.
    pub name: Option<String>,
}

/// Topology of a mesh primitive.
///
/// The discriminants are the glTF primitive mode codes 0 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveType {
    /// Map a glTF primitive mode code.
    pub fn from_gltf_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Points),
            1 => Some(Self::Lines),
            2 => Some(Self::LineLoop),
            3 => Some(Self::LineStrip),
            4 => Some(Self::Triangles),
            5 => Some(Self::TriangleStrip),
            6 => Some(Self::TriangleFan),
            _ => None,
        }
    }
}

/// A renderable unit within a mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Semantic name to accessor index. Every key found in the source is
    /// kept, recognized or not.
    pub attributes: HashMap<String, usize>,
    /// Topology; triangles when absent.
    pub mode: PrimitiveType,
    /// Index accessor.
    pub indices: Option<usize>,
    /// Material index.
    pub material: Option<usize>,
}

/// A mesh: an ordered sequence of primitives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Primitives in source order.
    pub primitives: Vec<Primitive>,
    /// Mesh name.
    pub name: Option<String>,
}

/// A scene-graph node.
///
/// `matrix` and the TRS fields are parsed independently; `has_matrix`
/// tells the caller which transform representation the source supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Mesh attached to this node.
    pub mesh_index: Option<usize>,
    /// Child node indices.
    pub children: Vec<usize>,
    /// Whether a usable `matrix` was present in the source.
    pub has_matrix: bool,
    /// Column-major local transform.
    pub matrix: [f32; 16],
    /// TRS scale.
    pub scale: [f32; 3],
    /// TRS translation.
    pub translation: [f32; 3],
    /// TRS rotation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    /// Node name.
    pub name: Option<String>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            mesh_index: None,
            children: Vec::new(),
            has_matrix: false,
            matrix: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
            scale: [1.0, 1.0, 1.0],
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            name: None,
        }
    }
}

/// A scene: the set of root nodes to render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Root node indices.
    pub node_indices: Vec<usize>,
    /// Scene name.
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_codes() {
        assert_eq!(ComponentType::from_gltf_code(5120), ComponentType::Byte);
        assert_eq!(ComponentType::from_gltf_code(5126), ComponentType::Float);
        assert_eq!(ComponentType::from_gltf_code(5130), ComponentType::Double);
        assert_eq!(ComponentType::from_gltf_code(9999), ComponentType::Invalid);
    }

    #[test]
    fn test_accessor_byte_size() {
        let accessor = Accessor {
            component_type: ComponentType::Float,
            accessor_type: AccessorType::Vec3,
            count: 3,
            byte_offset: 0,
            normalized: false,
            buffer_view: Some(0),
            name: None,
        };
        assert_eq!(accessor.byte_size(), 36);
    }

    #[test]
    fn test_mime_type_strings() {
        assert_eq!(MimeType::from_media_type("image/png"), MimeType::Png);
        assert_eq!(MimeType::from_media_type("image/vnd-ms.dds"), MimeType::Dds);
        assert_eq!(
            MimeType::from_media_type("application/octet-stream"),
            MimeType::OctetStream
        );
        assert_eq!(MimeType::from_media_type("text/plain"), MimeType::None);
    }

    #[test]
    fn test_data_source_location() {
        assert_eq!(DataSource::None.location(), DataLocation::None);
        let inline = DataSource::Inline {
            bytes: vec![1],
            mime_type: MimeType::OctetStream,
        };
        assert_eq!(inline.location(), DataLocation::VectorWithMime);
        let view = DataSource::BufferView {
            index: 0,
            mime_type: MimeType::Png,
        };
        assert_eq!(view.location(), DataLocation::BufferViewWithMime);
    }

    #[test]
    fn test_node_default_transform() {
        let node = Node::default();
        assert!(!node.has_matrix);
        assert_eq!(node.matrix[0], 1.0);
        assert_eq!(node.matrix[5], 1.0);
        assert_eq!(node.matrix[1], 0.0);
        assert_eq!(node.rotation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(node.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_primitive_mode_codes() {
        assert_eq!(PrimitiveType::from_gltf_code(4), Some(PrimitiveType::Triangles));
        assert_eq!(PrimitiveType::from_gltf_code(0), Some(PrimitiveType::Points));
        assert_eq!(PrimitiveType::from_gltf_code(7), None);
    }
}
