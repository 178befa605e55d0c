//! Material types for the asset model.

use serde::{Deserialize, Serialize};

/// A PBR material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Emissive color factor (RGB).
    pub emissive_factor: [f32; 3],
    /// Normal map reference.
    pub normal_texture: Option<TextureInfo>,
    /// Occlusion map reference.
    pub occlusion_texture: Option<TextureInfo>,
    /// Emissive map reference.
    pub emissive_texture: Option<TextureInfo>,
    /// Metallic-roughness parameters, when the source declares them.
    pub pbr_data: Option<PbrData>,
    /// Material name.
    pub name: Option<String>,
}

/// Metallic-roughness PBR parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PbrData {
    /// Base color factor (RGBA).
    pub base_color_factor: [f32; 4],
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic).
    pub metallic_factor: f32,
    /// Roughness factor (0.0 = smooth, 1.0 = rough).
    pub roughness_factor: f32,
    /// Base color texture.
    pub base_color_texture: Option<TextureInfo>,
    /// Metallic-roughness texture (B = metallic, G = roughness).
    pub metallic_roughness_texture: Option<TextureInfo>,
}

impl Default for PbrData {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            base_color_texture: None,
            metallic_roughness_texture: None,
        }
    }
}

/// A texture reference within a material.
///
/// The UV-transform fields carry values only when `KHR_texture_transform`
/// is enabled and present on the reference; otherwise they hold their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    /// Index into the asset's textures.
    pub texture_index: usize,
    /// Texture coordinate set.
    pub tex_coord: usize,
    /// Scalar multiplier; meaningful only for normal maps.
    pub scale: f32,
    /// UV rotation in radians.
    pub rotation: f32,
    /// UV offset.
    pub uv_offset: [f32; 2],
    /// UV scale.
    pub uv_scale: [f32; 2],
}

impl Default for TextureInfo {
    fn default() -> Self {
        Self {
            texture_index: 0,
            tex_coord: 0,
            scale: 1.0,
            rotation: 0.0,
            uv_offset: [0.0, 0.0],
            uv_scale: [1.0, 1.0],
        }
    }
}
