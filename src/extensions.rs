//! Extension registry and the required-extension gate.

use serde_json::Value;

use crate::error::{GltfError, Result};
use crate::options::Extensions;
use crate::parser::JsonMap;

/// Extension names this library recognizes, paired with their flags.
pub(crate) const EXTENSION_REGISTRY: &[(&str, Extensions)] = &[
    ("KHR_texture_basisu", Extensions::KHR_TEXTURE_BASISU),
    ("KHR_texture_transform", Extensions::KHR_TEXTURE_TRANSFORM),
    ("MSFT_texture_dds", Extensions::MSFT_TEXTURE_DDS),
];

/// Look up the flag for a recognized extension name.
pub(crate) fn lookup(name: &str) -> Option<Extensions> {
    EXTENSION_REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, flag)| *flag)
}

/// Enforce `extensionsRequired` against the caller's enabled set.
///
/// Unknown names are rejected outright; recognized names must be enabled.
/// `extensionsUsed` is not enforced here.
pub(crate) fn check_required(root: &JsonMap, enabled: Extensions) -> Result<()> {
    let Some(Value::Array(required)) = root.get("extensionsRequired") else {
        return Ok(());
    };

    for entry in required {
        let name = entry.as_str().ok_or(GltfError::InvalidGltf)?;
        let flag = lookup(name).ok_or(GltfError::UnsupportedExtensions)?;
        if !enabled.contains(flag) {
            return Err(GltfError::MissingExtensions);
        }
    }

    Ok(())
}

/// Warn about `extensionsUsed` entries this library does not recognize.
pub(crate) fn warn_unrecognized_used(root: &JsonMap) {
    let Some(Value::Array(used)) = root.get("extensionsUsed") else {
        return;
    };

    for entry in used {
        if let Some(name) = entry.as_str() {
            if lookup(name).is_none() {
                tracing::warn!(extension = name, "unrecognized extension in extensionsUsed");
            }
        }
    }
}
