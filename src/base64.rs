//! Base64 decoding with a SIMD-accelerated path and a portable fallback.
//!
//! Both paths have identical semantics: the input must be standard base64
//! with canonical `=` padding, its length a multiple of four, and every
//! character in the standard alphabet. For any valid input the two paths
//! produce byte-identical output.

// Explicit extern-crate path: this module shares the crate's name.
use ::base64::Engine;

use crate::error::{GltfError, Result};

/// Decode a base64 span using the SIMD implementation.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    base64_simd::STANDARD
        .decode_to_vec(encoded)
        .map_err(|_| GltfError::InvalidGltf)
}

/// Decode a base64 span using the portable implementation.
pub fn fallback_decode(encoded: &str) -> Result<Vec<u8>> {
    ::base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| GltfError::InvalidGltf)
}

/// Decode a base64 span, selecting the implementation from the caller's
/// options.
pub(crate) fn decode_with(encoded: &str, use_simd: bool) -> Result<Vec<u8>> {
    if use_simd {
        decode(encoded)
    } else {
        fallback_decode(encoded)
    }
}
