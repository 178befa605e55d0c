//! GLB container framing.
//!
//! A GLB file is a 12-byte header followed by chunks, each prefixed by a
//! length and a type word. The first chunk must be JSON; an optional
//! second chunk carries the binary payload. All integers are unsigned
//! little-endian.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{GltfError, Result};
use crate::options::ParseOptions;
use crate::source::{JsonSource, PADDING};

/// GLB magic number ("glTF" in little-endian).
pub(crate) const GLB_MAGIC: u32 = 0x4654_6C67;
/// GLB container version this library accepts.
pub(crate) const GLB_VERSION: u32 = 2;
/// JSON chunk type ("JSON" in little-endian).
pub(crate) const GLB_CHUNK_JSON: u32 = 0x4E4F_534A;
/// Binary chunk type ("BIN\0" in little-endian).
pub(crate) const GLB_CHUNK_BIN: u32 = 0x004E_4942;

/// The BIN chunk of a GLB file, either loaded or recorded by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GlbBinChunk {
    /// The chunk was read eagerly into memory.
    Loaded(Vec<u8>),
    /// The chunk bytes were left in the file; only their position is kept.
    Deferred { offset: u64, length: u64 },
}

/// BIN-chunk metadata attached to a document parsed from a GLB file.
#[derive(Debug, Clone)]
pub(crate) struct GlbData {
    pub file: PathBuf,
    pub bin: GlbBinChunk,
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
    let mut bytes = [0u8; 4];
    reader
        .read_exact(&mut bytes)
        .map_err(|_| GltfError::InvalidGlb)?;
    Ok(u32::from_le_bytes(bytes))
}

/// Split a GLB file into its JSON source and optional BIN chunk.
///
/// With `LOAD_GLB_BUFFERS` the BIN payload is read into memory; otherwise
/// its `(offset, length)` is recorded and the payload bytes are never
/// touched.
pub(crate) fn read_binary(
    path: &Path,
    options: ParseOptions,
) -> Result<(JsonSource, Option<GlbBinChunk>)> {
    let mut file = File::open(path).map_err(|_| GltfError::InvalidPath)?;

    let magic = read_u32(&mut file)?;
    let version = read_u32(&mut file)?;
    let length = read_u32(&mut file)?;
    if magic != GLB_MAGIC || version != GLB_VERSION {
        return Err(GltfError::InvalidGlb);
    }

    #[cfg(debug_assertions)]
    {
        let file_len = file
            .metadata()
            .map_err(|_| GltfError::InvalidGlb)?
            .len();
        if u64::from(length) != file_len {
            return Err(GltfError::InvalidGlb);
        }
    }

    // The chunk order is fixed: JSON first, then an optional BIN chunk.
    let json_length = read_u32(&mut file)? as usize;
    let json_type = read_u32(&mut file)?;
    if json_type != GLB_CHUNK_JSON {
        return Err(GltfError::InvalidGlb);
    }

    let mut json_buf = vec![0u8; json_length + PADDING];
    file.read_exact(&mut json_buf[..json_length])
        .map_err(|_| GltfError::InvalidGlb)?;
    let json = JsonSource::from_padded_vec(json_buf, json_length);

    let position = 12 + 8 + json_length as u64;

    // Is there room for another chunk header?
    if u64::from(length) <= position + 8 {
        return Ok((json, None));
    }

    let bin_length = read_u32(&mut file)?;
    let bin_type = read_u32(&mut file)?;
    if bin_type != GLB_CHUNK_BIN {
        return Err(GltfError::InvalidGlb);
    }

    let bin = if options.contains(ParseOptions::LOAD_GLB_BUFFERS) {
        let mut bytes = vec![0u8; bin_length as usize];
        file.read_exact(&mut bytes)
            .map_err(|_| GltfError::InvalidGlb)?;
        GlbBinChunk::Loaded(bytes)
    } else {
        GlbBinChunk::Deferred {
            offset: position + 8,
            length: u64::from(bin_length),
        }
    };

    Ok((json, Some(bin)))
}

/// Assemble a GLB byte stream from a JSON payload and an optional BIN
/// payload, mirroring the container layout.
#[cfg(test)]
pub(crate) fn build_glb(json: &[u8], bin: Option<&[u8]>) -> Vec<u8> {
    // Chunks are padded to 4-byte boundaries: JSON with spaces, BIN with
    // zeros.
    let mut json = json.to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.map(|b| b.to_vec());
    if let Some(bin) = bin.as_mut() {
        while bin.len() % 4 != 0 {
            bin.push(0);
        }
    }

    let total = 12 + 8 + json.len() + bin.as_ref().map_or(0, |b| 8 + b.len());
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&GLB_CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);
    if let Some(bin) = bin {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&GLB_CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_glb(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_json_only_glb() {
        let json = br#"{"asset":{"version":"2.0"}}"#;
        let file = write_temp_glb(&build_glb(json, None));

        let (source, bin) = read_binary(file.path(), ParseOptions::empty()).unwrap();
        assert!(bin.is_none());
        // The JSON chunk is space-padded to a 4-byte boundary.
        assert_eq!(&source.document()[..json.len()], json);
    }

    #[test]
    fn test_bin_chunk_deferred() {
        let json = br#"{"asset":{"version":"2.0"}}"#;
        let payload = [7u8; 24];
        let file = write_temp_glb(&build_glb(json, Some(&payload)));

        let (_, bin) = read_binary(file.path(), ParseOptions::empty()).unwrap();
        let padded_json_len = (json.len() + 3) / 4 * 4;
        assert_eq!(
            bin,
            Some(GlbBinChunk::Deferred {
                offset: 12 + 8 + padded_json_len as u64 + 8,
                length: 24,
            })
        );
    }

    #[test]
    fn test_bin_chunk_loaded() {
        let json = br#"{"asset":{"version":"2.0"}}"#;
        let payload = [7u8; 24];
        let file = write_temp_glb(&build_glb(json, Some(&payload)));

        let (_, bin) = read_binary(file.path(), ParseOptions::LOAD_GLB_BUFFERS).unwrap();
        assert_eq!(bin, Some(GlbBinChunk::Loaded(payload.to_vec())));
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = build_glb(br#"{}"#, None);
        bytes[0] = b'X';
        let file = write_temp_glb(&bytes);
        assert_eq!(
            read_binary(file.path(), ParseOptions::empty()).unwrap_err(),
            GltfError::InvalidGlb
        );
    }

    #[test]
    fn test_bad_version() {
        let mut bytes = build_glb(br#"{}"#, None);
        bytes[4] = 3;
        let file = write_temp_glb(&bytes);
        assert_eq!(
            read_binary(file.path(), ParseOptions::empty()).unwrap_err(),
            GltfError::InvalidGlb
        );
    }

    #[test]
    fn test_bad_json_chunk_type() {
        let mut bytes = build_glb(br#"{}"#, None);
        // Corrupt the JSON chunk type word at offset 16.
        bytes[16] = b'X';
        let file = write_temp_glb(&bytes);
        assert_eq!(
            read_binary(file.path(), ParseOptions::empty()).unwrap_err(),
            GltfError::InvalidGlb
        );
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_length_mismatch_rejected_in_debug() {
        let mut bytes = build_glb(br#"{}"#, None);
        bytes.push(0);
        let file = write_temp_glb(&bytes);
        assert_eq!(
            read_binary(file.path(), ParseOptions::empty()).unwrap_err(),
            GltfError::InvalidGlb
        );
    }
}
