//! URI classification and resolution.
//!
//! A buffer or image URI is either a `data:` URI, decoded inline, or a
//! path relative to the document's base directory, recorded without any
//! I/O.

use std::path::Path;

use crate::asset::{DataSource, MimeType};
use crate::base64;
use crate::error::{GltfError, Result};
use crate::options::ParseOptions;

/// Resolve a URI into a data source.
///
/// Data URIs must use base64 encoding (`data:<media-type>;base64,<data>`);
/// anything else in the encoding slot is a schema violation. Relative
/// URIs are joined onto `base_dir` and left for the caller to read.
pub(crate) fn decode_uri(
    uri: &str,
    base_dir: &Path,
    options: ParseOptions,
) -> Result<DataSource> {
    if uri.as_bytes().starts_with(b"data") {
        let semicolon = uri.find(';').ok_or(GltfError::InvalidGltf)?;
        let comma = uri[semicolon + 1..]
            .find(',')
            .map(|i| i + semicolon + 1)
            .ok_or(GltfError::InvalidGltf)?;

        let encoding = &uri[semicolon + 1..comma];
        if encoding != "base64" {
            return Err(GltfError::InvalidGltf);
        }

        let media_type = uri.get(5..semicolon).unwrap_or("");
        let bytes = base64::decode_with(
            &uri[comma + 1..],
            !options.contains(ParseOptions::DONT_USE_SIMD),
        )?;

        Ok(DataSource::Inline {
            bytes,
            mime_type: MimeType::from_media_type(media_type),
        })
    } else {
        Ok(DataSource::FileRange {
            path: base_dir.join(uri),
            offset: 0,
            length: None,
            mime_type: MimeType::None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::DataLocation;
    use std::path::PathBuf;

    #[test]
    fn test_data_uri_octet_stream() {
        let source = decode_uri(
            "data:application/octet-stream;base64,AQID",
            Path::new("."),
            ParseOptions::empty(),
        )
        .unwrap();
        assert_eq!(
            source,
            DataSource::Inline {
                bytes: vec![0x01, 0x02, 0x03],
                mime_type: MimeType::OctetStream,
            }
        );
    }

    #[test]
    fn test_data_uri_png() {
        let source = decode_uri(
            "data:image/png;base64,SGVsbG8=",
            Path::new("."),
            ParseOptions::empty(),
        )
        .unwrap();
        assert_eq!(source.mime_type(), MimeType::Png);
        assert_eq!(source.location(), DataLocation::VectorWithMime);
    }

    #[test]
    fn test_data_uri_round_trip() {
        use ::base64::Engine;
        let payload: Vec<u8> = (0..=255u8).collect();
        let uri = format!(
            "data:application/octet-stream;base64,{}",
            ::base64::engine::general_purpose::STANDARD.encode(&payload)
        );
        let source = decode_uri(&uri, Path::new("."), ParseOptions::empty()).unwrap();
        match source {
            DataSource::Inline { bytes, .. } => assert_eq!(bytes, payload),
            other => panic!("expected inline data, got {other:?}"),
        }
    }

    #[test]
    fn test_data_uri_bad_encoding() {
        assert_eq!(
            decode_uri(
                "data:application/octet-stream;base32,AQID",
                Path::new("."),
                ParseOptions::empty(),
            )
            .unwrap_err(),
            GltfError::InvalidGltf
        );
    }

    #[test]
    fn test_data_uri_missing_separators() {
        assert_eq!(
            decode_uri("data:application/octet-stream", Path::new("."), ParseOptions::empty())
                .unwrap_err(),
            GltfError::InvalidGltf
        );
    }

    #[test]
    fn test_relative_uri_joins_base_dir() {
        let source = decode_uri(
            "meshes/body.bin",
            Path::new("/assets/model"),
            ParseOptions::empty(),
        )
        .unwrap();
        assert_eq!(
            source,
            DataSource::FileRange {
                path: PathBuf::from("/assets/model/meshes/body.bin"),
                offset: 0,
                length: None,
                mime_type: MimeType::None,
            }
        );
    }

    #[test]
    fn test_portable_decode_matches_simd() {
        let uri = "data:application/octet-stream;base64,SGVsbG8gd29ybGQ=";
        let simd = decode_uri(uri, Path::new("."), ParseOptions::empty()).unwrap();
        let portable = decode_uri(uri, Path::new("."), ParseOptions::DONT_USE_SIMD).unwrap();
        assert_eq!(simd, portable);
    }
}
