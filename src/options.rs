//! Caller-supplied flag sets controlling a parse.

bitflags::bitflags! {
    /// Options that alter how a single load behaves.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ParseOptions: u32 {
        /// Skip the `asset.version` precondition.
        const DONT_REQUIRE_VALID_ASSET_MEMBER = 1 << 0;
        /// Permit accessors with `componentType` 5130 (double precision).
        const ALLOW_DOUBLE = 1 << 1;
        /// Eagerly read the GLB BIN chunk into memory instead of
        /// recording its file offset and length.
        const LOAD_GLB_BUFFERS = 1 << 2;
        /// Force the portable base64 and JSON implementations.
        const DONT_USE_SIMD = 1 << 3;
    }
}

bitflags::bitflags! {
    /// glTF extensions the caller opts into.
    ///
    /// A recognized extension that is not enabled here is rejected when it
    /// appears in `extensionsRequired`, and its object-level data is
    /// ignored everywhere else.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Extensions: u32 {
        /// `KHR_texture_basisu`: Basis Universal texture sources.
        const KHR_TEXTURE_BASISU = 1 << 0;
        /// `KHR_texture_transform`: UV offset/rotation/scale on texture
        /// references.
        const KHR_TEXTURE_TRANSFORM = 1 << 1;
        /// `MSFT_texture_dds`: DDS texture sources.
        const MSFT_TEXTURE_DDS = 1 << 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_empty() {
        let options = ParseOptions::default();
        assert!(!options.contains(ParseOptions::ALLOW_DOUBLE));
        assert!(!options.contains(ParseOptions::DONT_USE_SIMD));
    }

    #[test]
    fn test_extension_flags_disjoint() {
        let both = Extensions::KHR_TEXTURE_BASISU | Extensions::MSFT_TEXTURE_DDS;
        assert!(both.contains(Extensions::KHR_TEXTURE_BASISU));
        assert!(!both.contains(Extensions::KHR_TEXTURE_TRANSFORM));
    }
}
