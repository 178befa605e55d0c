//! Padded JSON source buffers.
//!
//! SIMD JSON parsers read past the end of the document in fixed-size
//! strides; keeping a zero-filled padding region after the document makes
//! those overreads well defined. The padding is never part of the parsed
//! span.

use std::fs;
use std::path::Path;

/// Number of zero bytes kept after the document.
pub const PADDING: usize = 64;

/// An owned JSON document followed by a zero-filled padding region.
#[derive(Debug, Clone)]
pub struct JsonSource {
    buf: Vec<u8>,
    len: usize,
}

impl JsonSource {
    /// Copy `bytes` into a new padded buffer.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(bytes.len() + PADDING);
        buf.extend_from_slice(bytes);
        buf.resize(bytes.len() + PADDING, 0);
        Self {
            buf,
            len: bytes.len(),
        }
    }

    /// Read a whole file into a new padded buffer.
    ///
    /// On a read failure the buffer is left empty; the subsequent DOM
    /// parse then fails with `InvalidJson`.
    pub fn from_path(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(_) => Self {
                buf: vec![0; PADDING],
                len: 0,
            },
        }
    }

    /// Wrap a buffer that already carries `PADDING` trailing bytes.
    ///
    /// The padding region is re-zeroed so a partially filled buffer cannot
    /// leak garbage into SIMD overreads.
    pub(crate) fn from_padded_vec(mut buf: Vec<u8>, len: usize) -> Self {
        debug_assert!(buf.len() >= len + PADDING);
        for byte in &mut buf[len..] {
            *byte = 0;
        }
        Self { buf, len }
    }

    /// The document bytes, without padding.
    pub fn document(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The document plus its padding region.
    pub fn padded(&self) -> &[u8] {
        &self.buf
    }

    /// Whether the document span is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
