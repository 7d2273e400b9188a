use serde::{Deserialize, Serialize};

/// Byte order of multi-byte elements.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endian = Endian::Big;
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endian = Endian::Little;
}

impl Default for Endian {
    fn default() -> Self {
        Endian::Little
    }
}

/// The array-to-bytes boundary codec.
///
/// Carries the declared endianness of the stored bytes. Encoding and
/// decoding are the same operation: when the declared endianness differs
/// from the host's, every `element_size`-byte group is reversed in place.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BytesCodec {
    #[serde(default)]
    pub endian: Endian,
}

impl Default for BytesCodec {
    fn default() -> Self {
        Self {
            endian: Endian::Little,
        }
    }
}

impl BytesCodec {
    pub fn new(endian: Endian) -> Self {
        Self { endian }
    }

    pub fn new_big() -> Self {
        Self::new(Endian::Big)
    }

    pub fn new_little() -> Self {
        Self::new(Endian::Little)
    }

    /// Swap between declared and host byte order. Symmetric.
    pub fn apply(&self, buf: &mut [u8], element_size: usize) {
        if self.endian == Endian::NATIVE || element_size <= 1 {
            return;
        }
        for group in buf.chunks_exact_mut(element_size) {
            group.reverse();
        }
    }
}
