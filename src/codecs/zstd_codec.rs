use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::ByteCodec;

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct ZstdCodec {
    pub level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl ByteCodec for ZstdCodec {
    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        zstd::encode_all(raw, self.level.clamp(1, 22))
            .map_err(|e| Error::ChunkCorrupt(format!("zstd encode: {e}")))
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        zstd::decode_all(encoded).map_err(|e| Error::ChunkCorrupt(format!("zstd decode: {e}")))
    }
}
