use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::ByteCodec;

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct GzipCodec {
    pub level: u32,
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl GzipCodec {
    fn compression(&self) -> Compression {
        match self.level {
            0 => Compression::none(),
            1 => Compression::fast(),
            l if l >= 7 => Compression::best(),
            _ => Compression::default(),
        }
    }
}

impl ByteCodec for GzipCodec {
    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), self.compression());
        encoder
            .write_all(raw)
            .map_err(|e| Error::ChunkCorrupt(format!("gzip encode: {e}")))?;
        encoder
            .finish()
            .map_err(|e| Error::ChunkCorrupt(format!("gzip encode: {e}")))
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        GzDecoder::new(encoded)
            .read_to_end(&mut out)
            .map_err(|e| Error::ChunkCorrupt(format!("gzip decode: {e}")))?;
        Ok(out)
    }
}
