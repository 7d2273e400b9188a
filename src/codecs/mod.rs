use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod blosc_codec;
pub mod bytes_codec;
pub mod gzip_codec;
pub mod zstd_codec;

pub use blosc_codec::BloscCodec;
pub use bytes_codec::{BytesCodec, Endian};
pub use gzip_codec::GzipCodec;
pub use zstd_codec::ZstdCodec;

/// Symmetric byte-to-byte transform.
pub trait ByteCodec {
    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>>;

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>>;
}

/// The closed set of byte-to-byte codecs.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(tag = "name", content = "configuration", rename_all = "lowercase")]
pub enum ByteCodecType {
    Gzip(GzipCodec),
    Zstd(ZstdCodec),
    Blosc(BloscCodec),
}

impl ByteCodec for ByteCodecType {
    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Gzip(c) => c.encode(raw),
            Self::Zstd(c) => c.encode(raw),
            Self::Blosc(c) => c.encode(raw),
        }
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Gzip(c) => c.decode(encoded),
            Self::Zstd(c) => c.decode(encoded),
            Self::Blosc(c) => c.decode(encoded),
        }
    }
}

/// Ordered codec pipeline for one array.
///
/// The boundary codec is held apart from the byte-to-byte codecs so it
/// can be fed the array's element size for endian swapping. Encode runs
/// the boundary codec then the byte codecs in order; decode reverses.
/// Instances are stateless per call and safe to share across concurrent
/// region reads.
#[derive(Clone, Debug, PartialEq)]
pub struct CodecChain {
    bytes: BytesCodec,
    byte_codecs: Vec<ByteCodecType>,
    element_size: usize,
}

impl CodecChain {
    pub fn new(bytes: BytesCodec, byte_codecs: Vec<ByteCodecType>, element_size: usize) -> Self {
        Self {
            bytes,
            byte_codecs,
            element_size,
        }
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn encode(&self, mut raw: Vec<u8>) -> Result<Vec<u8>> {
        self.bytes.apply(&mut raw, self.element_size);
        let mut buf = raw;
        for codec in &self.byte_codecs {
            buf = codec.encode(&buf)?;
        }
        Ok(buf)
    }

    pub fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        let mut it = self.byte_codecs.iter().rev();
        let mut buf = match it.next() {
            Some(codec) => codec.decode(encoded)?,
            None => encoded.to_vec(),
        };
        for codec in it {
            buf = codec.decode(&buf)?;
        }
        self.bytes.apply(&mut buf, self.element_size);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::blosc_codec::{BloscCompressor, Shuffle};
    use super::*;

    #[test]
    fn tagged_codec_deser() {
        let c: ByteCodecType =
            serde_json::from_str(r#"{"name":"gzip","configuration":{"level":1}}"#).unwrap();
        assert_eq!(c, ByteCodecType::Gzip(GzipCodec { level: 1 }));

        let c: ByteCodecType =
            serde_json::from_str(r#"{"name":"zstd","configuration":{"level":7}}"#).unwrap();
        assert_eq!(c, ByteCodecType::Zstd(ZstdCodec { level: 7 }));

        let c: ByteCodecType = serde_json::from_str(
            r#"{"name":"blosc","configuration":{"cname":"zstd","clevel":3,"shuffle":"byteshuffle","typesize":2,"blocksize":0}}"#,
        )
        .unwrap();
        match c {
            ByteCodecType::Blosc(b) => {
                assert_eq!(b.cname, BloscCompressor::Zstd);
                assert_eq!(b.shuffle, Shuffle::Byte);
            }
            other => panic!("expected blosc, got {other:?}"),
        }
    }

    #[test]
    fn chain_roundtrip_with_swap_and_compression() {
        let chain = CodecChain::new(
            BytesCodec::new(match Endian::NATIVE {
                Endian::Little => Endian::Big,
                Endian::Big => Endian::Little,
            }),
            vec![
                ByteCodecType::Gzip(GzipCodec::default()),
                ByteCodecType::Zstd(ZstdCodec::default()),
            ],
            2,
        );
        let raw: Vec<u8> = (0..512u16).flat_map(|v| v.to_ne_bytes()).collect();
        let encoded = chain.encode(raw.clone()).unwrap();
        assert_ne!(encoded, raw);
        assert_eq!(chain.decode(&encoded).unwrap(), raw);
    }

    #[test]
    fn empty_chain_only_swaps() {
        let chain = CodecChain::new(BytesCodec::new_big(), vec![], 2);
        let raw = vec![1u8, 2, 3, 4];
        let encoded = chain.encode(raw.clone()).unwrap();
        assert_eq!(chain.decode(&encoded).unwrap(), raw);
        if Endian::NATIVE == Endian::Little {
            assert_eq!(encoded, vec![2, 1, 4, 3]);
        }
    }
}
