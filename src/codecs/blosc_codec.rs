//! The self-describing block-shuffled meta-codec.
//!
//! Frames are the stable v1.1 layout: a 16-byte little-endian header
//! (format version, flags, typesize, uncompressed size, block size, total
//! frame size), then either raw bytes (memcpy frames) or an `i32` table of
//! absolute block offsets followed by per-block stream data. Blocks are
//! byte-shuffled and split into one stream per intra-element byte position
//! when shuffling multi-byte elements; each stream is stored raw when the
//! inner compressor would expand it, and collapses to a bare zero length
//! marker when it is all zeros.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::ByteCodec;

const HEADER_LEN: usize = 16;
const VERSION_FORMAT: u8 = 0x01;
const VERSION_INNER: u8 = 0x01;
const MAX_TYPESIZE: usize = 255;
const DEFAULT_BLOCKSIZE: usize = 256 * 1024;

const FLAG_BYTE_SHUFFLE: u8 = 0x01;
const FLAG_MEMCPY: u8 = 0x02;
const FLAG_BIT_SHUFFLE: u8 = 0x04;
const FLAG_SPLIT: u8 = 0x10;
const COMPRESSOR_SHIFT: u8 = 5;

/// Inner compressor applied to each block stream.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloscCompressor {
    BloscLz,
    Lz4,
    Lz4hc,
    Snappy,
    Zlib,
    Zstd,
}

impl BloscCompressor {
    fn id(self) -> u8 {
        match self {
            Self::BloscLz => 0,
            Self::Lz4 | Self::Lz4hc => 1,
            Self::Snappy => 2,
            Self::Zlib => 3,
            Self::Zstd => 4,
        }
    }

    fn from_id(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Self::Lz4),
            3 => Ok(Self::Zlib),
            4 => Ok(Self::Zstd),
            0 => Err(Error::Unsupported("blosclz inner compressor".to_string())),
            2 => Err(Error::Unsupported("snappy inner compressor".to_string())),
            other => Err(Error::ChunkCorrupt(format!(
                "unknown inner compressor id {other}"
            ))),
        }
    }
}

/// Byte rearrangement applied per block before compression.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Shuffle {
    #[default]
    None,
    Byte,
    Bit,
}

impl Serialize for Shuffle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Self::None => "noshuffle",
            Self::Byte => "byteshuffle",
            Self::Bit => "bitshuffle",
        })
    }
}

// Written as either a name or a numcodecs-style integer.
impl<'de> Deserialize<'de> for Shuffle {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(i64),
            Name(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Int(0) => Ok(Self::None),
            Repr::Int(1) => Ok(Self::Byte),
            Repr::Int(2) => Ok(Self::Bit),
            Repr::Int(other) => Err(serde::de::Error::custom(format!(
                "unknown shuffle code {other}"
            ))),
            Repr::Name(name) => match name.as_str() {
                "noshuffle" => Ok(Self::None),
                "byteshuffle" | "shuffle" => Ok(Self::Byte),
                "bitshuffle" => Ok(Self::Bit),
                other => Err(serde::de::Error::custom(format!(
                    "unknown shuffle name `{other}`"
                ))),
            },
        }
    }
}

fn default_clevel() -> u32 {
    5
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct BloscCodec {
    pub cname: BloscCompressor,
    #[serde(default = "default_clevel")]
    pub clevel: u32,
    #[serde(default)]
    pub shuffle: Shuffle,
    #[serde(default)]
    pub typesize: usize,
    #[serde(default)]
    pub blocksize: usize,
}

impl BloscCodec {
    /// Fill in a typesize from the array element size when the metadata
    /// left it unset (the v2 layout never declares one).
    pub(crate) fn with_default_typesize(mut self, element_size: usize) -> Self {
        if self.typesize == 0 {
            self.typesize = element_size;
        }
        self
    }

    fn checked_compressor(&self) -> Result<BloscCompressor> {
        match self.cname {
            BloscCompressor::BloscLz => {
                Err(Error::Unsupported("blosclz inner compressor".to_string()))
            }
            BloscCompressor::Snappy => {
                Err(Error::Unsupported("snappy inner compressor".to_string()))
            }
            c => Ok(c),
        }
    }

    fn effective_blocksize(&self, nbytes: usize, typesize: usize) -> usize {
        let mut bs = if self.blocksize > 0 {
            self.blocksize
        } else {
            DEFAULT_BLOCKSIZE
        };
        bs = bs.min(nbytes).max(1);
        if bs > typesize {
            // keep whole elements together within a block
            bs -= bs % typesize;
        }
        bs
    }
}

/// Lengths of the streams a block of `block_len` bytes is stored as:
/// integer division to each stream, remainder to the last.
fn stream_lengths(block_len: usize, n_streams: usize) -> impl Iterator<Item = usize> {
    let base = block_len / n_streams;
    (0..n_streams).map(move |s| {
        if s == n_streams - 1 {
            base + block_len % n_streams
        } else {
            base
        }
    })
}

/// Group bytes by intra-element position: all position-0 bytes, then all
/// position-1 bytes, and so on. A trailing partial element is copied
/// through unchanged.
fn shuffle_block(block: &[u8], typesize: usize) -> Vec<u8> {
    let nelem = block.len() / typesize;
    let whole = nelem * typesize;
    let mut out = vec![0u8; block.len()];
    for j in 0..typesize {
        for e in 0..nelem {
            out[j * nelem + e] = block[e * typesize + j];
        }
    }
    out[whole..].copy_from_slice(&block[whole..]);
    out
}

fn unshuffle_block(block: &[u8], typesize: usize) -> Vec<u8> {
    let nelem = block.len() / typesize;
    let whole = nelem * typesize;
    let mut out = vec![0u8; block.len()];
    for j in 0..typesize {
        for e in 0..nelem {
            out[e * typesize + j] = block[j * nelem + e];
        }
    }
    out[whole..].copy_from_slice(&block[whole..]);
    out
}

fn compress_stream(compressor: BloscCompressor, raw: &[u8], clevel: u32) -> Result<Vec<u8>> {
    match compressor {
        BloscCompressor::Lz4 | BloscCompressor::Lz4hc => Ok(lz4_flex::block::compress(raw)),
        BloscCompressor::Zlib => {
            let mut encoder =
                DeflateEncoder::new(Vec::new(), Compression::new(clevel.clamp(1, 9)));
            encoder
                .write_all(raw)
                .map_err(|e| Error::ChunkCorrupt(format!("deflate encode: {e}")))?;
            encoder
                .finish()
                .map_err(|e| Error::ChunkCorrupt(format!("deflate encode: {e}")))
        }
        BloscCompressor::Zstd => zstd::encode_all(raw, (clevel as i32).clamp(1, 22))
            .map_err(|e| Error::ChunkCorrupt(format!("zstd encode: {e}"))),
        BloscCompressor::BloscLz | BloscCompressor::Snappy => unreachable!("rejected earlier"),
    }
}

fn decompress_stream(
    compressor: BloscCompressor,
    encoded: &[u8],
    expected: usize,
) -> Result<Vec<u8>> {
    let out = match compressor {
        BloscCompressor::Lz4 | BloscCompressor::Lz4hc => {
            lz4_flex::block::decompress(encoded, expected)
                .map_err(|e| Error::ChunkCorrupt(format!("lz4 decode: {e}")))?
        }
        BloscCompressor::Zlib => {
            let mut out = Vec::with_capacity(expected);
            DeflateDecoder::new(encoded)
                .read_to_end(&mut out)
                .map_err(|e| Error::ChunkCorrupt(format!("deflate decode: {e}")))?;
            out
        }
        BloscCompressor::Zstd => zstd::decode_all(encoded)
            .map_err(|e| Error::ChunkCorrupt(format!("zstd decode: {e}")))?,
        BloscCompressor::BloscLz | BloscCompressor::Snappy => unreachable!("rejected earlier"),
    };
    if out.len() != expected {
        return Err(Error::ChunkCorrupt(format!(
            "stream decompressed to {} bytes, expected {expected}",
            out.len()
        )));
    }
    Ok(out)
}

impl ByteCodec for BloscCodec {
    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        if matches!(self.shuffle, Shuffle::Bit) {
            return Err(Error::Unsupported("bit-shuffle".to_string()));
        }
        let nbytes = raw.len();
        if nbytes > u32::MAX as usize {
            return Err(Error::Unsupported(format!(
                "buffer of {nbytes} bytes exceeds the frame format limit"
            )));
        }

        let typesize = self.typesize.clamp(1, MAX_TYPESIZE);
        let shuffle = matches!(self.shuffle, Shuffle::Byte);
        let split = shuffle && typesize > 1;
        let blocksize = self.effective_blocksize(nbytes.max(1), typesize);

        let mut flags = 0u8;
        if shuffle {
            flags |= FLAG_BYTE_SHUFFLE;
        }
        if split {
            flags |= FLAG_SPLIT;
        }

        let mut frame = Vec::with_capacity(HEADER_LEN + nbytes / 2);
        let memcpy = self.clevel == 0;
        if memcpy {
            flags |= FLAG_MEMCPY;
            // raw frames carry no shuffle or split
            flags &= !(FLAG_BYTE_SHUFFLE | FLAG_SPLIT);
        } else {
            let compressor = self.checked_compressor()?;
            flags |= compressor.id() << COMPRESSOR_SHIFT;
        }

        frame.push(VERSION_FORMAT);
        frame.push(VERSION_INNER);
        frame.push(flags);
        frame.push(typesize as u8);
        frame.extend_from_slice(&(nbytes as u32).to_le_bytes());
        frame.extend_from_slice(&(blocksize as u32).to_le_bytes());
        frame.extend_from_slice(&0u32.to_le_bytes()); // cbytes, patched below

        if memcpy {
            frame.extend_from_slice(raw);
        } else if nbytes > 0 {
            let compressor = self.checked_compressor()?;
            let n_blocks = nbytes.div_ceil(blocksize);
            let bstarts_at = frame.len();
            frame.resize(frame.len() + 4 * n_blocks, 0);

            for (i, block) in raw.chunks(blocksize).enumerate() {
                let start = frame.len();
                if start > i32::MAX as usize {
                    return Err(Error::Unsupported(
                        "frame exceeds the block offset limit".to_string(),
                    ));
                }
                frame[bstarts_at + 4 * i..bstarts_at + 4 * (i + 1)]
                    .copy_from_slice(&(start as i32).to_le_bytes());

                let shuffled;
                let stored: &[u8] = if shuffle && typesize > 1 {
                    shuffled = shuffle_block(block, typesize);
                    &shuffled
                } else {
                    block
                };

                let n_streams = if split { typesize } else { 1 };
                let mut offset = 0;
                for stream_len in stream_lengths(block.len(), n_streams) {
                    let stream = &stored[offset..offset + stream_len];
                    offset += stream_len;
                    if stream.iter().all(|b| *b == 0) {
                        frame.extend_from_slice(&0i32.to_le_bytes());
                        continue;
                    }
                    let compressed = compress_stream(compressor, stream, self.clevel)?;
                    if compressed.len() >= stream.len() {
                        // incompressible: store verbatim
                        frame.extend_from_slice(&(stream.len() as i32).to_le_bytes());
                        frame.extend_from_slice(stream);
                    } else {
                        frame.extend_from_slice(&(compressed.len() as i32).to_le_bytes());
                        frame.extend_from_slice(&compressed);
                    }
                }
            }
        }

        let cbytes = frame.len();
        if cbytes > u32::MAX as usize {
            return Err(Error::Unsupported(
                "frame exceeds the format size limit".to_string(),
            ));
        }
        frame[12..16].copy_from_slice(&(cbytes as u32).to_le_bytes());
        Ok(frame)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        if encoded.len() < HEADER_LEN {
            return Err(Error::ChunkCorrupt(format!(
                "frame of {} bytes is shorter than the header",
                encoded.len()
            )));
        }
        let version = encoded[0];
        let flags = encoded[2];
        let typesize = (encoded[3] as usize).max(1);
        let mut header = &encoded[4..HEADER_LEN];
        let read_u32 = |r: &mut &[u8]| {
            r.read_u32::<LittleEndian>()
                .map_err(|e| Error::ChunkCorrupt(e.to_string()))
        };
        let nbytes = read_u32(&mut header)? as usize;
        let blocksize = read_u32(&mut header)? as usize;
        let cbytes = read_u32(&mut header)? as usize;

        if version != VERSION_FORMAT {
            return Err(Error::Unsupported(format!(
                "blosc frame format version {version}"
            )));
        }
        if flags & FLAG_BIT_SHUFFLE != 0 {
            return Err(Error::Unsupported("bit-shuffle".to_string()));
        }
        if cbytes < HEADER_LEN || cbytes > encoded.len() {
            return Err(Error::ChunkCorrupt(format!(
                "frame claims {cbytes} bytes but holds {}",
                encoded.len()
            )));
        }
        let frame = &encoded[..cbytes];

        if nbytes == 0 {
            return Ok(Vec::new());
        }
        if flags & FLAG_MEMCPY != 0 {
            let end = HEADER_LEN + nbytes;
            if end > frame.len() {
                return Err(Error::ChunkCorrupt(
                    "raw frame shorter than its declared payload".to_string(),
                ));
            }
            return Ok(frame[HEADER_LEN..end].to_vec());
        }
        if blocksize == 0 {
            return Err(Error::ChunkCorrupt("zero block size".to_string()));
        }

        let compressor = BloscCompressor::from_id(flags >> COMPRESSOR_SHIFT)?;
        let shuffle = flags & FLAG_BYTE_SHUFFLE != 0;
        // Splitting is inferred, not read from the flag: writers disagree on
        // its polarity, and a frame without shuffle is never split.
        let split = shuffle && typesize > 1;

        let n_blocks = nbytes.div_ceil(blocksize);
        let mut bstarts = &frame[HEADER_LEN..];
        if bstarts.len() < 4 * n_blocks {
            return Err(Error::ChunkCorrupt(
                "frame too short for its block offset table".to_string(),
            ));
        }

        let mut out = Vec::with_capacity(nbytes);
        for i in 0..n_blocks {
            let block_len = (nbytes - i * blocksize).min(blocksize);
            let bstart = bstarts
                .read_i32::<LittleEndian>()
                .map_err(|e| Error::ChunkCorrupt(e.to_string()))?;
            let mut pos = usize::try_from(bstart)
                .map_err(|_| Error::ChunkCorrupt(format!("negative block offset {bstart}")))?;

            let n_streams = if split { typesize } else { 1 };
            let mut block = Vec::with_capacity(block_len);
            for stream_len in stream_lengths(block_len, n_streams) {
                if pos + 4 > frame.len() {
                    return Err(Error::ChunkCorrupt(
                        "stream header past the end of the frame".to_string(),
                    ));
                }
                let mut csize_bytes = [0u8; 4];
                csize_bytes.copy_from_slice(&frame[pos..pos + 4]);
                let csize = i32::from_le_bytes(csize_bytes);
                pos += 4;
                if csize == 0 {
                    // all-zero stream, no data bytes stored
                    block.resize(block.len() + stream_len, 0);
                    continue;
                }
                let csize = usize::try_from(csize)
                    .map_err(|_| Error::ChunkCorrupt(format!("negative stream size {csize}")))?;
                if csize >= stream_len {
                    // raw (incompressible) stream, copied verbatim
                    if pos + stream_len > frame.len() {
                        return Err(Error::ChunkCorrupt(
                            "raw stream past the end of the frame".to_string(),
                        ));
                    }
                    block.extend_from_slice(&frame[pos..pos + stream_len]);
                } else {
                    if pos + csize > frame.len() {
                        return Err(Error::ChunkCorrupt(
                            "compressed stream past the end of the frame".to_string(),
                        ));
                    }
                    block.extend(decompress_stream(
                        compressor,
                        &frame[pos..pos + csize],
                        stream_len,
                    )?);
                }
                pos += csize;
            }

            if shuffle && typesize > 1 {
                out.extend(unshuffle_block(&block, typesize));
            } else {
                out.extend(block);
            }
        }

        if out.len() != nbytes {
            return Err(Error::ChunkCorrupt(format!(
                "frame decoded to {} bytes, expected {nbytes}",
                out.len()
            )));
        }
        Ok(out)
    }
}
