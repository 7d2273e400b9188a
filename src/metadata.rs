//! Metadata documents of the two layouts, and their resolution into one
//! typed array description.
//!
//! The v3 layout keeps everything in a single `zarr.json`; the v2 layout
//! splits arrays (`.zarray`), groups (`.zgroup`) and attributes
//! (`.zattrs`) across sibling documents and expresses dtypes as numpy
//! strings. Both resolve to [`ArrayMeta`].

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codecs::{BloscCodec, ByteCodecType, BytesCodec, CodecChain, Endian, GzipCodec, ZstdCodec};
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::{CoordVec, GridCoord};

pub type JsonObject = serde_json::Map<String, Value>;

pub const V3_METADATA_KEY: &str = "zarr.json";
pub const V2_ARRAY_KEY: &str = ".zarray";
pub const V2_GROUP_KEY: &str = ".zgroup";
pub const V2_ATTRS_KEY: &str = ".zattrs";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutVersion {
    V2,
    V3,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    #[serde(rename = "/")]
    Slash,
    #[serde(rename = ".")]
    Dot,
}

impl Separator {
    pub fn as_char(&self) -> char {
        match self {
            Self::Slash => '/',
            Self::Dot => '.',
        }
    }
}

impl Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// How chunk coordinates become store keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKeyEncoding {
    /// v3 default encoding: `c`-prefixed, separator-joined.
    Default { separator: Separator },
    /// Bare separator-joined coordinates (the v2 layout, and the v3
    /// `v2` encoding).
    V2 { separator: Separator },
}

impl ChunkKeyEncoding {
    pub fn chunk_key(&self, array_path: &str, coord: &[u64]) -> String {
        let mut name = String::new();
        let sep;
        match self {
            Self::Default { separator } => {
                sep = separator.as_char();
                name.push('c');
                for c in coord {
                    name.push(sep);
                    name.push_str(&c.to_string());
                }
            }
            Self::V2 { separator } => {
                sep = separator.as_char();
                for (i, c) in coord.iter().enumerate() {
                    if i > 0 {
                        name.push(sep);
                    }
                    name.push_str(&c.to_string());
                }
            }
        }
        crate::store::join_key(array_path, &name)
    }
}

/// Resolved description of one array, identical for both layouts.
/// Immutable after construction; shares no mutable state with the store.
#[derive(Clone, Debug)]
pub struct ArrayMeta {
    pub shape: GridCoord,
    pub chunk_shape: GridCoord,
    pub data_type: DataType,
    pub chain: CodecChain,
    pub key_encoding: ChunkKeyEncoding,
    pub layout: LayoutVersion,
    pub dimension_names: Option<CoordVec<Option<String>>>,
    /// Raw attribute blob, forwarded untouched to the overlay layer.
    pub attributes: JsonObject,
}

impl ArrayMeta {
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn element_size(&self) -> usize {
        self.data_type.size()
    }

    /// Byte length of a full (untruncated) decoded chunk.
    pub fn full_chunk_bytes(&self) -> usize {
        self.chunk_shape.iter().product::<u64>() as usize * self.element_size()
    }
}

#[derive(Clone, Debug)]
pub struct GroupMeta {
    pub layout: LayoutVersion,
    pub attributes: JsonObject,
}

pub(crate) enum NodeMeta {
    Array(ArrayMeta),
    Group(GroupMeta),
}

#[derive(Deserialize)]
struct NameConfig {
    name: String,
    #[serde(default)]
    configuration: Value,
}

#[derive(Deserialize)]
struct RegularGridConfig {
    chunk_shape: GridCoord,
}

#[derive(Deserialize, Default)]
struct SeparatorConfig {
    separator: Option<Separator>,
}

#[derive(Deserialize)]
struct ArrayMetadataV3 {
    zarr_format: u64,
    shape: GridCoord,
    data_type: String,
    chunk_grid: NameConfig,
    chunk_key_encoding: Option<NameConfig>,
    #[serde(default)]
    codecs: Vec<Value>,
    #[serde(default)]
    fill_value: Value,
    #[serde(default)]
    dimension_names: Option<CoordVec<Option<String>>>,
    #[serde(default)]
    attributes: JsonObject,
}

#[derive(Deserialize)]
struct GroupMetadataV3 {
    zarr_format: u64,
    #[serde(default)]
    attributes: JsonObject,
}

#[derive(Deserialize)]
struct ArrayMetadataV2 {
    zarr_format: u64,
    shape: GridCoord,
    chunks: GridCoord,
    dtype: String,
    compressor: Option<Value>,
    #[serde(default)]
    fill_value: Value,
    order: String,
    #[serde(default)]
    filters: Option<Vec<Value>>,
    #[serde(default)]
    dimension_separator: Option<Separator>,
}

#[derive(Deserialize)]
struct GroupMetadataV2 {
    zarr_format: u64,
}

fn validate_grid(shape: &[u64], chunk_shape: &[u64]) -> Result<()> {
    if shape.is_empty() {
        return Err(Error::MetadataInvalid("zero-rank array".to_string()));
    }
    if shape.len() != chunk_shape.len() {
        return Err(Error::MetadataInvalid(format!(
            "chunk rank {} does not match array rank {}",
            chunk_shape.len(),
            shape.len()
        )));
    }
    if chunk_shape.iter().any(|c| *c == 0) {
        return Err(Error::MetadataInvalid(
            "chunk shape contains a zero".to_string(),
        ));
    }
    Ok(())
}

fn codec_config<T: serde::de::DeserializeOwned + Default>(configuration: Value) -> Result<T> {
    if configuration.is_null() {
        Ok(T::default())
    } else {
        serde_json::from_value(configuration).map_err(Error::metadata)
    }
}

/// Build the codec chain from a v3 `codecs` list. The first entry must be
/// the array-to-bytes boundary codec; an empty list gets the default
/// little-endian boundary.
fn resolve_v3_codecs(codecs: Vec<Value>, element_size: usize) -> Result<CodecChain> {
    let mut bytes: Option<BytesCodec> = None;
    let mut byte_codecs = Vec::new();

    for (i, entry) in codecs.into_iter().enumerate() {
        let nc: NameConfig = serde_json::from_value(entry).map_err(Error::metadata)?;
        match nc.name.as_str() {
            // "endian" is the pre-release name of the boundary codec
            "bytes" | "endian" => {
                if bytes.is_some() {
                    return Err(Error::MetadataInvalid(
                        "more than one bytes codec".to_string(),
                    ));
                }
                if i != 0 {
                    return Err(Error::MetadataInvalid(
                        "bytes codec is not first in the chain".to_string(),
                    ));
                }
                bytes = Some(codec_config(nc.configuration)?);
            }
            "gzip" => {
                byte_codecs.push(ByteCodecType::Gzip(codec_config::<GzipCodec>(
                    nc.configuration,
                )?));
            }
            "zstd" => {
                byte_codecs.push(ByteCodecType::Zstd(codec_config::<ZstdCodec>(
                    nc.configuration,
                )?));
            }
            "blosc" => {
                let blosc: BloscCodec =
                    serde_json::from_value(nc.configuration).map_err(Error::metadata)?;
                byte_codecs.push(ByteCodecType::Blosc(
                    blosc.with_default_typesize(element_size),
                ));
            }
            "sharding_indexed" => {
                return Err(Error::Unsupported("sharded layout".to_string()));
            }
            other => {
                return Err(Error::Unsupported(format!("codec `{other}`")));
            }
        }
    }

    if bytes.is_none() && !byte_codecs.is_empty() {
        return Err(Error::MetadataInvalid(
            "codec chain has no bytes codec".to_string(),
        ));
    }
    Ok(CodecChain::new(
        bytes.unwrap_or_default(),
        byte_codecs,
        element_size,
    ))
}

fn resolve_v3_data_type(name: &str) -> Result<DataType> {
    serde_json::from_value(Value::String(name.to_string()))
        .map_err(|_| Error::Unsupported(format!("data type `{name}`")))
}

/// Parse a v3 `zarr.json` into an array or group description.
pub(crate) fn parse_v3_node(doc: &[u8]) -> Result<NodeMeta> {
    let value: Value = serde_json::from_slice(doc).map_err(Error::metadata)?;
    let node_type = value
        .get("node_type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MetadataInvalid("missing node_type".to_string()))?
        .to_string();

    match node_type.as_str() {
        "group" => {
            let meta: GroupMetadataV3 = serde_json::from_value(value).map_err(Error::metadata)?;
            if meta.zarr_format != 3 {
                return Err(Error::MetadataInvalid(format!(
                    "zarr_format {} in a v3 document",
                    meta.zarr_format
                )));
            }
            Ok(NodeMeta::Group(GroupMeta {
                layout: LayoutVersion::V3,
                attributes: meta.attributes,
            }))
        }
        "array" => {
            let meta: ArrayMetadataV3 = serde_json::from_value(value).map_err(Error::metadata)?;
            if meta.zarr_format != 3 {
                return Err(Error::MetadataInvalid(format!(
                    "zarr_format {} in a v3 document",
                    meta.zarr_format
                )));
            }

            if meta.chunk_grid.name != "regular" {
                return Err(Error::Unsupported(format!(
                    "chunk grid `{}`",
                    meta.chunk_grid.name
                )));
            }
            let grid: RegularGridConfig =
                serde_json::from_value(meta.chunk_grid.configuration).map_err(Error::metadata)?;
            validate_grid(&meta.shape, &grid.chunk_shape)?;

            let key_encoding = match meta.chunk_key_encoding {
                None => ChunkKeyEncoding::Default {
                    separator: Separator::Slash,
                },
                Some(nc) => {
                    let sep = codec_config::<SeparatorConfig>(nc.configuration)?.separator;
                    match nc.name.as_str() {
                        "default" => ChunkKeyEncoding::Default {
                            separator: sep.unwrap_or(Separator::Slash),
                        },
                        "v2" => ChunkKeyEncoding::V2 {
                            separator: sep.unwrap_or(Separator::Dot),
                        },
                        other => {
                            return Err(Error::Unsupported(format!(
                                "chunk key encoding `{other}`"
                            )))
                        }
                    }
                }
            };

            if let Some(names) = &meta.dimension_names {
                if names.len() != meta.shape.len() {
                    return Err(Error::MetadataInvalid(
                        "dimension_names length does not match rank".to_string(),
                    ));
                }
            }

            let data_type = resolve_v3_data_type(&meta.data_type)?;
            let chain = resolve_v3_codecs(meta.codecs, data_type.size())?;
            // fill_value is accepted but not materialized: absent chunks read
            // back as zero bytes
            let _ = meta.fill_value;

            Ok(NodeMeta::Array(ArrayMeta {
                shape: meta.shape,
                chunk_shape: grid.chunk_shape,
                data_type,
                chain,
                key_encoding,
                layout: LayoutVersion::V3,
                dimension_names: meta.dimension_names,
                attributes: meta.attributes,
            }))
        }
        other => Err(Error::MetadataInvalid(format!("node_type `{other}`"))),
    }
}

/// Parse a v2 `.zarray` plus its sibling `.zattrs` content.
///
/// `probe_separator` is consulted (with the array rank) only when the
/// document does not declare `dimension_separator`.
pub(crate) fn parse_v2_array<F>(
    doc: &[u8],
    attributes: JsonObject,
    probe_separator: F,
) -> Result<ArrayMeta>
where
    F: FnOnce(usize) -> Result<Separator>,
{
    let meta: ArrayMetadataV2 = serde_json::from_slice(doc).map_err(Error::metadata)?;
    if meta.zarr_format != 2 {
        return Err(Error::MetadataInvalid(format!(
            "zarr_format {} in a v2 document",
            meta.zarr_format
        )));
    }
    if meta.order != "C" {
        return Err(Error::Unsupported(format!("array order `{}`", meta.order)));
    }
    if meta.filters.as_ref().is_some_and(|f| !f.is_empty()) {
        return Err(Error::Unsupported("v2 filters".to_string()));
    }
    validate_grid(&meta.shape, &meta.chunks)?;

    let (data_type, endian) = DataType::from_numpy_str(&meta.dtype)?;
    let byte_codecs = match &meta.compressor {
        None => Vec::new(),
        Some(Value::Null) => Vec::new(),
        Some(compressor) => {
            let id = compressor
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::MetadataInvalid("compressor without id".to_string()))?;
            let codec = match id {
                "blosc" => {
                    let blosc: BloscCodec =
                        serde_json::from_value(compressor.clone()).map_err(Error::metadata)?;
                    ByteCodecType::Blosc(blosc.with_default_typesize(data_type.size()))
                }
                "gzip" => ByteCodecType::Gzip(
                    serde_json::from_value(compressor.clone()).map_err(Error::metadata)?,
                ),
                "zstd" => ByteCodecType::Zstd(
                    serde_json::from_value(compressor.clone()).map_err(Error::metadata)?,
                ),
                other => return Err(Error::Unsupported(format!("compressor `{other}`"))),
            };
            vec![codec]
        }
    };

    let separator = match meta.dimension_separator {
        Some(sep) => sep,
        None => probe_separator(meta.shape.len())?,
    };
    let _ = meta.fill_value;

    Ok(ArrayMeta {
        chain: CodecChain::new(BytesCodec::new(endian), byte_codecs, data_type.size()),
        shape: meta.shape,
        chunk_shape: meta.chunks,
        data_type,
        key_encoding: ChunkKeyEncoding::V2 { separator },
        layout: LayoutVersion::V2,
        dimension_names: None,
        attributes,
    })
}

pub(crate) fn parse_v2_group(doc: &[u8], attributes: JsonObject) -> Result<GroupMeta> {
    let meta: GroupMetadataV2 = serde_json::from_slice(doc).map_err(Error::metadata)?;
    if meta.zarr_format != 2 {
        return Err(Error::MetadataInvalid(format!(
            "zarr_format {} in a v2 document",
            meta.zarr_format
        )));
    }
    Ok(GroupMeta {
        layout: LayoutVersion::V2,
        attributes,
    })
}

/// Bootstrap description for creating a new v3 array.
#[derive(Clone, Debug)]
pub struct ArraySpec {
    pub shape: GridCoord,
    pub chunk_shape: GridCoord,
    pub data_type: DataType,
    pub endian: Endian,
    pub byte_codecs: Vec<ByteCodecType>,
    pub dimension_names: Option<CoordVec<Option<String>>>,
    pub attributes: JsonObject,
}

impl ArraySpec {
    pub fn new<S: AsRef<[u64]>, C: AsRef<[u64]>>(
        shape: S,
        chunk_shape: C,
        data_type: DataType,
    ) -> Self {
        Self {
            shape: shape.as_ref().iter().copied().collect(),
            chunk_shape: chunk_shape.as_ref().iter().copied().collect(),
            data_type,
            endian: Endian::Little,
            byte_codecs: Vec::new(),
            dimension_names: None,
            attributes: JsonObject::new(),
        }
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn push_codec(mut self, codec: ByteCodecType) -> Self {
        self.byte_codecs.push(codec);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_grid(&self.shape, &self.chunk_shape)
    }

    /// Emit the `zarr.json` document for this array.
    pub(crate) fn to_document(&self) -> Result<Vec<u8>> {
        let mut codecs = vec![serde_json::json!({
            "name": "bytes",
            "configuration": {"endian": self.endian},
        })];
        for codec in &self.byte_codecs {
            codecs.push(serde_json::to_value(codec).map_err(Error::metadata)?);
        }
        let mut doc = serde_json::json!({
            "zarr_format": 3,
            "node_type": "array",
            "shape": self.shape.as_slice(),
            "data_type": self.data_type,
            "chunk_grid": {
                "name": "regular",
                "configuration": {"chunk_shape": self.chunk_shape.as_slice()},
            },
            "chunk_key_encoding": {
                "name": "default",
                "configuration": {"separator": "/"},
            },
            "codecs": codecs,
            "fill_value": 0,
            "attributes": &self.attributes,
        });
        if let Some(names) = &self.dimension_names {
            doc["dimension_names"] = serde_json::to_value(names.as_slice()).map_err(Error::metadata)?;
        }
        serde_json::to_vec_pretty(&doc).map_err(Error::metadata)
    }

    pub(crate) fn to_meta(&self) -> Result<ArrayMeta> {
        self.validate()?;
        Ok(ArrayMeta {
            shape: self.shape.clone(),
            chunk_shape: self.chunk_shape.clone(),
            data_type: self.data_type,
            chain: CodecChain::new(
                BytesCodec::new(self.endian),
                self.byte_codecs.clone(),
                self.data_type.size(),
            ),
            key_encoding: ChunkKeyEncoding::Default {
                separator: Separator::Slash,
            },
            layout: LayoutVersion::V3,
            dimension_names: self.dimension_names.clone(),
            attributes: self.attributes.clone(),
        })
    }
}

/// Emit a v3 group document.
pub(crate) fn v3_group_document(attributes: &JsonObject) -> Result<Vec<u8>> {
    let doc = serde_json::json!({
        "zarr_format": 3,
        "node_type": "group",
        "attributes": attributes,
    });
    serde_json::to_vec_pretty(&doc).map_err(Error::metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_V3_ARRAY: &str = r#"{
        "zarr_format": 3,
        "node_type": "array",
        "shape": [10000, 1000],
        "dimension_names": ["y", "x"],
        "data_type": "uint16",
        "chunk_grid": {
            "name": "regular",
            "configuration": {"chunk_shape": [1000, 100]}
        },
        "chunk_key_encoding": {
            "name": "default",
            "configuration": {"separator": "/"}
        },
        "codecs": [
            {"name": "bytes", "configuration": {"endian": "little"}},
            {"name": "gzip", "configuration": {"level": 1}}
        ],
        "fill_value": 0,
        "attributes": {"foo": 42}
    }"#;

    #[test]
    fn v3_array_resolves() {
        let meta = match parse_v3_node(EXAMPLE_V3_ARRAY.as_bytes()).unwrap() {
            NodeMeta::Array(m) => m,
            NodeMeta::Group(_) => panic!("expected array"),
        };
        assert_eq!(meta.shape.as_slice(), &[10000, 1000]);
        assert_eq!(meta.chunk_shape.as_slice(), &[1000, 100]);
        assert_eq!(meta.data_type, DataType::UInt16);
        assert_eq!(meta.layout, LayoutVersion::V3);
        assert_eq!(meta.element_size(), 2);
        assert_eq!(meta.attributes["foo"], 42);
        assert_eq!(
            meta.key_encoding.chunk_key("img/0", &[1, 2]),
            "img/0/c/1/2"
        );
    }

    #[test]
    fn v3_group_resolves() {
        let doc = br#"{"zarr_format": 3, "node_type": "group", "attributes": {"a": 1}}"#;
        match parse_v3_node(doc).unwrap() {
            NodeMeta::Group(g) => {
                assert_eq!(g.layout, LayoutVersion::V3);
                assert_eq!(g.attributes["a"], 1);
            }
            NodeMeta::Array(_) => panic!("expected group"),
        }
    }

    #[test]
    fn v3_rejects() {
        let sharded = EXAMPLE_V3_ARRAY.replace("\"gzip\"", "\"sharding_indexed\"");
        assert!(matches!(
            parse_v3_node(sharded.as_bytes()),
            Err(Error::Unsupported(_))
        ));

        let odd_dtype = EXAMPLE_V3_ARRAY.replace("uint16", "complex64");
        assert!(matches!(
            parse_v3_node(odd_dtype.as_bytes()),
            Err(Error::Unsupported(_))
        ));

        let bad_node = EXAMPLE_V3_ARRAY.replace("\"array\"", "\"dataset\"");
        assert!(matches!(
            parse_v3_node(bad_node.as_bytes()),
            Err(Error::MetadataInvalid(_))
        ));
    }

    #[test]
    fn v3_dot_separator_keys() {
        let doc = EXAMPLE_V3_ARRAY.replace(r#""separator": "/""#, r#""separator": ".""#);
        let meta = match parse_v3_node(doc.as_bytes()).unwrap() {
            NodeMeta::Array(m) => m,
            NodeMeta::Group(_) => panic!(),
        };
        assert_eq!(meta.key_encoding.chunk_key("", &[3, 4]), "c.3.4");
    }

    const EXAMPLE_V2_ARRAY: &str = r#"{
        "zarr_format": 2,
        "shape": [100, 100],
        "chunks": [10, 10],
        "dtype": ">u2",
        "compressor": {"id": "blosc", "cname": "lz4", "clevel": 5, "shuffle": 1},
        "fill_value": 0,
        "order": "C",
        "filters": null
    }"#;

    #[test]
    fn v2_array_resolves_without_probe() {
        let doc = EXAMPLE_V2_ARRAY.replace(
            r#""order": "C""#,
            r#""order": "C", "dimension_separator": "/""#,
        );
        let meta = parse_v2_array(doc.as_bytes(), JsonObject::new(), |_| {
            panic!("declared separator must not probe")
        })
        .unwrap();
        assert_eq!(meta.data_type, DataType::UInt16);
        assert_eq!(meta.layout, LayoutVersion::V2);
        assert_eq!(meta.key_encoding.chunk_key("a", &[1, 2]), "a/1/2");
    }

    #[test]
    fn v2_array_probes_when_undeclared() {
        let meta = parse_v2_array(EXAMPLE_V2_ARRAY.as_bytes(), JsonObject::new(), |ndim| {
            assert_eq!(ndim, 2);
            Ok(Separator::Dot)
        })
        .unwrap();
        assert_eq!(meta.key_encoding.chunk_key("a", &[1, 2]), "a/1.2");
    }

    #[test]
    fn v2_rejects() {
        let fortran = EXAMPLE_V2_ARRAY.replace(r#""order": "C""#, r#""order": "F""#);
        assert!(matches!(
            parse_v2_array(fortran.as_bytes(), JsonObject::new(), |_| Ok(Separator::Dot)),
            Err(Error::Unsupported(_))
        ));

        let filtered = EXAMPLE_V2_ARRAY.replace(
            r#""filters": null"#,
            r#""filters": [{"id": "delta"}]"#,
        );
        assert!(matches!(
            parse_v2_array(filtered.as_bytes(), JsonObject::new(), |_| Ok(Separator::Dot)),
            Err(Error::Unsupported(_))
        ));

        let lzma = EXAMPLE_V2_ARRAY.replace("\"blosc\"", "\"lzma\"");
        assert!(matches!(
            parse_v2_array(lzma.as_bytes(), JsonObject::new(), |_| Ok(Separator::Dot)),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn v2_null_compressor_is_bare_boundary() {
        let doc = EXAMPLE_V2_ARRAY.replace(
            r#"{"id": "blosc", "cname": "lz4", "clevel": 5, "shuffle": 1}"#,
            "null",
        );
        let meta = parse_v2_array(doc.as_bytes(), JsonObject::new(), |_| Ok(Separator::Dot)).unwrap();
        // big-endian dtype: the boundary codec must swap on little hosts
        let encoded = meta.chain.encode(vec![0x01, 0x02]).unwrap();
        if Endian::NATIVE == Endian::Little {
            assert_eq!(encoded, vec![0x02, 0x01]);
        } else {
            assert_eq!(encoded, vec![0x01, 0x02]);
        }
        assert_eq!(meta.chain.decode(&encoded).unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn spec_document_roundtrips_through_resolver() {
        let spec = ArraySpec::new([4u64, 4], [2u64, 2], DataType::UInt8);
        let doc = spec.to_document().unwrap();
        let meta = match parse_v3_node(&doc).unwrap() {
            NodeMeta::Array(m) => m,
            NodeMeta::Group(_) => panic!(),
        };
        assert_eq!(meta.shape.as_slice(), &[4, 4]);
        assert_eq!(meta.data_type, DataType::UInt8);
        assert_eq!(meta.key_encoding.chunk_key("", &[0, 1]), "c/0/1");
    }
}
