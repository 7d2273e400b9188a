use serde::{Deserialize, Serialize};

use crate::codecs::bytes_codec::Endian;
use crate::error::{Error, Result};

/// Element classification of an array.
///
/// The closed set of types both layouts can express: bool, signed and
/// unsigned integers of 8-64 bits, and IEEE floats of 32/64 bits.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl DataType {
    /// Element width in bytes.
    pub fn size(&self) -> usize {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Parse a numpy dtype string as used by the v2 layout,
    /// e.g. `"<u2"`, `">f8"`, `"|b1"`.
    ///
    /// The first character is the byte order (`<` little, `>` big,
    /// `|` not applicable, `=` native), the second the type kind, and the
    /// remaining digits the element size in bytes.
    pub fn from_numpy_str(dtype: &str) -> Result<(Self, Endian)> {
        let mut chars = dtype.chars();
        let order = chars
            .next()
            .ok_or_else(|| Error::MetadataInvalid("empty dtype string".to_string()))?;
        let endian = match order {
            '<' | '|' => Endian::Little,
            '>' => Endian::Big,
            '=' => Endian::NATIVE,
            _ => {
                return Err(Error::MetadataInvalid(format!(
                    "unknown byte order `{order}` in dtype `{dtype}`"
                )))
            }
        };
        let kind = chars
            .next()
            .ok_or_else(|| Error::MetadataInvalid(format!("dtype `{dtype}` has no type kind")))?;
        let size: usize = chars
            .as_str()
            .parse()
            .map_err(|_| Error::MetadataInvalid(format!("dtype `{dtype}` has no element size")))?;

        let dt = match (kind, size) {
            ('b', 1) => Self::Bool,
            ('i', 1) => Self::Int8,
            ('i', 2) => Self::Int16,
            ('i', 4) => Self::Int32,
            ('i', 8) => Self::Int64,
            ('u', 1) => Self::UInt8,
            ('u', 2) => Self::UInt16,
            ('u', 4) => Self::UInt32,
            ('u', 8) => Self::UInt64,
            ('f', 4) => Self::Float32,
            ('f', 8) => Self::Float64,
            _ => {
                return Err(Error::Unsupported(format!(
                    "dtype `{dtype}` is not a supported type"
                )))
            }
        };
        Ok((dt, endian))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v3_names_roundtrip() {
        for (s, dt) in [
            ("\"bool\"", DataType::Bool),
            ("\"uint16\"", DataType::UInt16),
            ("\"int64\"", DataType::Int64),
            ("\"float32\"", DataType::Float32),
        ] {
            let parsed: DataType = serde_json::from_str(s).unwrap();
            assert_eq!(parsed, dt);
            assert_eq!(serde_json::to_string(&dt).unwrap(), s);
        }
    }

    #[test]
    fn numpy_strings() {
        assert_eq!(
            DataType::from_numpy_str("<u2").unwrap(),
            (DataType::UInt16, Endian::Little)
        );
        assert_eq!(
            DataType::from_numpy_str(">f8").unwrap(),
            (DataType::Float64, Endian::Big)
        );
        assert_eq!(
            DataType::from_numpy_str("|b1").unwrap(),
            (DataType::Bool, Endian::Little)
        );
        assert_eq!(
            DataType::from_numpy_str("=i4").unwrap().0,
            DataType::Int32
        );
    }

    #[test]
    fn numpy_rejects() {
        assert!(matches!(
            DataType::from_numpy_str("<c16"),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            DataType::from_numpy_str("u2"),
            Err(Error::MetadataInvalid(_))
        ));
        assert!(matches!(
            DataType::from_numpy_str("<f3"),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn sizes() {
        assert_eq!(DataType::Bool.size(), 1);
        assert_eq!(DataType::UInt16.size(), 2);
        assert_eq!(DataType::Float64.size(), 8);
    }
}
