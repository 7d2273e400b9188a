//! Coordinate transforms and the composed index<->physical mapping.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::smallvec;

use crate::error::{Error, Result};
use crate::region::{PhysicalRegion, PixelRegion};
use crate::{check_same_rank, CoordVec, GridCoord};

/// One step of a dataset or multiscale transform list.
///
/// Only the affine subset both overlay generations agree on: per-axis
/// scale and translation. Anything else is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CoordinateTransform {
    Identity,
    Scale { scale: Vec<f64> },
    Translation { translation: Vec<f64> },
}

impl CoordinateTransform {
    pub(crate) fn from_value(value: &Value) -> Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MetadataInvalid("coordinate transform without type".to_string()))?;
        match kind {
            "identity" | "scale" | "translation" => {
                serde_json::from_value(value.clone()).map_err(Error::metadata)
            }
            other => Err(Error::Unsupported(format!(
                "coordinate transform `{other}`"
            ))),
        }
    }
}

/// An ordered transform list collapsed to one `(scale, translation)`
/// pair per axis: `physical = scale * index + translation`.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateMapping {
    scale: CoordVec<f64>,
    translation: CoordVec<f64>,
}

impl CoordinateMapping {
    pub fn identity(ndim: usize) -> Self {
        Self {
            scale: smallvec![1.0; ndim],
            translation: smallvec![0.0; ndim],
        }
    }

    /// Fold the transforms in order onto this mapping. Dataset-level
    /// transforms must be applied before multiscale-level ones.
    pub fn compose<'a, I>(ndim: usize, transforms: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a CoordinateTransform>,
    {
        let mut mapping = Self::identity(ndim);
        for t in transforms {
            mapping.push(t)?;
        }
        Ok(mapping)
    }

    /// Apply one further transform to the physical side of the mapping.
    pub fn push(&mut self, transform: &CoordinateTransform) -> Result<()> {
        match transform {
            CoordinateTransform::Identity => {}
            CoordinateTransform::Scale { scale } => {
                check_same_rank("scale transform", scale.len(), self.scale.len())?;
                // physical = s*i + t becomes v*s*i + v*t: both components scale
                for (d, v) in scale.iter().enumerate() {
                    self.translation[d] *= v;
                    self.scale[d] *= v;
                }
            }
            CoordinateTransform::Translation { translation } => {
                check_same_rank("translation transform", translation.len(), self.scale.len())?;
                for (d, v) in translation.iter().enumerate() {
                    self.translation[d] += v;
                }
            }
        }
        Ok(())
    }

    pub fn ndim(&self) -> usize {
        self.scale.len()
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn translation(&self) -> &[f64] {
        &self.translation
    }

    pub fn index_to_physical(&self, index: &[f64]) -> Result<CoordVec<f64>> {
        check_same_rank("index", index.len(), self.ndim())?;
        Ok(index
            .iter()
            .zip(self.scale.iter().zip(self.translation.iter()))
            .map(|(i, (s, t))| s * i + t)
            .collect())
    }

    pub fn physical_to_index(&self, physical: &[f64]) -> Result<CoordVec<f64>> {
        check_same_rank("physical point", physical.len(), self.ndim())?;
        physical
            .iter()
            .zip(self.scale.iter().zip(self.translation.iter()))
            .enumerate()
            .map(|(d, (p, (s, t)))| {
                if *s == 0.0 {
                    Err(Error::MetadataInvalid(format!("zero scale on axis {d}")))
                } else {
                    Ok((p - t) / s)
                }
            })
            .collect()
    }

    /// Convert a physical region to a pixel region clamped and snapped to
    /// the array bounds. Every axis of the result has positive extent:
    /// degenerate axes are widened to a single pixel inside the bounds.
    pub fn physical_to_pixel(&self, roi: &PhysicalRegion, shape: &[u64]) -> Result<PixelRegion> {
        check_same_rank("physical region", roi.ndim(), self.ndim())?;
        check_same_rank("array shape", shape.len(), self.ndim())?;
        let idx_start = self.physical_to_index(&roi.origin)?;
        let idx_end = self.physical_to_index(&roi.end())?;

        let mut start = GridCoord::with_capacity(shape.len());
        let mut end = GridCoord::with_capacity(shape.len());
        for (d, sh) in shape.iter().enumerate() {
            if *sh == 0 {
                return Err(Error::InvalidRegion(format!(
                    "axis {d} of the array has zero extent"
                )));
            }
            let (lo, hi) = if idx_start[d] <= idx_end[d] {
                (idx_start[d], idx_end[d])
            } else {
                (idx_end[d], idx_start[d])
            };
            let shf = *sh as f64;
            let mut s = lo.floor().clamp(0.0, shf) as u64;
            let mut e = hi.ceil().clamp(0.0, shf) as u64;
            if e <= s {
                s = lo.floor().clamp(0.0, shf - 1.0) as u64;
                e = s + 1;
            }
            start.push(s);
            end.push(e);
        }
        Ok(PixelRegion { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(v: &[f64]) -> CoordinateTransform {
        CoordinateTransform::Scale { scale: v.to_vec() }
    }

    fn translation(v: &[f64]) -> CoordinateTransform {
        CoordinateTransform::Translation {
            translation: v.to_vec(),
        }
    }

    #[test]
    fn parse_transform_values() {
        let v: Value = serde_json::json!({"type": "scale", "scale": [1.0, 0.5]});
        assert_eq!(
            CoordinateTransform::from_value(&v).unwrap(),
            scale(&[1.0, 0.5])
        );
        let v: Value = serde_json::json!({"type": "identity"});
        assert_eq!(
            CoordinateTransform::from_value(&v).unwrap(),
            CoordinateTransform::Identity
        );
        let v: Value = serde_json::json!({"type": "rotation", "rotation": [0.5]});
        assert!(matches!(
            CoordinateTransform::from_value(&v),
            Err(Error::Unsupported(_))
        ));
        let v: Value = serde_json::json!({"scale": [1.0]});
        assert!(matches!(
            CoordinateTransform::from_value(&v),
            Err(Error::MetadataInvalid(_))
        ));
    }

    #[test]
    fn compose_dataset_then_multiscale() {
        // dataset scale, then multiscale translation
        let mapping = CoordinateMapping::compose(
            3,
            [
                scale(&[2.0, 0.5, 0.5]),
                translation(&[0.0, 10.0, 20.0]),
            ]
            .iter(),
        )
        .unwrap();
        assert_eq!(mapping.scale(), &[2.0, 0.5, 0.5]);
        assert_eq!(mapping.translation(), &[0.0, 10.0, 20.0]);

        let p = mapping.index_to_physical(&[1.0, 2.0, 4.0]).unwrap();
        assert_eq!(p.as_slice(), &[2.0, 11.0, 22.0]);
    }

    #[test]
    fn scale_after_translation_scales_both_components() {
        let mapping =
            CoordinateMapping::compose(1, [translation(&[3.0]), scale(&[2.0])].iter()).unwrap();
        assert_eq!(mapping.scale(), &[2.0]);
        assert_eq!(mapping.translation(), &[6.0]);
    }

    #[test]
    fn physical_index_roundtrip() {
        let mapping =
            CoordinateMapping::compose(2, [scale(&[0.25, 4.0]), translation(&[-3.0, 7.5])].iter())
                .unwrap();
        for p in [[0.0, 0.0], [12.25, -80.5], [-0.125, 3.25]] {
            let idx = mapping.physical_to_index(&p).unwrap();
            let back = mapping.index_to_physical(&idx).unwrap();
            for (a, b) in back.iter().zip(p.iter()) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn roi_snapping() {
        let mapping = CoordinateMapping::compose(
            3,
            [
                scale(&[2.0, 0.5, 0.5]),
                translation(&[0.0, 10.0, 20.0]),
            ]
            .iter(),
        )
        .unwrap();
        let roi = PhysicalRegion::new([0.0, 10.0, 20.0], [4.0, 5.0, 6.0]);
        let pixels = mapping
            .physical_to_pixel(&roi, &[10, 20, 30])
            .unwrap();
        assert_eq!(pixels, PixelRegion::new([0u64, 0, 0], [2u64, 10, 12]));
    }

    #[test]
    fn roi_clamps_to_bounds() {
        let mapping = CoordinateMapping::identity(2);
        let roi = PhysicalRegion::new([-5.0, 2.5], [100.0, 1.0]);
        let pixels = mapping.physical_to_pixel(&roi, &[10, 10]).unwrap();
        assert_eq!(pixels, PixelRegion::new([0u64, 2], [10u64, 4]));
    }

    #[test]
    fn degenerate_axis_widens_to_one_pixel() {
        let mapping = CoordinateMapping::identity(1);
        // zero-thickness plane inside the array
        let roi = PhysicalRegion::new([3.0], [0.0]);
        let pixels = mapping.physical_to_pixel(&roi, &[10]).unwrap();
        assert_eq!(pixels, PixelRegion::new([3u64], [4u64]));
        // beyond the upper bound: still one in-bounds pixel
        let roi = PhysicalRegion::new([50.0], [1.0]);
        let pixels = mapping.physical_to_pixel(&roi, &[10]).unwrap();
        assert_eq!(pixels, PixelRegion::new([9u64], [10u64]));
    }
}
