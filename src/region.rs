use itertools::Itertools;

use crate::error::{Error, Result};
use crate::{check_same_rank, CoordVec, GridCoord};

/// Half-open axis-aligned box in index space: `[start, end)` per axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelRegion {
    pub start: GridCoord,
    pub end: GridCoord,
}

impl PixelRegion {
    pub fn new<S: AsRef<[u64]>, E: AsRef<[u64]>>(start: S, end: E) -> Self {
        Self {
            start: start.as_ref().iter().copied().collect(),
            end: end.as_ref().iter().copied().collect(),
        }
    }

    pub fn from_offset_shape(offset: &[u64], shape: &[u64]) -> Self {
        Self {
            start: offset.iter().copied().collect(),
            end: offset.iter().zip(shape.iter()).map(|(o, s)| o + s).collect(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.start.len()
    }

    pub fn shape(&self) -> GridCoord {
        self.start
            .iter()
            .zip(self.end.iter())
            .map(|(s, e)| e.saturating_sub(*s))
            .collect()
    }

    pub fn num_elements(&self) -> u64 {
        self.shape().iter().product()
    }

    /// Check the region is well-formed and within the array bounds:
    /// same rank, and `0 <= start < end <= shape` on every axis.
    pub fn validate(&self, array_shape: &[u64]) -> Result<()> {
        check_same_rank("region start/end", self.start.len(), self.end.len())?;
        check_same_rank("region/array", self.ndim(), array_shape.len())?;
        for (d, ((s, e), sh)) in self
            .start
            .iter()
            .zip(self.end.iter())
            .zip(array_shape.iter())
            .enumerate()
        {
            if s >= e || *e > *sh {
                return Err(Error::InvalidRegion(format!(
                    "axis {d}: [{s}, {e}) does not fit in 0..{sh}"
                )));
            }
        }
        Ok(())
    }
}

/// Axis-aligned box in physical space: `origin + size` per axis,
/// all size components positive.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicalRegion {
    pub origin: CoordVec<f64>,
    pub size: CoordVec<f64>,
}

impl PhysicalRegion {
    pub fn new<O: AsRef<[f64]>, S: AsRef<[f64]>>(origin: O, size: S) -> Self {
        Self {
            origin: origin.as_ref().iter().copied().collect(),
            size: size.as_ref().iter().copied().collect(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.origin.len()
    }

    pub fn end(&self) -> CoordVec<f64> {
        self.origin
            .iter()
            .zip(self.size.iter())
            .map(|(o, s)| o + s)
            .collect()
    }
}

/// One chunk's contribution to a region read or write.
///
/// `chunk_region` is relative to the chunk origin; `out_region` is
/// relative to the requested region's start. Both describe the same box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialChunk {
    pub chunk_coord: GridCoord,
    pub chunk_region: PixelRegion,
    pub out_region: PixelRegion,
}

/// Enumerate the chunks intersecting `region` and the sub-box each
/// contributes. `region` must already be validated against the array.
pub(crate) fn chunks_in_region(region: &PixelRegion, chunk_shape: &[u64]) -> Vec<PartialChunk> {
    let first: GridCoord = region
        .start
        .iter()
        .zip(chunk_shape.iter())
        .map(|(s, c)| s / c)
        .collect();
    let last_exclusive: GridCoord = region
        .end
        .iter()
        .zip(chunk_shape.iter())
        .map(|(e, c)| (e - 1) / c + 1)
        .collect();

    first
        .iter()
        .zip(last_exclusive.iter())
        .map(|(f, l)| *f..*l)
        .multi_cartesian_product()
        .map(|coord| {
            let coord: GridCoord = coord.into_iter().collect();
            let mut chunk_start = GridCoord::with_capacity(coord.len());
            let mut chunk_end = GridCoord::with_capacity(coord.len());
            let mut out_start = GridCoord::with_capacity(coord.len());
            let mut out_end = GridCoord::with_capacity(coord.len());
            for (d, c) in coord.iter().enumerate() {
                let origin = c * chunk_shape[d];
                let isect_start = region.start[d].max(origin);
                let isect_end = region.end[d].min(origin + chunk_shape[d]);
                chunk_start.push(isect_start - origin);
                chunk_end.push(isect_end - origin);
                out_start.push(isect_start - region.start[d]);
                out_end.push(isect_end - region.start[d]);
            }
            PartialChunk {
                chunk_coord: coord,
                chunk_region: PixelRegion::new(chunk_start, chunk_end),
                out_region: PixelRegion::new(out_start, out_end),
            }
        })
        .collect()
}

/// Shape of an edge chunk clipped to the array bounds.
pub(crate) fn truncated_chunk_shape(
    array_shape: &[u64],
    chunk_shape: &[u64],
    chunk_coord: &[u64],
) -> GridCoord {
    array_shape
        .iter()
        .zip(chunk_shape.iter())
        .zip(chunk_coord.iter())
        .map(|((sh, ch), co)| (*sh - co * ch).min(*ch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn validate_bounds() {
        let shape = [4u64, 4];
        assert!(PixelRegion::new([0u64, 0], [4u64, 4]).validate(&shape).is_ok());
        assert!(PixelRegion::new([1u64, 1], [3u64, 3]).validate(&shape).is_ok());
        assert!(PixelRegion::new([0u64, 0], [5u64, 4]).validate(&shape).is_err());
        assert!(PixelRegion::new([2u64, 0], [2u64, 4]).validate(&shape).is_err());
        assert!(PixelRegion::new([0u64], [4u64]).validate(&shape).is_err());
    }

    #[test]
    fn chunk_enumeration() {
        let region = PixelRegion::new([1u64, 1], [3u64, 3]);
        let pcs = chunks_in_region(&region, &[2, 2]);
        assert_eq!(pcs.len(), 4);
        let corner = &pcs[0];
        assert_eq!(corner.chunk_coord.as_slice(), &[0, 0]);
        assert_eq!(corner.chunk_region, PixelRegion::new([1u64, 1], [2u64, 2]));
        assert_eq!(corner.out_region, PixelRegion::new([0u64, 0], [1u64, 1]));
    }

    #[test]
    fn chunk_aligned_region_touches_each_chunk_once() {
        let region = PixelRegion::new([0u64, 0], [4u64, 4]);
        let pcs = chunks_in_region(&region, &[2, 2]);
        assert_eq!(pcs.len(), 4);
        for pc in &pcs {
            assert_eq!(pc.chunk_region.shape().as_slice(), &[2, 2]);
            assert_eq!(pc.chunk_region.start.as_slice(), &[0, 0]);
        }
    }

    #[test]
    fn truncated_shapes() {
        let t = truncated_chunk_shape(&[3, 3], &[2, 2], &[1, 1]);
        let expected: GridCoord = smallvec![1, 1];
        assert_eq!(t, expected);
        let t = truncated_chunk_shape(&[3, 3], &[2, 2], &[0, 0]);
        let expected: GridCoord = smallvec![2, 2];
        assert_eq!(t, expected);
        let t = truncated_chunk_shape(&[4, 3], &[2, 2], &[1, 1]);
        let expected: GridCoord = smallvec![2, 1];
        assert_eq!(t, expected);
    }
}
