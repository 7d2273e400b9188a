//! Row-contiguous copies between C-order byte buffers.
//!
//! Both the read path (chunk -> output) and the write path
//! (source -> chunk) go through [`copy_region`]. The innermost axis is
//! moved as one bulk copy per row; outer axes are walked with a reused
//! coordinate array.

use smallvec::smallvec;

use crate::{CoordVec, GridCoord};

/// C-order element strides: `stride[N-1] = 1`,
/// `stride[d] = stride[d+1] * shape[d+1]`.
pub(crate) fn c_strides(shape: &[u64]) -> GridCoord {
    let mut strides: GridCoord = smallvec![1; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

/// Copy the box `box_shape` from `src` (shape `src_shape`, box origin
/// `src_origin`) into `dst` (shape `dst_shape`, box origin `dst_origin`).
///
/// Shapes and origins are in elements; buffers are raw bytes with
/// `elem_size` bytes per element. All slices must share a rank and the
/// box must fit inside both buffers; rank 1 degenerates to a single
/// bulk copy.
pub(crate) fn copy_region(
    src: &[u8],
    src_shape: &[u64],
    src_origin: &[u64],
    dst: &mut [u8],
    dst_shape: &[u64],
    dst_origin: &[u64],
    box_shape: &[u64],
    elem_size: usize,
) {
    let n = box_shape.len();
    debug_assert!(n > 0);
    debug_assert_eq!(src_shape.len(), n);
    debug_assert_eq!(dst_shape.len(), n);

    let src_strides = c_strides(src_shape);
    let dst_strides = c_strides(dst_shape);

    let row_bytes = box_shape[n - 1] as usize * elem_size;
    let outer_rows: u64 = box_shape[..n - 1].iter().product();
    let mut coord: CoordVec<u64> = smallvec![0; n - 1];

    for _ in 0..outer_rows {
        let mut src_el = src_origin[n - 1];
        let mut dst_el = dst_origin[n - 1];
        for d in 0..n - 1 {
            src_el += (src_origin[d] + coord[d]) * src_strides[d];
            dst_el += (dst_origin[d] + coord[d]) * dst_strides[d];
        }
        let s = src_el as usize * elem_size;
        let t = dst_el as usize * elem_size;
        dst[t..t + row_bytes].copy_from_slice(&src[s..s + row_bytes]);

        for d in (0..n - 1).rev() {
            coord[d] += 1;
            if coord[d] < box_shape[d] {
                break;
            }
            coord[d] = 0;
        }
    }
}
