//! The chunked array engine: region reads and writes over a store.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use smallvec::smallvec;

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::metadata::{ArrayMeta, JsonObject};
use crate::ndcopy::copy_region;
use crate::region::{chunks_in_region, truncated_chunk_shape, PixelRegion};
use crate::store::Store;
use crate::{check_same_rank, GridCoord};

pub const DEFAULT_MAX_PARALLEL: usize = 16;

/// Cooperative cancellation handle, checked before every chunk fetch.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Knobs for a region read.
#[derive(Clone, Debug)]
pub struct ReadOptions {
    /// Upper bound on chunk fetches in flight at once. Clamped to at
    /// least 1.
    pub max_parallel: usize,
    pub cancel: Option<CancelToken>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_parallel: DEFAULT_MAX_PARALLEL,
            cancel: None,
        }
    }
}

/// Write to disjoint subsets of a slice from multiple threads without
/// locking. Each partial chunk of a region read owns a unique byte range
/// of the output buffer, so no two workers alias.
#[derive(Copy, Clone)]
struct UnsafeCellSlice<'a, T>(&'a [UnsafeCell<T>]);

unsafe impl<'a, T: Send + Sync> Send for UnsafeCellSlice<'a, T> {}
unsafe impl<'a, T: Send + Sync> Sync for UnsafeCellSlice<'a, T> {}

impl<'a, T: Copy> UnsafeCellSlice<'a, T> {
    fn new(slice: &'a mut [T]) -> Self {
        let ptr = slice as *mut [T] as *const [UnsafeCell<T>];
        Self(unsafe { &*ptr })
    }

    #[allow(clippy::mut_from_ref)]
    unsafe fn get(&self) -> &mut [T] {
        let ptr = self.0[0].get();
        std::slice::from_raw_parts_mut(ptr, self.0.len())
    }
}

/// An opened array: a store handle, a path below the store root, and the
/// resolved metadata. Read-only after construction and safe to share
/// across concurrent region reads.
pub struct Array {
    store: Arc<dyn Store>,
    path: String,
    meta: ArrayMeta,
}

impl Array {
    pub(crate) fn new(store: Arc<dyn Store>, path: String, meta: ArrayMeta) -> Self {
        Self { store, path, meta }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn shape(&self) -> &[u64] {
        &self.meta.shape
    }

    pub fn chunk_shape(&self) -> &[u64] {
        &self.meta.chunk_shape
    }

    pub fn ndim(&self) -> usize {
        self.meta.ndim()
    }

    pub fn data_type(&self) -> DataType {
        self.meta.data_type
    }

    pub fn attributes(&self) -> &JsonObject {
        &self.meta.attributes
    }

    pub fn meta(&self) -> &ArrayMeta {
        &self.meta
    }

    /// Store key of the chunk at `coord`.
    pub fn chunk_key(&self, coord: &[u64]) -> String {
        self.meta.key_encoding.chunk_key(&self.path, coord)
    }

    fn check_chunk_coord(&self, coord: &[u64]) -> Result<()> {
        check_same_rank("chunk coordinate", coord.len(), self.ndim())?;
        for (d, (c, (sh, ch))) in coord
            .iter()
            .zip(self.meta.shape.iter().zip(self.meta.chunk_shape.iter()))
            .enumerate()
        {
            if c * ch >= *sh {
                return Err(Error::InvalidRegion(format!(
                    "chunk coordinate {c} out of bounds on axis {d}"
                )));
            }
        }
        Ok(())
    }

    /// Fetch and decode one chunk, always returning the full chunk shape:
    /// absent chunks come back zero-filled, truncated edge chunks are
    /// expanded to full shape with zero padding.
    pub fn read_chunk(&self, coord: &[u64]) -> Result<Vec<u8>> {
        self.check_chunk_coord(coord)?;
        let key = self.chunk_key(coord);
        let full_len = self.meta.full_chunk_bytes();

        let Some(encoded) = self.store.read(&key)? else {
            debug!("chunk {key} absent; filling with zeros");
            return Ok(vec![0; full_len]);
        };
        let decoded = self.meta.chain.decode(&encoded)?;
        if decoded.len() == full_len {
            return Ok(decoded);
        }

        let truncated = truncated_chunk_shape(&self.meta.shape, &self.meta.chunk_shape, coord);
        let truncated_len =
            truncated.iter().product::<u64>() as usize * self.meta.element_size();
        if decoded.len() != truncated_len {
            return Err(Error::ChunkCorrupt(format!(
                "chunk {key} decoded to {} bytes; expected {full_len} (full) or {truncated_len} (truncated)",
                decoded.len()
            )));
        }

        // Rows of the truncated buffer are narrower than full chunk rows
        // whenever a non-final axis is clipped, so this must be a strided
        // copy, not a flat one.
        let origin: GridCoord = smallvec![0; self.ndim()];
        let mut full = vec![0; full_len];
        copy_region(
            &decoded,
            &truncated,
            &origin,
            &mut full,
            &self.meta.chunk_shape,
            &origin,
            &truncated,
            self.meta.element_size(),
        );
        Ok(full)
    }

    /// Read the half-open `region` into a new C-order buffer of
    /// `region elements x element size` bytes.
    pub fn read_region(&self, region: &PixelRegion) -> Result<Vec<u8>> {
        self.read_region_opt(region, &ReadOptions::default())
    }

    /// Explicit-options version of [`read_region`](Array::read_region).
    ///
    /// Chunk fetches run concurrently, bounded by
    /// `options.max_parallel`; each decoded chunk scatters into a
    /// disjoint range of the output, so the workers never contend.
    pub fn read_region_opt(&self, region: &PixelRegion, options: &ReadOptions) -> Result<Vec<u8>> {
        region.validate(&self.meta.shape)?;
        let element_size = self.meta.element_size();
        let region_shape = region.shape();
        let out_len = region.num_elements() as usize * element_size;

        let partials = chunks_in_region(region, &self.meta.chunk_shape);
        let max_parallel = options.max_parallel.max(1);
        debug!(
            "reading {} chunk(s) of {} with at most {max_parallel} in flight",
            partials.len(),
            self.path
        );

        let mut out = vec![0u8; out_len];
        {
            let out_slice = UnsafeCellSlice::new(&mut out);
            partials
                .into_par_iter()
                .by_uniform_blocks(max_parallel)
                .try_for_each(|pc| {
                    if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                        return Err(Error::Cancelled);
                    }
                    let chunk = self.read_chunk(&pc.chunk_coord)?;
                    let out = unsafe { out_slice.get() };
                    copy_region(
                        &chunk,
                        &self.meta.chunk_shape,
                        &pc.chunk_region.start,
                        out,
                        &region_shape,
                        &pc.out_region.start,
                        &pc.chunk_region.shape(),
                        element_size,
                    );
                    Ok(())
                })?;
        }
        Ok(out)
    }

    /// Write `data` (C-order, matching the region's byte size) into the
    /// half-open `region`, reading and rewriting any partially covered
    /// chunk. Chunks are written sequentially; edge chunks are stored
    /// padded to the full chunk shape.
    pub fn write_region(&self, region: &PixelRegion, data: &[u8]) -> Result<()> {
        region.validate(&self.meta.shape)?;
        let element_size = self.meta.element_size();
        let expected = region.num_elements() as usize * element_size;
        if data.len() != expected {
            return Err(Error::InvalidRegion(format!(
                "buffer holds {} bytes but the region needs {expected}",
                data.len()
            )));
        }

        let region_shape = region.shape();
        let full_len = self.meta.full_chunk_bytes();
        for pc in chunks_in_region(region, &self.meta.chunk_shape) {
            let covers_whole = pc.chunk_region.start.iter().all(|s| *s == 0)
                && pc
                    .chunk_region
                    .end
                    .iter()
                    .zip(self.meta.chunk_shape.iter())
                    .all(|(e, c)| e == c);
            let mut chunk = if covers_whole {
                vec![0; full_len]
            } else {
                self.read_chunk(&pc.chunk_coord)?
            };
            copy_region(
                data,
                &region_shape,
                &pc.out_region.start,
                &mut chunk,
                &self.meta.chunk_shape,
                &pc.chunk_region.start,
                &pc.chunk_region.shape(),
                element_size,
            );
            let encoded = self.meta.chain.encode(chunk)?;
            self.store.write(&self.chunk_key(&pc.chunk_coord), &encoded)?;
        }
        Ok(())
    }
}
