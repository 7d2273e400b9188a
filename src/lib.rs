//! Reader (and limited writer) for chunked, compressed N-dimensional
//! arrays stored under the v2 and v3 layouts, plus the OME-NGFF overlay
//! that describes such arrays as multiscale images, label masks, or
//! high-content-screening plates.
//!
//! The typical flow: [`open`] a locator (path, `file://` or `http(s)://`),
//! get back a typed [`NodeKind`], navigate to a resolution level, and read
//! rectangular sub-regions in either array-index or physical coordinates.
//! Region reads return contiguous C-order byte buffers in the array's
//! native element type.

use smallvec::SmallVec;

pub mod array;
pub mod codecs;
pub mod coords;
pub mod data_type;
mod error;
pub mod group;
pub mod metadata;
mod ndcopy;
pub mod ome;
pub mod reader;
pub mod region;
pub mod store;

pub use array::{Array, CancelToken, ReadOptions};
pub use coords::{CoordinateMapping, CoordinateTransform};
pub use data_type::DataType;
pub use error::{Error, Result};
pub use group::Group;
pub use metadata::{ArrayMeta, ArraySpec};
pub use ome::NodeKind;
pub use reader::{open, open_array};
pub use region::{PhysicalRegion, PixelRegion};
pub use store::Store;

const COORD_SMALLVEC_SIZE: usize = 6;

/// Per-axis coordinate storage, inline up to rank 6.
pub type CoordVec<T> = SmallVec<[T; COORD_SMALLVEC_SIZE]>;
/// Element or chunk coordinates / shapes.
pub type GridCoord = CoordVec<u64>;

/// Check two per-axis quantities agree on rank.
pub(crate) fn check_same_rank(what: &str, a: usize, b: usize) -> Result<()> {
    if a == b {
        Ok(())
    } else {
        Err(Error::InvalidRegion(format!(
            "{what}: rank {a} does not match rank {b}"
        )))
    }
}
