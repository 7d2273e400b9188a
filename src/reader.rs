//! The entry point: turn a locator into a store, open the root node,
//! and classify it.

use std::path::PathBuf;
use std::sync::Arc;

use crate::array::Array;
use crate::error::{Error, Result};
use crate::group::{open_node, Node};
use crate::ome::NodeKind;
use crate::store::Store;

#[derive(Debug, PartialEq, Eq)]
enum Locator {
    Path(PathBuf),
    Http(String),
}

fn parse_locator(locator: &str) -> Locator {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        Locator::Http(locator.to_string())
    } else if let Some(rest) = locator.strip_prefix("file://") {
        Locator::Path(PathBuf::from(rest))
    } else {
        Locator::Path(PathBuf::from(locator))
    }
}

/// Construct the store a locator points at: bare paths and `file://`
/// URLs become filesystem stores, `http(s)://` URLs become HTTP stores.
pub fn open_store(locator: &str) -> Result<Arc<dyn Store>> {
    match parse_locator(locator) {
        #[cfg(feature = "http")]
        Locator::Http(url) => Ok(Arc::new(crate::store::HttpStore::new(url)?)),
        #[cfg(not(feature = "http"))]
        Locator::Http(_) => Err(Error::Unsupported(
            "http stores (the `http` feature is disabled)".to_string(),
        )),
        #[cfg(feature = "filesystem")]
        Locator::Path(path) => Ok(Arc::new(crate::store::FileSystemStore::open(path)?)),
        #[cfg(not(feature = "filesystem"))]
        Locator::Path(_) => Err(Error::Unsupported(
            "filesystem stores (the `filesystem` feature is disabled)".to_string(),
        )),
    }
}

/// Open a locator and classify its root group as a typed node.
pub fn open(locator: &str) -> Result<NodeKind> {
    let store = open_store(locator)?;
    match open_node(store, "")? {
        Node::Group(group) => NodeKind::classify(group),
        Node::Array(_) => Err(Error::MetadataInvalid(format!(
            "root of `{locator}` is a bare array; use open_array"
        ))),
    }
}

/// Open a locator whose root is a bare array rather than a group.
pub fn open_array(locator: &str) -> Result<Array> {
    let store = open_store(locator)?;
    match open_node(store, "")? {
        Node::Array(array) => Ok(array),
        Node::Group(_) => Err(Error::NotFound(format!(
            "root of `{locator}` is a group, not an array"
        ))),
    }
}
