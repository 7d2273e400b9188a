use bytes::Bytes;

use crate::error::{Error, Result};

#[cfg(feature = "filesystem")]
pub mod filesystem;
#[cfg(feature = "http")]
pub mod http;
pub mod memory;

#[cfg(feature = "filesystem")]
pub use filesystem::FileSystemStore;
#[cfg(feature = "http")]
pub use http::HttpStore;
pub use memory::MemoryStore;

/// Abstract byte-addressable map keyed by non-empty `/`-separated paths.
///
/// `read` returning `Ok(None)` means the key is absent: a successful
/// negative result, distinct from a transport failure. The array engine
/// relies on that distinction for fill-value semantics.
///
/// Read-only backends leave the mutating operations (and listing, where
/// the backend has no directory enumeration) at their `NotSupported`
/// defaults. Implementations own their connection pools and caches and
/// must be safe for concurrent use.
pub trait Store: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Bytes>>;

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.read(key)?.is_some())
    }

    fn write(&self, _key: &str, _value: &[u8]) -> Result<()> {
        Err(Error::NotSupported("write"))
    }

    /// All keys under `prefix` (`""` for the whole store).
    fn list(&self, _prefix: &str) -> Result<Vec<String>> {
        Err(Error::NotSupported("list"))
    }

    fn delete(&self, _key: &str) -> Result<()> {
        Err(Error::NotSupported("delete"))
    }
}

/// Join a (possibly empty) key prefix and a relative path.
pub(crate) fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Metadata documents are the only small blobs worth caching; they are
/// recognized by their fixed file names.
pub(crate) fn is_metadata_key(key: &str) -> bool {
    let name = key.rsplit('/').next().unwrap_or(key);
    matches!(name, "zarr.json" | ".zarray" | ".zgroup" | ".zattrs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joining() {
        assert_eq!(join_key("", "zarr.json"), "zarr.json");
        assert_eq!(join_key("a/b", "c"), "a/b/c");
        assert_eq!(join_key("a", ""), "a");
    }

    #[test]
    fn metadata_recognition() {
        assert!(is_metadata_key("zarr.json"));
        assert!(is_metadata_key("plate/A/1/.zattrs"));
        assert!(is_metadata_key("deep/path/.zarray"));
        assert!(!is_metadata_key("0/c/0/0"));
        assert!(!is_metadata_key("0.0.0"));
    }
}
