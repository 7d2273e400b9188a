use std::{
    fs::{self, File},
    io::{ErrorKind, Read, Write},
    path::PathBuf,
};

use bytes::Bytes;
use fs4::FileExt;
use log::warn;
use walkdir::WalkDir;

use crate::error::{Error, Result};

use super::Store;

/// Store rooted at a local directory. Keys map to file paths below it.
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    /// Does not check or modify the path.
    pub fn new_unchecked(path: PathBuf) -> Self {
        Self { base_path: path }
    }

    /// Canonicalizes the path and checks that it is an extant directory.
    pub fn open(path: PathBuf) -> Result<Self> {
        let base_path = path.canonicalize()?;
        if base_path.is_file() {
            Err(Error::store("path exists, but it is a file"))
        } else {
            Ok(Self { base_path })
        }
    }

    /// Creates the directory (and optionally its parents), which must not exist.
    pub fn create(path: PathBuf, parents: bool) -> Result<Self> {
        if path.exists() {
            return Err(Error::store("path already exists"));
        }
        if parents {
            fs::create_dir_all(&path)?;
        } else {
            fs::create_dir(&path)?;
        }
        Ok(Self {
            base_path: path.canonicalize()?,
        })
    }

    /// Opens the directory, creating it if absent.
    pub fn open_or_create(path: PathBuf, parents: bool) -> Result<Self> {
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path, parents)
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let mut p = self.base_path.clone();
        for segment in key.split('/') {
            p.push(segment);
        }
        p
    }
}

impl Store for FileSystemStore {
    fn read(&self, key: &str) -> Result<Option<Bytes>> {
        let mut f = match File::open(self.key_path(key)) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        f.lock_shared()?;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)?;
        Ok(Some(buf.into()))
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.key_path(key).is_file())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.key_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut f = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)?;
        f.lock_exclusive()?;
        f.write_all(value)?;
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let root = self.key_path(prefix);
        if !root.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(Error::store)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&self.base_path)
                .map_err(Error::store)?;
            let mut segments = Vec::new();
            let mut skip = false;
            for component in rel.components() {
                match component.as_os_str().to_str() {
                    Some(s) => segments.push(s.to_string()),
                    None => {
                        warn!("skipping key with non-UTF8 name: {:?}", rel);
                        skip = true;
                        break;
                    }
                }
            }
            if !skip {
                keys.push(segments.join("/"));
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn roundtrip_and_listing() {
        let tmp = TempDir::new("omezarr-fs").unwrap();
        let store = FileSystemStore::create(tmp.path().join("root.zarr"), false).unwrap();

        store.write("zarr.json", b"{}").unwrap();
        store.write("0/c/0/0", b"\x01\x02\x03").unwrap();

        assert_eq!(&store.read("0/c/0/0").unwrap().unwrap()[..], b"\x01\x02\x03");
        assert!(store.read("0/c/0/1").unwrap().is_none());
        assert!(store.exists("zarr.json").unwrap());

        assert_eq!(store.list("").unwrap(), vec!["0/c/0/0", "zarr.json"]);
        assert_eq!(store.list("0").unwrap(), vec!["0/c/0/0"]);
        assert_eq!(store.list("missing").unwrap(), Vec::<String>::new());

        store.delete("0/c/0/0").unwrap();
        store.delete("0/c/0/0").unwrap();
        assert!(!store.exists("0/c/0/0").unwrap());
    }

    #[test]
    fn open_requires_directory() {
        let tmp = TempDir::new("omezarr-fs").unwrap();
        let file = tmp.path().join("plain");
        std::fs::write(&file, b"x").unwrap();
        assert!(FileSystemStore::open(file).is_err());
        assert!(FileSystemStore::open(tmp.path().join("nope")).is_err());
        assert!(FileSystemStore::open_or_create(tmp.path().join("made"), false).is_ok());
    }
}
