use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::Result;

use super::{join_key, Store};

/// Map-backed store, mostly for tests and scratch writers.
#[derive(Default)]
pub struct MemoryStore {
    map: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.map.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.map.read().get(key).cloned())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.map.read().contains_key(key))
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        self.map
            .write()
            .insert(key.to_string(), Bytes::copy_from_slice(value));
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let dir = join_key(prefix, "");
        let map = self.map.read();
        let mut keys: Vec<_> = map
            .keys()
            .filter(|k| prefix.is_empty() || *k == &dir || k.starts_with(&format!("{dir}/")))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.map.write().remove(key);
        Ok(())
    }
}
