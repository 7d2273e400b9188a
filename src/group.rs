//! Group navigation: version detection, child discovery, and the v2
//! chunk-key separator probe.

use std::sync::Arc;

use log::debug;

use crate::array::Array;
use crate::error::{Error, Result};
use crate::metadata::{
    self, ArraySpec, GroupMeta, JsonObject, LayoutVersion, NodeMeta, Separator, V2_ARRAY_KEY,
    V2_ATTRS_KEY, V2_GROUP_KEY, V3_METADATA_KEY,
};
use crate::store::{join_key, Store};

/// An opened node: either an array or a group.
pub enum Node {
    Array(Array),
    Group(Group),
}

/// A group node: an attribute blob and children, no data of its own.
pub struct Group {
    store: Arc<dyn Store>,
    path: String,
    meta: GroupMeta,
}

/// Read a `.zattrs` sibling document, tolerating its absence.
fn read_v2_attributes(store: &dyn Store, path: &str) -> Result<JsonObject> {
    match store.read(&join_key(path, V2_ATTRS_KEY))? {
        Some(doc) => serde_json::from_slice(&doc).map_err(Error::metadata),
        None => Ok(JsonObject::new()),
    }
}

/// Decide the chunk-key separator of a v2 array that does not declare
/// one: if the all-zeros chunk exists under nested keys, use `/`,
/// otherwise fall back to `.`.
fn probe_separator(store: &dyn Store, path: &str, ndim: usize) -> Result<Separator> {
    let nested = vec!["0"; ndim].join("/");
    if store.exists(&join_key(path, &nested))? {
        debug!("separator probe at {path}: found {nested}, using `/`");
        Ok(Separator::Slash)
    } else {
        debug!("separator probe at {path}: no nested chunk, using `.`");
        Ok(Separator::Dot)
    }
}

/// Open the node at `path`, probing `zarr.json` first, then the v2
/// documents.
pub fn open_node(store: Arc<dyn Store>, path: &str) -> Result<Node> {
    if let Some(doc) = store.read(&join_key(path, V3_METADATA_KEY))? {
        return match metadata::parse_v3_node(&doc)? {
            NodeMeta::Array(meta) => Ok(Node::Array(Array::new(store, path.to_string(), meta))),
            NodeMeta::Group(meta) => Ok(Node::Group(Group {
                store,
                path: path.to_string(),
                meta,
            })),
        };
    }

    if let Some(doc) = store.read(&join_key(path, V2_ARRAY_KEY))? {
        let attributes = read_v2_attributes(store.as_ref(), path)?;
        let meta = metadata::parse_v2_array(&doc, attributes, |ndim| {
            probe_separator(store.as_ref(), path, ndim)
        })?;
        return Ok(Node::Array(Array::new(store, path.to_string(), meta)));
    }

    if let Some(doc) = store.read(&join_key(path, V2_GROUP_KEY))? {
        let attributes = read_v2_attributes(store.as_ref(), path)?;
        let meta = metadata::parse_v2_group(&doc, attributes)?;
        return Ok(Node::Group(Group {
            store,
            path: path.to_string(),
            meta,
        }));
    }

    Err(Error::NotFound(format!(
        "no array or group at `{path}`"
    )))
}

impl Group {
    /// Open the group at `path`, failing if the node is an array.
    pub fn open(store: Arc<dyn Store>, path: &str) -> Result<Self> {
        match open_node(store, path)? {
            Node::Group(g) => Ok(g),
            Node::Array(_) => Err(Error::NotFound(format!(
                "`{path}` is an array, not a group"
            ))),
        }
    }

    /// Write a new v3 group document at `path` and open it.
    pub fn create(store: Arc<dyn Store>, path: &str, attributes: JsonObject) -> Result<Self> {
        let doc = metadata::v3_group_document(&attributes)?;
        store.write(&join_key(path, V3_METADATA_KEY), &doc)?;
        Ok(Self {
            store,
            path: path.to_string(),
            meta: GroupMeta {
                layout: LayoutVersion::V3,
                attributes,
            },
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn layout(&self) -> LayoutVersion {
        self.meta.layout
    }

    pub fn attributes(&self) -> &JsonObject {
        &self.meta.attributes
    }

    pub(crate) fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    fn child_path(&self, relative: &str) -> String {
        join_key(&self.path, relative.trim_matches('/'))
    }

    /// Open a child (or deeper descendant) node by relative path.
    pub fn open_child(&self, relative: &str) -> Result<Node> {
        open_node(self.store.clone(), &self.child_path(relative))
    }

    pub fn open_array(&self, relative: &str) -> Result<Array> {
        match self.open_child(relative)? {
            Node::Array(a) => Ok(a),
            Node::Group(g) => Err(Error::NotFound(format!(
                "`{}` is a group, not an array",
                g.path
            ))),
        }
    }

    pub fn open_group(&self, relative: &str) -> Result<Group> {
        match self.open_child(relative)? {
            Node::Group(g) => Ok(g),
            Node::Array(a) => Err(Error::NotFound(format!(
                "`{}` is an array, not a group",
                a.path()
            ))),
        }
    }

    /// Whether a child node (any layout) exists at the relative path.
    pub fn has_child(&self, relative: &str) -> Result<bool> {
        let path = self.child_path(relative);
        Ok(self.store.exists(&join_key(&path, V3_METADATA_KEY))?
            || self.store.exists(&join_key(&path, V2_ARRAY_KEY))?
            || self.store.exists(&join_key(&path, V2_GROUP_KEY))?)
    }

    /// Names of direct children, via store listing. Fails with
    /// `NotSupported` on stores without directory enumeration.
    pub fn children(&self) -> Result<Vec<String>> {
        let keys = self.store.list(&self.path)?;
        let prefix = if self.path.is_empty() {
            String::new()
        } else {
            format!("{}/", self.path)
        };
        let mut names: Vec<String> = keys
            .iter()
            .filter_map(|k| {
                let rel = k.strip_prefix(prefix.as_str())?;
                let (first, rest) = rel.split_once('/')?;
                // a child is a directory holding at least one deeper key
                (!rest.is_empty()).then(|| first.to_string())
            })
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Write the metadata for a new v3 array below this group and open it.
    pub fn create_array(&self, relative: &str, spec: ArraySpec) -> Result<Array> {
        let meta = spec.to_meta()?;
        let path = self.child_path(relative);
        let doc = spec.to_document()?;
        self.store.write(&join_key(&path, V3_METADATA_KEY), &doc)?;
        Ok(Array::new(self.store.clone(), path, meta))
    }

    /// Create a child group with the given attributes.
    pub fn create_group(&self, relative: &str, attributes: JsonObject) -> Result<Group> {
        Group::create(self.store.clone(), &self.child_path(relative), attributes)
    }
}
