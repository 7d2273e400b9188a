use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use log::debug;
use parking_lot::RwLock;
use reqwest::{
    blocking::{Client, Response},
    IntoUrl, StatusCode, Url,
};

use crate::error::{Error, Result};

use super::{is_metadata_key, Store};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Read-only store over HTTP(S).
///
/// Small metadata documents are cached so that node discovery does not
/// re-fetch them; chunk payloads are never cached. The cache is a
/// concurrent map, safe for use from parallel region reads.
pub struct HttpStore {
    client: Client,
    base_url: Url,
    metadata_cache: RwLock<HashMap<String, Bytes>>,
}

impl HttpStore {
    pub fn new<U: IntoUrl>(base_url: U) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::store)?;
        Self::with_client(client, base_url)
    }

    /// `client` should be constructed with any required headers or auth.
    pub fn with_client<U: IntoUrl>(client: Client, base_url: U) -> Result<Self> {
        Ok(Self {
            client,
            base_url: base_url.into_url().map_err(Error::store)?,
            metadata_cache: RwLock::new(HashMap::new()),
        })
    }

    /// Append the key's segments to the base URL, percent-encoding each.
    fn url_for(&self, key: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::store("base URL cannot carry a path"))?;
            segments.pop_if_empty();
            for segment in key.split('/') {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    fn dispatch(&self, response: reqwest::Result<Response>) -> Result<Option<Response>> {
        let response = response.map_err(Error::store)?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(response)),
            s => Err(Error::StoreFailure(format!(
                "{} returned status {s}",
                response.url()
            ))),
        }
    }
}

impl Store for HttpStore {
    fn read(&self, key: &str) -> Result<Option<Bytes>> {
        let cacheable = is_metadata_key(key);
        if cacheable {
            if let Some(cached) = self.metadata_cache.read().get(key) {
                return Ok(Some(cached.clone()));
            }
        }

        let url = self.url_for(key)?;
        debug!("GET {url}");
        let Some(response) = self.dispatch(self.client.get(url).send())? else {
            return Ok(None);
        };
        let body = response.bytes().map_err(Error::store)?;
        if cacheable {
            self.metadata_cache
                .write()
                .insert(key.to_string(), body.clone());
        }
        Ok(Some(body))
    }

    fn exists(&self, key: &str) -> Result<bool> {
        if is_metadata_key(key) && self.metadata_cache.read().contains_key(key) {
            return Ok(true);
        }
        let url = self.url_for(key)?;
        debug!("HEAD {url}");
        Ok(self.dispatch(self.client.head(url).send())?.is_some())
    }
}
