//! Reading metadata sources from disk or over HTTP.

use crate::error::{Error, Result};
use crate::metadata::{load_fragments, RawFragment};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;
use url::Url;

/// Fetched source text, keyed by location.
#[derive(Debug, Default)]
pub struct ContentCache {
    cache: HashMap<String, String>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, location: &str) -> Option<&String> {
        self.cache.get(location)
    }

    pub fn insert(&mut self, location: &str, content: String) {
        self.cache.insert(location.to_string(), content);
    }
}

/// Read a file path, `file:` URL or (with the `cli` feature) `http(s):` URL.
pub fn fetch_content(location: &str, cache: &mut ContentCache) -> Result<String> {
    if let Some(cached) = cache.get(location) {
        return Ok(cached.clone());
    }

    let content = match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => fetch_remote(&url)?,
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| Error::UnsupportedLocation(location.to_string()))?;
            read_file(path)?
        }
        // anything else, drive letters included, is a plain path
        _ => read_file(PathBuf::from(location))?,
    };

    cache.insert(location, content.clone());
    Ok(content)
}

fn read_file(path: PathBuf) -> Result<String> {
    fs::read_to_string(&path).map_err(|source| Error::Read { path, source })
}

#[cfg(feature = "cli")]
fn fetch_remote(url: &Url) -> Result<String> {
    use reqwest::blocking::Client;
    use std::time::Duration;

    let fetch_error = |message: String| Error::Fetch {
        url: url.to_string(),
        message,
    };
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| fetch_error(format!("client build error: {e}")))?;
    let response = client
        .get(url.as_str())
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_error(format!("HTTP request error: {e}")))?;
    response
        .text()
        .map_err(|e| fetch_error(format!("error reading response: {e}")))
}

#[cfg(not(feature = "cli"))]
fn fetch_remote(url: &Url) -> Result<String> {
    Err(Error::UnsupportedLocation(url.to_string()))
}

/// Fetch and parse every location. Unreadable or malformed sources are logged and skipped.
pub fn load_locations<S: AsRef<str>>(locations: &[S]) -> Vec<RawFragment> {
    let mut cache = ContentCache::new();
    let texts: Vec<(String, String)> = locations
        .iter()
        .filter_map(|location| {
            let location = location.as_ref();
            match fetch_content(location, &mut cache) {
                Ok(text) => Some((location.to_string(), text)),
                Err(e) => {
                    warn!("Skipping metadata source: {e}");
                    None
                }
            }
        })
        .collect();
    load_fragments(texts)
}
