//! Stylesheet mirroring.
//!
//! [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
//!
//! "The href attribute on link elements ... must contain a valid non-empty
//! URL potentially surrounded by spaces."
//!
//! Each stylesheet a page links to is downloaded and saved next to the page,
//! under the last segment of its URL, so the local copy renders offline.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tocdex_common::HttpClient;
use tocdex_common::url::{file_name, resolve_url};
use tocdex_index::StylesheetHandler;

use crate::error::PageError;

/// A [`StylesheetHandler`] that saves each stylesheet into a directory.
///
/// Failures are logged and otherwise ignored; they never affect the scan.
#[derive(Debug)]
pub struct StylesheetMirror<'a> {
    client: &'a HttpClient,
    page_url: &'a str,
    target_dir: &'a Path,
    seen: HashSet<String>,
    saved: Vec<PathBuf>,
}

impl<'a> StylesheetMirror<'a> {
    /// Mirror stylesheets linked from `page_url` into `target_dir`.
    #[must_use]
    pub fn new(client: &'a HttpClient, page_url: &'a str, target_dir: &'a Path) -> Self {
        Self {
            client,
            page_url,
            target_dir,
            seen: HashSet::new(),
            saved: Vec::new(),
        }
    }

    /// Files written so far.
    #[must_use]
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    fn mirror(&self, url: &str) -> Result<Option<PathBuf>, PageError> {
        let Some(name) = file_name(url) else {
            return Ok(None);
        };
        let body = self.client.get_bytes(url).map_err(PageError::Fetch)?;
        let path = self.target_dir.join(name);
        fs::write(&path, body).map_err(|source| PageError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(Some(path))
    }
}

impl StylesheetHandler for StylesheetMirror<'_> {
    fn stylesheet(&mut self, href: &str) {
        let href = href.trim();
        if href.is_empty() {
            return;
        }
        let url = resolve_url(href, Some(self.page_url));
        if !self.seen.insert(url.clone()) {
            return;
        }
        match self.mirror(&url) {
            Ok(Some(path)) => {
                log::info!("mirrored stylesheet {url} to {}", path.display());
                self.saved.push(path);
            }
            Ok(None) => log::warn!("stylesheet {url} has no file name, skipping"),
            Err(err) => log::warn!("could not mirror stylesheet {url}: {err}"),
        }
    }
}
