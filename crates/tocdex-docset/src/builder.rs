//! The per-page pipeline.
//!
//! For each configured page, in order:
//!
//! 1. `GET` the page from the versioned base URL
//! 2. `POST` it to the normalizer, when one is configured
//! 3. write the result into the docset's documents directory
//! 4. scan the local copy into the index, mirroring stylesheets on the way
//!
//! A page that fails at any step is logged and skipped. Only problems with
//! the configuration, the docset directory or the index database stop the
//! run.

use std::fs;
use std::path::Path;

use tocdex_common::HttpClient;
use tocdex_common::warning::clear_warnings;
use tocdex_html::HtmlTokenizer;
use tocdex_index::{
    IndexSink, MemoryIndex, PageScanner, ScanReport, SqliteIndex, StylesheetHandler,
};

use crate::config::{DocsetConfig, PageDescriptor};
use crate::error::{BuildError, PageError};
use crate::layout::DocsetLayout;
use crate::mirror::StylesheetMirror;

/// Where page markup comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// Download (and normalize) every page.
    Remote,
    /// Re-scan the copies already in the documents directory. No network.
    LocalCopy,
}

/// What happened to one page.
#[derive(Debug)]
pub struct PageOutcome {
    /// The page.
    pub page: PageDescriptor,
    /// Its scan, or why there was none.
    pub result: Result<ScanReport, PageError>,
}

/// Outcome of a run, one entry per configured page.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Pages in processing order.
    pub pages: Vec<PageOutcome>,
}

impl RunReport {
    /// Scans that ran, malformed ones included.
    pub fn scans(&self) -> impl Iterator<Item = &ScanReport> {
        self.pages.iter().filter_map(|outcome| outcome.result.as_ref().ok())
    }

    /// Pages skipped because of an error.
    pub fn failures(&self) -> impl Iterator<Item = (&PageDescriptor, &PageError)> {
        self.pages
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (&outcome.page, err)))
    }

    /// Records stored across all pages.
    #[must_use]
    pub fn records_emitted(&self) -> usize {
        self.scans().map(|scan| scan.records_emitted).sum()
    }

    /// Links seen but not stored across all pages.
    #[must_use]
    pub fn records_dropped(&self) -> usize {
        self.scans().map(|scan| scan.records_dropped).sum()
    }

    /// Whether every page was scanned to a clean end.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.pages.iter().all(|outcome| {
            outcome
                .result
                .as_ref()
                .is_ok_and(|scan| scan.toc_found && !scan.is_malformed())
        })
    }
}

/// Builds one docset from its configuration.
#[derive(Debug, Clone)]
pub struct DocsetBuilder {
    config: DocsetConfig,
    layout: DocsetLayout,
    scanner: PageScanner,
}

impl DocsetBuilder {
    /// A builder for `config`, writing to `config.output`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Config`] if the configuration is invalid.
    pub fn new(config: DocsetConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let layout = DocsetLayout::new(&config.output);
        let scanner = PageScanner::new(config.marker.clone());
        Ok(Self {
            config,
            layout,
            scanner,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &DocsetConfig {
        &self.config
    }

    /// The docset being written.
    #[must_use]
    pub const fn layout(&self) -> &DocsetLayout {
        &self.layout
    }

    /// Run every page into the docset's SQLite index.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the docset directory or index database
    /// cannot be set up, or the HTTP client cannot be created. Page failures
    /// are reported in the [`RunReport`] instead.
    pub fn build(&self, source: PageSource) -> Result<RunReport, BuildError> {
        self.layout.create(&self.config)?;
        let mut index = SqliteIndex::open(self.layout.index_path(), self.config.lock_retry)?;
        let client = self.client(source)?;

        let mut report = RunReport::default();
        for page in &self.config.pages {
            let result = match &client {
                Some(client) => self.fetch_and_scan(client, page, &mut index),
                None => self.rescan(page, &mut index, &mut ()),
            };
            report.pages.push(page_outcome(page, result));
        }
        Ok(report)
    }

    /// Run every page into memory without writing anything.
    ///
    /// Remote pages are fetched and normalized but not saved, and their
    /// stylesheets are not mirrored.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Http`] if the HTTP client cannot be created.
    pub fn dry_run(&self, source: PageSource) -> Result<(RunReport, MemoryIndex), BuildError> {
        let client = self.client(source)?;
        let mut index = MemoryIndex::new();

        let mut report = RunReport::default();
        for page in &self.config.pages {
            let mut stylesheets: Vec<String> = Vec::new();
            let result = match &client {
                Some(client) => self.fetch_markup(client, page).and_then(|markup| {
                    let tokens = HtmlTokenizer::new(String::from_utf8_lossy(&markup).into_owned());
                    self.scanner
                        .scan(&page.path, tokens, &mut index, &mut stylesheets)
                        .map_err(PageError::from)
                }),
                None => self.rescan(page, &mut index, &mut stylesheets),
            };
            for href in &stylesheets {
                log::info!("{} links stylesheet {href}", page.path);
            }
            report.pages.push(page_outcome(page, result));
        }
        Ok((report, index))
    }

    fn client(&self, source: PageSource) -> Result<Option<HttpClient>, BuildError> {
        match source {
            PageSource::Remote => Ok(Some(HttpClient::with_timeout(self.config.timeout())?)),
            PageSource::LocalCopy => Ok(None),
        }
    }

    fn fetch_and_scan<S: IndexSink + ?Sized>(
        &self,
        client: &HttpClient,
        page: &PageDescriptor,
        sink: &mut S,
    ) -> Result<ScanReport, PageError> {
        let markup = self.fetch_markup(client, page)?;
        let local = self.layout.document_path(&page.path);
        write_document(&local, &markup)?;

        let page_url = self.config.page_url(page);
        let documents = self.layout.documents_dir();
        let mut mirror = StylesheetMirror::new(client, &page_url, &documents);
        let report = self.scanner.scan_file(&page.path, &local, sink, &mut mirror)?;
        log::debug!(
            "{} stylesheet(s) mirrored for {}",
            mirror.saved().len(),
            page.path
        );
        Ok(report)
    }

    /// Download a page and pass it through the normalizer.
    fn fetch_markup(
        &self,
        client: &HttpClient,
        page: &PageDescriptor,
    ) -> Result<Vec<u8>, PageError> {
        let url = self.config.page_url(page);
        let raw = client.get_bytes(&url).map_err(PageError::Fetch)?;
        match self.config.normalizer() {
            Some(normalizer) => client
                .post_html(normalizer, raw)
                .map_err(PageError::Normalize),
            None => Ok(raw),
        }
    }

    fn rescan<S, H>(
        &self,
        page: &PageDescriptor,
        sink: &mut S,
        stylesheets: &mut H,
    ) -> Result<ScanReport, PageError>
    where
        S: IndexSink + ?Sized,
        H: StylesheetHandler + ?Sized,
    {
        let local = self.layout.document_path(&page.path);
        self.scanner
            .scan_file(&page.path, &local, sink, stylesheets)
            .map_err(PageError::from)
    }
}

fn page_outcome(page: &PageDescriptor, result: Result<ScanReport, PageError>) -> PageOutcome {
    match &result {
        Ok(scan) => log::info!(
            "{} ({}): {} record(s), {} dropped, {}",
            page.path,
            page.role,
            scan.records_emitted,
            scan.records_dropped,
            scan.termination
        ),
        Err(err) => log::error!("skipping {} ({}): {err}", page.path, page.role),
    }
    // Tokenizer warnings are deduplicated per page.
    clear_warnings();
    PageOutcome {
        page: page.clone(),
        result,
    }
}

fn write_document(path: &Path, markup: &[u8]) -> Result<(), PageError> {
    let write_error = |source| PageError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, markup).map_err(write_error)?;
    log::debug!("wrote {} ({} bytes)", path.display(), markup.len());
    Ok(())
}
