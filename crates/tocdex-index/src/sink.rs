use crate::error::StoreError;
use crate::record::{IndexRecord, page_prefix};

/// Destination for the records of a page scan.
///
/// A scan calls [`IndexSink::clear_page`] once before its first insert, so
/// scanning a page again replaces its records instead of duplicating them.
pub trait IndexSink {
    /// Remove every record previously stored for `page_path`.
    /// Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot delete the records.
    fn clear_page(&mut self, page_path: &str) -> Result<usize, StoreError>;

    /// Store one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn insert(&mut self, record: &IndexRecord) -> Result<(), StoreError>;
}

/// An [`IndexSink`] that keeps records in memory, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryIndex {
    records: Vec<IndexRecord>,
}

impl MemoryIndex {
    /// Create an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[IndexRecord] {
        &self.records
    }

    /// Take the records out.
    #[must_use]
    pub fn into_records(self) -> Vec<IndexRecord> {
        self.records
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IndexSink for MemoryIndex {
    fn clear_page(&mut self, page_path: &str) -> Result<usize, StoreError> {
        let prefix = page_prefix(page_path);
        let before = self.records.len();
        self.records.retain(|record| !record.path.starts_with(&prefix));
        Ok(before - self.records.len())
    }

    fn insert(&mut self, record: &IndexRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Receives the `href` of each stylesheet link the scanner passes.
pub trait StylesheetHandler {
    /// Called once per `<link rel="stylesheet" href=...>` start tag, in
    /// document order.
    fn stylesheet(&mut self, href: &str);
}

/// Ignores stylesheets.
impl StylesheetHandler for () {
    fn stylesheet(&mut self, _href: &str) {}
}

/// Collects stylesheet hrefs.
impl StylesheetHandler for Vec<String> {
    fn stylesheet(&mut self, href: &str) {
        self.push(href.to_string());
    }
}
