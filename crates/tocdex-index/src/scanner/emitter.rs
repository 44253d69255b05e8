//! Turning TOC links into stored records.
//!
//! A link is recorded in two steps: its start tag opens a [`PendingLink`],
//! and the token right after it must be text, which supplies the name.

use crate::error::StoreError;
use crate::record::{EntryKind, IndexRecord};
use crate::sink::IndexSink;

/// A link whose start tag has been seen but whose name has not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    /// Link target as written in the page.
    pub href: String,
    /// Kind from the list level at the link's start tag.
    pub kind: EntryKind,
}

/// Name for a link from the text token that follows it: whitespace runs
/// collapsed to one space and trimmed. `None` if nothing is left.
#[must_use]
pub fn link_name(text: &str) -> Option<String> {
    let name = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() { None } else { Some(name) }
}

/// Writes one page's records to a sink and counts the outcome.
pub struct IndexEmitter<'a, S: IndexSink + ?Sized> {
    page_path: &'a str,
    sink: &'a mut S,
    emitted: usize,
    dropped: usize,
}

impl<'a, S: IndexSink + ?Sized> IndexEmitter<'a, S> {
    /// Clear the page's old records and get ready to emit new ones.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the old records cannot be removed.
    pub fn begin_page(page_path: &'a str, sink: &'a mut S) -> Result<Self, StoreError> {
        let removed = sink.clear_page(page_path)?;
        if removed > 0 {
            log::debug!("removed {removed} stale records for {page_path}");
        }
        Ok(Self {
            page_path,
            sink,
            emitted: 0,
            dropped: 0,
        })
    }

    /// Complete `link` with `name` and store it. A failed insert is logged
    /// and counted as dropped.
    pub fn emit(&mut self, link: PendingLink, name: String) {
        let record = IndexRecord::new(name, link.kind, self.page_path, &link.href);
        match self.sink.insert(&record) {
            Ok(()) => {
                log::debug!("{} {:?} -> {}", record.kind, record.name, record.path);
                self.emitted += 1;
            }
            Err(err) => {
                log::error!("dropping {:?} ({}): {err}", record.name, record.path);
                self.dropped += 1;
            }
        }
    }

    /// Give up on `link` without storing anything.
    pub fn drop_link(&mut self, link: &PendingLink, reason: &str) {
        log::warn!(
            "skipping TOC link to {} on {}: {reason}",
            link.href,
            self.page_path
        );
        self.dropped += 1;
    }

    /// Records stored so far.
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    /// Links seen but not stored.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemoryIndex;

    #[test]
    fn names_are_collapsed_and_trimmed() {
        assert_eq!(
            link_name("\n   Getting\n   Started  ").as_deref(),
            Some("Getting Started")
        );
        assert_eq!(link_name(" \n\t "), None);
        assert_eq!(link_name(""), None);
    }

    #[test]
    fn begin_page_clears_previous_records() {
        let mut sink = MemoryIndex::new();
        sink.insert(&IndexRecord::new("Old", EntryKind::Guide, "p.html", "#old"))
            .unwrap();

        let mut emitter = IndexEmitter::begin_page("p.html", &mut sink).unwrap();
        let link = PendingLink {
            href: "#new".to_string(),
            kind: EntryKind::Section,
        };
        emitter.drop_link(&link, "test");
        emitter.emit(link, "New".to_string());
        assert_eq!((emitter.emitted(), emitter.dropped()), (1, 1));

        assert_eq!(
            sink.records(),
            [IndexRecord::new("New", EntryKind::Section, "p.html", "#new")]
        );
    }
}
