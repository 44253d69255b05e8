//! The page scanner.
//!
//! One forward pass over a token stream:
//!
//! - every start tag is entered and every end tag left ([`depth`]);
//! - until the TOC is found, start tags are checked for the marker
//!   ([`locator`]);
//! - inside the TOC, lists raise and lower the level ([`classifier`]) and
//!   links become records ([`emitter`]);
//! - the scan stops when the TOC container closes.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tocdex_common::warning::warn_once;
use tocdex_html::{Attribute, HtmlTokenizer, Token};

use crate::error::ScanError;
use crate::sink::{IndexSink, StylesheetHandler};

/// Kinds from list nesting.
pub mod classifier;
/// Nesting depth.
pub mod depth;
/// Two-step link protocol and record emission.
pub mod emitter;
/// TOC marker matching.
pub mod locator;
/// Scan state enum.
pub mod state;

pub use locator::TocMarker;

use self::classifier::{classify, is_list_container};
use self::depth::{DepthTracker, is_void_element};
use self::emitter::{IndexEmitter, PendingLink, link_name};
use self::state::ScanState;

/// How a page scan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The end tag of the TOC container was reached.
    TocClosed,
    /// The token stream ran out. Normal for pages without a TOC.
    EndOfStream,
    /// The scan was abandoned on bad markup. Records emitted before this
    /// point are kept.
    Malformed {
        /// Depth when the problem was found.
        depth: usize,
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TocClosed => write!(f, "TOC closed"),
            Self::EndOfStream => write!(f, "end of stream"),
            Self::Malformed { depth, reason } => {
                write!(f, "malformed markup at depth {depth}: {reason}")
            }
        }
    }
}

/// Outcome of scanning one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Page path the records were stored under.
    pub page: String,
    /// Whether the TOC marker was found.
    pub toc_found: bool,
    /// Records stored.
    pub records_emitted: usize,
    /// Links seen but not stored (no name, or the insert failed).
    pub records_dropped: usize,
    /// Stylesheet links passed to the handler.
    pub stylesheets: usize,
    /// How the scan ended.
    pub termination: Termination,
}

impl ScanReport {
    /// Whether the scan was abandoned on bad markup.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self.termination, Termination::Malformed { .. })
    }
}

/// Scans pages for their TOC.
#[derive(Debug, Clone, Default)]
pub struct PageScanner {
    marker: TocMarker,
}

impl PageScanner {
    /// A scanner looking for `marker`.
    #[must_use]
    pub const fn new(marker: TocMarker) -> Self {
        Self { marker }
    }

    /// The marker this scanner looks for.
    #[must_use]
    pub const fn marker(&self) -> &TocMarker {
        &self.marker
    }

    /// Scan `tokens` as page `page_path`, storing its TOC links in `sink`
    /// and reporting stylesheet links to `stylesheets`.
    ///
    /// The page's old records are removed first. Malformed markup ends the
    /// scan early but is not an error; see [`ScanReport::termination`].
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ClearPage`] if the old records cannot be removed.
    pub fn scan<I, S, H>(
        &self,
        page_path: &str,
        tokens: I,
        sink: &mut S,
        stylesheets: &mut H,
    ) -> Result<ScanReport, ScanError>
    where
        I: IntoIterator<Item = Token>,
        S: IndexSink + ?Sized,
        H: StylesheetHandler + ?Sized,
    {
        let emitter =
            IndexEmitter::begin_page(page_path, sink).map_err(|source| ScanError::ClearPage {
                page: page_path.to_string(),
                source,
            })?;
        let mut walk = PageWalk {
            marker: &self.marker,
            depth: DepthTracker::new(),
            state: ScanState::Searching,
            pending: None,
            emitter,
            stylesheets,
            stylesheet_count: 0,
        };
        let termination = walk.run(tokens);
        Ok(walk.finish(page_path, termination))
    }

    /// Scan the local file `file` as page `page_path`.
    ///
    /// The whole file is read into memory before the scan starts.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Read`] if the file cannot be read, or the errors
    /// of [`PageScanner::scan`].
    pub fn scan_file<S, H>(
        &self,
        page_path: &str,
        file: &Path,
        sink: &mut S,
        stylesheets: &mut H,
    ) -> Result<ScanReport, ScanError>
    where
        S: IndexSink + ?Sized,
        H: StylesheetHandler + ?Sized,
    {
        let read_error = |source| ScanError::Read {
            path: file.to_path_buf(),
            source,
        };
        let reader = BufReader::new(File::open(file).map_err(read_error)?);
        let tokenizer = HtmlTokenizer::from_reader(reader).map_err(read_error)?;
        self.scan(page_path, tokenizer, sink, stylesheets)
    }
}

/// State of one scan in progress.
struct PageWalk<'a, S: IndexSink + ?Sized, H: StylesheetHandler + ?Sized> {
    marker: &'a TocMarker,
    depth: DepthTracker,
    state: ScanState,
    pending: Option<PendingLink>,
    emitter: IndexEmitter<'a, S>,
    stylesheets: &'a mut H,
    stylesheet_count: usize,
}

impl<S: IndexSink + ?Sized, H: StylesheetHandler + ?Sized> PageWalk<'_, S, H> {
    fn run<I: IntoIterator<Item = Token>>(&mut self, tokens: I) -> Termination {
        for token in tokens {
            // Step two of the link protocol: the token after a link names it.
            if let Some(link) = self.pending.take() {
                if let Token::Text { data } = &token {
                    match link_name(data) {
                        Some(name) => self.emitter.emit(link, name),
                        None => self.emitter.drop_link(&link, "link text is blank"),
                    }
                    continue;
                }
                self.emitter
                    .drop_link(&link, "link is not followed by its text");
            }

            let outcome = match token {
                Token::StartTag {
                    name,
                    self_closing,
                    attributes,
                } => {
                    self.start_tag(&name, self_closing, &attributes);
                    if self_closing || is_void_element(&name) {
                        self.end_tag(&name)
                    } else {
                        None
                    }
                }
                // Void elements were closed at their start tag.
                Token::EndTag { name } if is_void_element(&name) => None,
                Token::EndTag { name } => self.end_tag(&name),
                Token::Text { .. } | Token::Comment { .. } | Token::Doctype { .. } => None,
                Token::Error(err) => Some(self.malformed(err.to_string())),
                Token::EndOfFile => Some(Termination::EndOfStream),
            };
            if let Some(termination) = outcome {
                return termination;
            }
        }
        Termination::EndOfStream
    }

    fn start_tag(&mut self, name: &str, self_closing: bool, attributes: &[Attribute]) {
        if name == "link" {
            self.stylesheet_link(attributes);
        }

        let depth = self.depth.depth();
        if !self.state.is_in_toc() && self.marker.matches(attributes) {
            log::info!("found TOC container <{name}> at depth {depth}");
            self.state = ScanState::InToc {
                toc_depth: depth,
                level: 0,
            };
        }

        if let Some(toc_depth) = self.state.toc_depth() {
            if is_list_container(name) {
                self.state.open_list();
            }
            if name == "a" && depth > toc_depth {
                self.link(self_closing, attributes);
            }
        }

        self.depth.enter();
    }

    /// Step one of the link protocol.
    fn link(&mut self, self_closing: bool, attributes: &[Attribute]) {
        let Some(href) = attributes.iter().find(|attr| attr.name == "href") else {
            log::debug!("ignoring TOC link without href");
            return;
        };
        let link = PendingLink {
            href: href.value.clone(),
            kind: classify(self.state.level()),
        };
        if self_closing {
            self.emitter.drop_link(&link, "link has no content");
        } else {
            self.pending = Some(link);
        }
    }

    fn stylesheet_link(&mut self, attributes: &[Attribute]) {
        let is_stylesheet = attributes
            .iter()
            .any(|attr| attr.name == "rel" && attr.has_token("stylesheet"));
        if !is_stylesheet {
            return;
        }
        if let Some(href) = attributes.iter().find(|attr| attr.name == "href") {
            self.stylesheets.stylesheet(&href.value);
            self.stylesheet_count += 1;
        }
    }

    fn end_tag(&mut self, name: &str) -> Option<Termination> {
        let Ok(depth) = self.depth.leave() else {
            return Some(self.malformed(format!("</{name}> with no open element")));
        };
        if let Some(toc_depth) = self.state.toc_depth() {
            if is_list_container(name) && !self.state.close_list() {
                warn_once("TOC Scanner", "list end tag without a matching start tag");
            }
            if depth == toc_depth {
                return Some(Termination::TocClosed);
            }
        }
        None
    }

    fn malformed(&self, reason: String) -> Termination {
        let depth = self.depth.depth();
        log::error!("abandoning page scan at depth {depth}: {reason}");
        Termination::Malformed { depth, reason }
    }

    fn finish(mut self, page_path: &str, termination: Termination) -> ScanReport {
        if let Some(link) = self.pending.take() {
            self.emitter
                .drop_link(&link, "page ended before the link text");
        }
        let report = ScanReport {
            page: page_path.to_string(),
            toc_found: self.state.is_in_toc(),
            records_emitted: self.emitter.emitted(),
            records_dropped: self.emitter.dropped(),
            stylesheets: self.stylesheet_count,
            termination,
        };
        if !report.toc_found {
            log::warn!("no TOC marker found on {page_path}");
        }
        report
    }
}
