//! Docset building for tocdex.
//!
//! # Scope
//!
//! This crate provides:
//! - **Configuration** - which pages to fetch, from where, and how to find
//!   their TOC ([`DocsetConfig`])
//! - **Layout** - the `.docset` directory tree and its `Info.plist`
//! - **Stylesheet mirroring** - local copies of the stylesheets a page links
//! - **Pipeline** - fetch, normalize, store and scan each page
//!   ([`DocsetBuilder`])
//!
//! # Not Yet Implemented
//!
//! - Mirroring images and scripts
//! - Fetching pages concurrently

/// Page pipeline and run reports.
pub mod builder;
/// Docset configuration.
pub mod config;
/// Error types.
pub mod error;
/// Docset directory layout.
pub mod layout;
/// Stylesheet mirroring.
pub mod mirror;

pub use builder::{DocsetBuilder, PageOutcome, PageSource, RunReport};
pub use config::{DocsetConfig, PageDescriptor, PageRole};
pub use error::{BuildError, ConfigError, PageError};
pub use layout::DocsetLayout;
pub use mirror::StylesheetMirror;
