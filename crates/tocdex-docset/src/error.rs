use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tocdex_common::FetchError;
use tocdex_index::{ScanError, StoreError};

/// Problems with a docset configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        /// Configuration file.
        path: PathBuf,
        /// I/O failure.
        source: io::Error,
    },

    /// The configuration file is not valid TOML for a docset.
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        /// Configuration file.
        path: PathBuf,
        /// TOML failure.
        source: toml::de::Error,
    },

    /// A value is present but unusable.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Why one page produced no scan. The run moves on to the next page.
#[derive(Debug, Error)]
pub enum PageError {
    /// Downloading the page failed or was redirected.
    #[error("failed to fetch page: {0}")]
    Fetch(#[source] FetchError),

    /// The normalization service failed or was redirected.
    #[error("failed to normalize page: {0}")]
    Normalize(#[source] FetchError),

    /// The local copy could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Local file.
        path: PathBuf,
        /// I/O failure.
        source: io::Error,
    },

    /// The scan could not start.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl PageError {
    /// Whether the page was given up because a server redirected.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        match self {
            Self::Fetch(err) | Self::Normalize(err) => err.is_redirect(),
            Self::Write { .. } | Self::Scan(_) => false,
        }
    }
}

/// Failures that stop a whole run.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The docset directories or metadata could not be created.
    #[error("failed to create docset layout at {}: {source}", .path.display())]
    Layout {
        /// Path being created.
        path: PathBuf,
        /// I/O failure.
        source: io::Error,
    },

    /// The index store could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The HTTP client could not be created.
    #[error(transparent)]
    Http(#[from] FetchError),
}
