//! Docset configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all)
//! describes the Kafka 0.8.2 documentation docset:
//!
//! ```toml
//! name = "Kafka"
//! base_url = "http://kafka.apache.org"
//! version = "0.8.2"
//! normalizer_url = "http://www.it.uc3m.es/jaf/cgi-bin/html2xhtml.cgi"
//! output = "kafka.docset"
//! timeout_secs = 30
//!
//! [[pages]]
//! path = "documentation.html"
//! role = "Root"
//!
//! [marker]
//! attribute = "class"
//! token = "toc"
//!
//! [lock_retry]
//! attempts = 10
//! wait_per_attempt_ms = 1000
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tocdex_common::url::{join_url, normalize_version};
use tocdex_index::{LockRetryPolicy, TocMarker};

use crate::error::ConfigError;

/// Markup normalization service used unless configured otherwise.
pub const DEFAULT_NORMALIZER_URL: &str = "http://www.it.uc3m.es/jaf/cgi-bin/html2xhtml.cgi";

/// What a page is to the docset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum PageRole {
    /// An ordinary documentation page.
    #[default]
    Guide,
    /// The docset's landing page.
    Root,
}

/// One page to fetch and scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// Path below the versioned base URL, also the local file name and the
    /// prefix of every record path.
    pub path: String,
    /// Role of the page.
    #[serde(default)]
    pub role: PageRole,
}

impl PageDescriptor {
    /// A page at `path` with `role`.
    #[must_use]
    pub fn new(path: impl Into<String>, role: PageRole) -> Self {
        Self {
            path: path.into(),
            role,
        }
    }
}

/// Everything a run needs to know about a docset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsetConfig {
    /// Display name, also lowercased into the bundle identifier.
    pub name: String,
    /// Site root the versioned pages live under.
    pub base_url: String,
    /// Documentation version, e.g. `0.8.2`.
    pub version: String,
    /// Service the raw markup is posted to. Missing or empty means the raw
    /// markup is stored and scanned as-is.
    pub normalizer_url: Option<String>,
    /// The `.docset` directory to write.
    pub output: PathBuf,
    /// Pages in processing order.
    pub pages: Vec<PageDescriptor>,
    /// How the TOC container is recognized.
    pub marker: TocMarker,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Waiting on a locked index database.
    pub lock_retry: LockRetryPolicy,
}

impl Default for DocsetConfig {
    fn default() -> Self {
        Self {
            name: "Kafka".to_string(),
            base_url: "http://kafka.apache.org".to_string(),
            version: "0.8.2".to_string(),
            normalizer_url: Some(DEFAULT_NORMALIZER_URL.to_string()),
            output: PathBuf::from("kafka.docset"),
            pages: vec![PageDescriptor::new("documentation.html", PageRole::Root)],
            marker: TocMarker::default(),
            timeout_secs: 30,
            lock_retry: LockRetryPolicy::default(),
        }
    }
}

impl DocsetConfig {
    /// Load and validate a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or holds
    /// an invalid value.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::debug!("loaded docset config from {}", path.display());
        Ok(config)
    }

    /// Check the values a run depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first unusable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(invalid("name", "must not be empty"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(invalid(
                "base_url",
                format!("`{}` is not an http(s) URL", self.base_url),
            ));
        }
        if self.pages.is_empty() {
            return Err(invalid("pages", "at least one page is required"));
        }
        for page in &self.pages {
            if !is_plain_relative(&page.path) {
                return Err(invalid(
                    "pages.path",
                    format!("`{}` must be a relative path without `..`", page.path),
                ));
            }
            // Records are cleared by the `"{page} "` path prefix.
            if page.path.chars().any(char::is_whitespace) {
                return Err(invalid(
                    "pages.path",
                    format!("`{}` must not contain whitespace", page.path),
                ));
            }
        }
        if self.marker.attribute.is_empty() || self.marker.token.is_empty() {
            return Err(invalid("marker", "attribute and token must be set"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be at least 1"));
        }
        Ok(())
    }

    /// The version as it appears in URLs: `0.8.2` becomes `082`.
    #[must_use]
    pub fn url_version(&self) -> String {
        normalize_version(&self.version)
    }

    /// Where `page` is downloaded from.
    #[must_use]
    pub fn page_url(&self, page: &PageDescriptor) -> String {
        join_url(&self.base_url, &[&self.url_version(), &page.path])
    }

    /// The normalizer to use, if any.
    #[must_use]
    pub fn normalizer(&self) -> Option<&str> {
        self.normalizer_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Bundle identifier written to `Info.plist`.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.name
            .chars()
            .filter(|&c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'))
            .collect::<String>()
            .to_ascii_lowercase()
    }

    /// The page the docset opens on: the first `Root` page, or the first
    /// page when none is marked.
    #[must_use]
    pub fn index_page(&self) -> Option<&PageDescriptor> {
        self.pages
            .iter()
            .find(|page| page.role == PageRole::Root)
            .or_else(|| self.pages.first())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Only normal components, so the page stays inside the documents directory.
fn is_plain_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_kafka() {
        let config = DocsetConfig::default();
        config.validate().unwrap();
        assert_eq!(config.url_version(), "082");
        assert_eq!(
            config.page_url(&config.pages[0]),
            "http://kafka.apache.org/082/documentation.html"
        );
        assert_eq!(config.normalizer(), Some(DEFAULT_NORMALIZER_URL));
        assert_eq!(config.identifier(), "kafka");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn empty_toml_is_the_default() {
        let config: DocsetConfig = toml::from_str("").unwrap();
        assert_eq!(config, DocsetConfig::default());
    }

    #[test]
    fn toml_overrides_fields() {
        let config: DocsetConfig = toml::from_str(
            r#"
            name = "Zoo Keeper"
            version = "3.4.6"
            normalizer_url = ""
            output = "out/zk.docset"

            [[pages]]
            path = "guide.html"

            [[pages]]
            path = "index.html"
            role = "Root"

            [marker]
            attribute = "id"
            token = "contents"

            [lock_retry]
            attempts = 3
            wait_per_attempt_ms = 250
            "#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.url_version(), "346");
        assert_eq!(config.normalizer(), None);
        assert_eq!(config.identifier(), "zookeeper");
        assert_eq!(config.pages[0].role, PageRole::Guide);
        assert_eq!(config.index_page().unwrap().path, "index.html");
        assert_eq!(config.marker, TocMarker::new("id", "contents"));
        assert_eq!(config.lock_retry.attempts, 3);
        assert_eq!(
            config.lock_retry.wait_per_attempt,
            Duration::from_millis(250)
        );
        assert_eq!(config.base_url, "http://kafka.apache.org");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<DocsetConfig>("nmae = \"typo\"").is_err());
    }

    #[test]
    fn page_paths_must_stay_inside_the_docset() {
        for bad in ["../escape.html", "/etc/passwd", ""] {
            let config = DocsetConfig {
                pages: vec![PageDescriptor::new(bad, PageRole::Root)],
                ..DocsetConfig::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::Invalid {
                        field: "pages.path",
                        ..
                    })
                ),
                "{bad:?} should be rejected"
            );
        }
        let nested = DocsetConfig {
            pages: vec![PageDescriptor::new("api/index.html", PageRole::Guide)],
            ..DocsetConfig::default()
        };
        nested.validate().unwrap();
    }

    #[test]
    fn page_paths_must_not_contain_whitespace() {
        for bad in ["guide two.html", "guide\ttwo.html", "api/ index.html"] {
            let config = DocsetConfig {
                pages: vec![
                    PageDescriptor::new("guide", PageRole::Guide),
                    PageDescriptor::new(bad, PageRole::Guide),
                ],
                ..DocsetConfig::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::Invalid {
                        field: "pages.path",
                        ..
                    })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn index_page_falls_back_to_first_page() {
        let config = DocsetConfig {
            pages: vec![
                PageDescriptor::new("a.html", PageRole::Guide),
                PageDescriptor::new("b.html", PageRole::Guide),
            ],
            ..DocsetConfig::default()
        };
        assert_eq!(config.index_page().unwrap().path, "a.html");
    }
}
