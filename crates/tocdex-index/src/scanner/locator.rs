//! Finding the TOC container.

use serde::{Deserialize, Serialize};
use tocdex_html::Attribute;

/// The attribute token that marks the TOC container.
///
/// The default matches `class="toc"`, including `class="toc wide"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocMarker {
    /// Attribute to inspect.
    pub attribute: String,
    /// Whitespace-separated token the attribute must contain.
    pub token: String,
}

impl Default for TocMarker {
    fn default() -> Self {
        Self::new("class", "toc")
    }
}

impl TocMarker {
    /// Marker for `attribute` containing `token`.
    #[must_use]
    pub fn new(attribute: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            token: token.into(),
        }
    }

    /// Whether a start tag with these attributes is the TOC container.
    #[must_use]
    pub fn matches(&self, attributes: &[Attribute]) -> bool {
        attributes
            .iter()
            .any(|attr| attr.name == self.attribute && attr.has_token(&self.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<Attribute> {
        pairs
            .iter()
            .map(|(n, v)| Attribute::new((*n).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn class_token_matches() {
        let marker = TocMarker::default();
        assert!(marker.matches(&attrs(&[("class", "toc")])));
        assert!(marker.matches(&attrs(&[("id", "nav"), ("class", "wide toc")])));
        assert!(!marker.matches(&attrs(&[("class", "tocs")])));
        assert!(!marker.matches(&attrs(&[("id", "toc")])));
    }

    #[test]
    fn custom_marker() {
        let marker = TocMarker::new("id", "contents");
        assert!(marker.matches(&attrs(&[("id", "contents")])));
        assert!(!marker.matches(&attrs(&[("class", "contents")])));
    }
}
