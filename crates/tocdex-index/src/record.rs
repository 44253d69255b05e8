use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Three-tier classification of an index entry by list nesting.
///
/// The string forms are the Dash entry types written to the `type` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, Serialize, Deserialize,
)]
pub enum EntryKind {
    /// A link in the outermost list of the TOC.
    Guide,
    /// A link one list level down.
    Section,
    /// Anything nested deeper.
    Module,
}

impl EntryKind {
    /// Map a zero-based nesting level to a kind: 0 is a guide, 1 a section,
    /// everything deeper a module.
    #[must_use]
    pub const fn from_level(level: usize) -> Self {
        match level {
            0 => Self::Guide,
            1 => Self::Section,
            _ => Self::Module,
        }
    }
}

/// One navigable entry found in a TOC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// The link's visible text.
    pub name: String,
    /// Classification from the link's list level.
    pub kind: EntryKind,
    /// Page path and link target, see [`entry_path`].
    pub path: String,
}

impl IndexRecord {
    /// Build the record for a link with target `href` on page `page_path`.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EntryKind, page_path: &str, href: &str) -> Self {
        Self {
            name: name.into(),
            kind,
            path: entry_path(page_path, href),
        }
    }
}

/// The stored path of a link: the page path, one space, then the href.
///
/// ```
/// assert_eq!(
///     tocdex_index::record::entry_path("documentation.html", "#quickstart"),
///     "documentation.html #quickstart"
/// );
/// ```
#[must_use]
pub fn entry_path(page_path: &str, href: &str) -> String {
    format!("{page_path} {href}")
}

/// Prefix shared by every stored path of a page's records.
#[must_use]
pub fn page_prefix(page_path: &str) -> String {
    format!("{page_path} ")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn levels_map_to_kinds() {
        assert_eq!(EntryKind::from_level(0), EntryKind::Guide);
        assert_eq!(EntryKind::from_level(1), EntryKind::Section);
        assert_eq!(EntryKind::from_level(2), EntryKind::Module);
        assert_eq!(EntryKind::from_level(9), EntryKind::Module);
    }

    #[test]
    fn kind_strings_round_trip_through_the_type_column() {
        assert_eq!(EntryKind::Section.as_ref(), "Section");
        assert_eq!(EntryKind::from_str("Module"), Ok(EntryKind::Module));
        assert!(EntryKind::from_str("Class").is_err());
    }

    #[test]
    fn record_paths_join_page_and_href() {
        let record = IndexRecord::new("Intro", EntryKind::Guide, "documentation.html", "a.html");
        assert_eq!(record.path, "documentation.html a.html");
        assert!(record.path.starts_with(&page_prefix("documentation.html")));
        assert!(!record.path.starts_with(&page_prefix("documentation")));
    }
}
