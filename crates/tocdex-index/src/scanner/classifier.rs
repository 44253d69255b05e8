//! Entry kinds from list nesting.

use crate::record::EntryKind;

/// Elements that open a new TOC level.
const LIST_CONTAINERS: &[&str] = &["ul", "ol"];

/// Whether `tag_name` opens a TOC level.
#[must_use]
pub fn is_list_container(tag_name: &str) -> bool {
    LIST_CONTAINERS.contains(&tag_name)
}

/// Kind of a link found with `level` list containers open.
///
/// Links in the first list, or directly in a non-list container, are guides.
#[must_use]
pub const fn classify(level: usize) -> EntryKind {
    EntryKind::from_level(level.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_list_is_guide() {
        assert_eq!(classify(0), EntryKind::Guide);
        assert_eq!(classify(1), EntryKind::Guide);
        assert_eq!(classify(2), EntryKind::Section);
        assert_eq!(classify(3), EntryKind::Module);
        assert_eq!(classify(7), EntryKind::Module);
    }

    #[test]
    fn lists() {
        assert!(is_list_container("ul"));
        assert!(is_list_container("ol"));
        assert!(!is_list_container("li"));
    }
}
