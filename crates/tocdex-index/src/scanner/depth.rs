//! Element nesting depth.

use thiserror::Error;

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// These never get an end tag, so the scanner closes them itself.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Whether `tag_name` is a void element.
#[must_use]
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(&tag_name)
}

/// An end tag arrived with no element open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("end tag with no open element")]
pub struct DepthUnderflow;

/// Counts open elements.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DepthTracker {
    depth: usize,
}

impl DepthTracker {
    /// Start at depth 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { depth: 0 }
    }

    /// Current depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// A start tag opened an element.
    pub const fn enter(&mut self) {
        self.depth += 1;
    }

    /// An end tag closed an element. Returns the new depth.
    ///
    /// # Errors
    ///
    /// Returns [`DepthUnderflow`] at depth 0; the depth is left unchanged.
    pub const fn leave(&mut self) -> Result<usize, DepthUnderflow> {
        match self.depth.checked_sub(1) {
            Some(depth) => {
                self.depth = depth;
                Ok(depth)
            }
            None => Err(DepthUnderflow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_leave_balance() {
        let mut tracker = DepthTracker::new();
        tracker.enter();
        tracker.enter();
        assert_eq!(tracker.depth(), 2);
        assert_eq!(tracker.leave(), Ok(1));
        assert_eq!(tracker.leave(), Ok(0));
        assert_eq!(tracker.leave(), Err(DepthUnderflow));
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn void_elements() {
        assert!(is_void_element("br"));
        assert!(is_void_element("link"));
        assert!(!is_void_element("a"));
    }
}
