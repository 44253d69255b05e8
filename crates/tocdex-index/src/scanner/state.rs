//! Where a page scan is relative to the TOC.

/// Scan progress on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// The TOC marker has not been seen yet.
    #[default]
    Searching,
    /// Inside the TOC container.
    InToc {
        /// Depth before the container's start tag was entered. The scan ends
        /// when an end tag brings the depth back here.
        toc_depth: usize,
        /// Open list containers at or below the TOC container.
        level: usize,
    },
}

impl ScanState {
    /// Whether the TOC has been found.
    #[must_use]
    pub const fn is_in_toc(&self) -> bool {
        matches!(self, Self::InToc { .. })
    }

    /// Depth the TOC container opened at, once found.
    #[must_use]
    pub const fn toc_depth(&self) -> Option<usize> {
        match self {
            Self::Searching => None,
            Self::InToc { toc_depth, .. } => Some(*toc_depth),
        }
    }

    /// Open list containers inside the TOC; 0 while searching.
    #[must_use]
    pub const fn level(&self) -> usize {
        match self {
            Self::Searching => 0,
            Self::InToc { level, .. } => *level,
        }
    }

    /// A list container opened inside the TOC.
    pub const fn open_list(&mut self) {
        if let Self::InToc { level, .. } = self {
            *level += 1;
        }
    }

    /// A list container closed inside the TOC.
    ///
    /// Returns false, leaving the level at 0, if no list was open.
    pub const fn close_list(&mut self) -> bool {
        match self {
            Self::InToc { level, .. } if *level > 0 => {
                *level -= 1;
                true
            }
            Self::InToc { .. } => false,
            Self::Searching => true,
        }
    }
}
