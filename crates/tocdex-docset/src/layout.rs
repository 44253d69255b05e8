//! On-disk layout of a Dash docset.
//!
//! ```text
//! kafka.docset/
//!   Contents/
//!     Info.plist
//!     Resources/
//!       docSet.dsidx
//!       Documents/
//!         documentation.html
//!         styles.css
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DocsetConfig;
use crate::error::BuildError;

/// Paths inside one `.docset` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsetLayout {
    root: PathBuf,
}

impl DocsetLayout {
    /// Layout rooted at `root` (the `.docset` directory).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The `.docset` directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Contents/`
    #[must_use]
    pub fn contents_dir(&self) -> PathBuf {
        self.root.join("Contents")
    }

    /// `Contents/Resources/`
    #[must_use]
    pub fn resources_dir(&self) -> PathBuf {
        self.contents_dir().join("Resources")
    }

    /// `Contents/Resources/Documents/`, where pages and stylesheets go.
    #[must_use]
    pub fn documents_dir(&self) -> PathBuf {
        self.resources_dir().join("Documents")
    }

    /// The index database.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.resources_dir().join("docSet.dsidx")
    }

    /// `Contents/Info.plist`
    #[must_use]
    pub fn info_plist_path(&self) -> PathBuf {
        self.contents_dir().join("Info.plist")
    }

    /// Local copy of the page at `page_path`.
    #[must_use]
    pub fn document_path(&self, page_path: &str) -> PathBuf {
        self.documents_dir().join(page_path)
    }

    /// Create the directory tree and write `Info.plist`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Layout`] if a directory or the plist cannot be
    /// written.
    pub fn create(&self, config: &DocsetConfig) -> Result<(), BuildError> {
        let documents = self.documents_dir();
        fs::create_dir_all(&documents).map_err(|source| BuildError::Layout {
            path: documents,
            source,
        })?;
        let plist = self.info_plist_path();
        fs::write(&plist, info_plist(config))
            .map_err(|source| BuildError::Layout { path: plist, source })?;
        log::info!("docset layout ready at {}", self.root.display());
        Ok(())
    }
}

/// The `Info.plist` describing `config`'s docset.
#[must_use]
pub fn info_plist(config: &DocsetConfig) -> String {
    let identifier = xml_escape(&config.identifier());
    let name = xml_escape(&config.name);
    let index = config
        .index_page()
        .map(|page| {
            format!(
                "\t<key>dashIndexFilePath</key>\n\t<string>{}</string>\n",
                xml_escape(&page.path)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleIdentifier</key>
	<string>{identifier}</string>
	<key>CFBundleName</key>
	<string>{name}</string>
	<key>DocSetPlatformFamily</key>
	<string>{identifier}</string>
	<key>isDashDocset</key>
	<true/>
{index}</dict>
</plist>
"#
    )
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PageDescriptor, PageRole};

    #[test]
    fn paths_follow_docset_convention() {
        let layout = DocsetLayout::new("out/kafka.docset");
        assert_eq!(
            layout.index_path(),
            Path::new("out/kafka.docset/Contents/Resources/docSet.dsidx")
        );
        assert_eq!(
            layout.document_path("documentation.html"),
            Path::new("out/kafka.docset/Contents/Resources/Documents/documentation.html")
        );
        assert_eq!(
            layout.info_plist_path(),
            Path::new("out/kafka.docset/Contents/Info.plist")
        );
    }

    #[test]
    fn plist_names_the_index_page() {
        let plist = info_plist(&DocsetConfig::default());
        assert!(plist.contains("<string>kafka</string>"));
        assert!(plist.contains("<string>Kafka</string>"));
        assert!(plist.contains("<key>isDashDocset</key>\n\t<true/>"));
        assert!(plist.contains(
            "<key>dashIndexFilePath</key>\n\t<string>documentation.html</string>"
        ));
    }

    #[test]
    fn plist_values_are_escaped() {
        let config = DocsetConfig {
            name: "Q&A <Docs>".to_string(),
            pages: vec![PageDescriptor::new("a&b.html", PageRole::Guide)],
            ..DocsetConfig::default()
        };
        let plist = info_plist(&config);
        assert!(plist.contains("<string>Q&amp;A &lt;Docs&gt;</string>"));
        assert!(plist.contains("<string>a&amp;b.html</string>"));
        assert!(plist.contains("<string>qadocs</string>"));
    }
}
