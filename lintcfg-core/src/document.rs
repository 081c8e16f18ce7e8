//! Ordered condition blocks and tag resolution (made by FontLab https://www.fontlab.com/)

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::trace;

use crate::catalog::{Catalog, TagSet};
use crate::condition::ConditionMatcher;
use crate::error::{Error, Result};
use crate::font::FontInfo;
use crate::parser::SpecParser;
use crate::selection::TestSelection;

/// One condition block: which fonts it applies to and what it does to their tests.
#[derive(Debug, Clone)]
pub struct SpecEntry {
    pub condition: ConditionMatcher,
    pub selection: TestSelection,
}

impl SpecEntry {
    pub fn touches(&self, tag: &str) -> bool {
        self.selection.touched().contains(tag)
    }
}

/// A parsed lint configuration. Entries keep file order; later ones win.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    catalog: Arc<Catalog>,
    entries: Vec<SpecEntry>,
}

impl SpecDocument {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            entries: Vec::new(),
        }
    }

    /// Parse spec text against the built-in catalog.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(Catalog::builtin(), text)
    }

    pub fn parse_with(catalog: Arc<Catalog>, text: &str) -> Result<Self> {
        let mut parser = SpecParser::new(catalog);
        for (idx, line) in text.lines().enumerate() {
            parser.feed_line(line).map_err(|err| err.at_line(idx + 1, line))?;
        }
        Ok(parser.finish())
    }

    /// Read and parse one spec file.
    pub fn from_path(path: &Path, catalog: Arc<Catalog>) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_with(catalog, &text)
    }

    pub fn push(&mut self, condition: ConditionMatcher, selection: TestSelection) {
        self.entries.push(SpecEntry {
            condition,
            selection,
        });
    }

    pub fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The tests to run for `font`: every catalog tag, adjusted by each matching block in order.
    pub fn resolve(&self, font: &FontInfo) -> TagSet {
        let mut result = self.catalog.tags().clone();
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.condition.accepts(font) {
                trace!("block {idx} applies to {}", font.label());
                entry.selection.apply(&mut result);
            } else {
                trace!("block {idx} skipped for {}", font.label());
            }
        }
        result
    }

    /// Indices of the matching blocks that decided `tag` for `font`, in order.
    ///
    /// The last index, if any, holds the effective verdict; an empty list means
    /// the tag keeps its default (enabled).
    pub fn explain(&self, font: &FontInfo, tag: &str) -> Result<Vec<usize>> {
        if !self.catalog.contains(tag) {
            return Err(Error::UnknownTag(tag.to_string()));
        }

        Ok(self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.touches(tag) && entry.condition.accepts(font))
            .map(|(idx, _)| idx)
            .collect())
    }
}

/// Normalised spec text; parsing it back gives a document that resolves the same way.
impl fmt::Display for SpecDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, entry) in self.entries.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            writeln!(f, "condition")?;
            write!(f, "{}", entry.condition)?;
            for tag in entry.selection.touched() {
                let verb = if entry.selection.enabled().contains(tag) {
                    "enable"
                } else {
                    "disable"
                };
                writeln!(f, "{verb} {tag}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(filename: &str, vendor: &str, version: &str) -> FontInfo {
        FontInfo {
            filename: filename.into(),
            vendor: vendor.into(),
            version: version.into(),
            ..FontInfo::default()
        }
    }

    #[test]
    fn empty_document_enables_everything() {
        let doc = SpecDocument::new(Catalog::builtin());
        assert!(doc.is_empty());
        assert_eq!(&doc.resolve(&FontInfo::default()), doc.catalog().tags());
    }

    #[test]
    fn later_matching_entry_wins() {
        let catalog = Catalog::builtin();
        let mut doc = SpecDocument::new(catalog.clone());

        let mut off = TestSelection::new(catalog.clone());
        off.disable("paths/extrema").unwrap();
        let mut on = TestSelection::new(catalog.clone());
        on.enable("paths/extrema").unwrap();

        doc.push(ConditionMatcher::new(), off.clone());
        doc.push(ConditionMatcher::new(), on.clone());
        assert!(doc.resolve(&FontInfo::default()).contains("paths/extrema"));

        let mut reversed = SpecDocument::new(catalog);
        reversed.push(ConditionMatcher::new(), on);
        reversed.push(ConditionMatcher::new(), off);
        assert!(!reversed.resolve(&FontInfo::default()).contains("paths/extrema"));
    }

    #[test]
    fn explain_lists_deciding_blocks() {
        let doc = SpecDocument::parse(
            "disable paths\n\
             condition\n\
             vendor Adobe\n\
             enable paths/extrema\n\
             condition\n\
             disable name\n",
        )
        .unwrap();

        let adobe = font("A.otf", "Adobe", "1.0");
        assert_eq!(doc.explain(&adobe, "paths/extrema").unwrap(), vec![0, 1]);
        assert_eq!(doc.explain(&adobe, "paths/duplicate").unwrap(), vec![0]);
        assert!(doc.explain(&adobe, "reachable").unwrap().is_empty());

        let other = font("B.ttf", "Monotype", "1.0");
        assert_eq!(doc.explain(&other, "paths/extrema").unwrap(), vec![0]);
        assert!(matches!(doc.explain(&other, "nope"), Err(Error::UnknownTag(_))));
    }

    #[test]
    fn display_reparses_to_equivalent_document() {
        let text = "vendor Monotype\n\
                    version >= 1.02\n\
                    disable paths\n\
                    enable paths/extrema\n\
                    filename like NotoSans-.*\n\
                    disable name/version\n";
        let doc = SpecDocument::parse(text).unwrap();
        let rendered = doc.to_string();
        let reparsed = SpecDocument::parse(&rendered).unwrap();
        assert_eq!(reparsed.len(), doc.len());

        for sample in [
            font("NotoSans-Regular.ttf", "Monotype", "1.02"),
            font("NotoSans-Regular.ttf", "Monotype", "1.01"),
            font("Arimo.ttf", "Monotype", "2.0"),
            font("NotoSans-Bold.ttf", "Adobe", "3.0"),
        ] {
            assert_eq!(doc.resolve(&sample), reparsed.resolve(&sample), "font {sample:?}");
        }
    }

    #[test]
    fn display_keeps_empty_in_member_reparseable() {
        let doc = SpecDocument::parse("script in ,\ndisable name\n").unwrap();
        let rendered = doc.to_string();
        assert!(rendered.contains("script in ,\n"), "got {rendered}");

        let reparsed = SpecDocument::parse(&rendered).unwrap();
        let blank = FontInfo::default();
        assert!(!doc.resolve(&blank).contains("name"));
        assert_eq!(doc.resolve(&blank), reparsed.resolve(&blank));
    }
}
