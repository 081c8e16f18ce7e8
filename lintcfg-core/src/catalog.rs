/// The family tree of lint checks, written down once and consulted forever
///
/// Every lint check has a place in a little outline: `name` holds
/// `name/version`, which in turn holds `name/version/hinted_suffix`, and so on.
/// The outline is plain indented text, with an optional `-- comment` after
/// each label. Turning a branch on or off means turning on or off everything
/// that hangs beneath it.
///
/// Made with curiosity at FontLab https://www.fontlab.com/
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use log::debug;

use crate::error::{Error, Result};

/// Set of active (or candidate) tags; ordered so output is stable.
pub type TagSet = BTreeSet<String>;

const BUILTIN_OUTLINE: &str = include_str!("../data/lint_tags.txt");

/// One declared tag and the comment that came with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub tag: String,
    pub comment: Option<String>,
}

/// The fixed namespace of lint check tags.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    known: HashSet<String>,
    all: TagSet,
}

impl Catalog {
    /// The lint catalog every spec is checked against unless told otherwise.
    ///
    /// Built on first use and shared for the life of the process.
    pub fn builtin() -> Arc<Catalog> {
        static BUILTIN: OnceLock<Arc<Catalog>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                Arc::new(Catalog::parse(BUILTIN_OUTLINE).expect("built-in lint outline is well-formed"))
            })
            .clone()
    }

    /// Read an outline from disk and build a catalog from it.
    pub fn from_path(path: &Path) -> Result<Catalog> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Catalog::parse(&text)
    }

    /// Build a catalog from indented outline text.
    ///
    /// A line's parent is the closest earlier line indented strictly less than it.
    /// Blank lines are skipped; text after `--` is kept as the tag's comment.
    pub fn parse(outline: &str) -> Result<Catalog> {
        let mut entries: Vec<CatalogEntry> = Vec::new();
        let mut known = HashSet::new();
        // (indent column, tag) for the current chain of ancestors
        let mut stack: Vec<(usize, String)> = Vec::new();

        for (idx, raw) in outline.lines().enumerate() {
            let line_no = idx + 1;
            let malformed = |reason| Error::MalformedCatalog {
                line: line_no,
                text: raw.to_string(),
                reason,
            };

            let (body, comment) = match raw.find("--") {
                Some(ix) => {
                    let comment = raw[ix + 2..].trim();
                    (&raw[..ix], (!comment.is_empty()).then(|| comment.to_string()))
                }
                None => (raw, None),
            };

            let label = body.trim();
            if label.is_empty() {
                if comment.is_some() {
                    return Err(malformed("comment without a label"));
                }
                continue;
            }

            let leading = &body[..body.len() - body.trim_start().len()];
            if leading.contains('\t') {
                return Err(malformed("tab in indentation"));
            }
            if label.contains(char::is_whitespace) || label.contains('/') {
                return Err(malformed("label must be a single word without '/'"));
            }
            let indent = leading.len();

            while stack.last().is_some_and(|(col, _)| *col >= indent) {
                stack.pop();
            }

            let tag = match stack.last() {
                Some((_, parent)) => format!("{parent}/{label}"),
                None => label.to_string(),
            };

            if !known.insert(tag.clone()) {
                return Err(malformed("duplicate tag"));
            }

            stack.push((indent, tag.clone()));
            entries.push(CatalogEntry { tag, comment });
        }

        let all: TagSet = known.iter().cloned().collect();
        debug!("built lint catalog with {} tags", entries.len());
        Ok(Catalog {
            entries,
            known,
            all,
        })
    }

    /// Declared tags with their comments, in outline order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Every declared tag.
    pub fn tags(&self) -> &TagSet {
        &self.all
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.known.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All tags at or below `prefix`, in outline order.
    ///
    /// `prefix` must itself be a declared tag. Matching below it is plain string
    /// prefix matching, so `cmap` would also pick up a sibling named `cmap2`.
    pub fn expand(&self, prefix: &str) -> Result<Vec<&str>> {
        if !self.contains(prefix) {
            return Err(Error::UnknownTag(prefix.to_string()));
        }

        Ok(self
            .entries
            .iter()
            .map(|entry| entry.tag.as_str())
            .filter(|tag| tag.starts_with(prefix))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_outline_parses() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 89);
        assert_eq!(catalog.entries()[0].tag, "name");
        assert_eq!(catalog.entries()[0].comment.as_deref(), Some("name table tests"));
        assert!(catalog.contains("name/version/hinted_suffix"));
        assert!(catalog.contains("paths/extrema"));
        assert!(catalog.contains("head/os2/achvendid"));
        assert!(catalog.contains("reachable"));
        assert!(!catalog.contains(""));
    }

    #[test]
    fn builtin_is_shared() {
        assert!(Arc::ptr_eq(&Catalog::builtin(), &Catalog::builtin()));
    }

    #[test]
    fn nests_by_indentation() {
        let catalog = Catalog::parse("a\n  b\n    c\n  d\ne -- last\n").unwrap();
        let tags: Vec<&str> = catalog.entries().iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["a", "a/b", "a/b/c", "a/d", "e"]);
        assert_eq!(catalog.entries()[4].comment.as_deref(), Some("last"));
    }

    #[test]
    fn uneven_dedent_attaches_to_nearest_shallower_line() {
        let catalog = Catalog::parse("a\n  b\n      c\n    d\n").unwrap();
        assert!(catalog.contains("a/b/c"));
        assert!(catalog.contains("a/b/d"));
    }

    #[test]
    fn expand_includes_prefix_and_descendants() {
        let catalog = Catalog::builtin();
        let version = catalog.expand("name/version").unwrap();
        assert_eq!(
            version,
            vec![
                "name/version",
                "name/version/hinted_suffix",
                "name/version/match_head_table_version",
                "name/version/looks_like_number",
            ]
        );
    }

    #[test]
    fn expand_rejects_unknown_prefix() {
        let catalog = Catalog::builtin();
        assert!(matches!(catalog.expand("frobnicate"), Err(Error::UnknownTag(t)) if t == "frobnicate"));
        // a partial path segment is not a declared tag either
        assert!(matches!(catalog.expand("nam"), Err(Error::UnknownTag(_))));
    }

    #[test]
    fn expand_is_plain_string_prefix_matching() {
        let catalog = Catalog::parse("cmap\n  tables\ncmap2\n").unwrap();
        let expanded = catalog.expand("cmap").unwrap();
        assert_eq!(expanded, vec!["cmap", "cmap/tables", "cmap2"]);
    }

    #[test]
    fn rejects_malformed_outlines() {
        for (outline, reason) in [
            ("a\n\tb\n", "tab in indentation"),
            ("a\n  b\n  b\n", "duplicate tag"),
            ("a\n  -- orphan\n", "comment without a label"),
            ("a b\n", "label must be a single word without '/'"),
            ("a/b\n", "label must be a single word without '/'"),
        ] {
            match Catalog::parse(outline) {
                Err(Error::MalformedCatalog { reason: got, .. }) => assert_eq!(got, reason),
                other => panic!("expected malformed catalog for {outline:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn reads_outline_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tags.txt");
        fs::write(&path, "x\n  y\n").expect("write outline");

        let catalog = Catalog::from_path(&path).expect("load");
        assert_eq!(catalog.tags().len(), 2);
        assert!(matches!(
            Catalog::from_path(&dir.path().join("missing.txt")),
            Err(Error::Io { .. })
        ));
    }
}
