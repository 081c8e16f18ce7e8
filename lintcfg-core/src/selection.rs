//! Enable/disable decisions over catalog tags (made by FontLab https://www.fontlab.com/)

use std::fmt;
use std::sync::Arc;

use crate::catalog::{Catalog, TagSet};
use crate::error::Result;

/// A diff against some prior set of active tags.
///
/// `touched` holds every tag this selection has an opinion on; `enabled` is the
/// subset it wants on. Later calls override earlier ones tag by tag.
#[derive(Debug, Clone)]
pub struct TestSelection {
    catalog: Arc<Catalog>,
    touched: TagSet,
    enabled: TagSet,
}

impl TestSelection {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            touched: TagSet::new(),
            enabled: TagSet::new(),
        }
    }

    /// Turn on `prefix` and everything beneath it.
    pub fn enable(&mut self, prefix: &str) -> Result<()> {
        for tag in self.catalog.expand(prefix)? {
            self.touched.insert(tag.to_string());
            self.enabled.insert(tag.to_string());
        }
        Ok(())
    }

    /// Turn off `prefix` and everything beneath it.
    pub fn disable(&mut self, prefix: &str) -> Result<()> {
        for tag in self.catalog.expand(prefix)? {
            self.touched.insert(tag.to_string());
            self.enabled.remove(tag);
        }
        Ok(())
    }

    /// Overwrite `result` with this selection's verdict for every tag it touched.
    pub fn apply(&self, result: &mut TagSet) {
        result.retain(|tag| !self.touched.contains(tag));
        result.extend(self.enabled.iter().cloned());
    }

    pub fn touched(&self) -> &TagSet {
        &self.touched
    }

    pub fn enabled(&self) -> &TagSet {
        &self.enabled
    }

    /// `Some(true)` if enabled, `Some(false)` if disabled, `None` if never mentioned.
    pub fn verdict(&self, tag: &str) -> Option<bool> {
        self.touched
            .contains(tag)
            .then(|| self.enabled.contains(tag))
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    pub fn disabled(&self) -> impl Iterator<Item = &str> {
        self.touched
            .iter()
            .filter(|tag| !self.enabled.contains(*tag))
            .map(String::as_str)
    }
}

impl fmt::Display for TestSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled.is_empty() {
            writeln!(f, "enable:")?;
            for tag in &self.enabled {
                writeln!(f, "  {tag}")?;
            }
        }
        let disabled: Vec<&str> = self.disabled().collect();
        if !disabled.is_empty() {
            writeln!(f, "disable:")?;
            for tag in disabled {
                writeln!(f, "  {tag}")?;
            }
        }
        Ok(())
    }
}
