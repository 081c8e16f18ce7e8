//! Line-oriented parser for lint spec text (made by FontLab https://www.fontlab.com/)
//!
//! ```text
//! # comment
//! vendor Monotype              # bare value: equality
//! version >= 1.02              # operator + operand
//! disable paths/extrema
//! condition                    # start over with an empty condition
//! filename NotoSansCJK-Regular.ttc
//! disable name
//! ```
//!
//! Attribute lines accumulate into the current condition. Once a directive has
//! been seen, the next attribute line closes the block and refines a copy of the
//! same condition; only `condition` resets it.

use std::mem;
use std::sync::Arc;

use log::debug;

use crate::catalog::Catalog;
use crate::condition::ConditionMatcher;
use crate::document::SpecDocument;
use crate::error::{Error, Result};
use crate::selection::TestSelection;

/// Rolling state while reading a spec, one line at a time.
#[derive(Debug)]
pub struct SpecParser {
    catalog: Arc<Catalog>,
    condition: ConditionMatcher,
    selection: TestSelection,
    have_selection: bool,
    document: SpecDocument,
}

impl SpecParser {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            selection: TestSelection::new(catalog.clone()),
            document: SpecDocument::new(catalog.clone()),
            condition: ConditionMatcher::new(),
            have_selection: false,
            catalog,
        }
    }

    /// Consume one raw line. Errors carry no line number; the caller adds it.
    pub fn feed_line(&mut self, raw: &str) -> Result<()> {
        let line = match raw.find('#') {
            Some(ix) => &raw[..ix],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            return Ok(());
        }

        if line == "condition" {
            self.flush();
            self.condition = ConditionMatcher::new();
        } else if line.starts_with("enable") || line.starts_with("disable") {
            self.directive(line)?;
            self.have_selection = true;
        } else {
            self.flush();
            self.condition.modify_line(line)?;
        }
        Ok(())
    }

    /// Close the trailing block, if it has any directives, and hand back the document.
    pub fn finish(mut self) -> SpecDocument {
        self.flush();
        self.document
    }

    /// True when directives are pending for the current condition.
    pub fn has_pending_selection(&self) -> bool {
        self.have_selection
    }

    pub fn current_condition(&self) -> &ConditionMatcher {
        &self.condition
    }

    pub fn blocks(&self) -> usize {
        self.document.len()
    }

    fn directive(&mut self, line: &str) -> Result<()> {
        let mut parts = line.split_whitespace();
        let (verb, tag) = match (parts.next(), parts.next(), parts.next()) {
            (Some(verb), Some(tag), None) => (verb, tag),
            _ => return Err(Error::MalformedLine(line.to_string())),
        };

        match verb {
            "enable" => self.selection.enable(tag),
            "disable" => self.selection.disable(tag),
            _ => Err(Error::MalformedLine(line.to_string())),
        }
    }

    fn flush(&mut self) {
        if !self.have_selection {
            return;
        }
        let selection = mem::replace(&mut self.selection, TestSelection::new(self.catalog.clone()));
        debug!(
            "closing spec block {} ({} tags touched)",
            self.document.len(),
            selection.touched().len()
        );
        self.document.push(self.condition.clone(), selection);
        self.have_selection = false;
    }
}
