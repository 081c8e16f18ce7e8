//! Batch resolution of lint tests for many fonts (made by FontLab https://www.fontlab.com/)

use anyhow::{anyhow, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

use crate::document::SpecDocument;
use crate::font::FontInfo;

/// Resolved tests for one font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontTests {
    pub font: FontInfo,
    pub tests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone)]
pub struct ResolveOptions {
    pub jobs: Option<usize>,
    pub include_disabled: bool,
}

/// Resolve every font against `doc`, in parallel, keeping input order.
pub fn resolve_fonts(
    doc: &SpecDocument,
    fonts: &[FontInfo],
    opts: &ResolveOptions,
) -> Result<Vec<FontTests>> {
    if matches!(opts.jobs, Some(0)) {
        return Err(anyhow!("jobs must be at least 1 when provided"));
    }

    let run = || -> Vec<FontTests> {
        fonts
            .par_iter()
            .map(|font| resolve_one(doc, font, opts.include_disabled))
            .collect()
    };

    if let Some(jobs) = opts.jobs {
        let pool = ThreadPoolBuilder::new().num_threads(jobs).build()?;
        Ok(pool.install(run))
    } else {
        Ok(run())
    }
}

fn resolve_one(doc: &SpecDocument, font: &FontInfo, include_disabled: bool) -> FontTests {
    let active = doc.resolve(font);
    let disabled = include_disabled.then(|| {
        doc.catalog()
            .tags()
            .difference(&active)
            .cloned()
            .collect::<Vec<_>>()
    });

    FontTests {
        font: font.clone(),
        tests: active.into_iter().collect(),
        disabled,
    }
}
