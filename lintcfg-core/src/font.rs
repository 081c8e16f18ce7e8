//! Font metadata records consumed by the rule engine (made by FontLab https://www.fontlab.com/)

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Descriptive attributes of one font, as supplied by whoever inspected the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontInfo {
    pub filename: String,
    pub name: String,
    pub style: String,
    pub script: String,
    pub variant: String,
    pub weight: String,
    pub hinted: bool,
    pub vendor: String,
    pub version: String,
}

impl FontInfo {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        filename: impl Into<String>,
        name: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
        variant: impl Into<String>,
        weight: impl Into<String>,
        hinted: bool,
        vendor: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            name: name.into(),
            style: style.into(),
            script: script.into(),
            variant: variant.into(),
            weight: weight.into(),
            hinted,
            vendor: vendor.into(),
            version: version.into(),
        }
    }

    /// Field value rendered as text; `hinted` becomes `"true"` / `"false"`.
    pub fn value(&self, attr: Attribute) -> Cow<'_, str> {
        match attr {
            Attribute::Filename => Cow::Borrowed(&self.filename),
            Attribute::Name => Cow::Borrowed(&self.name),
            Attribute::Style => Cow::Borrowed(&self.style),
            Attribute::Script => Cow::Borrowed(&self.script),
            Attribute::Variant => Cow::Borrowed(&self.variant),
            Attribute::Weight => Cow::Borrowed(&self.weight),
            Attribute::Hinted => Cow::Borrowed(if self.hinted { "true" } else { "false" }),
            Attribute::Vendor => Cow::Borrowed(&self.vendor),
            Attribute::Version => Cow::Borrowed(&self.version),
        }
    }

    /// Short human label, falling back to the family name when no filename is known.
    pub fn label(&self) -> &str {
        if self.filename.is_empty() {
            if self.name.is_empty() {
                "(unnamed)"
            } else {
                &self.name
            }
        } else {
            &self.filename
        }
    }
}

/// The nine metadata fields a condition may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Filename,
    Name,
    Style,
    Script,
    Variant,
    Weight,
    Hinted,
    Vendor,
    Version,
}

impl Attribute {
    pub const COUNT: usize = 9;

    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::Filename,
        Attribute::Name,
        Attribute::Style,
        Attribute::Script,
        Attribute::Variant,
        Attribute::Weight,
        Attribute::Hinted,
        Attribute::Vendor,
        Attribute::Version,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Filename => "filename",
            Attribute::Name => "name",
            Attribute::Style => "style",
            Attribute::Script => "script",
            Attribute::Variant => "variant",
            Attribute::Weight => "weight",
            Attribute::Hinted => "hinted",
            Attribute::Vendor => "vendor",
            Attribute::Version => "version",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.as_str() == raw)
            .ok_or_else(|| Error::UnknownAttribute(raw.to_string()))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse font records from a JSON array, a single JSON object, or NDJSON.
pub fn parse_font_infos(input: &str) -> Result<Vec<FontInfo>> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("parsing font metadata array");
    }

    if let Ok(single) = serde_json::from_str::<FontInfo>(trimmed) {
        return Ok(vec![single]);
    }

    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("parsing font metadata on line {}", idx + 1))
        })
        .collect()
}
