//! Error taxonomy for spec and catalog loading (made by FontLab https://www.fontlab.com/)

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A spec line failed to parse; `source` carries the underlying cause.
    #[error("line {line}: {source} (in '{text}')")]
    Parse {
        line: usize,
        text: String,
        #[source]
        source: Box<Error>,
    },
    #[error("could not parse '{0}'")]
    MalformedLine(String),
    #[error("unknown font attribute: {0}")]
    UnknownAttribute(String),
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
    #[error("operand is not a number: {0}")]
    InvalidNumber(String),
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unknown tag: {0}")]
    UnknownTag(String),
    #[error("malformed catalog at line {line}: {reason} ('{text}')")]
    MalformedCatalog {
        line: usize,
        text: String,
        reason: &'static str,
    },
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Attach the offending line to a parse-time failure.
    pub(crate) fn at_line(self, line: usize, text: &str) -> Self {
        Error::Parse {
            line,
            text: text.to_string(),
            source: Box::new(self),
        }
    }

    /// Peel off the line wrapper, if any.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Parse { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
