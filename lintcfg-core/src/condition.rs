//! Font conditions: per-attribute predicates over `FontInfo` (made by FontLab https://www.fontlab.com/)

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{Error, Result};
use crate::font::{Attribute, FontInfo};

/// Operator symbols accepted in a condition line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Less,
    LessEq,
    Equal,
    NotEqual,
    GreaterEq,
    Greater,
    Is,
    In,
    Like,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Less => "<",
            Operator::LessEq => "<=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterEq => ">=",
            Operator::Greater => ">",
            Operator::Is => "is",
            Operator::In => "in",
            Operator::Like => "like",
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        Ok(match raw {
            "<" => Operator::Less,
            "<=" => Operator::LessEq,
            "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            ">=" => Operator::GreaterEq,
            ">" => Operator::Greater,
            "is" => Operator::Is,
            "in" => Operator::In,
            "like" => Operator::Like,
            other => return Err(Error::UnknownOperator(other.to_string())),
        })
    }
}

/// Regular expression anchored at the start of the value, keeping its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self> {
        let invalid = |err| Error::InvalidPattern {
            pattern: source.to_string(),
            source: err,
        };
        // the bare pattern must stand on its own before it is wrapped in the anchor group
        Regex::new(source).map_err(invalid)?;
        let regex = Regex::new(&format!("^(?:{source})")).map_err(invalid)?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// An operator together with its precomputed operand.
#[derive(Debug, Clone)]
pub enum Predicate {
    Less(f64),
    LessEq(f64),
    Equal(f64),
    NotEqual(f64),
    GreaterEq(f64),
    Greater(f64),
    Is(String),
    In(BTreeSet<String>),
    Like(Pattern),
}

impl Predicate {
    pub fn new(op: Operator, operand: &str) -> Result<Self> {
        let number = || {
            operand
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidNumber(operand.to_string()))
        };

        Ok(match op {
            Operator::Less => Predicate::Less(number()?),
            Operator::LessEq => Predicate::LessEq(number()?),
            Operator::Equal => Predicate::Equal(number()?),
            Operator::NotEqual => Predicate::NotEqual(number()?),
            Operator::GreaterEq => Predicate::GreaterEq(number()?),
            Operator::Greater => Predicate::Greater(number()?),
            Operator::Is => Predicate::Is(operand.to_string()),
            Operator::In => Predicate::In(operand.split(',').map(str::to_string).collect()),
            Operator::Like => Predicate::Like(Pattern::new(operand)?),
        })
    }

    pub fn operator(&self) -> Operator {
        match self {
            Predicate::Less(_) => Operator::Less,
            Predicate::LessEq(_) => Operator::LessEq,
            Predicate::Equal(_) => Operator::Equal,
            Predicate::NotEqual(_) => Operator::NotEqual,
            Predicate::GreaterEq(_) => Operator::GreaterEq,
            Predicate::Greater(_) => Operator::Greater,
            Predicate::Is(_) => Operator::Is,
            Predicate::In(_) => Operator::In,
            Predicate::Like(_) => Operator::Like,
        }
    }

    /// Evaluate against a field value. Numeric comparisons reject values that are not numbers.
    pub fn test(&self, value: &str) -> bool {
        let numeric = |cmp: fn(f64, f64) -> bool, rhs: f64| {
            value
                .trim()
                .parse::<f64>()
                .map(|lhs| cmp(lhs, rhs))
                .unwrap_or(false)
        };

        match self {
            Predicate::Less(rhs) => numeric(|a, b| a < b, *rhs),
            Predicate::LessEq(rhs) => numeric(|a, b| a <= b, *rhs),
            Predicate::Equal(rhs) => numeric(|a, b| a == b, *rhs),
            Predicate::NotEqual(rhs) => numeric(|a, b| a != b, *rhs),
            Predicate::GreaterEq(rhs) => numeric(|a, b| a >= b, *rhs),
            Predicate::Greater(rhs) => numeric(|a, b| a > b, *rhs),
            Predicate::Is(rhs) => value == rhs,
            Predicate::In(set) => set.contains(value),
            Predicate::Like(pattern) => pattern.matches(value),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.operator().symbol())?;
        match self {
            Predicate::Less(n)
            | Predicate::LessEq(n)
            | Predicate::Equal(n)
            | Predicate::NotEqual(n)
            | Predicate::GreaterEq(n)
            | Predicate::Greater(n) => write!(f, "{n}"),
            Predicate::Is(text) => f.write_str(text),
            Predicate::In(set) => {
                let joined: Vec<&str> = set.iter().map(String::as_str).collect();
                match joined.join(",") {
                    // a set holding only the empty string
                    text if text.is_empty() => f.write_str(","),
                    text => f.write_str(&text),
                }
            }
            Predicate::Like(pattern) => f.write_str(pattern.as_str()),
        }
    }
}

/// What a condition demands of one attribute.
#[derive(Debug, Clone, Default)]
pub enum Constraint {
    #[default]
    Absent,
    Equals(String),
    Compare(Predicate),
}

impl Constraint {
    pub fn is_absent(&self) -> bool {
        matches!(self, Constraint::Absent)
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Constraint::Absent => true,
            Constraint::Equals(expected) => value == expected,
            Constraint::Compare(predicate) => predicate.test(value),
        }
    }
}

/// A conjunction of per-attribute constraints; an empty matcher accepts every font.
#[derive(Debug, Clone, Default)]
pub struct ConditionMatcher {
    constraints: [Constraint; Attribute::COUNT],
}

impl ConditionMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constraint(&self, attr: Attribute) -> &Constraint {
        &self.constraints[attr.index()]
    }

    pub fn is_unconstrained(&self) -> bool {
        self.constraints.iter().all(Constraint::is_absent)
    }

    /// Refine one attribute.
    ///
    /// `*` clears the constraint. Without an operand the token itself is the value to
    /// equal (`vendor Monotype`). Otherwise the token must be an operator symbol.
    pub fn set_constraint(
        &mut self,
        attr_name: &str,
        token: &str,
        operand: Option<&str>,
    ) -> Result<()> {
        let attr: Attribute = attr_name.parse()?;
        let slot = &mut self.constraints[attr.index()];

        if token == "*" {
            *slot = Constraint::Absent;
            return Ok(());
        }

        *slot = match operand.filter(|text| !text.is_empty()) {
            None => Constraint::Equals(token.to_string()),
            Some(text) => {
                let op: Operator = token.parse()?;
                Constraint::Compare(Predicate::new(op, text)?)
            }
        };
        Ok(())
    }

    /// Apply a `<attribute> <token> [<operand>]` line.
    pub fn modify_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        let malformed = || Error::MalformedLine(line.to_string());
        let (attr_name, rest) = split_token(line).ok_or_else(malformed)?;
        let (token, operand) = split_token(rest).ok_or_else(malformed)?;
        let operand = operand.trim();
        self.set_constraint(attr_name, token, (!operand.is_empty()).then_some(operand))
    }

    pub fn accepts(&self, font: &FontInfo) -> bool {
        Attribute::ALL.into_iter().all(|attr| {
            let constraint = self.constraint(attr);
            constraint.is_absent() || constraint.accepts(&font.value(attr))
        })
    }
}

/// Split off the leading whitespace-delimited token, returning it and the untrimmed remainder.
fn split_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.find(char::is_whitespace) {
        Some(end) => Some((&text[..end], &text[end..])),
        None => Some((text, "")),
    }
}

impl fmt::Display for ConditionMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in Attribute::ALL {
            match self.constraint(attr) {
                Constraint::Absent => {}
                Constraint::Equals(value) => writeln!(f, "{attr} {value}")?,
                Constraint::Compare(predicate) => writeln!(f, "{attr} {predicate}")?,
            }
        }
        Ok(())
    }
}
