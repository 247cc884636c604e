//! Extra filters applied by an existence check.
//!
//! A comparison value may carry a leading operator (`">=10"`, `"!=draft"`);
//! a bare value means equality. Lists match any of their members.

use std::cmp::Ordering;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConditionError {
    #[error("Invalid column name: {0:?} (expected letters, digits and underscores)")]
    InvalidColumn(String),

    #[error("Value list for column {0} is empty")]
    EmptyList(String),

    #[error("Expected COLUMN=VALUE, got {0:?}")]
    MissingAssignment(String),
}

/// Comparison operator of a [`Matcher::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl Operator {
    /// Longest prefixes first so `>=` wins over `>`.
    const PREFIXES: [(&'static str, Operator); 6] = [
        (">=", Operator::GtEq),
        ("<=", Operator::LtEq),
        ("!=", Operator::NotEq),
        (">", Operator::Gt),
        ("<", Operator::Lt),
        ("=", Operator::Eq),
    ];

    /// Splits a leading operator off `value`, defaulting to [`Operator::Eq`].
    ///
    /// ```
    /// use textfmt::unique::Operator;
    ///
    /// assert_eq!(Operator::split_prefix(">=10"), (Operator::GtEq, "10"));
    /// assert_eq!(Operator::split_prefix("draft"), (Operator::Eq, "draft"));
    /// ```
    pub fn split_prefix(value: &str) -> (Operator, &str) {
        Self::PREFIXES
            .iter()
            .find_map(|(prefix, op)| value.strip_prefix(*prefix).map(|rest| (*op, rest)))
            .unwrap_or((Operator::Eq, value))
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::GtEq => ">=",
            Operator::LtEq => "<=",
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::NotEq => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Lt => ordering == Ordering::Less,
            Operator::GtEq => ordering != Ordering::Less,
            Operator::LtEq => ordering != Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Compare(Operator, String),
    AnyOf(Vec<String>),
}

/// One extra filter: `column` must satisfy `matcher`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    column: String,
    matcher: Matcher,
}

impl Condition {
    /// Builds a comparison, reading an operator prefix from `value`.
    pub fn parse(column: &str, value: &str) -> Result<Self, ConditionError> {
        let (op, operand) = Operator::split_prefix(value);
        Self::new(column, Matcher::Compare(op, operand.to_string()))
    }

    /// Builds a filter matching any of `values`.
    pub fn any_of<I, S>(column: &str, values: I) -> Result<Self, ConditionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ConditionError::EmptyList(column.to_string()));
        }
        Self::new(column, Matcher::AnyOf(values))
    }

    pub fn new(column: &str, matcher: Matcher) -> Result<Self, ConditionError> {
        if !is_identifier(column) {
            return Err(ConditionError::InvalidColumn(column.to_string()));
        }
        Ok(Self {
            column: column.to_string(),
            matcher,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Evaluates the filter against a stored value.
    ///
    /// Values that both parse as numbers are compared numerically, everything
    /// else lexically.
    pub fn matches(&self, stored: &str) -> bool {
        match &self.matcher {
            Matcher::Compare(op, operand) => op.accepts(compare_values(stored, operand)),
            Matcher::AnyOf(values) => values.iter().any(|v| v == stored),
        }
    }
}

/// Parses `COLUMN=VALUE`, where `VALUE` may carry an operator prefix.
///
/// ```
/// use textfmt::unique::{Condition, Matcher, Operator};
///
/// let condition: Condition = "views=>=10".parse().unwrap();
/// assert_eq!(condition.column(), "views");
/// assert_eq!(condition.matcher(), &Matcher::Compare(Operator::GtEq, "10".to_string()));
/// ```
impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = s
            .split_once('=')
            .ok_or_else(|| ConditionError::MissingAssignment(s.to_string()))?;
        Self::parse(column.trim(), value)
    }
}

fn compare_values(left: &str, right: &str) -> Ordering {
    match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => left.cmp(right),
    }
}

/// Whether `name` is safe to splice into SQL as a bare identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
