use std::fmt;

use thiserror::Error;

/// A single broken validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `recurring.monthly.by_day`.
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one validation pass, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Whether any violation was reported against `field`.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// All errors produced by cadence.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ScheduleError {
    /// The spec broke one or more validation rules.
    #[error("invalid schedule: {0}")]
    Invalid(Violations),

    /// A valid spec whose bounded schedule is empty.
    #[error("no next execution found")]
    NoOccurrence,

    /// The spec's discriminants do not map to any generator.
    #[error("configuration combination not supported: {0}")]
    Unsupported(String),

    /// The offset resolver could not place a wall-clock time.
    #[error("cannot resolve offset in '{timezone}': {message}")]
    Offset { timezone: String, message: String },

    /// Calendar arithmetic left jiff's supported range.
    #[error("{0}")]
    Eval(String),
}

impl ScheduleError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    pub fn offset(timezone: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Offset {
            timezone: timezone.into(),
            message: message.to_string(),
        }
    }

    pub fn eval(message: impl fmt::Display) -> Self {
        Self::Eval(message.to_string())
    }

    /// The violations carried by a validation failure, if this is one.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Invalid(v) => Some(v),
            _ => None,
        }
    }
}

impl From<jiff::Error> for ScheduleError {
    fn from(err: jiff::Error) -> Self {
        Self::eval(err)
    }
}
