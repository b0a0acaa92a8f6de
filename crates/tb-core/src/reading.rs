//! Value-or-sentinel outcome for summary metrics.
//!
//! A metric is either a number, never computed for this run
//! (`NotApplicable`), or computed but the event did not occur inside the
//! recording (`NotObserved`). Neither sentinel is ever coerced to zero.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "snake_case"))]
pub enum Reading<T> {
    Value(T),
    NotApplicable,
    NotObserved,
}

impl<T> Reading<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Reading::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Reading::Value(_))
    }

    pub fn as_ref(&self) -> Reading<&T> {
        match self {
            Reading::Value(v) => Reading::Value(v),
            Reading::NotApplicable => Reading::NotApplicable,
            Reading::NotObserved => Reading::NotObserved,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Reading::Value(v) => Reading::Value(f(v)),
            Reading::NotApplicable => Reading::NotApplicable,
            Reading::NotObserved => Reading::NotObserved,
        }
    }

    /// Combine two readings; a `NotApplicable` side wins over `NotObserved`.
    pub fn zip<U>(self, other: Reading<U>) -> Reading<(T, U)> {
        match (self, other) {
            (Reading::Value(a), Reading::Value(b)) => Reading::Value((a, b)),
            (Reading::NotApplicable, _) | (_, Reading::NotApplicable) => Reading::NotApplicable,
            _ => Reading::NotObserved,
        }
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Reading::Value(v),
            None => Reading::NotApplicable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => v.fmt(f),
            Reading::NotApplicable => f.write_str("N/A"),
            Reading::NotObserved => f.write_str("not observed"),
        }
    }
}
