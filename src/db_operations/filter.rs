//! Document filters used by `find`, `count`, `distinct` and `Match` stages.

use serde_json::Value;
use std::cmp::Ordering;

/// One predicate on a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value
    Eq { field: String, value: Value },
    /// Field lies inside the inclusive bounds; an absent bound is open
    Range {
        field: String,
        gte: Option<Value>,
        lte: Option<Value>,
    },
}

/// Conjunction of conditions. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Inclusive range `gte <= field <= lte`.
    pub fn between(mut self, field: &str, gte: impl Into<Value>, lte: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Range {
            field: field.to_string(),
            gte: Some(gte.into()),
            lte: Some(lte.into()),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Combine two filters into one requiring both.
    pub fn and(mut self, other: Filter) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

impl Condition {
    fn matches(&self, document: &Value) -> bool {
        match self {
            Condition::Eq { field, value } => match document.get(field) {
                Some(actual) => values_equal(actual, value),
                None => false,
            },
            Condition::Range { field, gte, lte } => {
                let Some(actual) = document.get(field) else {
                    return false;
                };
                let above = match gte {
                    Some(bound) => matches!(
                        compare_values(actual, bound),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                    None => true,
                };
                let below = match lte {
                    Some(bound) => matches!(
                        compare_values(actual, bound),
                        Some(Ordering::Less | Ordering::Equal)
                    ),
                    None => true,
                };
                above && below
            }
        }
    }
}

/// Order two values of the same kind. Strings compare lexically and numbers
/// numerically; values of different kinds are incomparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Some(Ordering::Equal) || a == b
}
