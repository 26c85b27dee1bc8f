//! Aggregation pipelines: ordered filter / group / sort / limit stages
//! evaluated over the documents of one collection.

use super::filter::{compare_values, Filter};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Output field holding the group key, mirroring document-store convention.
pub const GROUP_ID: &str = "_id";

/// Numeric value flowing through accumulators. Integer arithmetic is kept
/// until a float is involved or an integer operation overflows.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn from_value(value: &Value) -> Option<Self> {
        let Value::Number(number) = value else {
            return None;
        };
        match number.as_i64() {
            Some(i) => Some(Num::Int(i)),
            None => number.as_f64().map(Num::Float),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    fn add(self, other: Num) -> Num {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => a
                .checked_add(b)
                .map(Num::Int)
                .unwrap_or(Num::Float(a as f64 + b as f64)),
            (a, b) => Num::Float(a.as_f64() + b.as_f64()),
        }
    }

    fn mul(self, other: Num) -> Num {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => a
                .checked_mul(b)
                .map(Num::Int)
                .unwrap_or(Num::Float(a as f64 * b as f64)),
            (a, b) => Num::Float(a.as_f64() * b.as_f64()),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(i) => Value::from(i),
            Num::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        }
    }
}

/// Expression evaluated against a single input document.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Field(String),
    Multiply(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn field(name: &str) -> Self {
        Expr::Field(name.to_string())
    }

    pub fn multiply(a: Expr, b: Expr) -> Self {
        Expr::Multiply(Box::new(a), Box::new(b))
    }

    /// `None` when a referenced field is absent or not numeric.
    fn eval(&self, document: &Value) -> Option<Num> {
        match self {
            Expr::Field(name) => document.get(name).and_then(Num::from_value),
            Expr::Multiply(a, b) => Some(a.eval(document)?.mul(b.eval(document)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Sum of the expression; documents where it is not numeric are skipped
    Sum(Expr),
    /// Number of documents in the group
    Count,
}

/// Grouping stage. `key: None` folds every input document into one group.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: Option<String>,
    accumulators: Vec<(String, Accumulator)>,
}

impl Group {
    pub fn by(field: &str) -> Self {
        Self {
            key: Some(field.to_string()),
            accumulators: Vec::new(),
        }
    }

    pub fn all() -> Self {
        Self {
            key: None,
            accumulators: Vec::new(),
        }
    }

    pub fn accumulate(mut self, output: &str, accumulator: Accumulator) -> Self {
        self.accumulators.push((output.to_string(), accumulator));
        self
    }

    fn run(&self, documents: Vec<Value>) -> Vec<Value> {
        // groups keep first-seen order; callers must not rely on it
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(Value, Vec<Num>)> = Vec::new();

        for document in &documents {
            let key = match &self.key {
                Some(field) => document.get(field).cloned().unwrap_or(Value::Null),
                None => Value::Null,
            };
            let slot = *slots.entry(key.to_string()).or_insert_with(|| {
                groups.push((key.clone(), vec![Num::Int(0); self.accumulators.len()]));
                groups.len() - 1
            });
            let totals = &mut groups[slot].1;
            for (total, (_, accumulator)) in totals.iter_mut().zip(&self.accumulators) {
                match accumulator {
                    Accumulator::Sum(expr) => {
                        if let Some(n) = expr.eval(document) {
                            *total = total.add(n);
                        }
                    }
                    Accumulator::Count => *total = total.add(Num::Int(1)),
                }
            }
        }

        groups
            .into_iter()
            .map(|(key, totals)| {
                let mut out = Map::new();
                out.insert(GROUP_ID.to_string(), key);
                for ((name, _), total) in self.accumulators.iter().zip(totals) {
                    out.insert(name.clone(), total.into_value());
                }
                Value::Object(out)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    Group(Group),
    Sort { field: String, descending: bool },
    Limit(usize),
}

impl Stage {
    fn run(&self, documents: Vec<Value>) -> Vec<Value> {
        match self {
            Stage::Match(filter) => documents.into_iter().filter(|d| filter.matches(d)).collect(),
            Stage::Group(group) => group.run(documents),
            Stage::Sort { field, descending } => {
                let mut documents = documents;
                documents.sort_by(|a, b| {
                    let ordering = match (a.get(field), b.get(field)) {
                        (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
                        (Some(_), None) => Ordering::Greater,
                        (None, Some(_)) => Ordering::Less,
                        (None, None) => Ordering::Equal,
                    };
                    if *descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
                documents
            }
            Stage::Limit(n) => documents.into_iter().take(*n).collect(),
        }
    }
}

/// An ordered list of stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matching(mut self, filter: Filter) -> Self {
        self.stages.push(Stage::Match(filter));
        self
    }

    pub fn group(mut self, group: Group) -> Self {
        self.stages.push(Stage::Group(group));
        self
    }

    pub fn sort_desc(mut self, field: &str) -> Self {
        self.stages.push(Stage::Sort {
            field: field.to_string(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.stages.push(Stage::Limit(n));
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Split off a leading `Match` so stores can push it into their scan.
    pub fn split_leading_match(&self) -> (Filter, &[Stage]) {
        match self.stages.split_first() {
            Some((Stage::Match(filter), rest)) => (filter.clone(), rest),
            _ => (Filter::new(), &self.stages),
        }
    }

    /// Evaluate every stage over the given documents.
    pub fn execute(&self, documents: Vec<Value>) -> Vec<Value> {
        run_stages(&self.stages, documents)
    }
}

pub(crate) fn run_stages(stages: &[Stage], documents: Vec<Value>) -> Vec<Value> {
    stages
        .iter()
        .fold(documents, |documents, stage| stage.run(documents))
}
