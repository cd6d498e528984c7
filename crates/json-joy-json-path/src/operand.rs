//! Filter operands and comparison semantics.
//!
//! Shared by the tree-walking evaluator and the compiler so the two cannot
//! drift apart on equality, ordering or truthiness.

use crate::types::ComparisonOperator;
use serde_json::Value;

/// Result of evaluating a value expression or a function inside a filter.
///
/// `Nothing` is the absence of a value and is distinct from JSON `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue<'a> {
    Nothing,
    /// A value borrowed from the queried document.
    Node(&'a Value),
    /// A literal or a computed function result.
    Owned(Value),
    /// A sub-path that matched more than one node.
    Nodes(Vec<&'a Value>),
}

impl<'a> FilterValue<'a> {
    /// Collapses a sub-path result: no match is `Nothing`, a single match is
    /// the matched value itself, anything else is the node list.
    pub fn from_nodes(mut values: Vec<&'a Value>) -> Self {
        match values.len() {
            0 => FilterValue::Nothing,
            1 => FilterValue::Node(values.remove(0)),
            _ => FilterValue::Nodes(values),
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, FilterValue::Nothing)
    }

    /// The single JSON value held, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FilterValue::Node(v) => Some(v),
            FilterValue::Owned(v) => Some(v),
            _ => None,
        }
    }

    /// Coerces the result of a function used directly as a test.
    pub fn is_truthy(&self) -> bool {
        match self {
            FilterValue::Nothing => false,
            FilterValue::Nodes(list) => !list.is_empty(),
            FilterValue::Node(v) => json_truthy(v),
            FilterValue::Owned(v) => json_truthy(v),
        }
    }

    /// Unwraps a one-element array (or node list) to its sole element.
    pub(crate) fn unwrap_single(&self) -> Term<'_> {
        match self {
            FilterValue::Nothing => Term::Nothing,
            FilterValue::Nodes(list) if list.len() == 1 => Term::One(list[0]),
            FilterValue::Nodes(list) => Term::Many(list),
            FilterValue::Node(v) => Term::from_json(v),
            FilterValue::Owned(v) => Term::from_json(v),
        }
    }
}

fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// An operand after single-element unwrapping.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Term<'b> {
    Nothing,
    One(&'b Value),
    Many(&'b [&'b Value]),
}

impl<'b> Term<'b> {
    fn from_json(value: &'b Value) -> Self {
        match value {
            Value::Array(items) if items.len() == 1 => Term::One(&items[0]),
            _ => Term::One(value),
        }
    }

    /// The string held, if this is a single string.
    pub(crate) fn as_str(&self) -> Option<&'b str> {
        match *self {
            Term::One(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Evaluates `left <op> right`.
///
/// A comparison involving `Nothing` is false, except `==` between two
/// `Nothing` operands.
pub fn compare(operator: ComparisonOperator, left: &FilterValue<'_>, right: &FilterValue<'_>) -> bool {
    if left.is_nothing() || right.is_nothing() {
        return operator == ComparisonOperator::Equal && left.is_nothing() && right.is_nothing();
    }
    match operator {
        ComparisonOperator::Equal => equal(left, right),
        ComparisonOperator::NotEqual => !equal(left, right),
        ComparisonOperator::Less => less(left, right),
        ComparisonOperator::LessEqual => less(left, right) || equal(left, right),
        ComparisonOperator::Greater => less(right, left),
        ComparisonOperator::GreaterEqual => less(right, left) || equal(left, right),
    }
}

/// Structural equality between two filter operands.
pub fn equal(left: &FilterValue<'_>, right: &FilterValue<'_>) -> bool {
    match (left.unwrap_single(), right.unwrap_single()) {
        (Term::Nothing, Term::Nothing) => true,
        (Term::Nothing, _) | (_, Term::Nothing) => false,
        (Term::One(a), Term::One(b)) => json_equal(a, b),
        (Term::Many(a), Term::Many(b)) => seq_equal(a.iter().copied(), a.len(), b.iter().copied(), b.len()),
        (Term::Many(a), Term::One(Value::Array(b))) => {
            seq_equal(a.iter().copied(), a.len(), b.iter(), b.len())
        }
        (Term::One(Value::Array(a)), Term::Many(b)) => {
            seq_equal(a.iter(), a.len(), b.iter().copied(), b.len())
        }
        _ => false,
    }
}

/// `<`, defined between two numbers or two strings only.
pub fn less(left: &FilterValue<'_>, right: &FilterValue<'_>) -> bool {
    match (left.as_json(), right.as_json()) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        },
        (Some(Value::String(a)), Some(Value::String(b))) => a < b,
        _ => false,
    }
}

/// Deep equality over JSON values; numbers compare by numeric value, object
/// members regardless of order.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => seq_equal(a.iter(), a.len(), b.iter(), b.len()),
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, value)| match b.get(key) {
                    Some(other) => json_equal(value, other),
                    None => false,
                })
        }
        _ => false,
    }
}

fn seq_equal<'x, 'y>(
    a: impl Iterator<Item = &'x Value>,
    a_len: usize,
    b: impl Iterator<Item = &'y Value>,
    b_len: usize,
) -> bool {
    a_len == b_len && a.zip(b).all(|(x, y)| json_equal(x, y))
}
