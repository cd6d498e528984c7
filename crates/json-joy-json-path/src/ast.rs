//! AST construction helpers.

use crate::types::*;
use serde_json::Value;

/// Helper functions for constructing JSONPath AST nodes.
pub struct Ast;

impl Ast {
    /// Create a JSONPath from segments.
    pub fn path(segments: Vec<PathSegment>) -> JSONPath {
        JSONPath::new(segments)
    }

    /// Create a child segment from selectors.
    pub fn segment(selectors: Vec<Selector>) -> PathSegment {
        PathSegment::new(selectors)
    }

    /// Create a `..` segment; every selector is wrapped in a descent.
    pub fn descendant_segment(selectors: Vec<Selector>) -> PathSegment {
        PathSegment::new(selectors.into_iter().map(Self::recursive_descent).collect())
    }

    /// Create a named selector.
    pub fn name(name: impl Into<String>) -> Selector {
        Selector::Name(name.into())
    }

    /// Create an index selector.
    pub fn index(index: i64) -> Selector {
        Selector::Index(index)
    }

    /// Create a slice selector.
    pub fn slice(start: Option<i64>, end: Option<i64>, step: Option<i64>) -> Selector {
        Selector::Slice { start, end, step }
    }

    /// Create a wildcard selector.
    pub fn wildcard() -> Selector {
        Selector::Wildcard
    }

    /// Create a filter selector.
    pub fn filter(expr: FilterExpression) -> Selector {
        Selector::Filter(expr)
    }

    pub fn recursive_descent(selector: Selector) -> Selector {
        Selector::RecursiveDescent(Box::new(selector))
    }

    /// Create a comparison expression.
    pub fn comparison(
        operator: ComparisonOperator,
        left: ValueExpression,
        right: ValueExpression,
    ) -> FilterExpression {
        FilterExpression::Comparison { operator, left, right }
    }

    /// Create a logical expression.
    pub fn logical(
        operator: LogicalOperator,
        left: FilterExpression,
        right: FilterExpression,
    ) -> FilterExpression {
        FilterExpression::Logical {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create an existence test.
    pub fn existence(anchor: PathAnchor, path: JSONPath) -> FilterExpression {
        FilterExpression::Existence { anchor, path }
    }

    /// Create a function call used as a test.
    pub fn function(name: impl Into<String>, args: Vec<FunctionArg>) -> FilterExpression {
        FilterExpression::Function {
            name: name.into(),
            args,
        }
    }

    pub fn paren(expr: FilterExpression) -> FilterExpression {
        FilterExpression::Paren(Box::new(expr))
    }

    pub fn negation(expr: FilterExpression) -> FilterExpression {
        FilterExpression::Negation(Box::new(expr))
    }

    /// Create a current node expression.
    pub fn current() -> ValueExpression {
        ValueExpression::Current
    }

    /// Create a root node expression.
    pub fn root() -> ValueExpression {
        ValueExpression::Root
    }

    /// Create a literal expression.
    pub fn literal(value: Value) -> ValueExpression {
        ValueExpression::Literal(value)
    }

    /// Create a path value expression, `@…` or `$…`.
    pub fn path_value(anchor: PathAnchor, path: JSONPath) -> ValueExpression {
        ValueExpression::Path { anchor, path }
    }

    /// Create a function call value expression.
    pub fn call(name: impl Into<String>, args: Vec<FunctionArg>) -> ValueExpression {
        ValueExpression::Function {
            name: name.into(),
            args,
        }
    }
}
