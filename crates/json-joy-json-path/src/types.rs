//! JSONPath types and interfaces based on RFC 9535.
//!
//! AST nodes are built once by the parser (or by [`crate::Ast`]) and are
//! read-only afterwards, so a parsed path can be shared between threads and
//! evaluated any number of times.

use serde_json::Value;

/// Selector types for JSONPath.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Named selector for property access: `.name`, `['key']`
    Name(String),
    /// Index selector for array element access: `[0]`, `[-1]`
    Index(i64),
    /// Slice selector for array slicing: `[start:end:step]`
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: Option<i64>,
    },
    /// Wildcard selector for selecting all elements: `.*`, `[*]`
    Wildcard,
    /// Filter expression for conditional selection: `[?(@.price < 10)]`
    Filter(FilterExpression),
    /// Recursive descent (`..`), applies the wrapped selector to the node
    /// and every one of its descendants.
    RecursiveDescent(Box<Selector>),
}

impl Selector {
    /// Whether this selector is a `..` descent.
    pub fn is_recursive(&self) -> bool {
        matches!(self, Selector::RecursiveDescent(_))
    }
}

/// Path segment containing one or more selectors (a union).
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    /// Selectors in this segment, evaluated in order.
    pub selectors: Vec<Selector>,
}

impl PathSegment {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }

    /// Whether this is a recursive descent segment (`..`).
    pub fn is_recursive(&self) -> bool {
        !self.selectors.is_empty() && self.selectors.iter().all(Selector::is_recursive)
    }
}

/// Complete JSONPath expression.
#[derive(Debug, Clone, PartialEq)]
pub struct JSONPath {
    /// Path segments.
    pub segments: Vec<PathSegment>,
}

impl JSONPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

/// Node a filter sub-path starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAnchor {
    /// `@`, the candidate under test.
    Current,
    /// `$`, the document root of the running query.
    Root,
}

/// Filter expression types.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    /// Comparison expression: `@.price < 10`
    Comparison {
        operator: ComparisonOperator,
        left: ValueExpression,
        right: ValueExpression,
    },
    /// Logical expression: `@.a && @.b`
    Logical {
        operator: LogicalOperator,
        left: Box<FilterExpression>,
        right: Box<FilterExpression>,
    },
    /// Existence test: `@.name`
    Existence { anchor: PathAnchor, path: JSONPath },
    /// Function call used as a test: `length(@)`
    Function {
        name: String,
        args: Vec<FunctionArg>,
    },
    /// Parenthesized expression: `(@.a || @.b)`
    Paren(Box<FilterExpression>),
    /// Negation: `!@.flag`
    Negation(Box<FilterExpression>),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterEqual => ">=",
        }
    }
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And, // &&
    Or,  // ||
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }
}

/// Value expressions in filters.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpression {
    /// Current node: `@`
    Current,
    /// Root node: `$`
    Root,
    /// Literal value: `"string"`, `42`, `true`, `null`
    Literal(Value),
    /// Path expression: `@.name`, `$.threshold`
    Path { anchor: PathAnchor, path: JSONPath },
    /// Function call: `length(@)`
    Function {
        name: String,
        args: Vec<FunctionArg>,
    },
}

/// Function argument types.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArg {
    Value(ValueExpression),
    Filter(FilterExpression),
    /// Node-list argument relative to the current node.
    Path(JSONPath),
}

/// Parse outcome in record form: `{ success, path?, error?, position? }`.
///
/// See [`crate::JsonPathParser::parse_result`]; most Rust callers want
/// [`crate::JsonPathParser::parse`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub success: bool,
    pub path: Option<JSONPath>,
    pub error: Option<String>,
    pub position: Option<usize>,
}

impl ParseResult {
    /// Converts back to a `Result`, with the error message on failure.
    pub fn into_result(self) -> Result<JSONPath, String> {
        match self.path {
            Some(path) if self.success => Ok(path),
            _ => Err(self
                .error
                .unwrap_or_else(|| "unknown parse error".to_string())),
        }
    }
}
