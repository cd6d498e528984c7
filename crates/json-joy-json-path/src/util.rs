//! JSONPath utility helpers.
//!
//! Rendering goes through `Display`, and the text it produces parses back to
//! an equal AST for anything the parser itself produced.

use crate::parser::is_name_char;
use crate::types::*;
use crate::value::escape_normalized_name;
use std::fmt::{self, Display, Formatter, Write};

/// Convert JSONPath AST to string representation.
pub fn json_path_to_string(path: &JSONPath) -> String {
    path.to_string()
}

/// Compare two JSONPath ASTs for structural equality.
pub fn json_path_equals(path1: &JSONPath, path2: &JSONPath) -> bool {
    path1 == path2
}

/// Return property names explicitly referenced by name selectors, including
/// names under `..`. Names inside filters are not included.
pub fn get_accessed_properties(path: &JSONPath) -> Vec<String> {
    fn collect(selector: &Selector, properties: &mut Vec<String>) {
        match selector {
            Selector::Name(name) => properties.push(name.clone()),
            Selector::RecursiveDescent(inner) => collect(inner, properties),
            _ => {}
        }
    }

    let mut properties = Vec::new();
    for segment in &path.segments {
        for selector in &segment.selectors {
            collect(selector, &mut properties);
        }
    }
    properties
}

impl Display for JSONPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('$')?;
        write_segments(f, &self.segments)
    }
}

fn write_segments(f: &mut Formatter<'_>, segments: &[PathSegment]) -> fmt::Result {
    for segment in segments {
        write!(f, "{segment}")?;
    }
    Ok(())
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_recursive() {
            f.write_str("..")?;
            let inner: Vec<&Selector> = self
                .selectors
                .iter()
                .map(|selector| match selector {
                    Selector::RecursiveDescent(inner) => inner.as_ref(),
                    other => other,
                })
                .collect();
            return match inner.as_slice() {
                [Selector::Name(name)] if is_identifier(name) => f.write_str(name),
                [Selector::Wildcard] => f.write_char('*'),
                _ => write_bracket(f, inner.iter().copied()),
            };
        }
        match self.selectors.as_slice() {
            [Selector::Name(name)] if is_identifier(name) => write!(f, ".{name}"),
            [Selector::Wildcard] => f.write_str(".*"),
            _ => write_bracket(f, self.selectors.iter()),
        }
    }
}

fn write_bracket<'s>(f: &mut Formatter<'_>, selectors: impl IntoIterator<Item = &'s Selector>) -> fmt::Result {
    f.write_char('[')?;
    for (i, selector) in selectors.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{selector}")?;
    }
    f.write_char(']')
}

/// Renders a selector as it appears inside brackets.
impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name(name) => write_quoted(f, name),
            Selector::Index(index) => write!(f, "{index}"),
            Selector::Slice { start, end, step } => {
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                f.write_char(':')?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                if let Some(step) = step {
                    write!(f, ":{step}")?;
                }
                Ok(())
            }
            Selector::Wildcard => f.write_char('*'),
            Selector::Filter(expr) => write!(f, "?{expr}"),
            Selector::RecursiveDescent(inner) => write!(f, "..[{inner}]"),
        }
    }
}

fn write_quoted(f: &mut Formatter<'_>, name: &str) -> fmt::Result {
    let mut escaped = String::with_capacity(name.len() + 2);
    escaped.push('\'');
    escape_normalized_name(name, &mut escaped);
    escaped.push('\'');
    f.write_str(&escaped)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(is_name_char)
}

fn write_anchor(f: &mut Formatter<'_>, anchor: PathAnchor) -> fmt::Result {
    f.write_char(match anchor {
        PathAnchor::Current => '@',
        PathAnchor::Root => '$',
    })
}

/// Binding strength, used to decide where parentheses are needed.
fn precedence(expr: &FilterExpression) -> u8 {
    match expr {
        FilterExpression::Logical {
            operator: LogicalOperator::Or,
            ..
        } => 1,
        FilterExpression::Logical {
            operator: LogicalOperator::And,
            ..
        } => 2,
        _ => 3,
    }
}

fn write_operand(f: &mut Formatter<'_>, expr: &FilterExpression, min: u8) -> fmt::Result {
    if precedence(expr) < min {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

impl Display for FilterExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::Comparison { operator, left, right } => {
                write!(f, "{left} {} {right}", operator.as_str())
            }
            FilterExpression::Logical { operator, left, right } => {
                let own = precedence(self);
                write_operand(f, left, own)?;
                write!(f, " {} ", operator.as_str())?;
                write_operand(f, right, own + 1)
            }
            FilterExpression::Existence { anchor, path } => {
                write_anchor(f, *anchor)?;
                write_segments(f, &path.segments)
            }
            FilterExpression::Function { name, args } => write_call(f, name, args),
            FilterExpression::Paren(inner) => write!(f, "({inner})"),
            FilterExpression::Negation(inner) => {
                f.write_char('!')?;
                write_operand(f, inner, 3)
            }
        }
    }
}

impl Display for ValueExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValueExpression::Current => f.write_char('@'),
            ValueExpression::Root => f.write_char('$'),
            ValueExpression::Literal(value) => write!(f, "{value}"),
            ValueExpression::Path { anchor, path } => {
                write_anchor(f, *anchor)?;
                write_segments(f, &path.segments)
            }
            ValueExpression::Function { name, args } => write_call(f, name, args),
        }
    }
}

fn write_call(f: &mut Formatter<'_>, name: &str, args: &[FunctionArg]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match arg {
            FunctionArg::Value(expr) => write!(f, "{expr}")?,
            FunctionArg::Filter(expr) => write!(f, "{expr}")?,
            FunctionArg::Path(path) => {
                f.write_char('@')?;
                write_segments(f, &path.segments)?;
            }
        }
    }
    f.write_char(')')
}
