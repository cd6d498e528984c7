//! JSONPath (RFC 9535) implementation.
//!
//! This crate provides parsing and evaluation of JSONPath expressions
//! as specified in [RFC 9535](https://www.rfc-editor.org/rfc/rfc9535.html).
//!
//! Two engines share the same semantics: [`JsonPathEval`] walks the AST on
//! every query, while [`JsonPathCodegen`] compiles a path once into a tree of
//! closures that can be run many times and shared between threads.
//!
//! # Example
//!
//! ```
//! use json_joy_json_path::{JsonPathCodegen, JsonPathEval, JsonPathParser};
//! use serde_json::json;
//!
//! // Parse a JSONPath expression
//! let path = JsonPathParser::parse("$.store.books[?@.price < 10].author").unwrap();
//!
//! // Evaluate against a JSON document
//! let doc = json!({
//!     "store": {
//!         "books": [
//!             {"author": "Nigel Rees", "price": 8.95},
//!             {"author": "Evelyn Waugh", "price": 12.99}
//!         ]
//!     }
//! });
//!
//! let results = JsonPathEval::eval_nodes(&path, &doc);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].data, &json!("Nigel Rees"));
//! assert_eq!(results[0].pointer(), "$['store']['books'][0]['author']");
//!
//! // Or compile it once and reuse it
//! let compiled = JsonPathCodegen::compile_path(&path);
//! assert_eq!(compiled.values(&doc), vec![&json!("Nigel Rees")]);
//! ```
//!
//! Parse errors carry the cursor position; evaluation never fails:
//!
//! ```
//! use json_joy_json_path::parse;
//!
//! let result = parse("$..");
//! assert!(!result.success);
//! assert_eq!(result.position, Some(3));
//! ```

mod types;
pub use types::*;

mod ast;
pub use ast::Ast;

mod parser;
pub use parser::{JsonPathParser, ParseError, ParseErrorKind};

mod operand;
pub use operand::FilterValue;

mod functions;
mod select;
pub use select::slice_indices;

mod eval;
pub use eval::JsonPathEval;

mod value;
pub use value::{PathStep, ValueNode};

mod util;
pub use util::{get_accessed_properties, json_path_equals, json_path_to_string};

mod codegen;
pub use codegen::{JsonPathCodegen, JsonPathCompiledFn};

use serde_json::Value;

/// A path given either as text or as an already parsed AST.
#[derive(Debug, Clone, Copy)]
pub enum PathInput<'p> {
    Text(&'p str),
    Ast(&'p JSONPath),
}

impl<'p> From<&'p str> for PathInput<'p> {
    fn from(value: &'p str) -> Self {
        Self::Text(value)
    }
}

impl<'p> From<&'p String> for PathInput<'p> {
    fn from(value: &'p String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'p> From<&'p JSONPath> for PathInput<'p> {
    fn from(value: &'p JSONPath) -> Self {
        Self::Ast(value)
    }
}

/// Parse a path into the record-shaped [`ParseResult`].
pub fn parse(text: &str) -> ParseResult {
    JsonPathParser::parse_result(text)
}

/// Evaluate a path string or AST against `data`.
///
/// Only a path string can fail, and only at parse time.
pub fn evaluate<'p, 'a>(path: impl Into<PathInput<'p>>, data: &'a Value) -> Result<Vec<ValueNode<'a>>, ParseError> {
    match path.into() {
        PathInput::Text(text) => JsonPathEval::run(text, data),
        PathInput::Ast(ast) => Ok(JsonPathEval::eval_nodes(ast, data)),
    }
}

/// Compile a parsed path into a reusable matcher.
pub fn compile(path: &JSONPath) -> JsonPathCompiledFn {
    JsonPathCodegen::compile_path(path)
}
