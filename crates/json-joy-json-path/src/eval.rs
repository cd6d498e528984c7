//! JSONPath evaluator.
//!
//! Walks the AST directly for every query. Each segment maps the current
//! node list to the next one; filters evaluate their expression tree against
//! each candidate.

use crate::functions;
use crate::operand::{compare, FilterValue};
use crate::parser::{JsonPathParser, ParseError};
use crate::select::*;
use crate::types::*;
use crate::value::ValueNode;
use serde_json::Value;
use std::rc::Rc;

/// JSONPath evaluator.
pub struct JsonPathEval;

impl JsonPathEval {
    /// Evaluate a JSONPath against a JSON document.
    ///
    /// Returns a vector of references to matching values.
    pub fn eval<'a>(path: &JSONPath, doc: &'a Value) -> Vec<&'a Value> {
        Self::eval_nodes(path, doc)
            .into_iter()
            .map(|node| node.data)
            .collect()
    }

    /// Evaluate a JSONPath, keeping the location of every match.
    pub fn eval_nodes<'a>(path: &JSONPath, doc: &'a Value) -> Vec<ValueNode<'a>> {
        log::trace!("evaluating JSONPath with {} segment(s)", path.segments.len());
        let evaluator = Evaluator { root: doc };
        into_results(evaluator.eval_path(path, Rc::new(ValueNode::root(doc)), true))
    }

    /// Parse and evaluate in one step.
    pub fn run<'a>(path: &str, doc: &'a Value) -> Result<Vec<ValueNode<'a>>, ParseError> {
        let path = JsonPathParser::parse(path)?;
        Ok(Self::eval_nodes(&path, doc))
    }
}

/// State of a single evaluation: the document `$` refers to.
struct Evaluator<'a> {
    root: &'a Value,
}

impl<'a> Evaluator<'a> {
    /// `query` is set only for the top-level query, whose first segment
    /// starts at the document root.
    fn eval_path(&self, path: &JSONPath, start: NodeRef<'a>, query: bool) -> Vec<NodeRef<'a>> {
        let mut current = vec![start];
        for (i, segment) in path.segments.iter().enumerate() {
            let at_root = query && i == 0;
            let mut next = Vec::new();
            for selector in &segment.selectors {
                for node in &current {
                    self.eval_selector(selector, node, at_root, &mut next);
                }
            }
            current = next;
        }
        current
    }

    fn eval_selector(
        &self,
        selector: &Selector,
        node: &NodeRef<'a>,
        at_root: bool,
        out: &mut Vec<NodeRef<'a>>,
    ) {
        match selector {
            Selector::Name(name) => select_name(node, name, out),
            Selector::Index(index) => select_index(node, *index, out),
            Selector::Wildcard => select_wildcard(node, out),
            Selector::Slice { start, end, step } => {
                if let Value::Array(items) = node.data {
                    select_slice(node, slice_indices(*start, *end, *step, items.len()), out);
                }
            }
            Selector::Filter(expr) => {
                for candidate in filter_candidates(node, at_root) {
                    if self.test(expr, candidate.data) {
                        out.push(candidate);
                    }
                }
            }
            Selector::RecursiveDescent(inner) => {
                let mut nodes = Vec::new();
                descendants(node, &mut nodes);
                for descendant in &nodes {
                    self.eval_selector(inner, descendant, false, out);
                }
            }
        }
    }

    fn test(&self, expr: &FilterExpression, current: &'a Value) -> bool {
        match expr {
            FilterExpression::Comparison { operator, left, right } => {
                let left = self.value(left, current);
                let right = self.value(right, current);
                compare(*operator, &left, &right)
            }
            FilterExpression::Logical { operator, left, right } => match operator {
                LogicalOperator::And => self.test(left, current) && self.test(right, current),
                LogicalOperator::Or => self.test(left, current) || self.test(right, current),
            },
            FilterExpression::Existence { anchor, path } => !self.sub_path(*anchor, path, current).is_empty(),
            FilterExpression::Function { name, args } => self.call(name, args, current).is_truthy(),
            FilterExpression::Paren(inner) => self.test(inner, current),
            FilterExpression::Negation(inner) => !self.test(inner, current),
        }
    }

    fn value(&self, expr: &ValueExpression, current: &'a Value) -> FilterValue<'a> {
        match expr {
            ValueExpression::Current => FilterValue::Node(current),
            ValueExpression::Root => FilterValue::Node(self.root),
            ValueExpression::Literal(value) => FilterValue::Owned(value.clone()),
            ValueExpression::Path { anchor, path } => FilterValue::from_nodes(self.sub_path(*anchor, path, current)),
            ValueExpression::Function { name, args } => self.call(name, args, current),
        }
    }

    fn call(&self, name: &str, args: &[FunctionArg], current: &'a Value) -> FilterValue<'a> {
        let args: Vec<FilterValue<'a>> = args
            .iter()
            .map(|arg| match arg {
                FunctionArg::Value(expr) => self.value(expr, current),
                FunctionArg::Filter(expr) => FilterValue::Owned(Value::Bool(self.test(expr, current))),
                FunctionArg::Path(path) => {
                    FilterValue::from_nodes(self.sub_path(PathAnchor::Current, path, current))
                }
            })
            .collect();
        functions::call(name, &args)
    }

    /// Evaluates a filter sub-path from `@` or `$`. The start node is a fresh
    /// root, so normalized paths inside filters are relative to it, but its
    /// filters still test members, never the start node itself.
    fn sub_path(&self, anchor: PathAnchor, path: &JSONPath, current: &'a Value) -> Vec<&'a Value> {
        let start = match anchor {
            PathAnchor::Current => current,
            PathAnchor::Root => self.root,
        };
        self.eval_path(path, Rc::new(ValueNode::root(start)), false)
            .into_iter()
            .map(|node| node.data)
            .collect()
    }
}
