//! JSONPath compiler.
//!
//! Walks the AST once and builds a tree of boxed closures. Every selector,
//! filter and value expression becomes one closure holding the closures of
//! its children, so a compiled path is evaluated without touching the AST
//! again. Sub-paths inside filters (existence tests, path operands and path
//! arguments) are compiled into their own [`CompiledPath`].

use crate::functions::{self, compile_pattern, regex_test};
use crate::operand::{compare, FilterValue};
use crate::parser::{JsonPathParser, ParseError};
use crate::select::*;
use crate::types::*;
use crate::value::ValueNode;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Per-call evaluation context.
struct EvalCtx<'a> {
    root: &'a Value,
}

/// Selector closure; the flag is set when the node is the document root
/// feeding the first segment of the query.
type SelectorFn =
    Box<dyn for<'a> Fn(&NodeRef<'a>, bool, &EvalCtx<'a>, &mut Vec<NodeRef<'a>>) + Send + Sync>;
type TestFn = Box<dyn for<'a> Fn(&'a Value, &EvalCtx<'a>) -> bool + Send + Sync>;
type ValueFn = Box<dyn for<'a> Fn(&'a Value, &EvalCtx<'a>) -> FilterValue<'a> + Send + Sync>;

fn selector_fn<F>(f: F) -> SelectorFn
where
    F: for<'a> Fn(&NodeRef<'a>, bool, &EvalCtx<'a>, &mut Vec<NodeRef<'a>>) + Send + Sync + 'static,
{
    Box::new(f)
}

fn test_fn<F>(f: F) -> TestFn
where
    F: for<'a> Fn(&'a Value, &EvalCtx<'a>) -> bool + Send + Sync + 'static,
{
    Box::new(f)
}

fn value_fn<F>(f: F) -> ValueFn
where
    F: for<'a> Fn(&'a Value, &EvalCtx<'a>) -> FilterValue<'a> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Compiled segments of a path; each segment is a union of selector closures.
struct CompiledPath {
    segments: Vec<Vec<SelectorFn>>,
}

impl CompiledPath {
    fn new(path: &JSONPath) -> Self {
        let segments = path
            .segments
            .iter()
            .map(|segment| segment.selectors.iter().map(compile_selector).collect())
            .collect();
        Self { segments }
    }

    fn run<'a>(&self, start: NodeRef<'a>, ctx: &EvalCtx<'a>, query: bool) -> Vec<NodeRef<'a>> {
        let mut current = vec![start];
        for (i, selectors) in self.segments.iter().enumerate() {
            let at_root = query && i == 0;
            let mut next = Vec::new();
            for selector in selectors {
                for node in &current {
                    selector(node, at_root, ctx, &mut next);
                }
            }
            current = next;
        }
        current
    }
}

/// A path inside a filter, bound to the node it starts from.
struct SubPath {
    anchor: PathAnchor,
    path: CompiledPath,
}

impl SubPath {
    fn new(anchor: PathAnchor, path: &JSONPath) -> Self {
        Self {
            anchor,
            path: CompiledPath::new(path),
        }
    }

    fn values<'a>(&self, current: &'a Value, ctx: &EvalCtx<'a>) -> Vec<&'a Value> {
        let start = match self.anchor {
            PathAnchor::Current => current,
            PathAnchor::Root => ctx.root,
        };
        self.path
            .run(Rc::new(ValueNode::root(start)), ctx, false)
            .into_iter()
            .map(|node| node.data)
            .collect()
    }
}

fn compile_selector(selector: &Selector) -> SelectorFn {
    match selector {
        Selector::Name(name) => {
            let name = name.clone();
            selector_fn(move |node, _, _, out| select_name(node, &name, out))
        }
        Selector::Index(index) => {
            let index = *index;
            selector_fn(move |node, _, _, out| select_index(node, index, out))
        }
        Selector::Wildcard => selector_fn(|node, _, _, out| select_wildcard(node, out)),
        Selector::Slice { step: Some(0), .. } => selector_fn(|_, _, _, _| {}),
        Selector::Slice { start, end, step } => {
            let (start, end, step) = (*start, *end, *step);
            selector_fn(move |node, _, _, out| {
                if let Value::Array(items) = node.data {
                    select_slice(node, slice_indices(start, end, step, items.len()), out);
                }
            })
        }
        Selector::Filter(expr) => {
            let test = compile_test(expr);
            selector_fn(move |node, at_root, ctx, out| {
                for candidate in filter_candidates(node, at_root) {
                    if test(candidate.data, ctx) {
                        out.push(candidate);
                    }
                }
            })
        }
        Selector::RecursiveDescent(inner) => {
            let inner = compile_selector(inner);
            selector_fn(move |node, _, ctx, out| {
                let mut nodes = Vec::new();
                descendants(node, &mut nodes);
                for descendant in &nodes {
                    inner(descendant, false, ctx, out);
                }
            })
        }
    }
}

fn compile_test(expr: &FilterExpression) -> TestFn {
    match expr {
        FilterExpression::Comparison { operator, left, right } => {
            let operator = *operator;
            // Literal operands are borrowed from the closure, not cloned per candidate.
            match (left, right) {
                (_, ValueExpression::Literal(literal)) => {
                    let left = compile_value(left);
                    let literal = literal.clone();
                    test_fn(move |current, ctx| {
                        compare(operator, &left(current, ctx), &FilterValue::Node(&literal))
                    })
                }
                (ValueExpression::Literal(literal), _) => {
                    let right = compile_value(right);
                    let literal = literal.clone();
                    test_fn(move |current, ctx| {
                        compare(operator, &FilterValue::Node(&literal), &right(current, ctx))
                    })
                }
                _ => {
                    let left = compile_value(left);
                    let right = compile_value(right);
                    test_fn(move |current, ctx| compare(operator, &left(current, ctx), &right(current, ctx)))
                }
            }
        }
        FilterExpression::Logical { operator, left, right } => {
            let left = compile_test(left);
            let right = compile_test(right);
            match operator {
                LogicalOperator::And => test_fn(move |current, ctx| left(current, ctx) && right(current, ctx)),
                LogicalOperator::Or => test_fn(move |current, ctx| left(current, ctx) || right(current, ctx)),
            }
        }
        FilterExpression::Existence { anchor, path } => {
            let sub = SubPath::new(*anchor, path);
            test_fn(move |current, ctx| !sub.values(current, ctx).is_empty())
        }
        FilterExpression::Function { name, args } => {
            let call = compile_call(name, args);
            test_fn(move |current, ctx| call(current, ctx).is_truthy())
        }
        FilterExpression::Paren(inner) => compile_test(inner),
        FilterExpression::Negation(inner) => {
            let inner = compile_test(inner);
            test_fn(move |current, ctx| !inner(current, ctx))
        }
    }
}

fn compile_value(expr: &ValueExpression) -> ValueFn {
    match expr {
        ValueExpression::Current => value_fn(|current, _| FilterValue::Node(current)),
        ValueExpression::Root => value_fn(|_, ctx| FilterValue::Node(ctx.root)),
        ValueExpression::Literal(value) => {
            let value = value.clone();
            value_fn(move |_, _| FilterValue::Owned(value.clone()))
        }
        ValueExpression::Path { anchor, path } => {
            let sub = SubPath::new(*anchor, path);
            value_fn(move |current, ctx| FilterValue::from_nodes(sub.values(current, ctx)))
        }
        ValueExpression::Function { name, args } => compile_call(name, args),
    }
}

fn compile_arg(arg: &FunctionArg) -> ValueFn {
    match arg {
        FunctionArg::Value(expr) => compile_value(expr),
        FunctionArg::Filter(expr) => {
            let test = compile_test(expr);
            value_fn(move |current, ctx| FilterValue::Owned(Value::Bool(test(current, ctx))))
        }
        FunctionArg::Path(path) => {
            let sub = SubPath::new(PathAnchor::Current, path);
            value_fn(move |current, ctx| FilterValue::from_nodes(sub.values(current, ctx)))
        }
    }
}

/// Resolves the function once. `match`/`search` with a literal pattern get
/// the regular expression compiled here instead of on every call.
fn compile_call(name: &str, args: &[FunctionArg]) -> ValueFn {
    let Some(def) = functions::lookup(name) else {
        log::debug!("unknown JSONPath function {name}(), compiled to Nothing");
        return value_fn(|_, _| FilterValue::Nothing);
    };
    if args.len() != def.arity {
        log::debug!("{}() expects {} argument(s), got {}", def.name, def.arity, args.len());
    }

    if let ("match" | "search", [subject, FunctionArg::Value(ValueExpression::Literal(Value::String(pattern)))]) =
        (def.name, args)
    {
        let subject = compile_arg(subject);
        return match compile_pattern(pattern, def.name == "match") {
            Some(regex) => value_fn(move |current, ctx| {
                FilterValue::Owned(Value::Bool(regex_test(&subject(current, ctx), &regex)))
            }),
            None => {
                log::debug!("invalid pattern {pattern:?} in {}(), compiled to false", def.name);
                value_fn(|_, _| FilterValue::Owned(Value::Bool(false)))
            }
        };
    }

    let eval_fn = def.eval_fn;
    let args: Vec<ValueFn> = args.iter().map(compile_arg).collect();
    value_fn(move |current, ctx| {
        let values: Vec<FilterValue<'_>> = args.iter().map(|arg| arg(current, ctx)).collect();
        eval_fn(&values)
    })
}

/// A compiled JSONPath, reusable across documents and threads.
pub struct JsonPathCompiledFn {
    path: CompiledPath,
}

impl JsonPathCompiledFn {
    /// Runs the compiled path, returning matches with their locations.
    pub fn call<'a>(&self, doc: &'a Value) -> Vec<ValueNode<'a>> {
        let ctx = EvalCtx { root: doc };
        into_results(self.path.run(Rc::new(ValueNode::root(doc)), &ctx, true))
    }

    /// Runs the compiled path, returning only the matched values.
    pub fn values<'a>(&self, doc: &'a Value) -> Vec<&'a Value> {
        let ctx = EvalCtx { root: doc };
        self.path
            .run(Rc::new(ValueNode::root(doc)), &ctx, true)
            .into_iter()
            .map(|node| node.data)
            .collect()
    }
}

impl fmt::Debug for JsonPathCompiledFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonPathCompiledFn")
            .field("segments", &self.path.segments.len())
            .finish()
    }
}

/// JSONPath code generator.
pub struct JsonPathCodegen;

impl JsonPathCodegen {
    /// Compile a parsed path.
    pub fn compile_path(path: &JSONPath) -> JsonPathCompiledFn {
        log::trace!("compiling JSONPath with {} segment(s)", path.segments.len());
        JsonPathCompiledFn {
            path: CompiledPath::new(path),
        }
    }

    /// Parse and compile a path string.
    pub fn compile(path: &str) -> Result<JsonPathCompiledFn, ParseError> {
        let path = JsonPathParser::parse(path)?;
        Ok(Self::compile_path(&path))
    }

    /// Parse, compile and run in one step.
    pub fn run<'a>(path: &str, doc: &'a Value) -> Result<Vec<&'a Value>, ParseError> {
        Ok(Self::compile(path)?.values(doc))
    }
}
