//! Filter function extensions: `length`, `count`, `match`, `search`, `value`.
//!
//! Every function is pure, checks its own arity and never fails: a bad call
//! degrades to `Nothing`, `0` or `false`.

use crate::operand::FilterValue;
use regex::Regex;
use serde_json::Value;

/// Signature shared by all function implementations.
pub type FunctionImpl = for<'a> fn(&[FilterValue<'a>]) -> FilterValue<'a>;

/// A registered function.
pub struct FunctionDefinition {
    pub name: &'static str,
    pub arity: usize,
    pub eval_fn: FunctionImpl,
}

static FUNCTIONS: [FunctionDefinition; 5] = [
    FunctionDefinition { name: "length", arity: 1, eval_fn: length_eval },
    FunctionDefinition { name: "count", arity: 1, eval_fn: count_eval },
    FunctionDefinition { name: "match", arity: 2, eval_fn: match_eval },
    FunctionDefinition { name: "search", arity: 2, eval_fn: search_eval },
    FunctionDefinition { name: "value", arity: 1, eval_fn: value_eval },
];

/// Looks up a function by name.
pub fn lookup(name: &str) -> Option<&'static FunctionDefinition> {
    FUNCTIONS.iter().find(|def| def.name == name)
}

/// Calls a function by name. Unknown names yield `Nothing`.
pub fn call<'a>(name: &str, args: &[FilterValue<'a>]) -> FilterValue<'a> {
    match lookup(name) {
        Some(def) => (def.eval_fn)(args),
        None => {
            log::trace!("unknown JSONPath function {name}()");
            FilterValue::Nothing
        }
    }
}

fn arity_mismatch(name: &str, expected: usize, got: usize) {
    log::trace!("{name}() expects {expected} argument(s), got {got}");
}

fn length_eval<'a>(args: &[FilterValue<'a>]) -> FilterValue<'a> {
    let [arg] = args else {
        arity_mismatch("length", 1, args.len());
        return FilterValue::Nothing;
    };
    let len = match arg {
        FilterValue::Nodes(list) => list.len(),
        FilterValue::Node(v) => match json_length(v) {
            Some(len) => len,
            None => return FilterValue::Nothing,
        },
        FilterValue::Owned(v) => match json_length(v) {
            Some(len) => len,
            None => return FilterValue::Nothing,
        },
        FilterValue::Nothing => return FilterValue::Nothing,
    };
    FilterValue::Owned(Value::from(len))
}

fn json_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

fn count_eval<'a>(args: &[FilterValue<'a>]) -> FilterValue<'a> {
    let [arg] = args else {
        arity_mismatch("count", 1, args.len());
        return FilterValue::Owned(Value::from(0));
    };
    let count = match arg {
        FilterValue::Nothing => 0,
        FilterValue::Nodes(list) => list.len(),
        FilterValue::Node(Value::Array(items)) => items.len(),
        FilterValue::Owned(Value::Array(items)) => items.len(),
        _ => 1,
    };
    FilterValue::Owned(Value::from(count))
}

fn match_eval<'a>(args: &[FilterValue<'a>]) -> FilterValue<'a> {
    regex_eval("match", args, true)
}

fn search_eval<'a>(args: &[FilterValue<'a>]) -> FilterValue<'a> {
    regex_eval("search", args, false)
}

fn regex_eval<'a>(name: &str, args: &[FilterValue<'a>], anchored: bool) -> FilterValue<'a> {
    let [subject, pattern] = args else {
        arity_mismatch(name, 2, args.len());
        return FilterValue::Owned(Value::Bool(false));
    };
    let matched = match pattern.unwrap_single().as_str().and_then(|p| compile_pattern(p, anchored)) {
        Some(regex) => regex_test(subject, &regex),
        None => false,
    };
    FilterValue::Owned(Value::Bool(matched))
}

/// Compiles a `match` (`anchored`) or `search` pattern. Invalid patterns
/// yield `None`.
pub fn compile_pattern(pattern: &str, anchored: bool) -> Option<Regex> {
    let source = if anchored {
        format!("^(?:{pattern})$")
    } else {
        pattern.to_string()
    };
    match Regex::new(&source) {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::trace!("invalid JSONPath regular expression {pattern:?}: {err}");
            None
        }
    }
}

/// Tests a subject operand against a compiled pattern; non-strings never match.
pub fn regex_test(subject: &FilterValue<'_>, regex: &Regex) -> bool {
    subject
        .unwrap_single()
        .as_str()
        .map_or(false, |s| regex.is_match(s))
}

fn value_eval<'a>(args: &[FilterValue<'a>]) -> FilterValue<'a> {
    let [arg] = args else {
        arity_mismatch("value", 1, args.len());
        return FilterValue::Nothing;
    };
    match arg {
        FilterValue::Nothing => FilterValue::Nothing,
        FilterValue::Nodes(list) if list.len() == 1 => FilterValue::Node(list[0]),
        FilterValue::Nodes(_) => FilterValue::Nothing,
        FilterValue::Node(Value::Array(items)) => match items.as_slice() {
            [only] => FilterValue::Node(only),
            _ => FilterValue::Nothing,
        },
        FilterValue::Owned(Value::Array(items)) => match items.as_slice() {
            [only] => FilterValue::Owned(only.clone()),
            _ => FilterValue::Nothing,
        },
        other => other.clone(),
    }
}
