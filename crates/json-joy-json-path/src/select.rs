//! Selector primitives used by both execution strategies.

use crate::value::{PathStep, ValueNode};
use serde_json::Value;
use std::rc::Rc;

pub(crate) type NodeRef<'a> = Rc<ValueNode<'a>>;

pub(crate) fn child<'a>(parent: &NodeRef<'a>, step: PathStep, data: &'a Value) -> NodeRef<'a> {
    Rc::new(ValueNode::new(Some(Rc::clone(parent)), step, data))
}

/// Pushes the member `name` of an object node.
pub(crate) fn select_name<'a>(node: &NodeRef<'a>, name: &str, out: &mut Vec<NodeRef<'a>>) {
    if let Value::Object(map) = node.data {
        if let Some(value) = map.get(name) {
            out.push(child(node, PathStep::Key(name.to_string()), value));
        }
    }
}

/// Resolves a possibly negative index against an array length.
pub(crate) fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let index = if index < 0 { index + len } else { index };
    if (0..len).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}

pub(crate) fn select_index<'a>(node: &NodeRef<'a>, index: i64, out: &mut Vec<NodeRef<'a>>) {
    if let Value::Array(items) = node.data {
        if let Some(idx) = normalize_index(index, items.len()) {
            out.push(child(node, PathStep::Index(idx), &items[idx]));
        }
    }
}

pub(crate) fn select_wildcard<'a>(node: &NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    match node.data {
        Value::Array(items) => {
            for (idx, value) in items.iter().enumerate() {
                out.push(child(node, PathStep::Index(idx), value));
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                out.push(child(node, PathStep::Key(key.clone()), value));
            }
        }
        _ => {}
    }
}

/// Array positions visited by `[start:end:step]` on an array of `len`.
///
/// `step == 0` selects nothing. Defaults and clamping depend on the sign of
/// the step.
pub fn slice_indices(start: Option<i64>, end: Option<i64>, step: Option<i64>, len: usize) -> Vec<usize> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Vec::new();
    }
    let len = len as i64;
    let normalize = |i: i64| if i < 0 { i + len } else { i };
    let mut indices = Vec::new();
    if step > 0 {
        let lower = normalize(start.unwrap_or(0)).clamp(0, len);
        let upper = normalize(end.unwrap_or(len)).clamp(0, len);
        let mut i = lower;
        while i < upper {
            indices.push(i as usize);
            i = match i.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
    } else {
        let upper = normalize(start.unwrap_or(len - 1)).clamp(-1, len - 1);
        let lower = normalize(end.unwrap_or(-len - 1)).clamp(-1, len - 1);
        let mut i = upper;
        while lower < i {
            indices.push(i as usize);
            i = match i.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
    }
    indices
}

pub(crate) fn select_slice<'a>(node: &NodeRef<'a>, indices: impl IntoIterator<Item = usize>, out: &mut Vec<NodeRef<'a>>) {
    if let Value::Array(items) = node.data {
        for idx in indices {
            out.push(child(node, PathStep::Index(idx), &items[idx]));
        }
    }
}

/// Candidates a filter selector tests against `node`.
///
/// Array elements and object members are the candidates. When `at_root` is
/// set, `node` is the only input of the first segment of a query and an
/// object there is tested as a whole.
pub(crate) fn filter_candidates<'a>(node: &NodeRef<'a>, at_root: bool) -> Vec<NodeRef<'a>> {
    match node.data {
        Value::Object(_) if at_root => vec![Rc::clone(node)],
        Value::Array(_) | Value::Object(_) => {
            let mut out = Vec::new();
            select_wildcard(node, &mut out);
            out
        }
        _ => Vec::new(),
    }
}

/// Collects `node` and all of its descendants in pre-order.
pub(crate) fn descendants<'a>(node: &NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    out.push(Rc::clone(node));
    let mut children = Vec::new();
    select_wildcard(node, &mut children);
    for c in &children {
        descendants(c, out);
    }
}

/// Turns internal node handles into owned result nodes.
pub(crate) fn into_results<'a>(nodes: Vec<NodeRef<'a>>) -> Vec<ValueNode<'a>> {
    nodes.into_iter().map(Rc::unwrap_or_clone).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_candidates_root_flag() {
        let doc = serde_json::json!({"a": 1, "b": [2]});
        let root = Rc::new(ValueNode::root(&doc));
        let whole = filter_candidates(&root, true);
        assert_eq!(whole.len(), 1);
        assert_eq!(whole[0].data, &doc);
        let members: Vec<&Value> = filter_candidates(&root, false).iter().map(|n| n.data).collect();
        assert_eq!(members, vec![&doc["a"], &doc["b"]]);
        assert_eq!(filter_candidates(&root, false)[1].pointer(), "$['b']");
        let array = serde_json::json!([1, 2]);
        assert_eq!(filter_candidates(&Rc::new(ValueNode::root(&array)), true).len(), 2);
    }

    #[test]
    fn test_index_normalization() {
        assert_eq!(normalize_index(0, 3), Some(0));
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(-3, 3), Some(0));
        assert_eq!(normalize_index(-4, 3), None);
        assert_eq!(normalize_index(3, 3), None);
        assert_eq!(normalize_index(0, 0), None);
    }

    #[test]
    fn test_slice_bounds() {
        assert_eq!(slice_indices(None, None, None, 4), vec![0, 1, 2, 3]);
        assert_eq!(slice_indices(None, None, Some(-1), 4), vec![3, 2, 1, 0]);
        assert_eq!(slice_indices(Some(5), Some(1), Some(-2), 7), vec![5, 3]);
        assert_eq!(slice_indices(Some(1), Some(5), Some(0), 7), Vec::<usize>::new());
        assert_eq!(slice_indices(Some(-2), None, None, 7), vec![5, 6]);
        assert_eq!(slice_indices(Some(-100), Some(100), Some(3), 7), vec![0, 3, 6]);
        assert_eq!(slice_indices(Some(100), Some(-100), Some(-3), 7), vec![6, 3, 0]);
        assert_eq!(slice_indices(None, None, Some(-1), 0), Vec::<usize>::new());
        assert_eq!(slice_indices(Some(0), None, Some(i64::MAX), 3), vec![0]);
        assert_eq!(slice_indices(None, None, Some(i64::MIN), 3), vec![2]);
    }
}
