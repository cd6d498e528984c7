//! Provenance-carrying result nodes.

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// One step of a normalized path: `$`, a member name, or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Root,
    Key(String),
    Index(usize),
}

impl From<&str> for PathStep {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl From<String> for PathStep {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<usize> for PathStep {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("$"),
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A matched location: the value plus the lineage that led to it.
///
/// Nodes form a singly-linked chain back to the root (`parent == None`,
/// `step == PathStep::Root`). They are created per evaluation and borrow the
/// queried document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode<'a> {
    pub parent: Option<Rc<ValueNode<'a>>>,
    pub step: PathStep,
    pub data: &'a Value,
}

impl<'a> ValueNode<'a> {
    /// The `$` node of a document.
    pub fn root(data: &'a Value) -> Self {
        Self {
            parent: None,
            step: PathStep::Root,
            data,
        }
    }

    pub fn new(parent: Option<Rc<ValueNode<'a>>>, step: PathStep, data: &'a Value) -> Self {
        Self { parent, step, data }
    }

    /// Ordered steps from `$` to this node. The first step is always
    /// [`PathStep::Root`].
    pub fn path(&self) -> Vec<PathStep> {
        let mut steps = vec![self.step.clone()];
        let mut current = self.parent.as_deref();
        while let Some(node) = current {
            steps.push(node.step.clone());
            current = node.parent.as_deref();
        }
        steps.reverse();
        steps
    }

    /// Canonical bracket rendering, e.g. `$['store']['book'][0]['title']`.
    pub fn pointer(&self) -> String {
        let mut out = String::from("$");
        for step in self.path() {
            match step {
                PathStep::Root => {}
                PathStep::Key(key) => {
                    out.push_str("['");
                    escape_normalized_name(&key, &mut out);
                    out.push_str("']");
                }
                PathStep::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    /// RFC 6901 rendering of the same location, e.g. `/store/book/0/title`.
    pub fn json_pointer(&self) -> String {
        let mut out = String::new();
        for step in self.path() {
            match step {
                PathStep::Root => {}
                PathStep::Key(key) => {
                    out.push('/');
                    out.push_str(&key.replace('~', "~0").replace('/', "~1"));
                }
                PathStep::Index(index) => {
                    out.push('/');
                    out.push_str(&index.to_string());
                }
            }
        }
        out
    }
}

/// Escapes a member name for a normalized path (RFC 9535, section 2.7).
pub(crate) fn escape_normalized_name(name: &str, out: &mut String) {
    for ch in name.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chain<'a>(doc: &'a Value) -> ValueNode<'a> {
        let root = Rc::new(ValueNode::root(doc));
        let a = Rc::new(ValueNode::new(Some(root), "a".into(), &doc["a"]));
        let zero = Rc::new(ValueNode::new(Some(a), 0usize.into(), &doc["a"][0]));
        ValueNode::new(Some(zero), "b/c".into(), &doc["a"][0]["b/c"])
    }

    #[test]
    fn test_path_starts_at_root() {
        let doc = json!({"a": [{"b/c": 1}]});
        let node = chain(&doc);
        assert_eq!(
            node.path(),
            vec![
                PathStep::Root,
                PathStep::Key("a".into()),
                PathStep::Index(0),
                PathStep::Key("b/c".into()),
            ]
        );
        assert_eq!(node.data, &json!(1));
    }

    #[test]
    fn test_pointer_forms() {
        let doc = json!({"a": [{"b/c": 1}]});
        let node = chain(&doc);
        assert_eq!(node.pointer(), "$['a'][0]['b/c']");
        assert_eq!(node.json_pointer(), "/a/0/b~1c");

        let root = ValueNode::root(&doc);
        assert_eq!(root.pointer(), "$");
        assert_eq!(root.json_pointer(), "");
    }

    #[test]
    fn test_pointer_escapes_quotes_and_controls() {
        let doc = json!({"it's\n": 1});
        let root = Rc::new(ValueNode::root(&doc));
        let node = ValueNode::new(Some(root), "it's\n".into(), &doc["it's\n"]);
        assert_eq!(node.pointer(), "$['it\\'s\\n']");
    }
}
