//! Property-based tests for the JSONPath engines.
//!
//! The tree-walking evaluator and the compiled closures must agree on every
//! document, in order, including the location of each match.

use json_joy_json_path::{compile, JsonPathEval, JsonPathParser, ValueNode};
use proptest::prelude::*;
use serde_json::Value;

const PATHS: &[&str] = &[
    "$",
    "$.a",
    "$[*]",
    "$..*",
    "$..a",
    "$[0, -1]",
    "$[::-1]",
    "$[1:3]",
    "$.*[0:2]",
    "$..[?@.a]",
    "$[?@.b == 1]",
    "$..[?@ > 0]",
    "$..[?@ <= 'b']",
    "$[?length(@) > 1]",
    "$[?count(@.*) == 2]",
    "$..[?match(@, 'a+')]",
    "$[?search(@.c, 'b')]",
    "$[?value(@.a) == $.b]",
    "$..[?@.a == @.b || !@.c]",
    "$..['a', 0]",
];

/// Small documents over a tiny key alphabet, so paths actually hit.
fn json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-3i64..4).prop_map(Value::from),
        "[ab]{0,2}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 40, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-c]", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn pointers(nodes: &[ValueNode<'_>]) -> Vec<String> {
    nodes.iter().map(ValueNode::pointer).collect()
}

proptest! {
    /// Both engines yield the same nodes in the same order.
    #[test]
    fn prop_evaluator_and_compiler_agree(doc in json_strategy(), path in prop::sample::select(PATHS)) {
        let ast = JsonPathParser::parse(path).unwrap();
        let evaluated = JsonPathEval::eval_nodes(&ast, &doc);
        let compiled = compile(&ast).call(&doc);
        prop_assert_eq!(pointers(&compiled), pointers(&evaluated));
        prop_assert_eq!(compiled, evaluated);
    }

    /// `[-k]` selects the same element as `[n - k]`.
    #[test]
    fn prop_negative_index_normalizes(items in prop::collection::vec(any::<i32>(), 1..12), k in 1usize..12) {
        prop_assume!(k <= items.len());
        let doc = Value::from(items.clone());
        let negative = JsonPathParser::parse(&format!("$[-{k}]")).unwrap();
        let positive = JsonPathParser::parse(&format!("$[{}]", items.len() - k)).unwrap();
        let expected = Value::from(items[items.len() - k]);
        prop_assert_eq!(JsonPathEval::eval(&negative, &doc), vec![&expected]);
        prop_assert_eq!(JsonPathEval::eval(&positive, &doc), vec![&expected]);
    }

    /// `[::-1]` is the exact reverse of `[*]`.
    #[test]
    fn prop_reverse_slice(items in prop::collection::vec(any::<i32>(), 0..12)) {
        let doc = Value::from(items);
        let all = JsonPathEval::eval(&JsonPathParser::parse("$[*]").unwrap(), &doc);
        let mut reversed = JsonPathEval::eval(&JsonPathParser::parse("$[::-1]").unwrap(), &doc);
        reversed.reverse();
        prop_assert_eq!(reversed, all);
    }

    /// Rendering a parsed path and parsing it again gives the same AST.
    #[test]
    fn prop_display_round_trip(path in prop::sample::select(PATHS)) {
        let ast = JsonPathParser::parse(path).unwrap();
        let reparsed = JsonPathParser::parse(&ast.to_string()).unwrap();
        prop_assert_eq!(reparsed, ast);
    }
}
