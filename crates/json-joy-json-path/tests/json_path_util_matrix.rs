use json_joy_json_path::{
    evaluate, get_accessed_properties, json_path_equals, json_path_to_string, JsonPathParser,
    PathStep, JSONPath,
};
use serde_json::json;

fn parse(path: &str) -> JSONPath {
    JsonPathParser::parse(path).unwrap_or_else(|e| panic!("parse failed for '{path}': {e}"))
}

#[test]
fn util_json_path_to_string_matrix() {
    let cases = [
        ("$", "$"),
        ("$.name", "$.name"),
        ("$.store.book[0].title", "$.store.book[0].title"),
        ("$.store.*", "$.store.*"),
        ("$[*]", "$.*"),
        ("$.items[1:3]", "$.items[1:3]"),
        ("$.items[1:10:2]", "$.items[1:10:2]"),
        ("$[::-1]", "$[::-1]"),
        ("$.store['book', 'bicycle'][0, 1]", "$.store['book', 'bicycle'][0, 1]"),
        ("$[0, \"name\", 2]", "$[0, 'name', 2]"),
        ("$['a b']['it\\'s']", "$['a b']['it\\'s']"),
        ("$..author", "$..author"),
        ("$..[*]", "$..*"),
        ("$..[0, 'x']", "$..[0, 'x']"),
        ("$[?(@.price < 10)]", "$[?@.price < 10]"),
        ("$[?@.a && (@.b || !@.c)]", "$[?@.a && (@.b || !@.c)]"),
        ("$[?length(@.name) >= $.min]", "$[?length(@.name) >= $.min]"),
        ("$[?match(@.s, 'a.*')]", "$[?match(@.s, \"a.*\")]"),
        ("$[?@ == null]", "$[?@ == null]"),
    ];
    for (input, expected) in cases {
        assert_eq!(json_path_to_string(&parse(input)), expected, "{input}");
    }
}

#[test]
fn util_display_round_trip_matrix() {
    let paths = [
        "$.store.book[?@.price < 10 && @.category == 'fiction'].title",
        "$..book[-1:]",
        "$[?count(@.items[?@.ok]) > 1 || value(@.x) != \"y\"]",
        "$['tab\\there', 'quote\\'s', 'back\\\\slash']",
        "$[?!(@.a == 1.5) && $.flag]",
        "$[?search(@.s, '^\\\\d+$')]",
        "$.ünï.名前[?@ != 'x']",
    ];
    for text in paths {
        let path = parse(text);
        let rendered = path.to_string();
        let reparsed = parse(&rendered);
        assert!(
            json_path_equals(&path, &reparsed),
            "'{text}' rendered as '{rendered}' does not parse back"
        );
    }
}

#[test]
fn util_equality_matrix() {
    assert!(json_path_equals(&parse("$.a.b"), &parse("$['a']['b']")));
    assert!(json_path_equals(&parse("$[?(@.a)]"), &parse("$[?@.a]")));
    assert!(!json_path_equals(&parse("$.a.b"), &parse("$.a..b")));
    assert!(!json_path_equals(&parse("$[0]"), &parse("$[0:1]")));
}

#[test]
fn util_accessed_properties_matrix() {
    assert_eq!(
        get_accessed_properties(&parse("$.store.book[0].title")),
        vec!["store", "book", "title"]
    );
    assert_eq!(
        get_accessed_properties(&parse("$..author[?@.name]['a', 1]")),
        vec!["author", "a"]
    );
    assert!(get_accessed_properties(&parse("$[*][0]")).is_empty());
}

#[test]
fn util_value_node_path_matrix() {
    let data = json!({"a/b": [{"~c": 1}], "it's": 2});
    let nodes = evaluate("$['a/b'][0]['~c']", &data).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(
        nodes[0].path(),
        vec![
            PathStep::Root,
            PathStep::Key("a/b".into()),
            PathStep::Index(0),
            PathStep::Key("~c".into()),
        ]
    );
    assert_eq!(nodes[0].pointer(), "$['a/b'][0]['~c']");
    assert_eq!(nodes[0].json_pointer(), "/a~1b/0/~0c");

    let nodes = evaluate("$[\"it's\"]", &data).unwrap();
    assert_eq!(nodes[0].pointer(), "$['it\\'s']");

    let root = evaluate("$", &data).unwrap();
    assert_eq!(root[0].path(), vec![PathStep::Root]);
    assert_eq!(root[0].pointer(), "$");
}
