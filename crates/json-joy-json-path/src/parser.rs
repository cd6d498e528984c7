//! JSONPath parser (RFC 9535).
//!
//! Cursor-based recursive descent over the raw string. Lookahead is done by
//! saving and restoring the cursor, which is how a slice is told apart from
//! an index, a parenthesized filter from a bare one, and a function call from
//! other value expressions.

use crate::types::*;
use serde_json::{Number, Value};
use thiserror::Error;

/// What went wrong while parsing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("Expected root identifier '$' at start")]
    ExpectedRoot,
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Expected '{0}'")]
    Expected(char),
    #[error("Expected selector after ..")]
    ExpectedDescentSelector,
    #[error("Expected member name")]
    ExpectedName,
    #[error("Empty bracket selector")]
    EmptyBracket,
    #[error("Invalid escape sequence")]
    InvalidEscape,
    #[error("Invalid number")]
    InvalidNumber,
    #[error("Unclosed string")]
    UnclosedString,
    #[error("Invalid selector")]
    InvalidSelector,
    #[error("Expected value expression")]
    ExpectedValue,
    #[error("Expected comparison operator after literal")]
    ExpectedComparison,
    #[error("Expected '(' after function name {0}")]
    ExpectedCall(String),
}

/// A parse failure and the cursor offset (in bytes) where it happened.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind} at position {position}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
}

type PResult<T> = Result<T, ParseErrorKind>;

/// Helper struct returned by `peek_comparison_operator`.
struct ComparisonToken {
    operator: ComparisonOperator,
    len: usize,
}

/// JSONPath parser.
pub struct JsonPathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> JsonPathParser<'a> {
    /// Parse a JSONPath expression.
    pub fn parse(input: &'a str) -> Result<JSONPath, ParseError> {
        let mut parser = Self { input, pos: 0 };
        parser.parse_query().map_err(|kind| ParseError {
            kind,
            position: parser.pos,
        })
    }

    /// Parse a JSONPath expression into the record-shaped [`ParseResult`].
    pub fn parse_result(input: &'a str) -> ParseResult {
        match Self::parse(input) {
            Ok(path) => ParseResult {
                success: true,
                path: Some(path),
                error: None,
                position: None,
            },
            Err(err) => ParseResult {
                success: false,
                path: None,
                error: Some(err.kind.to_string()),
                position: Some(err.position),
            },
        }
    }

    fn parse_query(&mut self) -> PResult<JSONPath> {
        if self.peek() != Some('$') {
            return Err(ParseErrorKind::ExpectedRoot);
        }
        self.advance();
        let segments = self.parse_segments()?;
        self.skip_whitespace();
        match self.peek() {
            None => Ok(JSONPath::new(segments)),
            Some(c) => Err(ParseErrorKind::UnexpectedChar(c)),
        }
    }

    /// Parses segments until something that cannot start one. Whitespace
    /// before the stopping point is left unconsumed.
    fn parse_segments(&mut self) -> PResult<Vec<PathSegment>> {
        let mut segments = Vec::new();
        loop {
            let save = self.pos;
            self.skip_whitespace();
            match self.peek() {
                Some('.') | Some('[') => segments.push(self.parse_segment()?),
                _ => {
                    self.pos = save;
                    break;
                }
            }
        }
        Ok(segments)
    }

    fn parse_segment(&mut self) -> PResult<PathSegment> {
        if self.peek_str("..") {
            self.advance_by(2);
            return self.parse_descendant_segment();
        }
        if self.peek() == Some('[') {
            return Ok(PathSegment::new(self.parse_bracket_selectors()?));
        }
        self.expect('.')?;
        self.skip_whitespace();
        if self.peek() == Some('*') {
            self.advance();
            return Ok(PathSegment::new(vec![Selector::Wildcard]));
        }
        let name = self.parse_identifier()?;
        Ok(PathSegment::new(vec![Selector::Name(name)]))
    }

    fn parse_descendant_segment(&mut self) -> PResult<PathSegment> {
        let selectors = match self.peek() {
            Some('*') => {
                self.advance();
                vec![Selector::Wildcard]
            }
            Some('[') => self.parse_bracket_selectors()?,
            Some(c) if is_name_first(c) => vec![Selector::Name(self.parse_identifier()?)],
            _ => return Err(ParseErrorKind::ExpectedDescentSelector),
        };
        Ok(PathSegment::new(
            selectors
                .into_iter()
                .map(|s| Selector::RecursiveDescent(Box::new(s)))
                .collect(),
        ))
    }

    fn parse_bracket_selectors(&mut self) -> PResult<Vec<Selector>> {
        self.expect('[')?;
        self.skip_whitespace();
        if self.peek() == Some(']') {
            return Err(ParseErrorKind::EmptyBracket);
        }

        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_bracket_selector()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(c) => return Err(ParseErrorKind::UnexpectedChar(c)),
                None => return Err(ParseErrorKind::UnexpectedEnd),
            }
        }
        Ok(selectors)
    }

    fn parse_bracket_selector(&mut self) -> PResult<Selector> {
        match self.peek() {
            Some('\'') | Some('"') => Ok(Selector::Name(self.parse_string()?)),
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            Some('?') => {
                self.advance();
                Ok(Selector::Filter(self.parse_filter_selector()?))
            }
            Some(':') | Some('-') | Some('0'..='9') => self.parse_index_or_slice(),
            Some(_) => Err(ParseErrorKind::InvalidSelector),
            None => Err(ParseErrorKind::UnexpectedEnd),
        }
    }

    /// Parses the body after `?`. Parentheses wrapping the whole filter are
    /// dropped; `?(@.a) && (@.b)` keeps both groups.
    fn parse_filter_selector(&mut self) -> PResult<FilterExpression> {
        match self.parse_filter_expression()? {
            FilterExpression::Paren(inner) => Ok(*inner),
            expr => Ok(expr),
        }
    }

    fn parse_index_or_slice(&mut self) -> PResult<Selector> {
        let start = self.parse_optional_int()?;
        self.skip_whitespace();

        if self.peek() != Some(':') {
            return start.map(Selector::Index).ok_or(ParseErrorKind::InvalidSelector);
        }
        self.advance();
        let end = self.parse_optional_int()?;
        self.skip_whitespace();
        let step = if self.peek() == Some(':') {
            self.advance();
            self.parse_optional_int()?
        } else {
            None
        };
        Ok(Selector::Slice { start, end, step })
    }

    fn parse_optional_int(&mut self) -> PResult<Option<i64>> {
        self.skip_whitespace();
        if matches!(self.peek(), Some('0'..='9') | Some('-')) {
            Ok(Some(self.parse_int()?))
        } else {
            Ok(None)
        }
    }

    fn parse_int(&mut self) -> PResult<i64> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        self.scan_int_digits()?;
        self.input[start..self.pos]
            .parse::<i64>()
            .map_err(|_| ParseErrorKind::InvalidNumber)
    }

    /// Consumes `0` or a digit run without a redundant leading zero.
    fn scan_int_digits(&mut self) -> PResult<()> {
        match self.peek() {
            Some('0') => {
                self.advance();
                if matches!(self.peek(), Some('0'..='9')) {
                    return Err(ParseErrorKind::InvalidNumber);
                }
            }
            Some('1'..='9') => self.skip_digits(),
            _ => return Err(ParseErrorKind::InvalidNumber),
        }
        Ok(())
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }
    }

    fn parse_identifier(&mut self) -> PResult<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if is_name_first(c) => self.advance(),
            Some(_) => return Err(ParseErrorKind::ExpectedName),
            None => return Err(ParseErrorKind::UnexpectedEnd),
        }
        while matches!(self.peek(), Some(c) if is_name_char(c)) {
            self.advance();
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_string(&mut self) -> PResult<String> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(ParseErrorKind::InvalidSelector),
        };
        self.advance();

        let mut result = String::new();
        loop {
            match self.peek() {
                None => return Err(ParseErrorKind::UnclosedString),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some('u') => {
                            self.advance();
                            result.push(self.parse_unicode_escape()?);
                            continue;
                        }
                        _ => return Err(ParseErrorKind::InvalidEscape),
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }

        Ok(result)
    }

    /// Parses the `XXXX` of a `\uXXXX` escape, pairing surrogates.
    fn parse_unicode_escape(&mut self) -> PResult<char> {
        let high = self.parse_hex4()?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or(ParseErrorKind::InvalidEscape);
        }
        if !self.peek_str("\\u") {
            return Err(ParseErrorKind::InvalidEscape);
        }
        self.advance_by(2);
        let low = self.parse_hex4()?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(ParseErrorKind::InvalidEscape);
        }
        char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
            .ok_or(ParseErrorKind::InvalidEscape)
    }

    fn parse_hex4(&mut self) -> PResult<u32> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or(ParseErrorKind::InvalidEscape)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseErrorKind::InvalidEscape);
        }
        let code = u32::from_str_radix(digits, 16).map_err(|_| ParseErrorKind::InvalidEscape)?;
        self.advance_by(4);
        Ok(code)
    }

    fn parse_filter_expression(&mut self) -> PResult<FilterExpression> {
        self.parse_logical_or_expression()
    }

    fn parse_logical_or_expression(&mut self) -> PResult<FilterExpression> {
        let left = self.parse_logical_and_expression()?;
        self.parse_logical_or_tail(left)
    }

    /// Continues an `||` chain after its first operand.
    fn parse_logical_or_tail(&mut self, mut left: FilterExpression) -> PResult<FilterExpression> {
        self.skip_whitespace();

        while self.peek_str("||") {
            self.advance_by(2);
            let right = self.parse_logical_and_expression()?;
            left = FilterExpression::Logical {
                operator: LogicalOperator::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> PResult<FilterExpression> {
        let left = self.parse_unary_expression()?;
        self.parse_logical_and_tail(left)
    }

    fn parse_logical_and_tail(&mut self, mut left: FilterExpression) -> PResult<FilterExpression> {
        self.skip_whitespace();

        while self.peek_str("&&") {
            self.advance_by(2);
            let right = self.parse_unary_expression()?;
            left = FilterExpression::Logical {
                operator: LogicalOperator::And,
                left: Box::new(left),
                right: Box::new(right),
            };
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> PResult<FilterExpression> {
        self.skip_whitespace();

        if self.peek() == Some('!') {
            self.advance();
            let expr = self.parse_unary_expression()?;
            return Ok(FilterExpression::Negation(Box::new(expr)));
        }

        if self.peek() == Some('(') {
            self.advance();
            let expr = self.parse_filter_expression()?;
            self.skip_whitespace();
            self.expect(')')?;
            return Ok(FilterExpression::Paren(Box::new(expr)));
        }

        self.parse_primary_expression()
    }

    fn parse_primary_expression(&mut self) -> PResult<FilterExpression> {
        let left = self.parse_value_expression()?;
        self.parse_comparison_tail(left)
    }

    /// Finishes a primary expression whose left value is already parsed.
    fn parse_comparison_tail(&mut self, left: ValueExpression) -> PResult<FilterExpression> {
        self.skip_whitespace();

        if let Some(op) = self.peek_comparison_operator() {
            self.advance_by(op.len);
            let right = self.parse_value_expression()?;
            return Ok(FilterExpression::Comparison {
                operator: op.operator,
                left,
                right,
            });
        }

        // No comparison operator: a path is an existence test, a function is
        // used for its truthiness.
        match left {
            ValueExpression::Path { anchor, path } => Ok(FilterExpression::Existence { anchor, path }),
            ValueExpression::Current => Ok(FilterExpression::Existence {
                anchor: PathAnchor::Current,
                path: JSONPath::new(vec![]),
            }),
            ValueExpression::Root => Ok(FilterExpression::Existence {
                anchor: PathAnchor::Root,
                path: JSONPath::new(vec![]),
            }),
            ValueExpression::Function { name, args } => Ok(FilterExpression::Function { name, args }),
            ValueExpression::Literal(_) => Err(ParseErrorKind::ExpectedComparison),
        }
    }

    fn parse_value_expression(&mut self) -> PResult<ValueExpression> {
        self.skip_whitespace();

        match self.peek() {
            Some('@') => {
                self.advance();
                if !matches!(self.peek(), Some('.') | Some('[')) {
                    return Ok(ValueExpression::Current);
                }
                let segments = self.parse_segments()?;
                Ok(ValueExpression::Path {
                    anchor: PathAnchor::Current,
                    path: JSONPath::new(segments),
                })
            }
            Some('$') => {
                self.advance();
                let segments = self.parse_segments()?;
                if segments.is_empty() {
                    return Ok(ValueExpression::Root);
                }
                Ok(ValueExpression::Path {
                    anchor: PathAnchor::Root,
                    path: JSONPath::new(segments),
                })
            }
            Some('\'') | Some('"') => Ok(ValueExpression::Literal(Value::String(self.parse_string()?))),
            Some('-') | Some('0'..='9') => Ok(ValueExpression::Literal(self.parse_number_literal()?)),
            Some(c) if c.is_ascii_lowercase() => {
                if let Some(literal) = self.parse_keyword_literal() {
                    return Ok(ValueExpression::Literal(literal));
                }
                self.parse_function_call()
            }
            Some(_) => Err(ParseErrorKind::ExpectedValue),
            None => Err(ParseErrorKind::UnexpectedEnd),
        }
    }

    fn parse_keyword_literal(&mut self) -> Option<Value> {
        for (word, value) in [
            ("true", Value::Bool(true)),
            ("false", Value::Bool(false)),
            ("null", Value::Null),
        ] {
            if self.peek_str(word) {
                let after = self.input[self.pos + word.len()..].chars().next();
                if !matches!(after, Some(c) if is_name_char(c) || c == '(') {
                    self.advance_by(word.len());
                    return Some(value);
                }
            }
        }
        None
    }

    fn parse_function_call(&mut self) -> PResult<ValueExpression> {
        let name = self.parse_function_name()?;
        self.skip_whitespace();
        if self.peek() != Some('(') {
            return Err(ParseErrorKind::ExpectedCall(name));
        }
        self.advance();
        self.skip_whitespace();

        let mut args = Vec::new();
        if self.peek() != Some(')') {
            loop {
                args.push(self.parse_function_arg()?);
                self.skip_whitespace();
                if self.peek() == Some(',') {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.skip_whitespace();
        self.expect(')')?;
        Ok(ValueExpression::Function { name, args })
    }

    /// A function argument is a value expression unless an operator after it
    /// (or a leading `!`/`(`) shows it to be a logical expression.
    fn parse_function_arg(&mut self) -> PResult<FunctionArg> {
        self.skip_whitespace();
        if matches!(self.peek(), Some('!') | Some('(')) {
            return Ok(FunctionArg::Filter(self.parse_filter_expression()?));
        }

        let value = self.parse_value_expression()?;
        self.skip_whitespace();
        if self.peek_comparison_operator().is_some() || self.peek_str("&&") || self.peek_str("||") {
            let primary = self.parse_comparison_tail(value)?;
            let and = self.parse_logical_and_tail(primary)?;
            return Ok(FunctionArg::Filter(self.parse_logical_or_tail(and)?));
        }
        Ok(FunctionArg::Value(value))
    }

    fn parse_function_name(&mut self) -> PResult<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_lowercase() => self.advance(),
            _ => return Err(ParseErrorKind::ExpectedValue),
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            self.advance();
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// JSON number grammar: `-? int frac? exp?`.
    fn parse_number_literal(&mut self) -> PResult<Value> {
        let start = self.pos;

        if self.peek() == Some('-') {
            self.advance();
        }
        self.scan_int_digits()?;

        let mut integral = true;
        if self.peek() == Some('.') {
            integral = false;
            self.advance();
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseErrorKind::InvalidNumber);
            }
            self.skip_digits();
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            integral = false;
            self.advance();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(ParseErrorKind::InvalidNumber);
            }
            self.skip_digits();
        }

        let text = &self.input[start..self.pos];
        if integral {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Number(Number::from(n)));
            }
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(ParseErrorKind::InvalidNumber)
    }

    /// Peek at the next comparison operator without consuming input.
    fn peek_comparison_operator(&self) -> Option<ComparisonToken> {
        let (operator, len) = if self.peek_str("==") {
            (ComparisonOperator::Equal, 2)
        } else if self.peek_str("!=") {
            (ComparisonOperator::NotEqual, 2)
        } else if self.peek_str("<=") {
            (ComparisonOperator::LessEqual, 2)
        } else if self.peek_str(">=") {
            (ComparisonOperator::GreaterEqual, 2)
        } else if self.peek_str("<") {
            (ComparisonOperator::Less, 1)
        } else if self.peek_str(">") {
            (ComparisonOperator::Greater, 1)
        } else {
            return None;
        };
        Some(ComparisonToken { operator, len })
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn expect(&mut self, expected: char) -> PResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(_) => Err(ParseErrorKind::Expected(expected)),
            None => Err(ParseErrorKind::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }
}

fn is_name_first(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(crate) fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter_of(text: &str) -> FilterExpression {
        let path = JsonPathParser::parse(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        match path.segments[0].selectors[0].clone() {
            Selector::Filter(expr) => expr,
            other => panic!("expected filter in {text}, got {other:?}"),
        }
    }

    #[test]
    fn test_descent_wraps_each_selector() {
        let path = JsonPathParser::parse("$..price").unwrap();
        assert_eq!(
            path.segments,
            vec![PathSegment::new(vec![Selector::RecursiveDescent(Box::new(
                Selector::Name("price".into())
            ))])]
        );
        assert!(path.segments[0].is_recursive());

        let path = JsonPathParser::parse("$..['a', 0]").unwrap();
        assert_eq!(path.segments[0].selectors.len(), 2);
        assert!(path.segments[0].is_recursive());
    }

    #[test]
    fn test_bare_descent_is_rejected_with_position() {
        let err = JsonPathParser::parse("$..").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedDescentSelector);
        assert_eq!(err.position, 3);
        assert_eq!(err.to_string(), "Expected selector after .. at position 3");

        let err = JsonPathParser::parse("$.a..").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedDescentSelector);
    }

    #[test]
    fn test_parse_result_record() {
        let ok = JsonPathParser::parse_result("$.a");
        assert!(ok.success);
        assert_eq!(ok.path.map(|p| p.segments.len()), Some(1));

        let failed = JsonPathParser::parse_result("store");
        assert!(!failed.success);
        assert!(failed.path.is_none());
        assert_eq!(failed.position, Some(0));
        assert_eq!(failed.error.as_deref(), Some("Expected root identifier '$' at start"));
    }

    #[test]
    fn test_slices_omit_parts_independently() {
        let cases = [
            ("$[1:3]", Some(1), Some(3), None),
            ("$[::-1]", None, None, Some(-1)),
            ("$[:2]", None, Some(2), None),
            ("$[2:]", Some(2), None, None),
            ("$[::]", None, None, None),
            ("$[ 1 : 5 : 2 ]", Some(1), Some(5), Some(2)),
        ];
        for (text, start, end, step) in cases {
            let path = JsonPathParser::parse(text).unwrap();
            assert_eq!(path.segments[0].selectors[0], Selector::Slice { start, end, step }, "{text}");
        }
    }

    #[test]
    fn test_number_grammar() {
        let cases = [
            ("$[?@.a == 0]", json!(0)),
            ("$[?@.a == -12]", json!(-12)),
            ("$[?@.a == 1.5]", json!(1.5)),
            ("$[?@.a == 1e3]", json!(1000.0)),
            ("$[?@.a == -2.5E-1]", json!(-0.25)),
        ];
        for (text, expected) in cases {
            match filter_of(text) {
                FilterExpression::Comparison { right, .. } => {
                    assert_eq!(right, ValueExpression::Literal(expected), "{text}")
                }
                other => panic!("{text}: {other:?}"),
            }
        }
        for bad in ["$[?@.a == 01]", "$[?@.a == 1.]", "$[?@.a == 1e]", "$[?@.a == -]", "$[01]"] {
            assert_eq!(
                JsonPathParser::parse(bad).unwrap_err().kind,
                ParseErrorKind::InvalidNumber,
                "{bad}"
            );
        }
    }

    #[test]
    fn test_string_escapes() {
        let path = JsonPathParser::parse(r#"$["a\n\t\r\b\f\\\/\"\'"]"#).unwrap();
        assert_eq!(
            path.segments[0].selectors[0],
            Selector::Name("a\n\t\r\u{8}\u{c}\\/\"'".into())
        );
        let path = JsonPathParser::parse(r"$['é😀']").unwrap();
        assert_eq!(path.segments[0].selectors[0], Selector::Name("é😀".into()));

        assert_eq!(
            JsonPathParser::parse(r"$['\x']").unwrap_err().kind,
            ParseErrorKind::InvalidEscape
        );
        assert_eq!(
            JsonPathParser::parse(r"$['\ud83d']").unwrap_err().kind,
            ParseErrorKind::InvalidEscape
        );
    }

    #[test]
    fn test_root_anchored_paths_in_filters() {
        match filter_of("$[?@.v >= $.threshold]") {
            FilterExpression::Comparison { left, right, .. } => {
                assert!(matches!(left, ValueExpression::Path { anchor: PathAnchor::Current, .. }));
                assert!(matches!(right, ValueExpression::Path { anchor: PathAnchor::Root, .. }));
            }
            other => panic!("{other:?}"),
        }
        assert_eq!(
            filter_of("$[?$]"),
            FilterExpression::Existence {
                anchor: PathAnchor::Root,
                path: JSONPath::new(vec![]),
            }
        );
    }

    #[test]
    fn test_enclosing_parens_are_dropped_only_when_whole() {
        assert!(matches!(filter_of("$[?(@.a)]"), FilterExpression::Existence { .. }));
        match filter_of("$[?(@.a) && (@.b)]") {
            FilterExpression::Logical { left, right, .. } => {
                assert!(matches!(*left, FilterExpression::Paren(_)));
                assert!(matches!(*right, FilterExpression::Paren(_)));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_function_arguments() {
        match filter_of("$[?count(@.a == 1) > 0]") {
            FilterExpression::Comparison {
                left: ValueExpression::Function { args, .. },
                ..
            } => assert!(matches!(args[0], FunctionArg::Filter(FilterExpression::Comparison { .. }))),
            other => panic!("{other:?}"),
        }
        match filter_of("$[?length(@.a, @.b)]") {
            FilterExpression::Function { name, args } => {
                assert_eq!(name, "length");
                assert_eq!(args.len(), 2);
            }
            other => panic!("{other:?}"),
        }
        match filter_of("$[?nothing()]") {
            FilterExpression::Function { args, .. } => assert!(args.is_empty()),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_keywords_are_not_function_names() {
        match filter_of("$[?@.a == null]") {
            FilterExpression::Comparison { right, .. } => {
                assert_eq!(right, ValueExpression::Literal(Value::Null))
            }
            other => panic!("{other:?}"),
        }
        assert!(matches!(
            filter_of("$[?truthy(@)]"),
            FilterExpression::Function { .. }
        ));
    }

    #[test]
    fn test_error_kinds() {
        let cases = [
            ("", ParseErrorKind::ExpectedRoot),
            ("$.", ParseErrorKind::UnexpectedEnd),
            ("$[]", ParseErrorKind::EmptyBracket),
            ("$[invalid]", ParseErrorKind::InvalidSelector),
            ("$[0", ParseErrorKind::UnexpectedEnd),
            ("$['abc", ParseErrorKind::UnclosedString),
            ("$.a b", ParseErrorKind::UnexpectedChar('b')),
            ("$[?true]", ParseErrorKind::ExpectedComparison),
            ("$[?foo]", ParseErrorKind::ExpectedCall("foo".into())),
            ("$[?(@.a]", ParseErrorKind::Expected(')')),
            ("$[?@.a == ]", ParseErrorKind::ExpectedValue),
        ];
        for (text, kind) in cases {
            assert_eq!(JsonPathParser::parse(text).unwrap_err().kind, kind, "{text}");
        }
    }
}
