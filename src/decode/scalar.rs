use crate::error::{Error, Result};
use crate::value::Value;

/// Interpret one trimmed token as a scalar value.
///
/// A complete same-line bracketed literal is handed to the strict flow
/// grammar and fails hard; every other conversion failure silently degrades
/// to a plain string.
pub(crate) fn parse_scalar(token: &str, line: usize) -> Result<Value> {
    let token = token.trim_matches([' ', '\t']);

    if is_flow_literal(token) {
        return parse_flow(token, line);
    }
    if let Some(text) = unquote(token) {
        return Ok(Value::String(text));
    }
    if token == "~" || token.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }
    if token.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if token.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }
    if token.eq_ignore_ascii_case(".inf") || token.eq_ignore_ascii_case("+.inf") {
        return Ok(Value::Float(f64::INFINITY));
    }
    if token.eq_ignore_ascii_case("-.inf") {
        return Ok(Value::Float(f64::NEG_INFINITY));
    }
    if token.eq_ignore_ascii_case(".nan") {
        return Ok(Value::Float(f64::NAN));
    }
    Ok(parse_number(token))
}

/// Strict parse of a flow-style array/object literal.
fn parse_flow(text: &str, line: usize) -> Result<Value> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => Ok(Value::from(value)),
        Err(source) => Err(Error::Flow { line, source }),
    }
}

fn is_flow_literal(token: &str) -> bool {
    (token.starts_with('[') && token.ends_with(']'))
        || (token.starts_with('{') && token.ends_with('}'))
}

/// Strip bracketing quotes and resolve escapes. `None` when the token is not
/// a whole quoted string.
fn unquote(token: &str) -> Option<String> {
    let bytes = token.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let quote = bytes[0];
    if (quote != b'"' && quote != b'\'') || bytes[bytes.len() - 1] != quote {
        return None;
    }
    let inner = &token[1..token.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            // Unknown escapes pass the escaped character through.
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Some(out)
}

fn parse_number(token: &str) -> Value {
    let bytes = token.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        // A malformed base literal falls straight to the string fallback.
        if let Some(radix) = radix {
            return match i64::from_str_radix(&token[2..], radix) {
                Ok(value) => Value::Integer(value),
                Err(_) => Value::String(token.to_string()),
            };
        }
    }
    if bytes
        .iter()
        .any(|byte| matches!(byte, b'.' | b'e' | b'E'))
    {
        return match token.parse::<f64>() {
            Ok(value) => Value::Float(value),
            Err(_) => Value::String(token.to_string()),
        };
    }
    match token.parse::<i64>() {
        Ok(value) => Value::Integer(value),
        Err(_) => Value::String(token.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::value::Value;

    use super::parse_scalar;

    fn scalar(token: &str) -> Value {
        parse_scalar(token, 1).unwrap()
    }

    #[rstest]
    #[case("null", Value::Null)]
    #[case("Null", Value::Null)]
    #[case("NULL", Value::Null)]
    #[case("~", Value::Null)]
    #[case("true", Value::Bool(true))]
    #[case("True", Value::Bool(true))]
    #[case("FALSE", Value::Bool(false))]
    fn test_reserved_literals(#[case] token: &str, #[case] expected: Value) {
        assert_eq!(scalar(token), expected);
    }

    #[rstest]
    #[case("42", 42)]
    #[case("-17", -17)]
    #[case("+8", 8)]
    #[case("0", 0)]
    #[case("0xFF", 255)]
    #[case("0Xff", 255)]
    #[case("0o777", 511)]
    #[case("0b1010", 10)]
    fn test_integers(#[case] token: &str, #[case] expected: i64) {
        assert_eq!(scalar(token), Value::Integer(expected));
    }

    #[rstest]
    #[case("3.14", 3.14)]
    #[case("-0.5", -0.5)]
    #[case("1e3", 1000.0)]
    #[case("2.5E-1", 0.25)]
    #[case(".5", 0.5)]
    fn test_floats(#[case] token: &str, #[case] expected: f64) {
        assert_eq!(scalar(token), Value::Float(expected));
    }

    #[rstest]
    #[case(".inf")]
    #[case(".Inf")]
    #[case(".INF")]
    #[case("+.inf")]
    fn test_positive_infinity(#[case] token: &str) {
        assert_eq!(scalar(token), Value::Float(f64::INFINITY));
    }

    #[rstest]
    #[case("-.inf")]
    #[case("-.Inf")]
    fn test_negative_infinity(#[case] token: &str) {
        assert_eq!(scalar(token), Value::Float(f64::NEG_INFINITY));
    }

    #[rstest]
    #[case(".nan")]
    #[case(".NaN")]
    #[case(".NAN")]
    fn test_nan(#[case] token: &str) {
        match scalar(token) {
            Value::Float(f) => assert!(f.is_nan()),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[rstest]
    #[case("hello world")]
    #[case("12abc")]
    #[case("1_000")]
    #[case("0xZZ")]
    #[case("-0xFF")]
    #[case("5e")]
    #[case("inf")]
    #[case("nan")]
    fn test_non_numbers_degrade_to_strings(#[case] token: &str) {
        assert_eq!(scalar(token), Value::String(token.to_string()));
    }

    #[rstest]
    #[case("\"double quoted\"", "double quoted")]
    #[case("'single quoted'", "single quoted")]
    #[case("\"esc\\nline\"", "esc\nline")]
    #[case("\"tab\\there\"", "tab\there")]
    #[case("\"quote \\\" mark\"", "quote \" mark")]
    #[case("'it\\'s'", "it's")]
    #[case("\"back\\\\slash\"", "back\\slash")]
    #[case("\"pass \\x through\"", "pass x through")]
    #[case("\"42\"", "42")]
    #[case("\"true\"", "true")]
    fn test_quoted_strings(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(scalar(token), Value::String(expected.to_string()));
    }

    #[rstest]
    fn test_flow_literals() {
        assert_eq!(
            scalar("[1, 2, 3]"),
            Value::Array(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3)
            ])
        );
        let obj = scalar("{\"a\": 1, \"b\": true}");
        assert_eq!(obj.get("a").and_then(Value::as_i64), Some(1));
        assert_eq!(obj.get("b").and_then(Value::as_bool), Some(true));
        assert_eq!(scalar("[]"), Value::Array(Vec::new()));
    }

    #[rstest]
    fn test_malformed_flow_literal_is_fatal() {
        let err = parse_scalar("[1, 2,]", 7).unwrap_err();
        assert_eq!(err.line(), Some(7));
        let err = parse_scalar("{a: 1}", 3).unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[rstest]
    fn test_unbalanced_bracket_is_a_string() {
        // No closing bracket on the same token, so flow detection never fires.
        assert_eq!(scalar("[1, 2"), Value::String("[1, 2".to_string()));
    }
}
