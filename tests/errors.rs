use rstest::rstest;
use serde_yamlite::{parse_str, Error};

#[rstest]
#[case("key:\nother: 1\n", 1)]
#[case("key:\n", 1)]
#[case("a: 1\nb:\nc: 3\n", 2)]
fn test_missing_block_after_key(#[case] input: &str, #[case] line: usize) {
    let err = parse_str(input).unwrap_err();
    assert!(matches!(err, Error::ExpectedBlock { .. }));
    assert_eq!(err.line(), Some(line));
    assert!(err.to_string().contains(&format!("line {line}")));
}

#[rstest]
fn test_missing_block_error_names_the_key() {
    let err = parse_str("settings:\nnext: 1\n").unwrap_err();
    assert!(err.to_string().contains("'settings'"));
}

#[rstest]
#[case("-\n- x\n", 1)]
#[case("items:\n  -\n  - x\n", 2)]
fn test_missing_block_after_item(#[case] input: &str, #[case] line: usize) {
    let err = parse_str(input).unwrap_err();
    assert!(matches!(err, Error::ExpectedItemBlock { .. }));
    assert_eq!(err.line(), Some(line));
}

#[rstest]
#[case("key:\n  ~\n")]
#[case("key:\n  null\n")]
fn test_null_block_after_key(#[case] input: &str) {
    let err = parse_str(input).unwrap_err();
    assert!(matches!(err, Error::EmptyBlock { .. }));
    assert_eq!(err.line(), Some(1));
}

#[rstest]
fn test_null_block_after_item() {
    let err = parse_str("-\n  ~\n").unwrap_err();
    assert!(matches!(err, Error::EmptyItemBlock { .. }));
    assert_eq!(err.line(), Some(1));
}

#[rstest]
fn test_inconsistent_nested_sequence_indentation() {
    let err = parse_str("- - a\n    - b\n      - c\n").unwrap_err();
    assert!(matches!(err, Error::InconsistentIndent { .. }));
    assert_eq!(err.line(), Some(3));
}

#[rstest]
fn test_mixed_root_forms() {
    let err = parse_str("key: 1\n- item\n").unwrap_err();
    assert!(matches!(err, Error::MixedRoot { .. }));
    assert_eq!(err.line(), Some(2));
}

#[rstest]
fn test_root_sequence_before_mapping_is_fine() {
    // The mapping line after a root sequence is dropped, not an error.
    assert!(parse_str("- item\nkey: 1\n").is_ok());
}

#[rstest]
fn test_flow_error_carries_line_and_source() {
    let err = parse_str("a: ok\nb: [1,]\n").unwrap_err();
    match &err {
        Error::Flow { line, source } => {
            assert_eq!(*line, 2);
            let _ = source.to_string();
        }
        other => panic!("expected flow error, got {other:?}"),
    }
}

#[rstest]
fn test_missing_block_inside_sequence_item_mapping() {
    let err = parse_str("- key:\nnext: 1\n").unwrap_err();
    assert!(matches!(err, Error::ExpectedBlock { .. }));
    assert_eq!(err.line(), Some(1));
}
