//! Malformed documents must be rejected by both reading surfaces.

use jsonpull::{Error, StreamParser, parse_str};
use rstest::rstest;

/// Drives the event parser to completion, surfacing the first error.
fn stream_all(text: &str) -> Result<(), Error> {
    let mut parser = StreamParser::new(text.as_bytes())?;
    while parser.next_event()?.is_some() {}
    Ok(())
}

#[rstest]
#[case::trailing_comma_array("[1,]")]
#[case::trailing_comma_object(r#"{"a":1,}"#)]
#[case::missing_colon(r#"{"a" 1}"#)]
#[case::missing_value(r#"{"a":}"#)]
#[case::comma_for_colon(r#"{"a",1}"#)]
#[case::bare_comma("[,1]")]
#[case::double_comma("[1,,2]")]
#[case::colon_in_array("[1:2]")]
#[case::close_mismatch_array("[1}")]
#[case::close_mismatch_object(r#"{"a":1]"#)]
#[case::value_after_root("[] []")]
fn syntax_errors(#[case] text: &str) {
    assert!(parse_str(text).unwrap_err().is_syntax(), "tree: {text}");
    assert!(stream_all(text).unwrap_err().is_syntax(), "stream: {text}");
}

#[rstest]
#[case::open_object("{")]
#[case::open_array("[1,")]
#[case::dangling_key(r#"{"a""#)]
#[case::unterminated_string("\"ab")]
#[case::unterminated_escape("\"ab\\")]
#[case::truncated_keyword("tru")]
#[case::truncated_number("-")]
fn premature_end_errors(#[case] text: &str) {
    assert!(parse_str(text).unwrap_err().is_lexical(), "tree: {text}");
    assert!(stream_all(text).unwrap_err().is_lexical(), "stream: {text}");
}

#[rstest]
#[case::stray_letter("{a:1}")]
#[case::misspelled_keyword("nulx")]
#[case::bad_escape("\"a\\q\"")]
#[case::bad_hex_escape("\"\\u12G4\"")]
#[case::second_decimal_point("[1.2.3]")]
#[case::integer_overflow("9223372036854775808")]
fn lexical_errors(#[case] text: &str) {
    assert!(parse_str(text).unwrap_err().is_lexical(), "tree: {text}");
    assert!(stream_all(text).unwrap_err().is_lexical(), "stream: {text}");
}

#[test]
fn empty_input_is_premature_end_for_trees() {
    assert!(parse_str("").unwrap_err().is_lexical());
    // The event stream treats the same input as already exhausted.
    let mut parser = StreamParser::new(&b""[..]).unwrap();
    assert_eq!(parser.next_event().unwrap(), None);
}

#[test]
fn errors_carry_an_offset() {
    let err = parse_str("[1, \u{1}]").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("offset"), "{text}");
}
