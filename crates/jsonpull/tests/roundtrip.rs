//! Parse/generate round trips across the whole value model.

use jsonpull::{
    Event, Generator, JsonConfig, Map, Result, StreamParser, Value, parse_str,
};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rust_decimal::Decimal;

#[derive(Clone, Debug)]
struct AnyValue(Value);

impl Arbitrary for AnyValue {
    fn arbitrary(g: &mut Gen) -> Self {
        AnyValue(any_value(g, 3))
    }
}

fn any_value(g: &mut Gen, depth: usize) -> Value {
    let max = if depth == 0 { 4 } else { 6 };
    let choices: Vec<u8> = (0..=max).collect();
    match g.choose(&choices).copied().unwrap_or(0) {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::Int(i64::arbitrary(g)),
        3 => {
            // Scale >= 1 so the rendering always carries a fraction and
            // parses back as a decimal rather than an integer.
            let scale = *g.choose(&[1u32, 2, 3, 9, 20]).unwrap();
            Value::Decimal(Decimal::new(i64::arbitrary(g), scale))
        }
        4 => Value::String(String::arbitrary(g)),
        5 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| any_value(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(g), any_value(g, depth - 1));
            }
            Value::Object(map)
        }
    }
}

#[quickcheck]
fn generated_text_parses_back_to_the_same_value(value: AnyValue) -> bool {
    parse_str(&value.0.to_string()).is_ok_and(|parsed| parsed == value.0)
}

#[test]
fn integer_boundaries_survive() {
    let text = "[-9223372036854775808,9223372036854775807,-2147483648,2147483647,0]";
    let value = parse_str(text).unwrap();
    assert_eq!(value.to_string(), text);
    let items = value.as_array().unwrap();
    assert_eq!(items[0], Value::Int(i64::MIN));
    assert_eq!(items[1], Value::Int(i64::MAX));
}

#[test]
fn decimal_scale_is_preserved() {
    assert_eq!(parse_str("[1.50]").unwrap().to_string(), "[1.50]");
    assert_eq!(parse_str("[0.000]").unwrap().to_string(), "[0.000]");
}

#[test]
fn unicode_escapes_decode_to_text() {
    let value = parse_str(r#"{"place":"中国"}"#).unwrap();
    assert_eq!(value.get_str("place"), Some("中国"));
    // Plain CJK passes through unescaped on output.
    assert_eq!(value.to_string(), r#"{"place":"中国"}"#);
}

#[test]
fn control_characters_escape_on_output() {
    let value = parse_str("\"a\\u0001b\"").unwrap();
    assert_eq!(value.to_string(), r#""ab""#);
}

/// Replays a parser's event stream into a generator.
fn echo(parser: &mut StreamParser<&[u8]>, out: &mut Generator<&mut Vec<u8>>) -> Result<()> {
    while let Some(event) = parser.next_event()? {
        match event {
            Event::StartObject => out.begin_object()?,
            Event::StartArray => out.begin_array()?,
            Event::EndObject => out.end_object()?,
            Event::EndArray => out.end_array()?,
            Event::KeyName => out.write_key(parser.string_value()?)?,
            Event::ValueString => out.write_str(parser.string_value()?)?,
            Event::ValueNumber => {
                let text = parser.string_value()?;
                if text.contains(['.', 'e', 'E']) {
                    out.write_decimal(parser.decimal_value()?)?;
                } else {
                    out.write_i64(parser.long_value()?)?;
                }
            }
            Event::ValueTrue => out.write_bool(true)?,
            Event::ValueFalse => out.write_bool(false)?,
            Event::ValueNull => out.write_null()?,
        }
    }
    Ok(())
}

#[test]
fn streaming_echo_matches_tree_rendering() {
    let text = r#"{"id":9007199254740993,"tags":["a","b"],"price":19.90,"meta":{"ok":true,"note":null}}"#;

    let mut parser = StreamParser::new(text.as_bytes()).unwrap();
    let mut streamed = Vec::new();
    let mut generator = Generator::new(&mut streamed, JsonConfig::default());
    echo(&mut parser, &mut generator).unwrap();
    generator.close().unwrap();

    let tree = parse_str(text).unwrap().to_string();
    assert_eq!(String::from_utf8(streamed).unwrap(), tree);
    assert_eq!(tree, text);
}

#[test]
fn deep_nesting_streams_without_recursion() {
    let depth = 100_000;
    let mut text = "[".repeat(depth);
    text.push_str(&"]".repeat(depth));

    let mut parser = StreamParser::new(text.as_bytes()).unwrap();
    let mut max_depth = 0;
    while let Some(_event) = parser.next_event().unwrap() {
        max_depth = max_depth.max(parser.current_depth());
    }
    assert_eq!(max_depth, depth);
    assert!(!parser.has_next());

    // The tree reader recurses per level; moderate depth is fine while
    // extreme depth is the stream parser's job.
    let shallow = format!("{}{}", "[".repeat(500), "]".repeat(500));
    assert!(parse_str(&shallow).is_ok());
}

#[test]
fn pretty_output_parses_back() {
    let value = parse_str(r#"{"a":1,"b":[true,"x"]}"#).unwrap();

    let mut out = Vec::new();
    let config = JsonConfig {
        pretty: true,
        ..JsonConfig::default()
    };
    let mut generator = Generator::new(&mut out, config);
    generator.write_value(&value).unwrap();
    generator.close().unwrap();

    let pretty = String::from_utf8(out).unwrap();
    assert!(pretty.contains("\n  \"a\": 1"));
    assert_eq!(parse_str(&pretty).unwrap(), value);
}
