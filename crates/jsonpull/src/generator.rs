//! Buffered JSON text generator.
//!
//! The generator serializes either a whole [`Value`] tree in one call or a
//! manually sequenced set of `begin`/`write`/`end` calls, inserting commas
//! and colons automatically from its own context stack. Output accumulates
//! in an internal buffer and reaches the sink in blocks.
//!
//! # Examples
//!
//! ```
//! use jsonpull::{Generator, JsonConfig};
//!
//! let mut out: Vec<u8> = Vec::new();
//! let mut g = Generator::new(&mut out, JsonConfig::default());
//! g.begin_object().unwrap();
//! g.write_key("id").unwrap();
//! g.write_i64(42).unwrap();
//! g.end_object().unwrap();
//! g.close().unwrap();
//! assert_eq!(out, br#"{"id":42}"#);
//! ```

use std::io::Write;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;

use crate::{
    config::JsonConfig,
    context::Context,
    error::{Error, Result, StateError},
    event::StructKind,
    value::{Map, Value},
};

const BUF_SIZE: usize = 128;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

// Two-digits-per-iteration lookup tables for integer rendering.
const DIGIT_TENS: &[u8; 100] =
    b"0000000000111111111122222222223333333333444444444455555555556666666666777777777788888888889999999999";
const DIGIT_ONES: &[u8; 100] =
    b"0123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789";

/// Buffered writer producing correctly punctuated JSON text.
///
/// Single-use: wraps exactly one sink, and no write is legal after
/// [`close`](Generator::close).
#[derive(Debug)]
pub struct Generator<W> {
    sink: W,
    buf: Vec<u8>,
    stack: Vec<Context>,
    config: JsonConfig,
    closed: bool,
}

impl<W: Write> Generator<W> {
    /// Creates a generator over the given sink.
    pub fn new(sink: W, config: JsonConfig) -> Self {
        Self {
            sink,
            buf: Vec::with_capacity(BUF_SIZE),
            stack: Vec::new(),
            config,
            closed: false,
        }
    }

    /// The configuration this generator consults.
    #[must_use]
    pub fn config(&self) -> &JsonConfig {
        &self.config
    }

    /// Opens an object. Counts as a value write in the enclosing context.
    ///
    /// # Errors
    ///
    /// [`StateError`] when closed or no key is pending in an enclosing
    /// object.
    pub fn begin_object(&mut self) -> Result<()> {
        self.before_value()?;
        self.write_byte(b'{')?;
        self.stack.push(Context::new(StructKind::Object));
        Ok(())
    }

    /// Closes the innermost object.
    ///
    /// # Errors
    ///
    /// [`StateError::UnbalancedEnd`] when no object is open,
    /// [`StateError::PendingKey`] when a key still awaits its value.
    pub fn end_object(&mut self) -> Result<()> {
        self.check_open()?;
        let Some(ctx) = self.stack.pop() else {
            return Err(StateError::UnbalancedEnd.into());
        };
        if ctx.kind != StructKind::Object {
            return Err(StateError::UnbalancedEnd.into());
        }
        if ctx.named {
            return Err(StateError::PendingKey.into());
        }
        if self.config.pretty && ctx.count > 0 {
            self.write_newline_indent(self.stack.len())?;
        }
        self.write_byte(b'}')
    }

    /// Opens an array. Counts as a value write in the enclosing context.
    ///
    /// # Errors
    ///
    /// [`StateError`] when closed or no key is pending in an enclosing
    /// object.
    pub fn begin_array(&mut self) -> Result<()> {
        self.before_value()?;
        self.write_byte(b'[')?;
        self.stack.push(Context::new(StructKind::Array));
        Ok(())
    }

    /// Closes the innermost array.
    ///
    /// # Errors
    ///
    /// [`StateError::UnbalancedEnd`] when no array is open.
    pub fn end_array(&mut self) -> Result<()> {
        self.check_open()?;
        let Some(ctx) = self.stack.pop() else {
            return Err(StateError::UnbalancedEnd.into());
        };
        if ctx.kind != StructKind::Array {
            return Err(StateError::UnbalancedEnd.into());
        }
        if self.config.pretty && ctx.count > 0 {
            self.write_newline_indent(self.stack.len())?;
        }
        self.write_byte(b']')
    }

    /// Writes an object member name and its `:` separator, inserting the
    /// preceding `,` for the second and later members automatically.
    ///
    /// # Errors
    ///
    /// [`StateError::KeyOutsideObject`] when the innermost context is not
    /// an object, [`StateError::KeyAlreadyWritten`] when a key is already
    /// pending.
    pub fn write_key(&mut self, key: &str) -> Result<()> {
        self.check_open()?;
        let count = match self.stack.last_mut() {
            Some(ctx) if ctx.kind == StructKind::Object => {
                if ctx.named {
                    return Err(StateError::KeyAlreadyWritten.into());
                }
                ctx.named = true;
                let count = ctx.count;
                ctx.count += 1;
                count
            }
            _ => return Err(StateError::KeyOutsideObject.into()),
        };
        if count > 0 {
            self.write_byte(b',')?;
        }
        if self.config.pretty {
            self.write_newline_indent(self.stack.len())?;
        }
        self.write_escaped(key)?;
        self.write_byte(b':')?;
        if self.config.pretty {
            self.write_byte(b' ')?;
        }
        Ok(())
    }

    /// Writes `null`.
    ///
    /// # Errors
    ///
    /// [`StateError`] per the context discipline.
    pub fn write_null(&mut self) -> Result<()> {
        self.before_value()?;
        self.write_raw("null")
    }

    /// Writes `true` or `false`.
    ///
    /// # Errors
    ///
    /// [`StateError`] per the context discipline.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.before_value()?;
        self.write_raw(if value { "true" } else { "false" })
    }

    /// Writes a 32-bit integer.
    ///
    /// # Errors
    ///
    /// [`StateError`] per the context discipline.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.before_value()?;
        // Negating i32::MIN overflows, so it is written as a literal.
        if value == i32::MIN {
            return self.write_raw("-2147483648");
        }
        self.write_int_digits(i64::from(value))
    }

    /// Writes a 64-bit integer straight into the output buffer without an
    /// intermediate string allocation.
    ///
    /// # Errors
    ///
    /// [`StateError`] per the context discipline.
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.before_value()?;
        if value == i64::MIN {
            return self.write_raw("-9223372036854775808");
        }
        self.write_int_digits(value)
    }

    /// Writes an exact-precision decimal in its canonical text form,
    /// preserving scale (`1.50` stays `1.50`).
    ///
    /// # Errors
    ///
    /// [`StateError`] per the context discipline.
    pub fn write_decimal(&mut self, value: Decimal) -> Result<()> {
        self.before_value()?;
        self.write_raw(&value.to_string())
    }

    /// Writes an escaped string value.
    ///
    /// # Errors
    ///
    /// [`StateError`] per the context discipline.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.before_value()?;
        self.write_escaped(value)
    }

    /// Formats a date with the configured format specifier and writes it
    /// as an escaped string.
    ///
    /// # Errors
    ///
    /// [`Error::DateFormat`] when the format string cannot be applied, and
    /// [`StateError`] per the context discipline.
    pub fn write_date<Tz: TimeZone>(&mut self, date: &DateTime<Tz>) -> Result<()>
    where
        Tz::Offset: core::fmt::Display,
    {
        use core::fmt::Write as _;
        let mut text = String::new();
        write!(text, "{}", date.format(&self.config.date_format))
            .map_err(|_| Error::DateFormat(self.config.date_format.clone()))?;
        self.write_str(&text)
    }

    /// [`write_date`](Generator::write_date) for timezone-naive dates.
    ///
    /// # Errors
    ///
    /// Same as [`write_date`](Generator::write_date).
    pub fn write_naive_date(&mut self, date: &NaiveDateTime) -> Result<()> {
        use core::fmt::Write as _;
        let mut text = String::new();
        write!(text, "{}", date.format(&self.config.date_format))
            .map_err(|_| Error::DateFormat(self.config.date_format.clone()))?;
        self.write_str(&text)
    }

    /// Serializes a whole [`Value`] tree.
    ///
    /// Recursion depth equals tree depth, mirroring the tree reader.
    ///
    /// # Errors
    ///
    /// [`StateError`] per the context discipline, or sink failure.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Int(i) => self.write_i64(*i),
            Value::Decimal(d) => self.write_decimal(*d),
            Value::String(s) => self.write_str(s),
            Value::Array(items) => {
                self.begin_array()?;
                for item in items {
                    self.write_value(item)?;
                }
                self.end_array()
            }
            Value::Object(map) => {
                self.begin_object()?;
                for (key, item) in map {
                    self.write_key(key)?;
                    self.write_value(item)?;
                }
                self.end_object()
            }
        }
    }

    /// Serializes an object map.
    ///
    /// # Errors
    ///
    /// Same as [`write_value`](Generator::write_value).
    pub fn write_object(&mut self, map: &Map) -> Result<()> {
        self.begin_object()?;
        for (key, item) in map {
            self.write_key(key)?;
            self.write_value(item)?;
        }
        self.end_object()
    }

    /// Serializes a sequence as an array.
    ///
    /// # Errors
    ///
    /// Same as [`write_value`](Generator::write_value).
    pub fn write_array(&mut self, items: &[Value]) -> Result<()> {
        self.begin_array()?;
        for item in items {
            self.write_value(item)?;
        }
        self.end_array()
    }

    /// Pushes any buffered content to the sink. Idempotent when nothing is
    /// buffered.
    ///
    /// # Errors
    ///
    /// Sink failure.
    pub fn flush(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.sink.write_all(&self.buf)?;
        self.buf.clear();
        self.sink.flush()?;
        Ok(())
    }

    /// Flushes once and marks the generator closed. Any write afterwards
    /// is a [`StateError::Closed`].
    ///
    /// # Errors
    ///
    /// Sink failure during the final flush.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.flush()?;
        self.closed = true;
        Ok(())
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(StateError::Closed.into());
        }
        Ok(())
    }

    /// Context bookkeeping common to every value write: inside an object a
    /// pending key is required and consumed; inside an array the item
    /// separator is inserted before the second and later siblings.
    fn before_value(&mut self) -> Result<()> {
        self.check_open()?;
        let array_count = match self.stack.last_mut() {
            Some(ctx) => match ctx.kind {
                StructKind::Object => {
                    if !ctx.named {
                        return Err(StateError::ValueWithoutKey.into());
                    }
                    ctx.named = false;
                    None
                }
                StructKind::Array => {
                    let count = ctx.count;
                    ctx.count += 1;
                    Some(count)
                }
            },
            None => return Ok(()),
        };
        if let Some(count) = array_count {
            if count > 0 {
                self.write_byte(b',')?;
            }
            if self.config.pretty {
                self.write_newline_indent(self.stack.len())?;
            }
        }
        Ok(())
    }

    fn write_newline_indent(&mut self, depth: usize) -> Result<()> {
        self.write_byte(b'\n')?;
        for _ in 0..depth {
            self.write_bytes(b"  ")?;
        }
        Ok(())
    }

    /// Digit extraction two digits at a time, writing backwards into a
    /// stack scratch buffer. Callers have already excluded `i64::MIN`.
    fn write_int_digits(&mut self, value: i64) -> Result<()> {
        let mut scratch = [0u8; 20];
        let mut pos = scratch.len();
        let negative = value < 0;
        let mut n = value.unsigned_abs();

        while n >= 100 {
            let q = n / 100;
            let r = (n - q * 100) as usize;
            pos -= 2;
            scratch[pos] = DIGIT_TENS[r];
            scratch[pos + 1] = DIGIT_ONES[r];
            n = q;
        }
        loop {
            let q = n / 10;
            let r = n - q * 10;
            pos -= 1;
            scratch[pos] = b'0' + u8::try_from(r).unwrap_or(0);
            n = q;
            if n == 0 {
                break;
            }
        }
        if negative {
            pos -= 1;
            scratch[pos] = b'-';
        }
        self.write_bytes(&scratch[pos..])
    }

    fn write_escaped(&mut self, value: &str) -> Result<()> {
        self.write_byte(b'"')?;
        for c in value.chars() {
            match c {
                '"' => self.write_bytes(b"\\\"")?,
                '\\' => self.write_bytes(b"\\\\")?,
                '\n' => self.write_bytes(b"\\n")?,
                '\r' => self.write_bytes(b"\\r")?,
                '\t' => self.write_bytes(b"\\t")?,
                '\u{8}' => self.write_bytes(b"\\b")?,
                '\u{c}' => self.write_bytes(b"\\f")?,
                // Remaining control characters plus the U+0080–U+009F and
                // U+2000–U+20FF ranges are escaped for portable output.
                c if (c as u32) < 0x20
                    || ('\u{80}'..'\u{a0}').contains(&c)
                    || ('\u{2000}'..'\u{2100}').contains(&c) =>
                {
                    let code = c as u32;
                    self.write_bytes(&[
                        b'\\',
                        b'u',
                        HEX_DIGITS[((code >> 12) & 15) as usize],
                        HEX_DIGITS[((code >> 8) & 15) as usize],
                        HEX_DIGITS[((code >> 4) & 15) as usize],
                        HEX_DIGITS[(code & 15) as usize],
                    ])?;
                }
                c => {
                    let mut utf8 = [0u8; 4];
                    self.write_bytes(c.encode_utf8(&mut utf8).as_bytes())?;
                }
            }
        }
        self.write_byte(b'"')
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes())
    }

    /// Buffers `bytes`, flushing first when they would overflow and
    /// bypassing the buffer entirely for blocks of a full buffer or more.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.buf.len() + bytes.len() > BUF_SIZE {
            self.flush_buffer()?;
        }
        if bytes.len() >= BUF_SIZE {
            self.sink.write_all(bytes)?;
        } else {
            self.buf.extend_from_slice(bytes);
        }
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        if self.buf.len() == BUF_SIZE {
            self.flush_buffer()?;
        }
        self.buf.push(byte);
        Ok(())
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            self.sink.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::Error;

    fn generate(build: impl FnOnce(&mut Generator<&mut Vec<u8>>) -> Result<()>) -> String {
        let mut out = Vec::new();
        let mut g = Generator::new(&mut out, JsonConfig::default());
        build(&mut g).unwrap();
        g.close().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn manual_object_sequence() {
        let text = generate(|g| {
            g.begin_object()?;
            g.write_key("a")?;
            g.write_i64(1)?;
            g.write_key("b")?;
            g.begin_array()?;
            g.write_bool(true)?;
            g.write_null()?;
            g.end_array()?;
            g.end_object()
        });
        assert_eq!(text, r#"{"a":1,"b":[true,null]}"#);
    }

    #[test]
    fn value_without_key_is_state_error() {
        let mut out = Vec::new();
        let mut g = Generator::new(&mut out, JsonConfig::default());
        g.begin_object().unwrap();
        let err = g.write_i64(1).unwrap_err();
        assert!(matches!(
            err,
            Error::State(StateError::ValueWithoutKey)
        ));
    }

    #[test]
    fn key_outside_object_is_state_error() {
        let mut out = Vec::new();
        let mut g = Generator::new(&mut out, JsonConfig::default());
        g.begin_array().unwrap();
        let err = g.write_key("k").unwrap_err();
        assert!(matches!(err, Error::State(StateError::KeyOutsideObject)));
    }

    #[test]
    fn write_after_close_is_state_error() {
        let mut out = Vec::new();
        let mut g = Generator::new(&mut out, JsonConfig::default());
        g.write_null().unwrap();
        g.close().unwrap();
        let err = g.write_null().unwrap_err();
        assert!(matches!(err, Error::State(StateError::Closed)));
    }

    #[test]
    fn end_with_pending_key_is_state_error() {
        let mut out = Vec::new();
        let mut g = Generator::new(&mut out, JsonConfig::default());
        g.begin_object().unwrap();
        g.write_key("k").unwrap();
        let err = g.end_object().unwrap_err();
        assert!(matches!(err, Error::State(StateError::PendingKey)));
    }

    #[test]
    fn unbalanced_end_is_state_error() {
        let mut out = Vec::new();
        let mut g = Generator::new(&mut out, JsonConfig::default());
        g.begin_array().unwrap();
        let err = g.end_object().unwrap_err();
        assert!(matches!(err, Error::State(StateError::UnbalancedEnd)));
    }

    #[test]
    fn integer_boundaries() {
        let text = generate(|g| {
            g.begin_array()?;
            g.write_i64(i64::MIN)?;
            g.write_i64(i64::MAX)?;
            g.write_i32(i32::MIN)?;
            g.write_i32(i32::MAX)?;
            g.write_i64(0)?;
            g.end_array()
        });
        assert_eq!(
            text,
            "[-9223372036854775808,9223372036854775807,-2147483648,2147483647,0]"
        );
    }

    #[test]
    fn decimal_keeps_scale() {
        let text = generate(|g| g.write_decimal(Decimal::from_str_exact("1.50").unwrap()));
        assert_eq!(text, "1.50");
    }

    #[test]
    fn string_escaping() {
        let text = generate(|g| g.write_str("a\"b\\c\nd\u{1f}e\u{85}f\u{2028}g\u{4e2d}"));
        assert_eq!(text, r#""a\"b\\c\nd\u001fe\u0085f\u2028g中""#);
    }

    #[test]
    fn pretty_layout() {
        let mut out = Vec::new();
        let mut g = Generator::new(
            &mut out,
            JsonConfig {
                pretty: true,
                ..Default::default()
            },
        );
        g.begin_object().unwrap();
        g.write_key("a").unwrap();
        g.write_i64(1).unwrap();
        g.write_key("b").unwrap();
        g.begin_array().unwrap();
        g.write_i64(2).unwrap();
        g.write_i64(3).unwrap();
        g.end_array().unwrap();
        g.end_object().unwrap();
        g.close().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n  \"a\": 1,\n  \"b\": [\n    2,\n    3\n  ]\n}"
        );
    }

    #[test]
    fn pretty_empty_containers_stay_tight() {
        let mut out = Vec::new();
        let mut g = Generator::new(
            &mut out,
            JsonConfig {
                pretty: true,
                ..Default::default()
            },
        );
        g.begin_array().unwrap();
        g.begin_object().unwrap();
        g.end_object().unwrap();
        g.end_array().unwrap();
        g.close().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[\n  {}\n]");
    }

    #[test]
    fn buffered_output_reaches_sink_in_blocks() {
        let mut out = Vec::new();
        let mut g = Generator::new(&mut out, JsonConfig::default());
        let long = "x".repeat(500); // larger than one buffer
        g.begin_array().unwrap();
        g.write_str(&long).unwrap();
        g.write_i64(7).unwrap();
        g.end_array().unwrap();
        g.close().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("[\"{long}\",7]"));
    }

    #[test]
    fn flush_is_idempotent_when_empty() {
        let mut out = Vec::new();
        let mut g = Generator::new(&mut out, JsonConfig::default());
        g.write_i64(1).unwrap();
        g.flush().unwrap();
        g.flush().unwrap();
        g.close().unwrap();
        assert_eq!(out, b"1");
    }

    #[test]
    fn date_write_uses_configured_format() {
        let mut out = Vec::new();
        let mut g = Generator::new(
            &mut out,
            JsonConfig {
                date_format: "%Y/%m/%d".to_string(),
                ..Default::default()
            },
        );
        let date = NaiveDate::from_ymd_opt(2012, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        g.write_naive_date(&date).unwrap();
        g.close().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"2012/03/04\"");
    }

    #[test]
    fn tree_write_matches_manual_sequence() {
        let mut map = Map::new();
        map.insert("n".to_string(), Value::Int(1));
        map.insert(
            "items".to_string(),
            Value::Array(vec![Value::from("x"), Value::Null]),
        );
        let text = generate(|g| g.write_value(&Value::Object(map.clone())));
        assert_eq!(text, r#"{"n":1,"items":["x",null]}"#);
    }
}
