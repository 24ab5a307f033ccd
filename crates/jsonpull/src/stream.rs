//! Pull-based streaming event parser.
//!
//! The parser exposes one document as a flat sequence of [`Event`]s,
//! tracking structural nesting with an owned context stack instead of
//! recursion: traversal depth is bounded by memory, never by the host call
//! stack.
//!
//! # Examples
//!
//! ```
//! use jsonpull::{Event, StreamParser};
//!
//! let mut parser = StreamParser::new(r#"{"n":1}"#.as_bytes()).unwrap();
//! assert_eq!(parser.next_event().unwrap(), Some(Event::StartObject));
//! assert_eq!(parser.next_event().unwrap(), Some(Event::KeyName));
//! assert_eq!(parser.string_value().unwrap(), "n");
//! assert_eq!(parser.next_event().unwrap(), Some(Event::ValueNumber));
//! assert_eq!(parser.long_value().unwrap(), 1);
//! assert_eq!(parser.next_event().unwrap(), Some(Event::EndObject));
//! assert_eq!(parser.next_event().unwrap(), None);
//! ```

use std::io::Read;

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    context::Context,
    error::{CoercionError, Error, LexicalError, Result, SyntaxError, lexical, syntax},
    event::{Event, StructKind},
    token::{Token, TokenKind},
    tokenizer::Tokenizer,
    value::Value,
};

/// Streaming cursor over one JSON document.
///
/// Commas and colons are consumed silently; the caller only ever sees
/// structural and value events. The parser is single-use and not
/// restartable; construct a new one over a new source to traverse again.
#[derive(Debug)]
pub struct StreamParser<R> {
    tokenizer: Tokenizer<R>,
    stack: Vec<Context>,
    event: Option<Event>,
    /// Last materialized scalar. Lives on the parser rather than the
    /// context node so root-level scalar documents work with an empty
    /// stack.
    scalar: Option<Value>,
    /// Original source text of the last numeric value.
    number_text: Option<String>,
}

impl<R: Read> StreamParser<R> {
    /// Creates a parser over a character source, scanning the first token.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be read or the first token is
    /// malformed.
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new(reader)?,
            stack: Vec::new(),
            event: None,
            scalar: None,
            number_text: None,
        })
    }

    /// `true` exactly until the tokenizer reports end of input.
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.tokenizer.current().is_eof()
    }

    /// Number of open context nodes.
    #[must_use]
    pub fn current_depth(&self) -> usize {
        self.stack.len()
    }

    /// The most recently emitted event, if any.
    #[must_use]
    pub fn current_event(&self) -> Option<Event> {
        self.event
    }

    /// Advances the cursor and returns the next event, or `None` once the
    /// document is exhausted.
    ///
    /// A close event leaves its context inspectable until the following
    /// call, which pops it and silently consumes a trailing comma.
    ///
    /// # Errors
    ///
    /// [`SyntaxError`] when the token sequence violates the grammar,
    /// [`LexicalError`] for malformed input or a premature end of input
    /// inside an open structure.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        self.pop_deferred()?;

        let kind = self.tokenizer.current().kind();
        // One document per source: anything after the root value is an
        // error, not a second document.
        if self.stack.is_empty() && self.event.is_some() && kind != TokenKind::Eof {
            return Err(self.unexpected(kind));
        }
        match kind {
            TokenKind::Eof => {
                if self.stack.is_empty() {
                    Ok(None)
                } else {
                    Err(lexical(
                        self.tokenizer.position(),
                        LexicalError::UnexpectedEndOfInput,
                    ))
                }
            }
            TokenKind::LBrace => self.start_structure(StructKind::Object, kind),
            TokenKind::LBracket => self.start_structure(StructKind::Array, kind),
            TokenKind::RBrace => self.end_structure(StructKind::Object, kind),
            TokenKind::RBracket => self.end_structure(StructKind::Array, kind),
            TokenKind::Str
            | TokenKind::Int
            | TokenKind::Decimal
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => {
                let key_position = self
                    .stack
                    .last()
                    .is_some_and(|ctx| ctx.kind == StructKind::Object && !ctx.named);
                if key_position {
                    if kind == TokenKind::Str {
                        self.read_key()
                    } else {
                        Err(self.unexpected(kind))
                    }
                } else {
                    self.read_scalar()
                }
            }
            TokenKind::Comma | TokenKind::Colon => Err(self.unexpected(kind)),
        }
    }

    /// Text of the current [`KeyName`], [`ValueString`], or
    /// [`ValueNumber`] event; numbers are returned in their original
    /// source spelling.
    ///
    /// [`KeyName`]: Event::KeyName
    /// [`ValueString`]: Event::ValueString
    /// [`ValueNumber`]: Event::ValueNumber
    ///
    /// # Errors
    ///
    /// [`CoercionError::WrongEvent`] for any other current event.
    pub fn string_value(&self) -> Result<&str> {
        match self.event {
            Some(Event::KeyName) => self
                .stack
                .last()
                .and_then(|ctx| ctx.key.as_deref())
                .ok_or_else(|| self.wrong_event("string")),
            Some(Event::ValueString) => match &self.scalar {
                Some(Value::String(s)) => Ok(s),
                _ => Err(self.wrong_event("string")),
            },
            Some(Event::ValueNumber) => self
                .number_text
                .as_deref()
                .ok_or_else(|| self.wrong_event("string")),
            _ => Err(self.wrong_event("string")),
        }
    }

    /// The current [`ValueNumber`](Event::ValueNumber) as `i64`.
    ///
    /// A decimal-typed number answers too, provided it is integral and in
    /// range.
    ///
    /// # Errors
    ///
    /// [`CoercionError::WrongEvent`] off a number event;
    /// [`CoercionError::NotIntegral`] or [`CoercionError::IntOutOfRange`]
    /// when a decimal cannot narrow.
    pub fn long_value(&self) -> Result<i64> {
        match self.number()? {
            Value::Int(i) => Ok(*i),
            Value::Decimal(d) => {
                if !d.is_integer() {
                    return Err(CoercionError::NotIntegral(*d).into());
                }
                d.to_i64()
                    .ok_or_else(|| CoercionError::IntOutOfRange(d.to_string()).into())
            }
            _ => Err(self.wrong_event("number")),
        }
    }

    /// The current [`ValueNumber`](Event::ValueNumber) narrowed to `i32`.
    ///
    /// # Errors
    ///
    /// As [`long_value`](StreamParser::long_value), plus
    /// [`CoercionError::IntOutOfRange`] when the value exceeds `i32`.
    pub fn int_value(&self) -> Result<i32> {
        let wide = self.long_value()?;
        i32::try_from(wide).map_err(|_| CoercionError::IntOutOfRange(wide.to_string()).into())
    }

    /// The current [`ValueNumber`](Event::ValueNumber) widened to an exact
    /// decimal; an integer-typed token answers correctly.
    ///
    /// # Errors
    ///
    /// [`CoercionError::WrongEvent`] off a number event.
    pub fn decimal_value(&self) -> Result<Decimal> {
        match self.number()? {
            Value::Int(i) => Ok(Decimal::from(*i)),
            Value::Decimal(d) => Ok(*d),
            _ => Err(self.wrong_event("number")),
        }
    }

    /// The current `true`/`false` event as a boolean.
    ///
    /// # Errors
    ///
    /// [`CoercionError::WrongEvent`] for any other event.
    pub fn bool_value(&self) -> Result<bool> {
        match (self.event, &self.scalar) {
            (Some(Event::ValueTrue), _) => Ok(true),
            (Some(Event::ValueFalse), _) => Ok(false),
            _ => Err(self.wrong_event("boolean")),
        }
    }

    fn number(&self) -> Result<&Value> {
        if self.event != Some(Event::ValueNumber) {
            return Err(self.wrong_event("number"));
        }
        self.scalar
            .as_ref()
            .ok_or_else(|| self.wrong_event("number"))
    }

    fn wrong_event(&self, expected: &'static str) -> Error {
        CoercionError::WrongEvent {
            expected,
            found: self.event,
        }
        .into()
    }

    fn unexpected(&self, kind: TokenKind) -> Error {
        syntax(self.tokenizer.position(), SyntaxError::Unexpected(kind))
    }

    /// Completes the deferred pop: a context marked by a close event stays
    /// on the stack until the next cursor advance, then pops together with
    /// any trailing comma.
    fn pop_deferred(&mut self) -> Result<()> {
        let ended = self
            .stack
            .last()
            .and_then(|ctx| ctx.last_event)
            .filter(Event::is_end);
        let Some(end_event) = ended else {
            return Ok(());
        };
        self.stack.pop();
        if let Some(parent) = self.stack.last_mut() {
            parent.last_event = Some(end_event);
        }
        self.consume_separator()
    }

    /// Silently consumes a separating comma after a value or close,
    /// marking the enclosing context as expecting another entry.
    fn consume_separator(&mut self) -> Result<()> {
        if self.tokenizer.current().kind() == TokenKind::Comma && !self.stack.is_empty() {
            self.tokenizer.advance()?;
            if let Some(top) = self.stack.last_mut() {
                top.pending = true;
            }
        }
        Ok(())
    }

    fn start_structure(&mut self, kind: StructKind, token: TokenKind) -> Result<Option<Event>> {
        if let Some(top) = self.stack.last_mut() {
            if top.kind == StructKind::Object && !top.named {
                return Err(self.unexpected(token));
            }
            top.named = false;
            top.pending = false;
            top.count += 1;
        }
        self.tokenizer.advance()?;
        let event = match kind {
            StructKind::Object => Event::StartObject,
            StructKind::Array => Event::StartArray,
        };
        let mut ctx = Context::new(kind);
        ctx.last_event = Some(event);
        self.stack.push(ctx);
        log::trace!("open {kind:?}, depth {}", self.stack.len());
        self.event = Some(event);
        Ok(Some(event))
    }

    fn end_structure(&mut self, kind: StructKind, token: TokenKind) -> Result<Option<Event>> {
        let valid = self.stack.last().is_some_and(|ctx| {
            ctx.kind == kind && !ctx.named && !ctx.pending
        });
        if !valid {
            return Err(self.unexpected(token));
        }
        self.tokenizer.advance()?;
        let event = match kind {
            StructKind::Object => Event::EndObject,
            StructKind::Array => Event::EndArray,
        };
        if let Some(top) = self.stack.last_mut() {
            top.last_event = Some(event);
        }
        self.event = Some(event);
        Ok(Some(event))
    }

    fn read_key(&mut self) -> Result<Option<Event>> {
        let Token::Str(key) = self.tokenizer.advance()? else {
            return Err(self.unexpected(TokenKind::Str));
        };
        self.tokenizer.expect(TokenKind::Colon)?;
        if let Some(top) = self.stack.last_mut() {
            top.named = true;
            top.pending = false;
            top.key = Some(key);
            top.last_event = Some(Event::KeyName);
        }
        self.event = Some(Event::KeyName);
        Ok(Some(Event::KeyName))
    }

    fn read_scalar(&mut self) -> Result<Option<Event>> {
        let token = self.tokenizer.advance()?;
        let event = self.materialize(token);
        if let Some(top) = self.stack.last_mut() {
            top.named = false;
            top.pending = false;
            top.count += 1;
            top.last_event = Some(event);
        }
        self.consume_separator()?;
        self.event = Some(event);
        Ok(Some(event))
    }

    fn materialize(&mut self, token: Token) -> Event {
        self.number_text = None;
        match token {
            Token::Str(s) => {
                self.scalar = Some(Value::String(s));
                Event::ValueString
            }
            Token::Int(i) => {
                self.number_text = Some(i.to_string());
                self.scalar = Some(Value::Int(i));
                Event::ValueNumber
            }
            Token::Decimal(d, text) => {
                self.number_text = Some(text);
                self.scalar = Some(Value::Decimal(d));
                Event::ValueNumber
            }
            Token::True => {
                self.scalar = Some(Value::Bool(true));
                Event::ValueTrue
            }
            Token::False => {
                self.scalar = Some(Value::Bool(false));
                Event::ValueFalse
            }
            Token::Null => {
                self.scalar = Some(Value::Null);
                Event::ValueNull
            }
            // Guarded by the caller's kind dispatch.
            _ => unreachable!("non-scalar token in read_scalar"),
        }
    }
}
