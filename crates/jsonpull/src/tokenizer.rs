//! Character-level lexer with one token of lookahead.
//!
//! The tokenizer owns its reader exclusively and is single-use: once it
//! reports [`Token::Eof`] it stays at end of input, and after any error the
//! instance must be discarded.
//!
//! # Examples
//!
//! ```
//! use jsonpull::{Token, TokenKind, Tokenizer};
//!
//! let mut t = Tokenizer::new("[1, 2]".as_bytes()).unwrap();
//! assert_eq!(t.current().kind(), TokenKind::LBracket);
//! t.expect(TokenKind::LBracket).unwrap();
//! assert_eq!(*t.current(), Token::Int(1));
//! ```

use std::io::Read;

use rust_decimal::Decimal;

use crate::{
    error::{Error, LexicalError, Result, SyntaxError, lexical, syntax},
    token::{Token, TokenKind},
};

const REFILL_SIZE: usize = 256;

/// Outcome of [`Tokenizer::match_field_int`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMatch {
    /// The input does not start with the expected quoted field name. When
    /// the very first character is not a quote the token stream is left
    /// untouched; otherwise the probe has already consumed part of the
    /// name.
    NotMatchName,
    /// The name matched but the value is not a plain in-range integer
    /// (fractional, overflowing, or missing).
    NotMatch,
    /// Matched `"name":<int>,` — the comma is consumed and becomes the
    /// current token, leaving the scan position at the next member.
    Value(i64),
    /// Matched `"name":<int>}` — the closing brace is consumed and the
    /// token after it becomes current.
    End(i64),
}

/// Streaming lexer over a blocking character source.
///
/// Exactly one scanned token is available from construction until end of
/// input, after which [`Token::Eof`] is returned permanently.
#[derive(Debug)]
pub struct Tokenizer<R> {
    reader: R,
    buf: [u8; REFILL_SIZE],
    buf_len: usize,
    index: usize,
    /// Characters consumed so far, for error positions.
    pos: usize,
    ch: Option<char>,
    token: Token,
}

impl<R: Read> Tokenizer<R> {
    /// Creates a tokenizer and scans the first token.
    ///
    /// # Errors
    ///
    /// Fails if the first token is malformed or the source cannot be read.
    pub fn new(reader: R) -> Result<Self> {
        let mut tokenizer = Self {
            reader,
            buf: [0; REFILL_SIZE],
            buf_len: 0,
            index: 0,
            pos: 0,
            ch: None,
            token: Token::Eof,
        };
        tokenizer.next_char()?;
        tokenizer.scan_token()?;
        Ok(tokenizer)
    }

    /// The already-scanned current token. Idempotent.
    #[must_use]
    pub fn current(&self) -> &Token {
        &self.token
    }

    /// Absolute character offset consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Scans the next token, returning the token that was current.
    ///
    /// Once end of input is reached this keeps returning [`Token::Eof`].
    ///
    /// # Errors
    ///
    /// Any [`LexicalError`] raised while scanning; the instance must then
    /// be discarded.
    pub fn advance(&mut self) -> Result<Token> {
        if self.token.is_eof() {
            return Ok(Token::Eof);
        }
        let mut previous = Token::Eof;
        core::mem::swap(&mut previous, &mut self.token);
        self.scan_token()?;
        Ok(previous)
    }

    /// Asserts that the current token has the given kind, then advances.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::UnexpectedToken`] naming the expected and actual
    /// kinds on mismatch; [`LexicalError::UnexpectedEndOfInput`] when the
    /// input ended instead.
    pub fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.token.kind() == kind {
            self.advance()?;
            return Ok(());
        }
        if self.token.is_eof() {
            return Err(lexical(self.pos, LexicalError::UnexpectedEndOfInput));
        }
        Err(syntax(
            self.pos,
            SyntaxError::UnexpectedToken {
                expected: kind,
                found: self.token.kind(),
            },
        ))
    }

    /// Releases the underlying source. The tokenizer cannot be used again.
    pub fn close(self) {
        drop(self);
    }

    /// Fast path for the common `"name":<int>` member shape.
    ///
    /// Matches the given field name and a plain integer value directly on
    /// the character stream, short-circuiting full tokenization. A
    /// [`FieldMatch::NotMatchName`] returned before any character was
    /// consumed (first character is not `"`) leaves ordinary tokenization
    /// intact; later mismatches leave the scan position inside the member
    /// and the instance should be discarded.
    ///
    /// A fractional value or one that overflows `i64` is reported as
    /// [`FieldMatch::NotMatch`], never silently accepted.
    ///
    /// # Errors
    ///
    /// I/O or lexical failures from the underlying source.
    pub fn match_field_int(&mut self, field_name: &str) -> Result<FieldMatch> {
        if self.ch != Some('"') {
            return Ok(FieldMatch::NotMatchName);
        }
        self.next_char()?;

        for expected in field_name.chars() {
            match self.ch {
                Some(c) if c == expected => self.next_char()?,
                _ => return Ok(FieldMatch::NotMatchName),
            }
        }

        if self.ch != Some('"') {
            return Ok(FieldMatch::NotMatchName);
        }
        self.next_char()?;
        if self.ch != Some(':') {
            return Ok(FieldMatch::NotMatchName);
        }
        self.next_char()?;

        let negative = if self.ch == Some('-') {
            self.next_char()?;
            true
        } else {
            false
        };

        let Some(first @ '0'..='9') = self.ch else {
            return Ok(FieldMatch::NotMatch);
        };
        let mut value = i64::from(first as u8 - b'0');
        self.next_char()?;
        loop {
            match self.ch {
                Some(c @ '0'..='9') => {
                    let digit = i64::from(c as u8 - b'0');
                    value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                        Some(v) => v,
                        None => return Ok(FieldMatch::NotMatch),
                    };
                }
                Some('.') => return Ok(FieldMatch::NotMatch),
                _ => break,
            }
            self.next_char()?;
        }
        if negative {
            value = -value;
        }

        match self.ch {
            Some(',') => {
                self.next_char()?;
                self.token = Token::Comma;
                Ok(FieldMatch::Value(value))
            }
            Some('}') => {
                self.next_char()?;
                self.scan_token()?;
                match self.token.kind() {
                    TokenKind::Comma
                    | TokenKind::RBracket
                    | TokenKind::RBrace
                    | TokenKind::Eof => Ok(FieldMatch::End(value)),
                    _ => Ok(FieldMatch::NotMatch),
                }
            }
            _ => Ok(FieldMatch::NotMatch),
        }
    }

    fn lex(&self, source: LexicalError) -> Error {
        lexical(self.pos, source)
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.index == self.buf_len {
            self.buf_len = self.reader.read(&mut self.buf)?;
            self.index = 0;
            if self.buf_len == 0 {
                return Ok(None);
            }
        }
        let b = self.buf[self.index];
        self.index += 1;
        Ok(Some(b))
    }

    /// Decodes the next character from the refill buffer, completing
    /// multi-byte sequences across refills.
    fn next_char(&mut self) -> Result<()> {
        let Some(b0) = self.next_byte()? else {
            self.ch = None;
            return Ok(());
        };

        let width = match b0 {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(self.lex(LexicalError::InvalidUtf8)),
        };

        if width == 1 {
            self.ch = Some(char::from(b0));
        } else {
            let mut bytes = [b0, 0, 0, 0];
            for slot in bytes.iter_mut().take(width).skip(1) {
                let Some(b) = self.next_byte()? else {
                    return Err(self.lex(LexicalError::InvalidUtf8));
                };
                *slot = b;
            }
            let decoded = core::str::from_utf8(&bytes[..width])
                .map_err(|_| self.lex(LexicalError::InvalidUtf8))?;
            self.ch = decoded.chars().next();
        }
        self.pos += 1;
        Ok(())
    }

    fn scan_token(&mut self) -> Result<()> {
        while matches!(self.ch, Some(' ' | '\r' | '\n' | '\t')) {
            self.next_char()?;
        }

        let Some(ch) = self.ch else {
            self.token = Token::Eof;
            return Ok(());
        };

        match ch {
            '{' => {
                self.token = Token::LBrace;
                self.next_char()?;
            }
            '}' => {
                self.token = Token::RBrace;
                self.next_char()?;
            }
            '[' => {
                self.token = Token::LBracket;
                self.next_char()?;
            }
            ']' => {
                self.token = Token::RBracket;
                self.next_char()?;
            }
            ',' => {
                self.token = Token::Comma;
                self.next_char()?;
            }
            ':' => {
                self.token = Token::Colon;
                self.next_char()?;
            }
            '"' => self.scan_string()?,
            '-' | '+' | '0'..='9' => self.scan_number()?,
            'n' => self.scan_keyword("null", Token::Null)?,
            't' => self.scan_keyword("true", Token::True)?,
            'f' => self.scan_keyword("false", Token::False)?,
            other => return Err(self.lex(LexicalError::InvalidCharacter(other))),
        }

        log::trace!("scanned {:?}", self.token.kind());
        Ok(())
    }

    fn scan_keyword(&mut self, literal: &'static str, token: Token) -> Result<()> {
        for expected in literal.chars() {
            match self.ch {
                Some(c) if c == expected => self.next_char()?,
                Some(c) => return Err(self.lex(LexicalError::InvalidCharacter(c))),
                None => return Err(self.lex(LexicalError::UnexpectedEndOfInput)),
            }
        }
        self.token = token;
        Ok(())
    }

    /// Accumulates the number's exact source text, then parses it as `i64`
    /// when no dot or exponent was seen and as an exact decimal otherwise.
    fn scan_number(&mut self) -> Result<()> {
        let mut text = String::new();
        let mut fractional = false;

        if let Some(sign @ ('-' | '+')) = self.ch {
            text.push(sign);
            self.next_char()?;
        }

        if !matches!(self.ch, Some('0'..='9')) {
            return Err(self.lex(LexicalError::InvalidNumber(text)));
        }
        while let Some(digit @ '0'..='9') = self.ch {
            text.push(digit);
            self.next_char()?;
        }

        if self.ch == Some('.') {
            fractional = true;
            text.push('.');
            self.next_char()?;

            if !matches!(self.ch, Some('0'..='9')) {
                return Err(self.lex(LexicalError::InvalidNumber(text)));
            }
            while let Some(digit @ '0'..='9') = self.ch {
                text.push(digit);
                self.next_char()?;
            }

            // Only one dot is permitted.
            if self.ch == Some('.') {
                text.push('.');
                return Err(self.lex(LexicalError::InvalidNumber(text)));
            }
        }

        let mut exponent = false;
        if let Some(e @ ('e' | 'E')) = self.ch {
            exponent = true;
            text.push(e);
            self.next_char()?;
            if let Some(sign @ ('-' | '+')) = self.ch {
                text.push(sign);
                self.next_char()?;
            }
            if !matches!(self.ch, Some('0'..='9')) {
                return Err(self.lex(LexicalError::InvalidNumber(text)));
            }
            while let Some(digit @ '0'..='9') = self.ch {
                text.push(digit);
                self.next_char()?;
            }
        }

        if !fractional && !exponent {
            let value = text.parse::<i64>().map_err(|e| {
                use std::num::IntErrorKind;
                match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        self.lex(LexicalError::NumberOutOfRange(text.clone()))
                    }
                    _ => self.lex(LexicalError::InvalidNumber(text.clone())),
                }
            })?;
            self.token = Token::Int(value);
            return Ok(());
        }

        let digits = text.strip_prefix('+').unwrap_or(&text);
        let value = if exponent {
            Decimal::from_scientific(digits)
        } else {
            Decimal::from_str_exact(digits)
        }
        .map_err(|_| self.lex(LexicalError::NumberOutOfRange(text.clone())))?;
        self.token = Token::Decimal(value, text);
        Ok(())
    }

    fn scan_string(&mut self) -> Result<()> {
        self.next_char()?; // opening quote
        let mut value = String::new();
        loop {
            match self.ch {
                None => return Err(self.lex(LexicalError::UnterminatedString)),
                Some('"') => {
                    self.next_char()?;
                    break;
                }
                Some('\\') => {
                    self.next_char()?;
                    let Some(escape) = self.ch else {
                        return Err(self.lex(LexicalError::UnterminatedString));
                    };
                    match escape {
                        '"' | '\\' | '/' => value.push(escape),
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        'b' => value.push('\u{8}'),
                        'f' => value.push('\u{c}'),
                        't' => value.push('\t'),
                        'u' => {
                            let code = self.scan_hex4()?;
                            // Each \uXXXX decodes independently; a lone
                            // surrogate cannot live in a Rust string and
                            // becomes U+FFFD.
                            value.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                        }
                        other => return Err(self.lex(LexicalError::InvalidEscape(other))),
                    }
                    self.next_char()?;
                }
                Some(c) => {
                    value.push(c);
                    self.next_char()?;
                }
            }
        }
        self.token = Token::Str(value);
        Ok(())
    }

    /// Reads the four hex digits of a `\uXXXX` escape, leaving the last
    /// digit as the current character.
    fn scan_hex4(&mut self) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            self.next_char()?;
            let Some(c) = self.ch else {
                return Err(self.lex(LexicalError::UnterminatedString));
            };
            code = code * 16 + self.hex(c)?;
        }
        Ok(code)
    }

    fn hex(&self, c: char) -> Result<u32> {
        c.to_digit(16)
            .ok_or_else(|| self.lex(LexicalError::InvalidHexDigit(c)))
    }
}
