//! Recursive-descent tree reader.
//!
//! Materializes one full [`Value`] from a tokenizer. Recursion depth
//! equals document nesting depth; callers that need unbounded depth
//! should use [`StreamParser`](crate::StreamParser) instead.

use std::io::Read;

use crate::{
    error::{LexicalError, Result, SyntaxError, lexical, syntax},
    token::{Token, TokenKind},
    tokenizer::Tokenizer,
    value::{Array, Map, Value},
};

/// Convenience wrapper: parses one document from a string slice.
///
/// # Examples
///
/// ```
/// use jsonpull::{Value, parse_str};
///
/// let v = parse_str(r#"{"a":[1,2]}"#).unwrap();
/// assert_eq!(v.get_i64("a"), None); // "a" holds an array
/// assert_eq!(v.get("a").unwrap().as_array().unwrap().len(), 2);
/// ```
///
/// # Errors
///
/// Any lexical or syntax error in the text.
pub fn parse_str(text: &str) -> Result<Value> {
    let mut reader = TreeReader::new(text.as_bytes())?;
    let value = reader.read_value()?;
    reader.expect_end()?;
    Ok(value)
}

/// Tree-mode reader over one character source.
///
/// Single-use: wraps exactly one tokenizer for exactly one document.
#[derive(Debug)]
pub struct TreeReader<R> {
    tokenizer: Tokenizer<R>,
}

impl<R: Read> TreeReader<R> {
    /// Creates a reader, scanning the first token.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be read or the first token is
    /// malformed.
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new(reader)?,
        })
    }

    /// Reads one value of any kind, advancing past it.
    ///
    /// # Errors
    ///
    /// [`SyntaxError`] when the current token cannot start a value,
    /// [`LexicalError`] on premature end of input.
    pub fn read_value(&mut self) -> Result<Value> {
        match self.tokenizer.current().kind() {
            TokenKind::LBrace => Ok(Value::Object(self.read_object()?)),
            TokenKind::LBracket => Ok(Value::Array(self.read_array()?)),
            TokenKind::Str
            | TokenKind::Int
            | TokenKind::Decimal
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => {
                let token = self.tokenizer.advance()?;
                Ok(match token {
                    Token::Str(s) => Value::String(s),
                    Token::Int(i) => Value::Int(i),
                    Token::Decimal(d, _) => Value::Decimal(d),
                    Token::True => Value::Bool(true),
                    Token::False => Value::Bool(false),
                    _ => Value::Null,
                })
            }
            TokenKind::Eof => Err(self.end_of_input()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Reads one object. The current token must be `{`.
    ///
    /// Later duplicate keys overwrite the earlier entry in place, keeping
    /// the position of the first insertion.
    ///
    /// # Errors
    ///
    /// [`SyntaxError`] on any grammar violation, [`LexicalError`] on
    /// premature end of input.
    pub fn read_object(&mut self) -> Result<Map> {
        self.tokenizer.expect(TokenKind::LBrace)?;
        let mut map = Map::new();

        if self.tokenizer.current().kind() == TokenKind::RBrace {
            self.tokenizer.advance()?;
            return Ok(map);
        }

        loop {
            let key = match self.tokenizer.current().kind() {
                TokenKind::Str => {
                    let Token::Str(key) = self.tokenizer.advance()? else {
                        return Err(self.unexpected(TokenKind::Str));
                    };
                    key
                }
                TokenKind::Eof => return Err(self.end_of_input()),
                other => return Err(self.unexpected(other)),
            };
            self.tokenizer.expect(TokenKind::Colon)?;
            let value = self.read_value()?;
            map.insert(key, value);

            match self.tokenizer.current().kind() {
                TokenKind::Comma => {
                    self.tokenizer.advance()?;
                }
                TokenKind::RBrace => {
                    self.tokenizer.advance()?;
                    return Ok(map);
                }
                TokenKind::Eof => return Err(self.end_of_input()),
                other => return Err(self.unexpected(other)),
            }
        }
    }

    /// Reads one array. The current token must be `[`.
    ///
    /// # Errors
    ///
    /// [`SyntaxError`] on any grammar violation, [`LexicalError`] on
    /// premature end of input.
    pub fn read_array(&mut self) -> Result<Array> {
        self.tokenizer.expect(TokenKind::LBracket)?;
        let mut array = Array::new();

        if self.tokenizer.current().kind() == TokenKind::RBracket {
            self.tokenizer.advance()?;
            return Ok(array);
        }

        loop {
            array.push(self.read_value()?);

            match self.tokenizer.current().kind() {
                TokenKind::Comma => {
                    self.tokenizer.advance()?;
                }
                TokenKind::RBracket => {
                    self.tokenizer.advance()?;
                    return Ok(array);
                }
                TokenKind::Eof => return Err(self.end_of_input()),
                other => return Err(self.unexpected(other)),
            }
        }
    }

    /// Asserts that the input holds nothing further.
    ///
    /// # Errors
    ///
    /// [`SyntaxError`] naming the stray token.
    pub fn expect_end(&mut self) -> Result<()> {
        match self.tokenizer.current().kind() {
            TokenKind::Eof => Ok(()),
            other => Err(self.unexpected(other)),
        }
    }

    /// Releases the underlying tokenizer and source.
    pub fn close(self) {
        self.tokenizer.close();
    }

    fn unexpected(&self, kind: TokenKind) -> crate::Error {
        syntax(self.tokenizer.position(), SyntaxError::Unexpected(kind))
    }

    fn end_of_input(&self) -> crate::Error {
        lexical(
            self.tokenizer.position(),
            LexicalError::UnexpectedEndOfInput,
        )
    }
}
