//! Error taxonomy for the codec.
//!
//! Every failure is fail-fast and terminal for the component that raised
//! it: a tokenizer, parser, reader, or generator that has returned an
//! error must be discarded and rebuilt.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{event::Event, token::TokenKind};

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The character stream itself is malformed.
    #[error("lexical error at offset {pos}: {source}")]
    Lexical {
        /// Absolute character offset the tokenizer had consumed.
        pos: usize,
        /// What the scanner found wrong.
        #[source]
        source: LexicalError,
    },

    /// The token sequence violates the JSON grammar.
    #[error("syntax error at offset {pos}: {source}")]
    Syntax {
        /// Absolute character offset the tokenizer had consumed.
        pos: usize,
        /// The grammar rule that was violated.
        #[source]
        source: SyntaxError,
    },

    /// An operation was invalid in the component's current state.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// A scalar accessor did not match the current event or value.
    #[error("coercion error: {0}")]
    Coercion(#[from] CoercionError),

    /// The date format string could not be applied.
    #[error("invalid date format {0:?}")]
    DateFormat(String),

    /// The underlying source or sink failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for [`Error::Lexical`].
    #[must_use]
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::Lexical { .. })
    }

    /// Returns `true` for [`Error::Syntax`].
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// Returns `true` for [`Error::State`].
    #[must_use]
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }

    /// Returns `true` for [`Error::Coercion`].
    #[must_use]
    pub fn is_coercion(&self) -> bool {
        matches!(self, Self::Coercion(_))
    }
}

/// Malformed character stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexicalError {
    /// A character that cannot start or continue any token.
    #[error("illegal character '{0}'")]
    InvalidCharacter(char),
    /// A backslash followed by a character that is not an escape.
    #[error("illegal escape character '{0}'")]
    InvalidEscape(char),
    /// A non-hex character inside a `\uXXXX` escape.
    #[error("illegal hex digit '{0}'")]
    InvalidHexDigit(char),
    /// Input ended inside a string literal.
    #[error("unterminated string")]
    UnterminatedString,
    /// Input ended where more was required.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// An integer outside `i64` or a decimal beyond exact precision.
    #[error("number out of range: {0}")]
    NumberOutOfRange(String),
    /// A number violating the grammar, such as a second decimal point.
    #[error("malformed number: {0}")]
    InvalidNumber(String),
    /// A byte sequence that does not decode as UTF-8.
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

/// Token sequence violates the grammar.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// An expectation mismatch, naming both sides.
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        /// The kind the grammar required here.
        expected: TokenKind,
        /// The kind actually scanned.
        found: TokenKind,
    },
    /// A token that cannot appear at the current position.
    #[error("unexpected {0}")]
    Unexpected(TokenKind),
}

/// Operation invalid in the component's current state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// A write was attempted after `close`.
    #[error("generator is closed")]
    Closed,
    /// A value write inside an object with no key pending.
    #[error("value written without a pending key")]
    ValueWithoutKey,
    /// A key write while the innermost context is not an object.
    #[error("key written outside an object")]
    KeyOutsideObject,
    /// A second key write before the first key received its value.
    #[error("key written while another key is pending")]
    KeyAlreadyWritten,
    /// An object close while a key still awaits its value.
    #[error("structure closed with a pending key")]
    PendingKey,
    /// An `end_*` call with no matching open structure.
    #[error("unbalanced end of structure")]
    UnbalancedEnd,
}

/// Scalar accessor invoked for the wrong event, or a value that cannot be
/// represented as the requested type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoercionError {
    /// A typed accessor was called while a different event is current.
    #[error("{expected} accessor called while current event is {found:?}")]
    WrongEvent {
        /// What the accessor was after, in plain words.
        expected: &'static str,
        /// The event that was actually current.
        found: Option<Event>,
    },
    /// An integer accessor on a decimal with a fractional part.
    #[error("decimal {0} is not integral")]
    NotIntegral(Decimal),
    /// A numeric value outside the requested integer width.
    #[error("number {0} does not fit the requested integer width")]
    IntOutOfRange(String),
    /// A value outside the boolean coercion contract.
    #[error("value cannot be coerced to a boolean")]
    NotBoolean,
}

pub(crate) fn lexical(pos: usize, source: LexicalError) -> Error {
    log::debug!("lexical error at {pos}: {source}");
    Error::Lexical { pos, source }
}

pub(crate) fn syntax(pos: usize, source: SyntaxError) -> Error {
    log::debug!("syntax error at {pos}: {source}");
    Error::Syntax { pos, source }
}
