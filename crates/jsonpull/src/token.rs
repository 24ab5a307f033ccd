//! Lexical tokens produced by the [`Tokenizer`](crate::Tokenizer).

use core::fmt;

use rust_decimal::Decimal;

/// The kind of a [`Token`], without its payload.
///
/// Used by [`Tokenizer::expect`](crate::Tokenizer::expect) and in syntax
/// errors to name expected versus actual tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// A string literal.
    Str,
    /// An integer that fits `i64`.
    Int,
    /// A number with a fractional part or exponent, held at exact precision.
    Decimal,
    /// The keyword `true`.
    True,
    /// The keyword `false`.
    False,
    /// The keyword `null`.
    Null,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Str => "string",
            Self::Int => "integer",
            Self::Decimal => "decimal",
            Self::True => "'true'",
            Self::False => "'false'",
            Self::Null => "'null'",
            Self::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// One lexical unit scanned from the character stream.
///
/// Scalar tokens carry their decoded payload. `Decimal` additionally keeps
/// the exact source text so a numeric value can later be read back in its
/// original spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// A decoded string literal.
    Str(String),
    /// A signed 64-bit integer.
    Int(i64),
    /// An exact-precision decimal plus the source digits it was scanned from.
    Decimal(Decimal, String),
    /// The keyword `true`.
    True,
    /// The keyword `false`.
    False,
    /// The keyword `null`.
    Null,
    /// End of input.
    Eof,
}

impl Token {
    /// Returns the payload-free kind of this token.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::LBrace => TokenKind::LBrace,
            Self::RBrace => TokenKind::RBrace,
            Self::LBracket => TokenKind::LBracket,
            Self::RBracket => TokenKind::RBracket,
            Self::Comma => TokenKind::Comma,
            Self::Colon => TokenKind::Colon,
            Self::Str(_) => TokenKind::Str,
            Self::Int(_) => TokenKind::Int,
            Self::Decimal(..) => TokenKind::Decimal,
            Self::True => TokenKind::True,
            Self::False => TokenKind::False,
            Self::Null => TokenKind::Null,
            Self::Eof => TokenKind::Eof,
        }
    }

    /// Returns `true` if the token is [`Eof`].
    ///
    /// [`Eof`]: Token::Eof
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}
