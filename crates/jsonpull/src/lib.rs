//! Pull-based JSON codec: a single-lookahead tokenizer, a streaming
//! event parser with an explicit context stack, a tree reader, and a
//! buffered generator with automatic separator insertion.
//!
//! The three surfaces share one tokenizer and one [`Value`] model:
//!
//! * [`StreamParser`] walks a document event by event at constant
//!   memory per nesting level, with typed accessors on the current
//!   event.
//! * [`TreeReader`] (or [`parse_str`]) materializes a whole document
//!   as a [`Value`] tree with insertion-ordered objects.
//! * [`Generator`] writes a document to any [`std::io::Write`] sink,
//!   inserting commas and colons itself and validating the call
//!   sequence.
//!
//! ```rust
//! use jsonpull::{Event, Generator, JsonConfig, StreamParser, parse_str};
//!
//! let value = parse_str(r#"{"name":"ada","scores":[1,2.50]}"#)?;
//! assert_eq!(value.get_str("name"), Some("ada"));
//! // Decimal scale survives the round trip.
//! assert_eq!(value.to_string(), r#"{"name":"ada","scores":[1,2.50]}"#);
//!
//! let mut parser = StreamParser::new(&b"[7]"[..])?;
//! assert_eq!(parser.next_event()?, Some(Event::StartArray));
//! assert_eq!(parser.next_event()?, Some(Event::ValueNumber));
//! assert_eq!(parser.long_value()?, 7);
//!
//! let mut out = Vec::new();
//! let mut g = Generator::new(&mut out, JsonConfig::default());
//! g.begin_object()?;
//! g.write_key("ok")?;
//! g.write_bool(true)?;
//! g.end_object()?;
//! g.close()?;
//! assert_eq!(out, br#"{"ok":true}"#);
//! # Ok::<(), jsonpull::Error>(())
//! ```

mod config;
mod context;
mod error;
mod event;
mod generator;
mod provider;
mod reader;
mod stream;
mod token;
mod tokenizer;
mod value;

pub use config::JsonConfig;
pub use error::{CoercionError, Error, LexicalError, Result, StateError, SyntaxError};
pub use event::{Event, StructKind};
pub use generator::Generator;
pub use provider::{DefaultProvider, JsonProvider};
pub use reader::{TreeReader, parse_str};
pub use stream::StreamParser;
pub use token::{Token, TokenKind};
pub use tokenizer::{FieldMatch, Tokenizer};
pub use value::{Array, Map, Value};
