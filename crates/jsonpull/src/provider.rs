//! Pluggable construction boundary.
//!
//! Applications that want to swap the codec implementation behind a
//! trait object their own code owns can depend on [`JsonProvider`]
//! instead of the concrete types. [`DefaultProvider`] is the built-in
//! implementation.

use std::io::{Read, Write};

use crate::{
    config::JsonConfig, error::Result, generator::Generator, reader::TreeReader,
    stream::StreamParser,
};

/// Factory for the three codec surfaces.
pub trait JsonProvider {
    /// Creates a streaming event parser over `reader`.
    ///
    /// # Errors
    ///
    /// Fails when the first token cannot be scanned.
    fn parser<R: Read>(&self, reader: R) -> Result<StreamParser<R>>;

    /// Creates a tree-mode reader over `reader`.
    ///
    /// # Errors
    ///
    /// Fails when the first token cannot be scanned.
    fn reader<R: Read>(&self, reader: R) -> Result<TreeReader<R>>;

    /// Creates a generator writing to `sink` with the given config.
    fn generator<W: Write>(&self, sink: W, config: JsonConfig) -> Generator<W>;
}

/// Provider backed by the types in this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProvider;

impl JsonProvider for DefaultProvider {
    fn parser<R: Read>(&self, reader: R) -> Result<StreamParser<R>> {
        StreamParser::new(reader)
    }

    fn reader<R: Read>(&self, reader: R) -> Result<TreeReader<R>> {
        TreeReader::new(reader)
    }

    fn generator<W: Write>(&self, sink: W, config: JsonConfig) -> Generator<W> {
        Generator::new(sink, config)
    }
}
