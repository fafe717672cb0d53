//! # Core Parser Definitions
//!
//! This module defines the fundamental parser interface and the error type
//! that form the foundation of the combinator engine.
//!
//! Grammar mismatch is *not* an error here: a parser that fails to match
//! returns a [`ParseNode`] whose status flag is false. [`ParseError`] is
//! reserved for construction bugs that must surface immediately instead of
//! masquerading as a mismatch.

use thiserror::Error;

use crate::result::ParseNode;

/// Result type for parsing operations.
///
/// The `Ok` variant carries the outcome of the attempt, success or mismatch
/// alike. The `Err` variant is reserved for programming errors in grammar
/// construction (see [`ParseError`]).
pub type ParseResult = Result<ParseNode, ParseError>;

/// Parser trait defines the core parsing interface.
///
/// A parser is a pure function of an input string and a byte position. It
/// never mutates the input and never panics on an ordinary mismatch, so the
/// same parser value may be invoked repeatedly or shared between rules
/// without coordination.
///
/// # Arguments
///
/// * `input` - The input string to parse
/// * `pos` - The byte offset to start parsing from; may lie beyond the end
///   of the input, in which case primitives fail cleanly
pub trait Parser {
    fn parse(&self, input: &str, pos: usize) -> ParseResult;
}

impl<F> Parser for F
where
    F: Fn(&str, usize) -> ParseResult,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        self(input, pos)
    }
}

/// Error type for grammar-construction bugs.
///
/// These are fatal conditions reported through `Err`, unlike grammar
/// mismatches which are ordinary failing [`ParseNode`] values. Every
/// combinator propagates them unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A deferred rule was invoked before a real parser was assigned to it
    #[error("unbound placeholder invoked at position {position}: call `define` before parsing")]
    UnboundPlaceholder { position: usize },
    /// A deferred rule was assigned twice
    #[error("placeholder already bound: `define` must be called exactly once")]
    PlaceholderRebound,
    /// A pattern source string failed to compile
    #[error("invalid pattern `{source_text}`: {message}")]
    InvalidPattern {
        source_text: String,
        message: String,
    },
}
