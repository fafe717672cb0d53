//! # parsekit: A Parser Combinator Engine
//!
//! parsekit provides a small set of composable building blocks for
//! assembling recursive-descent parsers: primitive matchers (literal
//! strings, anchored regular expressions, predicate-driven prefixes) and
//! combinators (sequencing, ordered choice, repetition, optionality,
//! separated lists, result transformation, lazy self-referential rules).
//!
//! ## Core Components
//!
//! * **Parser Trait**: the execution contract — a pure function of an input
//!   string and a start position ([`core`])
//! * **Parse Tree**: the immutable [`ParseNode`] value produced by every
//!   attempt, success or failure alike ([`result`])
//! * **Combinators**: composable parser builders ([`combinators`],
//!   [`prelude`])
//! * **Rendering**: a deterministic diagnostic text form ([`render`])
//!
//! ## Architecture Design
//!
//! Composing combinators executes nothing; it builds a parser value. A
//! caller invokes that value once against an input and a start offset and
//! gets back a [`ParseNode`] synchronously. Mismatch is a failing node
//! carrying the expectations that would have allowed success, never a
//! panic; the `Err` channel is reserved for grammar-construction bugs such
//! as invoking an unbound [`combinators::Deferred`] rule.
//!
//! ## Usage Example
//!
//! ```
//! use parsekit::prelude::*;
//! use parsekit::{Parser, ParserExt};
//!
//! // item ("," item)* inside brackets
//! let list = sep_by(literal("a"), literal(",")).wrap(literal("["), literal("]"));
//! let node = list.parse("[a,a]", 0).unwrap();
//! assert!(node.is_success());
//! assert_eq!(node.children().len(), 2);
//! assert_eq!(node.end(), 5);
//! ```

pub mod combinators;
pub mod core;
pub mod prelude;
pub mod render;
pub mod result;

pub use crate::combinators::ParserExt;
pub use crate::core::{ParseError, ParseResult, Parser};
pub use crate::result::{NodeKind, ParseNode};
