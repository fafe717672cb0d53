//! # Parser Combinators
//!
//! This module implements the combinators that form the building blocks of
//! the engine. Each combinator is a small struct implementing [`Parser`];
//! composing them builds a parser value, and no parsing happens until that
//! value is invoked.
//!
//! ## Combinator Types
//!
//! * **Primitive Combinators**: `Succeed`, `Failed`, `Literal`, `Pattern`, `TakeWhile`
//! * **Sequential Combinators**: `Sequence`, `Delimited`, `Then`, `Skip`
//! * **Alternative Combinators**: `Choice`, `Optional`
//! * **Repetition Combinators**: `Many`, `SeparatedList`, `SeparatedList1`
//! * **Transformation Combinators**: `Map`, `Named`
//! * **Recursive Binding**: `Deferred`
//!
//! Failure is communicated through failing [`ParseNode`] values; the `Err`
//! channel of [`ParseResult`] carries only construction bugs and is
//! propagated unchanged by every combinator here.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::core::{ParseError, ParseResult, Parser};
use crate::result::ParseNode;

/// Succeed: Always succeeds without consuming input
///
/// Yields a leaf carrying the given payload text at the current position.
/// Useful as the identity element of choices, e.g. to make a rule optional.
#[derive(Clone)]
pub struct Succeed {
    value: String,
}

impl Succeed {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Parser for Succeed {
    fn parse(&self, _input: &str, pos: usize) -> ParseResult {
        Ok(ParseNode::success(pos, self.value.clone()))
    }
}

/// Failed: Always fails with the supplied expectation set
#[derive(Clone)]
pub struct Failed {
    expected: Vec<String>,
}

impl Failed {
    pub fn new(expected: Vec<String>) -> Self {
        Self { expected }
    }
}

impl Parser for Failed {
    fn parse(&self, _input: &str, pos: usize) -> ParseResult {
        Ok(ParseNode::failure(pos, self.expected.clone()))
    }
}

/// Literal: Matches an exact string at the current position
///
/// Succeeds iff the input at the current position starts with the expected
/// string, advancing past it. On mismatch, or when the remaining input is
/// too short, fails with the string itself as the expectation and does not
/// advance.
#[derive(Clone)]
pub struct Literal {
    expected: String,
}

impl Literal {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl Parser for Literal {
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let end = pos + self.expected.len();
        // Byte comparison keeps arbitrary positions safe on multi-byte input.
        if end <= input.len() && input.as_bytes()[pos..end] == *self.expected.as_bytes() {
            Ok(ParseNode::success(end, self.expected.clone()))
        } else {
            Ok(ParseNode::failure(pos, vec![self.expected.clone()]))
        }
    }
}

/// Pattern: Matches a regular expression anchored at the current position
///
/// The match must start exactly at the current position, not merely occur
/// somewhere later in the input. On a miss, fails with the pattern source
/// as the expectation.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }

    /// Compiles `source` and wraps it; compilation errors surface as
    /// [`ParseError::InvalidPattern`].
    pub fn compile(source: &str) -> Result<Self, ParseError> {
        let regex = Regex::new(source).map_err(|e| ParseError::InvalidPattern {
            source_text: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }
}

impl Parser for Pattern {
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        if pos > input.len() {
            return Ok(ParseNode::failure(pos, vec![self.regex.to_string()]));
        }
        match self.regex.find_at(input, pos) {
            Some(m) if m.start() == pos => Ok(ParseNode::success(m.end(), m.as_str())),
            _ => Ok(ParseNode::failure(pos, vec![self.regex.to_string()])),
        }
    }
}

/// TakeWhile: Greedily consumes the maximal prefix satisfying a predicate
///
/// The predicate receives each character together with its index relative
/// to the starting position. Always succeeds, possibly consuming nothing.
#[derive(Clone)]
pub struct TakeWhile<F> {
    test: F,
}

impl<F> TakeWhile<F> {
    pub fn new(test: F) -> Self {
        Self { test }
    }
}

impl<F> Parser for TakeWhile<F>
where
    F: Fn(char, usize) -> bool,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let rest = match input.get(pos..) {
            Some(rest) => rest,
            None => return Ok(ParseNode::success(pos, "")),
        };
        let mut taken = 0;
        for (i, (offset, ch)) in rest.char_indices().enumerate() {
            if !(self.test)(ch, i) {
                break;
            }
            taken = offset + ch.len_utf8();
        }
        Ok(ParseNode::success(pos + taken, &rest[..taken]))
    }
}

/// Choice: Tries alternatives in order and returns the first success
///
/// PEG-style committed choice: every alternative is attempted from the same
/// starting position, so partial consumption by a failing alternative never
/// leaks. When all alternatives fail, the expectations of every branch are
/// accumulated, in attempt order and without duplicates, into a single
/// failure at the starting position.
pub struct Choice {
    parsers: Vec<Box<dyn Parser>>,
}

impl Choice {
    pub fn new(parsers: Vec<Box<dyn Parser>>) -> Self {
        Self { parsers }
    }
}

impl Parser for Choice {
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let mut expected: Vec<String> = Vec::new();
        for parser in &self.parsers {
            let node = parser.parse(input, pos)?;
            if node.is_success() {
                return Ok(node);
            }
            for e in node.expected() {
                if !expected.iter().any(|known| known == e) {
                    expected.push(e.clone());
                }
            }
        }
        tracing::trace!(
            target: "parsekit::choice",
            position = pos,
            alternatives = self.parsers.len(),
            "no alternative matched"
        );
        Ok(ParseNode::failure(pos, expected))
    }
}

/// Sequence: Applies parsers in order, threading the position forward
///
/// Succeeds only if every step succeeds, yielding a container of the step
/// results in order whose end is the last step's end. Fails fast on the
/// first failing step, carrying that step's expectations and end position.
pub struct Sequence {
    parsers: Vec<Box<dyn Parser>>,
}

impl Sequence {
    pub fn new(parsers: Vec<Box<dyn Parser>>) -> Self {
        Self { parsers }
    }
}

impl Parser for Sequence {
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let mut children = Vec::with_capacity(self.parsers.len());
        let mut current_pos = pos;
        for parser in &self.parsers {
            let node = parser.parse(input, current_pos)?;
            if !node.is_success() {
                return Ok(ParseNode::failure(node.end(), node.expected().to_vec()));
            }
            current_pos = node.end();
            children.push(node);
        }
        Ok(ParseNode::container(current_pos, children))
    }
}

/// Many: Applies a parser zero or more times
///
/// Collects each success as a child and advances until the first failure,
/// which is discarded. Never fails; zero repetitions yield an empty
/// container. A parser that succeeds without consuming input would repeat
/// forever here; guarding against that is the grammar author's
/// responsibility.
#[derive(Clone)]
pub struct Many<P> {
    parser: P,
}

impl<P> Many<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<P> Parser for Many<P>
where
    P: Parser,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let mut children = Vec::new();
        let mut current_pos = pos;
        loop {
            let node = self.parser.parse(input, current_pos)?;
            if !node.is_success() {
                tracing::trace!(
                    target: "parsekit::many",
                    position = current_pos,
                    items_collected = children.len(),
                    "repetition stopped"
                );
                break;
            }
            current_pos = node.end();
            children.push(node);
        }
        Ok(ParseNode::container(current_pos, children))
    }
}

/// Optional: Matches a parser or succeeds with an empty payload
///
/// Equivalent to `or(parser, succeed(""))`; never fails.
#[derive(Clone)]
pub struct Optional<P> {
    parser: P,
}

impl<P> Optional<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<P> Parser for Optional<P>
where
    P: Parser,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let node = self.parser.parse(input, pos)?;
        if node.is_success() {
            Ok(node)
        } else {
            tracing::trace!(
                target: "parsekit::optional",
                position = pos,
                "optional parser suppressed a mismatch"
            );
            Ok(ParseNode::success(pos, ""))
        }
    }
}

/// SeparatedList1: Parses one or more items separated by a delimiter
///
/// Matches an item, then as many separator-item pairs as possible. The
/// resulting container holds only the item results; separators are parsed
/// for position advancement but discarded. The end position is the last
/// item's end, so a trailing separator is left unconsumed. Fails when the
/// first item fails.
#[derive(Clone)]
pub struct SeparatedList1<P, S> {
    item_parser: P,
    separator_parser: S,
}

impl<P, S> SeparatedList1<P, S> {
    pub fn new(item_parser: P, separator_parser: S) -> Self {
        Self {
            item_parser,
            separator_parser,
        }
    }
}

impl<P, S> Parser for SeparatedList1<P, S>
where
    P: Parser,
    S: Parser,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let first = self.item_parser.parse(input, pos)?;
        if !first.is_success() {
            return Ok(ParseNode::failure(first.end(), first.expected().to_vec()));
        }
        let mut current_pos = first.end();
        let mut children = vec![first];
        loop {
            let sep = self.separator_parser.parse(input, current_pos)?;
            if !sep.is_success() {
                break;
            }
            let item = self.item_parser.parse(input, sep.end())?;
            if !item.is_success() {
                // Separator without a following item: neither joins the list.
                break;
            }
            current_pos = item.end();
            children.push(item);
        }
        Ok(ParseNode::container(current_pos, children))
    }
}

/// SeparatedList: Parses zero or more items separated by a delimiter
///
/// Like [`SeparatedList1`], but succeeds with an empty container when no
/// item matches at all.
#[derive(Clone)]
pub struct SeparatedList<P, S> {
    inner: SeparatedList1<P, S>,
}

impl<P, S> SeparatedList<P, S> {
    pub fn new(item_parser: P, separator_parser: S) -> Self {
        Self {
            inner: SeparatedList1::new(item_parser, separator_parser),
        }
    }
}

impl<P, S> Parser for SeparatedList<P, S>
where
    P: Parser,
    S: Parser,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let node = self.inner.parse(input, pos)?;
        if node.is_success() {
            Ok(node)
        } else {
            Ok(ParseNode::container(pos, Vec::new()))
        }
    }
}

/// Map: Transforms successful results with a function
///
/// Applies `f` to the node produced by the inner parser, e.g. to relabel,
/// discard structure, or merge spans. Failing nodes pass through unchanged.
/// The mapper must preserve or correctly recompute the end position; a
/// mapper that shrinks the consumed span breaks subsequent advancement.
#[derive(Clone)]
pub struct Map<P, F> {
    parser: P,
    f: F,
}

impl<P, F> Map<P, F> {
    pub fn new(parser: P, f: F) -> Self {
        Self { parser, f }
    }
}

impl<P, F> Parser for Map<P, F>
where
    P: Parser,
    F: Fn(ParseNode) -> ParseNode,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let node = self.parser.parse(input, pos)?;
        if node.is_success() {
            Ok((self.f)(node))
        } else {
            Ok(node)
        }
    }
}

/// Delimited: Parses content between left and right delimiters
///
/// Surfaces the middle parser's payload while reporting the full wrapped
/// span, i.e. the end position of the right delimiter.
#[derive(Clone)]
pub struct Delimited<L, P, R> {
    left: L,
    parser: P,
    right: R,
}

impl<L, P, R> Delimited<L, P, R> {
    pub fn new(left: L, parser: P, right: R) -> Self {
        Self {
            left,
            parser,
            right,
        }
    }
}

impl<L, P, R> Parser for Delimited<L, P, R>
where
    L: Parser,
    P: Parser,
    R: Parser,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let left = self.left.parse(input, pos)?;
        if !left.is_success() {
            return Ok(ParseNode::failure(left.end(), left.expected().to_vec()));
        }
        let node = self.parser.parse(input, left.end())?;
        if !node.is_success() {
            return Ok(ParseNode::failure(node.end(), node.expected().to_vec()));
        }
        let right = self.right.parse(input, node.end())?;
        if !right.is_success() {
            return Ok(ParseNode::failure(right.end(), right.expected().to_vec()));
        }
        Ok(node.merge(&right))
    }
}

/// Then: Applies two parsers in order and surfaces the second result
#[derive(Clone)]
pub struct Then<P1, P2> {
    parser: P1,
    next: P2,
}

impl<P1, P2> Then<P1, P2> {
    pub fn new(parser: P1, next: P2) -> Self {
        Self { parser, next }
    }
}

impl<P1, P2> Parser for Then<P1, P2>
where
    P1: Parser,
    P2: Parser,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let first = self.parser.parse(input, pos)?;
        if !first.is_success() {
            return Ok(ParseNode::failure(first.end(), first.expected().to_vec()));
        }
        let next = self.next.parse(input, first.end())?;
        if !next.is_success() {
            return Ok(ParseNode::failure(next.end(), next.expected().to_vec()));
        }
        Ok(next)
    }
}

/// Skip: Applies two parsers in order, surfacing the first result with the
/// combined span
///
/// The neighbor's payload is discarded but its end position is kept, so the
/// surfaced node covers everything both parsers consumed.
#[derive(Clone)]
pub struct Skip<P1, P2> {
    parser: P1,
    next: P2,
}

impl<P1, P2> Skip<P1, P2> {
    pub fn new(parser: P1, next: P2) -> Self {
        Self { parser, next }
    }
}

impl<P1, P2> Parser for Skip<P1, P2>
where
    P1: Parser,
    P2: Parser,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let first = self.parser.parse(input, pos)?;
        if !first.is_success() {
            return Ok(ParseNode::failure(first.end(), first.expected().to_vec()));
        }
        let next = self.next.parse(input, first.end())?;
        if !next.is_success() {
            return Ok(ParseNode::failure(next.end(), next.expected().to_vec()));
        }
        Ok(first.merge(&next))
    }
}

/// Named: Attaches a diagnostic label to successful results
///
/// Failing results pass through unlabelled.
#[derive(Clone)]
pub struct Named<P> {
    parser: P,
    label: String,
}

impl<P> Named<P> {
    pub fn new(parser: P, label: impl Into<String>) -> Self {
        Self {
            parser,
            label: label.into(),
        }
    }
}

impl<P> Parser for Named<P>
where
    P: Parser,
{
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let node = self.parser.parse(input, pos)?;
        if node.is_success() {
            Ok(node.labeled(self.label.clone()))
        } else {
            Ok(node)
        }
    }
}

/// Deferred: A placeholder for a parser assigned after construction
///
/// Mutually recursive rules cannot reference each other by value at
/// construction time without infinite eager recursion. A `Deferred` handle
/// breaks the cycle: clone it wherever the rule is referenced, build the
/// dependent combinators, then assign the real parser exactly once with
/// [`Deferred::define`] before the first invocation.
///
/// Invoking an unbound handle is a construction bug and reports
/// [`ParseError::UnboundPlaceholder`] instead of a grammar mismatch. The
/// single assignment happens-before any invocation that observes it.
#[derive(Clone, Default)]
pub struct Deferred {
    cell: Arc<OnceLock<Box<dyn Parser>>>,
}

impl Deferred {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// Binds the real parser. Returns [`ParseError::PlaceholderRebound`]
    /// when the handle is already bound.
    pub fn define<P>(&self, parser: P) -> Result<(), ParseError>
    where
        P: Parser + 'static,
    {
        self.cell
            .set(Box::new(parser))
            .map_err(|_| ParseError::PlaceholderRebound)
    }
}

impl Parser for Deferred {
    fn parse(&self, input: &str, pos: usize) -> ParseResult {
        let parser = self
            .cell
            .get()
            .ok_or(ParseError::UnboundPlaceholder { position: pos })?;
        parser.parse(input, pos)
    }
}

/// Fluent composition methods for any parser.
///
/// Pure sugar over the free functions in [`crate::prelude`]; no method adds
/// behavior of its own.
pub trait ParserExt: Parser + Sized {
    /// Ordered choice between `self` and `other`
    fn or<P>(self, other: P) -> Choice
    where
        Self: 'static,
        P: Parser + 'static,
    {
        Choice::new(vec![Box::new(self), Box::new(other)])
    }

    /// Zero-or-more repetition of `self`
    fn many(self) -> Many<Self> {
        Many::new(self)
    }

    /// Makes `self` optional
    fn opt(self) -> Optional<Self> {
        Optional::new(self)
    }

    /// Transforms successful results with `f`
    fn map<F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(ParseNode) -> ParseNode,
    {
        Map::new(self, f)
    }

    /// Sequences `self` with `next`, surfacing `next`'s result
    fn then<P>(self, next: P) -> Then<Self, P>
    where
        P: Parser,
    {
        Then::new(self, next)
    }

    /// Sequences `self` with `next`, surfacing `self`'s payload over the
    /// combined span
    fn skip<P>(self, next: P) -> Skip<Self, P>
    where
        P: Parser,
    {
        Skip::new(self, next)
    }

    /// Wraps `self` between `left` and `right` delimiters
    fn wrap<L, R>(self, left: L, right: R) -> Delimited<L, Self, R>
    where
        L: Parser,
        R: Parser,
    {
        Delimited::new(left, self, right)
    }

    /// Labels successful results for diagnostic rendering
    fn named(self, label: &str) -> Named<Self> {
        Named::new(self, label)
    }

    /// Passes `self` through a caller-supplied parser transformer
    fn thru<F, P>(self, wrapper: F) -> P
    where
        F: FnOnce(Self) -> P,
        P: Parser,
    {
        wrapper(self)
    }
}

impl<P: Parser> ParserExt for P {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::NodeKind;

    #[test]
    fn test_succeed() {
        let parser = Succeed::new("v");
        let node = parser.parse("anything", 3).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 3);
        assert_eq!(node.text(), "v");
    }

    #[test]
    fn test_failed() {
        let parser = Failed::new(vec!["a value".to_string()]);
        let node = parser.parse("anything", 2).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 2);
        assert_eq!(node.expected(), ["a value".to_string()]);
    }

    #[test]
    fn test_literal_match() {
        let parser = Literal::new("test");
        let node = parser.parse("test", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 4);
        assert_eq!(node.text(), "test");

        // Match in the middle of the input.
        let node = parser.parse("xxtest", 2).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 6);
    }

    #[test]
    fn test_literal_mismatch() {
        let parser = Literal::new("not test");
        let node = parser.parse("test", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 0);
        assert_eq!(node.expected(), ["not test".to_string()]);
    }

    #[test]
    fn test_literal_past_end_of_input() {
        let parser = Literal::new("test");
        let node = parser.parse("te", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 0);

        // Start position beyond the input length.
        let node = parser.parse("te", 10).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 10);
    }

    #[test]
    fn test_pattern_anchored() {
        let parser = Pattern::compile("[0-9]+").unwrap();
        let node = parser.parse("123abc", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 3);
        assert_eq!(node.text(), "123");

        // A match exists later in the input but not at the position itself.
        let node = parser.parse("ab12", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 0);

        let node = parser.parse("ab12", 2).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 4);
        assert_eq!(node.text(), "12");
    }

    #[test]
    fn test_pattern_past_end_of_input() {
        let parser = Pattern::compile("[0-9]*").unwrap();
        let node = parser.parse("12", 5).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 5);
    }

    #[test]
    fn test_pattern_invalid_source() {
        assert!(matches!(
            Pattern::compile("(unclosed"),
            Err(ParseError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_take_while() {
        let digits = TakeWhile::new(|c: char, _| c.is_ascii_digit());
        let node = digits.parse("123abc", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 3);
        assert_eq!(node.text(), "123");

        // Zero characters match: still a success.
        let node = digits.parse("abc", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 0);
        assert_eq!(node.text(), "");

        // Runs to the end of the input.
        let node = digits.parse("456", 0).unwrap();
        assert_eq!(node.end(), 3);
        assert_eq!(node.text(), "456");
    }

    #[test]
    fn test_take_while_relative_index() {
        // Accept at most two characters via the relative index.
        let parser = TakeWhile::new(|_, i| i < 2);
        let node = parser.parse("abcdef", 2).unwrap();
        assert_eq!(node.end(), 4);
        assert_eq!(node.text(), "cd");
    }

    #[test]
    fn test_take_while_past_end_of_input() {
        let parser = TakeWhile::new(|c: char, _| c.is_ascii_digit());
        let node = parser.parse("12", 5).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 5);
        assert_eq!(node.text(), "");
    }

    #[test]
    fn test_choice_returns_first_success() {
        let parser = Choice::new(vec![
            Box::new(Literal::new("a")),
            Box::new(Literal::new("ab")),
        ]);
        // The first alternative wins even though the second also matches.
        let node = parser.parse("ab", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.text(), "a");
        assert_eq!(node.end(), 1);
    }

    #[test]
    fn test_choice_accumulates_expectations() {
        let parser = Choice::new(vec![
            Box::new(Literal::new("foo")),
            Box::new(Literal::new("bar")),
            Box::new(Literal::new("foo")),
        ]);
        let node = parser.parse("baz", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 0);
        assert_eq!(node.expected(), ["foo".to_string(), "bar".to_string()]);
    }

    #[test]
    fn test_choice_resets_to_start_position() {
        // The first alternative consumes "a" before failing internally; the
        // failure must still report the original starting position.
        let partial = Sequence::new(vec![
            Box::new(Literal::new("a")),
            Box::new(Literal::new("X")),
        ]);
        let parser = Choice::new(vec![Box::new(partial), Box::new(Literal::new("z"))]);
        let node = parser.parse("ab", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 0);
        assert_eq!(node.expected(), ["X".to_string(), "z".to_string()]);
    }

    #[test]
    fn test_sequence() {
        let parser = Sequence::new(vec![
            Box::new(Literal::new("a")),
            Box::new(Literal::new("b")),
            Box::new(Literal::new("c")),
        ]);
        let node = parser.parse("abc", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.kind(), NodeKind::Container);
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.end(), 3);
        assert_eq!(node.children()[2].text(), "c");
    }

    #[test]
    fn test_sequence_fails_fast() {
        let parser = Sequence::new(vec![
            Box::new(Literal::new("ab")),
            Box::new(Literal::new("cd")),
        ]);
        let node = parser.parse("abXX", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.kind(), NodeKind::Content);
        // The failure carries the failing step's position and expectations.
        assert_eq!(node.end(), 2);
        assert_eq!(node.expected(), ["cd".to_string()]);
    }

    #[test]
    fn test_many() {
        let parser = Many::new(Literal::new("test"));
        let node = parser.parse("testtest", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.end(), 8);

        // Zero matches is still a success.
        let node = parser.parse("", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.children().len(), 0);
        assert_eq!(node.end(), 0);

        // Beyond the input length.
        let node = parser.parse("test", 10).unwrap();
        assert!(node.is_success());
        assert_eq!(node.children().len(), 0);
        assert_eq!(node.end(), 10);
    }

    #[test]
    fn test_optional() {
        let parser = Optional::new(Literal::new("a"));
        let node = parser.parse("a", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 1);

        let node = parser.parse("b", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.end(), 0);
        assert_eq!(node.text(), "");
    }

    #[test]
    fn test_separated_list1() {
        let parser = SeparatedList1::new(Literal::new("a"), Literal::new(","));
        let node = parser.parse("a,a,a", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.children().len(), 3);
        for child in node.children() {
            assert_eq!(child.text(), "a");
        }
        assert_eq!(node.end(), 5);
    }

    #[test]
    fn test_separated_list1_trailing_separator() {
        let parser = SeparatedList1::new(Literal::new("a"), Literal::new(","));
        let node = parser.parse("a,a,", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.children().len(), 2);
        // The trailing separator is not part of the span.
        assert_eq!(node.end(), 3);
    }

    #[test]
    fn test_separated_list1_requires_one_item() {
        let parser = SeparatedList1::new(Literal::new("a"), Literal::new(","));
        let node = parser.parse(",a", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 0);
        assert_eq!(node.expected(), ["a".to_string()]);
    }

    #[test]
    fn test_separated_list_allows_empty() {
        let parser = SeparatedList::new(Literal::new("a"), Literal::new(","));
        let node = parser.parse("", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.kind(), NodeKind::Container);
        assert_eq!(node.children().len(), 0);
        assert_eq!(node.end(), 0);

        let node = parser.parse("a,a", 0).unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.end(), 3);
    }

    #[test]
    fn test_map_transforms_success_only() {
        let parser = Map::new(Literal::new("ab"), |node: ParseNode| node.labeled("Pair"));
        let node = parser.parse("ab", 0).unwrap();
        assert_eq!(node.label(), Some("Pair"));
        assert_eq!(node.end(), 2);

        // Failures pass through untouched.
        let node = parser.parse("xy", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.label(), None);
        assert_eq!(node.expected(), ["ab".to_string()]);
    }

    #[test]
    fn test_delimited() {
        let parser = Delimited::new(Literal::new("("), Literal::new("x"), Literal::new(")"));
        let node = parser.parse("(x)", 0).unwrap();
        assert!(node.is_success());
        // The middle payload is surfaced over the full wrapped span.
        assert_eq!(node.text(), "x");
        assert_eq!(node.end(), 3);
    }

    #[test]
    fn test_delimited_missing_right() {
        let parser = Delimited::new(Literal::new("("), Literal::new("x"), Literal::new(")"));
        let node = parser.parse("(x", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.end(), 2);
        assert_eq!(node.expected(), [")".to_string()]);
    }

    #[test]
    fn test_then() {
        let parser = Then::new(Literal::new("a"), Literal::new("b"));
        let node = parser.parse("ab", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.text(), "b");
        assert_eq!(node.end(), 2);
    }

    #[test]
    fn test_skip() {
        let parser = Skip::new(Literal::new("a"), Literal::new(","));
        let node = parser.parse("a,", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.text(), "a");
        // The skipped neighbor still extends the span.
        assert_eq!(node.end(), 2);
    }

    #[test]
    fn test_named() {
        let parser = Named::new(Literal::new("1"), "Number");
        let node = parser.parse("1", 0).unwrap();
        assert_eq!(node.label(), Some("Number"));

        let node = parser.parse("x", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.label(), None);
    }

    #[test]
    fn test_deferred_unbound_fails_fast() {
        let rule = Deferred::new();
        assert_eq!(
            rule.parse("x", 3),
            Err(ParseError::UnboundPlaceholder { position: 3 })
        );
    }

    #[test]
    fn test_deferred_rebind_is_rejected() {
        let rule = Deferred::new();
        rule.define(Literal::new("a")).unwrap();
        assert_eq!(
            rule.define(Literal::new("b")),
            Err(ParseError::PlaceholderRebound)
        );
        // The first binding stays in effect.
        let node = rule.parse("a", 0).unwrap();
        assert!(node.is_success());
    }

    #[test]
    fn test_deferred_recursion() {
        // value = "x" | "[" value "]"
        let value = Deferred::new();
        let nested = Delimited::new(Literal::new("["), value.clone(), Literal::new("]"));
        value
            .define(Choice::new(vec![
                Box::new(Literal::new("x")),
                Box::new(nested),
            ]))
            .unwrap();

        let node = value.parse("[[x]]", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.text(), "x");
        assert_eq!(node.end(), 5);
    }

    #[test]
    fn test_parser_ext_chaining() {
        let parser = Literal::new("a").skip(Literal::new(",")).many();
        let node = parser.parse("a,a,a,", 0).unwrap();
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.end(), 6);

        let parser = Literal::new("a").or(Literal::new("b")).named("Letter");
        let node = parser.parse("b", 0).unwrap();
        assert_eq!(node.text(), "b");
        assert_eq!(node.label(), Some("Letter"));
    }

    #[test]
    fn test_parser_ext_thru() {
        let parser = Literal::new("a").thru(Many::new);
        let node = parser.parse("aaa", 0).unwrap();
        assert_eq!(node.children().len(), 3);
    }
}
