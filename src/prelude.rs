//! Lowercase constructor functions for every combinator.
//!
//! Grammar authors typically glob-import this module and build rules from
//! these free functions; the structs in [`crate::combinators`] remain
//! available when a concrete type is needed.

use regex::Regex;

use crate::combinators::*;
use crate::core::{ParseError, Parser};
use crate::result::ParseNode;

/// Always succeeds at the current position with payload `value`.
pub fn succeed(value: impl Into<String>) -> Succeed {
    Succeed::new(value)
}

/// Always fails at the current position with the given expectations.
pub fn failed(expected: Vec<String>) -> Failed {
    Failed::new(expected)
}

/// Matches `expected` exactly at the current position.
pub fn literal(expected: impl Into<String>) -> Literal {
    Literal::new(expected)
}

/// Matches a compiled regular expression anchored at the current position.
pub fn pattern(regex: Regex) -> Pattern {
    Pattern::new(regex)
}

/// Compiles `source` into an anchored pattern parser.
pub fn pattern_str(source: &str) -> Result<Pattern, ParseError> {
    Pattern::compile(source)
}

/// Greedily consumes characters while `test(char, relative_index)` holds.
pub fn take_while<F>(test: F) -> TakeWhile<F>
where
    F: Fn(char, usize) -> bool,
{
    TakeWhile::new(test)
}

/// Applies `parsers` in order, collecting their results into a container.
pub fn seq(parsers: Vec<Box<dyn Parser>>) -> Sequence {
    Sequence::new(parsers)
}

/// Tries `parsers` in order, returning the first success.
pub fn alt(parsers: Vec<Box<dyn Parser>>) -> Choice {
    Choice::new(parsers)
}

/// Binary ordered choice.
pub fn or<L, R>(left: L, right: R) -> Choice
where
    L: Parser + 'static,
    R: Parser + 'static,
{
    Choice::new(vec![Box::new(left), Box::new(right)])
}

/// Applies `parser` zero or more times.
pub fn many<P>(parser: P) -> Many<P>
where
    P: Parser,
{
    Many::new(parser)
}

/// Matches `parser` or succeeds with an empty payload.
pub fn opt<P>(parser: P) -> Optional<P>
where
    P: Parser,
{
    Optional::new(parser)
}

/// One or more `item`s separated by `separator`; only items are kept.
pub fn sep_by1<P, S>(item: P, separator: S) -> SeparatedList1<P, S>
where
    P: Parser,
    S: Parser,
{
    SeparatedList1::new(item, separator)
}

/// Zero or more `item`s separated by `separator`; only items are kept.
pub fn sep_by<P, S>(item: P, separator: S) -> SeparatedList<P, S>
where
    P: Parser,
    S: Parser,
{
    SeparatedList::new(item, separator)
}

/// Transforms successful results of `parser` with `f`.
pub fn map<P, F>(f: F, parser: P) -> Map<P, F>
where
    P: Parser,
    F: Fn(ParseNode) -> ParseNode,
{
    Map::new(parser, f)
}

/// Sequences `parsers`, then transforms the container with `f`.
pub fn seq_map<F>(f: F, parsers: Vec<Box<dyn Parser>>) -> Map<Sequence, F>
where
    F: Fn(ParseNode) -> ParseNode,
{
    Map::new(Sequence::new(parsers), f)
}

/// Parses `parser` between `left` and `right`, surfacing the middle payload
/// over the full wrapped span.
pub fn wrap<L, P, R>(left: L, parser: P, right: R) -> Delimited<L, P, R>
where
    L: Parser,
    P: Parser,
    R: Parser,
{
    Delimited::new(left, parser, right)
}

/// Sequences two parsers, surfacing the second result.
pub fn then<P1, P2>(parser: P1, next: P2) -> Then<P1, P2>
where
    P1: Parser,
    P2: Parser,
{
    Then::new(parser, next)
}

/// Sequences two parsers, surfacing the first payload over the combined span.
pub fn skip<P1, P2>(parser: P1, next: P2) -> Skip<P1, P2>
where
    P1: Parser,
    P2: Parser,
{
    Skip::new(parser, next)
}

/// Labels successful results of `parser` for diagnostic rendering.
pub fn named<P>(label: &str, parser: P) -> Named<P>
where
    P: Parser,
{
    Named::new(parser, label)
}

/// Creates an unbound placeholder for a self-referential rule.
pub fn deferred() -> Deferred {
    Deferred::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_map_surfaces_inner_payload() {
        // The same reconstruction `wrap` performs, spelled out with seq_map:
        // keep the middle payload, extend the span to the right delimiter.
        let parser = seq_map(
            |node| {
                let children = node.into_children();
                children[1].clone().merge(&children[2])
            },
            vec![
                Box::new(literal("(")),
                Box::new(literal("x")),
                Box::new(literal(")")),
            ],
        );
        let node = parser.parse("(x)", 0).unwrap();
        assert!(node.is_success());
        assert_eq!(node.text(), "x");
        assert_eq!(node.end(), 3);
    }

    #[test]
    fn test_seq_map_passes_failure_through() {
        let parser = seq_map(
            |node| node.labeled("never applied"),
            vec![Box::new(literal("a")), Box::new(literal("b"))],
        );
        let node = parser.parse("ax", 0).unwrap();
        assert!(!node.is_success());
        assert_eq!(node.label(), None);
        assert_eq!(node.end(), 1);
        assert_eq!(node.expected(), ["b".to_string()]);
    }
}
