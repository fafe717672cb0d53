//! # Parse Tree Values
//!
//! This module defines [`ParseNode`], the single value type produced by
//! every parse attempt. A node is either `Content` (a matched leaf carrying
//! text) or `Container` (an ordered group of child nodes), and carries a
//! success flag, the end position of the consumed span, and, on failure,
//! the ordered set of expectations that would have allowed success.
//!
//! Nodes are built fresh by each combinator invocation and never mutated in
//! place afterwards; operations that derive one node from another copy
//! fields into a new value.

use std::fmt;

use crate::render;

/// Distinguishes leaf nodes from grouping nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A matched leaf; `text` is meaningful, `children` is empty
    Content,
    /// An ordered group; `children` is meaningful, `text` is empty
    Container,
}

/// The outcome of one parse attempt.
///
/// Exactly one of `text`/`children` is meaningful, selected by `kind`.
/// A failing node is always `Content` with empty text, and its end position
/// equals the position where matching was attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    kind: NodeKind,
    status: bool,
    end: usize,
    expected: Vec<String>,
    children: Vec<ParseNode>,
    text: String,
    label: Option<String>,
}

impl ParseNode {
    /// Creates a successful leaf covering `text`, ending at `end`.
    pub fn success(end: usize, text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Content,
            status: true,
            end,
            expected: Vec::new(),
            children: Vec::new(),
            text: text.into(),
            label: None,
        }
    }

    /// Creates a failing leaf at `end` with the given expectations.
    pub fn failure(end: usize, expected: Vec<String>) -> Self {
        Self {
            kind: NodeKind::Content,
            status: false,
            end,
            expected,
            children: Vec::new(),
            text: String::new(),
            label: None,
        }
    }

    /// Creates a successful group of `children` ending at `end`.
    pub fn container(end: usize, children: Vec<ParseNode>) -> Self {
        Self {
            kind: NodeKind::Container,
            status: true,
            end,
            expected: Vec::new(),
            children,
            text: String::new(),
            label: None,
        }
    }

    /// Creates a leaf with no payload, e.g. for zero-width matches.
    pub fn empty(status: bool, end: usize) -> Self {
        Self {
            kind: NodeKind::Content,
            status,
            end,
            expected: Vec::new(),
            children: Vec::new(),
            text: String::new(),
            label: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_success(&self) -> bool {
        self.status
    }

    /// Byte offset immediately after the consumed span. On failure this is
    /// the position where matching was attempted.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Ordered set of descriptions of what would have allowed success;
    /// populated only on failure.
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    pub fn children(&self) -> &[ParseNode] {
        &self.children
    }

    /// Consumes the node, yielding its children. Empty for leaves.
    pub fn into_children(self) -> Vec<ParseNode> {
        self.children
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// True when the node carries no payload: empty text for a leaf, no
    /// children for a group.
    pub fn is_empty(&self) -> bool {
        match self.kind {
            NodeKind::Content => self.text.is_empty(),
            NodeKind::Container => self.children.is_empty(),
        }
    }

    /// Returns a copy of this node carrying `label`.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Merges spans: keeps this node's payload but extends its end position
    /// to cover `other` when `other` reaches further. A merged span covers
    /// at least as much input as its widest constituent.
    pub fn merge(self, other: &ParseNode) -> Self {
        if self.end >= other.end {
            self
        } else {
            Self {
                end: other.end,
                ..self
            }
        }
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::stringify(self))
    }
}
