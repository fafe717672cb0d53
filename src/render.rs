//! # Diagnostic Rendering
//!
//! A deterministic tree-to-text renderer for [`ParseNode`] values. The
//! output is a nested, two-space-indented form exposing the success flag,
//! the end position and, depending on the node kind, either the children
//! (rendered recursively) or the matched text plus, on failure, the
//! expectation set. Rendering is pure and used both for eyeballing parse
//! trees and as the substrate for literal-fixture tests.

use crate::result::{NodeKind, ParseNode};

/// Renders `node` to its diagnostic text form.
pub fn stringify(node: &ParseNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out, 0);
    out
}

fn indent(out: &mut String, nest: usize) {
    for _ in 0..nest {
        out.push_str("  ");
    }
}

fn write_node(node: &ParseNode, out: &mut String, nest: usize) {
    indent(out, nest);
    if node.is_success() {
        if let Some(label) = node.label() {
            out.push_str(label);
            out.push(' ');
        }
    }
    out.push_str("{\n");

    indent(out, nest + 1);
    out.push_str(&format!("\"status\": {},\n", node.is_success()));
    indent(out, nest + 1);
    out.push_str(&format!("\"end\": {},\n", node.end()));

    match node.kind() {
        NodeKind::Container => {
            indent(out, nest + 1);
            out.push_str("\"children\": [\n");
            for child in node.children() {
                write_node(child, out, nest + 2);
            }
            indent(out, nest + 1);
            out.push_str("],\n");
        }
        NodeKind::Content => {
            indent(out, nest + 1);
            out.push_str(&format!("\"text\": \"{}\",\n", node.text()));
            if !node.is_success() {
                indent(out, nest + 1);
                out.push_str("\"expected\": [\n");
                for expectation in node.expected() {
                    indent(out, nest + 2);
                    out.push_str(&format!("\"{}\",\n", expectation));
                }
                indent(out, nest + 1);
                out.push_str("],\n");
            }
        }
    }

    indent(out, nest);
    out.push('}');
    if nest != 0 {
        out.push(',');
    }
    out.push('\n');
}
