use std::fmt::Write;

use crate::model::{Document, Leaf, Node};

/// Format a document as an indented outline, one node per line.
///
/// Used by the CLI and by snapshot tests:
///
/// ```text
/// paragraph
///   text "ab" "cd"[bold]
///   emoji code="😃"
/// ```
pub fn format_outline(doc: &Document) -> String {
    let mut out = String::new();
    for node in doc.nodes() {
        format_node(&mut out, node, 0);
    }
    out
}

fn format_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Block(block) => {
            let _ = writeln!(out, "{indent}{}", block.kind());
            for child in block.nodes() {
                format_node(out, child, depth + 1);
            }
        }
        Node::Inline(inline) => {
            let _ = write!(out, "{indent}{}", inline.kind());
            for (name, value) in inline.data() {
                let _ = write!(out, " {name}={value:?}");
            }
            out.push('\n');
        }
        Node::Text(text) => {
            let leaves: Vec<String> = text.leaves().iter().map(format_leaf).collect();
            let _ = writeln!(out, "{indent}text {}", leaves.join(" "));
        }
    }
}

fn format_leaf(leaf: &Leaf) -> String {
    if leaf.marks().is_empty() {
        format!("{:?}", leaf.text())
    } else {
        let marks: Vec<&str> = leaf.marks().iter().map(|m| m.as_str()).collect();
        format!("{:?}[{}]", leaf.text(), marks.join(","))
    }
}
