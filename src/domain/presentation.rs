//! Source presentation recovery
//!
//! `serde_yaml` yields values only. Quoting and block styles, number text
//! and comments are recovered from a tree-sitter syntax tree of the same
//! source and laid over the parsed [`Node`] tree.
//!
//! Recovery is best effort: wherever the two trees disagree in shape, the
//! affected subtree keeps [`ScalarStyle::Auto`], canonical numbers and no
//! comments.
//!
//! Comments are attached to block mapping entries only:
//!
//! | Source | Attached as |
//! |--------|-------------|
//! | full-line comments directly above a key (blank lines allowed) | `before` |
//! | a comment at the end of the key's line | `trailing` |
//!
//! Other comments (end of file, above scalar sequence items, inside flow
//! collections) are dropped.

use std::collections::HashMap;

use tree_sitter::{Node as SyntaxNode, Parser};

use super::document::{Comments, Node, Scalar, ScalarStyle};

/// Copies styles, number text and comments found in `source` onto `node`
pub fn recover_presentation(source: &str, node: &mut Node) {
    let mut parser = Parser::new();
    if parser.set_language(&tree_sitter_yaml::LANGUAGE.into()).is_err() {
        return;
    }
    let Some(tree) = parser.parse(source, None) else {
        return;
    };

    let root = tree.root_node();
    if root.has_error() {
        return;
    }

    let Some(document) = named_children(root).into_iter().find(|n| n.kind() == "document") else {
        return;
    };

    let source = Source::new(source, root);
    if let Some(value) = named_children(document)
        .into_iter()
        .find(|n| matches!(n.kind(), "block_node" | "flow_node"))
    {
        overlay(value, &source, node);
    }
}

/// A comment and whether it is alone on its line
struct Comment<'s> {
    text: &'s str,
    full_line: bool,
}

/// Source text with its comments indexed by row
struct Source<'s> {
    text: &'s str,
    lines: Vec<&'s str>,
    comments: HashMap<usize, Comment<'s>>,
}

impl<'s> Source<'s> {
    fn new(text: &'s str, root: SyntaxNode<'_>) -> Self {
        let mut source = Self {
            text,
            lines: text.split('\n').collect(),
            comments: HashMap::new(),
        };
        source.collect_comments(root);
        source
    }

    fn collect_comments(&mut self, node: SyntaxNode<'_>) {
        if node.kind() == "comment" {
            let start = node.start_position();
            let line_start = node.start_byte() - start.column;
            let full_line = self
                .text
                .get(line_start..node.start_byte())
                .is_some_and(|prefix| prefix.trim().is_empty());
            if let Some(text) = self.slice(node) {
                self.comments.insert(
                    start.row,
                    Comment {
                        text: text.trim_end(),
                        full_line,
                    },
                );
            }
            return;
        }

        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        for child in children {
            self.collect_comments(child);
        }
    }

    fn slice(&self, node: SyntaxNode<'_>) -> Option<&'s str> {
        self.text.get(node.start_byte()..node.end_byte())
    }

    /// Comments for a key starting on `row`
    fn comments_at(&self, row: usize) -> Comments {
        let mut before = Vec::new();
        for line in (0..row).rev() {
            match self.comments.get(&line) {
                Some(comment) if comment.full_line => before.push(comment.text.to_string()),
                Some(_) => break,
                None if self.lines.get(line).is_some_and(|l| l.trim().is_empty()) => {}
                None => break,
            }
        }
        before.reverse();

        let trailing = self
            .comments
            .get(&row)
            .filter(|comment| !comment.full_line)
            .map(|comment| comment.text.to_string());

        Comments { before, trailing }
    }
}

fn named_children(node: SyntaxNode<'_>) -> Vec<SyntaxNode<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Strips the `block_node`/`flow_node` wrapper along with anchors, tags
/// and comments
fn content(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    if !matches!(node.kind(), "block_node" | "flow_node") {
        return Some(node);
    }
    named_children(node)
        .into_iter()
        .find(|n| !matches!(n.kind(), "anchor" | "tag" | "comment"))
}

fn overlay(syntax: SyntaxNode<'_>, source: &Source<'_>, node: &mut Node) {
    if let Node::Tagged(tagged) = node {
        overlay(syntax, source, &mut tagged.value);
        return;
    }

    let Some(inner) = content(syntax) else {
        return;
    };

    match (inner.kind(), node) {
        ("block_mapping" | "flow_mapping", Node::Mapping(mapping)) => {
            let pairs: Vec<_> = named_children(inner)
                .into_iter()
                .filter(|n| matches!(n.kind(), "block_mapping_pair" | "flow_pair" | "flow_node"))
                .collect();
            if pairs.len() != mapping.len() {
                return;
            }
            for (pair, entry) in pairs.into_iter().zip(mapping.entries_mut()) {
                if pair.kind() == "block_mapping_pair" {
                    entry.comments = source.comments_at(pair.start_position().row);
                }
                if let Some(value_syntax) = pair.child_by_field_name("value") {
                    overlay(value_syntax, source, &mut entry.value);
                }
            }
        }
        ("block_sequence", Node::Sequence(items)) => {
            let entries: Vec<_> = named_children(inner)
                .into_iter()
                .filter(|n| n.kind() == "block_sequence_item")
                .collect();
            if entries.len() != items.len() {
                return;
            }
            for (entry, item) in entries.into_iter().zip(items.iter_mut()) {
                if let Some(value_syntax) = named_children(entry)
                    .into_iter()
                    .find(|n| matches!(n.kind(), "block_node" | "flow_node"))
                {
                    overlay(value_syntax, source, item);
                }
            }
        }
        ("flow_sequence", Node::Sequence(items)) => {
            let entries: Vec<_> = named_children(inner)
                .into_iter()
                .filter(|n| matches!(n.kind(), "flow_node" | "flow_pair"))
                .collect();
            if entries.len() != items.len() {
                return;
            }
            for (entry, item) in entries.into_iter().zip(items.iter_mut()) {
                overlay(entry, source, item);
            }
        }
        ("plain_scalar", Node::Scalar(Scalar::Number { repr, .. })) => {
            *repr = source.slice(inner).map(|text| text.trim().to_string());
        }
        (kind, Node::Scalar(Scalar::String { style, .. })) => {
            if let Some(found) = scalar_style(kind, inner, source) {
                *style = found;
            }
        }
        _ => {}
    }
}

fn scalar_style(kind: &str, syntax: SyntaxNode<'_>, source: &Source<'_>) -> Option<ScalarStyle> {
    match kind {
        "single_quote_scalar" => Some(ScalarStyle::SingleQuoted),
        "double_quote_scalar" => Some(ScalarStyle::DoubleQuoted),
        "block_scalar" => source
            .slice(syntax)
            .filter(|text| text.starts_with('|'))
            .map(|_| ScalarStyle::Literal),
        _ => None,
    }
}
