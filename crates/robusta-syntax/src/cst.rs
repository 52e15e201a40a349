//! Concrete-tree surface consumed by the tree builder.
//!
//! The analyzer does not own a parser: the host hands it an already-parsed
//! concrete tree whose node kinds come from [`SyntaxKind`]. This module pins
//! the rowan instantiation for that tree, offers a small green-tree
//! construction API for hosts and tests, and collects the navigation helpers
//! the builder relies on (all of them skip trivia, so trees carrying
//! whitespace and comments lower identically to bare ones).

use rowan::{GreenNode, GreenToken, NodeOrToken};

use crate::syntax_kind::{JavaLanguage, SyntaxKind};

pub type SyntaxNode = rowan::SyntaxNode<JavaLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<JavaLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<JavaLanguage>;

/// An unattached green subtree: either an interior node or a token.
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Builds a green interior node.
pub fn node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenElement {
    NodeOrToken::Node(GreenNode::new(kind.into(), children))
}

/// Builds a green token carrying its source text.
pub fn token(kind: SyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

/// Builds a rooted syntax tree from a node kind and its children.
pub fn tree(kind: SyntaxKind, children: Vec<GreenElement>) -> SyntaxNode {
    SyntaxNode::new_root(GreenNode::new(kind.into(), children))
}

/// The node's direct children, nodes and tokens alike, with trivia removed.
pub fn significant_children(node: &SyntaxNode) -> impl Iterator<Item = SyntaxElement> {
    node.children_with_tokens()
        .filter(|element| !element.kind().is_trivia())
}

pub fn first_significant_child(node: &SyntaxNode) -> Option<SyntaxElement> {
    significant_children(node).next()
}

/// First direct child that is a grammar-rule node of `kind`.
pub fn child_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|child| child.kind() == kind)
}

/// All direct children that are grammar-rule nodes of `kind`, in order.
pub fn children_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxNode> {
    node.children().filter(move |child| child.kind() == kind)
}

/// First direct child token of `kind`.
pub fn token_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == kind)
}

/// True when the node has a direct child (node or token) of `kind`.
pub fn has_direct_child(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .any(|element| element.kind() == kind)
}

/// First direct child (node or token) whose kind is any of `kinds`, in child
/// order.
pub fn first_of_kinds(node: &SyntaxNode, kinds: &[SyntaxKind]) -> Option<SyntaxElement> {
    node.children_with_tokens()
        .find(|element| kinds.contains(&element.kind()))
}

/// All descendant nodes of `kind`, excluding `node` itself, in preorder.
pub fn descendants_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Vec<SyntaxNode> {
    node.descendants()
        .filter(|descendant| descendant != node && descendant.kind() == kind)
        .collect()
}

/// The nearest preceding non-trivia sibling of `element`, if any.
pub fn prev_significant_sibling(element: &SyntaxElement) -> Option<SyntaxElement> {
    let mut current = prev_sibling_or_token(element);
    while let Some(candidate) = current {
        if !candidate.kind().is_trivia() {
            return Some(candidate);
        }
        current = prev_sibling_or_token(&candidate);
    }
    None
}

/// The nearest following non-trivia sibling of `element`, if any.
pub fn next_significant_sibling(element: &SyntaxElement) -> Option<SyntaxElement> {
    let mut current = next_sibling_or_token(element);
    while let Some(candidate) = current {
        if !candidate.kind().is_trivia() {
            return Some(candidate);
        }
        current = next_sibling_or_token(&candidate);
    }
    None
}

/// The element textually preceding `element` at its own level or above: the
/// nearest non-trivia previous sibling of `element` or, failing that, of the
/// closest ancestor that has one.
pub fn prev_in_tree(element: &SyntaxElement) -> Option<SyntaxElement> {
    let mut current = element.clone();
    loop {
        if let Some(prev) = prev_significant_sibling(&current) {
            return Some(prev);
        }
        let parent = match &current {
            NodeOrToken::Node(node) => node.parent()?,
            NodeOrToken::Token(token) => token.parent()?,
        };
        current = NodeOrToken::Node(parent);
    }
}

/// First non-trivia token inside `element`, in source order.
pub fn first_significant_token(element: &SyntaxElement) -> Option<SyntaxToken> {
    match element {
        NodeOrToken::Token(token) => (!token.kind().is_trivia()).then(|| token.clone()),
        NodeOrToken::Node(node) => node
            .descendants_with_tokens()
            .filter_map(|descendant| descendant.into_token())
            .find(|token| !token.kind().is_trivia()),
    }
}

fn prev_sibling_or_token(element: &SyntaxElement) -> Option<SyntaxElement> {
    match element {
        NodeOrToken::Node(node) => node.prev_sibling_or_token(),
        NodeOrToken::Token(token) => token.prev_sibling_or_token(),
    }
}

fn next_sibling_or_token(element: &SyntaxElement) -> Option<SyntaxElement> {
    match element {
        NodeOrToken::Node(node) => node.next_sibling_or_token(),
        NodeOrToken::Token(token) => token.next_sibling_or_token(),
    }
}
