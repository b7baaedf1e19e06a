use crate::{GrammemeSet, Node};
use std::fmt;

/// A single-position pattern inside a rule's right-hand side.
///
/// ```text
/// 'the'      -> NodeMatcher::Word("the")
/// NOUN,sing  -> NodeMatcher::Grammemes({NOUN, sing})
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeMatcher {
    /// Match the node's surface text exactly.
    Word(String),
    /// Match a node compatible with these grammemes (compatibility is decided
    /// by the node type).
    Grammemes(GrammemeSet),
}

impl NodeMatcher {
    pub fn matches<N: Node>(&self, node: &N) -> bool {
        node.matches(self)
    }

    pub fn word(&self) -> Option<&str> {
        match self {
            NodeMatcher::Word(w) => Some(w),
            NodeMatcher::Grammemes(_) => None,
        }
    }

    pub fn grammemes(&self) -> Option<&GrammemeSet> {
        match self {
            NodeMatcher::Word(_) => None,
            NodeMatcher::Grammemes(g) => Some(g),
        }
    }
}

impl fmt::Display for NodeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeMatcher::Word(w) => write!(f, "'{w}'"),
            NodeMatcher::Grammemes(g) => write!(f, "{g}"),
        }
    }
}
