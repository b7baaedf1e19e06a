//! Memoization keys for `find_all`.
//!
//! `find_all` results depend only on the *content* of the node window, so the
//! cache is keyed by a string built from each node's [`Node::cache_key`]:
//!
//! ```text
//! [the/DET] [dog/NOUN,sing]  ──>  cache_key(the) ␟ cache_key(dog)
//! ```
//!
//! ## What counts as "the same window"
//!
//! Two windows share a key when they have the same length and their nodes
//! produce equal cache keys, position by position. Object identity never
//! matters.
//!
//! ## Separator
//!
//! Node keys are joined with U+001F (unit separator) rather than a space,
//! because surface words and rendered keys may legitimately contain spaces.
//! The join is only unambiguous while no node key contains U+001F itself;
//! [`Node::cache_key`] requires that, and [`TaggedNode`](crate::TaggedNode)
//! escapes it.

use crate::Node;

/// Separator placed between node keys in a composite lookup key.
pub const KEY_SEPARATOR: char = '\u{1f}';

pub(crate) fn lookup_key<N: Node>(nodes: &[N]) -> String {
    let mut key = String::new();
    for (idx, node) in nodes.iter().enumerate() {
        if idx > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(&node.cache_key());
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TaggedNode, grammemes};

    #[test]
    fn equal_content_gives_equal_keys() {
        let a = [TaggedNode::word("the", grammemes!["DET"]), TaggedNode::word("dog", grammemes!["NOUN"])];
        let b = [TaggedNode::word("the", grammemes!["DET"]), TaggedNode::word("dog", grammemes!["NOUN"])];
        assert_eq!(lookup_key(&a), lookup_key(&b));
    }

    #[test]
    fn order_and_length_matter() {
        let the = TaggedNode::word("the", grammemes!["DET"]);
        let dog = TaggedNode::word("dog", grammemes!["NOUN"]);

        assert_ne!(lookup_key(&[the.clone(), dog.clone()]), lookup_key(&[dog.clone(), the.clone()]));
        assert_ne!(lookup_key(&[the.clone()]), lookup_key(&[the.clone(), the]));
    }

    #[test]
    fn separator_inside_a_word_cannot_shift_positions() {
        let joined = [TaggedNode::word("a\u{1f}b", grammemes!["X"])];
        let split = [TaggedNode::word("a", grammemes![]), TaggedNode::word("b", grammemes!["X"])];

        assert_ne!(lookup_key(&joined), lookup_key(&split));
        assert_eq!(lookup_key(&joined).matches(KEY_SEPARATOR).count(), 0);
    }

    #[test]
    fn empty_window_has_empty_key() {
        assert_eq!(lookup_key::<TaggedNode>(&[]), "");
    }
}
