//! A ready-made [`Node`] for callers that do not bring their own.
//!
//! `TaggedNode` is either a terminal (a surface word with its grammemes) or a
//! folded constituent (grammemes from a rule's left side plus the consumed
//! children). How a grammeme matcher is compared against a node is selected by
//! [`Compatibility`]; literal words are always compared byte-for-byte.

use crate::{GrammemeSet, Node, NodeMatcher};
use std::fmt;

/// How a grammeme matcher is checked against a node's grammemes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Compatibility {
    /// Every required grammeme is present on the node.
    #[default]
    Subset,
    /// At least one required grammeme is present on the node.
    Intersects,
    /// The node carries exactly the required grammemes.
    Exact,
}

impl Compatibility {
    pub fn accepts(self, required: &GrammemeSet, actual: &GrammemeSet) -> bool {
        match self {
            Compatibility::Subset => required.is_subset(actual),
            Compatibility::Intersects => required.intersects(actual),
            Compatibility::Exact => required == actual,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Compatibility::Subset => "sub",
            Compatibility::Intersects => "any",
            Compatibility::Exact => "eq",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedNode {
    word: Option<String>,
    grammemes: GrammemeSet,
    score: f32,
    children: Vec<TaggedNode>,
    compatibility: Compatibility,
}

impl TaggedNode {
    /// A terminal token with score 1.0.
    pub fn word(word: impl Into<String>, grammemes: GrammemeSet) -> Self {
        TaggedNode {
            word: Some(word.into()),
            grammemes,
            score: 1.0,
            children: Vec::new(),
            compatibility: Compatibility::default(),
        }
    }

    /// A node known only by its grammemes.
    pub fn tagged(grammemes: GrammemeSet) -> Self {
        TaggedNode { word: None, grammemes, score: 1.0, children: Vec::new(), compatibility: Compatibility::default() }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn surface(&self) -> Option<&str> {
        self.word.as_deref()
    }

    pub fn grammemes(&self) -> &GrammemeSet {
        &self.grammemes
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn children(&self) -> &[TaggedNode] {
        &self.children
    }

    pub fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// Surface words of all terminals under this node, left to right.
    pub fn words(&self) -> Vec<&str> {
        if self.is_terminal() {
            return self.word.as_deref().into_iter().collect();
        }
        self.children.iter().flat_map(TaggedNode::words).collect()
    }
}

impl Node for TaggedNode {
    fn matches(&self, matcher: &NodeMatcher) -> bool {
        match matcher {
            NodeMatcher::Word(word) => self.word.as_deref() == Some(word.as_str()),
            NodeMatcher::Grammemes(required) => self.compatibility.accepts(required, &self.grammemes),
        }
    }

    /// `"word"/"G1","G2"@policy`; everything `matches` looks at, nothing else.
    ///
    /// Words and labels are written quoted and escaped, so a label containing
    /// `,` or [`KEY_SEPARATOR`](crate::KEY_SEPARATOR) cannot make two different nodes collide.
    fn cache_key(&self) -> String {
        let word = self.word.as_deref().map(|w| format!("{w:?}")).unwrap_or_default();
        let grammemes = self.grammemes.iter().map(|g| format!("{g:?}")).collect::<Vec<_>>().join(",");
        format!("{word}/{grammemes}@{}", self.compatibility.tag())
    }

    /// Folded nodes carry no surface word and inherit the policy of their first
    /// child.
    fn fold(left: &GrammemeSet, children: &[Self], score: f32) -> Self {
        TaggedNode {
            word: None,
            grammemes: left.clone(),
            score,
            children: children.to_vec(),
            compatibility: children.first().map(|c| c.compatibility).unwrap_or_default(),
        }
    }
}

impl fmt::Display for TaggedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_terminal() {
            return match &self.word {
                Some(word) => write!(f, "{word}/{}", self.grammemes),
                None => write!(f, "/{}", self.grammemes),
            };
        }
        write!(f, "[{}", self.grammemes)?;
        for child in &self.children {
            write!(f, " {child}")?;
        }
        f.write_str("]")
    }
}

/// Mean of the children's scores; 0 for an empty fold.
pub fn mean_score(children: &[TaggedNode]) -> f32 {
    if children.is_empty() {
        return 0.0;
    }
    children.iter().map(TaggedNode::score).sum::<f32>() / children.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KEY_SEPARATOR, grammemes};

    fn gram(required: GrammemeSet) -> NodeMatcher {
        NodeMatcher::Grammemes(required)
    }

    #[test]
    fn literal_match_is_exact() {
        let node = TaggedNode::word("The", grammemes!["DET"]);
        assert!(node.matches(&NodeMatcher::Word("The".to_string())));
        assert!(!node.matches(&NodeMatcher::Word("the".to_string())));
        assert!(!TaggedNode::tagged(grammemes!["DET"]).matches(&NodeMatcher::Word("The".to_string())));
    }

    #[test]
    fn compatibility_policies() {
        let node = TaggedNode::word("dogs", grammemes!["NOUN", "plur"]);

        assert!(node.matches(&gram(grammemes!["NOUN"])));
        assert!(!node.matches(&gram(grammemes!["NOUN", "sing"])));

        let any = node.clone().with_compatibility(Compatibility::Intersects);
        assert!(any.matches(&gram(grammemes!["NOUN", "sing"])));
        assert!(!any.matches(&gram(grammemes!["VERB"])));

        let exact = node.with_compatibility(Compatibility::Exact);
        assert!(exact.matches(&gram(grammemes!["NOUN", "plur"])));
        assert!(!exact.matches(&gram(grammemes!["NOUN"])));
    }

    #[test]
    fn cache_key_reflects_match_relevant_content() {
        let a = TaggedNode::word("dog", grammemes!["NOUN"]).with_score(0.1);
        let b = TaggedNode::word("dog", grammemes!["NOUN"]).with_score(0.9);
        let c = TaggedNode::word("dog", grammemes!["NOUN"]).with_compatibility(Compatibility::Exact);
        let d = TaggedNode::tagged(grammemes!["NOUN"]);

        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
        assert_ne!(a.cache_key(), d.cache_key());
    }

    #[test]
    fn cache_key_escapes_label_punctuation() {
        let joint = TaggedNode::tagged(grammemes!["A,B"]);
        let split = TaggedNode::tagged(grammemes!["A", "B"]);
        assert_ne!(joint.cache_key(), split.cache_key());

        let odd = TaggedNode::word("a\u{1f}b", grammemes!["X\u{1f}Y"]);
        assert!(!odd.cache_key().contains(KEY_SEPARATOR));
    }

    #[test]
    fn fold_builds_a_constituent() {
        let children = [TaggedNode::word("big", grammemes!["ADJF"]), TaggedNode::word("dog", grammemes!["NOUN"])];
        let np = TaggedNode::fold(&grammemes!["NP"], &children, 0.5);

        assert!(!np.is_terminal());
        assert_eq!(np.surface(), None);
        assert_eq!(np.words(), vec!["big", "dog"]);
        assert_eq!(np.to_string(), "[NP big/ADJF dog/NOUN]");
    }

    #[test]
    fn mean_score_of_empty_fold_is_zero() {
        assert_eq!(mean_score(&[]), 0.0);
        let nodes = [TaggedNode::tagged(grammemes!["A"]).with_score(0.2), TaggedNode::tagged(grammemes!["B"])];
        assert!((mean_score(&nodes) - 0.6).abs() < 1e-6);
    }
}
