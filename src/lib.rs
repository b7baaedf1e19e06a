//! Production-rule matching for morphological chunking.
//!
//! A [`RuleSet`] holds grammar productions such as `NP -> ADJF NOUN` and answers
//! two questions about an ordered window of already-tagged nodes:
//!
//! - [`RuleSet::find_first`]: which rule, in priority order, can fold a prefix of
//!   the window?
//! - [`RuleSet::find_all`]: which rules fold exactly this window? (cached)
//!
//! Rules are ingested through a [`RuleSetBuilder`] and frozen by
//! [`RuleSetBuilder::build`]; the frozen set is safe to share across threads.
//!
//! ```
//! use morphrules::{RuleSetBuilder, TaggedNode, grammemes, mean_score};
//!
//! let mut builder = RuleSetBuilder::new();
//! builder.add("NP", "'the' NOUN").unwrap();
//! let rules = builder.build();
//!
//! let nodes = [TaggedNode::word("the", grammemes!["DET"]), TaggedNode::word("dog", grammemes!["NOUN"])];
//! let matched = rules.find_all(&nodes);
//! assert_eq!(matched.len(), 1);
//!
//! let folded = matched[0].apply(&nodes, mean_score).unwrap();
//! assert!(folded.grammemes().contains("NP"));
//! ```

extern crate self as morphrules;

#[macro_use]
mod macros;
mod api;
mod engine;
mod tagged;

pub use api::{DEFAULT_CACHE_SIZE, Options, demo_builder, demo_rules};
pub use engine::{
    CacheStats, IngestError, KEY_SEPARATOR, NodeMatcher, PrefixMatch, Rule, RuleId, RuleSet, RuleSetBuilder,
};
pub use tagged::{Compatibility, TaggedNode, mean_score};

use std::collections::BTreeSet;
use std::fmt;

// --- Grammemes ---------------------------------------------------------------

/// An atomic grammatical-feature label such as `NOUN` or `gent`.
pub type Grammeme = String;

/// A set of grammemes.
///
/// Kept sorted so that the textual form (`A,B,C`) is canonical and can be used
/// inside cache keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrammemeSet(BTreeSet<Grammeme>);

impl GrammemeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated label list (`"NOUN,sing"`).
    ///
    /// Labels are trimmed and deduplicated. An empty label anywhere in the list
    /// (including an entirely empty `text`) is rejected.
    pub fn parse(text: &str) -> Result<Self, IngestError> {
        let mut set = BTreeSet::new();
        for label in text.split(',') {
            let label = label.trim();
            if label.is_empty() {
                return Err(IngestError::EmptyGrammeme { list: text.to_string() });
            }
            set.insert(label.to_string());
        }
        Ok(GrammemeSet(set))
    }

    pub fn insert(&mut self, grammeme: impl Into<Grammeme>) -> bool {
        self.0.insert(grammeme.into())
    }

    pub fn contains(&self, grammeme: &str) -> bool {
        self.0.contains(grammeme)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every grammeme of `self` is also in `other`.
    pub fn is_subset(&self, other: &GrammemeSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// True when the two sets share at least one grammeme.
    pub fn intersects(&self, other: &GrammemeSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<Grammeme>> FromIterator<S> for GrammemeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        GrammemeSet(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for GrammemeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for g in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(g)?;
            first = false;
        }
        Ok(())
    }
}

// --- Node contract -----------------------------------------------------------

/// The contract a caller's node type must satisfy to be matched by rules.
///
/// Nodes are terminal tokens or previously folded constituents. The engine only
/// ever borrows them for the duration of a call; cached results are keyed by
/// [`Node::cache_key`], never by identity.
pub trait Node: Sized {
    /// Whether this node satisfies `matcher`.
    ///
    /// This is where grammeme compatibility is decided (equality, subset,
    /// intersection, ...). The engine forwards the constraint and nothing more.
    fn matches(&self, matcher: &NodeMatcher) -> bool;

    /// Canonical, content-derived key.
    ///
    /// Two nodes with equal keys must give identical answers to
    /// [`Node::matches`] for every matcher, otherwise cached `find_all` results
    /// would leak between them. Keys must not contain [`KEY_SEPARATOR`], which
    /// joins them into window keys.
    fn cache_key(&self) -> String;

    /// Build the node produced when a rule with left-hand side `left` folds
    /// `children` with the given `score`.
    fn fold(left: &GrammemeSet, children: &[Self], score: f32) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dedups_and_sorts() {
        let set = GrammemeSet::parse("NOUN, sing,NOUN").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "NOUN,sing");
    }

    #[test]
    fn parse_rejects_empty_labels() {
        assert!(matches!(GrammemeSet::parse(""), Err(IngestError::EmptyGrammeme { .. })));
        assert!(matches!(GrammemeSet::parse("A,,B"), Err(IngestError::EmptyGrammeme { .. })));
        assert!(matches!(GrammemeSet::parse("A,"), Err(IngestError::EmptyGrammeme { .. })));
    }

    #[test]
    fn subset_and_intersection() {
        let noun = grammemes!["NOUN"];
        let noun_sing = grammemes!["NOUN", "sing"];
        let verb = grammemes!["VERB", "sing"];

        assert!(noun.is_subset(&noun_sing));
        assert!(!noun_sing.is_subset(&noun));
        assert!(verb.intersects(&noun_sing));
        assert!(!verb.intersects(&noun));
    }
}
