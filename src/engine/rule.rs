//! A single production and how it is matched.
//!
//! A rule is built from one alternative of an ingestion call:
//!
//! ```text
//! left  = "NP"
//! right = "'the' ADJF,sing NOUN"
//!            │      │         └─ NodeMatcher::Grammemes({NOUN})
//!            │      └─ NodeMatcher::Grammemes({ADJF, sing})
//!            └─ NodeMatcher::Word("the")
//! arity = 3
//! ```
//!
//! Matching is positional and prefix-based: only the first `arity` nodes are
//! looked at. Folding requires a [`PrefixMatch`], which can only be obtained
//! from a successful match, so a rule is never applied to nodes it rejects.

use super::error::IngestError;
use super::matcher::NodeMatcher;
use crate::{GrammemeSet, Node};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    left: GrammemeSet,
    right: Vec<NodeMatcher>,
    weight: f32,
    /// Original texts, kept for diagnostics.
    left_text: String,
    right_text: String,
}

impl Rule {
    /// Parse one (already split and trimmed) alternative.
    pub(crate) fn parse(
        left_text: &str,
        left: GrammemeSet,
        alternative: &str,
        weight: f32,
    ) -> Result<Rule, IngestError> {
        let right = alternative
            .split_whitespace()
            .map(|token| parse_token(token, alternative))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Rule { left, right, weight, left_text: left_text.to_string(), right_text: alternative.to_string() })
    }

    /// Grammemes assigned to the folded node.
    pub fn left(&self) -> &GrammemeSet {
        &self.left
    }

    pub fn right(&self) -> &[NodeMatcher] {
        &self.right
    }

    /// Number of nodes this rule consumes.
    pub fn arity(&self) -> usize {
        self.right.len()
    }

    /// Weight for the caller's scorer. The engine itself never reads it.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn left_text(&self) -> &str {
        &self.left_text
    }

    pub fn right_text(&self) -> &str {
        &self.right_text
    }

    /// Whether the first `arity` nodes match positionally.
    ///
    /// Trailing nodes are ignored; fewer than `arity` nodes never match. A
    /// zero-arity rule matches every sequence, including the empty one.
    pub fn matches_prefix<N: Node>(&self, nodes: &[N]) -> bool {
        nodes.len() >= self.right.len() && self.right.iter().zip(nodes).all(|(matcher, node)| matcher.matches(node))
    }

    /// Like [`Rule::matches_prefix`], but returns the witness needed to fold.
    pub fn match_prefix<'r, 'n, N: Node>(&'r self, nodes: &'n [N]) -> Option<PrefixMatch<'r, 'n, N>> {
        if !self.matches_prefix(nodes) {
            return None;
        }
        let (consumed, rest) = nodes.split_at(self.arity());
        Some(PrefixMatch { rule: self, consumed, rest })
    }

    /// Fold the matched prefix of `nodes` into a new node, or `None` when the
    /// prefix does not match.
    pub fn apply<N, S>(&self, nodes: &[N], scorer: S) -> Option<N>
    where
        N: Node,
        S: FnOnce(&[N]) -> f32,
    {
        self.match_prefix(nodes).map(|m| m.apply(scorer))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.left_text, self.right_text)
    }
}

/// Proof that a rule matched a node prefix.
///
/// ```text
/// nodes:    [the] [big] [dog] [barks]
/// rule:     'the' ADJF  NOUN            (arity 3)
/// consumed: [the] [big] [dog]
/// rest:                       [barks]
/// ```
#[derive(Debug)]
pub struct PrefixMatch<'r, 'n, N> {
    rule: &'r Rule,
    consumed: &'n [N],
    rest: &'n [N],
}

impl<'r, 'n, N: Node> PrefixMatch<'r, 'n, N> {
    pub fn rule(&self) -> &'r Rule {
        self.rule
    }

    /// The first `arity` nodes, the ones a fold consumes.
    pub fn consumed(&self) -> &'n [N] {
        self.consumed
    }

    /// Leftover nodes; handling them is up to the caller.
    pub fn rest(&self) -> &'n [N] {
        self.rest
    }

    /// Fold the consumed nodes into a node tagged with the rule's left side,
    /// scored by `scorer` over exactly those nodes.
    pub fn apply<S>(&self, scorer: S) -> N
    where
        S: FnOnce(&[N]) -> f32,
    {
        let score = scorer(self.consumed);
        N::fold(&self.rule.left, self.consumed, score)
    }
}

fn parse_token(token: &str, alternative: &str) -> Result<NodeMatcher, IngestError> {
    let is_quote = |c: Option<char>| matches!(c, Some('\'' | '"'));
    let first = token.chars().next();
    let last = token.chars().next_back();

    if !is_quote(first) && !is_quote(last) {
        return GrammemeSet::parse(token).map(NodeMatcher::Grammemes);
    }

    if token.len() < 2 || first != last || !is_quote(first) {
        return Err(IngestError::UnbalancedQuote { token: token.to_string(), alternative: alternative.to_string() });
    }

    // Both ends are single-byte ASCII quotes.
    let inner = &token[1..token.len() - 1];
    if inner.is_empty() {
        return Err(IngestError::EmptyLiteral { alternative: alternative.to_string() });
    }
    Ok(NodeMatcher::Word(inner.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TaggedNode, grammemes, mean_score};

    fn rule(left: &str, right: &str) -> Rule {
        Rule::parse(left, GrammemeSet::parse(left).unwrap(), right, 1.0).unwrap()
    }

    #[test]
    fn parses_literals_and_grammeme_sets() {
        let r = rule("A,B", "'x' C,D");

        assert_eq!(r.arity(), 2);
        assert_eq!(r.left(), &grammemes!["A", "B"]);
        assert_eq!(r.right()[0], NodeMatcher::Word("x".to_string()));
        assert_eq!(r.right()[1], NodeMatcher::Grammemes(grammemes!["C", "D"]));
        assert_eq!(r.to_string(), "A,B -> 'x' C,D");
    }

    #[test]
    fn double_quotes_are_literals_too() {
        let r = rule("X", "\"of\" NOUN");
        assert_eq!(r.right()[0].word(), Some("of"));
    }

    #[test]
    fn inner_quotes_survive() {
        let r = rule("X", "'rock'n'roll'");
        assert_eq!(r.right()[0].word(), Some("rock'n'roll"));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let parse = |right: &str| Rule::parse("X", grammemes!["X"], right, 1.0);

        assert!(matches!(parse("'the NOUN"), Err(IngestError::UnbalancedQuote { .. })));
        assert!(matches!(parse("the' NOUN"), Err(IngestError::UnbalancedQuote { .. })));
        assert!(matches!(parse("'the\""), Err(IngestError::UnbalancedQuote { .. })));
        assert!(matches!(parse("'"), Err(IngestError::UnbalancedQuote { .. })));
        assert!(matches!(parse("''"), Err(IngestError::EmptyLiteral { .. })));
        assert!(matches!(parse("NOUN,,sing"), Err(IngestError::EmptyGrammeme { .. })));
    }

    #[test]
    fn prefix_match_ignores_trailing_nodes() {
        let r = rule("NP", "ADJF NOUN");
        let nodes = [
            TaggedNode::word("big", grammemes!["ADJF"]),
            TaggedNode::word("dog", grammemes!["NOUN", "sing"]),
            TaggedNode::word("barks", grammemes!["VERB"]),
        ];

        assert!(r.matches_prefix(&nodes));
        assert!(!r.matches_prefix(&nodes[..1]));
        assert!(!r.matches_prefix(&nodes[1..]));

        let m = r.match_prefix(&nodes).unwrap();
        assert_eq!(m.consumed().len(), 2);
        assert_eq!(m.rest().len(), 1);
    }

    #[test]
    fn zero_arity_matches_anything() {
        let r = rule("Z", "");
        let nodes = [TaggedNode::word("x", grammemes!["X"])];

        assert_eq!(r.arity(), 0);
        assert!(r.matches_prefix::<TaggedNode>(&[]));
        assert!(r.matches_prefix(&nodes));
    }

    #[test]
    fn apply_folds_and_scores_consumed_nodes_only() {
        let r = rule("NP", "'the' NOUN");
        let nodes = [
            TaggedNode::word("the", grammemes!["DET"]).with_score(0.5),
            TaggedNode::word("dog", grammemes!["NOUN"]).with_score(1.0),
            TaggedNode::word("barks", grammemes!["VERB"]).with_score(0.0),
        ];

        let folded = r.apply(&nodes, mean_score).unwrap();
        assert_eq!(folded.grammemes(), &grammemes!["NP"]);
        assert_eq!(folded.children().len(), 2);
        assert!((folded.score() - 0.75).abs() < f32::EPSILON);

        let mut seen = 0;
        r.apply(&nodes, |consumed: &[TaggedNode]| {
            seen = consumed.len();
            0.0
        });
        assert_eq!(seen, 2);
    }

    #[test]
    fn apply_refuses_non_matching_prefix() {
        let r = rule("NP", "'the' NOUN");
        let nodes = [TaggedNode::word("a", grammemes!["DET"]), TaggedNode::word("dog", grammemes!["NOUN"])];
        assert!(r.apply(&nodes, mean_score).is_none());
    }
}
