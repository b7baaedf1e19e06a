//! Rule storage, indexing and lookup.
//!
//! Building a rule set is split into two phases:
//!
//! 1. **Ingest** (`RuleSetBuilder`): parse productions, append them in priority
//!    order, keep the arity index and the maximum arity up to date.
//! 2. **Freeze** (`RuleSetBuilder::build`): move everything into an immutable
//!    `RuleSet` and attach the match cache.
//!
//! A frozen `RuleSet` has no way to add rules, so lookups can never observe a
//! half-ingested production, and it can be shared across threads as is.
//!
//! ## Two lookups, two contracts
//!
//! - `find_first` walks *every* rule in insertion order and returns the first
//!   one matching a *prefix* of the window. Earlier rules win.
//! - `find_all` looks only at rules whose arity equals the window length and
//!   returns *all* of them that match, in insertion order. It is memoized.
//!
//! They answer different questions and intentionally do not share a code path.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into `rules`.
//! - `RuleIndex::by_arity[n]` holds the ids of every rule of arity `n`, in
//!   ascending (insertion) order, and nothing else.
//! - `max_arity` is the largest arity present (0 for an empty set).

use super::cache::{CachedMatches, MatchCache};
use super::error::IngestError;
use super::key::lookup_key;
use super::metrics::CacheStats;
use super::rule::Rule;
use crate::{GrammemeSet, Node, Options};
use std::fmt;
use std::sync::Arc;

/// Rule identifier (index into the rule list, which is also priority order).
pub type RuleId = usize;

/// Rules bucketed by arity.
///
/// Arity is small and dense, so buckets live in a `Vec` indexed by arity
/// rather than a map.
#[derive(Debug, Default, Clone)]
struct RuleIndex {
    by_arity: Vec<Vec<RuleId>>,
}

impl RuleIndex {
    fn insert(&mut self, arity: usize, id: RuleId) {
        if self.by_arity.len() <= arity {
            self.by_arity.resize_with(arity + 1, Vec::new);
        }
        self.by_arity[arity].push(id);
    }

    /// Ids of the rules of this arity; `None` when there are none.
    fn bucket(&self, arity: usize) -> Option<&[RuleId]> {
        self.by_arity.get(arity).map(Vec::as_slice).filter(|b| !b.is_empty())
    }
}

// --- Builder -----------------------------------------------------------------

/// Mutable ingestion phase of a [`RuleSet`].
///
/// ```
/// use morphrules::RuleSetBuilder;
///
/// let mut builder = RuleSetBuilder::new();
/// builder.add("NP", "ADJF NOUN | 'the' NOUN")?.add_weighted("PP", "PREP NP", 0.5)?;
/// let rules = builder.build();
/// assert_eq!(rules.len(), 3);
/// # Ok::<(), morphrules::IngestError>(())
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
    index: RuleIndex,
    max_arity: usize,
    options: Options,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        RuleSetBuilder { options, ..Self::default() }
    }

    /// Ingest `left -> right` with weight 1.0. See [`RuleSetBuilder::add_weighted`].
    pub fn add(&mut self, left: &str, right: &str) -> Result<&mut Self, IngestError> {
        self.add_weighted(left, right, 1.0)
    }

    /// Ingest one production line.
    ///
    /// - `left`: comma-separated grammemes of the folded node (`"NP,sing"`).
    /// - `right`: one or more alternatives separated by `|`. Each alternative is
    ///   a whitespace-separated list of tokens; `'word'` or `"word"` is a literal,
    ///   anything else a comma-separated grammeme set. Blank alternatives are
    ///   skipped. A completely blank `right` yields a single zero-arity rule.
    ///
    /// Every alternative becomes its own rule, appended in order. The call is
    /// atomic: on error nothing is added.
    pub fn add_weighted(&mut self, left: &str, right: &str, weight: f32) -> Result<&mut Self, IngestError> {
        if !weight.is_finite() {
            return Err(IngestError::InvalidWeight { weight });
        }

        let left_text = left.trim();
        if left_text.is_empty() {
            return Err(IngestError::EmptyLeft);
        }
        let left_set = GrammemeSet::parse(left_text)?;

        let parsed: Vec<Rule> = if right.trim().is_empty() && !right.contains('|') {
            vec![Rule::parse(left_text, left_set, "", weight)?]
        } else {
            let alternatives: Vec<&str> = right.split('|').map(str::trim).filter(|alt| !alt.is_empty()).collect();
            if alternatives.is_empty() {
                return Err(IngestError::NoAlternatives { right: right.to_string() });
            }
            alternatives
                .into_iter()
                .map(|alt| Rule::parse(left_text, left_set.clone(), alt, weight))
                .collect::<Result<_, _>>()?
        };

        tracing::debug!(left = left_text, right = right.trim(), added = parsed.len(), "ingested production");
        for rule in parsed {
            self.push(rule);
        }
        Ok(self)
    }

    fn push(&mut self, rule: Rule) {
        let id = self.rules.len();
        let arity = rule.arity();
        self.index.insert(arity, id);
        self.max_arity = self.max_arity.max(arity);
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn max_arity(&self) -> usize {
        self.max_arity
    }

    /// Freeze into a read-only [`RuleSet`].
    pub fn build(self) -> RuleSet {
        let capacity = self.options.cache_capacity;
        tracing::debug!(
            rules = self.rules.len(),
            max_arity = self.max_arity,
            cache_capacity = capacity,
            "rule set built"
        );

        RuleSet {
            rules: self.rules,
            index: self.index,
            max_arity: self.max_arity,
            cache: (capacity > 0).then(|| MatchCache::new(capacity)),
        }
    }
}

// --- Frozen rule set ---------------------------------------------------------

/// An immutable, thread-safe set of rules.
///
/// Built with [`RuleSetBuilder`]. All lookups take `&self`; the only interior
/// mutation is the `find_all` cache.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
    index: RuleIndex,
    max_arity: usize,
    /// `None` when caching is disabled (capacity 0).
    cache: Option<MatchCache>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::new()
    }

    /// First rule, in insertion order, whose right-hand side matches a prefix
    /// of `nodes`.
    ///
    /// Rules shorter than the window are considered too; trailing nodes are
    /// ignored. Never cached.
    pub fn find_first<N: Node>(&self, nodes: &[N]) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches_prefix(nodes))
    }

    /// Every rule of arity `nodes.len()` that matches the whole window, in
    /// insertion order.
    ///
    /// Results are memoized by window content (see [`Node::cache_key`]).
    ///
    /// ```text
    /// nodes.len() = 2 ──> bucket[2] ──(none)──> []
    ///                        │
    ///                        └─ key = "k0␟k1" ──(hit)──> cached ids
    ///                                           └(miss)─> scan bucket, store, return
    /// ```
    pub fn find_all<N: Node>(&self, nodes: &[N]) -> Vec<&Rule> {
        let Some(bucket) = self.index.bucket(nodes.len()) else {
            return Vec::new();
        };

        let ids = match &self.cache {
            None => self.scan_bucket(bucket, nodes),
            Some(cache) => {
                let key = lookup_key(nodes);
                match cache.get(&key) {
                    Some(ids) => ids,
                    None => {
                        let ids = self.scan_bucket(bucket, nodes);
                        cache.insert(key, Arc::clone(&ids));
                        ids
                    }
                }
            }
        };

        ids.iter().map(|&id| &self.rules[id]).collect()
    }

    fn scan_bucket<N: Node>(&self, bucket: &[RuleId], nodes: &[N]) -> CachedMatches {
        bucket.iter().copied().filter(|&id| self.rules[id].matches_prefix(nodes)).collect()
    }

    /// Largest arity of any rule; the widest window worth testing.
    pub fn max_arity(&self) -> usize {
        self.max_arity
    }

    /// All rules in priority (insertion) order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn rules_with_arity(&self, arity: usize) -> impl Iterator<Item = &Rule> {
        self.index.bucket(arity).unwrap_or_default().iter().map(|&id| &self.rules[id])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.as_ref().map(MatchCache::stats).unwrap_or_default()
    }

    /// Drop every cached `find_all` result. Counters are kept.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, rule) in self.rules.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}
