use crate::engine::{IngestError, RuleSet, RuleSetBuilder};
use once_cell::sync::Lazy;

/// Default number of `find_all` results kept in a rule set's cache.
pub const DEFAULT_CACHE_SIZE: usize = 10_000;

/// Options that affect how a [`RuleSet`] is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of memoized `find_all` results. `0` disables the cache,
    /// so every `find_all` rescans its arity bucket.
    pub cache_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options { cache_capacity: DEFAULT_CACHE_SIZE }
    }
}

/// Productions of the small English chunking grammar used by the CLI.
///
/// Listed in priority order: longer noun phrases come first so that
/// `find_first` prefers them over their own prefixes.
const DEMO_GRAMMAR: &[(&str, &str)] = &[
    ("NP", "DET ADJ NOUN | DET NOUN | ADJ NOUN | 'the' NOUN"),
    ("NP", "NOUN | PRON"),
    ("PP", "PREP NP"),
    ("VP", "VERB NP PP | VERB NP | VERB PP | VERB"),
    ("S", "NP VP"),
];

static DEMO_RULES: Lazy<Result<RuleSet, IngestError>> = Lazy::new(|| {
    demo_builder(Options::default()).map(RuleSetBuilder::build).inspect_err(|err| {
        tracing::error!(%err, "demo grammar rejected");
    })
});

/// The built-in demonstration grammar, built on first use with default
/// [`Options`].
///
/// A rejected grammar is reported on every call rather than replaced by an
/// empty rule set.
pub fn demo_rules() -> Result<&'static RuleSet, IngestError> {
    DEMO_RULES.as_ref().map_err(Clone::clone)
}

/// A builder preloaded with the demo grammar, for callers that want to add
/// their own productions or pick different [`Options`].
pub fn demo_builder(options: Options) -> Result<RuleSetBuilder, IngestError> {
    let mut builder = RuleSetBuilder::with_options(options);
    for (left, right) in DEMO_GRAMMAR {
        builder.add(left, right)?;
    }
    Ok(builder)
}
