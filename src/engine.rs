//! Rule ingestion, matching and lookup.
//!
//! ## How the parts work together
//!
//! ```text
//! "NP" , "ADJF NOUN | 'the' NOUN"
//!        │  RuleSetBuilder::add            (ruleset.rs)
//!        │    └─ Rule::parse per alternative (rule.rs)
//!        │         └─ NodeMatcher per token  (matcher.rs)
//!        v
//! RuleSetBuilder ── build() ──> RuleSet (frozen, Send + Sync)
//!                                 │
//!         nodes ── find_first ────┤  priority scan over every rule
//!                                 │
//!         nodes ── find_all ──────┘  arity bucket
//!                                      └─ lookup_key (key.rs)
//!                                           └─ MatchCache (cache.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `error.rs`: `IngestError`, returned when grammar text is malformed.
//! - `matcher.rs`: the single-position `NodeMatcher`.
//! - `rule.rs`: parsing one alternative into a `Rule`, prefix matching, and
//!   folding through a `PrefixMatch` witness.
//! - `ruleset.rs`: the builder, the arity index and both lookup operations.
//! - `key.rs`: canonical keys for `find_all` memoization.
//! - `cache.rs`: the bounded, concurrent CLOCK cache.
//! - `metrics.rs`: cache counters and their snapshot type.
//!
//! ## Debugging
//!
//! Ingestion logs at `debug`, cache traffic at `trace`. Run the CLI with
//! `RUST_LOG=morphrules=trace` to see both.

#[path = "engine/cache.rs"]
mod cache;
#[path = "engine/error.rs"]
mod error;
#[path = "engine/key.rs"]
mod key;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/rule.rs"]
mod rule;
#[path = "engine/ruleset.rs"]
mod ruleset;


pub use error::IngestError;
pub use key::KEY_SEPARATOR;
pub use matcher::NodeMatcher;
pub use metrics::CacheStats;
pub use rule::{PrefixMatch, Rule};
pub use ruleset::{RuleId, RuleSet, RuleSetBuilder};
