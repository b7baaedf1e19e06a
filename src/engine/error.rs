//! Ingestion errors.
//!
//! Lookups never fail; only turning grammar text into rules can. Every variant
//! carries the offending text so the message points at the exact production.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("left-hand side is empty")]
    EmptyLeft,

    #[error("empty grammeme label in '{list}'")]
    EmptyGrammeme { list: String },

    #[error("unbalanced quotes in token '{token}' of alternative '{alternative}'")]
    UnbalancedQuote { token: String, alternative: String },

    #[error("empty literal in alternative '{alternative}'")]
    EmptyLiteral { alternative: String },

    #[error("right-hand side '{right}' has no non-empty alternatives")]
    NoAlternatives { right: String },

    #[error("weight {weight} is not a finite number")]
    InvalidWeight { weight: f32 },
}
