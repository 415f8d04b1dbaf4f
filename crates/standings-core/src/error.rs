//! Error types.
//!
//! Only two situations abort a recomputation: a closed roster that does not
//! contain a team some counted match references, and an engine configuration
//! that cannot produce sensible standings. Everything else (malformed scores,
//! inconsistent records, ties, unresolved slots) is reported as data through
//! [`Diagnostic`](crate::diagnostics::Diagnostic) and
//! [`Resolution`](crate::advancement::Resolution).

use serde::Serialize;
use thiserror::Error;

use crate::team::{MatchCode, TeamId};

/// Fatal errors of a single recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A match references a team absent from the block's closed roster.
    #[error("match {match_code} references team {team}, which is not on the block roster")]
    UnknownTeam {
        /// The offending team.
        team: TeamId,
        /// The match that references it.
        match_code: MatchCode,
    },

    /// The engine configuration is unusable.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// A period sub-score that could not be read as a goal count.
///
/// The aggregator counts such sub-scores as zero and reports them; this error
/// never aborts a recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ScoreError {
    /// The store held a negative number.
    #[error("negative sub-score {0}")]
    Negative(i64),

    /// The store held text that is not a non-negative integer.
    #[error("unparseable sub-score {0:?}")]
    Unparseable(String),

    /// The value is above [`MAX_PERIOD_GOALS`](crate::result::MAX_PERIOD_GOALS).
    #[error("sub-score {0} out of range")]
    OutOfRange(i64),
}
