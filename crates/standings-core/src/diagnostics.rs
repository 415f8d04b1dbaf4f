//! Recoverable data problems reported alongside computed standings.
//!
//! Tournament operations continue on dirty data: a malformed sub-score, an
//! inconsistent record or an ambiguous promotion does not stop a
//! recomputation. Each such problem becomes a [`Diagnostic`] for an operator
//! to review, and is logged once through `tracing` where it is found.

use serde::Serialize;
use std::fmt;

use crate::error::ScoreError;
use crate::result::ResultKind;
use crate::team::{MatchCode, Side, TeamId};

/// Why a result record was left out of the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Inconsistency {
    /// A decided match with no winner that the scores cannot settle either.
    MissingWinner,
    /// A walkover without a winner.
    WalkoverWithoutWinner,
    /// The declared winner did not play in the match.
    WinnerNotParticipant {
        /// The declared winner.
        winner: TeamId,
    },
    /// A draw that also declares a winner.
    DrawWithWinner,
    /// Both sides are the same team.
    SameTeamBothSides,
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingWinner => write!(f, "decided match has no winner"),
            Self::WalkoverWithoutWinner => write!(f, "walkover has no winner"),
            Self::WinnerNotParticipant { winner } => {
                write!(f, "declared winner {winner} did not play")
            }
            Self::DrawWithWinner => write!(f, "draw declares a winner"),
            Self::SameTeamBothSides => write!(f, "team is on both sides"),
        }
    }
}

/// A problem found during a recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A period sub-score could not be read and was counted as zero.
    MalformedScore {
        /// Match holding the sub-score.
        match_code: MatchCode,
        /// Team whose sub-score it is.
        team: TeamId,
        /// Period index.
        period: usize,
        /// What was wrong with it.
        error: ScoreError,
    },
    /// A result record was not counted.
    InconsistentResult {
        /// The record.
        match_code: MatchCode,
        /// Why it was skipped.
        inconsistency: Inconsistency,
    },
    /// A second record with an already-seen match code was ignored.
    DuplicateResult {
        /// The repeated code.
        match_code: MatchCode,
    },
    /// A group slot falls on a tie and needs an operator decision.
    AmbiguousSlot {
        /// Downstream match holding the slot.
        match_code: MatchCode,
        /// Side of the slot.
        side: Side,
        /// Placeholder label.
        label: String,
        /// Teams sharing the requested place.
        teams: Vec<TeamId>,
    },
    /// A bracket slot points at a confirmed match that has no winner.
    InconsistentBracket {
        /// Downstream match holding the slot.
        match_code: MatchCode,
        /// The source match.
        source: MatchCode,
        /// How the source match was recorded.
        kind: ResultKind,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedScore {
                match_code,
                team,
                period,
                error,
            } => write!(
                f,
                "match {match_code}: team {team} period {period}: {error}; counted as 0"
            ),
            Self::InconsistentResult {
                match_code,
                inconsistency,
            } => write!(f, "match {match_code} not counted: {inconsistency}"),
            Self::DuplicateResult { match_code } => {
                write!(f, "duplicate result for match {match_code} ignored")
            }
            Self::AmbiguousSlot {
                match_code,
                side,
                label,
                teams,
            } => {
                let ids: Vec<String> = teams.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "match {match_code} {side} slot {label:?} is tied between teams {}",
                    ids.join(", ")
                )
            }
            Self::InconsistentBracket {
                match_code,
                source,
                kind,
            } => write!(
                f,
                "match {match_code} waits on {source}, which was recorded as {kind} without a winner"
            ),
        }
    }
}
