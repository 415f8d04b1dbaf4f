//! Resolution of one structured slot reference against upstream data.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::RegulationRule;
use crate::ranking::Ranking;
use crate::result::{MatchResult, ResultKind};
use crate::team::{MatchCode, Team, TeamId};

use super::slot::MatchOutcome;

/// Outcome of resolving a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Exactly one team fills the slot.
    Resolved(Team),
    /// The requested place is shared; an operator has to decide.
    AmbiguousTie(Vec<TeamId>),
    /// Not enough information yet.
    Unresolved,
}

impl Resolution {
    /// The resolved team, if any.
    #[must_use]
    pub fn team(&self) -> Option<&Team> {
        match self {
            Self::Resolved(team) => Some(team),
            Self::AmbiguousTie(_) | Self::Unresolved => None,
        }
    }
}

/// Resolves place `position` of a block ranking.
///
/// A tie group whose position is `p` covers places `p..p + len`; asking for
/// any of those places while the group has two or more members yields
/// [`Resolution::AmbiguousTie`] with every member. Place 0, places beyond the
/// ranking and, when `require_settled` is set, any place of an unsettled
/// block yield [`Resolution::Unresolved`].
#[must_use]
pub fn resolve_group_slot(ranking: &Ranking, position: u32, require_settled: bool) -> Resolution {
    if require_settled && !ranking.is_settled() {
        return Resolution::Unresolved;
    }
    match ranking.group_covering(position) {
        Some([only]) => Resolution::Resolved(Team::new(only.team, &only.name)),
        Some(group) => Resolution::AmbiguousTie(group.iter().map(|s| s.team).collect()),
        None => Resolution::Unresolved,
    }
}

/// Resolves the winner or loser of bracket match `code`.
///
/// Only a confirmed `decided` or `walkover` record with a winner resolves.
/// The winner is read the way the aggregator reads it
/// ([`MatchResult::decided_winner`]), so a score-only `decided` record
/// promotes the side ahead under `rule`. Anything else, including a missing
/// record, is [`Resolution::Unresolved`].
#[must_use]
pub fn resolve_bracket_slot(
    code: &MatchCode,
    outcome: MatchOutcome,
    matches: &BTreeMap<MatchCode, MatchResult>,
    rule: &RegulationRule,
) -> Resolution {
    let Some(result) = matches.get(code) else {
        return Resolution::Unresolved;
    };
    if !result.confirmed || !matches!(result.kind, ResultKind::Decided | ResultKind::Walkover) {
        return Resolution::Unresolved;
    }
    match (result.outcome(rule), outcome) {
        (Some((winner, _)), MatchOutcome::Winner) => Resolution::Resolved(winner),
        (Some((_, loser)), MatchOutcome::Loser) => Resolution::Resolved(loser),
        (None, _) => Resolution::Unresolved,
    }
}
