//! Tie-break keys and the cascade that orders them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregate::TeamStanding;
use crate::team::TeamId;

/// One comparison criterion.
///
/// Every key except [`TieBreakKey::HeadToHead`] maps a standing to a score
/// where higher is better; head-to-head looks at the pair itself and is
/// handled by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakKey {
    /// More points.
    Points,
    /// Better goal difference.
    GoalDifference,
    /// More goals scored.
    GoalsFor,
    /// Fewer goals conceded.
    GoalsAgainst,
    /// More wins.
    Wins,
    /// Winner of the decided results between exactly two tied teams.
    HeadToHead,
    /// Operator decision: listed teams in list order, ahead of unlisted ones.
    ManualOrder(Vec<TeamId>),
}

impl TieBreakKey {
    /// Score of `standing` under this key; higher ranks first.
    ///
    /// Returns `None` for [`TieBreakKey::HeadToHead`].
    #[must_use]
    pub fn score(&self, standing: &TeamStanding) -> Option<i64> {
        let score = match self {
            Self::Points => i64::from(standing.points),
            Self::GoalDifference => standing.goal_difference,
            Self::GoalsFor => i64::from(standing.goals_for),
            Self::GoalsAgainst => -i64::from(standing.goals_against),
            Self::Wins => i64::from(standing.wins),
            Self::HeadToHead => return None,
            Self::ManualOrder(order) => {
                let rank = order
                    .iter()
                    .position(|team| *team == standing.team)
                    .unwrap_or(order.len());
                -i64::try_from(rank).unwrap_or(i64::MAX)
            }
        };
        Some(score)
    }
}

impl fmt::Display for TieBreakKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Points => write!(f, "points"),
            Self::GoalDifference => write!(f, "goal difference"),
            Self::GoalsFor => write!(f, "goals for"),
            Self::GoalsAgainst => write!(f, "goals against"),
            Self::Wins => write!(f, "wins"),
            Self::HeadToHead => write!(f, "head-to-head"),
            Self::ManualOrder(order) => write!(f, "manual order ({} teams)", order.len()),
        }
    }
}

/// Ordered tie-break keys.
///
/// After the last key, teams still level are co-ranked and ordered among
/// themselves by display name, then id. That fallback is not a key: it can
/// neither be removed nor split a shared position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TieBreakCascade {
    keys: Vec<TieBreakKey>,
}

impl TieBreakCascade {
    /// Creates a cascade from keys in priority order.
    #[must_use]
    pub fn new(keys: Vec<TieBreakKey>) -> Self {
        Self { keys }
    }

    /// Keys in priority order.
    #[must_use]
    pub fn keys(&self) -> &[TieBreakKey] {
        &self.keys
    }

    /// A copy of this cascade with an operator decision inserted after the
    /// existing keys.
    #[must_use]
    pub fn with_manual_order(&self, order: Vec<TeamId>) -> Self {
        let mut keys = self.keys.clone();
        keys.push(TieBreakKey::ManualOrder(order));
        Self { keys }
    }
}

impl Default for TieBreakCascade {
    /// Points, goal difference, goals for, head-to-head.
    fn default() -> Self {
        Self::new(vec![
            TieBreakKey::Points,
            TieBreakKey::GoalDifference,
            TieBreakKey::GoalsFor,
            TieBreakKey::HeadToHead,
        ])
    }
}
