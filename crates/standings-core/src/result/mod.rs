//! Match result records, the engine's only match input.
//!
//! A [`MatchResult`] is what the result store hands over for one match:
//! both sides with their period sub-scores, a [`ResultKind`] classification
//! and, for decided matches, the declared winner. Records are immutable once
//! confirmed; the engine never writes them back.
//!
//! # Example
//!
//! ```
//! use standings_core::result::{MatchResult, MatchSide, ResultKind};
//! use standings_core::team::{MatchCode, TeamId};
//!
//! let result = MatchResult::new(
//!     MatchCode::new("M1"),
//!     MatchSide::new(TeamId::new(1), "Kita", vec![2u32.into(), 1u32.into()]),
//!     MatchSide::new(TeamId::new(2), "Minami", vec![0u32.into(), 1u32.into()]),
//!     ResultKind::Decided,
//! )
//! .with_winner(TeamId::new(1));
//!
//! assert!(result.involves(TeamId::new(2)));
//! assert_eq!(result.opponent_of(TeamId::new(1)), Some(TeamId::new(2)));
//! ```

pub mod score;

pub use score::{tally, PeriodScore, Tally, MAX_PERIOD_GOALS};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::config::RegulationRule;
use crate::team::{BlockId, MatchCode, Side, Team, TeamId};

/// How a match ended, as far as standings are concerned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Played with a winner (possibly decided by shootout).
    Decided,
    /// Played, no winner.
    Draw,
    /// Awarded without play to the side that appeared.
    Walkover,
    /// Called off; does not count for anyone.
    CancelledNoCount,
    /// Called off and charged to both sides as a loss.
    CancelledForfeitBoth,
}

impl ResultKind {
    /// Whether this kind names a winner.
    #[must_use]
    pub const fn has_winner(self) -> bool {
        matches!(self, Self::Decided | Self::Walkover)
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Decided => "decided",
            Self::Draw => "draw",
            Self::Walkover => "walkover",
            Self::CancelledNoCount => "cancelled (no count)",
            Self::CancelledForfeitBoth => "cancelled (both forfeit)",
        };
        write!(f, "{label}")
    }
}

/// One side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSide {
    /// Team playing this side.
    pub team: TeamId,
    /// Team display name as recorded on the match.
    pub name: String,
    /// Period sub-scores in playing order (shootout last, if any).
    #[serde(default)]
    pub periods: Vec<PeriodScore>,
}

impl MatchSide {
    /// Creates a side.
    #[must_use]
    pub fn new(team: TeamId, name: &str, periods: Vec<PeriodScore>) -> Self {
        Self {
            team,
            name: name.to_string(),
            periods,
        }
    }

    /// The team behind this side.
    #[must_use]
    pub fn as_team(&self) -> Team {
        Team::new(self.team, &self.name)
    }
}

fn confirmed_default() -> bool {
    true
}

/// A stored match result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Match code, unique within a tournament.
    pub code: MatchCode,
    /// Block the match belongs to; `None` for bracket matches.
    #[serde(default)]
    pub block: Option<BlockId>,
    /// First-listed side.
    pub home: MatchSide,
    /// Second-listed side.
    pub away: MatchSide,
    /// Result classification.
    pub kind: ResultKind,
    /// Declared winner, for decided matches and walkovers.
    #[serde(default)]
    pub winner: Option<TeamId>,
    /// Whether an operator has confirmed the result.
    #[serde(default = "confirmed_default")]
    pub confirmed: bool,
}

impl MatchResult {
    /// Creates a confirmed result with no block and no winner.
    #[must_use]
    pub fn new(code: MatchCode, home: MatchSide, away: MatchSide, kind: ResultKind) -> Self {
        Self {
            code,
            block: None,
            home,
            away,
            kind,
            winner: None,
            confirmed: true,
        }
    }

    /// Sets the declared winner.
    #[must_use]
    pub fn with_winner(mut self, winner: TeamId) -> Self {
        self.winner = Some(winner);
        self
    }

    /// Places the match in a block.
    #[must_use]
    pub fn in_block(mut self, block: BlockId) -> Self {
        self.block = Some(block);
        self
    }

    /// Marks the result as not yet confirmed.
    #[must_use]
    pub fn unconfirmed(mut self) -> Self {
        self.confirmed = false;
        self
    }

    /// Returns the requested side.
    #[must_use]
    pub const fn side(&self, side: Side) -> &MatchSide {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Which side `team` played on, if any.
    #[must_use]
    pub fn side_of(&self, team: TeamId) -> Option<Side> {
        if self.home.team == team {
            Some(Side::Home)
        } else if self.away.team == team {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Whether `team` played in this match.
    #[must_use]
    pub fn involves(&self, team: TeamId) -> bool {
        self.side_of(team).is_some()
    }

    /// The team `team` played against.
    #[must_use]
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        match self.side_of(team)? {
            Side::Home => Some(self.away.team),
            Side::Away => Some(self.home.team),
        }
    }

    /// The winning team under `rule`.
    ///
    /// A declared winner counts only when it played in the match. A
    /// `decided` record without one goes to the side ahead on regulation plus
    /// shootout goals; level totals leave it undecided.
    #[must_use]
    pub fn decided_winner(&self, rule: &RegulationRule) -> Option<TeamId> {
        match (self.winner, self.kind) {
            (Some(winner), _) => self.involves(winner).then_some(winner),
            (None, ResultKind::Decided) => {
                let home = tally(&self.home.periods, rule).deciding_total();
                let away = tally(&self.away.periods, rule).deciding_total();
                match home.cmp(&away) {
                    Ordering::Greater => Some(self.home.team),
                    Ordering::Less => Some(self.away.team),
                    Ordering::Equal => None,
                }
            }
            (None, _) => None,
        }
    }

    /// Winner and loser under `rule`; see [`MatchResult::decided_winner`].
    #[must_use]
    pub fn outcome(&self, rule: &RegulationRule) -> Option<(Team, Team)> {
        match self.side_of(self.decided_winner(rule)?)? {
            Side::Home => Some((self.home.as_team(), self.away.as_team())),
            Side::Away => Some((self.away.as_team(), self.home.as_team())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MatchResult {
        MatchResult::new(
            MatchCode::new("M7"),
            MatchSide::new(TeamId::new(1), "Kita", vec![1u32.into()]),
            MatchSide::new(TeamId::new(2), "Minami", vec![0u32.into()]),
            ResultKind::Decided,
        )
    }

    #[test]
    fn sides_and_opponents() {
        let result = sample();
        assert_eq!(result.side_of(TeamId::new(1)), Some(Side::Home));
        assert_eq!(result.side_of(TeamId::new(2)), Some(Side::Away));
        assert_eq!(result.side_of(TeamId::new(3)), None);
        assert_eq!(result.opponent_of(TeamId::new(2)), Some(TeamId::new(1)));
        assert_eq!(result.side(Side::Away).name, "Minami");
    }

    #[test]
    fn declared_winner_must_have_played() {
        let rule = RegulationRule::all_periods();
        let (winner, loser) = sample().with_winner(TeamId::new(2)).outcome(&rule).unwrap();
        assert_eq!(winner.id, TeamId::new(2));
        assert_eq!(loser.id, TeamId::new(1));

        assert!(sample().with_winner(TeamId::new(5)).outcome(&rule).is_none());
    }

    #[test]
    fn undeclared_winner_follows_the_score() {
        let rule = RegulationRule::shootout_from(1);
        assert_eq!(sample().decided_winner(&rule), Some(TeamId::new(1)));

        let mut shootout = sample();
        shootout.home.periods = vec![1u32.into(), 3u32.into()];
        shootout.away.periods = vec![1u32.into(), 4u32.into()];
        assert_eq!(shootout.decided_winner(&rule), Some(TeamId::new(2)));

        shootout.away.periods = vec![1u32.into(), 3u32.into()];
        assert_eq!(shootout.decided_winner(&rule), None);

        let mut walkover = sample();
        walkover.kind = ResultKind::Walkover;
        assert_eq!(walkover.decided_winner(&rule), None);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "code": "M1",
            "block": "A",
            "home": { "team": 1, "name": "Kita", "periods": [2, "1"] },
            "away": { "team": 2, "name": "Minami" },
            "kind": "walkover",
            "winner": 1
        }"#;
        let result: MatchResult = serde_json::from_str(json).unwrap();
        assert!(result.confirmed);
        assert_eq!(result.kind, ResultKind::Walkover);
        assert_eq!(result.block, Some(BlockId::new("A")));
        assert!(result.away.periods.is_empty());
    }

    #[test]
    fn kinds_with_winners() {
        assert!(ResultKind::Decided.has_winner());
        assert!(ResultKind::Walkover.has_winner());
        assert!(!ResultKind::Draw.has_winner());
        assert!(!ResultKind::CancelledForfeitBoth.has_winner());
    }
}
