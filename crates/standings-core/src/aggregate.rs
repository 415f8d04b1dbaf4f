//! Result Aggregator: folds one block's results into per-team standings.
//!
//! The aggregator is a pure function over a result set, an optional roster
//! and the tournament configuration. It is rerun from scratch on every
//! recomputation; a [`BlockStandings`] is never patched in place.
//!
//! # Result classes
//!
//! | Kind | Played | Points | Goals |
//! |------|--------|--------|-------|
//! | `decided` | both | win / loss | regulation sub-scores |
//! | `draw` | both | draw / draw | regulation sub-scores |
//! | `walkover` | both | win / walkover loss | walkover policy |
//! | `cancelled_forfeit_both` | both | loss / loss | both as walkover losers |
//! | `cancelled_no_count` | nobody | none | none |
//!
//! Unconfirmed results only contribute their teams. Records that break the
//! result invariants are skipped and reported as
//! [`Diagnostic::InconsistentResult`].
//!
//! # Example
//!
//! ```
//! use standings_core::aggregate::aggregate;
//! use standings_core::config::EngineConfig;
//! use standings_core::result::{MatchResult, MatchSide, ResultKind};
//! use standings_core::team::{MatchCode, TeamId};
//!
//! let results = vec![MatchResult::new(
//!     MatchCode::new("M1"),
//!     MatchSide::new(TeamId::new(1), "Kita", vec![2u32.into()]),
//!     MatchSide::new(TeamId::new(2), "Minami", vec![0u32.into()]),
//!     ResultKind::Decided,
//! )
//! .with_winner(TeamId::new(1))];
//!
//! let standings = aggregate(&results, None, &EngineConfig::default()).unwrap();
//! assert_eq!(standings.team(TeamId::new(1)).unwrap().points, 3);
//! assert_eq!(standings.team(TeamId::new(2)).unwrap().goals_against, 2);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, Inconsistency};
use crate::error::EngineError;
use crate::result::{tally, MatchResult, ResultKind, Tally};
use crate::team::{Team, TeamId};

// =============================================================================
// Team Standing
// =============================================================================

/// Cumulative statistics of one team within one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamStanding {
    /// Team identifier.
    pub team: TeamId,
    /// Display name.
    pub name: String,
    /// Matches counted for this team.
    pub played: u32,
    /// Wins, including walkover wins.
    pub wins: u32,
    /// Draws.
    pub draws: u32,
    /// Losses, including walkover and forfeit losses.
    pub losses: u32,
    /// Regulation goals scored.
    pub goals_for: u32,
    /// Regulation goals conceded.
    pub goals_against: u32,
    /// `goals_for - goals_against`.
    pub goal_difference: i64,
    /// Accumulated points.
    pub points: i32,
    /// Place in the block; 0 until the ranking resolver assigns it.
    pub position: u32,
}

impl TeamStanding {
    /// A zeroed standing for a team that has not played.
    #[must_use]
    pub fn new(team: TeamId, name: &str) -> Self {
        Self {
            team,
            name: name.to_string(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
            position: 0,
        }
    }

    fn record(&mut self, outcome: Outcome, goals_for: u32, goals_against: u32, points: i32) {
        self.played += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
        self.goals_for = self.goals_for.saturating_add(goals_for);
        self.goals_against = self.goals_against.saturating_add(goals_against);
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
        self.points = self.points.saturating_add(points);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Draw,
    Loss,
}

// =============================================================================
// Head-to-head
// =============================================================================

/// Net decided results between pairs of teams.
///
/// For each pair the record holds wins of the lower id minus wins of the
/// higher id. Draws and double forfeits are not recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadToHead {
    net: BTreeMap<(TeamId, TeamId), i32>,
}

impl HeadToHead {
    pub(crate) fn record_win(&mut self, winner: TeamId, loser: TeamId) {
        let (key, delta) = if winner < loser {
            ((winner, loser), 1)
        } else {
            ((loser, winner), -1)
        };
        *self.net.entry(key).or_insert(0) += delta;
    }

    /// The team ahead on decided results between `a` and `b`.
    ///
    /// `None` when they never had a decided result or are level.
    #[must_use]
    pub fn leader(&self, a: TeamId, b: TeamId) -> Option<TeamId> {
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        match self.net.get(&(low, high)).copied().unwrap_or(0) {
            0 => None,
            n if n > 0 => Some(low),
            _ => Some(high),
        }
    }
}

// =============================================================================
// Block Standings
// =============================================================================

/// Aggregator output for one block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BlockStandings {
    /// Standings by team, every roster team included.
    pub teams: BTreeMap<TeamId, TeamStanding>,
    /// Decided results between pairs of teams.
    #[serde(skip)]
    pub head_to_head: HeadToHead,
    /// Results that contributed to the standings.
    pub counted_matches: usize,
    /// Confirmed `cancelled_no_count` results.
    pub cancelled_matches: usize,
    /// Problems found while aggregating.
    pub diagnostics: Vec<Diagnostic>,
}

impl BlockStandings {
    /// Standing of one team.
    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&TeamStanding> {
        self.teams.get(&id)
    }

    /// Number of teams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether the block has no teams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    fn flag(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "result flagged for review");
        self.diagnostics.push(diagnostic);
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Folds `results` into standings.
///
/// With `roster` present the team set is closed: every team of the roster
/// gets a standing, played or not, and any result naming another team is an
/// error, whether it counts or not. Without a roster the teams are those
/// appearing in any result, confirmed or not, named as recorded on their
/// first match.
///
/// # Errors
///
/// Returns [`EngineError::UnknownTeam`] when a closed roster is missing a
/// team referenced by one of `results`.
pub fn aggregate(
    results: &[MatchResult],
    roster: Option<&[Team]>,
    config: &EngineConfig,
) -> Result<BlockStandings, EngineError> {
    let mut block = BlockStandings::default();

    if let Some(roster) = roster {
        for team in roster {
            block
                .teams
                .entry(team.id)
                .or_insert_with(|| TeamStanding::new(team.id, &team.name));
        }
    }

    for result in results {
        for side in [&result.home, &result.away] {
            if roster.is_some() {
                if !block.teams.contains_key(&side.team) {
                    return Err(EngineError::UnknownTeam {
                        team: side.team,
                        match_code: result.code.clone(),
                    });
                }
            } else {
                block
                    .teams
                    .entry(side.team)
                    .or_insert_with(|| TeamStanding::new(side.team, &side.name));
            }
        }

        if !result.confirmed {
            debug!(match_code = %result.code, "skipping unconfirmed result");
            continue;
        }
        if result.kind == ResultKind::CancelledNoCount {
            debug!(match_code = %result.code, "skipping cancelled result");
            block.cancelled_matches += 1;
            continue;
        }
        if result.home.team == result.away.team {
            block.flag(inconsistent(result, Inconsistency::SameTeamBothSides));
            continue;
        }

        apply(&mut block, result, config);
    }

    debug!(
        teams = block.teams.len(),
        counted = block.counted_matches,
        cancelled = block.cancelled_matches,
        "aggregated block"
    );
    Ok(block)
}

fn inconsistent(result: &MatchResult, inconsistency: Inconsistency) -> Diagnostic {
    Diagnostic::InconsistentResult {
        match_code: result.code.clone(),
        inconsistency,
    }
}

fn apply(block: &mut BlockStandings, result: &MatchResult, config: &EngineConfig) {
    let points = &config.points;
    let walkover = &config.walkover;
    let home_id = result.home.team;
    let away_id = result.away.team;

    match result.kind {
        ResultKind::CancelledNoCount => {}
        ResultKind::CancelledForfeitBoth => {
            for id in [home_id, away_id] {
                if let Some(standing) = block.teams.get_mut(&id) {
                    standing.record(
                        Outcome::Loss,
                        walkover.loser_goals,
                        walkover.winner_goals,
                        points.loss,
                    );
                }
            }
            block.counted_matches += 1;
        }
        ResultKind::Walkover => {
            let Some(winner) = result.winner else {
                block.flag(inconsistent(result, Inconsistency::WalkoverWithoutWinner));
                return;
            };
            let Some(loser) = result.opponent_of(winner) else {
                block.flag(inconsistent(
                    result,
                    Inconsistency::WinnerNotParticipant { winner },
                ));
                return;
            };
            record_decided(
                block,
                winner,
                loser,
                (walkover.winner_goals, walkover.loser_goals),
                (points.win, points.walkover_loss_points()),
            );
        }
        ResultKind::Draw => {
            if result.winner.is_some() {
                block.flag(inconsistent(result, Inconsistency::DrawWithWinner));
                return;
            }
            let (home, away) = tallies(block, result, config);
            if let Some(standing) = block.teams.get_mut(&home_id) {
                standing.record(Outcome::Draw, home.regulation, away.regulation, points.draw);
            }
            if let Some(standing) = block.teams.get_mut(&away_id) {
                standing.record(Outcome::Draw, away.regulation, home.regulation, points.draw);
            }
            block.counted_matches += 1;
        }
        ResultKind::Decided => {
            let (home, away) = tallies(block, result, config);
            let winner = match (result.winner, result.decided_winner(&config.regulation)) {
                (_, Some(winner)) => winner,
                (Some(winner), None) => {
                    block.flag(inconsistent(
                        result,
                        Inconsistency::WinnerNotParticipant { winner },
                    ));
                    return;
                }
                (None, None) => {
                    block.flag(inconsistent(result, Inconsistency::MissingWinner));
                    return;
                }
            };
            let (winner_goals, loser_goals) = if winner == home_id {
                (home.regulation, away.regulation)
            } else {
                (away.regulation, home.regulation)
            };
            let loser = if winner == home_id { away_id } else { home_id };
            record_decided(
                block,
                winner,
                loser,
                (winner_goals, loser_goals),
                (points.win, points.loss),
            );
        }
    }
}

/// Tallies both sides, reporting malformed sub-scores.
fn tallies(
    block: &mut BlockStandings,
    result: &MatchResult,
    config: &EngineConfig,
) -> (Tally, Tally) {
    let home = tally(&result.home.periods, &config.regulation);
    let away = tally(&result.away.periods, &config.regulation);
    for (team, side_tally) in [(result.home.team, &home), (result.away.team, &away)] {
        for (period, error) in &side_tally.malformed {
            block.flag(Diagnostic::MalformedScore {
                match_code: result.code.clone(),
                team,
                period: *period,
                error: error.clone(),
            });
        }
    }
    (home, away)
}

fn record_decided(
    block: &mut BlockStandings,
    winner: TeamId,
    loser: TeamId,
    (winner_goals, loser_goals): (u32, u32),
    (winner_points, loser_points): (i32, i32),
) {
    if let Some(standing) = block.teams.get_mut(&winner) {
        standing.record(Outcome::Win, winner_goals, loser_goals, winner_points);
    }
    if let Some(standing) = block.teams.get_mut(&loser) {
        standing.record(Outcome::Loss, loser_goals, winner_goals, loser_points);
    }
    block.head_to_head.record_win(winner, loser);
    block.counted_matches += 1;
}
