//! Test helper functions for building results, blocks and snapshots.
//!
//! This module provides factory functions that keep scenario tests short and
//! consistent, plus a seeded generator for random round robins.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::advancement::{DownstreamMatch, Slot};
use crate::config::EngineConfig;
use crate::engine::{BlockSpec, Engine, TournamentSnapshot};
use crate::result::{MatchResult, MatchSide, PeriodScore, ResultKind};
use crate::team::{BlockId, MatchCode, Team, TeamId};

// =============================================================================
// Results
// =============================================================================

/// Creates a team whose name is derived from its id when `name` is empty.
pub fn team(id: u64, name: &str) -> Team {
    if name.is_empty() {
        Team::new(TeamId::new(id), &format!("Team {id}"))
    } else {
        Team::new(TeamId::new(id), name)
    }
}

/// A match side with a single-period score.
pub fn side(team: &Team, goals: u32) -> MatchSide {
    MatchSide::new(team.id, &team.name, vec![PeriodScore::from(goals)])
}

/// A confirmed block result; the kind and winner follow from the score.
pub fn played(code: &str, block: &str, home: (&Team, u32), away: (&Team, u32)) -> MatchResult {
    let (home_team, home_goals) = home;
    let (away_team, away_goals) = away;
    let kind = if home_goals == away_goals {
        ResultKind::Draw
    } else {
        ResultKind::Decided
    };
    let mut result = MatchResult::new(
        MatchCode::new(code),
        side(home_team, home_goals),
        side(away_team, away_goals),
        kind,
    )
    .in_block(BlockId::new(block));
    if home_goals > away_goals {
        result.winner = Some(home_team.id);
    } else if away_goals > home_goals {
        result.winner = Some(away_team.id);
    }
    result
}

/// A confirmed bracket result without a block.
pub fn bracket(code: &str, winner: &Team, loser: &Team) -> MatchResult {
    MatchResult::new(
        MatchCode::new(code),
        side(winner, 1),
        side(loser, 0),
        ResultKind::Decided,
    )
    .with_winner(winner.id)
}

/// A downstream match with two placeholder labels.
pub fn downstream(code: &str, home: &str, away: &str) -> DownstreamMatch {
    DownstreamMatch::new(MatchCode::new(code), Slot::open(home), Slot::open(away))
}

/// Engine with the default configuration.
pub fn engine() -> Engine {
    Engine::new(EngineConfig::default()).expect("default config is valid")
}

// =============================================================================
// Scenarios
// =============================================================================

/// The four teams of the reference block: Wakaba, Xenon, Yamato, Zuiho.
pub fn block_a_teams() -> [Team; 4] {
    [
        team(1, "Wakaba"),
        team(2, "Xenon"),
        team(3, "Yamato"),
        team(4, "Zuiho"),
    ]
}

/// A completed block where Wakaba wins all three (+7), Xenon goes 2-1,
/// Yamato 1-2 and Zuiho loses every match.
pub fn block_a_results() -> Vec<MatchResult> {
    let [w, x, y, z] = block_a_teams();
    vec![
        played("A-1", "A", (&w, 2), (&x, 0)),
        played("A-2", "A", (&y, 1), (&z, 0)),
        played("A-3", "A", (&w, 3), (&y, 0)),
        played("A-4", "A", (&x, 2), (&z, 1)),
        played("A-5", "A", (&z, 0), (&w, 2)),
        played("A-6", "A", (&x, 1), (&y, 0)),
    ]
}

/// A completed block where Xenon and Yamato finish level on every key.
pub fn tied_block_results() -> Vec<MatchResult> {
    let [w, x, y, z] = block_a_teams();
    vec![
        played("A-1", "A", (&w, 1), (&x, 0)),
        played("A-2", "A", (&w, 1), (&y, 0)),
        played("A-3", "A", (&w, 1), (&z, 0)),
        played("A-4", "A", (&x, 1), (&y, 1)),
        played("A-5", "A", (&x, 2), (&z, 0)),
        played("A-6", "A", (&y, 2), (&z, 0)),
    ]
}

/// Snapshot with block A declared on a closed roster.
pub fn block_a_snapshot(
    results: Vec<MatchResult>,
    later: Vec<DownstreamMatch>,
) -> TournamentSnapshot {
    TournamentSnapshot {
        blocks: vec![BlockSpec::new(BlockId::new("A")).with_roster(block_a_teams().to_vec())],
        results,
        downstream: later,
    }
}

/// Generates a complete single round robin for `teams` teams of `block`.
///
/// Team ids start at `first_id`. Scores are drawn from `0..4` with a seeded
/// `ChaCha8Rng`, so the same seed always yields the same results.
pub fn random_round_robin(seed: u64, block: &str, first_id: u64, teams: u64) -> Vec<MatchResult> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let roster: Vec<Team> = (first_id..first_id + teams).map(|id| team(id, "")).collect();

    let mut results = Vec::new();
    for (i, home) in roster.iter().enumerate() {
        for away in &roster[i + 1..] {
            let code = format!("{block}-{}-{}", home.id, away.id);
            let home_goals = rng.gen_range(0..4);
            let away_goals = rng.gen_range(0..4);
            results.push(played(&code, block, (home, home_goals), (away, away_goals)));
        }
    }
    results
}

/// Returns `results` in an order shuffled by `seed`.
pub fn shuffled(mut results: Vec<MatchResult>, seed: u64) -> Vec<MatchResult> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    results.shuffle(&mut rng);
    results
}
