//! Ranking Resolver: orders a block's standings and assigns positions.
//!
//! # Algorithm
//!
//! The resolver refines tie groups key by key. It starts with every team in
//! one group; each key of the [`TieBreakCascade`] splits every group of two
//! or more teams into sub-groups ordered by that key. A key never reorders
//! teams an earlier key already separated.
//!
//! Head-to-head is only consulted for a group of exactly two teams whose
//! decided results against each other do not net out; any other group passes
//! through it unchanged.
//!
//! Groups left after the last key are co-ranked: every member gets the
//! position of the group's first place, and the next group starts after all
//! of them (1, 2, 2, 4). Inside a group teams are listed by name, then id,
//! which fixes iteration order without implying a decision.
//!
//! # Example
//!
//! ```
//! use standings_core::aggregate::{BlockStandings, TeamStanding};
//! use standings_core::ranking::{resolve, TieBreakCascade};
//! use standings_core::team::TeamId;
//!
//! let mut standings = BlockStandings::default();
//! for (id, name, points) in [(1, "Kita", 3), (2, "Minami", 3), (3, "Higashi", 6)] {
//!     let mut team = TeamStanding::new(TeamId::new(id), name);
//!     team.points = points;
//!     standings.teams.insert(team.team, team);
//! }
//!
//! let ranking = resolve(&standings, &TieBreakCascade::default());
//! let positions: Vec<u32> = ranking.standings().iter().map(|s| s.position).collect();
//! assert_eq!(positions, vec![1, 2, 2]);
//! ```

mod cascade;

pub use cascade::{TieBreakCascade, TieBreakKey};

use serde::Serialize;
use tracing::trace;

use crate::aggregate::{BlockStandings, HeadToHead, TeamStanding};
use crate::team::TeamId;

// =============================================================================
// Ranking
// =============================================================================

/// Standings of one block in final order, positions assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    standings: Vec<TeamStanding>,
    settled: bool,
}

impl Ranking {
    /// Standings in rank order.
    #[must_use]
    pub fn standings(&self) -> &[TeamStanding] {
        &self.standings
    }

    /// Number of ranked teams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.standings.len()
    }

    /// Whether nothing was ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    /// Whether every expected match of the block has a confirmed result.
    ///
    /// Freshly resolved rankings are settled; the engine clears the flag for
    /// blocks still waiting on results.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.settled
    }

    /// Sets the settled flag.
    #[must_use]
    pub fn with_settled(mut self, settled: bool) -> Self {
        self.settled = settled;
        self
    }

    /// Standing of one team.
    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&TeamStanding> {
        self.standings.iter().find(|s| s.team == id)
    }

    /// Groups of co-ranked teams, in rank order.
    pub fn tie_groups(&self) -> impl Iterator<Item = &[TeamStanding]> {
        self.standings.chunk_by(|a, b| a.position == b.position)
    }

    /// The co-ranked group covering place `place` (1-based).
    ///
    /// A group whose position is `p` and which has `n` members covers places
    /// `p` to `p + n - 1`.
    #[must_use]
    pub fn group_covering(&self, place: u32) -> Option<&[TeamStanding]> {
        self.tie_groups().find(|group| {
            let start = group[0].position;
            let len = u32::try_from(group.len()).unwrap_or(u32::MAX);
            place >= start && place - start < len
        })
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Orders `standings` under `cascade` and assigns positions.
///
/// Total over any input: every team appears exactly once with a position of
/// at least 1.
#[must_use]
pub fn resolve(standings: &BlockStandings, cascade: &TieBreakCascade) -> Ranking {
    let mut groups: Vec<Vec<&TeamStanding>> = if standings.is_empty() {
        Vec::new()
    } else {
        vec![standings.teams.values().collect()]
    };

    for key in cascade.keys() {
        groups = groups
            .into_iter()
            .flat_map(|group| split(group, key, &standings.head_to_head))
            .collect();
    }

    let mut ranked = Vec::with_capacity(standings.len());
    for mut group in groups {
        let position = u32::try_from(ranked.len() + 1).unwrap_or(u32::MAX);
        group.sort_by(|a, b| a.name.cmp(&b.name).then(a.team.cmp(&b.team)));
        if group.len() > 1 {
            trace!(position, teams = group.len(), "co-ranked group");
        }
        for standing in group {
            let mut standing = standing.clone();
            standing.position = position;
            ranked.push(standing);
        }
    }

    Ranking {
        standings: ranked,
        settled: true,
    }
}

fn split<'a>(
    group: Vec<&'a TeamStanding>,
    key: &TieBreakKey,
    head_to_head: &HeadToHead,
) -> Vec<Vec<&'a TeamStanding>> {
    if group.len() < 2 {
        return vec![group];
    }

    if *key == TieBreakKey::HeadToHead {
        if let [a, b] = group[..] {
            if let Some(leader) = head_to_head.leader(a.team, b.team) {
                let (first, second) = if leader == a.team { (a, b) } else { (b, a) };
                return vec![vec![first], vec![second]];
            }
        }
        return vec![group];
    }

    let mut scored: Vec<(i64, &TeamStanding)> = group
        .into_iter()
        .map(|standing| (key.score(standing).unwrap_or(0), standing))
        .collect();
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));

    let mut out: Vec<Vec<&TeamStanding>> = Vec::new();
    let mut current_score = None;
    for (score, standing) in scored {
        if current_score == Some(score) {
            if let Some(last) = out.last_mut() {
                last.push(standing);
            }
        } else {
            out.push(vec![standing]);
            current_score = Some(score);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(id: u64, name: &str, points: i32, gd: i64, gf: u32) -> TeamStanding {
        let mut s = TeamStanding::new(TeamId::new(id), name);
        s.points = points;
        s.goal_difference = gd;
        s.goals_for = gf;
        s
    }

    fn block(teams: Vec<TeamStanding>) -> BlockStandings {
        let mut block = BlockStandings::default();
        for team in teams {
            block.teams.insert(team.team, team);
        }
        block
    }

    fn order(ranking: &Ranking) -> Vec<(u64, u32)> {
        ranking
            .standings()
            .iter()
            .map(|s| (s.team.as_u64(), s.position))
            .collect()
    }

    #[test]
    fn cascade_stops_at_first_discriminating_key() {
        let standings = block(vec![
            standing(1, "A", 6, 1, 3),
            standing(2, "B", 6, 4, 5),
            standing(3, "C", 6, 4, 7),
            standing(4, "D", 9, -2, 1),
        ]);
        let ranking = resolve(&standings, &TieBreakCascade::default());
        assert_eq!(order(&ranking), vec![(4, 1), (3, 2), (2, 3), (1, 4)]);
    }

    #[test]
    fn three_way_tie_is_co_ranked() {
        let standings = block(vec![
            standing(1, "Zeta", 4, 0, 2),
            standing(2, "Alpha", 4, 0, 2),
            standing(3, "Mu", 4, 0, 2),
            standing(4, "Top", 9, 5, 6),
            standing(5, "Last", 0, -5, 0),
        ]);
        let ranking = resolve(&standings, &TieBreakCascade::default());
        assert_eq!(
            order(&ranking),
            vec![(4, 1), (2, 2), (3, 2), (1, 2), (5, 5)]
        );
        assert_eq!(ranking.tie_groups().count(), 3);
    }

    #[test]
    fn head_to_head_breaks_two_team_tie() {
        let mut standings = block(vec![
            standing(1, "Alpha", 3, 0, 1),
            standing(2, "Beta", 3, 0, 1),
        ]);
        standings.head_to_head.record_win(TeamId::new(2), TeamId::new(1));
        let ranking = resolve(&standings, &TieBreakCascade::default());
        assert_eq!(order(&ranking), vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn head_to_head_skipped_for_three_teams() {
        let mut standings = block(vec![
            standing(1, "Alpha", 3, 0, 1),
            standing(2, "Beta", 3, 0, 1),
            standing(3, "Gamma", 3, 0, 1),
        ]);
        standings.head_to_head.record_win(TeamId::new(3), TeamId::new(1));
        let ranking = resolve(&standings, &TieBreakCascade::default());
        assert!(ranking.standings().iter().all(|s| s.position == 1));
    }

    #[test]
    fn manual_order_settles_tie() {
        let standings = block(vec![
            standing(1, "Alpha", 3, 0, 1),
            standing(2, "Beta", 3, 0, 1),
        ]);
        let cascade =
            TieBreakCascade::default().with_manual_order(vec![TeamId::new(2), TeamId::new(1)]);
        let ranking = resolve(&standings, &cascade);
        assert_eq!(order(&ranking), vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn empty_block_yields_empty_ranking() {
        let ranking = resolve(&BlockStandings::default(), &TieBreakCascade::default());
        assert!(ranking.is_empty());
    }

    #[test]
    fn group_covering_spans_tied_places() {
        let standings = block(vec![
            standing(1, "A", 9, 0, 0),
            standing(2, "B", 3, 0, 0),
            standing(3, "C", 3, 0, 0),
            standing(4, "D", 0, 0, 0),
        ]);
        let ranking = resolve(&standings, &TieBreakCascade::default());
        assert_eq!(ranking.group_covering(1).map(<[_]>::len), Some(1));
        assert_eq!(ranking.group_covering(2).map(<[_]>::len), Some(2));
        assert_eq!(ranking.group_covering(3).map(<[_]>::len), Some(2));
        assert_eq!(ranking.group_covering(4).map(|g| g[0].team), Some(TeamId::new(4)));
        assert!(ranking.group_covering(5).is_none());
        assert!(ranking.group_covering(0).is_none());
    }
}
