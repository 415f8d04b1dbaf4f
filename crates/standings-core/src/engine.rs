//! The full aggregate, resolve and propagate pipeline.
//!
//! The [`Engine`] holds a validated tournament configuration and recomputes
//! everything from a [`TournamentSnapshot`] on each call. Nothing is cached
//! between calls: two recomputations over the same snapshot produce equal
//! output, and a recomputation after a correction or cancellation never
//! carries stale state forward.
//!
//! # Pipeline
//!
//! 1. **DEDUPE**: keep the first record of each match code
//! 2. **AGGREGATE + RESOLVE**: per block, in block order
//! 3. **SETTLE**: mark blocks with nothing left unconfirmed and every
//!    expected match counted or cancelled
//! 4. **PROPAGATE**: fill downstream slots from rankings and bracket results
//!
//! # Example
//!
//! ```
//! use standings_core::advancement::{DownstreamMatch, Slot};
//! use standings_core::config::EngineConfig;
//! use standings_core::engine::{BlockSpec, Engine, TournamentSnapshot};
//! use standings_core::result::{MatchResult, MatchSide, ResultKind};
//! use standings_core::team::{BlockId, MatchCode, Team, TeamId};
//!
//! let kita = Team::new(TeamId::new(1), "Kita");
//! let minami = Team::new(TeamId::new(2), "Minami");
//! let snapshot = TournamentSnapshot {
//!     blocks: vec![BlockSpec::new(BlockId::new("A")).with_roster(vec![kita, minami])],
//!     results: vec![MatchResult::new(
//!         MatchCode::new("A-1"),
//!         MatchSide::new(TeamId::new(1), "Kita", vec![2u32.into()]),
//!         MatchSide::new(TeamId::new(2), "Minami", vec![1u32.into()]),
//!         ResultKind::Decided,
//!     )
//!     .with_winner(TeamId::new(1))
//!     .in_block(BlockId::new("A"))],
//!     downstream: vec![DownstreamMatch::new(
//!         MatchCode::new("F"),
//!         Slot::open("A1位"),
//!         Slot::open("B1位"),
//!     )],
//! };
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let out = engine.recompute(&snapshot).unwrap();
//! assert_eq!(out.downstream[0].home.team, Some(TeamId::new(1)));
//! assert_eq!(out.pending.len(), 1);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::advancement::{propagate, DownstreamMatch, PendingSlot, SlotUpdate};
use crate::aggregate::aggregate;
use crate::config::{validate_cascade, EngineConfig};
use crate::diagnostics::Diagnostic;
use crate::error::EngineError;
use crate::ranking::{resolve, Ranking, TieBreakCascade};
use crate::result::MatchResult;
use crate::team::{BlockId, MatchCode, Team};

// =============================================================================
// Inputs
// =============================================================================

/// One block (group) of the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    /// Block identifier, as used in slot labels.
    pub id: BlockId,
    /// Assigned teams. When present the team set is closed.
    #[serde(default)]
    pub roster: Option<Vec<Team>>,
    /// Number of matches the block plays; a single round robin when absent.
    #[serde(default)]
    pub expected_matches: Option<usize>,
    /// Block-specific tie-break cascade.
    #[serde(default)]
    pub cascade: Option<TieBreakCascade>,
}

impl BlockSpec {
    /// A block with an open roster and the tournament defaults.
    #[must_use]
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            roster: None,
            expected_matches: None,
            cascade: None,
        }
    }

    /// Closes the roster.
    #[must_use]
    pub fn with_roster(mut self, roster: Vec<Team>) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Sets the number of expected matches.
    #[must_use]
    pub fn with_expected_matches(mut self, expected: usize) -> Self {
        self.expected_matches = Some(expected);
        self
    }

    /// Overrides the tie-break cascade.
    #[must_use]
    pub fn with_cascade(mut self, cascade: TieBreakCascade) -> Self {
        self.cascade = Some(cascade);
        self
    }
}

/// Everything one recomputation reads, as fetched by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentSnapshot {
    /// Declared blocks.
    pub blocks: Vec<BlockSpec>,
    /// Match results of every round, confirmed or not.
    pub results: Vec<MatchResult>,
    /// Later-round matches with team slots to fill.
    pub downstream: Vec<DownstreamMatch>,
}

// =============================================================================
// Outputs
// =============================================================================

/// Ranking of one block with the problems found while computing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    /// Ordered standings.
    pub ranking: Ranking,
    /// Aggregation diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Output of [`Engine::recompute`], ready to be written back by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Recomputation {
    /// Rankings by block.
    pub rankings: BTreeMap<BlockId, Ranking>,
    /// Downstream matches after propagation.
    pub downstream: Vec<DownstreamMatch>,
    /// Slots filled by this recomputation.
    pub updates: Vec<SlotUpdate>,
    /// Placeholders still open.
    pub pending: Vec<PendingSlot>,
    /// Everything flagged for operator review.
    pub diagnostics: Vec<Diagnostic>,
}

// =============================================================================
// Engine
// =============================================================================

/// Standings and advancement engine for one tournament configuration.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when `config` fails
    /// [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Aggregates and ranks one block.
    ///
    /// `results` may contain matches of other blocks; only those tagged with
    /// `block.id` are read.
    ///
    /// The block is settled once none of its results is unconfirmed and the
    /// counted plus cancelled matches reach the expected count. Records
    /// flagged as inconsistent do not count.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownTeam`] when the block roster is closed
    /// and any of its results names another team, and
    /// [`EngineError::InvalidConfig`] for an invalid block cascade.
    #[instrument(skip_all, fields(block = %block.id))]
    pub fn standings(
        &self,
        block: &BlockSpec,
        results: &[MatchResult],
    ) -> Result<BlockReport, EngineError> {
        let cascade = match &block.cascade {
            Some(cascade) => {
                validate_cascade(cascade)?;
                cascade
            }
            None => &self.config.cascade,
        };

        let block_results: Vec<MatchResult> = results
            .iter()
            .filter(|r| r.block.as_ref() == Some(&block.id))
            .cloned()
            .collect();

        let standings = aggregate(&block_results, block.roster.as_deref(), &self.config)?;

        let scheduled = block_results.iter().filter(|r| !r.confirmed).count();
        let completed = standings.counted_matches + standings.cancelled_matches;
        let expected = block
            .expected_matches
            .unwrap_or_else(|| round_robin(standings.len()));
        let settled = scheduled == 0 && completed >= expected;

        let ranking = resolve(&standings, cascade).with_settled(settled);
        debug!(
            teams = ranking.len(),
            completed, scheduled, expected, settled, "block ranked"
        );

        Ok(BlockReport {
            ranking,
            diagnostics: standings.diagnostics,
        })
    }

    /// Recomputes every ranking and slot from `snapshot`.
    ///
    /// Blocks referenced by results but not declared are ranked with an
    /// open roster.
    ///
    /// # Errors
    ///
    /// Any block error aborts the whole recomputation; see
    /// [`Engine::standings`].
    #[instrument(
        skip_all,
        fields(blocks = snapshot.blocks.len(), results = snapshot.results.len())
    )]
    pub fn recompute(&self, snapshot: &TournamentSnapshot) -> Result<Recomputation, EngineError> {
        let mut out = Recomputation::default();

        let results = dedupe(&snapshot.results, &mut out.diagnostics);

        let mut blocks: BTreeMap<BlockId, BlockSpec> = BTreeMap::new();
        for declared in &snapshot.blocks {
            blocks.entry(declared.id.clone()).or_insert_with(|| declared.clone());
        }
        for result in &results {
            if let Some(block) = &result.block {
                if !blocks.contains_key(block) {
                    debug!(%block, "ranking undeclared block with open roster");
                    blocks.insert(block.clone(), BlockSpec::new(block.clone()));
                }
            }
        }

        for (id, declared) in &blocks {
            let report = self.standings(declared, &results)?;
            out.diagnostics.extend(report.diagnostics);
            out.rankings.insert(id.clone(), report.ranking);
        }

        let confirmed: BTreeMap<MatchCode, MatchResult> = results
            .into_iter()
            .filter(|r| r.confirmed)
            .map(|r| (r.code.clone(), r))
            .collect();

        let propagation = propagate(
            &snapshot.downstream,
            &out.rankings,
            &confirmed,
            &self.config,
        );
        out.downstream = propagation.matches;
        out.updates = propagation.updates;
        out.pending = propagation.pending;
        out.diagnostics.extend(propagation.diagnostics);

        info!(
            blocks = out.rankings.len(),
            updates = out.updates.len(),
            pending = out.pending.len(),
            diagnostics = out.diagnostics.len(),
            "recomputation complete"
        );
        Ok(out)
    }
}

/// Keeps the first record of every match code.
fn dedupe(results: &[MatchResult], diagnostics: &mut Vec<Diagnostic>) -> Vec<MatchResult> {
    let mut seen = BTreeSet::new();
    let mut kept = Vec::with_capacity(results.len());
    for result in results {
        if seen.insert(&result.code) {
            kept.push(result.clone());
        } else {
            let diagnostic = Diagnostic::DuplicateResult {
                match_code: result.code.clone(),
            };
            warn!(%diagnostic, "result flagged for review");
            diagnostics.push(diagnostic);
        }
    }
    kept
}

/// Matches in a single round robin of `teams` teams.
const fn round_robin(teams: usize) -> usize {
    teams * teams.saturating_sub(1) / 2
}
