//! Advancement Propagator: fills later-round placeholder slots.
//!
//! Downstream matches are scheduled with placeholder labels in their team
//! slots. [`propagate`] parses each open slot with [`match_slot_pattern`],
//! resolves the reference against block rankings ([`resolve_group_slot`]) or
//! bracket results ([`resolve_bracket_slot`]) and writes the team in when the
//! answer is a single team.
//!
//! # Guarantees
//!
//! - A slot that already carries a team is never touched, so running
//!   propagation again on its own output changes nothing.
//! - A resolved slot remembers the label it replaced. Only
//!   [`reset_dependents`] turns it back into a placeholder; callers use it
//!   when an upstream result is retracted.
//! - Ties are never broken here. A slot falling on a shared place stays open
//!   and is reported as [`Diagnostic::AmbiguousSlot`].

mod resolve;
mod slot;

pub use resolve::{resolve_bracket_slot, resolve_group_slot, Resolution};
pub use slot::{match_slot_pattern, MatchOutcome, SlotReference};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{EngineConfig, RegulationRule};
use crate::diagnostics::Diagnostic;
use crate::ranking::Ranking;
use crate::result::{MatchResult, ResultKind};
use crate::team::{BlockId, MatchCode, Side, Team, TeamId};

// =============================================================================
// Downstream Matches
// =============================================================================

/// One team slot of a downstream match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// The team, once known.
    #[serde(default)]
    pub team: Option<TeamId>,
    /// Team display name, or the placeholder label while `team` is empty.
    pub name: String,
    /// The label a resolved slot replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Slot {
    /// An open slot holding `label`.
    #[must_use]
    pub fn open(label: &str) -> Self {
        Self {
            team: None,
            name: label.to_string(),
            placeholder: None,
        }
    }

    /// A slot already holding `team`.
    #[must_use]
    pub fn filled(team: &Team) -> Self {
        Self {
            team: Some(team.id),
            name: team.name.clone(),
            placeholder: None,
        }
    }

    /// Whether the slot carries a team.
    #[must_use]
    pub const fn is_filled(&self) -> bool {
        self.team.is_some()
    }

    fn fill(&mut self, team: &Team) {
        let label = std::mem::replace(&mut self.name, team.name.clone());
        self.team = Some(team.id);
        self.placeholder = Some(label);
    }
}

/// A later-round match whose participants may still be placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownstreamMatch {
    /// Match code.
    pub code: MatchCode,
    /// Home slot.
    pub home: Slot,
    /// Away slot.
    pub away: Slot,
}

impl DownstreamMatch {
    /// Creates a downstream match.
    #[must_use]
    pub fn new(code: MatchCode, home: Slot, away: Slot) -> Self {
        Self { code, home, away }
    }

    /// Returns the requested slot.
    #[must_use]
    pub const fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

// =============================================================================
// Propagation
// =============================================================================

/// A slot filled by one propagation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotUpdate {
    /// Downstream match.
    pub match_code: MatchCode,
    /// Side of the slot.
    pub side: Side,
    /// Team written into the slot.
    pub team: TeamId,
    /// Its display name.
    pub name: String,
    /// Label the team replaced.
    pub label: String,
}

/// A recognized placeholder that could not be filled yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSlot {
    /// Downstream match.
    pub match_code: MatchCode,
    /// Side of the slot.
    pub side: Side,
    /// Placeholder label.
    pub label: String,
    /// What the label refers to.
    pub reference: SlotReference,
}

/// Output of [`propagate`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Propagation {
    /// Downstream matches with every resolvable slot filled.
    pub matches: Vec<DownstreamMatch>,
    /// Slots filled by this run, in match order.
    pub updates: Vec<SlotUpdate>,
    /// Placeholders still open.
    pub pending: Vec<PendingSlot>,
    /// Ambiguous ties and inconsistent bracket sources.
    pub diagnostics: Vec<Diagnostic>,
}

impl Propagation {
    fn flag(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "slot flagged for review");
        self.diagnostics.push(diagnostic);
    }
}

/// Fills every open slot of `downstream` that resolves to a single team.
///
/// `rankings` are the current block rankings and `results` the bracket
/// results keyed by match code. With
/// [`EngineConfig::require_settled_blocks`] set, group slots of blocks still
/// waiting on results stay open; bracket winners are read under
/// [`EngineConfig::regulation`].
#[must_use]
pub fn propagate(
    downstream: &[DownstreamMatch],
    rankings: &BTreeMap<BlockId, Ranking>,
    results: &BTreeMap<MatchCode, MatchResult>,
    config: &EngineConfig,
) -> Propagation {
    let rule = &config.regulation;
    let mut out = Propagation {
        matches: downstream.to_vec(),
        ..Propagation::default()
    };

    for index in 0..out.matches.len() {
        for side in [Side::Home, Side::Away] {
            let current = &out.matches[index];
            let slot = current.slot(side);
            if slot.is_filled() {
                continue;
            }
            let Some(reference) = match_slot_pattern(&slot.name) else {
                continue;
            };
            let match_code = current.code.clone();
            let label = slot.name.clone();

            let resolution = match &reference {
                SlotReference::BlockPosition { block, position } => rankings
                    .get(block)
                    .map_or(Resolution::Unresolved, |ranking| {
                        resolve_group_slot(ranking, *position, config.require_settled_blocks)
                    }),
                SlotReference::MatchWinner { code } => {
                    resolve_bracket_slot(code, MatchOutcome::Winner, results, rule)
                }
                SlotReference::MatchLoser { code } => {
                    resolve_bracket_slot(code, MatchOutcome::Loser, results, rule)
                }
            };

            match resolution {
                Resolution::Resolved(team) => {
                    debug!(match_code = %match_code, %side, %label, team = %team.id, "slot resolved");
                    out.matches[index].slot_mut(side).fill(&team);
                    out.updates.push(SlotUpdate {
                        match_code,
                        side,
                        team: team.id,
                        name: team.name,
                        label,
                    });
                }
                Resolution::AmbiguousTie(teams) => {
                    out.flag(Diagnostic::AmbiguousSlot {
                        match_code: match_code.clone(),
                        side,
                        label: label.clone(),
                        teams,
                    });
                    out.pending.push(PendingSlot {
                        match_code,
                        side,
                        label,
                        reference,
                    });
                }
                Resolution::Unresolved => {
                    if let Some((source, kind)) = undecided_source(&reference, results, rule) {
                        out.flag(Diagnostic::InconsistentBracket {
                            match_code: match_code.clone(),
                            source,
                            kind,
                        });
                    }
                    out.pending.push(PendingSlot {
                        match_code,
                        side,
                        label,
                        reference,
                    });
                }
            }
        }
    }

    out
}

/// A confirmed bracket source that will never name a winner.
fn undecided_source(
    reference: &SlotReference,
    results: &BTreeMap<MatchCode, MatchResult>,
    rule: &RegulationRule,
) -> Option<(MatchCode, ResultKind)> {
    let (code, _) = reference.bracket_source()?;
    let result = results.get(code)?;
    if !result.confirmed || result.outcome(rule).is_some() {
        return None;
    }
    Some((code.clone(), result.kind))
}

// =============================================================================
// Retraction
// =============================================================================

/// An upstream source whose result was retracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upstream {
    /// A block ranking.
    Block(BlockId),
    /// A bracket match.
    Match(MatchCode),
}

/// Reopens every slot filled from `upstream`.
///
/// A slot qualifies when it carries a team and the label it replaced refers
/// to `upstream`. The label is restored and the team cleared. Returns the
/// number of slots reopened.
pub fn reset_dependents(matches: &mut [DownstreamMatch], upstream: &Upstream) -> usize {
    let mut reopened = 0;
    for downstream in matches.iter_mut() {
        for side in [Side::Home, Side::Away] {
            let slot = downstream.slot_mut(side);
            if !slot.is_filled() {
                continue;
            }
            let Some(reference) = slot.placeholder.as_deref().and_then(match_slot_pattern) else {
                continue;
            };
            let depends = match upstream {
                Upstream::Block(block) => reference.reads_block(block),
                Upstream::Match(code) => reference.reads_match(code),
            };
            if depends {
                if let Some(label) = slot.placeholder.take() {
                    *slot = Slot::open(&label);
                    reopened += 1;
                }
            }
        }
    }
    if reopened > 0 {
        debug!(reopened, ?upstream, "dependent slots reopened");
    }
    reopened
}
