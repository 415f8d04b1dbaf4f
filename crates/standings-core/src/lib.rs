//! # Standings Core
//!
//! Standings and advancement engine for multi-round tournaments.
//!
//! This crate computes block (group) standings from confirmed match results,
//! ranks them under a configurable tie-break cascade and promotes teams into
//! the placeholder slots of later-round matches. It is a pure library: the
//! caller fetches results, rosters and downstream matches, and writes the
//! output back.
//!
//! ## Architecture
//!
//! - **Result Aggregator** ([`aggregate`]): results to per-team statistics
//! - **Ranking Resolver** ([`ranking`]): statistics to ordered, co-ranked positions
//! - **Advancement Propagator** ([`advancement`]): rankings and bracket winners to filled slots
//!
//! [`engine::Engine`] runs all three over a [`engine::TournamentSnapshot`],
//! recomputing from scratch on every call.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use standings_core::{Engine, EngineConfig, TournamentSnapshot};
//!
//! let snapshot: TournamentSnapshot = serde_json::from_str(&json)?;
//! let engine = Engine::new(EngineConfig::default())?;
//! let out = engine.recompute(&snapshot)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod advancement;
pub mod aggregate;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod ranking;
pub mod result;
pub mod team;

pub use advancement::{DownstreamMatch, Resolution, Slot, SlotReference};
pub use aggregate::{BlockStandings, TeamStanding};
pub use config::EngineConfig;
pub use diagnostics::Diagnostic;
pub use engine::{BlockSpec, Engine, Recomputation, TournamentSnapshot};
pub use error::EngineError;
pub use ranking::{Ranking, TieBreakCascade, TieBreakKey};
pub use result::{MatchResult, MatchSide, PeriodScore, ResultKind};
pub use team::{BlockId, MatchCode, Side, Team, TeamId};

#[cfg(test)]
mod tests;
