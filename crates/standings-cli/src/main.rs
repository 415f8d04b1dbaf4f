//! Command line front end for the standings engine.
//!
//! Reads a tournament snapshot (and optionally an engine configuration) from
//! JSON files, runs one recomputation and prints the result. Log output goes
//! to stderr and is controlled with `RUST_LOG`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use standings_core::advancement::{match_slot_pattern, SlotReference};
use standings_core::ranking::Ranking;
use standings_core::{BlockId, Engine, EngineConfig, Recomputation, TournamentSnapshot};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "standings", version, about = "Block standings and advancement engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recompute every ranking and fill downstream slots.
    Recompute {
        /// Tournament snapshot (JSON).
        #[arg(long)]
        snapshot: PathBuf,
        /// Engine configuration (JSON); defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Pretty-print JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Print the ranking of one block.
    Standings {
        /// Tournament snapshot (JSON).
        #[arg(long)]
        snapshot: PathBuf,
        /// Engine configuration (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Block to print.
        #[arg(long)]
        block: String,
    },
    /// Show how a slot label is read.
    Slot {
        /// Label as written in the downstream match.
        label: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

#[derive(Serialize)]
struct SlotReport<'a> {
    label: &'a str,
    reference: Option<SlotReference>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Recompute {
            snapshot,
            config,
            format,
            pretty,
        } => {
            let out = run(&snapshot, config.as_deref())?;
            match format {
                Format::Json if pretty => println!("{}", serde_json::to_string_pretty(&out)?),
                Format::Json => println!("{}", serde_json::to_string(&out)?),
                Format::Table => print_recomputation(&out),
            }
        }
        Command::Standings {
            snapshot,
            config,
            block,
        } => {
            let out = run(&snapshot, config.as_deref())?;
            let id = BlockId::new(&block);
            let Some(ranking) = out.rankings.get(&id) else {
                bail!("block {block} is neither declared nor referenced by any result");
            };
            print_ranking(&id, ranking);
        }
        Command::Slot { label } => {
            let report = SlotReport {
                reference: match_slot_pattern(&label),
                label: &label,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn run(snapshot: &Path, config: Option<&Path>) -> Result<Recomputation> {
    let config: EngineConfig = match config {
        Some(path) => read_json(path).context("loading engine config")?,
        None => EngineConfig::default(),
    };
    let snapshot: TournamentSnapshot = read_json(snapshot).context("loading snapshot")?;
    info!(
        blocks = snapshot.blocks.len(),
        results = snapshot.results.len(),
        downstream = snapshot.downstream.len(),
        "snapshot loaded"
    );

    let engine = Engine::new(config).context("invalid engine config")?;
    engine.recompute(&snapshot).context("recomputation failed")
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "reading");
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_ranking(block: &BlockId, ranking: &Ranking) {
    let status = if ranking.is_settled() { "settled" } else { "in progress" };
    println!("Block {block} ({status})");
    println!(
        "{:>3}  {:<24} {:>2} {:>2} {:>2} {:>2} {:>4} {:>4} {:>4} {:>4}",
        "Pos", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for s in ranking.standings() {
        println!(
            "{:>3}  {:<24} {:>2} {:>2} {:>2} {:>2} {:>4} {:>4} {:>+4} {:>4}",
            s.position,
            s.name,
            s.played,
            s.wins,
            s.draws,
            s.losses,
            s.goals_for,
            s.goals_against,
            s.goal_difference,
            s.points
        );
    }
}

fn print_recomputation(out: &Recomputation) {
    for (block, ranking) in &out.rankings {
        print_ranking(block, ranking);
        println!();
    }
    for update in &out.updates {
        println!(
            "{} {}: {} -> {}",
            update.match_code, update.side, update.label, update.name
        );
    }
    for pending in &out.pending {
        println!(
            "{} {}: {} waiting on {}",
            pending.match_code, pending.side, pending.label, pending.reference
        );
    }
    for diagnostic in &out.diagnostics {
        println!("! {diagnostic}");
    }
}
