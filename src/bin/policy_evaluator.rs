use anyhow::Context;
use clap::Parser;
use collect_solver::config::{AnalysisConfig, PathPolicy};
use collect_solver::session::{Session, SessionSettings};
use collect_solver::simulation::SimulatedGame;
use std::ops::Range;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare path planning policies on simulated games", long_about = None)]
struct Args {
    /// Number of seeded games per policy
    #[clap(short, long, default_value_t = 20)]
    games: u64,

    /// First seed; games use consecutive seeds from here
    #[clap(short, long, default_value_t = 0)]
    start_seed: u64,

    /// Turn limit per game
    #[clap(short, long, default_value_t = 200)]
    max_turns: usize,

    /// Leave cleared cells empty instead of refilling them
    #[clap(long)]
    no_refill: bool,

    /// JSON analysis config; defaults are used when omitted
    #[clap(short, long)]
    config: Option<PathBuf>,
}

#[derive(Default)]
struct PolicyStats {
    moves: usize,
    turns: usize,
    cells: usize,
    games: usize,
}

/// Consecutive seeds `start..start + games`, rejecting ranges past `u64::MAX`.
fn seed_range(start: u64, games: u64) -> anyhow::Result<Range<u64>> {
    let end = start
        .checked_add(games)
        .with_context(|| format!("seed range {start} + {games} overflows u64"))?;
    Ok(start..end)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let base_config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let settings = SessionSettings {
        max_turns: args.max_turns,
        ..SessionSettings::default()
    };

    let seeds = seed_range(args.start_seed, args.games)?;

    println!("Evaluating path policies on {} games...", args.games);

    let policies = [PathPolicy::Greedy, PathPolicy::Backtrack];
    let mut results = Vec::new();
    for policy in policies {
        let config = AnalysisConfig {
            path_policy: policy,
            ..base_config.clone()
        };
        let session = Session::new(config.clone(), settings.clone());
        let mut stats = PolicyStats::default();

        for seed in seeds.clone() {
            let mut observer = SimulatedGame::new(config.clone(), seed).with_refill(!args.no_refill);
            let mut actuator = observer.clone();
            let summary = session
                .run(&mut observer, &mut actuator)
                .with_context(|| format!("game with seed {seed} failed"))?;
            println!(
                "  Policy: {:<10} Seed: {:<4} Moves: {:<4} Cells: {:<5} End: {}",
                policy, seed, summary.moves, summary.cells_dragged, summary.end_reason
            );
            stats.moves += summary.moves;
            stats.turns += summary.turns;
            stats.cells += summary.cells_dragged;
            stats.games += 1;
        }
        results.push((policy, stats));
    }

    println!("\n--- Averages ---");
    for (policy, stats) in &results {
        if stats.games == 0 {
            println!("Policy {policy}: no games played.");
            continue;
        }
        let games = stats.games as f64;
        let cells_per_move = if stats.moves == 0 {
            0.0
        } else {
            stats.cells as f64 / stats.moves as f64
        };
        println!(
            "Policy {:<10}: Moves = {:.2}, Turns = {:.2}, Cells = {:.2}, Cells/Move = {:.2}",
            policy,
            stats.moves as f64 / games,
            stats.turns as f64 / games,
            stats.cells as f64 / games,
            cells_per_move
        );
    }

    Ok(())
}
