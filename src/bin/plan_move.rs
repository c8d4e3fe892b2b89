use anyhow::Context;
use clap::Parser;
use collect_solver::analysis::{analyze, analyze_with_fallback, Outcome};
use collect_solver::config::{AnalysisConfig, PathPolicy};
use collect_solver::engine::Tile;
use collect_solver::groups::find_all_groups;
use collect_solver::utils::board_from_text;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Plan the drag for one board snapshot", long_about = None)]
struct Args {
    /// JSON analysis config; defaults sized to the board, accepting every color, when omitted
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Path planning policy (greedy or backtrack), overriding the config
    #[clap(short, long)]
    policy: Option<PathPolicy>,

    /// Minimum group size, overriding the config
    #[clap(short, long)]
    min_group_size: Option<usize>,

    /// Try smaller groups when the largest one has no draggable path
    #[clap(long)]
    fallback: bool,

    /// Path to the board file (one row per line, e.g. `RRB.?G`)
    board_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let text = fs::read_to_string(&args.board_file)
        .with_context(|| format!("failed to read board file {}", args.board_file.display()))?;
    let board = board_from_text(&text)
        .with_context(|| format!("invalid board in {}", args.board_file.display()))?;

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig {
            palette: Tile::COLORS.to_vec(),
            ..AnalysisConfig::with_dimensions(board.rows(), board.cols())
        },
    };
    if let Some(policy) = args.policy {
        config.path_policy = policy;
    }
    if let Some(min_group_size) = args.min_group_size {
        config.min_group_size = min_group_size;
    }
    config.validate().context("invalid configuration")?;

    println!("Loaded board from {}\n", args.board_file.display());
    println!("{board}\n");

    let outcome = if args.fallback {
        analyze_with_fallback(&board, &config)
    } else {
        analyze(&board, &config)
    }
    .context("board does not match the configuration")?;

    let groups = find_all_groups(&board, &config);
    println!("Groups ({}):", groups.len());
    for (i, group) in groups.iter().enumerate() {
        println!(
            "  Group {}: {} x {} starting at {}",
            i + 1,
            group.color(),
            group.len(),
            group.cells()[0]
        );
    }
    println!();

    match &outcome {
        Outcome::NoMove => println!("No move available."),
        Outcome::Move { group, path } | Outcome::Degenerate { group, path } => {
            let label = if outcome.is_move() {
                "Move"
            } else {
                "Unusable move (path too short)"
            };
            println!("{label}: {} x {}", group.color(), group.len());
            println!(
                "Path ({} of {} cells, {} policy):",
                path.len(),
                group.len(),
                config.path_policy
            );
            let steps: Vec<String> = path.cells().iter().map(ToString::to_string).collect();
            println!("  {}", steps.join(" -> "));
            println!("\n{}", board.to_string_with_highlight(Some(path.cells())));
        }
    }

    Ok(())
}
