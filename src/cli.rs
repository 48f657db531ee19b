use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bot::{Difficulty, TreeBot};
use crate::codec;
use crate::display::{counts_line, counts_table, print_error, stats_table};
use crate::error::BalanceResult;
use crate::export::{classify_and_export, ExportConfig};
use crate::glade::{GladeConfig, GladeState};
use crate::outcome_tree::build_outcomes;
use crate::search::{search, Objective};
use crate::tally::{split_tally, tally};

#[derive(Parser)]
#[command(
    name = "balance",
    version = "1.0.0",
    about = "Game balance analyzer — outcome aggregation, bucketed export, and tree search."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchObjective {
    /// Most favorable for player 1.
    First,
    /// Most favorable for player 2.
    Second,
    /// Most even.
    Even,
}

impl SearchObjective {
    fn objective(self) -> Objective {
        match self {
            SearchObjective::First => Objective::FavorFirst,
            SearchObjective::Second => Objective::FavorSecond,
            SearchObjective::Even => Objective::MinimizeImbalance,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SearchObjective::First => "favor-first",
            SearchObjective::Second => "favor-second",
            SearchObjective::Even => "minimize-imbalance",
        }
    }
}

#[derive(clap::Args, Clone, Copy)]
struct BoardArgs {
    /// Board rows.
    #[arg(long, default_value_t = 3)]
    rows: usize,
    /// Board columns.
    #[arg(long, default_value_t = 4)]
    cols: usize,
    /// Items dealt onto the board (game length).
    #[arg(long, default_value_t = 4)]
    items: usize,
}

impl BoardArgs {
    fn config(self) -> GladeConfig {
        GladeConfig {
            rows: self.rows,
            cols: self.cols,
            items: self.items,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full aggregate tree for a glade board and persist it.
    Build {
        #[command(flatten)]
        board: BoardArgs,
        /// Output file for the tree image.
        #[arg(long, default_value = "outcomes_tree.bin")]
        out: PathBuf,
    },
    /// Classify root setups into balance buckets and export shard files.
    Export {
        #[command(flatten)]
        board: BoardArgs,
        /// Number of shard cycles to cut the setup scan into.
        #[arg(long, default_value_t = 2)]
        slices: usize,
        /// Directory receiving the shard files.
        #[arg(long, default_value = "shards")]
        out_dir: PathBuf,
        /// Statistics file (semicolon-delimited, appended).
        #[arg(long, default_value = "statistic_file.txt")]
        stats: PathBuf,
        /// Free-text log file (appended).
        #[arg(long, default_value = "log_file.txt")]
        log: PathBuf,
    },
    /// Search a persisted aggregate tree for the extremal state at a depth.
    Search {
        /// Persisted tree image to load.
        #[arg(long)]
        tree: PathBuf,
        /// Target depth; the nodes evaluated sit at depth - 1 from the root.
        #[arg(long)]
        depth: u32,
        #[arg(long, value_enum)]
        objective: SearchObjective,
        /// Emit the result as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Count terminal outcomes per chance branch without building a tree.
    Tally {
        #[command(flatten)]
        board: BoardArgs,
        /// Snapshot the counters in this many contiguous branch groups.
        #[arg(long)]
        split: Option<usize>,
        /// Emit the counts as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Pretty-print an export statistics file.
    Stats {
        #[arg(long, default_value = "statistic_file.txt")]
        file: PathBuf,
    },
    /// Play two bots against each other over a persisted tree.
    Selfplay {
        /// Persisted tree image to load.
        #[arg(long)]
        tree: PathBuf,
        /// Difficulty level (1-4) of the first player's bot.
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=4))]
        first: u8,
        /// Difficulty level (1-4) of the second player's bot.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
        second: u8,
        /// RNG seed for the deal and the sampling bots.
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        print_error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> BalanceResult<()> {
    match cli.command {
        Commands::Build { board, out } => cmd_build(board.config(), out),
        Commands::Export {
            board,
            slices,
            out_dir,
            stats,
            log,
        } => cmd_export(board.config(), slices, out_dir, stats, log),
        Commands::Search {
            tree,
            depth,
            objective,
            json,
        } => cmd_search(tree, depth, objective, json),
        Commands::Tally { board, split, json } => cmd_tally(board.config(), split, json),
        Commands::Stats { file } => cmd_stats(file),
        Commands::Selfplay {
            tree,
            first,
            second,
            seed,
        } => cmd_selfplay(tree, first, second, seed),
    }
}

fn cmd_build(config: GladeConfig, out: PathBuf) -> BalanceResult<()> {
    let state = GladeState::new(config);
    println!(
        "  {} Counting outcomes for {} board, {} items ({} setups)...",
        "Balance".bold(),
        config.board_size(),
        config.items,
        state.layout_count(),
    );

    let start = Instant::now();
    let tree = build_outcomes(&state);
    println!(
        "  Outcomes counted: {} ({:.2}s)",
        counts_line(&tree),
        start.elapsed().as_secs_f64(),
    );

    let start = Instant::now();
    codec::save_to_path(&tree, &out)?;
    println!(
        "  Tree written to {} ({:.2}s)",
        out.display().to_string().bold(),
        start.elapsed().as_secs_f64(),
    );
    Ok(())
}

fn cmd_export(
    config: GladeConfig,
    slices: usize,
    out_dir: PathBuf,
    stats_path: PathBuf,
    log_path: PathBuf,
) -> BalanceResult<()> {
    fs::create_dir_all(&out_dir)?;
    let mut stats = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&stats_path)?;
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let state = GladeState::new(config);
    let export_config = ExportConfig {
        game_name: format!("glade_{}", config.board_size()),
        game_length: config.items.to_string(),
        board_size: config.board_size(),
        slice_count: slices,
        out_dir,
    };

    println!(
        "  {} Exporting {} setups in {} slices...",
        "Balance".bold(),
        state.layout_count(),
        slices,
    );

    let summary = classify_and_export(&state, &export_config, &mut stats, &mut log)?;

    println!(
        "  Done: {} setups, {} assigned, {} dropped (beyond \u{b1}40%), {} shards, {:.2}s",
        summary.outcomes_seen,
        summary.assigned.to_string().green().bold(),
        summary.dropped.to_string().yellow(),
        summary.shards,
        summary.elapsed_secs,
    );
    println!(
        "  Stats appended to {}",
        stats_path.display().to_string().bold()
    );
    Ok(())
}

fn cmd_search(
    tree_path: PathBuf,
    depth: u32,
    objective: SearchObjective,
    json: bool,
) -> BalanceResult<()> {
    let tree = codec::load_from_path(&tree_path)?;
    match search(&tree, depth, objective.objective()) {
        Some(best) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&best)?);
            } else {
                println!(
                    "  {} Best node at depth {} ({}):",
                    "Balance".bold(),
                    depth,
                    objective.as_str(),
                );
                let rows = vec![(
                    "best".to_string(),
                    best.win_first,
                    best.win_second,
                    best.draws,
                )];
                println!("{}", counts_table(&rows));
                println!("  Imbalance: {:.4}", best.imbalance);
            }
        }
        None => {
            print_error(&format!(
                "no node evaluated at depth {} (depth must be at least 1 and within the tree)",
                depth
            ));
        }
    }
    Ok(())
}

fn cmd_tally(config: GladeConfig, split: Option<usize>, json: bool) -> BalanceResult<()> {
    let state = GladeState::new(config);

    match split {
        Some(split_count) => {
            let slices = split_tally(&state, split_count);
            if json {
                println!("{}", serde_json::to_string_pretty(&slices)?);
                return Ok(());
            }
            let rows: Vec<(String, i32, i32, i32)> = slices
                .iter()
                .map(|slice| {
                    (
                        format!("through {}", slice.branch_mark),
                        slice.win_first,
                        slice.win_second,
                        slice.draws,
                    )
                })
                .collect();
            println!("{}", counts_table(&rows));
        }
        None => {
            let counts = tally(&state);
            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
                return Ok(());
            }
            let rows = vec![(
                format!("{} setups", counts.chance_branches),
                counts.win_first,
                counts.win_second,
                counts.draws,
            )];
            println!("{}", counts_table(&rows));
        }
    }
    Ok(())
}

fn cmd_stats(file: PathBuf) -> BalanceResult<()> {
    let contents = fs::read_to_string(&file)?;
    println!("{}", stats_table(&contents));
    Ok(())
}

fn cmd_selfplay(
    tree_path: PathBuf,
    first: u8,
    second: u8,
    seed: Option<u64>,
) -> BalanceResult<()> {
    let first = Difficulty::from_level(first).unwrap_or(Difficulty::Expert);
    let second = Difficulty::from_level(second).unwrap_or(Difficulty::Easy);
    let tree = codec::load_from_path(&tree_path)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Deal: pick a uniform chance branch off the root, as the real game
    // would.
    let deals: Vec<_> = tree.children.keys().copied().collect();
    if deals.is_empty() {
        print_error("tree has no root branches to deal from");
        return Ok(());
    }
    let deal = deals[rng.gen_range(0..deals.len())];

    let seed_pair = (rng.gen(), rng.gen());
    let mut bots = [
        TreeBot::seeded(tree.clone(), first, seed_pair.0),
        TreeBot::seeded(tree, second, seed_pair.1),
    ];
    bots[0].advance(deal)?;
    bots[1].advance(deal)?;

    println!(
        "  {} Setup {} dealt; bot levels {} vs {}",
        "Balance".bold(),
        deal,
        first.level(),
        second.level(),
    );

    let mut mover = 0;
    while let Some(action) = bots[mover].select_action() {
        println!("  Player {} picks {}", mover + 1, action);
        bots[0].advance(action)?;
        bots[1].advance(action)?;
        mover = 1 - mover;
    }

    let terminal = bots[0].current();
    let verdict = if terminal.win_first > 0 {
        "player 1 wins".green().bold().to_string()
    } else if terminal.win_second > 0 {
        "player 2 wins".red().bold().to_string()
    } else {
        "draw".yellow().bold().to_string()
    };
    println!("  Result: {} ({})", verdict, counts_line(terminal));
    Ok(())
}
