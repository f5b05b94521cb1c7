use clap::Parser;
use env_logger::Env;
use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use slide_solver::engine::{Board, BLANK};
use slide_solver::solver::{SearchConfig, SolveOutcome, Solver, Strategy};
use std::collections::HashMap;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Seed of the first board; board i uses start_seed + i
    #[clap(short, long, default_value_t = 0)]
    start_seed: u64,

    /// Side length of the boards
    #[clap(long, default_value_t = 3)]
    side: usize,

    /// Expansion limit per search
    #[clap(short, long, default_value_t = 200_000)]
    max_expansions: usize,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// Costs for the solved layout 0, 1, ..., N²-1, where tile v belongs at index v.

fn misplaced_tiles(board: &Board, depth: u32) -> u32 {
    let misplaced = board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(i, &v)| v != BLANK && v as usize != i)
        .count();
    depth + misplaced as u32
}

fn manhattan(board: &Board, depth: u32) -> u32 {
    let side = board.side();
    let distance: usize = board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v != BLANK)
        .map(|(i, &v)| {
            let (r, c) = (i / side, i % side);
            let (gr, gc) = (v as usize / side, v as usize % side);
            r.abs_diff(gr) + c.abs_diff(gc)
        })
        .sum();
    depth + distance as u32
}

#[derive(Default)]
struct Tally {
    solved: u32,
    aborted: u32,
    total_moves: usize,
    total_expanded: usize,
}

fn main() {
    let args = Args::parse();
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let strategies: Vec<(&str, Strategy)> = vec![
        ("BFS", Strategy::BreadthFirst),
        ("MISPLACED", Strategy::BestFirst(misplaced_tiles)),
        ("MANHATTAN", Strategy::BestFirst(manhattan)),
    ];

    let goal = match Board::solved(args.side) {
        Ok(goal) => goal,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    println!("Starting strategy evaluation for {} boards...", args.boards);

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx;
        let mut rng = SmallRng::seed_from_u64(seed);
        let start = match Board::shuffled(args.side, &mut rng) {
            Ok(board) => board,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };

        println!("\nEvaluating Board {} (Seed: {}): {}", board_idx, seed, start.to_compact_string());
        if !start.has_same_parity(&goal) {
            println!("  Skipped: not reachable from the goal.");
            continue;
        }

        for (name, strategy) in &strategies {
            let config = SearchConfig {
                strategy: *strategy,
                max_expansions: Some(args.max_expansions),
            };
            let mut solver = match Solver::new(start.clone(), Some(goal.clone()), config) {
                Ok(solver) => solver,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    continue;
                }
            };
            let outcome = solver.solve();
            debug!("{} on seed {}: {}", name, seed, solver);

            let tally = tallies.entry(*name).or_default();
            tally.total_expanded += solver.expanded();
            match outcome {
                SolveOutcome::Solved(path) => {
                    tally.solved += 1;
                    tally.total_moves += path.len();
                    println!(
                        "  Strategy: {:<10}, Moves: {:<4}, Expanded: {}",
                        name,
                        path.len(),
                        solver.expanded()
                    );
                }
                SolveOutcome::Aborted { expanded } => {
                    tally.aborted += 1;
                    println!("  Strategy: {:<10}, aborted after {} expansions", name, expanded);
                }
                SolveOutcome::Unsolvable => {
                    println!("  Strategy: {:<10}, no solution found", name);
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!(
        "Strategies evaluated: {}",
        strategies.iter().map(|(name, _)| *name).collect::<Vec<&str>>().join(", ")
    );
    println!("\n--- Averages over solved boards ---");

    let mut rows: Vec<(&str, f64, f64, u32, u32)> = tallies
        .iter()
        .filter(|(_, t)| t.solved > 0)
        .map(|(name, t)| {
            (
                *name,
                t.total_moves as f64 / t.solved as f64,
                t.total_expanded as f64 / (t.solved + t.aborted) as f64,
                t.solved,
                t.aborted,
            )
        })
        .collect();
    rows.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

    for (name, moves, expanded, solved, aborted) in rows {
        println!(
            "Strategy {:<10}: Moves = {:.2}, Expanded = {:.1}, Solved = {}, Aborted = {}",
            name, moves, expanded, solved, aborted
        );
    }
}
