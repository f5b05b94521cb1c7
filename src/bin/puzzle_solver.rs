use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use slide_solver::engine::Board;
use slide_solver::solver::{SearchConfig, SolveOutcome, Solver, Strategy};
use slide_solver::utils::{describe_solution_path, parse_board};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Start board, row-major, e.g. "1 2 3 4 5 6 7 0 8" or "123456708"
    #[clap(short, long, conflicts_with = "board_file")]
    board: Option<String>,

    /// Path to a file holding the start board (one row per line)
    #[clap(short = 'f', long)]
    board_file: Option<PathBuf>,

    /// Goal board; defaults to 0, 1, ..., N²-1
    #[clap(short, long)]
    goal: Option<String>,

    /// Seed for the shuffled start board used when no board is given
    #[clap(short, long, default_value_t = 514514)]
    seed: u64,

    /// Side length of the shuffled start board
    #[clap(long, default_value_t = 3)]
    side: usize,

    /// Give up after expanding this many boards
    #[clap(short, long)]
    max_expansions: Option<usize>,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_board_file(path: &PathBuf) -> Result<Board, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    parse_board(&content).map_err(|e| format!("Invalid board format: {}", e))
}

fn load_start(args: &Args) -> Result<Board, String> {
    if let Some(text) = &args.board {
        return parse_board(text).map_err(|e| format!("Invalid start board: {}", e));
    }
    if let Some(path) = &args.board_file {
        let board = read_board_file(path)?;
        println!("Loaded board from {}\n", path.display());
        return Ok(board);
    }
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let board = Board::shuffled(args.side, &mut rng).map_err(|e| format!("Cannot shuffle: {}", e))?;
    println!("Shuffled a {}x{} board with seed {}\n", args.side, args.side, args.seed);
    Ok(board)
}

fn run(args: &Args) -> Result<(), String> {
    let start = load_start(args)?;
    let goal = args
        .goal
        .as_deref()
        .map(parse_board)
        .transpose()
        .map_err(|e| format!("Invalid goal board: {}", e))?;

    let config = SearchConfig {
        strategy: Strategy::BreadthFirst,
        max_expansions: args.max_expansions,
    };
    let mut solver = Solver::new(start, goal, config).map_err(|e| e.to_string())?;

    println!("Initial board state:\n{}\n", solver.start());
    println!("Goal board state:\n{}\n", solver.goal());
    if !solver.start().has_same_parity(solver.goal()) {
        warn!("start and goal have different parity, the search will exhaust the reachable states");
    }
    match args.max_expansions {
        Some(limit) => println!("Searching breadth-first, at most {} expansions...\n", limit),
        None => println!("Searching breadth-first...\n"),
    }

    let side = solver.start().side();
    match solver.solve() {
        SolveOutcome::Solved(path) => {
            println!("Solution found:\n");
            println!("Moves ({}):", path.len());
            if path.is_empty() {
                println!("  Already solved.");
            }
            for line in describe_solution_path(&path, side).map_err(|e| e.to_string())? {
                println!("  {}", line);
            }
        }
        SolveOutcome::Unsolvable => {
            println!("No solution found: the goal is not reachable from this configuration.");
        }
        SolveOutcome::Aborted { expanded } => {
            println!(
                "Search aborted after {} expansions without reaching the goal.",
                expanded
            );
        }
    }
    info!("{}", solver);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}
