mod board;
mod deadlocks;
mod levels;
mod signature;
mod solver;

use board::{Board, Direction};
use clap::Parser;
use levels::{EXAMPLE_LEVEL_SET, Levels};
use solver::{SolveResult, Solver};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "sokosolve")]
#[command(about = "A breadth-first Sokoban solver", long_about = None)]
struct Args {
    /// Path to an SLC level-set file; solves the built-in example level
    /// when omitted
    #[arg(value_name = "FILE")]
    levels_file: Option<String>,

    /// Level index within the set, taken modulo the set size
    #[arg(value_name = "LEVEL", default_value = "0")]
    level: usize,

    /// Print the board after each move of the solution
    #[arg(short, long)]
    print_solution: bool,

    /// Maximum number of states to expand before giving up
    #[arg(short = 'n', long, default_value = "1000000")]
    max_nodes: usize,

    /// Disable deadlock pruning (slower, identical verdicts)
    #[arg(long, default_value = "false")]
    no_deadlock_pruning: bool,
}

fn print_replay(start: &Board, moves: &[Direction]) {
    println!("\nStarting position:\n{}", start);
    let mut board = start.clone();
    let total = moves.len();
    for (count, dir) in moves.iter().enumerate() {
        match board.try_move(*dir) {
            Some(next) => board = next,
            None => {
                eprintln!("internal error: solution move {} is illegal", dir);
                return;
            }
        }
        println!("Move {} ({}/{}):\n{}", dir, count + 1, total, board);
    }
}

fn main() {
    let args = Args::parse();

    let levels = match &args.levels_file {
        Some(path) => Levels::from_file(path),
        None => Levels::from_text(EXAMPLE_LEVEL_SET),
    };
    let levels = match levels {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("Error loading levels: {}", e);
            std::process::exit(1);
        }
    };

    if levels.is_empty() {
        eprintln!("Error: level set contains no levels");
        std::process::exit(1);
    }

    let index = args.level % levels.len();
    let level = levels.get(index).expect("index is reduced modulo len");

    println!(
        "set: {} level(s), solving level {} ({}x{}, {} boxes)",
        levels.len(),
        level.id,
        level.board.width(),
        level.board.height(),
        level.board.box_count()
    );

    let mut solver = Solver::new(args.max_nodes, !args.no_deadlock_pruning);
    let start = Instant::now();
    let result = solver.solve(&level.board);
    let elapsed = start.elapsed();

    let (solved_char, steps) = match &result {
        SolveResult::Solved(moves) => ('Y', moves.len()),
        SolveResult::Cutoff => ('N', 0),
        SolveResult::Unsolvable => ('X', 0),
    };

    println!(
        "level: {:<4} solved: {}  steps: {:<5}  states: {:<10}  elapsed: {} ms",
        level.id,
        solved_char,
        steps,
        solver.nodes_explored(),
        elapsed.as_millis()
    );

    match result {
        SolveResult::Solved(moves) => {
            if args.print_solution {
                print_replay(&level.board, &moves);
            }
        }
        SolveResult::Unsolvable => println!("no solution exists"),
        SolveResult::Cutoff => println!(
            "search budget of {} states exhausted before a verdict",
            args.max_nodes
        ),
    }
}
