use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use watersort_solver::engine::{PuzzleParams, Rack};
use watersort_solver::solver::{solution_exists, solve_shortest};
use watersort_solver::utils::rack_from_rows;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Tube height (capacity of every tube)
    #[clap(short = 't', long, default_value_t = 4)]
    height: usize,

    /// Only report whether a solution exists, without computing a path
    #[clap(long)]
    exists_only: bool,

    /// Path to the puzzle file: one line per tube, palette letters bottom
    /// to top, a blank tube written as "-"
    puzzle_file: PathBuf,
}

fn read_rack_file(path: &PathBuf, params: &PuzzleParams) -> Result<Rack, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;

    let rows: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| if s == "-" { "" } else { s })
        .collect();

    let rack = rack_from_rows(&rows, params).map_err(|e| format!("Invalid puzzle: {}", e))?;
    rack.validate(params)
        .map_err(|e| format!("Invalid puzzle: {}", e))?;
    Ok(rack)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let params = match PuzzleParams::new(args.height) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Invalid parameters: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rack = match read_rack_file(&args.puzzle_file, &params) {
        Ok(rack) => rack,
        Err(e) => {
            eprintln!("Failed to load {}: {}", args.puzzle_file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    println!("Loaded puzzle from {}\n", args.puzzle_file.display());
    println!("{}\n", rack.to_display_string(&params));

    if args.exists_only {
        let exists = solution_exists(&params, &rack).expect("rack was validated while loading");
        if exists {
            println!("A solution exists.");
            return ExitCode::SUCCESS;
        }
        println!("No solution exists.");
        return ExitCode::FAILURE;
    }

    println!("Searching for a shortest solution...\n");
    match solve_shortest(&params, &rack).expect("rack was validated while loading") {
        Some(moves) if moves.is_empty() => {
            println!("The puzzle is already solved.");
            ExitCode::SUCCESS
        }
        Some(moves) => {
            println!("Solution found ({} moves):", moves.len());
            let mut current = rack;
            for (i, mv) in moves.iter().enumerate() {
                let amount = current.pour_amount(mv.from, mv.to, &params);
                println!(
                    "  Move {}: tube {} -> tube {} ({} block{})",
                    i + 1,
                    mv.from,
                    mv.to,
                    amount,
                    if amount == 1 { "" } else { "s" }
                );
                current = current
                    .poured(mv.from, mv.to, &params)
                    .expect("solver paths replay cleanly");
            }
            println!("\nFinal state:\n{}", current.to_display_string(&params));
            ExitCode::SUCCESS
        }
        None => {
            println!("No solution exists.");
            ExitCode::FAILURE
        }
    }
}
