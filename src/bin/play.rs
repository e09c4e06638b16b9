use clap::Parser;
use std::io::{self, Write};

use watersort_solver::engine::{Game, PuzzleParams};
use watersort_solver::solver::{solution_exists, solve_shortest};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Tube height (capacity of every tube)
    #[clap(short = 't', long, default_value_t = 4)]
    height: usize,

    /// Number of colors (one full tube's worth of blocks each)
    #[clap(short, long, default_value_t = 6)]
    colors: usize,

    /// Number of extra empty tubes
    #[clap(short, long, default_value_t = 2)]
    empty: usize,

    /// Seed for the shuffled starting rack
    #[clap(short, long, default_value_t = 514514)]
    seed: u64,
}

fn main() {
    let args = Args::parse();
    let params = match PuzzleParams::new(args.height) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Invalid parameters: {}", e);
            return;
        }
    };

    let mut game = Game::new_random(params, args.colors, args.empty, args.seed);
    println!("Welcome to Water Sort!");

    loop {
        println!("---------------------");
        println!("Moves made: {}", game.moves_made());
        println!("{}", game.rack().to_display_string(game.params()));

        if game.is_solved() {
            println!();
            println!("---------------------");
            println!("🎉 YOU WIN! 🎉");
            println!("Solved in {} moves.", game.moves_made());
            println!("---------------------");
            break;
        }

        print!("Enter your move (from to), 'u' to undo, 'h' for a hint, 'q' to quit: ");
        io::stdout().flush().expect("stdout is writable");

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Error reading input. Please try again.");
            continue;
        }

        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if trimmed_input == "u" {
            if game.undo_last_move() {
                println!("Move undone.");
            } else {
                println!("Cannot undo further (no moves made).");
            }
            continue;
        }

        if trimmed_input == "h" {
            match solve_shortest(game.params(), game.rack()).expect("game racks stay valid") {
                Some(moves) => match moves.first() {
                    Some(mv) => println!("Hint: pour tube {} into tube {}.", mv.from, mv.to),
                    None => println!("Hint: nothing left to do."),
                },
                None => println!("No solution exists from here. Try undoing some moves."),
            }
            continue;
        }

        let parts: Vec<&str> = trimmed_input.split_whitespace().collect();
        if parts.len() != 2 {
            println!("Invalid input format. Use 'from to', 'u', 'h', or 'q'.");
            continue;
        }
        let (from, to) = match (parts[0].parse::<usize>(), parts[1].parse::<usize>()) {
            (Ok(from), Ok(to)) => (from, to),
            _ => {
                println!("Invalid input: tube numbers expected (e.g. '3 4').");
                continue;
            }
        };

        match game.pour(from, to) {
            Ok(Some(amount)) => {
                println!(
                    "Poured {} block{} from tube {} into tube {}.",
                    amount,
                    if amount == 1 { "" } else { "s" },
                    from,
                    to
                );
                if !game.is_solved()
                    && !solution_exists(game.params(), game.rack())
                        .expect("game racks stay valid")
                {
                    println!("⚠ No solution exists from this position. Consider undoing.");
                }
            }
            Ok(None) => {
                println!(
                    "Invalid move: cannot pour from tube {} into tube {}.",
                    from, to
                );
            }
            Err(e) => {
                println!("Invalid move: {}", e);
            }
        }
    }
}
