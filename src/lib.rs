//! # Water-Sort Solver Library
//!
//! This library provides the core game logic for the tube water-sort puzzle
//! and two exhaustive searches over its state space: a breadth-first search
//! for a provably shortest move sequence, and a depth-first existence check
//! used to warn a player before they reach a dead end.
//!
//! It is used by two binaries:
//! - `play`: Interactive gameplay via the command line, with undo, hints,
//!   and a dead-end warning after every move.
//! - `solve`: Takes a puzzle file and prints a shortest solution, or just
//!   whether one exists.
//!
//! ## Modules
//! - `engine`: Tube and rack representation (`Tube`, `Rack`), colors, puzzle
//!   parameters, move validation, the capped-run pour transition, the solved
//!   test, seeded puzzle generation, and the interactive `Game` wrapper.
//! - `solver`: `solve_shortest` (resumable BFS) and `solution_exists`
//!   (stack-based DFS over tube-order-independent signatures).
//! - `error`: Structured error type for malformed puzzles.
//! - `utils`: Parsing rack fixtures from strings.

pub mod engine;
pub mod error;
pub mod solver;
pub mod utils;

// Items from sub-modules, if public, should be accessed via their full path,
// e.g. `watersort_solver::solver::solve_shortest()`. This keeps the
// top-level library namespace cleaner.
