//! Exhaustive search over rack states.
//!
//! Two searches with different contracts share the same primitives:
//!
//! - [`solve_shortest`] runs a breadth-first search and returns a minimal
//!   move sequence, or `None` when the rack cannot be solved. Deduplication
//!   uses the rack value itself as the key, so tubes keep their identity and
//!   the returned path stays replayable by index.
//! - [`solution_exists`] answers only whether any solution exists, with a
//!   depth-first search over an explicit stack. It deduplicates on the
//!   tube-order-independent [`Rack::sorted_signature`], which collapses
//!   interchangeable tubes (typically several empty ones) and shrinks the
//!   explored space. That collapse forgets tube identity, which is exactly
//!   why this search never reports a path.
//!
//! Neither search prunes heuristically; validity filtering and the visited
//! set are the only cuts, and both searches agree on solvability.

use std::collections::{HashSet, VecDeque};

use crate::engine::{Color, Move, PuzzleParams, Rack};
use crate::error::PuzzleError;

/// Number of newly enqueued states processed per [`ShortestSearch::resume`]
/// call made by the run-to-completion wrapper.
const RESUME_CHUNK: usize = 4096;

/// Outcome of one [`ShortestSearch::resume`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// The budget ran out before the search finished; call `resume` again.
    Pending,
    /// A minimal move sequence was found. Empty if the start was solved.
    Solved(Vec<Move>),
    /// The reachable state space is exhausted and holds no solved rack.
    Unsolvable,
}

/// A suspendable breadth-first search for a shortest solution.
///
/// The search owns its queue and visited set and touches no outside state,
/// so a host loop can interleave `resume` calls with rendering or input
/// handling: suspension happens only between queue entries, never inside a
/// transition, and a resumed search observes exactly the queue and visited
/// set it left behind.
///
/// Once `resume` returns [`SearchStatus::Solved`] or
/// [`SearchStatus::Unsolvable`] the search is finished; any further
/// `resume` call returns that same terminal status.
#[derive(Clone, Debug)]
pub struct ShortestSearch {
    params: PuzzleParams,
    queue: VecDeque<(Rack, Vec<Move>)>,
    visited: HashSet<Rack>,
    outcome: Option<SearchStatus>,
}

impl ShortestSearch {
    /// Starts a search from `start`, which is cloned and validated.
    ///
    /// # Errors
    /// Returns an error if the rack violates the tube height.
    pub fn new(params: &PuzzleParams, start: &Rack) -> Result<Self, PuzzleError> {
        start.validate(params)?;
        let mut visited = HashSet::new();
        visited.insert(start.clone());
        let mut queue = VecDeque::new();
        queue.push_back((start.clone(), Vec::new()));
        Ok(ShortestSearch {
            params: *params,
            queue,
            visited,
            outcome: None,
        })
    }

    /// Records a terminal status and releases the search's working memory.
    fn finish(&mut self, status: SearchStatus) -> SearchStatus {
        self.queue.clear();
        self.visited.clear();
        self.outcome = Some(status.clone());
        status
    }

    /// Runs the search until it terminates or roughly `max_expansions` new
    /// states have been enqueued, whichever comes first.
    ///
    /// The budget is checked after each dequeued entry is fully expanded,
    /// so one call always makes progress even with a budget of zero.
    ///
    /// Entries are expanded in `from` ascending, then `to` ascending order.
    /// Among equally short solutions, the one this order reaches first is
    /// returned, which keeps results reproducible across runs.
    pub fn resume(&mut self, max_expansions: usize) -> SearchStatus {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let mut expanded = 0;

        while let Some((rack, path)) = self.queue.pop_front() {
            // Goal check at dequeue: every entry at a shallower depth was
            // generated first, so the first solved rack dequeued carries a
            // minimal path.
            if rack.is_solved(&self.params) {
                return self.finish(SearchStatus::Solved(path));
            }

            let tubes = rack.tube_count();
            for from in 0..tubes {
                for to in 0..tubes {
                    if from == to {
                        continue;
                    }
                    let Some(next) = rack.poured(from, to, &self.params) else {
                        continue;
                    };
                    if self.visited.contains(&next) {
                        continue;
                    }
                    self.visited.insert(next.clone());
                    let mut next_path = path.clone();
                    next_path.push(Move { from, to });
                    self.queue.push_back((next, next_path));
                    expanded += 1;
                }
            }

            if expanded >= max_expansions && !self.queue.is_empty() {
                return SearchStatus::Pending;
            }
        }

        self.finish(SearchStatus::Unsolvable)
    }
}

/// Finds a shortest move sequence solving `start`, running the breadth-first
/// search to completion.
///
/// Returns `Ok(Some(moves))` with a minimal-length path (empty when the
/// rack is already solved), or `Ok(None)` when no solution exists. The
/// returned moves carry tube indices only; replaying them recomputes each
/// transferred amount via [`Rack::pour_amount`].
///
/// # Errors
/// Returns an error if the rack violates the tube height.
pub fn solve_shortest(
    params: &PuzzleParams,
    start: &Rack,
) -> Result<Option<Vec<Move>>, PuzzleError> {
    let mut search = ShortestSearch::new(params, start)?;
    loop {
        match search.resume(RESUME_CHUNK) {
            SearchStatus::Pending => continue,
            SearchStatus::Solved(moves) => return Ok(Some(moves)),
            SearchStatus::Unsolvable => return Ok(None),
        }
    }
}

/// Answers whether any solution exists from `start`.
///
/// Runs a depth-first search over an explicit stack (no recursion, so deep
/// puzzles cannot overflow the call stack) and returns on the first solved
/// rack it pops. A visited sorted signature prunes only the branch that
/// reached it; the search goes on until the stack is empty.
///
/// Intended to be cheap enough to run after every player move, to warn
/// before a dead end is reached.
///
/// # Errors
/// Returns an error if the rack violates the tube height.
pub fn solution_exists(params: &PuzzleParams, start: &Rack) -> Result<bool, PuzzleError> {
    start.validate(params)?;

    let mut stack: Vec<Rack> = vec![start.clone()];
    let mut visited: HashSet<Vec<Vec<Color>>> = HashSet::new();

    while let Some(rack) = stack.pop() {
        if rack.is_solved(params) {
            return Ok(true);
        }
        if !visited.insert(rack.sorted_signature()) {
            continue;
        }

        let tubes = rack.tube_count();
        for from in 0..tubes {
            for to in 0..tubes {
                if from == to {
                    continue;
                }
                if let Some(next) = rack.poured(from, to, params) {
                    stack.push(next);
                }
            }
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::rack_from_rows;

    fn params(height: usize) -> PuzzleParams {
        PuzzleParams::new(height).unwrap()
    }

    /// Replays a move list from `start`, applying the capped-run pour at
    /// each step, and returns the final rack. Panics on an invalid move so
    /// a corrupted path fails the test loudly.
    fn replay(start: &Rack, moves: &[Move], p: &PuzzleParams) -> Rack {
        let mut rack = start.clone();
        for (step, mv) in moves.iter().enumerate() {
            rack = rack
                .poured(mv.from, mv.to, p)
                .unwrap_or_else(|| panic!("move {} ({:?}) is invalid during replay", step, mv));
        }
        rack
    }

    /// Whether `rack` can be solved within `depth` moves, by plain
    /// exhaustive enumeration without any deduplication. Used to verify
    /// minimality of returned paths on small fixtures.
    fn solvable_within(rack: &Rack, depth: usize, p: &PuzzleParams) -> bool {
        if rack.is_solved(p) {
            return true;
        }
        if depth == 0 {
            return false;
        }
        let tubes = rack.tube_count();
        for from in 0..tubes {
            for to in 0..tubes {
                if from == to {
                    continue;
                }
                if let Some(next) = rack.poured(from, to, p) {
                    if solvable_within(&next, depth - 1, p) {
                        return true;
                    }
                }
            }
        }
        false
    }

    #[test]
    fn test_two_mixed_tubes_and_one_empty() {
        let p = params(2);
        let rack = rack_from_rows(&["RB", "BR", ""], &p).unwrap();

        let moves = solve_shortest(&p, &rack).unwrap().expect("solvable");
        assert!(
            !solvable_within(&rack, moves.len() - 1, &p),
            "a shorter solution exists than the one returned"
        );

        let end = replay(&rack, &moves, &p);
        assert!(end.is_solved(&p));
        let full = end
            .tubes()
            .iter()
            .filter(|t| t.fill_level() == 2 && t.is_uniform())
            .count();
        let empty = end.tubes().iter().filter(|t| t.is_empty()).count();
        assert_eq!((full, empty), (2, 1));

        assert!(solution_exists(&p, &rack).unwrap());
    }

    #[test]
    fn test_single_mixed_tube_is_unsolvable() {
        let p = params(2);
        let rack = rack_from_rows(&["RB"], &p).unwrap();
        assert_eq!(solve_shortest(&p, &rack).unwrap(), None);
        assert!(!solution_exists(&p, &rack).unwrap());
    }

    #[test]
    fn test_already_solved_rack_yields_empty_path() {
        let p = params(2);
        let rack = rack_from_rows(&["RR", ""], &p).unwrap();
        assert_eq!(solve_shortest(&p, &rack).unwrap(), Some(Vec::new()));
        assert!(solution_exists(&p, &rack).unwrap());
    }

    #[test]
    fn test_zero_tubes_is_vacuously_solved() {
        let p = params(4);
        let rack = Rack::new(Vec::new());
        assert_eq!(solve_shortest(&p, &rack).unwrap(), Some(Vec::new()));
        assert!(solution_exists(&p, &rack).unwrap());
    }

    #[test]
    fn test_enumeration_order_makes_path_deterministic() {
        let p = params(2);
        // Exactly one two-move solution reachable first in (from asc, to asc)
        // order: B onto B, then R onto R.
        let rack = rack_from_rows(&["RB", "B", "R"], &p).unwrap();
        let moves = solve_shortest(&p, &rack).unwrap().expect("solvable");
        assert_eq!(
            moves,
            vec![Move { from: 0, to: 1 }, Move { from: 0, to: 2 }]
        );

        // Same input, same output.
        assert_eq!(solve_shortest(&p, &rack).unwrap().unwrap(), moves);
    }

    #[test]
    fn test_multi_block_runs_pour_as_one_move() {
        let p = params(3);
        // Minimal play pours the two-G run in a single move; a one-unit
        // pour rule would need more steps.
        let rack = rack_from_rows(&["RGG", "GRR", ""], &p).unwrap();
        let moves = solve_shortest(&p, &rack).unwrap().expect("solvable");
        assert_eq!(moves.len(), 3);
        assert!(!solvable_within(&rack, 2, &p));

        let end = replay(&rack, &moves, &p);
        assert!(end.is_solved(&p));
        assert!(solution_exists(&p, &rack).unwrap());
    }

    #[test]
    fn test_searches_agree_on_solvability() {
        let p = params(2);
        let fixtures: Vec<Vec<&str>> = vec![
            vec!["RB", "BR", ""],
            vec!["RB", "BR"],
            vec!["RB"],
            vec!["RR", ""],
            vec!["RB", "B", "R"],
            vec!["BR", "RB", "B", "R"],
        ];
        for rows in fixtures {
            let rack = rack_from_rows(&rows, &p).unwrap();
            let shortest = solve_shortest(&p, &rack).unwrap();
            let exists = solution_exists(&p, &rack).unwrap();
            assert_eq!(
                shortest.is_some(),
                exists,
                "searches disagree on {:?}",
                rows
            );
        }
    }

    #[test]
    fn test_searches_agree_on_shuffled_rack() {
        let p = params(3);
        let rack = Rack::new_random_with_seed(&p, 3, 2, 7);
        let shortest = solve_shortest(&p, &rack).unwrap();
        let exists = solution_exists(&p, &rack).unwrap();
        assert_eq!(shortest.is_some(), exists);

        if let Some(moves) = shortest {
            assert!(replay(&rack, &moves, &p).is_solved(&p));
        }
    }

    #[test]
    fn test_resumed_search_matches_one_shot_result() {
        let p = params(2);
        let rack = rack_from_rows(&["RB", "BR", ""], &p).unwrap();

        let mut search = ShortestSearch::new(&p, &rack).unwrap();
        let mut yields = 0;
        let stepped = loop {
            match search.resume(1) {
                SearchStatus::Pending => yields += 1,
                SearchStatus::Solved(moves) => break Some(moves),
                SearchStatus::Unsolvable => break None,
            }
        };
        assert!(yields > 0, "a budget of one state must force suspension");

        let one_shot = solve_shortest(&p, &rack).unwrap();
        assert_eq!(stepped, one_shot);
    }

    #[test]
    fn test_resume_after_finish_repeats_terminal_status() {
        let p = params(2);

        let rack = rack_from_rows(&["RB", "B", "R"], &p).unwrap();
        let mut search = ShortestSearch::new(&p, &rack).unwrap();
        let first = loop {
            match search.resume(1) {
                SearchStatus::Pending => continue,
                terminal => break terminal,
            }
        };
        assert!(matches!(first, SearchStatus::Solved(_)));
        assert_eq!(search.resume(1), first);
        assert_eq!(search.resume(usize::MAX), first);

        let dead = rack_from_rows(&["RB"], &p).unwrap();
        let mut search = ShortestSearch::new(&p, &dead).unwrap();
        assert_eq!(search.resume(usize::MAX), SearchStatus::Unsolvable);
        assert_eq!(search.resume(1), SearchStatus::Unsolvable);
    }

    #[test]
    fn test_overflowing_rack_is_rejected_up_front() {
        let p = params(2);
        let rack = rack_from_rows(&["RRR", ""], &params(3)).unwrap();
        assert_eq!(
            solve_shortest(&p, &rack),
            Err(PuzzleError::TubeOverflow {
                tube: 0,
                len: 3,
                height: 2,
            })
        );
        assert!(solution_exists(&p, &rack).is_err());
    }
}
