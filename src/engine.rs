//! Core game engine for the water-sort puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Color`: A palette entry occupying one slot of a tube.
//! - `Tube`: A bounded stack of colored blocks (bottom to top).
//! - `Rack`: The full ordered set of tubes at one instant, with move
//!   validation, the pour transition, and the solved test.
//! - `PuzzleParams`: Per-puzzle constants, currently the tube height.
//! - `Game`: Manages an interactive session, including move history (for undo)
//!   and processing player moves.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

use crate::error::PuzzleError;

/// xterm-256 background colors used for terminal display, indexed by palette
/// position. Chosen to keep neighboring palette entries visually distinct.
const ANSI_PALETTE: [u8; 26] = [
    196, 21, 226, 28, 129, 208, 51, 201, 46, 218, 94, 18, 80, 100, 88, 123, 30, 220, 250, 209,
    177, 121, 230, 210, 215, 54,
];

/// One entry of the puzzle's color palette.
///
/// Colors are opaque identifiers; the engine only ever compares them for
/// equality. For text fixtures and terminal display each color maps to a
/// letter, `A` for palette index 0 through `Z` for index 25.
///
/// # Examples
/// ```
/// use watersort_solver::engine::Color;
/// assert_eq!(Color::from_char('R'), Some(Color::new(17)));
/// assert_eq!(Color::new(17).to_char(), 'R');
/// assert_eq!(Color::from_char('.'), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(u8);

impl Color {
    /// Number of distinct colors the letter mapping supports.
    pub const PALETTE_SIZE: usize = 26;

    /// Creates the color at the given palette position.
    ///
    /// # Panics
    /// Panics if `index` is `PALETTE_SIZE` or greater.
    pub fn new(index: u8) -> Self {
        assert!(
            (index as usize) < Self::PALETTE_SIZE,
            "palette index {} out of range",
            index
        );
        Color(index)
    }

    /// Parses a color from its letter representation (`A`-`Z`, either case).
    ///
    /// Returns `None` for any non-letter character.
    pub fn from_char(ch: char) -> Option<Self> {
        if ch.is_ascii_alphabetic() {
            Some(Color(ch.to_ascii_uppercase() as u8 - b'A'))
        } else {
            None
        }
    }

    /// Converts the color to its letter representation.
    pub fn to_char(&self) -> char {
        (b'A' + self.0) as char
    }

    /// Returns the ANSI escape sequence that paints this color as a cell
    /// background in a terminal.
    fn ansi_bg(&self) -> String {
        format!("\x1b[48;5;{}m", ANSI_PALETTE[self.0 as usize])
    }
}

/// Per-puzzle constants shared by every operation on a rack.
///
/// Constructed through [`PuzzleParams::new`], which rejects a zero tube
/// height, so holding a `PuzzleParams` guarantees a positive capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzleParams {
    tube_height: usize,
}

impl PuzzleParams {
    /// Creates puzzle parameters with the given tube capacity.
    ///
    /// # Errors
    /// Returns [`PuzzleError::ZeroTubeHeight`] if `tube_height` is zero.
    pub fn new(tube_height: usize) -> Result<Self, PuzzleError> {
        if tube_height == 0 {
            return Err(PuzzleError::ZeroTubeHeight);
        }
        Ok(PuzzleParams { tube_height })
    }

    /// The capacity of every tube in the puzzle.
    pub fn tube_height(&self) -> usize {
        self.tube_height
    }
}

/// A single tube: an ordered stack of colored blocks, bottom to top.
///
/// The tube itself does not know its capacity; that lives in
/// [`PuzzleParams`] and is enforced by the rack-level operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tube {
    blocks: Vec<Color>,
}

impl Tube {
    /// Creates an empty tube.
    pub fn new() -> Self {
        Tube { blocks: Vec::new() }
    }

    /// Creates a tube holding the given blocks, bottom to top.
    pub fn from_blocks(blocks: Vec<Color>) -> Self {
        Tube { blocks }
    }

    /// The blocks in this tube, bottom to top.
    pub fn blocks(&self) -> &[Color] {
        &self.blocks
    }

    /// Number of blocks currently in the tube.
    pub fn fill_level(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the tube holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The topmost color, or `None` for an empty tube.
    pub fn top(&self) -> Option<Color> {
        self.blocks.last().copied()
    }

    /// Length of the maximal contiguous run of the top color, counted from
    /// the top downward. Zero for an empty tube.
    ///
    /// Same-colored blocks deeper in the tube but separated by another color
    /// do not count: a tube `[G, R, G, G]` (bottom to top) has a run of 2.
    pub fn top_run_len(&self) -> usize {
        match self.top() {
            None => 0,
            Some(top) => self
                .blocks
                .iter()
                .rev()
                .take_while(|&&color| color == top)
                .count(),
        }
    }

    /// Whether all blocks in the tube share one color. True for an empty tube.
    pub fn is_uniform(&self) -> bool {
        match self.blocks.first() {
            None => true,
            Some(first) => self.blocks.iter().all(|color| color == first),
        }
    }
}

/// A move request: pour from one tube index onto another.
///
/// The transferred amount is not part of the move; it is recomputed at
/// application time via [`Rack::pour_amount`], so a stored move list stays
/// valid however the replay is animated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

/// The full puzzle state at one instant: an ordered sequence of tubes.
///
/// Tube order is significant for move addressing (a [`Move`] names tubes by
/// index), so `Rack` equality and hashing are order-sensitive. The derived
/// `Hash`/`Eq` make a `Rack` directly usable as a structural deduplication
/// key in search, with no string serialization involved.
///
/// All transitions are value-semantic: [`Rack::poured`] returns a new rack
/// and never mutates the receiver, so a rack observed by one search branch
/// can never be corrupted by another.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rack {
    tubes: Vec<Tube>,
}

impl Rack {
    /// Creates a rack from the given tubes.
    pub fn new(tubes: Vec<Tube>) -> Self {
        Rack { tubes }
    }

    /// Creates a rack of `color_count` full tubes with shuffled contents,
    /// followed by `empty_tubes` empty tubes.
    ///
    /// The pool holds exactly `tube_height` blocks of each of the first
    /// `color_count` palette colors, shuffled with a generator seeded by
    /// `seed`, so the same seed always produces the same rack.
    ///
    /// # Panics
    /// Panics if `color_count` exceeds [`Color::PALETTE_SIZE`].
    pub fn new_random_with_seed(
        params: &PuzzleParams,
        color_count: usize,
        empty_tubes: usize,
        seed: u64,
    ) -> Self {
        assert!(
            color_count <= Color::PALETTE_SIZE,
            "color count {} exceeds palette size",
            color_count
        );
        let mut pool: Vec<Color> = (0..color_count)
            .flat_map(|i| std::iter::repeat(Color(i as u8)).take(params.tube_height()))
            .collect();
        let mut rng = SmallRng::seed_from_u64(seed);
        pool.shuffle(&mut rng);

        let mut tubes: Vec<Tube> = pool
            .chunks(params.tube_height())
            .map(|chunk| Tube::from_blocks(chunk.to_vec()))
            .collect();
        tubes.extend((0..empty_tubes).map(|_| Tube::new()));
        Rack { tubes }
    }

    /// The tubes of this rack, in index order.
    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    /// Number of tubes in the rack, including empty ones.
    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    /// Total number of blocks across all tubes. Conserved by every pour.
    pub fn block_count(&self) -> usize {
        self.tubes.iter().map(Tube::fill_level).sum()
    }

    /// Checks the rack against the puzzle parameters.
    ///
    /// # Errors
    /// Returns [`PuzzleError::TubeOverflow`] for the first tube whose fill
    /// level exceeds the tube height.
    pub fn validate(&self, params: &PuzzleParams) -> Result<(), PuzzleError> {
        for (index, tube) in self.tubes.iter().enumerate() {
            if tube.fill_level() > params.tube_height() {
                return Err(PuzzleError::TubeOverflow {
                    tube: index,
                    len: tube.fill_level(),
                    height: params.tube_height(),
                });
            }
        }
        Ok(())
    }

    /// Whether the rack is solved: every tube is either empty or full and
    /// monochrome. A rack with zero tubes is vacuously solved.
    ///
    /// # Examples
    /// ```
    /// use watersort_solver::engine::PuzzleParams;
    /// use watersort_solver::utils::rack_from_rows;
    ///
    /// let params = PuzzleParams::new(2).unwrap();
    /// let solved = rack_from_rows(&["RR", ""], &params).unwrap();
    /// let mixed = rack_from_rows(&["RB", ""], &params).unwrap();
    /// assert!(solved.is_solved(&params));
    /// assert!(!mixed.is_solved(&params));
    /// ```
    pub fn is_solved(&self, params: &PuzzleParams) -> bool {
        self.tubes.iter().all(|tube| {
            tube.is_empty() || (tube.fill_level() == params.tube_height() && tube.is_uniform())
        })
    }

    /// Whether pouring from tube `from` onto tube `to` is legal.
    ///
    /// A pour is rejected when the indices coincide or fall out of range,
    /// the source is empty, the destination is full, or the destination is
    /// non-empty with a top color different from the source's top color.
    /// Destination free capacity beyond "not full" is not a validity
    /// concern; a run longer than the free space simply pours partially.
    pub fn is_valid_move(&self, from: usize, to: usize, params: &PuzzleParams) -> bool {
        if from == to || from >= self.tubes.len() || to >= self.tubes.len() {
            return false;
        }
        let source = &self.tubes[from];
        let dest = &self.tubes[to];
        if source.is_empty() || dest.fill_level() >= params.tube_height() {
            return false;
        }
        dest.is_empty() || dest.top() == source.top()
    }

    /// Number of blocks a pour from `from` onto `to` would transfer:
    /// the source's top run capped by the destination's free capacity.
    /// Zero if the move is invalid.
    pub fn pour_amount(&self, from: usize, to: usize, params: &PuzzleParams) -> usize {
        if !self.is_valid_move(from, to, params) {
            return 0;
        }
        let run = self.tubes[from].top_run_len();
        let free = params.tube_height() - self.tubes[to].fill_level();
        run.min(free)
    }

    /// Applies a pour as a value transition, returning the resulting rack.
    ///
    /// The receiver is never mutated. The full top run is transferred,
    /// capped by the destination's free capacity; whatever does not fit
    /// stays on the source.
    ///
    /// Returns `None` if the move is invalid.
    pub fn poured(&self, from: usize, to: usize, params: &PuzzleParams) -> Option<Rack> {
        let amount = self.pour_amount(from, to, params);
        if amount == 0 {
            return None;
        }
        let mut next = self.clone();
        for _ in 0..amount {
            let block = next.tubes[from]
                .blocks
                .pop()
                .expect("pour amount never exceeds the source fill level");
            next.tubes[to].blocks.push(block);
        }
        Some(next)
    }

    /// Like [`Rack::poured`], but fails fast on malformed tube indices
    /// instead of treating them as one more invalid move.
    ///
    /// The searches never generate out-of-range indices, so they use
    /// [`Rack::poured`] directly; this entry point is for moves that arrive
    /// from outside the engine, such as player input.
    ///
    /// # Errors
    /// Returns [`PuzzleError::TubeIndexOutOfRange`] if `from` or `to` does
    /// not name a tube of this rack.
    pub fn try_poured(
        &self,
        from: usize,
        to: usize,
        params: &PuzzleParams,
    ) -> Result<Option<Rack>, PuzzleError> {
        for index in [from, to] {
            if index >= self.tubes.len() {
                return Err(PuzzleError::TubeIndexOutOfRange {
                    index,
                    tubes: self.tubes.len(),
                });
            }
        }
        Ok(self.poured(from, to, params))
    }

    /// A tube-order-independent signature of the rack: the multiset of
    /// per-tube color sequences, as a sorted list.
    ///
    /// Two racks that differ only by a permutation of their tubes (most
    /// commonly, several simultaneously empty tubes) share one signature.
    /// This makes the signature suitable for deduplication in existence-only
    /// search, and unsuitable wherever a move path must stay replayable,
    /// since it forgets which physical tube held which content.
    pub fn sorted_signature(&self) -> Vec<Vec<Color>> {
        let mut signature: Vec<Vec<Color>> =
            self.tubes.iter().map(|tube| tube.blocks.clone()).collect();
        signature.sort_unstable();
        signature
    }

    /// Generates a terminal rendering of the rack with ANSI-colored blocks.
    ///
    /// Tubes are drawn as columns with their indices above, slots from the
    /// tube's top down to its bottom. Empty slots show as dots.
    pub fn to_display_string(&self, params: &PuzzleParams) -> String {
        let mut output = String::new();

        for index in 0..self.tubes.len() {
            output.push_str(&format!("{:<3}", index));
        }
        output.push('\n');

        for slot in (0..params.tube_height()).rev() {
            for tube in &self.tubes {
                match tube.blocks.get(slot) {
                    Some(color) => {
                        output.push_str(&format!("{}{} \x1b[m ", color.ansi_bg(), color.to_char()));
                    }
                    None => output.push_str(".  "),
                }
            }
            if slot > 0 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Rack {
    /// Formats the rack as one letter string per tube, bottom to top, with
    /// `-` standing for an empty tube. Intended for logs and test output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .tubes
            .iter()
            .map(|tube| {
                if tube.is_empty() {
                    "-".to_string()
                } else {
                    tube.blocks.iter().map(Color::to_char).collect()
                }
            })
            .collect();
        write!(f, "[{}]", rows.join(" "))
    }
}

/// Manages an interactive water-sort session.
///
/// Wraps a [`Rack`] together with its [`PuzzleParams`] and a history of
/// rack snapshots, so every applied pour can be undone. The solver never
/// uses this type; it works on bare racks.
#[derive(Clone, Debug)]
pub struct Game {
    params: PuzzleParams,
    rack: Rack,
    history: Vec<Rack>,
}

impl Game {
    /// Creates a game over the given rack.
    ///
    /// # Errors
    /// Returns an error if the rack violates the tube height.
    pub fn new(params: PuzzleParams, rack: Rack) -> Result<Self, PuzzleError> {
        rack.validate(&params)?;
        Ok(Game {
            params,
            rack,
            history: Vec::new(),
        })
    }

    /// Creates a game over a freshly shuffled rack. See
    /// [`Rack::new_random_with_seed`].
    pub fn new_random(
        params: PuzzleParams,
        color_count: usize,
        empty_tubes: usize,
        seed: u64,
    ) -> Self {
        let rack = Rack::new_random_with_seed(&params, color_count, empty_tubes, seed);
        Game {
            params,
            rack,
            history: Vec::new(),
        }
    }

    /// The puzzle parameters of this session.
    pub fn params(&self) -> &PuzzleParams {
        &self.params
    }

    /// The current rack.
    pub fn rack(&self) -> &Rack {
        &self.rack
    }

    /// Number of pours applied and not undone.
    pub fn moves_made(&self) -> usize {
        self.history.len()
    }

    /// Attempts to pour from tube `from` onto tube `to`.
    ///
    /// On success the previous rack is pushed onto the undo history and the
    /// number of transferred blocks is returned. A legal-but-rejected move
    /// (wrong top color, full destination, and so on) yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`PuzzleError::TubeIndexOutOfRange`] for indices that name
    /// no tube, so malformed player input fails fast instead of being
    /// conflated with an invalid move.
    pub fn pour(&mut self, from: usize, to: usize) -> Result<Option<usize>, PuzzleError> {
        let amount = self.rack.pour_amount(from, to, &self.params);
        match self.rack.try_poured(from, to, &self.params)? {
            Some(next) => {
                self.history.push(std::mem::replace(&mut self.rack, next));
                Ok(Some(amount))
            }
            None => Ok(None),
        }
    }

    /// Undoes the last pour, restoring the previous rack.
    ///
    /// Returns `false` if no pour has been made yet.
    pub fn undo_last_move(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.rack = previous;
                true
            }
            None => false,
        }
    }

    /// Whether the current rack is solved.
    pub fn is_solved(&self) -> bool {
        self.rack.is_solved(&self.params)
    }
}
