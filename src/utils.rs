use crate::engine::{Color, PuzzleParams, Rack, Tube};
use crate::error::PuzzleError;

/// Parses an array of string slices into a [`Rack`].
///
/// Each string slice describes one tube, bottom to top: the first character
/// is the bottommost block. An empty string is an empty tube. Valid block
/// characters are the palette letters `A`-`Z` (either case); see
/// [`Color::from_char`]. A tube may hold fewer blocks than the tube height,
/// never more.
///
/// # Arguments
/// * `rows`: One string slice per tube, in tube-index order.
/// * `params`: Puzzle parameters the parsed rack must respect.
///
/// # Returns
/// * `Ok(Rack)` if parsing succeeds.
/// * `Err(PuzzleError::RowTooLong)` if a row exceeds the tube height.
/// * `Err(PuzzleError::UnrecognizedColor)` for any non-letter character.
///
/// # Examples
/// ```
/// use watersort_solver::engine::PuzzleParams;
/// use watersort_solver::utils::rack_from_rows;
///
/// let params = PuzzleParams::new(2).unwrap();
/// let rack = rack_from_rows(&["RB", "BR", ""], &params).unwrap();
/// assert_eq!(rack.tube_count(), 3);
/// assert_eq!(rack.tubes()[0].fill_level(), 2);
/// assert!(rack.tubes()[2].is_empty());
///
/// assert!(rack_from_rows(&["R.B"], &params).is_err());
/// assert!(rack_from_rows(&["RRR"], &params).is_err());
/// ```
pub fn rack_from_rows(rows: &[&str], params: &PuzzleParams) -> Result<Rack, PuzzleError> {
    let mut tubes = Vec::with_capacity(rows.len());

    for (row, row_str) in rows.iter().enumerate() {
        let len = row_str.chars().count();
        if len > params.tube_height() {
            return Err(PuzzleError::RowTooLong {
                row,
                len,
                height: params.tube_height(),
            });
        }

        let mut blocks = Vec::with_capacity(len);
        for ch in row_str.chars() {
            match Color::from_char(ch) {
                Some(color) => blocks.push(color),
                None => return Err(PuzzleError::UnrecognizedColor { ch, row }),
            }
        }
        tubes.push(Tube::from_blocks(blocks));
    }

    Ok(Rack::new(tubes))
}
