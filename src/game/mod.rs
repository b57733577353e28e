use regex::Regex;

use crate::prelude::*;

pub mod location;
pub mod moves;
pub mod player;

pub use location::*;
pub use moves::*;
pub use player::*;

/// A capability trait implemented by each game: everything a search strategy
/// needs to explore positions without knowing any rules.
///
/// An implementor owns exactly one mutable board and one move-history stack for
/// the duration of a search. Strategies borrow that ownership transiently
/// through `make_move`/`undo_move`, which must nest in strict LIFO order: after
/// any balanced make/undo sequence the board state and `position_hash` must be
/// bit-identical to before it. Calling `undo_move` on an empty history, or on a
/// move that is not the most recent, is a programming error and must abort.
pub trait Searchable: Send
{
    /// The search configuration this game wants applied to itself.
    fn options(&self) -> &SearchOptions;

    /// Generates candidate replies to `last_move`, best-first.
    ///
    /// Each generated move carries its static evaluation in `value`, computed
    /// on player one's scale when `player_one_perspective` is set.
    fn generate_moves(&self, last_move: &Move, weights: &Weights, player_one_perspective: bool) -> MoveList;

    /// Generates only the critically urgent replies (recaptures and the like),
    /// most-to-least urgent. Used exclusively by quiescent search; generating
    /// too many risks an explosion in the search tree.
    fn generate_urgent_moves(&self, last_move: &Move, weights: &Weights, player_one_perspective: bool) -> MoveList;

    /// Applies a move to the board and pushes it on the history stack.
    fn make_move(&mut self, mv: &Move);

    /// Takes back the most recent move. Fatal if `mv` is not the most recent.
    fn undo_move(&mut self, mv: &Move);

    /// Statically evaluates the board after `last_move` on player one's scale.
    /// Must stay within `±WINNING_VALUE`.
    fn worth(&self, last_move: &Move, weights: &Weights) -> i32;

    /// Whether the game is over after `last_move`. When `record_win` is set the
    /// game may record the result; lookahead probes pass false.
    fn is_terminal(&mut self, last_move: &Move, record_win: bool) -> bool;

    /// Whether `last_move` leaves material critically exposed, so quiescent
    /// search should keep extending past the horizon.
    fn in_jeopardy(&self, last_move: &Move, weights: &Weights, player_one_perspective: bool) -> bool;

    /// A hash of the current position, including the side to move.
    fn position_hash(&self) -> u64;
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Coefficients for a game's evaluation polynomial. Opaque to the search core;
/// passed through unmodified to `worth` and move generation.
pub struct Weights(pub Vec<f64>);

impl Weights
{
    /// Gets the ith coefficient, defaulting to 1 where the vector is short.
    pub fn get(&self, i: usize) -> f64
    {
        self.0.get(i).copied().unwrap_or(1.0)
    }

    pub fn len(&self) -> usize
    {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.0.is_empty()
    }
}

impl FromStr for Weights
{
    type Err = Error;

    /// Parses a colon-separated coefficient list, e.g. `1:0.5:8`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err>
    {
        let re = Regex::new(r"^-?[0-9]+(\.[0-9]+)?(:-?[0-9]+(\.[0-9]+)?)*$").unwrap();
        if !re.is_match(s)
        {
            return Err(Error::for_parse::<Weights>(s.into()));
        }

        let coefficients = s
            .split(':')
            .map(|part| part.parse::<f64>().map_err(|_| Error::for_parse::<Weights>(part.into())))
            .collect::<std::result::Result<Vec<f64>, Error>>()?;

        Ok(Weights(coefficients))
    }
}
