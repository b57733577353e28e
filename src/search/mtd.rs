use std::sync::Arc;

use crate::prelude::*;

/// Memory-enhanced Test Driver search, after Plaat's MTD(f).
///
/// Starting from a first guess, repeatedly probes a memory-backed NegaMax
/// with a one-point window and narrows an upper/lower bound pair until they
/// meet; the meeting point is the true minimax value. The wrapped strategy
/// owns the memory that keeps the probes from re-deriving the same subtrees;
/// the driver itself is stateless beyond its loop bounds.
pub struct Mtd
{
    inner:       NegaMax,
    first_guess: i32,
}

impl Mtd
{
    pub fn new(context: SearchContext) -> Mtd
    {
        let table = Arc::new(TranspositionTable::new(TranspositionTable::DEFAULT_BYTES));

        Mtd {
            inner:       NegaMax::with_table(context, table),
            first_guess: 0,
        }
    }

    /// Seeds the first probe, typically with the previous search's value.
    pub fn with_first_guess(mut self, guess: i32) -> Mtd
    {
        self.first_guess = guess;
        self
    }
}

impl SearchStrategy for Mtd
{
    fn search(&mut self, searchable: &mut dyn Searchable, last_move: Move, _window: SearchWindow) -> Option<Move>
    {
        let to_move = last_move.replier();

        let mut g = self.first_guess;
        let mut lower = -scores::INFINITY;
        let mut upper = scores::INFINITY;
        let mut selected: Option<Move>;

        loop
        {
            let beta = if g == lower { g + 1 } else { g };
            let window = SearchWindow::new(beta - 1, beta);

            selected = self.inner.search(searchable, last_move.clone(), window);

            let Some(mv) = &selected
            else
            {
                // No reply exists at all; the game is already over.
                return None;
            };

            g = to_move.sign() * mv.inherited_value;
            if g < beta
            {
                upper = g;
            }
            else
            {
                lower = g;
            }

            log::debug!("mtd probe: beta={} g={} bounds=[{},{}]", beta, g, lower, upper);

            if lower >= upper || self.context().control.is_interrupted()
            {
                break;
            }
        }

        selected
    }

    fn context(&self) -> &SearchContext
    {
        self.inner.context()
    }
}
