use std::sync::Arc;

use crate::prelude::*;

/// The NegaMax search strategy.
///
/// Mathematically the same as MiniMax, but the side to move always maximizes
/// its own negated score, so there is a single best-so-far code path instead
/// of duplicated min and max branches. Values inside the recursion live on the
/// side-to-move's scale; everything written into a `Move` stays on player
/// one's scale.
///
/// Optionally backed by a transposition table, which is what makes it a
/// suitable engine for the MTD driver's repeated null-window probes.
pub struct NegaMax
{
    context: SearchContext,
    table:   Option<Arc<TranspositionTable>>,

    brute: BruteSearchOptions,
    best:  BestMovesSearchOptions,

    top_total: usize,
    top_done:  usize,
}

impl NegaMax
{
    pub fn new(context: SearchContext) -> NegaMax
    {
        NegaMax {
            context,
            table: None,
            brute: BruteSearchOptions::default(),
            best: BestMovesSearchOptions::default(),
            top_total: 0,
            top_done: 0,
        }
    }

    /// A NegaMax that remembers positions across probes.
    pub fn with_table(context: SearchContext, table: Arc<TranspositionTable>) -> NegaMax
    {
        NegaMax {
            table: Some(table),
            ..NegaMax::new(context)
        }
    }

    /// Recursive negamax over replies to `last_move`. `window` is on the
    /// replying side's scale.
    ///
    /// On return, `last_move.inherited_value` holds the backed-up value of the
    /// position after `last_move` on player one's scale. The returned move is
    /// the best reply explored, or nothing at a leaf or table hit.
    fn search_internal(
        &mut self,
        searchable: &mut dyn Searchable,
        last_move: &mut Move,
        depth: u32,
        window: SearchWindow,
        parent: NodeId,
    ) -> Option<Move>
    {
        let to_move = last_move.replier();

        if depth == 0 || searchable.is_terminal(last_move, false)
        {
            if self.brute.quiescence && depth == 0
            {
                return self.quiescent_search(searchable, last_move, 0, window, parent);
            }

            last_move.inherited_value = scores::clamped(last_move.value);
            return None;
        }

        let mut window = window;
        let key = searchable.position_hash();

        // Probe the memory, but never at the root: a warm table must not be
        // able to swallow the move we are supposed to report.
        if depth < self.brute.look_ahead
        {
            if let Some(table) = &self.table
            {
                if let Some(score) = table.check(key, depth, &mut window.alpha, &mut window.beta)
                {
                    last_move.inherited_value = to_move.sign() * score;
                    return None;
                }
            }
        }
        let original_alpha = window.alpha;

        let list = searchable.generate_moves(last_move, &self.context.weights, true);
        self.context.progress.add_considered(list.len() as u64);

        if list.is_empty()
        {
            // End of the line; the node keeps its static value.
            last_move.inherited_value = scores::clamped(last_move.value);
            return None;
        }

        let list = self.best.trim(list);
        if depth == self.brute.look_ahead
        {
            self.top_total = list.len();
            self.top_done = 0;
        }

        let mut best: Option<Move> = None;
        let mut best_value = -scores::INFINITY;

        let mut moves = list.into_iter().enumerate();
        while let Some((index, mut the_move)) = moves.next()
        {
            if self.context.control.checkpoint()
            {
                if best.is_none()
                {
                    // Aborted before exploring anything here; fall back to the
                    // first candidate valued by its static evaluation.
                    the_move.inherited_value = scores::clamped(the_move.value);
                    best = Some(the_move);
                }
                break;
            }

            let hash_before = searchable.position_hash();
            searchable.make_move(&the_move);
            let child = self.context.sink.add_node(parent, &the_move, window, index);

            self.search_internal(searchable, &mut the_move, depth - 1, window.negate_and_swap(), child);

            searchable.undo_move(&the_move);
            verify_restored(&*searchable, hash_before);

            // Fold the child's absolute value onto the side to move's scale.
            let value = to_move.sign() * the_move.inherited_value;

            // Strict comparison: the first move in generation order wins ties.
            if value > best_value
            {
                best_value = value;
                best = Some(the_move);
            }

            if depth == self.brute.look_ahead
            {
                self.top_done += 1;
                self.context.progress.update_top_level(self.top_done, self.top_total);
            }

            if self.brute.alpha_beta
            {
                window.alpha = window.alpha.max(best_value);
                if window.alpha >= window.beta
                {
                    let remaining: MoveList = moves.by_ref().map(|(_, mv)| mv).collect();
                    self.context.sink.add_pruned(parent, &remaining, index + 1, best_value, window, PruneSide::Beta);
                    break;
                }
            }
        }

        let mut best = best.expect("a non-empty move list always yields a best reply");
        best.selected = true;
        last_move.inherited_value = best.inherited_value;

        // Remember the result before unwinding, unless the search is being
        // torn down with partial values on the stack.
        if let Some(table) = &self.table
        {
            if !self.context.control.is_interrupted()
            {
                let bound = if best_value <= original_alpha
                {
                    TtBound::Upper
                }
                else if best_value >= window.beta
                {
                    TtBound::Lower
                }
                else
                {
                    TtBound::Exact
                };

                table.store(TtEntry {
                    key,
                    depth,
                    score: best_value,
                    bound,
                    age: 0,
                });
            }
        }

        Some(best)
    }

    /// Continues the search where the board position is not stable, expanding
    /// urgent replies only, while the position stays in jeopardy, up to a hard
    /// ply cap past the normal horizon. `window` is on the replying side's
    /// scale.
    fn quiescent_search(
        &mut self,
        searchable: &mut dyn Searchable,
        last_move: &mut Move,
        quiescent_depth: u32,
        window: SearchWindow,
        parent: NodeId,
    ) -> Option<Move>
    {
        last_move.inherited_value = scores::clamped(last_move.value);

        if quiescent_depth >= self.brute.max_quiescent_plies
        {
            return None;
        }
        if searchable.is_terminal(last_move, false)
        {
            return None;
        }

        let to_move = last_move.replier();
        let stand_pat = to_move.sign() * last_move.inherited_value;
        let mut window = window;

        if self.brute.alpha_beta
        {
            if stand_pat >= window.beta
            {
                return None;
            }
            window.alpha = window.alpha.max(stand_pat);
        }

        let perspective = last_move.player.is_one();
        if !searchable.in_jeopardy(last_move, &self.context.weights, perspective)
        {
            return None;
        }

        let list = searchable.generate_urgent_moves(last_move, &self.context.weights, perspective);
        if list.is_empty()
        {
            return None;
        }
        self.context.progress.add_considered(list.len() as u64);

        let mut best: Option<Move> = None;
        let mut best_value = -scores::INFINITY;

        let mut moves = list.into_iter().enumerate();
        while let Some((index, mut the_move)) = moves.next()
        {
            if self.context.control.checkpoint()
            {
                break;
            }

            let hash_before = searchable.position_hash();
            searchable.make_move(&the_move);
            let child = self.context.sink.add_node(parent, &the_move, window, index);

            self.quiescent_search(searchable, &mut the_move, quiescent_depth + 1, window.negate_and_swap(), child);

            searchable.undo_move(&the_move);
            verify_restored(&*searchable, hash_before);

            let value = to_move.sign() * the_move.inherited_value;
            if value > best_value
            {
                best_value = value;
                best = Some(the_move);
            }

            if self.brute.alpha_beta
            {
                window.alpha = window.alpha.max(best_value);
                if window.alpha >= window.beta
                {
                    let remaining: MoveList = moves.by_ref().map(|(_, mv)| mv).collect();
                    self.context.sink.add_pruned(parent, &remaining, index + 1, best_value, window, PruneSide::Beta);
                    break;
                }
            }
        }

        // The mover may always decline the exchange and stand pat.
        if best.is_some() && best_value > stand_pat
        {
            let mut best = best.unwrap();
            best.selected = true;
            last_move.inherited_value = best.inherited_value;
            return Some(best);
        }
        None
    }
}

impl SearchStrategy for NegaMax
{
    fn search(&mut self, searchable: &mut dyn Searchable, last_move: Move, window: SearchWindow) -> Option<Move>
    {
        let options = *searchable.options();
        self.brute = options.brute;
        self.best = options.best_moves;
        self.top_total = 0;
        self.top_done = 0;

        if let Some(table) = &self.table
        {
            table.increment();
        }

        let root_id = self.context.sink.reset(&last_move);
        let mut root = last_move;
        let selected = self.search_internal(searchable, &mut root, self.brute.look_ahead, window, root_id);

        if let Some(best) = selected
        {
            return Some(best);
        }

        // At zero lookahead the answer is the starting move itself, carrying
        // its raw value; otherwise a move-less search means the game is over.
        if self.brute.look_ahead == 0 && !searchable.is_terminal(&root, false)
        {
            return Some(root);
        }
        None
    }

    fn context(&self) -> &SearchContext
    {
        &self.context
    }
}
