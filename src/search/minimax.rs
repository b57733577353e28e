use crate::prelude::*;

/// The MiniMax search strategy: the simplest algorithm here, and the one the
/// other variants are compared against.
///
/// Player one maximizes and player two minimizes on a shared absolute scale.
/// Alpha-beta pruning and quiescence extension are both optional, and pruning
/// must only ever cut branches that cannot change the chosen move.
pub struct MiniMax
{
    context: SearchContext,

    brute: BruteSearchOptions,
    best:  BestMovesSearchOptions,

    top_total: usize,
    top_done:  usize,
}

impl MiniMax
{
    pub fn new(context: SearchContext) -> MiniMax
    {
        MiniMax {
            context,
            brute: BruteSearchOptions::default(),
            best: BestMovesSearchOptions::default(),
            top_total: 0,
            top_done: 0,
        }
    }

    /// Recursive minimax over replies to `last_move`.
    ///
    /// On return, `last_move.inherited_value` holds the backed-up value of the
    /// position after `last_move` on player one's scale. The returned move is
    /// the best reply explored, or nothing at a leaf.
    fn search_internal(
        &mut self,
        searchable: &mut dyn Searchable,
        last_move: &mut Move,
        depth: u32,
        window: SearchWindow,
        parent: NodeId,
    ) -> Option<Move>
    {
        if depth == 0 || searchable.is_terminal(last_move, false)
        {
            if self.brute.quiescence && depth == 0
            {
                return self.quiescent_search(searchable, last_move, 0, window, parent);
            }

            last_move.inherited_value = scores::clamped(last_move.value);
            return None;
        }

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

        // The replies belong to the opponent of whoever made `last_move`.
        let maximizing = last_move.replier().is_one();

        let mut window = window;
        let mut best: Option<Move> = None;
        let mut best_value = if maximizing { -scores::INFINITY } else { scores::INFINITY };

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

            self.search_internal(searchable, &mut the_move, depth - 1, window, child);

            searchable.undo_move(&the_move);
            verify_restored(&*searchable, hash_before);

            let value = the_move.inherited_value;

            // Strict comparisons: the first move in generation order wins ties.
            let improved = if maximizing { value > best_value } else { value < best_value };
            if improved
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
                if maximizing
                {
                    window.alpha = window.alpha.max(best_value);
                }
                else
                {
                    window.beta = window.beta.min(best_value);
                }

                if window.alpha >= window.beta
                {
                    let side = if maximizing { PruneSide::Beta } else { PruneSide::Alpha };
                    let remaining: MoveList = moves.by_ref().map(|(_, mv)| mv).collect();
                    self.context.sink.add_pruned(parent, &remaining, index + 1, best_value, window, side);
                    break;
                }
            }
        }

        let mut best = best.expect("a non-empty move list always yields a best reply");
        best.selected = true;
        last_move.inherited_value = best.inherited_value;
        Some(best)
    }

    /// Continues the search where the board position is not stable, for
    /// example in the middle of a piece exchange. Expands only the urgent
    /// replies, and only while the position stays in jeopardy, up to a hard
    /// ply cap past the normal horizon.
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

        let maximizing = last_move.replier().is_one();
        let stand_pat = last_move.inherited_value;
        let mut window = window;

        if self.brute.alpha_beta
        {
            if maximizing
            {
                if stand_pat >= window.beta
                {
                    return None;
                }
                window.alpha = window.alpha.max(stand_pat);
            }
            else
            {
                if stand_pat <= window.alpha
                {
                    return None;
                }
                window.beta = window.beta.min(stand_pat);
            }
        }

        if !searchable.in_jeopardy(last_move, &self.context.weights, true)
        {
            return None;
        }

        // Urgent replies only, pre-sorted most-to-least urgent. Generating too
        // many risks an explosion in the search tree.
        let list = searchable.generate_urgent_moves(last_move, &self.context.weights, true);
        if list.is_empty()
        {
            return None;
        }
        self.context.progress.add_considered(list.len() as u64);

        let mut best: Option<Move> = None;
        let mut best_value = if maximizing { -scores::INFINITY } else { scores::INFINITY };

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

            self.quiescent_search(searchable, &mut the_move, quiescent_depth + 1, window, child);

            searchable.undo_move(&the_move);
            verify_restored(&*searchable, hash_before);

            let value = the_move.inherited_value;
            let improved = if maximizing { value > best_value } else { value < best_value };
            if improved
            {
                best_value = value;
                best = Some(the_move);
            }

            if self.brute.alpha_beta
            {
                if maximizing
                {
                    window.alpha = window.alpha.max(best_value);
                }
                else
                {
                    window.beta = window.beta.min(best_value);
                }

                if window.alpha >= window.beta
                {
                    let side = if maximizing { PruneSide::Beta } else { PruneSide::Alpha };
                    let remaining: MoveList = moves.by_ref().map(|(_, mv)| mv).collect();
                    self.context.sink.add_pruned(parent, &remaining, index + 1, best_value, window, side);
                    break;
                }
            }
        }

        // The mover may always decline the exchange and stand pat.
        let extends = match &best
        {
            | Some(_) if maximizing => best_value > stand_pat,
            | Some(_) => best_value < stand_pat,
            | None => false,
        };

        if extends
        {
            let mut best = best.unwrap();
            best.selected = true;
            last_move.inherited_value = best.inherited_value;
            return Some(best);
        }
        None
    }
}

impl SearchStrategy for MiniMax
{
    fn search(&mut self, searchable: &mut dyn Searchable, last_move: Move, window: SearchWindow) -> Option<Move>
    {
        let options = *searchable.options();
        self.brute = options.brute;
        self.best = options.best_moves;
        self.top_total = 0;
        self.top_done = 0;

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
