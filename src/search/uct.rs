use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::prelude::*;

/// Upper Confidence bounds applied to Trees: a Monte-Carlo strategy,
/// fundamentally different from minimax and its derivatives.
///
/// Each top-level call grows a fresh statistics tree from the root position by
/// running playouts: descend through the most promising children by the UCB1
/// rule, roll the first unvisited node out to (or near) the end of the game,
/// and propagate who won back up the path. The root's most-visited child is
/// the answer. Nondeterministic by design when the rollout policy is random.
pub struct Uct
{
    context:     SearchContext,
    monte_carlo: MonteCarloSearchOptions,
}

/// One node of the statistics tree. Children are created lazily on a node's
/// second visit; `children == None` means not expanded yet, while an empty
/// vector means the position has no replies.
struct UctNode
{
    mv:           Move,
    num_visits:   u32,
    wins_for_one: f64,
    children:     Option<Vec<UctNode>>,
}

impl UctNode
{
    fn new(mv: Move) -> UctNode
    {
        UctNode {
            mv,
            num_visits: 0,
            wins_for_one: 0.0,
            children: None,
        }
    }

    /// UCB1 priority of this node from its mover's point of view. Never-visited
    /// children rank above everything and must be tried first.
    fn uct_value(&self, exploration: f64, parent_visits: u32) -> f64
    {
        if self.num_visits == 0
        {
            return f64::INFINITY;
        }

        let rate_for_one = self.wins_for_one / self.num_visits as f64;
        let win_rate = if self.mv.player.is_one() { rate_for_one } else { 1.0 - rate_for_one };

        let spread = ((parent_visits.max(1) as f64).ln() / self.num_visits as f64).sqrt();
        win_rate + exploration * spread
    }
}

impl Uct
{
    pub fn new(context: SearchContext) -> Uct
    {
        Uct {
            context,
            monte_carlo: MonteCarloSearchOptions::default(),
        }
    }

    /// Runs one playout below `node` and reports whether player one won it.
    /// The board holds the position after `node.mv` on entry and on exit.
    fn play_simulation(&mut self, searchable: &mut dyn Searchable, node: &mut UctNode, tree_id: NodeId) -> bool
    {
        let player_one_wins;

        if node.num_visits == 0
        {
            player_one_wins = self.play_rollout(searchable, &node.mv);
        }
        else
        {
            if node.children.is_none()
            {
                let list = searchable.generate_moves(&node.mv, &self.context.weights, true);
                self.context.progress.add_considered(list.len() as u64);
                node.children = Some(list.into_iter().map(UctNode::new).collect());
            }

            let exploration = self.monte_carlo.exploration_constant;
            let parent_visits = node.num_visits;
            let children = node.children.as_mut().unwrap();

            match Self::select_child(children, exploration, parent_visits)
            {
                | Some(index) =>
                {
                    let child = &mut children[index];

                    let hash_before = searchable.position_hash();
                    searchable.make_move(&child.mv);
                    let child_id = self.context.sink.add_node(tree_id, &child.mv, SearchWindow::full(), index);

                    player_one_wins = self.play_simulation(searchable, child, child_id);

                    searchable.undo_move(&child.mv);
                    verify_restored(&*searchable, hash_before);
                }
                | None =>
                {
                    // No legal continuation: judge the position as it stands.
                    player_one_wins = node.mv.value > 0;
                }
            }
        }

        node.num_visits += 1;
        if player_one_wins
        {
            node.wins_for_one += 1.0;
        }
        player_one_wins
    }

    /// The child maximizing the UCB1 rule; earliest generated wins ties.
    fn select_child(children: &[UctNode], exploration: f64, parent_visits: u32) -> Option<usize>
    {
        let mut best: Option<(usize, f64)> = None;

        for (index, child) in children.iter().enumerate()
        {
            let value = child.uct_value(exploration, parent_visits);
            let better = match best
            {
                | None => true,
                | Some((_, best_value)) => value > best_value,
            };

            if better
            {
                best = Some((index, value));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Plays a semi-random game from the position after `mv`, undoing every
    /// move it applied, and reports whether player one ended up on top. Capped
    /// at `max_simulation_plies`; an unfinished playout is judged by the last
    /// static evaluation.
    fn play_rollout(&mut self, searchable: &mut dyn Searchable, mv: &Move) -> bool
    {
        let mut rng = thread_rng();
        let mut applied: ArrayVec<Move, MAXIMUM_PLY> = ArrayVec::new();
        let hash_before = searchable.position_hash();

        let plies = self.monte_carlo.max_simulation_plies.min(MAXIMUM_PLY as u32);
        for _ in 0..plies
        {
            let last = applied.last().unwrap_or(mv).clone();
            if searchable.is_terminal(&last, false)
            {
                break;
            }

            let list = searchable.generate_moves(&last, &self.context.weights, true);
            if list.is_empty()
            {
                break;
            }

            let next = match self.monte_carlo.rollout
            {
                | RolloutPolicy::FirstMove => list.into_iter().next().unwrap(),
                | RolloutPolicy::UniformRandom => list.choose(&mut rng).cloned().unwrap(),
            };

            searchable.make_move(&next);
            applied.push(next);
        }

        let player_one_wins = applied.last().unwrap_or(mv).value > 0;

        for done in applied.iter().rev()
        {
            searchable.undo_move(done);
        }
        verify_restored(&*searchable, hash_before);

        player_one_wins
    }
}

impl SearchStrategy for Uct
{
    fn search(&mut self, searchable: &mut dyn Searchable, last_move: Move, _window: SearchWindow) -> Option<Move>
    {
        self.monte_carlo = searchable.options().monte_carlo;

        let root_id = self.context.sink.reset(&last_move);
        let mut root = UctNode::new(last_move);

        // Expand the root eagerly: a search that runs even one simulation
        // should be able to answer, and a root with no replies means the game
        // is over.
        let list = searchable.generate_moves(&root.mv, &self.context.weights, true);
        self.context.progress.add_considered(list.len() as u64);
        if list.is_empty()
        {
            return None;
        }
        root.children = Some(list.into_iter().map(UctNode::new).collect());
        root.num_visits = 1;

        let max_simulations = self.monte_carlo.max_simulations.max(1);
        let mut simulations = 0;

        while simulations < max_simulations
        {
            if self.context.control.checkpoint()
            {
                break;
            }

            self.play_simulation(searchable, &mut root, root_id);
            simulations += 1;
            self.context.progress.set_percent_done(100 * simulations / max_simulations);
        }

        log::debug!("uct ran {} simulations over {} root moves", simulations, root.children.as_ref().unwrap().len());

        // The most-visited child; earliest generated wins ties.
        let mut best: Option<UctNode> = None;
        for child in root.children.take().unwrap()
        {
            let better = match &best
            {
                | None => child.num_visits > 0,
                | Some(current) => child.num_visits > current.num_visits,
            };

            if better
            {
                best = Some(child);
            }
        }

        best.map(|node| {
            let mut mv = node.mv;
            mv.selected = true;
            mv.inherited_value = mv.value;
            mv
        })
    }

    fn context(&self) -> &SearchContext
    {
        &self.context
    }
}
