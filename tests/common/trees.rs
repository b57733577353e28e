use std::time::Duration;

use ponder::prelude::*;

#[derive(Clone, Debug)]
/// One node of a scripted game tree: a static value and the replies below it.
pub struct StubNode
{
    pub value:    i32,
    pub children: Vec<StubNode>,
}

pub fn leaf(value: i32) -> StubNode
{
    StubNode {
        value,
        children: Vec::new(),
    }
}

pub fn node(value: i32, children: Vec<StubNode>) -> StubNode
{
    StubNode { value, children }
}

/// The two-ply acceptance tree: player one maximizes over
/// `min(3, 5) = 3` and `min(2, 9) = 2`, so the first branch wins at value 3.
pub fn two_ply() -> StubNode
{
    node(
        6,
        vec![node(1, vec![leaf(3), leaf(5)]), node(2, vec![leaf(2), leaf(9)])],
    )
}

/// A deterministic scripted tree with varied values in [-50, 50].
pub fn bushy(depth: u32, branching: usize, seed: &mut u64) -> StubNode
{
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let value = ((*seed >> 33) % 101) as i32 - 50;

    let children = if depth == 0
    {
        Vec::new()
    }
    else
    {
        (0..branching).map(|_| bushy(depth - 1, branching, seed)).collect()
    };

    node(value, children)
}

/// A tree where the second branch always ends in wins for player one and the
/// first always ends in losses.
pub fn lopsided() -> StubNode
{
    node(
        0,
        vec![
            node(-5, vec![leaf(-900), leaf(-800)]),
            node(5, vec![leaf(900), leaf(950)]),
        ],
    )
}

#[derive(Clone, Debug)]
/// A `Searchable` that walks a scripted tree instead of a real board. Move
/// values come straight from the script, so every strategy's choices can be
/// checked against hand-computed answers.
pub struct StubGame
{
    root:    StubNode,
    path:    Vec<usize>,
    history: Vec<Move>,
    options: SearchOptions,

    delay:             Option<Duration>,
    urgent_everywhere: bool,
}

impl StubGame
{
    pub fn new(root: StubNode, options: SearchOptions) -> StubGame
    {
        StubGame {
            root,
            path: Vec::new(),
            history: Vec::new(),
            options,
            delay: None,
            urgent_everywhere: false,
        }
    }

    /// Slows move generation down so pause and interrupt tests have a search
    /// that is actually in flight.
    pub fn with_delay(mut self, delay: Duration) -> StubGame
    {
        self.delay = Some(delay);
        self
    }

    /// Makes every position urgent and in jeopardy, for quiescence-termination
    /// fixtures.
    pub fn with_urgent_everywhere(mut self) -> StubGame
    {
        self.urgent_everywhere = true;
        self
    }

    /// The synthetic move a search starts from: player two just "passed", so
    /// player one replies first.
    pub fn root_move(&self) -> Move
    {
        let mut mv = Move::pass(Player::Two);
        mv.value = self.root.value;
        mv.inherited_value = mv.value;
        mv
    }

    fn current(&self) -> &StubNode
    {
        let mut current = &self.root;
        for &index in &self.path
        {
            current = &current.children[index];
        }
        current
    }

    fn to_move(&self) -> Player
    {
        if self.path.len() % 2 == 0
        {
            Player::One
        }
        else
        {
            Player::Two
        }
    }

    /// Encodes child `index` at the current depth as a move.
    fn child_move(&self, index: usize, child: &StubNode) -> Move
    {
        Move::new(Location::new(self.path.len() as i16, index as i16), child.value, self.to_move())
    }

    fn scripted_moves(&self) -> MoveList
    {
        if let Some(delay) = self.delay
        {
            std::thread::sleep(delay);
        }

        self.current()
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| self.child_move(index, child))
            .collect()
    }
}

impl Searchable for StubGame
{
    fn options(&self) -> &SearchOptions
    {
        &self.options
    }

    fn generate_moves(&self, _last_move: &Move, _weights: &Weights, _player_one_perspective: bool) -> MoveList
    {
        self.scripted_moves()
    }

    fn generate_urgent_moves(&self, _last_move: &Move, _weights: &Weights, _player_one_perspective: bool) -> MoveList
    {
        if self.urgent_everywhere
        {
            self.scripted_moves()
        }
        else
        {
            MoveList::new()
        }
    }

    fn make_move(&mut self, mv: &Move)
    {
        let index = mv.to.col as usize;
        assert_eq!(mv.to.row as usize, self.path.len(), "move applied at the wrong depth");
        assert!(index < self.current().children.len(), "move {} does not name a scripted child", mv);

        self.path.push(index);
        self.history.push(mv.clone());
    }

    fn undo_move(&mut self, mv: &Move)
    {
        let last = self.history.pop();
        assert!(last.is_some(), "undo_move called with an empty move history");
        assert!(last.unwrap().same_action(mv), "undo_move out of order");

        self.path.pop();
    }

    fn worth(&self, _last_move: &Move, _weights: &Weights) -> i32
    {
        self.current().value
    }

    fn is_terminal(&mut self, _last_move: &Move, _record_win: bool) -> bool
    {
        self.current().children.is_empty()
    }

    fn in_jeopardy(&self, _last_move: &Move, _weights: &Weights, _player_one_perspective: bool) -> bool
    {
        self.urgent_everywhere
    }

    fn position_hash(&self) -> u64
    {
        let mut hash: u64 = 0xcbf29ce484222325;
        for &index in &self.path
        {
            hash = (hash ^ (index as u64 + 1)).wrapping_mul(0x100000001b3);
        }
        hash
    }
}
