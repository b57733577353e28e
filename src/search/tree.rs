use std::sync::Mutex;

use crate::prelude::*;

/// Index of a node within a sink's arena. The root is always 0.
pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which bound a pruning event compared against.
pub enum PruneSide
{
    Alpha,
    Beta,
}

#[derive(Clone, Debug)]
/// One explored (or pruned) node, as recorded for later inspection. Purely
/// observational: strategies write these out and never read them back.
pub struct SearchTreeNode
{
    pub id:     NodeId,
    pub parent: NodeId,
    pub mv:     Move,

    /// The window in force when the node was visited.
    pub window: SearchWindow,

    /// Which sibling this node was, in generation order.
    pub child_index: usize,

    pub pruned: bool,
}

/// Receives one event per node a strategy visits or prunes, so an external
/// viewer can render the search tree. Implementations must never affect the
/// search outcome, only observe it.
pub trait TreeSink: Send + Sync
{
    /// Starts a fresh tree under `root`; returns the root's id.
    fn reset(&self, root: &Move) -> NodeId;

    /// Records a visited node; returns its id for attaching children.
    fn add_node(&self, parent: NodeId, mv: &Move, window: SearchWindow, child_index: usize) -> NodeId;

    /// Records the siblings a cutoff left unexplored, starting at
    /// `first_child_index`, together with the value that beat the bound.
    fn add_pruned(&self, parent: NodeId, moves: &[Move], first_child_index: usize, value: i32, window: SearchWindow, side: PruneSide);
}

#[derive(Clone, Copy, Debug, Default)]
/// The default sink: keeps nothing, costs nothing.
pub struct NullSink;

impl TreeSink for NullSink
{
    fn reset(&self, _root: &Move) -> NodeId
    {
        0
    }

    fn add_node(&self, _parent: NodeId, _mv: &Move, _window: SearchWindow, _child_index: usize) -> NodeId
    {
        0
    }

    fn add_pruned(&self, _parent: NodeId, _moves: &[Move], _first_child_index: usize, _value: i32, _window: SearchWindow, _side: PruneSide)
    {
    }
}

#[derive(Debug, Default)]
/// A sink that records every event into a flat arena. A viewer thread may take
/// snapshots while the worker appends.
pub struct CollectingSink
{
    nodes: Mutex<Vec<SearchTreeNode>>,
}

impl CollectingSink
{
    pub fn new() -> CollectingSink
    {
        CollectingSink::default()
    }

    /// A copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<SearchTreeNode>
    {
        self.nodes.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize
    {
        self.nodes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    fn push(&self, parent: NodeId, mv: &Move, window: SearchWindow, child_index: usize, pruned: bool) -> NodeId
    {
        let mut nodes = self.nodes.lock().unwrap();
        let id = nodes.len();
        nodes.push(SearchTreeNode {
            id,
            parent,
            mv: mv.clone(),
            window,
            child_index,
            pruned,
        });
        id
    }
}

impl TreeSink for CollectingSink
{
    fn reset(&self, root: &Move) -> NodeId
    {
        self.nodes.lock().unwrap().clear();
        self.push(0, root, SearchWindow::full(), 0, false)
    }

    fn add_node(&self, parent: NodeId, mv: &Move, window: SearchWindow, child_index: usize) -> NodeId
    {
        self.push(parent, mv, window, child_index, false)
    }

    fn add_pruned(&self, parent: NodeId, moves: &[Move], first_child_index: usize, value: i32, window: SearchWindow, side: PruneSide)
    {
        log::trace!("pruned {} siblings at value {} against {:?} of {}", moves.len(), value, side, window);
        for (offset, mv) in moves.iter().enumerate()
        {
            self.push(parent, mv, window, first_child_index + offset, true);
        }
    }
}
