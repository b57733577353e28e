use std::sync::Arc;

use crate::prelude::*;

pub mod control;
pub mod minimax;
pub mod mtd;
pub mod negamax;
pub mod options;
pub mod runner;
pub mod table;
pub mod tree;
pub mod uct;
pub mod window;

pub use control::*;
pub use minimax::*;
pub use mtd::*;
pub use negamax::*;
pub use options::*;
pub use runner::*;
pub use table::*;
pub use tree::*;
pub use uct::*;
pub use window::*;

/// The deepest stack of applied moves any search is allowed to build.
pub const MAXIMUM_PLY: usize = 128;

pub mod scores
{
    /// A bound beyond any real evaluation; search windows start here.
    pub const INFINITY: i32 = 1 << 30;

    /// Anything at or above this magnitude is a won game.
    pub const WINNING_VALUE: i32 = 1024;

    /// Clamps an evaluation into the legal score range. An out-of-range score
    /// indicates a defective evaluation function, which deserves a complaint
    /// but not a crash mid-search.
    pub fn clamped(value: i32) -> i32
    {
        if value.abs() > WINNING_VALUE
        {
            log::warn!("evaluation {} exceeds the winning value; clamping", value);
            value.clamp(-WINNING_VALUE, WINNING_VALUE)
        }
        else
        {
            value
        }
    }
}

/// Aborts if a make/undo pair failed to restore the position. A mismatch means
/// the board is corrupted and nothing searched afterwards could be trusted.
pub(crate) fn verify_restored(searchable: &dyn Searchable, hash_before: u64)
{
    assert_eq!(
        hash_before,
        searchable.position_hash(),
        "position hash changed across a make/undo pair"
    );
}

#[derive(Clone)]
/// Everything a strategy shares with the world outside its recursion: the
/// weight vector, the cooperative pause/interrupt switchboard, the progress
/// counters, and the (possibly no-op) tree sink.
///
/// One context belongs to one top-level search; concurrent searches never
/// share these objects.
pub struct SearchContext
{
    pub weights:  Weights,
    pub control:  Arc<SearchControl>,
    pub progress: Arc<SearchProgress>,
    pub sink:     Arc<dyn TreeSink>,
}

impl SearchContext
{
    /// A standalone context with fresh controls and no tree sink.
    pub fn new(weights: Weights) -> SearchContext
    {
        SearchContext {
            weights,
            control:  Arc::new(SearchControl::new()),
            progress: Arc::new(SearchProgress::new()),
            sink:     Arc::new(NullSink),
        }
    }

    /// Swaps in a tree sink that records the explored nodes.
    pub fn with_sink(mut self, sink: Arc<dyn TreeSink>) -> SearchContext
    {
        self.sink = sink;
        self
    }
}

/// A search algorithm for two-player zero-sum games with perfect information.
///
/// Implementors narrow a bound on the value of the optimal move. A call
/// borrows the searchable's board exclusively, explores replies to
/// `last_move`, and leaves the board exactly as it found it.
pub trait SearchStrategy: Send
{
    /// Finds the best reply to `last_move`, or nothing if the game is over.
    fn search(&mut self, searchable: &mut dyn Searchable, last_move: Move, window: SearchWindow) -> Option<Move>;

    /// The shared context this strategy reports through.
    fn context(&self) -> &SearchContext;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
/// The closed set of interchangeable search algorithms.
pub enum StrategyKind
{
    #[value(name = "minimax")]
    MiniMax,
    #[default]
    #[value(name = "negamax")]
    NegaMax,
    #[value(name = "mtd")]
    Mtd,
    #[value(name = "uct")]
    Uct,
}

impl StrategyKind
{
    /// Builds the strategy this kind names.
    pub fn create(&self, context: SearchContext) -> Box<dyn SearchStrategy>
    {
        match self
        {
            | Self::MiniMax => Box::new(MiniMax::new(context)),
            | Self::NegaMax => Box::new(NegaMax::new(context)),
            | Self::Mtd => Box::new(Mtd::new(context)),
            | Self::Uct => Box::new(Uct::new(context)),
        }
    }
}

impl std::fmt::Display for StrategyKind
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let name = match self
        {
            | Self::MiniMax => "minimax",
            | Self::NegaMax => "negamax",
            | Self::Mtd => "mtd",
            | Self::Uct => "uct",
        };
        write!(f, "{name}")
    }
}

impl FromStr for StrategyKind
{
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err>
    {
        match s
        {
            | "minimax" => Ok(Self::MiniMax),
            | "negamax" => Ok(Self::NegaMax),
            | "mtd" => Ok(Self::Mtd),
            | "uct" => Ok(Self::Uct),
            | _ => Err(Error::for_parse::<Self>(s.into())),
        }
    }
}
