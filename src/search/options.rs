use crate::prelude::*;

#[derive(Clone, Copy, Debug, Default)]
/// The full configuration bundle for one search invocation. Immutable once a
/// search has started.
pub struct SearchOptions
{
    /// Which algorithm evaluates the game tree.
    pub strategy: StrategyKind,

    pub brute:       BruteSearchOptions,
    pub best_moves:  BestMovesSearchOptions,
    pub monte_carlo: MonteCarloSearchOptions,
}

impl SearchOptions
{
    /// Defaults for everything except the strategy choice.
    pub fn with_strategy(strategy: StrategyKind) -> SearchOptions
    {
        SearchOptions {
            strategy,
            ..SearchOptions::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Options for the brute-force strategies (MiniMax, NegaMax and the MTD
/// driver on top of them), which walk the tree to a fixed horizon and prune
/// with a search window.
pub struct BruteSearchOptions
{
    /// Number of plies to look ahead while searching for the best move.
    pub look_ahead: u32,

    /// Whether to use alpha-beta pruning.
    pub alpha_beta: bool,

    /// Whether to extend past the horizon in unstable positions.
    pub quiescence: bool,

    /// Never search more than this many additional plies while quiescent.
    pub max_quiescent_plies: u32,
}

impl Default for BruteSearchOptions
{
    fn default() -> Self
    {
        BruteSearchOptions {
            look_ahead:          3,
            alpha_beta:          true,
            quiescence:          false,
            max_quiescent_plies: 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Caps how many of the generated candidate moves each ply actually expands.
/// Generators emit best-first, so trimming keeps the strongest prefix.
pub struct BestMovesSearchOptions
{
    /// Percentage of the candidate moves to keep, 0 to 100.
    pub percentage: u8,

    /// Always keep at least this many moves, whatever the percentage says.
    pub minimum: usize,
}

impl Default for BestMovesSearchOptions
{
    /// Keeps every move, so searches are exact unless a game opts in.
    fn default() -> Self
    {
        BestMovesSearchOptions {
            percentage: 100,
            minimum:    1,
        }
    }
}

impl BestMovesSearchOptions
{
    /// Trims a best-first move list down to the configured share.
    pub fn trim(&self, mut moves: MoveList) -> MoveList
    {
        let share = (moves.len() * self.percentage.min(100) as usize + 99) / 100;
        let keep = share.max(self.minimum).min(moves.len());

        if keep < moves.len()
        {
            log::trace!("trimming {} candidate moves down to {}", moves.len(), keep);
            moves.truncate(keep);
        }
        moves
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Options for the Monte-Carlo strategy.
pub struct MonteCarloSearchOptions
{
    /// How many playouts one top-level search runs.
    pub max_simulations: u32,

    /// The exploration half of the UCB selection rule; higher favors
    /// less-visited children.
    pub exploration_constant: f64,

    /// Rollouts stop after this many plies even without reaching a terminal
    /// position, and judge the final position statically.
    pub max_simulation_plies: u32,

    /// How rollouts pick their moves.
    pub rollout: RolloutPolicy,
}

impl Default for MonteCarloSearchOptions
{
    fn default() -> Self
    {
        MonteCarloSearchOptions {
            max_simulations:      1000,
            exploration_constant: std::f64::consts::SQRT_2,
            max_simulation_plies: 40,
            rollout:              RolloutPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// The move policy a rollout follows between the tree frontier and the end of
/// the playout.
pub enum RolloutPolicy
{
    /// Pick uniformly among the generated moves.
    #[default]
    UniformRandom,

    /// Always take the first generated move. Deterministic, and weak against
    /// anything that punishes predictability; kept for reproducibility runs.
    FirstMove,
}
