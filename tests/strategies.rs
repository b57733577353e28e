mod common;
use common::{setup, trees::*};

use ponder::prelude::*;

fn brute(kind: StrategyKind, look_ahead: u32, alpha_beta: bool) -> SearchOptions
{
    let mut options = SearchOptions::with_strategy(kind);
    options.brute.look_ahead = look_ahead;
    options.brute.alpha_beta = alpha_beta;
    options
}

fn run_search(kind: StrategyKind, game: &mut StubGame) -> Option<Move>
{
    let mut strategy = kind.create(SearchContext::new(Weights::default()));
    let root = game.root_move();
    strategy.search(game, root, SearchWindow::default())
}

#[cfg(test)]
mod strategies
{
    use super::*;

    #[test]
    fn two_ply_scenario_selects_documented_branch()
    {
        let _setup = setup::setup();

        for kind in [StrategyKind::MiniMax, StrategyKind::NegaMax]
        {
            let mut game = StubGame::new(two_ply(), brute(kind, 2, true));
            let best = run_search(kind, &mut game).expect("a move must be found");

            assert_eq!(best.to, Location::new(0, 0), "{} chose the wrong branch", kind);
            assert_eq!(best.inherited_value, 3, "{} backed up the wrong value", kind);
            assert!(best.selected);
        }
    }

    #[test]
    fn alpha_beta_only_cuts_dominated_branches()
    {
        let _setup = setup::setup();

        for kind in [StrategyKind::MiniMax, StrategyKind::NegaMax]
        {
            let mut seed = 42;
            let tree = bushy(4, 3, &mut seed);

            let mut pruned = StubGame::new(tree.clone(), brute(kind, 4, true));
            let mut full = StubGame::new(tree, brute(kind, 4, false));

            let with_pruning = run_search(kind, &mut pruned).expect("a move must be found");
            let without_pruning = run_search(kind, &mut full).expect("a move must be found");

            assert_eq!(with_pruning.to, without_pruning.to, "{} pruned a relevant branch", kind);
            assert_eq!(with_pruning.inherited_value, without_pruning.inherited_value, "{} mangled the value", kind);
        }
    }

    #[test]
    fn repeated_searches_are_identical()
    {
        let _setup = setup::setup();

        for kind in [StrategyKind::MiniMax, StrategyKind::NegaMax, StrategyKind::Mtd]
        {
            let mut seed = 7;
            let mut game = StubGame::new(bushy(4, 3, &mut seed), brute(kind, 4, true));

            // Reuse the same strategy so any memory it holds stays warm.
            let mut strategy = kind.create(SearchContext::new(Weights::default()));
            let root = game.root_move();

            let first = strategy.search(&mut game, root.clone(), SearchWindow::default());
            let second = strategy.search(&mut game, root, SearchWindow::default());

            assert_eq!(first, second, "{} was not deterministic", kind);
        }
    }

    #[test]
    fn zero_lookahead_returns_the_root_itself()
    {
        let _setup = setup::setup();

        for kind in [StrategyKind::MiniMax, StrategyKind::NegaMax]
        {
            let mut game = StubGame::new(two_ply(), brute(kind, 0, true));
            let root = game.root_move();
            let best = run_search(kind, &mut game).expect("a move must be found");

            assert!(best.same_action(&root));
            assert_eq!(best.inherited_value, root.value, "{} derived a value it should not have", kind);
        }
    }

    #[test]
    fn negamax_agrees_with_minimax()
    {
        let _setup = setup::setup();

        let mut seed = 99;
        let tree = bushy(3, 4, &mut seed);

        let mut first = StubGame::new(tree.clone(), brute(StrategyKind::MiniMax, 3, true));
        let mut second = StubGame::new(tree, brute(StrategyKind::NegaMax, 3, true));

        let minimax = run_search(StrategyKind::MiniMax, &mut first).expect("a move must be found");
        let negamax = run_search(StrategyKind::NegaMax, &mut second).expect("a move must be found");

        assert_eq!(minimax.to, negamax.to);
        assert_eq!(minimax.inherited_value, negamax.inherited_value);
    }

    #[test]
    fn mtd_converges_to_the_full_window_value()
    {
        let _setup = setup::setup();

        let mut seed = 1234;
        let tree = bushy(3, 3, &mut seed);

        let mut plain = StubGame::new(tree.clone(), brute(StrategyKind::NegaMax, 3, true));
        let mut driven = StubGame::new(tree, brute(StrategyKind::Mtd, 3, true));

        let full_window = run_search(StrategyKind::NegaMax, &mut plain).expect("a move must be found");
        let converged = run_search(StrategyKind::Mtd, &mut driven).expect("a move must be found");

        assert_eq!(converged.inherited_value, full_window.inherited_value);
    }

    #[test]
    fn mtd_matches_the_documented_two_ply_answer()
    {
        let _setup = setup::setup();

        let mut game = StubGame::new(two_ply(), brute(StrategyKind::Mtd, 2, true));
        let best = run_search(StrategyKind::Mtd, &mut game).expect("a move must be found");

        assert_eq!(best.to, Location::new(0, 0));
        assert_eq!(best.inherited_value, 3);
    }

    #[test]
    fn quiescence_stops_at_the_ply_cap()
    {
        let _setup = setup::setup();

        // Every position generates urgent moves and claims jeopardy, so only
        // the cap can end the extension.
        let mut seed = 5;
        let mut options = brute(StrategyKind::NegaMax, 1, true);
        options.brute.quiescence = true;
        options.brute.max_quiescent_plies = 3;

        let mut game = StubGame::new(bushy(8, 2, &mut seed), options).with_urgent_everywhere();
        let best = run_search(StrategyKind::NegaMax, &mut game);

        assert!(best.is_some(), "quiescent search must still produce a move");
    }

    #[test]
    fn finished_game_returns_no_move()
    {
        let _setup = setup::setup();

        for kind in [StrategyKind::MiniMax, StrategyKind::NegaMax, StrategyKind::Mtd, StrategyKind::Uct]
        {
            let mut game = StubGame::new(leaf(0), SearchOptions::with_strategy(kind));
            assert!(run_search(kind, &mut game).is_none(), "{} invented a move", kind);
        }
    }

    #[test]
    fn pruning_events_reach_the_sink()
    {
        let _setup = setup::setup();

        let sink = std::sync::Arc::new(CollectingSink::new());
        let context = SearchContext::new(Weights::default()).with_sink(sink.clone());

        let mut game = StubGame::new(two_ply(), brute(StrategyKind::MiniMax, 2, true));
        let root = game.root_move();

        let mut strategy = StrategyKind::MiniMax.create(context);
        let best = strategy.search(&mut game, root, SearchWindow::default());
        assert!(best.is_some());

        let nodes = sink.snapshot();
        let pruned = nodes.iter().filter(|node| node.pruned).count();

        // Root, four visited nodes, one visited leaf pair, one cut sibling.
        assert_eq!(nodes.len(), 7);
        assert_eq!(pruned, 1, "exactly one leaf is dominated in this tree");
    }

    #[test]
    fn uct_prefers_the_winning_branch()
    {
        let _setup = setup::setup();

        let mut options = SearchOptions::with_strategy(StrategyKind::Uct);
        options.monte_carlo.max_simulations = 500;

        let mut game = StubGame::new(lopsided(), options);
        let best = run_search(StrategyKind::Uct, &mut game).expect("a move must be found");

        assert_eq!(best.to, Location::new(0, 1), "uct should back the branch that always wins");
    }

    #[test]
    fn uct_improves_with_budget()
    {
        let _setup = setup::setup();

        // A tiny budget may guess; a real budget must not.
        let mut options = SearchOptions::with_strategy(StrategyKind::Uct);
        options.monte_carlo.max_simulations = 1000;

        let mut game = StubGame::new(lopsided(), options);
        let best = run_search(StrategyKind::Uct, &mut game).expect("a move must be found");
        assert_eq!(best.to, Location::new(0, 1));

        let mut options = SearchOptions::with_strategy(StrategyKind::Uct);
        options.monte_carlo.max_simulations = 10;
        let mut small = StubGame::new(lopsided(), options);
        assert!(run_search(StrategyKind::Uct, &mut small).is_some());
    }
}
