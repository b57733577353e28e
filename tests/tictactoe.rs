mod common;
use common::setup;

use std::sync::Arc;

use ponder::prelude::*;

fn mark(row: i16, col: i16, player: Player) -> Move
{
    Move::new(Location::new(row, col), 0, player)
}

/// X: (0,0) (0,1) against O: (1,0) (1,1); both sides have an open line.
fn double_threat() -> (TicTacToe, Move)
{
    let mut game = TicTacToe::new(SearchOptions::default());

    game.make_move(&mark(0, 0, Player::One));
    game.make_move(&mark(1, 0, Player::Two));
    game.make_move(&mark(0, 1, Player::One));

    let last = mark(1, 1, Player::Two);
    game.make_move(&last);

    (game, last)
}

#[cfg(test)]
mod tictactoe
{
    use super::*;

    #[test]
    fn make_and_undo_restore_the_hash()
    {
        let _setup = setup::setup();

        let weights = TicTacToe::default_weights();
        let mut game = TicTacToe::new(SearchOptions::default());

        let mut last_move = Move::pass(Player::Two);
        let mut applied = Vec::new();
        let mut hashes = vec![game.position_hash()];

        for _ in 0..5
        {
            let list = game.generate_moves(&last_move, &weights, true);
            let next = list.into_iter().next().unwrap();

            game.make_move(&next);
            hashes.push(game.position_hash());

            last_move = next.clone();
            applied.push(next);
        }

        for done in applied.iter().rev()
        {
            assert_eq!(game.position_hash(), hashes.pop().unwrap());
            game.undo_move(done);
        }

        assert_eq!(game.position_hash(), hashes.pop().unwrap());
        assert!(hashes.is_empty());
    }

    #[test]
    #[should_panic]
    fn undo_with_an_empty_history_aborts()
    {
        let mut game = TicTacToe::new(SearchOptions::default());
        game.undo_move(&mark(0, 0, Player::One));
    }

    #[test]
    #[should_panic]
    fn undo_out_of_order_aborts()
    {
        let mut game = TicTacToe::new(SearchOptions::default());

        game.make_move(&mark(0, 0, Player::One));
        game.make_move(&mark(1, 1, Player::Two));
        game.undo_move(&mark(0, 0, Player::One));
    }

    #[test]
    fn urgent_moves_put_the_win_before_the_block()
    {
        let _setup = setup::setup();

        let weights = TicTacToe::default_weights();
        let (game, last) = double_threat();

        let urgent = game.generate_urgent_moves(&last, &weights, true);

        assert_eq!(urgent.len(), 2);
        assert_eq!(urgent[0].to, Location::new(0, 2), "the winning completion comes first");
        assert_eq!(urgent[1].to, Location::new(1, 2), "then the block");
    }

    #[test]
    fn jeopardy_tracks_open_threats()
    {
        let _setup = setup::setup();

        let weights = TicTacToe::default_weights();

        let mut quiet = TicTacToe::new(SearchOptions::default());
        let opening = mark(0, 0, Player::One);
        quiet.make_move(&opening);
        assert!(!quiet.in_jeopardy(&opening, &weights, true));

        let (game, last) = double_threat();
        assert!(game.in_jeopardy(&last, &weights, true));
    }

    #[test]
    fn the_engine_blocks_an_immediate_win()
    {
        let _setup = setup::setup();

        // O has two in a row; X to move must take the third cell.
        let mut game = TicTacToe::new(SearchOptions::default());
        game.make_move(&mark(0, 0, Player::One));
        game.make_move(&mark(1, 0, Player::Two));
        game.make_move(&mark(2, 2, Player::One));

        let last = mark(1, 1, Player::Two);
        game.make_move(&last);

        let mut options = SearchOptions::with_strategy(StrategyKind::NegaMax);
        options.brute.look_ahead = 4;
        game.set_options(options);

        let runner = SearchRunner::launch(
            Box::new(game),
            last,
            TicTacToe::default_weights(),
            Arc::new(NullSink),
        )
        .unwrap();

        let best = runner.join().unwrap().best.expect("a move must be found");
        assert_eq!(best.to, Location::new(1, 2), "only the block survives lookahead");
    }

    #[test]
    fn perfect_self_play_is_a_draw()
    {
        let _setup = setup::setup();

        let weights = TicTacToe::default_weights();
        let mut options = SearchOptions::with_strategy(StrategyKind::NegaMax);
        options.brute.look_ahead = 9;

        let mut master = TicTacToe::new(options);
        let mut last_move = Move::pass(Player::Two);

        loop
        {
            let probe = master.clone();
            let runner =
                SearchRunner::launch(Box::new(probe), last_move.clone(), weights.clone(), Arc::new(NullSink)).unwrap();

            let Some(best) = runner.join().unwrap().best
            else
            {
                break;
            };

            master.make_move(&best);
            last_move = best;

            if master.is_terminal(&last_move, true)
            {
                break;
            }
        }

        assert!(master.is_full());
        assert_eq!(master.winner(), None, "perfect play never loses tic-tac-toe");
    }
}
