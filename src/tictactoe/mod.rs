use std::hash::{DefaultHasher, Hasher};

use lazy_static::lazy_static;

use crate::prelude::*;

const SIZE: usize = 3;
const CELLS: usize = SIZE * SIZE;

/// The eight winning lines.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// One bitstring per cell and player, plus one for the side to move.
const NUM_BITSTRINGS: usize = CELLS * 2 + 1;
const SIDE_TO_MOVE: usize = NUM_BITSTRINGS - 1;

lazy_static! {
    /// The table of bitstrings used by the Zobrist calculations.
    static ref BITSTRINGS: [u64; NUM_BITSTRINGS] =
    {
        let mut table = [0u64; NUM_BITSTRINGS];
        let mut hasher = DefaultHasher::new();

        for i in 0 .. table.len()
        {
            hasher.write_u64(i as u64);
            table[i] = hasher.finish();
        }
        table
    };
}

#[derive(Clone, Debug)]
/// The reference game: 3x3 tic-tac-toe over a weighted line evaluation.
///
/// Small enough to search exhaustively, rich enough to exercise everything the
/// search core asks of a game: urgent moves, jeopardy detection, Zobrist
/// hashing, and a strictly LIFO move history.
pub struct TicTacToe
{
    cells:   [Option<Player>; CELLS],
    history: Vec<Move>,
    options: SearchOptions,
    hash:    u64,

    recorded_winner: Option<Player>,
}

impl TicTacToe
{
    pub fn new(options: SearchOptions) -> TicTacToe
    {
        TicTacToe {
            cells: [None; CELLS],
            history: Vec::new(),
            options,
            hash: 0,
            recorded_winner: None,
        }
    }

    /// The coefficients the evaluation expects: one per own-marks-in-a-line
    /// count below three.
    pub fn default_weights() -> Weights
    {
        Weights(vec![1.0, 8.0])
    }

    pub fn set_options(&mut self, options: SearchOptions)
    {
        self.options = options;
    }

    /// The player whose turn it is.
    pub fn to_move(&self) -> Player
    {
        if self.history.len() % 2 == 0
        {
            Player::One
        }
        else
        {
            Player::Two
        }
    }

    pub fn winner(&self) -> Option<Player>
    {
        winner_of(&self.cells)
    }

    pub fn is_full(&self) -> bool
    {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// The winner recorded by a terminal check that was allowed to record.
    pub fn recorded_winner(&self) -> Option<Player>
    {
        self.recorded_winner
    }

    fn index(location: Location) -> usize
    {
        let row = location.row as usize;
        let col = location.col as usize;
        assert!(row < SIZE && col < SIZE, "{} is off the board", location);
        row * SIZE + col
    }

    fn location(cell: usize) -> Location
    {
        Location::new((cell / SIZE) as i16, (cell % SIZE) as i16)
    }

    fn toggle(&mut self, cell: usize, player: Player)
    {
        self.hash ^= BITSTRINGS[cell * 2 + player as usize];
        self.hash ^= BITSTRINGS[SIDE_TO_MOVE];
    }

    /// All placements for `player`, each valued by the resulting position,
    /// best-first for that player.
    fn placements(&self, player: Player, weights: &Weights) -> MoveList
    {
        let mut cells = self.cells;
        let mut list = MoveList::new();

        if winner_of(&cells).is_some()
        {
            return list;
        }

        for cell in 0..CELLS
        {
            if cells[cell].is_some()
            {
                continue;
            }

            cells[cell] = Some(player);
            list.push(Move::new(Self::location(cell), evaluate(&cells, weights), player));
            cells[cell] = None;
        }

        list.sort_by_key(|mv| -player.sign() * mv.value);
        list
    }

    /// Whether `player` can complete a line by filling `cell`.
    fn completes_line(&self, cell: usize, player: Player) -> bool
    {
        LINES.iter().any(|line| {
            line.contains(&cell)
                && line
                    .iter()
                    .all(|&index| index == cell || self.cells[index] == Some(player))
        })
    }
}

impl Searchable for TicTacToe
{
    fn options(&self) -> &SearchOptions
    {
        &self.options
    }

    fn generate_moves(&self, last_move: &Move, weights: &Weights, _player_one_perspective: bool) -> MoveList
    {
        let player = last_move.replier();
        debug_assert_eq!(player, self.to_move(), "move generation out of turn");

        self.placements(player, weights)
    }

    fn generate_urgent_moves(&self, last_move: &Move, weights: &Weights, _player_one_perspective: bool) -> MoveList
    {
        let player = last_move.replier();

        // Urgent means an immediate win, or the block that denies one. Wins
        // come out first.
        let mut list: MoveList = self
            .placements(player, weights)
            .into_iter()
            .filter(|mv| {
                let cell = Self::index(mv.to);
                self.completes_line(cell, player) || self.completes_line(cell, player.opponent())
            })
            .collect();

        list.sort_by_key(|mv| !self.completes_line(Self::index(mv.to), player));
        list
    }

    fn make_move(&mut self, mv: &Move)
    {
        assert!(!mv.is_pass, "tic-tac-toe has no passing moves");

        let cell = Self::index(mv.to);
        assert!(self.cells[cell].is_none(), "cell {} is already occupied", mv.to);

        self.cells[cell] = Some(mv.player);
        self.toggle(cell, mv.player);
        self.history.push(mv.clone());
    }

    fn undo_move(&mut self, mv: &Move)
    {
        let last = self.history.pop();
        assert!(last.is_some(), "undo_move called with an empty move history");

        let last = last.unwrap();
        assert!(
            last.same_action(mv),
            "undo_move out of order: expected {} but got {}",
            last,
            mv
        );

        let cell = Self::index(mv.to);
        self.cells[cell] = None;
        self.toggle(cell, mv.player);
    }

    fn worth(&self, _last_move: &Move, weights: &Weights) -> i32
    {
        evaluate(&self.cells, weights)
    }

    fn is_terminal(&mut self, _last_move: &Move, record_win: bool) -> bool
    {
        if let Some(winner) = self.winner()
        {
            if record_win
            {
                self.recorded_winner = Some(winner);
                log::info!("game over: {} wins", winner);
            }
            return true;
        }
        self.is_full()
    }

    fn in_jeopardy(&self, last_move: &Move, _weights: &Weights, _player_one_perspective: bool) -> bool
    {
        // The mover threatens to finish a line next turn, so the reply is
        // forced and the position is not quiet.
        (0..CELLS).any(|cell| self.cells[cell].is_none() && self.completes_line(cell, last_move.player))
    }

    fn position_hash(&self) -> u64
    {
        self.hash
    }
}

/// Evaluates a grid on player one's scale: each line still open for exactly
/// one player contributes that player's weight for the number of marks placed;
/// a finished line collapses to the winning value.
fn evaluate(cells: &[Option<Player>; CELLS], weights: &Weights) -> i32
{
    if let Some(winner) = winner_of(cells)
    {
        return winner.sign() * scores::WINNING_VALUE;
    }

    let mut score = 0.0;
    for line in LINES
    {
        let ones = line.iter().filter(|&&cell| cells[cell] == Some(Player::One)).count();
        let twos = line.iter().filter(|&&cell| cells[cell] == Some(Player::Two)).count();

        if ones > 0 && twos == 0
        {
            score += weights.get(ones - 1);
        }
        else if twos > 0 && ones == 0
        {
            score -= weights.get(twos - 1);
        }
    }
    score.round() as i32
}

fn winner_of(cells: &[Option<Player>; CELLS]) -> Option<Player>
{
    for line in LINES
    {
        if let Some(player) = cells[line[0]]
        {
            if cells[line[1]] == Some(player) && cells[line[2]] == Some(player)
            {
                return Some(player);
            }
        }
    }
    None
}

impl std::fmt::Display for TicTacToe
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        for row in 0..SIZE
        {
            for col in 0..SIZE
            {
                let mark = match self.cells[row * SIZE + col]
                {
                    | Some(Player::One) => 'X',
                    | Some(Player::Two) => 'O',
                    | None => '.',
                };
                write!(f, " {}", mark)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
