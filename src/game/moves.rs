use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A piece removed from the board by a move, in capture order, so the game can
/// put everything back when the move is undone.
pub struct Capture
{
    pub location: Location,
    pub owner:    Player,
}

#[derive(Clone, Debug, PartialEq)]
/// A change in state from one board position to the next: one ply by one player.
///
/// The raw `value` is the static evaluation of the board *after* the move, on
/// player one's scale, filled in by move generation. The `inherited_value`
/// starts equal to `value` and only becomes meaningful once a strategy has
/// backed it up from deeper search.
pub struct Move
{
    pub from:   Option<Location>,
    pub to:     Location,
    pub player: Player,

    pub value:           i32,
    pub inherited_value: i32,

    pub selected: bool,
    pub is_pass:  bool,

    pub captures: Vec<Capture>,
}

/// An ordered list of candidate moves, best-first when produced by a generator.
pub type MoveList = Vec<Move>;

impl Move
{
    /// Creates a placement-style move with no origin square.
    pub fn new(to: Location, value: i32, player: Player) -> Move
    {
        Move {
            from: None,
            to,
            player,
            value,
            inherited_value: value,
            selected: false,
            is_pass: false,
            captures: Vec::new(),
        }
    }

    /// Creates a move that slides a piece between two squares.
    pub fn between(from: Location, to: Location, value: i32, player: Player) -> Move
    {
        Move {
            from: Some(from),
            ..Move::new(to, value, player)
        }
    }

    /// Creates a passing move. Also used as the synthetic root before the first
    /// real ply: a search for player one's move starts from a player-two pass.
    pub fn pass(player: Player) -> Move
    {
        Move {
            is_pass: true,
            ..Move::new(Location::default(), 0, player)
        }
    }

    /// Attaches the captures this move removed from the board.
    pub fn with_captures(mut self, captures: Vec<Capture>) -> Move
    {
        self.captures = captures;
        self
    }

    /// The player who replies to this move.
    pub fn replier(&self) -> Player
    {
        self.player.opponent()
    }

    /// Whether two moves describe the same board action, ignoring the search
    /// bookkeeping (inherited value, selection flag) that changes in flight.
    pub fn same_action(&self, other: &Move) -> bool
    {
        self.player == other.player && self.from == other.from && self.to == other.to && self.is_pass == other.is_pass
    }
}

impl std::fmt::Display for Move
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        if self.is_pass
        {
            return write!(f, "{} pass", self.player);
        }

        let from = self.from.map(|loc| format!("{}", loc)).unwrap_or("hand".into());
        write!(f, "{} {} to {} val: {} inhrtd: {}", self.player, from, self.to, self.value, self.inherited_value)?;

        if !self.captures.is_empty()
        {
            write!(f, " x{}", self.captures.len())?;
        }
        Ok(())
    }
}
