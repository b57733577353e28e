use crate::prelude::*;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The two sides in a zero-sum game. Player one always maximizes the score.
pub enum Player
{
    One = 0,
    Two = 1,
}

impl Player
{
    /// Gets the other player.
    pub fn opponent(&self) -> Self
    {
        match self
        {
            | Self::One => Self::Two,
            | Self::Two => Self::One,
        }
    }

    /// Whether this is the maximizing player.
    pub fn is_one(&self) -> bool
    {
        matches!(self, Self::One)
    }

    /// The sign used to fold a player-one-scale score into this player's own perspective.
    pub fn sign(&self) -> i32
    {
        match self
        {
            | Self::One => 1,
            | Self::Two => -1,
        }
    }
}

impl std::fmt::Display for Player
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let name = match self
        {
            | Self::One => "P1",
            | Self::Two => "P2",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Player
{
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err>
    {
        match s
        {
            | "P1" | "1" | "one" => Ok(Self::One),
            | "P2" | "2" | "two" => Ok(Self::Two),
            | _ => Err(Error::for_parse::<Self>(s.into())),
        }
    }
}
