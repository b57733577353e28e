pub(crate) mod error;
pub(crate) mod game;
pub(crate) mod search;
pub(crate) mod tictactoe;

#[allow(unused)]
pub mod prelude
{
    pub use std::str::FromStr;

    pub use log::{self};

    pub use crate::{
        error::{Error, Kind, Result},
        game::*,
        search::*,
        tictactoe::*,
    };
}
