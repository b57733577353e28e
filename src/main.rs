use std::sync::Arc;

use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use itertools::Itertools;
use ponder::prelude::*;

#[derive(Clone, Parser, Debug)]
#[command(version, about, long_about = None)]
/// Plays tic-tac-toe against itself with the configured search strategies.
pub struct DemoOptions
{
    #[arg(short, long, value_enum, default_value_t = StrategyKind::NegaMax)]
    /// search strategy for player one
    pub strategy: StrategyKind,

    #[arg(long, value_enum)]
    /// search strategy for player two (defaults to player one's)
    pub opponent: Option<StrategyKind>,

    #[arg(short = 'd', long, default_value_t = 6)]
    /// plies of lookahead for the brute-force strategies
    pub look_ahead: u32,

    #[arg(long, default_value_t = false)]
    /// disable alpha-beta pruning
    pub no_pruning: bool,

    #[arg(long, default_value_t = false)]
    /// extend the search in unstable positions
    pub quiescence: bool,

    #[arg(short = 'n', long, default_value_t = 2000)]
    /// simulation budget for the Monte-Carlo strategy
    pub simulations: u32,

    #[arg(short, long, default_value = "info")]
    /// lowest log level to show
    pub log_level: String,

    #[arg(short, long)]
    /// evaluation coefficients, colon-separated (e.g. 1:8)
    pub weights: Option<String>,
}

fn main() -> Result<()>
{
    // Read the dotenv file.
    dotenvy::dotenv().ok();

    // Parse the cli options.
    let options = DemoOptions::parse();

    // Set the logger to write-and-flush so that it doesn't compete with the search worker.
    let _logger = Logger::try_with_env_or_str(options.log_level.clone())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(AdaptiveFormat::WithThread)
        .start()?;

    print_header();

    if let Err(e) = run(options)
    {
        log::error!("fatal error: {}", e);
    }

    Ok(())
}

fn print_header()
{
    log::info!("starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

fn run(options: DemoOptions) -> Result<()>
{
    let weights = match &options.weights
    {
        | Some(raw) => raw.parse::<Weights>()?,
        | None => TicTacToe::default_weights(),
    };

    let mut master = TicTacToe::new(SearchOptions::default());
    let mut last_move = Move::pass(Player::Two);

    println!("{}", master);

    loop
    {
        let to_move = last_move.replier();
        let search_options = search_options_for(to_move, &options);

        let candidates = master.generate_moves(&last_move, &weights, true);
        log::debug!("candidates for {}: {}", to_move, candidates.iter().join(", "));

        // Each search owns its own copy of the board.
        let mut probe = master.clone();
        probe.set_options(search_options);

        let runner = SearchRunner::launch(Box::new(probe), last_move.clone(), weights.clone(), Arc::new(NullSink))?;
        let outcome = runner.join()?;

        let Some(best) = outcome.best
        else
        {
            log::info!("no move available; the game is already over");
            return Ok(());
        };

        log::info!("{} plays {}", to_move, best);
        master.make_move(&best);
        last_move = best;

        println!("{}", master);

        if master.is_terminal(&last_move, true)
        {
            match master.recorded_winner()
            {
                | Some(winner) => log::info!("{} wins as {}", winner, search_options.strategy),
                | None => log::info!("drawn game"),
            }
            return Ok(());
        }
    }
}

fn search_options_for(player: Player, options: &DemoOptions) -> SearchOptions
{
    let kind = match player
    {
        | Player::One => options.strategy,
        | Player::Two => options.opponent.unwrap_or(options.strategy),
    };

    let mut search_options = SearchOptions::with_strategy(kind);
    search_options.brute.look_ahead = options.look_ahead;
    search_options.brute.alpha_beta = !options.no_pruning;
    search_options.brute.quiescence = options.quiescence;
    search_options.monte_carlo.max_simulations = options.simulations;
    search_options
}
