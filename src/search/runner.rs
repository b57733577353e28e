use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crate::prelude::*;

/// What a finished search hands back: the searchable, returned to the
/// caller's ownership, and the selected move if the game was not already over.
pub struct SearchOutcome
{
    pub searchable: Box<dyn Searchable>,
    pub best:       Option<Move>,
}

/// Executes one search on a dedicated worker thread so the caller (and any UI)
/// is never blocked, with cooperative pause and cancellation.
///
/// The runner owns the searchable for the lifetime of the search; nothing else
/// may touch the board until `join` hands it back. Launch a second runner on a
/// clone if two searches must overlap.
pub struct SearchRunner
{
    control:  Arc<SearchControl>,
    progress: Arc<SearchProgress>,
    worker:   Option<JoinHandle<SearchOutcome>>,
}

impl SearchRunner
{
    /// Starts a search for the best reply to `last_move` on a fresh worker,
    /// using the strategy the searchable's own options ask for.
    pub fn launch(searchable: Box<dyn Searchable>, last_move: Move, weights: Weights, sink: Arc<dyn TreeSink>) -> Result<SearchRunner>
    {
        let control = Arc::new(SearchControl::new());
        let progress = Arc::new(SearchProgress::new());

        let context = SearchContext {
            weights,
            control: control.clone(),
            progress: progress.clone(),
            sink,
        };

        let kind = searchable.options().strategy;
        let mut strategy = kind.create(context);
        let mut searchable = searchable;

        let worker = thread::Builder::new().name("ponder-search".into()).spawn(move || {
            log::debug!("search worker starting ({})", kind);

            let best = strategy.search(searchable.as_mut(), last_move, SearchWindow::default());

            match &best
            {
                | Some(mv) => log::debug!("search worker finished: {}", mv),
                | None => log::debug!("search worker finished with no move"),
            }

            SearchOutcome { searchable, best }
        })?;

        Ok(SearchRunner {
            control,
            progress,
            worker: Some(worker),
        })
    }

    /// Whether the worker is still searching.
    pub fn is_processing(&self) -> bool
    {
        self.worker.as_ref().map(|worker| !worker.is_finished()).unwrap_or(false)
    }

    /// Blocks the worker at its next checkpoint without discarding anything.
    pub fn pause(&self)
    {
        self.control.pause();
    }

    /// Resumes a paused worker from exactly where it stopped.
    pub fn continue_processing(&self)
    {
        self.control.continue_processing();
    }

    pub fn is_paused(&self) -> bool
    {
        self.control.is_paused()
    }

    /// Asks the worker to unwind cleanly with the best answer it has so far.
    pub fn interrupt(&self)
    {
        self.control.interrupt();
    }

    pub fn moves_considered(&self) -> u64
    {
        self.progress.moves_considered()
    }

    pub fn percent_done(&self) -> u32
    {
        self.progress.percent_done()
    }

    /// Blocks until the worker completes and returns the outcome.
    pub fn join(mut self) -> Result<SearchOutcome>
    {
        let worker = self.worker.take().expect("a runner is joined at most once");
        worker.join().map_err(|_| Error::new(Kind::InternalError, "search worker panicked".into()))
    }
}
