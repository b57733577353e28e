use std::sync::{
    atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering},
    Condvar, Mutex,
};

#[derive(Debug, Default)]
/// The cooperative switchboard between a running search and the thread that
/// launched it. Strategies poll `checkpoint` at every per-node loop iteration;
/// the foreground flips the flags.
///
/// A paused worker parks on a condvar rather than spinning, and an interrupt
/// wakes it so the recursion can unwind with its best answer.
pub struct SearchControl
{
    paused:      Mutex<bool>,
    resumed:     Condvar,
    interrupted: AtomicBool,
}

impl SearchControl
{
    pub fn new() -> SearchControl
    {
        SearchControl::default()
    }

    /// Asks the worker to block at its next checkpoint.
    pub fn pause(&self)
    {
        *self.paused.lock().unwrap() = true;
    }

    /// Lets a paused worker continue from exactly where it stopped.
    pub fn continue_processing(&self)
    {
        *self.paused.lock().unwrap() = false;
        self.resumed.notify_all();
    }

    /// Asks the worker to unwind with the best answer it has. Also releases a
    /// paused worker so it can do so.
    pub fn interrupt(&self)
    {
        self.interrupted.store(true, Ordering::SeqCst);
        self.continue_processing();
    }

    pub fn is_paused(&self) -> bool
    {
        *self.paused.lock().unwrap()
    }

    pub fn is_interrupted(&self) -> bool
    {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Blocks while paused, then reports whether the search should abort.
    /// Never called between a make and its matching undo.
    pub fn checkpoint(&self) -> bool
    {
        let mut paused = self.paused.lock().unwrap();
        while *paused && !self.is_interrupted()
        {
            paused = self.resumed.wait(paused).unwrap();
        }
        self.is_interrupted()
    }
}

#[derive(Debug, Default)]
/// Observable counters a search updates as it runs. Readable from any thread
/// while the worker appends.
pub struct SearchProgress
{
    moves_considered: AtomicU64,
    percent_done:     AtomicU32,
    top_level_moves:  AtomicUsize,
}

impl SearchProgress
{
    pub fn new() -> SearchProgress
    {
        SearchProgress::default()
    }

    /// Counts freshly generated candidate moves.
    pub fn add_considered(&self, count: u64)
    {
        self.moves_considered.fetch_add(count, Ordering::Relaxed);
    }

    /// The number of moves considered so far.
    pub fn moves_considered(&self) -> u64
    {
        self.moves_considered.load(Ordering::Relaxed)
    }

    /// Approximate share of the search completed, 0 to 100. Approximate
    /// because pruning can speed the search up considerably toward the end.
    pub fn percent_done(&self) -> u32
    {
        self.percent_done.load(Ordering::Relaxed)
    }

    pub fn set_percent_done(&self, percent: u32)
    {
        self.percent_done.store(percent.min(100), Ordering::Relaxed);
    }

    /// Records progress through the top ply, which is what drives the
    /// percentage for the brute-force strategies.
    pub fn update_top_level(&self, finished: usize, total: usize)
    {
        self.top_level_moves.store(total, Ordering::Relaxed);
        if total > 0
        {
            self.set_percent_done((100 * finished / total) as u32);
        }
    }

    /// The number of candidate moves at the top ply.
    pub fn top_level_moves(&self) -> usize
    {
        self.top_level_moves.load(Ordering::Relaxed)
    }
}
