use std::sync::atomic::{AtomicU8, Ordering};

use dashmap::DashMap;

use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How a stored score bounds the true value of its position.
pub enum TtBound
{
    Upper,
    Lower,
    Exact,
}

#[derive(Clone, Copy, Debug)]
/// The most recent evaluation of a particular position. Scores are on the
/// side-to-move's scale, like everything inside NegaMax.
pub struct TtEntry
{
    pub key:   u64,
    pub depth: u32,
    pub score: i32,
    pub bound: TtBound,
    pub age:   u8,
}

impl TtEntry
{
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

#[derive(Debug)]
/// A lock-free concurrent transposition table, fixed to a byte budget.
///
/// Entries land in `key % capacity` slots; a slot holds the deepest recent
/// entry for whatever position last claimed it, and a full-key comparison on
/// load filters out the inevitable slot collisions.
pub struct TranspositionTable
{
    map: DashMap<u64, TtEntry>,
    age: AtomicU8,
    cap: usize,
}

impl TranspositionTable
{
    /// The upper bound on the table's age counter.
    const EXTENT_AGE: u8 = 0x3F;

    /// The default memory budget.
    pub const DEFAULT_BYTES: usize = 4 * 1024 * 1024;

    /// Creates a table that fits within the given memory budget.
    pub fn new(bytes: usize) -> TranspositionTable
    {
        let cap = (bytes / TtEntry::SIZE).max(1);
        log::trace!("allocated a transposition table with {} entries ({} bytes)", cap, bytes);

        TranspositionTable {
            map: DashMap::with_capacity(cap),
            age: AtomicU8::new(0),
            cap,
        }
    }

    /// Advances the age; called once per top-level search so stale entries
    /// lose their replacement priority.
    pub fn increment(&self)
    {
        let new = Self::EXTENT_AGE & (self.age.load(Ordering::Relaxed) + 1);
        self.age.store(new, Ordering::Relaxed);
    }

    /// Checks whether a stored score settles this node, narrowing the window
    /// bounds in passing. Returns the settled score on a hit.
    pub fn check(&self, key: u64, depth: u32, alpha: &mut i32, beta: &mut i32) -> Option<i32>
    {
        let hit = self.load(key)?;

        // Only trust depths at least as deep as what we are about to search.
        if hit.depth >= depth
        {
            match hit.bound
            {
                | TtBound::Exact => return Some(hit.score),
                | TtBound::Lower =>
                {
                    *alpha = (*alpha).max(hit.score);
                }
                | TtBound::Upper =>
                {
                    *beta = (*beta).min(hit.score);
                }
            };

            if *alpha >= *beta
            {
                return Some(hit.score);
            }
        }
        None
    }

    /// Finds the entry for this position, if one survives in its slot.
    pub fn load(&self, key: u64) -> Option<TtEntry>
    {
        self.map.get(&self.slot(key)).map(|entry| *entry).filter(|entry| entry.key == key)
    }

    /// Stores a new evaluation, respecting depth and age replacement priority.
    pub fn store(&self, entry: TtEntry)
    {
        let mut entry = entry;
        entry.age = self.age.load(Ordering::Relaxed);

        let slot = self.slot(entry.key);
        let existing = self.map.get(&slot).map(|prev| *prev);

        match existing
        {
            | Some(prev) =>
            {
                if entry.key != prev.key
                    || (entry.bound == TtBound::Exact && prev.bound != TtBound::Exact)
                    || self.should_overwrite(&prev, &entry)
                {
                    self.map.insert(slot, entry);
                }
            }
            | None =>
            {
                self.map.insert(slot, entry);
            }
        };
    }

    pub fn len(&self) -> usize
    {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.map.is_empty()
    }

    /// The slot index for a key, so the map never outgrows its budget.
    fn slot(&self, key: u64) -> u64
    {
        key % (self.cap as u64)
    }

    /// Whether to overwrite an entry, by age then depth priority.
    fn should_overwrite(&self, prev: &TtEntry, next: &TtEntry) -> bool
    {
        prev.age != self.age.load(Ordering::Relaxed) || next.depth >= prev.depth
    }
}
