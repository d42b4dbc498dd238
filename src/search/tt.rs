use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use crate::search::eval::Score;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// True score is at least `score`.
    Lower,
    /// True score is at most `score`.
    Upper,
}

impl Bound {
    /// Same bound seen from the opponent's side (score negated).
    pub fn flip(self) -> Self {
        match self {
            Bound::Exact => Bound::Exact,
            Bound::Lower => Bound::Upper,
            Bound::Upper => Bound::Lower,
        }
    }
}

/// One cached result. `score` is from the perspective of the side to move
/// at the keyed position, valid only for exactly `depth` remaining plies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: u64,
    pub depth: u32,
    pub score: Score,
    pub bound: Bound,
    pub gen: u32,
}

const DEFAULT_WAYS: usize = 4;
const BYTES_PER_ENTRY: usize = 64;

#[derive(Default, Clone, Copy)]
struct Slot(Option<Entry>);

#[derive(Default)]
struct Bucket {
    slots: [Slot; DEFAULT_WAYS],
}

/// Bounded, bucketed transposition cache keyed by (position identity,
/// remaining depth). Each bucket has its own lock so workers contend only
/// on colliding buckets. A cache with no buckets stores nothing.
#[derive(Default)]
pub struct Tt {
    buckets: Vec<Mutex<Bucket>>,
    gen: AtomicU32,
}

impl Tt {
    pub fn new() -> Self { Self { buckets: Vec::new(), gen: AtomicU32::new(0) } }

    pub fn with_capacity_entries(cap: usize) -> Self {
        let mut t = Self::new();
        t.set_capacity_entries(cap);
        t
    }

    pub fn with_capacity_mb(mb: usize) -> Self {
        let mut t = Self::new();
        t.set_capacity_mb(mb);
        t
    }

    fn lock(bucket: &Mutex<Bucket>) -> MutexGuard<'_, Bucket> {
        bucket.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn clear(&self) {
        for b in &self.buckets { *Self::lock(b) = Bucket::default(); }
        self.gen.store(0, Ordering::Relaxed);
    }

    fn bucket_index(&self, key: u64, depth: u32) -> usize {
        let k = key ^ (depth as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mixed = k ^ (k >> 32);
        (mixed as usize) % self.buckets.len().max(1)
    }

    pub fn get(&self, key: u64, depth: u32) -> Option<Entry> {
        if self.buckets.is_empty() { return None; }
        let idx = self.bucket_index(key, depth);
        let g = Self::lock(&self.buckets[idx]);
        g.slots.iter().filter_map(|s| s.0).find(|e| e.key == key && e.depth == depth)
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| Self::lock(b).slots.iter().filter(|s| s.0.is_some()).count()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn capacity(&self) -> usize { self.buckets.len() * DEFAULT_WAYS }

    /// Occupancy in permille, sampled over the first thousand buckets.
    pub fn hashfull(&self) -> u32 {
        let sample = self.buckets.len().min(1000);
        if sample == 0 { return 0; }
        let used: usize = self.buckets[..sample].iter()
            .map(|b| Self::lock(b).slots.iter().filter(|s| s.0.is_some()).count())
            .sum();
        (used * 1000 / (sample * DEFAULT_WAYS)) as u32
    }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        self.buckets.clear();
        if cap == 0 { return; }
        let entries = cap.max(DEFAULT_WAYS);
        let buckets = (entries + DEFAULT_WAYS - 1) / DEFAULT_WAYS;
        self.buckets.resize_with(buckets, || Mutex::new(Bucket::default()));
    }

    pub fn set_capacity_mb(&mut self, mb: usize) {
        let entries = mb.saturating_mul(1024 * 1024) / BYTES_PER_ENTRY;
        self.set_capacity_entries(entries);
    }

    pub fn put(&self, e: Entry) {
        if self.buckets.is_empty() { return; }
        let idx = self.bucket_index(e.key, e.depth);
        let mut g = Self::lock(&self.buckets[idx]);
        let mut e = e;
        e.gen = self.gen.load(Ordering::Relaxed);
        // Same (key, depth): last writer wins
        for slot in &mut g.slots {
            if let Some(cur) = slot.0 { if cur.key == e.key && cur.depth == e.depth { slot.0 = Some(e); return; } }
        }
        for slot in &mut g.slots { if slot.0.is_none() { slot.0 = Some(e); return; } }
        // Evict lowest depth, then oldest generation
        let mut victim = 0usize;
        let mut worst = (u32::MAX, u32::MAX);
        for (i, slot) in g.slots.iter().enumerate() {
            if let Some(cur) = slot.0 {
                let rank = (cur.depth, cur.gen);
                if rank < worst { worst = rank; victim = i; }
            }
        }
        g.slots[victim].0 = Some(e);
    }

    pub fn bump_generation(&self) { self.gen.fetch_add(1, Ordering::Relaxed); }
}
