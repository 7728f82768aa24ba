//! Generic tuple stores used throughout the reasoning pipeline.
//!
//! `PairStore` and `TripletStore` are append-only (within a single
//! construction pass) sets of tuples with secondary indices that make the
//! specific lookups the completion engine and query evaluator need - "all
//! `B` with a given first component", "all `C` with a given first two
//! components" - O(1) amortized instead of a linear scan.

use hashbrown::{HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct PairStore<A, B> {
    set: HashSet<(A, B)>,
    by_first: HashMap<A, Vec<B>>,
}

impl<A, B> Default for PairStore<A, B> {
    fn default() -> Self {
        PairStore { set: HashSet::new(), by_first: HashMap::new() }
    }
}

impl<A: Copy + Eq + Hash, B: Copy + Eq + Hash> PairStore<A, B> {
    /// Returns `true` if `(a, b)` was not already present.
    pub fn add(&mut self, a: A, b: B) -> bool {
        if self.set.insert((a, b)) {
            self.by_first.entry(a).or_default().push(b);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, a: A, b: B) -> bool {
        self.set.contains(&(a, b))
    }

    pub fn contains_all(&self, a: A, bs: &[B]) -> bool {
        bs.iter().all(|b| self.contains(a, *b))
    }

    pub fn pairs_with_first(&self, a: A) -> impl Iterator<Item = B> + '_ {
        self.by_first.get(&a).into_iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(A, B)> {
        self.set.iter()
    }
}

#[derive(Debug, Clone)]
pub struct TripletStore<A, B, C> {
    set: HashSet<(A, B, C)>,
    by_first: HashMap<A, Vec<(B, C)>>,
    by_first_two: HashMap<(A, B), Vec<C>>,
}

impl<A, B, C> Default for TripletStore<A, B, C> {
    fn default() -> Self {
        TripletStore { set: HashSet::new(), by_first: HashMap::new(), by_first_two: HashMap::new() }
    }
}

impl<A: Copy + Eq + Hash, B: Copy + Eq + Hash, C: Copy + Eq + Hash> TripletStore<A, B, C> {
    pub fn add(&mut self, a: A, b: B, c: C) -> bool {
        if self.set.insert((a, b, c)) {
            self.by_first.entry(a).or_default().push((b, c));
            self.by_first_two.entry((a, b)).or_default().push(c);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, a: A, b: B, c: C) -> bool {
        self.set.contains(&(a, b, c))
    }

    pub fn triples_with_first(&self, a: A) -> impl Iterator<Item = (B, C)> + '_ {
        self.by_first.get(&a).into_iter().flatten().copied()
    }

    pub fn triples_with_first_two(&self, a: A, b: B) -> impl Iterator<Item = C> + '_ {
        self.by_first_two.get(&(a, b)).into_iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(A, B, C)> {
        self.set.iter()
    }
}
