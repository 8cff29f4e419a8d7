//! Union-find with path compression and union by size.

use std::collections::HashMap;
use std::hash::Hash;

/// Fired (returned) exactly once per union that actually merged two sets.
///
/// `larger` is the surviving root; on a size tie the first argument's root
/// survives and the second argument's root becomes `smaller`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetsJoined {
    pub larger: usize,
    pub smaller: usize,
}

/// Disjoint sets over the integers `0..n`.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parents: Vec<usize>,
    sizes: Vec<usize>,
    count: usize,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        Self { parents: (0..size).collect(), sizes: vec![1; size], count: size }
    }

    /// Number of distinct sets.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Root of `item`'s set; compresses the walked path.
    pub fn find(&mut self, item: usize) -> usize {
        let mut root = item;
        while self.parents[root] != root {
            root = self.parents[root];
        }
        let mut current = item;
        while current != root {
            let next = self.parents[current];
            self.parents[current] = root;
            current = next;
        }
        root
    }

    pub fn in_same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Size of the set containing `item`.
    pub fn size_of(&mut self, item: usize) -> usize {
        let root = self.find(item);
        self.sizes[root]
    }

    /// Merges the sets containing `a` and `b`. Returns the join event, or
    /// `None` when they already shared a set.
    pub fn make_union(&mut self, a: usize, b: usize) -> Option<SetsJoined> {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return None;
        }

        let (larger, smaller) =
            if self.sizes[root_a] >= self.sizes[root_b] { (root_a, root_b) } else { (root_b, root_a) };
        self.parents[smaller] = larger;
        self.sizes[larger] += self.sizes[smaller];
        self.count -= 1;
        Some(SetsJoined { larger, smaller })
    }
}

/// Disjoint sets over arbitrary hashable items, backed by the integer
/// variant.
#[derive(Clone, Debug)]
pub struct DisjointSetMap<T> {
    items: Vec<T>,
    indices: HashMap<T, usize>,
    inner: DisjointSet,
}

impl<T: Clone + Eq + Hash> DisjointSetMap<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let items: Vec<T> = items.into_iter().collect();
        let indices =
            items.iter().enumerate().map(|(index, item)| (item.clone(), index)).collect();
        let inner = DisjointSet::new(items.len());
        Self { items, indices, inner }
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// The representative item of `item`'s set, or `None` for an unknown
    /// item.
    pub fn find(&mut self, item: &T) -> Option<&T> {
        let index = *self.indices.get(item)?;
        let root = self.inner.find(index);
        Some(&self.items[root])
    }

    pub fn in_same_set(&mut self, a: &T, b: &T) -> bool {
        match (self.indices.get(a).copied(), self.indices.get(b).copied()) {
            (Some(index_a), Some(index_b)) => self.inner.in_same_set(index_a, index_b),
            _ => false,
        }
    }

    /// Merges the sets of two known items; returns the representatives from
    /// the underlying join event.
    pub fn make_union(&mut self, a: &T, b: &T) -> Option<(&T, &T)> {
        let index_a = *self.indices.get(a)?;
        let index_b = *self.indices.get(b)?;
        let joined = self.inner.make_union(index_a, index_b)?;
        Some((&self.items[joined.larger], &self.items[joined.smaller]))
    }
}
