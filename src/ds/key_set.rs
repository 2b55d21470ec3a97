//! Hash-backed set algebra over comparable keys.
//!
//! `KeySet` is the bucket type used by the index engine: for every indexed
//! value, one `KeySet` holds the keys of all objects currently producing that
//! value. It is also usable on its own for plain set algebra.
//!
//! ## Operations
//!
//! | Operation                        | Complexity |
//! |----------------------------------|------------|
//! | `insert` / `remove` / `has`      | O(1)       |
//! | `union` / `difference`           | O(n)       |
//! | `intersection`                   | O(min(n, m)) |
//! | `is_superset` / `==`             | O(n)       |
//! | `unsorted_list`                  | O(n)       |
//! | `sorted_by`                      | O(n log n) |
//!
//! Each set owns its own storage; there is no shared state between sets.
//!
//! ## Example Usage
//!
//! ```
//! use indexcache::ds::KeySet;
//!
//! let a: KeySet<u32> = [1, 2, 3].into_iter().collect();
//! let b: KeySet<u32> = [2, 3, 4].into_iter().collect();
//!
//! assert_eq!(a.intersection(&b), [2, 3].into_iter().collect());
//! assert_eq!(a.union(&b).len(), 4);
//! assert!(a.union(&b).is_superset(&a));
//! ```

use std::hash::Hash;

use rustc_hash::FxHashSet;

/// A hash set of keys with set-algebra helpers.
#[derive(Debug, Clone)]
pub struct KeySet<T> {
    items: FxHashSet<T>,
}

// Derived PartialEq would only require T: PartialEq, which is too weak for
// the FxHashSet field; equality needs the full Eq + Hash bound.
impl<T: Eq + Hash> PartialEq for KeySet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq + Hash> Eq for KeySet<T> {}

impl<T> KeySet<T>
where
    T: Eq + Hash + Clone,
{
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            items: FxHashSet::default(),
        }
    }

    /// Creates an empty set with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Builds a set from the keys of a mapping (or any key iterator).
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use indexcache::ds::KeySet;
    ///
    /// let map = HashMap::from([("a", 1), ("b", 2)]);
    /// let keys = KeySet::from_map_keys(map.keys());
    /// assert!(keys.has(&"a"));
    /// assert!(keys.has(&"b"));
    /// assert_eq!(keys.len(), 2);
    /// ```
    pub fn from_map_keys<'a, It>(keys: It) -> Self
    where
        T: 'a,
        It: IntoIterator<Item = &'a T>,
    {
        keys.into_iter().cloned().collect()
    }

    /// Adds an item; returns `true` if it was not already present.
    pub fn insert(&mut self, item: T) -> bool {
        self.items.insert(item)
    }

    /// Removes an item; returns `true` if it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        self.items.remove(item)
    }

    /// Returns `true` if the item is in the set.
    pub fn has(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Returns `true` if every given item is in the set.
    pub fn has_all<'a>(&self, items: impl IntoIterator<Item = &'a T>) -> bool
    where
        T: 'a,
    {
        items.into_iter().all(|item| self.has(item))
    }

    /// Returns `true` if any given item is in the set.
    pub fn has_any<'a>(&self, items: impl IntoIterator<Item = &'a T>) -> bool
    where
        T: 'a,
    {
        items.into_iter().any(|item| self.has(item))
    }

    /// Returns a new set with the items of both sets.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            items: self.items.union(&other.items).cloned().collect(),
        }
    }

    /// Returns a new set with the items present in both sets.
    pub fn intersection(&self, other: &Self) -> Self {
        // Walk the smaller side.
        let (walk, probe) = if self.len() < other.len() {
            (self, other)
        } else {
            (other, self)
        };
        Self {
            items: walk.items.iter().filter(|i| probe.has(i)).cloned().collect(),
        }
    }

    /// Returns a new set with the items of `self` that are not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            items: self.items.difference(&other.items).cloned().collect(),
        }
    }

    /// Returns `true` if every item of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        self.items.is_superset(&other.items)
    }

    /// Removes and returns an arbitrary item.
    pub fn pop_any(&mut self) -> Option<T> {
        let item = self.items.iter().next().cloned()?;
        self.items.remove(&item);
        Some(item)
    }

    /// Returns the number of items in the set.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Returns the items as a vector in arbitrary order.
    pub fn unsorted_list(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    /// Returns the items as a vector ordered by a strict less-than predicate.
    pub fn sorted_by(&self, less: &dyn Fn(&T, &T) -> bool) -> Vec<T> {
        let mut list = self.unsorted_list();
        list.sort_unstable_by(|lhs, rhs| {
            if less(lhs, rhs) {
                std::cmp::Ordering::Less
            } else if less(rhs, lhs) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });
        list
    }
}

impl<T: Eq + Hash + Clone> Default for KeySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for KeySet<T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for KeySet<T> {
    fn extend<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        self.items.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[i32]) -> KeySet<i32> {
        items.iter().copied().collect()
    }

    #[test]
    fn insert_remove_has() {
        let mut s = KeySet::new();
        assert!(s.insert(1));
        assert!(!s.insert(1));
        assert!(s.has(&1));
        assert!(s.remove(&1));
        assert!(!s.remove(&1));
        assert!(s.is_empty());
    }

    #[test]
    fn has_all_and_has_any() {
        let s = set(&[1, 2, 3]);
        assert!(s.has_all(&[1, 2]));
        assert!(!s.has_all(&[1, 4]));
        assert!(s.has_any(&[4, 2]));
        assert!(!s.has_any(&[4, 5]));
        // Vacuous truth over an empty probe list.
        assert!(s.has_all(&[]));
        assert!(!s.has_any(&[]));
    }

    #[test]
    fn union_intersection_difference() {
        let a = set(&[1, 2, 3]);
        let b = set(&[3, 4]);

        assert_eq!(a.union(&b), set(&[1, 2, 3, 4]));
        assert_eq!(a.intersection(&b), set(&[3]));
        assert_eq!(a.difference(&b), set(&[1, 2]));
        assert_eq!(b.difference(&a), set(&[4]));
    }

    #[test]
    fn intersection_walks_smaller_side() {
        let small = set(&[2]);
        let large = set(&[1, 2, 3, 4, 5]);
        assert_eq!(small.intersection(&large), set(&[2]));
        assert_eq!(large.intersection(&small), set(&[2]));
    }

    #[test]
    fn superset_and_equality() {
        let a = set(&[1, 2, 3]);
        assert!(a.is_superset(&set(&[1, 2])));
        assert!(a.is_superset(&a.clone()));
        assert!(!set(&[1, 2]).is_superset(&a));
        assert_eq!(a, set(&[3, 2, 1]));
        assert_ne!(a, set(&[1, 2]));
    }

    #[test]
    fn equality_needs_only_eq_and_hash() {
        // A key type that is Eq + Hash but neither Ord nor Default.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        struct Tag(&'static str);

        let a: KeySet<Tag> = [Tag("x"), Tag("y")].into_iter().collect();
        let b: KeySet<Tag> = [Tag("y"), Tag("x")].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, [Tag("x")].into_iter().collect::<KeySet<_>>());
    }

    #[test]
    fn from_map_keys_extracts_keys() {
        let map = std::collections::HashMap::from([(1, "a"), (2, "b"), (3, "c")]);
        let keys = KeySet::from_map_keys(map.keys());
        assert_eq!(keys, set(&[1, 2, 3]));
    }

    #[test]
    fn pop_any_drains_the_set() {
        let mut s = set(&[1, 2]);
        let mut popped = Vec::new();
        while let Some(item) = s.pop_any() {
            popped.push(item);
        }
        popped.sort_unstable();
        assert_eq!(popped, vec![1, 2]);
        assert!(s.pop_any().is_none());
    }

    #[test]
    fn sorted_by_orders_with_less_predicate() {
        let s = set(&[3, 1, 2]);
        assert_eq!(s.sorted_by(&|a, b| a < b), vec![1, 2, 3]);
        assert_eq!(s.sorted_by(&|a, b| a > b), vec![3, 2, 1]);
    }

    #[test]
    fn unsorted_list_returns_all_items() {
        let mut list = set(&[5, 6, 7]).unsorted_list();
        list.sort_unstable();
        assert_eq!(list, vec![5, 6, 7]);
    }
}
