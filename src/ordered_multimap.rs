//! # OrderedMultimap
//!
//! This module implements an associative multimap that keeps its rows in a
//! single vector, sorted by key.
//!
//! Lookups are binary searches (`O(log n)`) and iteration is a linear walk
//! over contiguous memory. The price is paid on mutation: inserting or
//! removing a single row shifts every row behind it (`O(n)`). Batches should
//! go through [`OrderedMultimap::insert_all`], which appends and re-sorts once.
//!
//! Several rows may share a key. A freshly inserted row is placed at the
//! lower bound of its key, in front of any rows that already carry it.
//!
//! ## Positions
//!
//! Positions handed out by this module (`lower_bound`, `equal_range`,
//! `insert`, ...) are plain indices into the sorted row vector. They are
//! **not** stable: any mutating call may shift or invalidate them.
//!
//! ## Example
//!
//! ```rust
//! use sorted_table::ordered_multimap::OrderedMultimap;
//!
//! let mut table = OrderedMultimap::new();
//! table.insert(3, "c");
//! table.insert(1, "a");
//! table.insert(2, "b");
//! table.insert(2, "b2");
//!
//! assert_eq!(table.len(), 4);
//! assert_eq!(table.count(&2), 2);
//! assert_eq!(table.equal_range(&2), 1..3);
//! assert!(table.keys().copied().eq([1, 2, 2, 3]));
//!
//! assert_eq!(table.remove(&1), "a");
//! assert!(!table.contains(&1));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::ops::{Index, Range};

use log::trace;

use crate::error::TableError;
use crate::iter::{Drain, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

/// A stored key-value pair.
pub type Row<K, V> = (K, V);

/// An associative multimap backed by a vector of rows sorted by key.
///
/// Keys are ordered by their [`Ord`] implementation. Rows with equal keys
/// are adjacent; their relative order is unspecified.
///
/// Keys are never handed out mutably, so safe code cannot break the
/// ordering. Values can be changed in place through [`get_mut`],
/// [`iter_mut`], [`values_mut`] and friends.
///
/// [`get_mut`]: Self::get_mut
/// [`iter_mut`]: Self::iter_mut
/// [`values_mut`]: Self::values_mut
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OrderedMultimap<K, V> {
    rows: Vec<Row<K, V>>,
}

impl<K, V> OrderedMultimap<K, V> {
    /// Creates an empty table. Does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Creates an empty table with room for at least `capacity` rows.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows the table can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.rows.capacity()
    }

    /// Reserves room for at least `additional` more rows.
    pub fn reserve(&mut self, additional: usize) {
        self.rows.reserve(additional);
    }

    /// Shrinks the capacity as close to `len()` as possible.
    pub fn shrink_to_fit(&mut self) {
        self.rows.shrink_to_fit();
    }

    /// Removes all rows. Keeps the allocated capacity.
    pub fn clear(&mut self) {
        trace!("clear: dropping {} rows", self.rows.len());
        self.rows.clear();
    }

    /// Returns the rows as a sorted slice.
    #[inline]
    pub fn as_slice(&self) -> &[Row<K, V>] {
        &self.rows
    }

    /// Consumes the table and returns its rows, sorted by key.
    pub fn into_vec(self) -> Vec<Row<K, V>> {
        self.rows
    }

    /// Returns the row at `index`, or `None` if out of bounds.
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.rows.get(index).map(|(key, value)| (key, value))
    }

    /// Returns the row at `index` with a mutable value, or `None` if out of bounds.
    pub fn get_index_mut(&mut self, index: usize) -> Option<(&K, &mut V)> {
        self.rows.get_mut(index).map(|(key, value)| (&*key, value))
    }

    /// Returns the row with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.get_index(0)
    }

    /// Returns the row with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.rows.last().map(|(key, value)| (key, value))
    }

    /// Removes and returns the row at `index`, shifting later rows down.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`. Use [`try_erase`](Self::try_erase) when
    /// the position may be stale.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> Row<K, V> {
        match self.try_erase(index) {
            Ok(row) => row,
            Err(err) => panic!("erase: {}", err),
        }
    }

    /// Removes and returns the row at `index`, or fails if there is none.
    pub fn try_erase(&mut self, index: usize) -> Result<Row<K, V>, TableError> {
        if index >= self.rows.len() {
            return Err(TableError::IndexOutOfBounds {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Keeps only the rows for which `keep` returns `true`.
    ///
    /// Rows are visited in order; relative order of the survivors is kept.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.rows.retain_mut(|(key, value)| keep(key, value));
    }

    /// Removes every row and returns them in order.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain::new(self.rows.drain(..))
    }

    /// Iterates over all rows in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.rows)
    }

    /// Iterates over all rows in ascending key order, with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.rows)
    }

    /// Iterates over the keys, duplicates included.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(&self.rows)
    }

    /// Iterates over the values in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(&self.rows)
    }

    /// Iterates mutably over the values in key order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(&mut self.rows)
    }
}

impl<K: Ord, V> OrderedMultimap<K, V> {
    /// Builds a table from rows in any order.
    pub fn from_rows(mut rows: Vec<Row<K, V>>) -> Self {
        sort_rows(&mut rows);
        Self { rows }
    }

    /// Inserts a row and returns its position.
    ///
    /// The row lands at the lower bound of `key`, i.e. in front of any rows
    /// that already share the key. Existing rows are never replaced.
    ///
    /// This operation is `O(n)`.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        let index = self.lower_bound(&key);
        self.rows.insert(index, (key, value));
        index
    }

    /// Inserts a row holding `V::default()` and returns its position.
    pub fn insert_default(&mut self, key: K) -> usize
    where
        V: Default,
    {
        self.insert(key, V::default())
    }

    /// Moves every row out of `rows` into the table, then re-sorts once.
    ///
    /// `rows` is left empty but keeps its allocation. This is `O(n log n)`
    /// for the whole batch rather than `O(n)` per row.
    ///
    /// Among rows with equal keys the resulting order is unspecified.
    pub fn insert_all(&mut self, rows: &mut Vec<Row<K, V>>) {
        let added = rows.len();
        if added == 0 {
            return;
        }
        self.rows.append(rows);
        sort_rows(&mut self.rows);
        trace!(
            "insert_all: added {} rows, table now holds {}",
            added,
            self.rows.len()
        );
    }

    /// Removes the first row with `key` and returns its value.
    ///
    /// # Panics
    ///
    /// Panics if no row has `key`. Check with [`contains`](Self::contains)
    /// first or use [`try_remove`](Self::try_remove).
    #[track_caller]
    pub fn remove<Q>(&mut self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.try_remove(key) {
            Ok(value) => value,
            Err(err) => panic!("remove: {}", err),
        }
    }

    /// Removes the first row with `key` and returns its value, or fails if
    /// there is none.
    pub fn try_remove<Q>(&mut self, key: &Q) -> Result<V, TableError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find(key).ok_or(TableError::KeyNotFound)?;
        Ok(self.rows.remove(index).1)
    }

    /// Removes every row with `key` and returns their values in storage order.
    pub fn remove_all<Q>(&mut self, key: &Q) -> Vec<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let range = self.equal_range(key);
        self.rows.drain(range).map(|(_, value)| value).collect()
    }

    /// Returns `true` if at least one row has `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the number of rows with `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.equal_range(key).len()
    }

    /// Returns the value of the first row with `key`.
    ///
    /// With duplicate keys only the first row is reachable this way; use
    /// [`equal_range_rows`](Self::equal_range_rows) to see all of them.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|index| &self.rows[index].1)
    }

    /// Returns the key and value of the first row with `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|index| {
            let (key, value) = &self.rows[index];
            (key, value)
        })
    }

    /// Returns the value of the first row with `key`, mutably.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find(key)?;
        Some(&mut self.rows[index].1)
    }

    /// Returns the value of the first row with `key`, inserting
    /// `(key, default())` first if there is none.
    ///
    /// Calling this twice with the same missing key creates exactly one row.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let index = self.lower_bound(&key);
        let found = self.rows.get(index).is_some_and(|(k, _)| *k == key);
        if !found {
            self.rows.insert(index, (key, default()));
        }
        &mut self.rows[index].1
    }

    /// Returns the value of the first row with `key`, inserting
    /// `(key, V::default())` first if there is none.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Returns the position of the first row whose key is not less than `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rows.partition_point(|(k, _)| k.borrow() < key)
    }

    /// Returns the position of the first row whose key is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rows.partition_point(|(k, _)| k.borrow() <= key)
    }

    /// Returns the positions `lower_bound(key)..upper_bound(key)`, spanning
    /// every row with `key`. The range is empty if there is none.
    pub fn equal_range<Q>(&self, key: &Q) -> Range<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let start = self.lower_bound(key);
        let end = start + self.rows[start..].partition_point(|(k, _)| k.borrow() <= key);
        start..end
    }

    /// Returns every row with `key` as a slice.
    pub fn equal_range_rows<Q>(&self, key: &Q) -> &[Row<K, V>]
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let range = self.equal_range(key);
        &self.rows[range]
    }

    /// Iterates mutably over the values of every row with `key`.
    pub fn equal_range_values_mut<Q>(&mut self, key: &Q) -> ValuesMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let range = self.equal_range(key);
        ValuesMut::new(&mut self.rows[range])
    }

    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.lower_bound(key);
        self.rows
            .get(index)
            .filter(|(k, _)| k.borrow() == key)
            .map(|_| index)
    }
}

fn sort_rows<K: Ord, V>(rows: &mut [Row<K, V>]) {
    rows.sort_by(|(a, _), (b, _)| a.cmp(b));
}

impl<K, V> Default for OrderedMultimap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMultimap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Read-only lookup of the first row with `key`.
///
/// # Panics
///
/// Panics if no row has `key`. Use [`OrderedMultimap::get`] for a checked
/// lookup.
impl<K, V, Q> Index<&Q> for OrderedMultimap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    #[track_caller]
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("index: {}", TableError::KeyNotFound),
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMultimap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterable: I) -> Self {
        Self::from_rows(iterable.into_iter().collect())
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMultimap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        let mut rows: Vec<_> = iterable.into_iter().collect();
        self.insert_all(&mut rows);
    }
}

impl<'a, K, V> Extend<(&'a K, &'a V)> for OrderedMultimap<K, V>
where
    K: Ord + Copy,
    V: Copy,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iterable: I) {
        self.extend(iterable.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K: Ord, V> From<Vec<Row<K, V>>> for OrderedMultimap<K, V> {
    fn from(rows: Vec<Row<K, V>>) -> Self {
        Self::from_rows(rows)
    }
}

impl<K: Ord, V, const N: usize> From<[Row<K, V>; N]> for OrderedMultimap<K, V> {
    fn from(rows: [Row<K, V>; N]) -> Self {
        Self::from_rows(Vec::from(rows))
    }
}

impl<K, V> From<OrderedMultimap<K, V>> for Vec<Row<K, V>> {
    fn from(table: OrderedMultimap<K, V>) -> Self {
        table.into_vec()
    }
}

impl<K, V> IntoIterator for OrderedMultimap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.rows)
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMultimap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut OrderedMultimap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
