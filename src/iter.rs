//! Iterator types for [`OrderedMultimap`].
//!
//! Every iterator walks the rows in ascending key order. Rows with equal keys
//! appear in their storage order, which is unspecified.
//!
//! [`OrderedMultimap`]: crate::OrderedMultimap

use std::fmt;
use std::iter::FusedIterator;
use std::{slice, vec};

use crate::ordered_multimap::Row;

fn refs<K, V>((key, value): &Row<K, V>) -> (&K, &V) {
    (key, value)
}

fn ref_mut<K, V>((key, value): &mut Row<K, V>) -> (&K, &mut V) {
    (key, value)
}

fn key_ref<K, V>((key, _): &Row<K, V>) -> &K {
    key
}

fn value_ref<K, V>((_, value): &Row<K, V>) -> &V {
    value
}

fn value_mut<K, V>((_, value): &mut Row<K, V>) -> &mut V {
    value
}

// Forwards the iterator traits to the wrapped `self.rows`, mapping every
// element through `$map`.
macro_rules! iterator_methods {
    ($map:expr) => {
        #[inline]
        fn next(&mut self) -> Option<Self::Item> {
            self.rows.next().map($map)
        }

        #[inline]
        fn size_hint(&self) -> (usize, Option<usize>) {
            self.rows.size_hint()
        }

        #[inline]
        fn count(self) -> usize {
            self.rows.len()
        }

        #[inline]
        fn nth(&mut self, n: usize) -> Option<Self::Item> {
            self.rows.nth(n).map($map)
        }

        #[inline]
        fn last(mut self) -> Option<Self::Item> {
            self.next_back()
        }
    };
}

macro_rules! double_ended_iterator_methods {
    ($map:expr) => {
        #[inline]
        fn next_back(&mut self) -> Option<Self::Item> {
            self.rows.next_back().map($map)
        }

        #[inline]
        fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
            self.rows.nth_back(n).map($map)
        }
    };
}

/// An iterator over the rows of an [`OrderedMultimap`].
///
/// This `struct` is created by [`OrderedMultimap::iter`].
///
/// [`OrderedMultimap`]: crate::OrderedMultimap
pub struct Iter<'a, K, V> {
    rows: slice::Iter<'a, Row<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(rows: &'a [Row<K, V>]) -> Self {
        Self { rows: rows.iter() }
    }

    /// Returns the rows not yet yielded as a slice.
    pub fn as_slice(&self) -> &'a [Row<K, V>] {
        self.rows.as_slice()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    iterator_methods!(refs);
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    double_ended_iterator_methods!(refs);
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            rows: self.rows.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A mutable iterator over the rows of an [`OrderedMultimap`].
///
/// Keys are only handed out by shared reference so the sort order cannot be
/// disturbed through this iterator.
///
/// This `struct` is created by [`OrderedMultimap::iter_mut`].
///
/// [`OrderedMultimap`]: crate::OrderedMultimap
pub struct IterMut<'a, K, V> {
    rows: slice::IterMut<'a, Row<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(rows: &'a mut [Row<K, V>]) -> Self {
        Self {
            rows: rows.iter_mut(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    iterator_methods!(ref_mut);
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    double_ended_iterator_methods!(ref_mut);
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows.as_slice().iter().map(refs))
            .finish()
    }
}

/// An iterator over the keys of an [`OrderedMultimap`], duplicates included.
///
/// This `struct` is created by [`OrderedMultimap::keys`].
///
/// [`OrderedMultimap`]: crate::OrderedMultimap
pub struct Keys<'a, K, V> {
    rows: slice::Iter<'a, Row<K, V>>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(rows: &'a [Row<K, V>]) -> Self {
        Self { rows: rows.iter() }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    iterator_methods!(key_ref);
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    double_ended_iterator_methods!(key_ref);
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            rows: self.rows.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the values of an [`OrderedMultimap`].
///
/// This `struct` is created by [`OrderedMultimap::values`].
///
/// [`OrderedMultimap`]: crate::OrderedMultimap
pub struct Values<'a, K, V> {
    rows: slice::Iter<'a, Row<K, V>>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(rows: &'a [Row<K, V>]) -> Self {
        Self { rows: rows.iter() }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    iterator_methods!(value_ref);
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    double_ended_iterator_methods!(value_ref);
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            rows: self.rows.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A mutable iterator over values of an [`OrderedMultimap`].
///
/// This `struct` is created by [`OrderedMultimap::values_mut`] and
/// [`OrderedMultimap::equal_range_values_mut`].
///
/// [`OrderedMultimap`]: crate::OrderedMultimap
pub struct ValuesMut<'a, K, V> {
    rows: slice::IterMut<'a, Row<K, V>>,
}

impl<'a, K, V> ValuesMut<'a, K, V> {
    pub(crate) fn new(rows: &'a mut [Row<K, V>]) -> Self {
        Self {
            rows: rows.iter_mut(),
        }
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    iterator_methods!(value_mut);
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    double_ended_iterator_methods!(value_mut);
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows.as_slice().iter().map(value_ref))
            .finish()
    }
}

/// An owning iterator over the rows of an [`OrderedMultimap`].
///
/// This `struct` is created by the `into_iter` method on [`OrderedMultimap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`OrderedMultimap`]: crate::OrderedMultimap
pub struct IntoIter<K, V> {
    rows: vec::IntoIter<Row<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(rows: Vec<Row<K, V>>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }

    /// Returns the rows not yet yielded as a slice.
    pub fn as_slice(&self) -> &[Row<K, V>] {
        self.rows.as_slice()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    iterator_methods!(std::convert::identity);
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    double_ended_iterator_methods!(std::convert::identity);
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: Clone, V: Clone> Clone for IntoIter<K, V> {
    fn clone(&self) -> Self {
        IntoIter {
            rows: self.rows.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows.as_slice().iter().map(refs))
            .finish()
    }
}

/// A draining iterator over the rows of an [`OrderedMultimap`].
///
/// Rows that are not consumed are still removed when the iterator is
/// dropped.
///
/// This `struct` is created by [`OrderedMultimap::drain`].
///
/// [`OrderedMultimap`]: crate::OrderedMultimap
pub struct Drain<'a, K, V> {
    rows: vec::Drain<'a, Row<K, V>>,
}

impl<'a, K, V> Drain<'a, K, V> {
    pub(crate) fn new(rows: vec::Drain<'a, Row<K, V>>) -> Self {
        Self { rows }
    }
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    iterator_methods!(std::convert::identity);
}

impl<K, V> DoubleEndedIterator for Drain<'_, K, V> {
    double_ended_iterator_methods!(std::convert::identity);
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {
    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<K, V> FusedIterator for Drain<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Drain<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows.as_slice().iter().map(refs))
            .finish()
    }
}
