//! # sorted_table
//!
//! This crate provides [`OrderedMultimap`], an associative container that keeps
//! its key-value rows in one vector sorted by key, instead of a tree or a hash
//! table. Lookups are binary searches, iteration walks contiguous memory, and
//! keys may repeat.
//!
//! Single-row insertion and removal cost `O(n)` because later rows shift;
//! bulk loads go through [`OrderedMultimap::insert_all`] at `O(n log n)`.
//!
//! Operations whose precondition does not hold (removing a key that is not
//! there, erasing past the end, indexing a missing key) panic. Their `try_*`
//! counterparts return a [`TableError`] instead.
//!
//! ## Crate features
//!
//! * `serde`: `Serialize`/`Deserialize` for [`OrderedMultimap`] as a sequence
//!   of `(key, value)` pairs, plus the [`serde_seq`] helpers.

pub mod error;
pub mod iter;
pub mod ordered_multimap;

#[cfg(feature = "serde")]
pub mod serde_seq;

pub use error::TableError;
pub use ordered_multimap::{OrderedMultimap, Row};
