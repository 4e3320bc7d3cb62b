//! Errors returned by the checked (`try_*`) operations of
//! [`OrderedMultimap`](crate::OrderedMultimap).

use thiserror::Error;

/// Failure of a checked table operation.
///
/// The unchecked counterparts ([`remove`], [`erase`] and indexing) treat the
/// same conditions as contract violations and panic with this error's
/// message instead.
///
/// [`remove`]: crate::OrderedMultimap::remove
/// [`erase`]: crate::OrderedMultimap::erase
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableError {
    /// No row has the requested key.
    #[error("no row with the requested key")]
    KeyNotFound,
    /// A position does not refer to a row.
    #[error("row index {index} out of bounds for table of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
