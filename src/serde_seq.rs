//! Sequence (de)serialization for [`OrderedMultimap`].
//!
//! A table is written as a sequence of `(key, value)` pairs in key order.
//! Reading accepts the pairs in any order and sorts them once at the end.
//!
//! Requires crate feature `"serde"`.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::OrderedMultimap;

impl<K, V> Serialize for OrderedMultimap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<T>(&self, serializer: T) -> Result<T::Ok, T::Error>
    where
        T: Serializer,
    {
        serializer.collect_seq(self.as_slice())
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMultimap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SeqVisitor(PhantomData))
    }
}

/// Serializes an [`OrderedMultimap`] as an ordered sequence of pairs.
///
/// This function may be used in a field attribute for deriving [`Serialize`]
/// on a type that stores its rows some other way:
///
/// ```ignore
/// #[derive(Serialize)]
/// struct Index {
///     #[serde(serialize_with = "sorted_table::serde_seq::serialize")]
///     postings: OrderedMultimap<String, u32>,
/// }
/// ```
pub fn serialize<K, V, T>(table: &OrderedMultimap<K, V>, serializer: T) -> Result<T::Ok, T::Error>
where
    K: Serialize,
    V: Serialize,
    T: Serializer,
{
    table.serialize(serializer)
}

/// Deserializes an [`OrderedMultimap`] from a sequence of pairs in any order.
pub fn deserialize<'de, D, K, V>(deserializer: D) -> Result<OrderedMultimap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    deserializer.deserialize_seq(SeqVisitor(PhantomData))
}

/// Visitor collecting a sequence of pairs into an [`OrderedMultimap`].
struct SeqVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for SeqVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = OrderedMultimap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "a sequence of key-value pairs")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut rows = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(row) = seq.next_element()? {
            rows.push(row);
        }
        Ok(OrderedMultimap::from_rows(rows))
    }
}
