//! Serde support for partial updates.
//!
//! A patch field of type `Option<Option<T>>` distinguishes the three things a
//! JSON body can say about it: absent (`None`, keep the stored value),
//! `null` (`Some(None)`, clear it) and a value (`Some(Some(v))`, replace it).

use serde::{Deserialize, Deserializer};

/// Use together with `#[serde(default)]`, which covers the absent case.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}
