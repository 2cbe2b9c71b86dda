pub mod company;
pub mod lead;
pub mod user;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Request payload failed validation before any storage call was made
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`).
/// Use together with `#[serde(default)]`.
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Trimmed, non-empty text or `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
