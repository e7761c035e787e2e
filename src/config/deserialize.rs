// ABOUTME: Custom serde deserializers for topology types.
// ABOUTME: Rejects bridges declared without member interfaces.

use nonempty::NonEmpty;
use serde::Deserialize;

pub fn deserialize_slaves<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(values)
        .ok_or_else(|| serde::de::Error::custom("a bridge needs at least one slave interface"))
}
