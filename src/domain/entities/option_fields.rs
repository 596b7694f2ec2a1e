use serde::{Deserialize, Deserializer, Serialize};

/// Represents optional field semantics in update requests.
///
/// - `Unchanged` → field absent from the body
/// - `SetToNull` → explicitly null
/// - `SetToValue` → set to provided value
///
/// Fields must carry `#[serde(default)]` so that an absent key stays `Unchanged`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum OptionField<T> {
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<T> Default for OptionField<T> {
    fn default() -> Self {
        OptionField::Unchanged
    }
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present.
        Ok(match Option::<T>::deserialize(deserializer)? {
            None => OptionField::SetToNull,
            Some(value) => OptionField::SetToValue(value),
        })
    }
}

impl<T> OptionField<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn is_set_to_null(&self) -> bool {
        matches!(self, Self::SetToNull)
    }
}

/// Treats an explicit `null` like an absent key. Pair with `#[serde(default)]`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub type PatchString = OptionField<String>;
pub type PatchVec<T> = OptionField<Vec<T>>;
