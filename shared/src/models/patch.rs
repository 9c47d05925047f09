//! Tri-state field for partial updates
//!
//! JSON has three states for a field of an update body: omitted, `null`,
//! and a value. `Option<T>` collapses the first two; [`Patch`] keeps them
//! apart so "leave unchanged" and "clear" are different requests.
//!
//! Fields must carry `#[serde(default)]` so that an omitted key becomes
//! [`Patch::Missing`]:
//!
//! ```
//! use shared::models::Patch;
//!
//! #[derive(serde::Deserialize)]
//! struct Body {
//!     #[serde(default)]
//!     due: Patch<String>,
//! }
//!
//! let omitted: Body = serde_json::from_str("{}").unwrap();
//! assert!(omitted.due.is_missing());
//!
//! let cleared: Body = serde_json::from_str(r#"{"due": null}"#).unwrap();
//! assert!(cleared.due.is_null());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a partial update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Key absent: leave the stored value unchanged
    #[default]
    Missing,
    /// Explicit `null`: clear the stored value
    Null,
    /// New value
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    /// Borrow the new value, if any
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Map the contained value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Missing => Patch::Missing,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the key is present
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(v) => v.serialize(serializer),
            Patch::Missing | Patch::Null => serializer.serialize_none(),
        }
    }
}
