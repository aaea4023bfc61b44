//! Quantity - values carried by parameters, derived outputs and readings
//!
//! A [`Quantity`] is either a finite number, a formatted string, or the
//! explicit [`Quantity::Undefined`] sentinel produced when a formula would
//! divide by (near) zero. `NaN` and infinities never enter a [`Fields`]
//! mapping: [`Quantity::number`] folds them into `Undefined`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single input or output value.
///
/// Serializes untagged: numbers as JSON numbers, text as strings and
/// `Undefined` as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// Finite numeric value.
    Number(f64),
    /// Formatted or categorical value (e.g. a verification verdict).
    Text(String),
    /// Formula has no defined result for the current parameters.
    Undefined,
}

impl Quantity {
    /// Wrap a float, mapping `NaN`/`±∞` to [`Quantity::Undefined`].
    #[must_use]
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            Self::Number(value)
        } else {
            Self::Undefined
        }
    }

    /// Numeric view of the value.
    ///
    /// Text that parses as a finite float counts as numeric, matching how
    /// formatted outputs are aggregated.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Whether this is the undefined sentinel.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Render numbers with a fixed number of decimals; text verbatim.
    #[must_use]
    pub fn to_fixed(&self, precision: usize) -> String {
        match self {
            Self::Number(v) => format!("{v:.precision$}"),
            Self::Text(s) => s.clone(),
            Self::Undefined => "N/A".to_string(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Undefined => f.write_str("N/A"),
        }
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Insertion-ordered `name -> Quantity` mapping.
///
/// Order is significant: table columns, CSV headers and default graph axes
/// all follow the order in which an apparatus declares its parameters and
/// outputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, Quantity)>);

impl Fields {
    /// Create an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Look up a value by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Quantity> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a value. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Quantity>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Quantity)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any value is the undefined sentinel.
    #[must_use]
    pub fn has_undefined(&self) -> bool {
        self.0.iter().any(|(_, v)| v.is_undefined())
    }
}

impl<K: Into<String>, V: Into<Quantity>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of quantity names to numbers, strings or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Fields, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Quantity>()? {
                    entries.push((key, value));
                }
                Ok(Fields(entries))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}
