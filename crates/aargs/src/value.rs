use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// A flag's accumulated state, or a bound positional value.
///
/// Scanning only ever moves a flag forward through these states:
///
/// - switches: `Unset -> On -> Count(2) -> Count(3) ...`
/// - negation: anything `-> Off`
/// - values: `Unset | On | Off -> Scalar -> List -> List ...`
///
/// Bound positional slots hold `Scalar`, splat slots hold `List`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Value {
    #[default]
    Unset,
    On,
    Count(u32),
    Off,
    Scalar(String),
    List(Vec<String>),
}

impl Value {
    /// Truthiness as seen by `name?` lookups.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Unset | Self::Off)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Whether the flag currently carries a string or list.
    pub fn has_value(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::List(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// How many times a switch was given (`On` counts once).
    pub fn count(&self) -> Option<u32> {
        match self {
            Self::On => Some(1),
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::On | Self::Count(_) => Some(true),
            Self::Off => Some(false),
            _ => None,
        }
    }

    /// Every string carried by the value, in order.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            Self::Scalar(s) => vec![s.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("nil"),
            Self::On => f.write_str("true"),
            Self::Off => f.write_str("false"),
            Self::Count(n) => write!(f, "{n}"),
            Self::Scalar(s) => write!(f, "{s:?}"),
            Self::List(items) => write!(f, "{items:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset => serializer.serialize_none(),
            Self::On => serializer.serialize_bool(true),
            Self::Off => serializer.serialize_bool(false),
            Self::Count(n) => serializer.serialize_u32(*n),
            Self::Scalar(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
