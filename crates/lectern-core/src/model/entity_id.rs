// ── Record identity ──
//
// Server-assigned identifiers are usually auto-increment integers, but some
// endpoints hand out string keys (slugs, UUIDs). EntityId accepts both.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical, immutable identifier for any persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(u64),
    Text(String),
}

impl EntityId {
    pub fn as_numeric(&self) -> Option<u64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<u64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_become_numeric() {
        assert_eq!(EntityId::from("42"), EntityId::Numeric(42));
    }

    #[test]
    fn slugs_stay_text() {
        let id: EntityId = "sunday-service".parse().unwrap();
        assert_eq!(id, EntityId::Text("sunday-service".into()));
        assert_eq!(id.as_numeric(), None);
    }

    #[test]
    fn deserializes_both_shapes() {
        let ids: Vec<EntityId> = serde_json::from_str(r#"[7, "abc"]"#).unwrap();
        assert_eq!(ids, vec![EntityId::Numeric(7), EntityId::Text("abc".into())]);
    }

    #[test]
    fn display_is_bare() {
        assert_eq!(EntityId::Numeric(3).to_string(), "3");
        assert_eq!(EntityId::from("x-1").to_string(), "x-1");
    }
}
