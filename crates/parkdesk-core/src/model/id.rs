// ── Record identity ──
//
// Backend ids are integers on most tables and strings on a few. `RecordId`
// hides the difference so lookups and chain links compare uniformly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use parkdesk_api::models::WireId;

/// Opaque backend identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(i64),
    Text(String),
}

impl RecordId {
    pub fn as_num(&self) -> Option<i64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Self::Num(n),
            Err(_) => Self::Text(trimmed.to_owned()),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Num(n)
    }
}

impl From<WireId> for RecordId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Num(n) => Self::Num(n),
            // Some endpoints quote numeric keys.
            WireId::Text(s) => Self::from(s.as_str()),
        }
    }
}

impl From<&RecordId> for WireId {
    fn from(id: &RecordId) -> Self {
        match id {
            RecordId::Num(n) => WireId::Num(*n),
            RecordId::Text(s) => WireId::Text(s.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_parse_as_numbers() {
        assert_eq!(RecordId::from("42"), RecordId::Num(42));
        assert_eq!(RecordId::from(" 7 "), RecordId::Num(7));
        assert_eq!(RecordId::from("abc-1"), RecordId::Text("abc-1".into()));
    }

    #[test]
    fn quoted_wire_ids_match_numeric_ones() {
        assert_eq!(
            RecordId::from(WireId::Text("9".into())),
            RecordId::from(WireId::Num(9))
        );
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for raw in ["15", "uuid-like-text"] {
            let id: RecordId = raw.parse().unwrap_or_else(|e| match e {});
            assert_eq!(id.to_string(), raw);
        }
    }
}
