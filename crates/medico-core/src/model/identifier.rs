use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for médicos and clínicas.
///
/// The backend hands out numeric ids, but string ids are carried through
/// untouched. Parsing prefers the numeric form so `"1"` typed on the
/// command line matches the `1` the backend returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl Identifier {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for Identifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(trimmed.to_owned()),
        }
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<medico_api::Id> for Identifier {
    fn from(id: medico_api::Id) -> Self {
        match id {
            medico_api::Id::Number(n) => Self::Number(n),
            medico_api::Id::Text(s) => Self::Text(s),
        }
    }
}
