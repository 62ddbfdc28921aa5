// ── Routes ──
//
// Path-shaped navigation targets shared by the CLI and TUI.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::model::Identifier;

/// A navigable view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/medico`
    List,
    /// `/medico/create`
    Create,
    /// `/medico/{id}/edit`
    Edit(Identifier),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::List => "/medico".into(),
            Self::Create => "/medico/create".into(),
            Self::Edit(id) => format!("/medico/{id}/edit"),
        }
    }

    /// Parse a path. Trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Self::Home),
            ["medico"] => Some(Self::List),
            ["medico", "create"] => Some(Self::Create),
            ["medico", id, "edit"] => Some(Self::Edit(Identifier::from(*id))),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::NotFound {
            entity: "Rota",
            identifier: s.to_owned(),
        })
    }
}
