//! Screen identifiers and their mapping from routes.

use std::fmt;

use medico_core::Route;

/// Top-level screens. `Form` hosts both the create and the edit route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Home,
    Medicos,
    Form,
}

impl ScreenId {
    /// Screens reachable from the tab bar, in order.
    pub const TABS: [ScreenId; 2] = [Self::Home, Self::Medicos];

    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::Home => Self::Home,
            Route::List => Self::Medicos,
            Route::Create | Route::Edit(_) => Self::Form,
        }
    }

    /// Number key (1-2) for tab screens; 0 for the form.
    pub fn number(self) -> u8 {
        match self {
            Self::Home => 1,
            Self::Medicos => 2,
            Self::Form => 0,
        }
    }

    /// Route for a number key.
    pub fn route_for_number(n: char) -> Option<Route> {
        match n {
            '1' => Some(Route::Home),
            '2' => Some(Route::List),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Início",
            Self::Medicos => "Médicos",
            Self::Form => "Formulário",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use medico_core::Identifier;

    use super::*;

    #[test]
    fn form_routes_share_one_screen() {
        assert_eq!(ScreenId::for_route(&Route::Create), ScreenId::Form);
        assert_eq!(
            ScreenId::for_route(&Route::Edit(Identifier::Number(3))),
            ScreenId::Form
        );
        assert_eq!(ScreenId::for_route(&Route::List), ScreenId::Medicos);
    }

    #[test]
    fn number_keys_map_to_tab_routes() {
        assert_eq!(ScreenId::route_for_number('2'), Some(Route::List));
        assert_eq!(ScreenId::route_for_number('3'), None);
        for tab in ScreenId::TABS {
            let route = ScreenId::route_for_number(char::from(b'0' + tab.number()));
            assert_eq!(route.as_ref().map(ScreenId::for_route), Some(tab));
        }
    }
}
