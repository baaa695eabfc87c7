use crate::session::Session;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Welcome,
    History,
    Dashboard,
}

impl Route {
    /// Unknown paths land on the dashboard, which is itself gated.
    pub fn parse(path: &str) -> Self {
        let p = path.split(['?', '#']).next().unwrap_or("");
        match p.trim_end_matches('/') {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/welcome" => Route::Welcome,
            "/history" => Route::History,
            _ => Route::Dashboard,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Welcome => "/welcome",
            Route::History => "/history",
            Route::Dashboard => "/",
        }
    }

    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    pub fn after_login() -> Self {
        Route::Welcome
    }

    pub fn after_register() -> Self {
        Route::Dashboard
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Admit(Route),
    Redirect(Route),
}

/// Admit protected routes only when the session holds a token.
pub fn gate(session: &Session, route: Route) -> Navigation {
    if route.is_protected() && !session.is_authenticated() {
        Navigation::Redirect(Route::Login)
    } else {
        Navigation::Admit(route)
    }
}
