//! Navigation side effects of session changes.
//!
//! The session decides *when* the user must move (logout sends them to the
//! login screen, a signed-in user is bounced off public pages). The embedder
//! decides *how*, by implementing [`Navigator`].

use std::fmt;

/// Destinations the session can send the user to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in screen.
    Login,
    /// Signed-in landing screen.
    Dashboard,
}

impl Route {
    /// Application path of the route.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Dashboard => "/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Receives navigation requests.
pub trait Navigator: Send + Sync {
    /// Move the user to `route`.
    fn navigate(&self, route: Route);
}

/// Navigator for headless embedders: records the request in the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(route = %route, "navigation requested");
    }
}
