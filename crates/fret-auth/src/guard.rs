//! Route access decisions.
//!
//! Guards run before a view is shown. They only consult the cached user, so
//! they must run after [`SessionManager::initialize`] has resolved.

use fret_core::{User, UserRole};

use crate::navigation::Route;
use crate::session::SessionManager;

/// Outcome of a guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Show the view.
    Granted,
    /// Send the user elsewhere instead.
    Redirect(Route),
}

impl Access {
    /// Whether the view may be shown.
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Signed-in views.
pub fn authenticated(user: Option<&User>) -> Access {
    match user {
        Some(_) => Access::Granted,
        None => Access::Redirect(Route::Login),
    }
}

/// Views reserved to some roles. Signed-out users go to login, signed-in
/// users without the role go to their dashboard.
pub fn role(user: Option<&User>, roles: &[UserRole]) -> Access {
    match user {
        None => Access::Redirect(Route::Login),
        Some(u) if u.has_any_role(roles) => Access::Granted,
        Some(_) => Access::Redirect(Route::Dashboard),
    }
}

/// Views for signed-out users only (login, register).
pub fn public_only(user: Option<&User>) -> Access {
    match user {
        None => Access::Granted,
        Some(_) => Access::Redirect(Route::Dashboard),
    }
}

fn enforce(session: &SessionManager, access: Access) -> Access {
    if let Access::Redirect(route) = access {
        tracing::debug!(route = %route, "guard redirect");
        session.navigate(route);
    }
    access
}

/// [`authenticated`] against the session, navigating on redirect.
pub fn require_auth(session: &SessionManager) -> Access {
    enforce(session, authenticated(session.current_user().as_ref()))
}

/// [`role`] against the session, navigating on redirect.
pub fn require_role(session: &SessionManager, roles: &[UserRole]) -> Access {
    enforce(session, role(session.current_user().as_ref(), roles))
}

/// [`public_only`] against the session, navigating on redirect.
pub fn require_public(session: &SessionManager) -> Access {
    enforce(session, public_only(session.current_user().as_ref()))
}
