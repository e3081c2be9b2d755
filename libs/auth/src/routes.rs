//! Console route table

use crate::guard::{GuardDecision, LOGIN_PATH, RouteGuard};
use crate::models::Role;
use crate::session::Session;

/// Route sections and the role allowed into each
const SECTIONS: [(&str, Role); 3] = [
    ("/admin", Role::Admin),
    ("/reception", Role::Receptionist),
    ("/mechanic", Role::Mechanic),
];

/// How a path is served
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// Open to everyone
    Public,
    /// Behind a guard
    Guarded(RouteGuard),
    /// Not a page; sends the user elsewhere
    Redirect(&'static str),
}

/// Look a path up in the route table
pub fn resolve(path: &str) -> RouteTarget {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    if path == LOGIN_PATH {
        return RouteTarget::Public;
    }

    SECTIONS
        .iter()
        .find(|(prefix, _)| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
        .map(|(_, role)| RouteTarget::Guarded(RouteGuard::new().allow([*role])))
        .unwrap_or(RouteTarget::Redirect(LOGIN_PATH))
}

/// Decide what opening `path` does for `session`
pub fn navigate(path: &str, session: &Session) -> GuardDecision {
    match resolve(path) {
        RouteTarget::Public => GuardDecision::Render,
        RouteTarget::Guarded(guard) => guard.evaluate(session, path),
        RouteTarget::Redirect(to) => GuardDecision::RedirectToLogin {
            to: to.to_string(),
            from: path.to_string(),
        },
    }
}
