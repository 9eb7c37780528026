use crate::session_management::session::Session;

use super::routes::{normalize_path, Access, RouteTable, LOGIN_PATH};

/// Outcome of checking one navigation against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The session is still being restored; show a neutral placeholder and
    /// check again once restoration completes.
    Loading,
    /// Show the requested screen.
    Render,
    /// Go to `to` instead. `origin` is the location the user asked for when
    /// the redirect is a sign-in prompt.
    Redirect { to: String, origin: Option<String> },
}

/// Access-control check run before every navigation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard {
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn evaluate(&self, session: &Session, path: &str) -> GuardDecision {
        let path = normalize_path(path);
        let allowed = match self.table.access(&path) {
            Access::Public | Access::AuthScreen => return GuardDecision::Render,
            Access::Protected(roles) => roles,
        };

        if session.loading {
            return GuardDecision::Loading;
        }

        let user = match (&session.token, &session.user) {
            (Some(_), Some(user)) => user,
            _ => {
                return GuardDecision::Redirect {
                    to: LOGIN_PATH.to_string(),
                    origin: Some(path),
                }
            }
        };

        let permitted = allowed.is_empty() || user.role.known().is_some_and(|r| allowed.contains(&r));
        if !permitted {
            return GuardDecision::Redirect {
                to: user.role.home_path().to_string(),
                origin: None,
            };
        }

        GuardDecision::Render
    }
}
