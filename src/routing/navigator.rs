use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use log::{debug, info, warn};

use crate::session_management::session::SharedSession;

use super::route_guard::{GuardDecision, RouteGuard};
use super::routes::{normalize_path, LOGIN_PATH, ROOT_PATH};

/// Redirects are followed at most this many times per navigation.
const MAX_REDIRECTS: usize = 4;

/// What the router currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterState {
    /// Location of the rendered screen.
    pub location: String,
    /// Whether `location` is the login or registration screen.
    pub on_auth_screen: bool,
    /// Location a signed-out user asked for before being sent to login.
    pub origin: Option<String>,
    /// Protected location waiting for session restoration to finish.
    pub pending: Option<String>,
}

impl Default for RouterState {
    fn default() -> Self {
        Self {
            location: ROOT_PATH.to_string(),
            on_auth_screen: false,
            origin: None,
            pending: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The session is still loading; `requested` is shown once it is done.
    Loading { requested: String },
    /// The requested screen is shown.
    Rendered { location: String },
    /// The guard sent the user somewhere else.
    Redirected { requested: String, location: String },
}

impl NavigationOutcome {
    pub fn location(&self) -> Option<&str> {
        match self {
            NavigationOutcome::Loading { .. } => None,
            NavigationOutcome::Rendered { location }
            | NavigationOutcome::Redirected { location, .. } => Some(location),
        }
    }
}

/// Router state plus the guard that protects it.
///
/// Every [`navigate`](Navigator::navigate) re-checks the guard against the
/// session as it is at that moment. Clones share the same state.
#[derive(Debug, Clone)]
pub struct Navigator {
    state: Arc<RwLock<RouterState>>,
    session: SharedSession,
    guard: RouteGuard,
}

impl Navigator {
    pub fn new(session: SharedSession, guard: RouteGuard) -> Self {
        Self {
            state: Arc::new(RwLock::new(RouterState::default())),
            session,
            guard,
        }
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, RouterState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> RouterState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn location(&self) -> String {
        self.state().location
    }

    pub fn is_on_auth_screen(&self) -> bool {
        self.state().on_auth_screen
    }

    pub fn navigate(&self, path: &str) -> NavigationOutcome {
        let requested = normalize_path(path);
        let session = self.session.snapshot();
        let mut target = requested.clone();
        let mut origin = None;

        for _ in 0..MAX_REDIRECTS {
            match self.guard.evaluate(&session, &target) {
                GuardDecision::Loading => {
                    debug!("Session still loading, holding navigation to {}", target);
                    self.state_mut().pending = Some(target.clone());
                    return NavigationOutcome::Loading { requested: target };
                }
                GuardDecision::Render => {
                    self.render(&target, origin);
                    return if target == requested {
                        NavigationOutcome::Rendered { location: target }
                    } else {
                        info!("Navigation to {} redirected to {}", requested, target);
                        NavigationOutcome::Redirected {
                            requested,
                            location: target,
                        }
                    };
                }
                GuardDecision::Redirect { to, origin: from } => {
                    if from.is_some() {
                        origin = from;
                    }
                    target = normalize_path(&to);
                }
            }
        }

        warn!("Too many redirects from {}, falling back to {}", requested, ROOT_PATH);
        self.render(ROOT_PATH, origin);
        NavigationOutcome::Redirected {
            requested,
            location: ROOT_PATH.to_string(),
        }
    }

    fn render(&self, location: &str, origin: Option<String>) {
        let on_auth_screen = self.guard.table().is_auth_screen(location);
        let mut state = self.state_mut();
        state.location = location.to_string();
        state.on_auth_screen = on_auth_screen;
        state.pending = None;
        if origin.is_some() {
            state.origin = origin;
        }
    }

    /// Re-runs the guard for the held navigation, or the current location if
    /// nothing is pending. Called once session restoration completes and
    /// whenever the session changes under the current screen.
    pub fn resume(&self) -> NavigationOutcome {
        let target = {
            let state = self.state();
            state.pending.unwrap_or(state.location)
        };
        self.navigate(&target)
    }

    /// Sends the user to the login screen unless already on an auth screen.
    ///
    /// A navigation held during session restoration is re-checked instead,
    /// so the guard redirects it to login and remembers it as the origin.
    pub fn redirect_to_login(&self) -> Option<NavigationOutcome> {
        if let Some(pending) = self.state().pending {
            debug!("Re-checking held navigation to {}", pending);
            return Some(self.navigate(&pending));
        }
        if self.is_on_auth_screen() {
            debug!("Already on an auth screen, not redirecting");
            return None;
        }
        Some(self.navigate(LOGIN_PATH))
    }

    /// Consumes the location remembered when the user was sent to login.
    pub fn take_origin(&self) -> Option<String> {
        self.state_mut().origin.take()
    }

    /// Post-login landing: the remembered origin if the guard lets the new
    /// user see it, else the user's home screen.
    pub fn after_login(&self) -> NavigationOutcome {
        let home = self
            .session
            .read()
            .role()
            .map(|r| r.home_path())
            .unwrap_or(ROOT_PATH);
        let target = self.take_origin().unwrap_or_else(|| home.to_string());
        self.navigate(&target)
    }
}
