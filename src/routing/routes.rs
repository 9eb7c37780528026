use crate::session_management::role::Role;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";

/// Who may view the screens under a route prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Public,
    /// Login and registration screens; public, and flagged so that the
    /// 401 handler does not redirect in a loop.
    AuthScreen,
    /// Signed-in users holding one of the listed roles. An empty list means
    /// any signed-in user.
    Protected(&'static [Role]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: &'static str,
    /// Only the prefix itself matches, not the paths below it.
    pub exact: bool,
    pub access: Access,
}

impl RouteRule {
    pub const fn new(prefix: &'static str, access: Access) -> Self {
        Self {
            prefix,
            exact: false,
            access,
        }
    }

    pub const fn exact(prefix: &'static str, access: Access) -> Self {
        Self {
            prefix,
            exact: true,
            access,
        }
    }

    fn matches(&self, path: &str) -> bool {
        if path == self.prefix {
            return true;
        }
        if self.exact {
            return false;
        }
        path.strip_prefix(self.prefix)
            .is_some_and(|rest| rest.starts_with('/') || self.prefix.ends_with('/'))
    }
}

pub const APP_ROUTES: &[RouteRule] = &[
    RouteRule::exact(ROOT_PATH, Access::Public),
    RouteRule::new(LOGIN_PATH, Access::AuthScreen),
    RouteRule::new(REGISTER_PATH, Access::AuthScreen),
    RouteRule::new("/admin", Access::Protected(&[Role::Admin])),
    RouteRule::new("/professor", Access::Protected(&[Role::Professor])),
    RouteRule::new("/student", Access::Protected(&[Role::Student])),
    RouteRule::new(
        "/profile",
        Access::Protected(&[Role::Admin, Role::Professor, Role::Student]),
    ),
];

/// Static mapping from path prefixes to access rules.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    rules: &'static [RouteRule],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(APP_ROUTES)
    }
}

impl RouteTable {
    pub const fn new(rules: &'static [RouteRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [RouteRule] {
        self.rules
    }

    /// Most specific rule covering `path`, if any.
    pub fn resolve(&self, path: &str) -> Option<&'static RouteRule> {
        let path = normalize_path(path);
        self.rules
            .iter()
            .filter(|rule| rule.matches(&path))
            .max_by_key(|rule| rule.prefix.len())
    }

    /// Access level for `path`; unlisted paths are public.
    pub fn access(&self, path: &str) -> Access {
        self.resolve(path).map(|r| r.access).unwrap_or(Access::Public)
    }

    pub fn is_auth_screen(&self, path: &str) -> bool {
        self.access(path) == Access::AuthScreen
    }
}

/// Canonical form of a location: leading slash, no query or fragment, no
/// trailing slash except for the root.
pub fn normalize_path(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return ROOT_PATH.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
