//! Client-side routing and access control.
//!
//! - `routes`: the static table of path prefixes and who may view them.
//! - `route_guard`: the per-navigation authorization check.
//! - `navigator`: router state (current location, auth-screen flag,
//!   remembered origin) driven by the guard.

pub mod navigator;
pub mod route_guard;
pub mod routes;

pub use navigator::{NavigationOutcome, Navigator, RouterState};
pub use route_guard::{GuardDecision, RouteGuard};
pub use routes::{Access, RouteRule, RouteTable, APP_ROUTES, LOGIN_PATH, REGISTER_PATH, ROOT_PATH};
